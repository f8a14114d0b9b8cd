//! Ambient backdrop: slow motes drifting across the page, joined by faint
//! lines when close. Decorative only.

use crate::confetti::Bounds;
use crate::rng::Rng;

pub const CANVAS: &str = "backgroundCanvas";
pub const MOTE_COUNT: usize = 50;
/// Motes closer than this are linked.
pub const LINK_DISTANCE: f64 = 150.0;
const MAX_DRIFT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
}

/// A line between two nearby motes; `alpha` fades with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub alpha: f64,
}

#[derive(Debug)]
pub struct Backdrop {
    motes: Vec<Mote>,
    width: f64,
    height: f64,
}

impl Backdrop {
    /// Scatter `count` motes over a `width` x `height` area.
    pub fn new(count: usize, width: f64, height: f64, rng: &mut Rng) -> Self {
        let motes = (0..count)
            .map(|_| Mote {
                x: rng.unit() * width,
                y: rng.unit() * height,
                vx: (rng.unit() - 0.5) * MAX_DRIFT,
                vy: (rng.unit() - 0.5) * MAX_DRIFT,
                size: rng.unit() * 3.0 + 1.0,
                opacity: rng.unit() * 0.5 + 0.2,
            })
            .collect();
        Self { motes, width, height }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    /// Drift every mote one frame, wrapping at the edges.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for m in &mut self.motes {
            m.x += m.vx;
            m.y += m.vy;
            if m.x < 0.0 {
                m.x = w;
            } else if m.x > w {
                m.x = 0.0;
            }
            if m.y < 0.0 {
                m.y = h;
            } else if m.y > h {
                m.y = 0.0;
            }
        }
    }

    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (i, a) in self.motes.iter().enumerate() {
            for b in &self.motes[i + 1..] {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                if dist < LINK_DISTANCE {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        alpha: 0.2 * (1.0 - dist / LINK_DISTANCE),
                    });
                }
            }
        }
        links
    }
}

impl Bounds for Backdrop {
    fn set_bounds(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
