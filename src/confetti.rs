//! Confetti particles. Purely decorative: nothing in the game logic reads them.

use crate::rng::Rng;

pub const PALETTE: [&str; 8] = [
    "#00e5ff", "#ff00ff", "#00ff88", "#ffae00", "#ff4757", "#ffd700", "#00ffff", "#ff69b4",
];

const GRAVITY: f64 = 0.15;
/// How far below the bottom edge a particle may fall before it is dropped.
const EXIT_MARGIN: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub size: f64,
    pub color: &'static str,
}

impl Particle {
    /// Advance one frame. Returns false once the particle left the bottom edge.
    fn step(&mut self, floor: f64) -> bool {
        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.rotation_speed;
        self.y <= floor + EXIT_MARGIN
    }
}

/// Anything laid out over a canvas that must follow its size.
pub trait Bounds {
    fn set_bounds(&mut self, width: f64, height: f64);
}

/// One emitter per canvas.
#[derive(Debug)]
pub struct ConfettiEmitter {
    canvas_id: &'static str,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ConfettiEmitter {
    pub fn new(canvas_id: &'static str) -> Self {
        Self {
            canvas_id,
            particles: Vec::new(),
            width: 800.0,
            height: 600.0,
        }
    }

    pub fn canvas_id(&self) -> &'static str {
        self.canvas_id
    }

    pub fn launch(&mut self, count: usize, rng: &mut Rng) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle {
                x: rng.unit() * self.width,
                y: -20.0 - rng.unit() * 100.0,
                vx: (rng.unit() - 0.5) * 4.0,
                vy: rng.unit() * 3.0 + 2.0,
                rotation: rng.unit() * 360.0,
                rotation_speed: (rng.unit() - 0.5) * 10.0,
                size: rng.unit() * 8.0 + 4.0,
                color: rng.pick(&PALETTE).copied().unwrap_or(PALETTE[0]),
            });
        }
    }

    /// Advance every particle by one frame and drop the ones that fell out.
    /// Returns whether anything is still alive.
    pub fn step(&mut self) -> bool {
        let floor = self.height;
        self.particles.retain_mut(|p| p.step(floor));
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Bounds for ConfettiEmitter {
    fn set_bounds(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
