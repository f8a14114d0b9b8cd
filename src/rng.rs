//! Seedable pseudo-random number generator (xorshift64) used for every random
//! draw in the games: speed jitter, target jumps, confetti, wheel spins.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from browser / OS entropy, falling back to the performance clock.
    pub fn from_entropy() -> Self {
        Rng::new(entropy_seed())
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn unit(&mut self) -> f64 {
        // 53 high bits -> exact f64 mantissa
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform float in [min, min + span).
    pub fn span(&mut self, min: f64, span: f64) -> f64 {
        min + self.unit() * span
    }

    /// Uniform index in [0, len). Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }

    /// Bernoulli draw with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Pick a random element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.index(items.len()))
        }
    }
}

#[cfg(feature = "rng")]
fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::debug!("getrandom failed ({err}), seeding from clock");
            clock_seed()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn entropy_seed() -> u64 {
    clock_seed()
}

fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        (now * 1000.0) as u64 ^ 0x9E37_79B9_7F4A_7C15
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15)
    }
}
