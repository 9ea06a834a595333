//! Lightweight xorshift32 PRNG for the splash pool

pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly, so 1.0 is never produced
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform point inside the unit disk via polar sampling.
    ///
    /// The radius is `sqrt(u)` so that points have uniform areal density
    /// instead of clustering at the centre.
    pub fn inside_unit_circle(&mut self) -> [f32; 2] {
        let angle = self.next_f32() * std::f32::consts::TAU;
        let radius = self.next_f32().sqrt();
        [radius * angle.cos(), radius * angle.sin()]
    }
}
