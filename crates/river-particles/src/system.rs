//! The splash particle system: re-seedable pool plus curve-anchored emission
//!
//! Lifecycle is `Empty -> Seeded -> Advancing`, returning to `Seeded` on every
//! [`ParticleSystem::reseed`]. The pool is never resized or integrated in
//! place; width and flow edits rebuild it from scratch.

use crate::particle::Particle;
use crate::rand::ParticleRng;
use river_core::bezier::{emission_parameters, sample_at};
use river_core::{RiverParameters, SplashSettings, Vec3};
use std::sync::Arc;

/// Hard cap on pool size, whatever the width and speed.
pub const MAX_PARTICLES: usize = 10_000;

/// Parameters a re-seed is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SplashParams {
    pub count: usize,
    /// Upper bound of the random flow (vertical) velocity component.
    pub fall_speed: f32,
    /// Maximum initial displacement from the anchor; also bounds horizontal velocity.
    pub decay_radius: f32,
    pub particle_size: f32,
}

impl SplashParams {
    /// Derive the pool parameters from the live river settings.
    ///
    /// Zero width or zero flow yields an empty pool.
    pub fn from_river(river: &RiverParameters, settings: &SplashSettings) -> Self {
        let width = river.river_width.max(0.0);
        let speed = river.animation_speed.abs();
        let count = (settings.density.max(0.0) * width * speed).floor() as usize;
        Self {
            count: count.min(MAX_PARTICLES),
            fall_speed: settings.fall_speed_factor * speed,
            decay_radius: width * 0.5,
            particle_size: settings.size_factor * width,
        }
    }
}

/// Lifecycle phase of the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPhase {
    /// Never seeded
    Empty,
    /// Freshly generated, not yet advanced
    Seeded,
    /// Advanced by at least one frame since the last re-seed
    Advancing,
}

/// A world-space point on the curve where the pool is drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleAnchor {
    pub position: Vec3,
    pub tangent: Vec3,
    pub t: f32,
}

/// Everything the renderer needs to draw the splash for one frame
#[derive(Debug, Clone)]
pub struct ParticleBatch {
    pub particles: Arc<[Particle]>,
    pub anchors: Vec<ParticleAnchor>,
    /// Seconds since the pool was generated
    pub age: f32,
    pub particle_size: f32,
    pub decay_radius: f32,
    pub fall_speed: f32,
    pub epoch: u64,
}

/// Fixed splash pool, redrawn at every emission anchor each frame.
pub struct ParticleSystem {
    rng: ParticleRng,
    particles: Arc<[Particle]>,
    params: SplashParams,
    phase: SplashPhase,
    age: f32,
    epoch: u64,
    emission_offset: f32,
}

impl ParticleSystem {
    pub fn new(seed: u32, emission_offset: f32) -> Self {
        Self {
            rng: ParticleRng::new(seed),
            particles: Arc::from(Vec::<Particle>::new()),
            params: SplashParams::default(),
            phase: SplashPhase::Empty,
            age: 0.0,
            epoch: 0,
            emission_offset,
        }
    }

    pub fn from_settings(settings: &SplashSettings) -> Self {
        Self::new(settings.seed, settings.emission_offset)
    }

    /// Throw away the pool and generate `params.count` fresh particles.
    ///
    /// The new buffer is built separately and swapped in whole, so buffers
    /// previously handed to the renderer are never mutated.
    pub fn reseed(&mut self, params: SplashParams) {
        let count = params.count.min(MAX_PARTICLES);
        let radius = params.decay_radius.max(0.0);
        let fall_speed = params.fall_speed.max(0.0);

        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let [ux, uy] = self.rng.inside_unit_circle();
            let vx = self.rng.range(-radius, radius);
            let vy = self.rng.range(0.0, fall_speed);
            particles.push(Particle::new([ux * radius, uy * radius], [vx, vy]));
        }

        self.particles = Arc::from(particles);
        self.params = SplashParams { count, ..params };
        self.phase = SplashPhase::Seeded;
        self.age = 0.0;
        self.epoch += 1;

        log::debug!(
            "[particles] Re-seeded {count} particle(s), radius {radius:.3}, fall speed {fall_speed:.3} (epoch {})",
            self.epoch
        );
    }

    /// Advance the pool by `dt` and compute this frame's emission anchors.
    ///
    /// Anchors sit at `t = offset, offset + 1/speed, ...` along the curve.
    /// Nothing is emitted when the pool is empty or the flow is stopped.
    pub fn emit(&mut self, points: &[Vec3], speed: f32, dt: f32) -> Vec<ParticleAnchor> {
        if self.phase == SplashPhase::Empty {
            return Vec::new();
        }
        self.age += dt.max(0.0);
        self.phase = SplashPhase::Advancing;

        if self.particles.is_empty() || points.is_empty() {
            return Vec::new();
        }

        emission_parameters(speed, self.emission_offset)
            .into_iter()
            .map(|t| {
                let sample = sample_at(points, t);
                ParticleAnchor {
                    position: sample.position,
                    tangent: sample.tangent,
                    t,
                }
            })
            .collect()
    }

    /// Package the current pool with this frame's anchors for the renderer
    pub fn draw_batch(&self, anchors: Vec<ParticleAnchor>) -> ParticleBatch {
        ParticleBatch {
            particles: Arc::clone(&self.particles),
            anchors,
            age: self.age,
            particle_size: self.params.particle_size,
            decay_radius: self.params.decay_radius,
            fall_speed: self.params.fall_speed,
            epoch: self.epoch,
        }
    }

    /// Shared handle to the current buffer
    pub fn buffer(&self) -> Arc<[Particle]> {
        Arc::clone(&self.particles)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn phase(&self) -> SplashPhase {
        self.phase
    }

    pub fn params(&self) -> SplashParams {
        self.params
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn river_curve() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, -3.375, 0.0),
            Vec3::new(0.0, -1.125, 0.0),
            Vec3::new(0.0, 1.125, 0.0),
            Vec3::new(0.0, 3.375, 0.0),
        ]
    }

    fn params(count: usize) -> SplashParams {
        SplashParams {
            count,
            fall_speed: 0.25,
            decay_radius: 0.5,
            particle_size: 0.1,
        }
    }

    #[test]
    fn lifecycle_phases() {
        let mut system = ParticleSystem::new(42, 0.05);
        assert_eq!(system.phase(), SplashPhase::Empty);
        assert!(system.emit(&river_curve(), 1.0, 0.016).is_empty());
        assert_eq!(system.phase(), SplashPhase::Empty);

        system.reseed(params(8));
        assert_eq!(system.phase(), SplashPhase::Seeded);
        assert_eq!(system.capacity(), 8);

        system.emit(&river_curve(), 1.0, 0.016);
        assert_eq!(system.phase(), SplashPhase::Advancing);
        assert!((system.age() - 0.016).abs() < 1e-6);

        system.reseed(params(3));
        assert_eq!(system.phase(), SplashPhase::Seeded);
        assert_eq!(system.age(), 0.0);
        assert_eq!(system.epoch(), 2);
    }

    #[test]
    fn empty_pool_never_emits() {
        let mut system = ParticleSystem::new(42, 0.05);
        system.reseed(params(0));
        assert!(system.particles().is_empty());
        for speed in [0.0, 0.1, 1.0, 2.0, 50.0] {
            assert!(system.emit(&river_curve(), speed, 0.016).is_empty());
        }
    }

    #[test]
    fn stopped_flow_never_emits() {
        let mut system = ParticleSystem::new(42, 0.05);
        system.reseed(params(10));
        assert!(system.emit(&river_curve(), 0.0, 0.016).is_empty());
    }

    #[test]
    fn anchors_lie_on_curve_at_schedule() {
        let mut system = ParticleSystem::new(42, 0.05);
        system.reseed(params(10));
        let curve = river_curve();
        let anchors = system.emit(&curve, 2.0, 0.016);
        assert_eq!(anchors.len(), 2);
        assert!((anchors[0].t - 0.05).abs() < 1e-6);
        assert!((anchors[1].t - 0.55).abs() < 1e-6);
        for a in &anchors {
            let expected = river_core::bezier_point(&curve, a.t);
            assert_eq!(a.position, expected);
            assert!((a.tangent.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn velocities_are_bounded() {
        let mut system = ParticleSystem::new(7, 0.05);
        system.reseed(params(500));
        for p in system.particles() {
            assert!(p.velocity[0] >= -0.5 && p.velocity[0] < 0.5);
            assert!(p.velocity[1] >= 0.0 && p.velocity[1] < 0.25);
            assert_eq!(p.velocity[2], 0.0);
            assert_eq!(p.position[3], 1.0);
        }
    }

    #[test]
    fn reseed_swaps_buffer_without_touching_old_one() {
        let mut system = ParticleSystem::new(42, 0.05);
        system.reseed(params(16));
        let held = system.buffer();
        let snapshot: Vec<Particle> = held.to_vec();

        system.reseed(params(4));
        assert_eq!(held.len(), 16);
        assert_eq!(&held[..], &snapshot[..]);
        assert_eq!(system.capacity(), 4);
    }

    #[test]
    fn same_seed_reproduces_pool() {
        let mut a = ParticleSystem::new(1234, 0.05);
        let mut b = ParticleSystem::new(1234, 0.05);
        a.reseed(params(32));
        b.reseed(params(32));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn batch_carries_pool_and_parameters() {
        let mut system = ParticleSystem::new(42, 0.05);
        system.reseed(params(5));
        let anchors = system.emit(&river_curve(), 1.0, 0.5);
        let batch = system.draw_batch(anchors);
        assert_eq!(batch.particles.len(), 5);
        assert_eq!(batch.anchors.len(), 1);
        assert!((batch.age - 0.5).abs() < 1e-6);
        assert!((batch.particle_size - 0.1).abs() < 1e-6);
        assert_eq!(batch.epoch, 1);
    }

    #[test]
    fn params_from_river_follow_width_and_speed() {
        let settings = SplashSettings::default();
        let mut river = RiverParameters::default();

        let p = SplashParams::from_river(&river, &settings);
        assert_eq!(p.count, 1);
        assert!((p.decay_radius - 0.5).abs() < 1e-6);
        assert!((p.fall_speed - 0.25).abs() < 1e-6);

        river.animation_speed = 2.0;
        river.river_width = 3.0;
        let p = SplashParams::from_river(&river, &settings);
        assert_eq!(p.count, 60);
        assert!((p.decay_radius - 1.5).abs() < 1e-6);

        river.river_width = 0.0;
        assert_eq!(SplashParams::from_river(&river, &settings).count, 0);

        river.river_width = 1.0;
        river.animation_speed = 0.0;
        assert_eq!(SplashParams::from_river(&river, &settings).count, 0);
    }

    proptest! {
        #[test]
        fn offsets_stay_inside_decay_radius(count in 1usize..300, radius in 0.0f32..20.0, seed in any::<u32>()) {
            let mut system = ParticleSystem::new(seed, 0.05);
            system.reseed(SplashParams { count, fall_speed: 1.0, decay_radius: radius, particle_size: 0.1 });
            prop_assert_eq!(system.capacity(), count);
            for p in system.particles() {
                prop_assert!(p.offset_length() <= radius * (1.0 + 1e-5));
            }
        }
    }
}
