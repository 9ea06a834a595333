//! River Particles - the splash effect drawn along the river
//!
//! Provides a fixed, re-seedable particle pool:
//! - Disk-sampled initial offsets and bounded random velocities
//! - Full re-seed whenever river width or flow speed changes (no incremental resize)
//! - Immutable, shared GPU-ready buffers swapped in on re-seed
//! - Per-frame emission anchors sampled along the Bezier curve

pub mod particle;
pub mod rand;
pub mod system;

pub use particle::Particle;
pub use system::{ParticleAnchor, ParticleBatch, ParticleSystem, SplashParams, SplashPhase};
