//! GPU-side description of the splash pool
//!
//! The pool buffer is uploaded once per re-seed as a vertex buffer; every
//! anchor is then one instanced draw with its own `ParticleUniforms`.

use bytemuck::{Pod, Zeroable};
use river_particles::{Particle, ParticleAnchor, ParticleBatch};

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x4, // initial offset (w = 1)
    1 => Float32x4  // initial velocity (w = 0)
];

/// Vertex layout matching [`Particle`]
pub fn particle_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Particle>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PARTICLE_ATTRIBUTES,
    }
}

/// Per-anchor uniforms for one splash draw
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = anchor on the curve, w = 1
    pub anchor: [f32; 4],
    /// xyz = unit curve tangent, w = 0
    pub tangent: [f32; 4],
    /// Seconds since the pool was seeded
    pub age: f32,
    pub particle_size: f32,
    pub decay_radius: f32,
    pub fall_speed: f32,
}

impl ParticleUniforms {
    pub fn new(view_proj: [[f32; 4]; 4], batch: &ParticleBatch, anchor: &ParticleAnchor) -> Self {
        Self {
            view_proj,
            anchor: anchor.position.extend(1.0),
            tangent: anchor.tangent.extend(0.0),
            age: batch.age,
            particle_size: batch.particle_size,
            decay_radius: batch.decay_radius,
            fall_speed: batch.fall_speed,
        }
    }

    /// One uniform block per anchor in the batch
    pub fn for_batch(view_proj: [[f32; 4]; 4], batch: &ParticleBatch) -> Vec<Self> {
        batch
            .anchors
            .iter()
            .map(|anchor| Self::new(view_proj, batch, anchor))
            .collect()
    }
}
