//! Particle data as uploaded to the GPU

use bytemuck::{Pod, Zeroable};

/// Initial state of one splash particle, in the shader's vertex layout.
/// 32 bytes, two vec4 rows.
///
/// The renderer derives the visual position each frame from the pool age and
/// these initial values; nothing here is integrated on the CPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Offset from the emission anchor, w = 1
    pub position: [f32; 4],
    /// Initial velocity, w = 0
    pub velocity: [f32; 4],
}

impl Particle {
    pub fn new(offset: [f32; 2], velocity: [f32; 2]) -> Self {
        Self {
            position: [offset[0], offset[1], 0.0, 1.0],
            velocity: [velocity[0], velocity[1], 0.0, 0.0],
        }
    }

    /// Planar distance of the initial offset from the anchor
    pub fn offset_length(&self) -> f32 {
        let [x, y, z, _] = self.position;
        (x * x + y * y + z * z).sqrt()
    }
}
