//! The draw-call seam between the editor and a GPU backend

use crate::postprocess::{EffectKind, PostProcessUniforms};
use crate::surface::SurfaceFrame;
use river_core::Vec3;
use river_particles::ParticleBatch;

/// Where subsequent draws land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    /// The window's back buffer
    #[default]
    Default,
    /// The HDR texture a post-process effect samples from
    Offscreen,
}

/// One full-screen effect pass over the offscreen target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessPass {
    pub effect: EffectKind,
    /// Elapsed time, for time-driven effects
    pub time: f32,
    pub frequency: f32,
    pub intensity: f32,
}

impl PostProcessPass {
    pub fn uniforms(&self, width: u32, height: u32) -> PostProcessUniforms {
        PostProcessUniforms {
            time: self.time,
            frequency: self.frequency,
            intensity: self.intensity,
            effect: self.effect.index() as u32,
            texel_size: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

/// Issues the editor's draws. Implementations skip draws whose resources are missing.
pub trait RenderLayer {
    fn clear(&mut self, color: [f32; 4]);

    /// Draw a control-point gizmo quad centred at `position`
    fn draw_gizmo(&mut self, position: Vec3, scale: f32);

    fn draw_surface(&mut self, frame: &SurfaceFrame);

    fn draw_particles(&mut self, batch: &ParticleBatch);

    fn bind_target(&mut self, target: RenderTarget);

    fn post_process(&mut self, pass: &PostProcessPass);
}
