//! River Render - the contracts between the editor and the GPU
//!
//! This crate does not own a device. It assembles what a renderer needs and
//! hands it across narrow seams:
//! - `Projector` / `OrthoCamera` - screen-to-world projection onto the z = 0 plane
//! - `SurfaceInstancer` - the ribbon shader's uniform set and line primitive
//! - `PostProcessChain` - cycling full-screen effects over an offscreen target
//! - `RenderLayer` - the draw-call seam, with `RecordingLayer` for headless runs
//! - `ResourceRegistry` - named shader, mesh and texture handles

mod camera;
mod headless;
mod layer;
pub mod particle_layout;
pub mod postprocess;
mod registry;
pub mod surface;

pub use camera::{
    intersect_ground_plane, plane_to_screen, screen_to_plane, OrthoCamera, Projector, Viewport,
};
pub use headless::{DrawCommand, RecordingLayer};
pub use layer::{PostProcessPass, RenderLayer, RenderTarget};
pub use postprocess::{EffectKind, OffscreenTarget, PostProcessChain, PostProcessUniforms, HDR_FORMAT};
pub use registry::{names, MeshHandle, ResourceRegistry, ShaderHandle, TextureHandle};
pub use surface::{SurfaceFrame, SurfaceInstancer, SurfaceUniforms, SURFACE_UNIFORM_NAMES};
