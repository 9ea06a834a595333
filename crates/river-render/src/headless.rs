//! Headless render layer that records draw commands instead of issuing them

use crate::camera::{OrthoCamera, Projector};
use crate::layer::{PostProcessPass, RenderLayer, RenderTarget};
use crate::particle_layout::{particle_vertex_layout, ParticleUniforms};
use crate::postprocess::{offscreen_texture_descriptor, PostProcessUniforms};
use crate::registry::{names, MeshHandle, ResourceRegistry, ShaderHandle, TextureHandle};
use crate::surface::{SurfaceFrame, SurfaceUniforms};
use river_core::Vec3;
use river_particles::ParticleBatch;

/// A draw the editor asked for, with its resources resolved
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear([f32; 4]),
    Gizmo {
        shader: ShaderHandle,
        mesh: MeshHandle,
        position: Vec3,
        scale: f32,
    },
    Surface {
        shader: ShaderHandle,
        mesh: MeshHandle,
        texture: TextureHandle,
        line: [Vec3; 2],
        uniforms: SurfaceUniforms,
    },
    /// One instanced draw of the pool per anchor
    Particles {
        shader: ShaderHandle,
        texture: TextureHandle,
        particle_count: usize,
        anchor_count: usize,
        epoch: u64,
        /// Stride of the pool's vertex buffer
        vertex_stride: wgpu::BufferAddress,
        /// One block per anchor, in anchor order
        uniforms: Vec<ParticleUniforms>,
    },
    BindTarget(RenderTarget),
    PostProcess {
        pass: PostProcessPass,
        uniforms: PostProcessUniforms,
    },
}

/// Records every draw into a list; used by the CLI and tests
pub struct RecordingLayer {
    registry: ResourceRegistry,
    commands: Vec<DrawCommand>,
    target: RenderTarget,
    skipped: usize,
    view_proj: [[f32; 4]; 4],
    width: u32,
    height: u32,
    offscreen: Option<wgpu::TextureDescriptor<'static>>,
}

impl RecordingLayer {
    /// A layer with an identity view-projection and a 1x1 target
    pub fn new(registry: ResourceRegistry) -> Self {
        Self {
            registry,
            commands: Vec::new(),
            target: RenderTarget::Default,
            skipped: 0,
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            width: 1,
            height: 1,
            offscreen: None,
        }
    }

    /// Take the view-projection and target size from `camera`
    pub fn with_camera(mut self, camera: &OrthoCamera) -> Self {
        let viewport = camera.viewport();
        self.view_proj = camera.view_projection_cols();
        self.width = viewport.width.max(1.0) as u32;
        self.height = viewport.height.max(1.0) as u32;
        self.offscreen = None;
        self
    }

    /// The offscreen scene target, once an effect has bound it
    pub fn offscreen_target(&self) -> Option<&wgpu::TextureDescriptor<'static>> {
        self.offscreen.as_ref()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands, e.g. at the end of a frame
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn current_target(&self) -> RenderTarget {
        self.target
    }

    /// Draws dropped because a resource was missing
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    fn record(&mut self, command: Option<DrawCommand>) {
        match command {
            Some(command) => self.commands.push(command),
            None => self.skipped += 1,
        }
    }
}

impl RenderLayer for RecordingLayer {
    fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_gizmo(&mut self, position: Vec3, scale: f32) {
        let command = (|| {
            Some(DrawCommand::Gizmo {
                shader: self.registry.shader(names::GIZMO_SHADER)?,
                mesh: self.registry.mesh(names::GIZMO_MESH)?,
                position,
                scale,
            })
        })();
        self.record(command);
    }

    fn draw_surface(&mut self, frame: &SurfaceFrame) {
        let command = (|| {
            Some(DrawCommand::Surface {
                shader: self.registry.shader(names::SURFACE_SHADER)?,
                mesh: self.registry.mesh(names::SURFACE_MESH)?,
                texture: self.registry.texture(names::WATER_TEXTURE)?,
                line: frame.line_vertices()?,
                uniforms: frame.uniforms(),
            })
        })();
        self.record(command);
    }

    fn draw_particles(&mut self, batch: &ParticleBatch) {
        if batch.particles.is_empty() || batch.anchors.is_empty() {
            return;
        }
        let command = (|| {
            Some(DrawCommand::Particles {
                shader: self.registry.shader(names::PARTICLE_SHADER)?,
                texture: self.registry.texture(names::SPLASH_TEXTURE)?,
                particle_count: batch.particles.len(),
                anchor_count: batch.anchors.len(),
                epoch: batch.epoch,
                vertex_stride: particle_vertex_layout().array_stride,
                uniforms: ParticleUniforms::for_batch(self.view_proj, batch),
            })
        })();
        self.record(command);
    }

    fn bind_target(&mut self, target: RenderTarget) {
        if target == RenderTarget::Offscreen && self.offscreen.is_none() {
            self.offscreen = Some(offscreen_texture_descriptor(
                "Scene HDR",
                self.width,
                self.height,
            ));
        }
        self.target = target;
        self.commands.push(DrawCommand::BindTarget(target));
    }

    fn post_process(&mut self, pass: &PostProcessPass) {
        self.commands.push(DrawCommand::PostProcess {
            pass: *pass,
            uniforms: pass.uniforms(self.width, self.height),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::EffectKind;
    use crate::surface::SurfaceInstancer;
    use river_core::{CameraSettings, RiverParameters};
    use river_particles::{ParticleSystem, SplashParams};

    fn curve() -> Vec<Vec3> {
        vec![Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.0, 3.0, 0.0)]
    }

    #[test]
    fn records_resolved_draws() {
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        layer.clear([0.0, 0.0, 0.0, 1.0]);
        layer.draw_gizmo(Vec3::new(0.0, 0.0, 2.0), 0.14);
        let frame = SurfaceInstancer::new().assemble(&curve(), &RiverParameters::default(), 1.0);
        layer.draw_surface(&frame);

        assert_eq!(layer.commands().len(), 3);
        assert_eq!(layer.skipped(), 0);
        match &layer.commands()[2] {
            DrawCommand::Surface { line, uniforms, .. } => {
                assert_eq!(line[1], Vec3::new(0.0, 3.0, 0.0));
                assert_eq!(uniforms.control_point_count, 2);
            }
            other => panic!("expected surface draw, got {other:?}"),
        }
    }

    #[test]
    fn missing_resources_are_silent_no_ops() {
        let mut layer = RecordingLayer::new(ResourceRegistry::new());
        layer.draw_gizmo(Vec3::ZERO, 1.0);
        let frame = SurfaceInstancer::new().assemble(&curve(), &RiverParameters::default(), 0.0);
        layer.draw_surface(&frame);
        assert!(layer.commands().is_empty());
        assert_eq!(layer.skipped(), 2);
    }

    #[test]
    fn particles_need_pool_and_anchors() {
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        let mut system = ParticleSystem::new(3, 0.05);
        system.reseed(SplashParams {
            count: 12,
            fall_speed: 0.5,
            decay_radius: 0.5,
            particle_size: 0.1,
        });

        let none = system.emit(&curve(), 0.0, 0.016);
        layer.draw_particles(&system.draw_batch(none));
        assert!(layer.commands().is_empty());

        let anchors = system.emit(&curve(), 4.0, 0.016);
        layer.draw_particles(&system.draw_batch(anchors));
        match layer.take_commands().as_slice() {
            [DrawCommand::Particles {
                particle_count,
                anchor_count,
                epoch,
                vertex_stride,
                uniforms,
                ..
            }] => {
                assert_eq!(*particle_count, 12);
                assert_eq!(*anchor_count, 4);
                assert_eq!(*epoch, 1);
                assert_eq!(*vertex_stride, 32);
                assert_eq!(uniforms.len(), 4);
                assert_eq!(uniforms[0].view_proj, glam::Mat4::IDENTITY.to_cols_array_2d());
                assert_eq!(uniforms[3].particle_size, 0.1);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn camera_feeds_particle_and_effect_uniforms() {
        let camera = OrthoCamera::new(CameraSettings::default(), 1280.0, 720.0);
        let mut layer =
            RecordingLayer::new(ResourceRegistry::with_river_defaults()).with_camera(&camera);
        let mut system = ParticleSystem::new(3, 0.05);
        system.reseed(SplashParams {
            count: 2,
            fall_speed: 0.5,
            decay_radius: 0.5,
            particle_size: 0.1,
        });
        let anchors = system.emit(&curve(), 1.0, 0.016);
        layer.draw_particles(&system.draw_batch(anchors));
        assert!(layer.offscreen_target().is_none());

        layer.bind_target(RenderTarget::Offscreen);
        let pass = PostProcessPass {
            effect: EffectKind::Ripple,
            time: 2.0,
            frequency: 3.0,
            intensity: 1.0,
        };
        layer.post_process(&pass);

        let desc = layer.offscreen_target().unwrap();
        assert_eq!((desc.size.width, desc.size.height), (1280, 720));
        match layer.commands() {
            [DrawCommand::Particles { uniforms, .. }, DrawCommand::BindTarget(_), DrawCommand::PostProcess { uniforms: post, .. }] =>
            {
                assert_eq!(uniforms[0].view_proj, camera.view_projection_cols());
                assert_eq!(post.effect, 2);
                assert_eq!(post.frequency, 3.0);
                assert!((post.texel_size[1] - 1.0 / 720.0).abs() < 1e-9);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }
}
