//! The river editor state and its per-frame lifecycle
//!
//! The host owns the loop and calls, once:
//! - [`RiverEditor::init`]
//!
//! then every frame:
//! - [`RiverEditor::on_frame_start`] - clear the frame
//! - [`RiverEditor::on_input`] for each discrete event, and
//!   [`RiverEditor::on_input_update`] for held keys
//! - [`RiverEditor::on_update`] - advance the splash and draw
//! - [`RiverEditor::on_frame_end`]

use crate::control_points::ControlPointStore;
use river_core::{Result, RiverConfig, RiverParameters, Vec3};
use river_particles::{ParticleSystem, SplashParams};
use river_render::{
    screen_to_plane, OffscreenTarget, PostProcessChain, Projector, RenderLayer, SurfaceFrame,
    SurfaceInstancer,
};
use river_runtime::{actions, FrameClock, InputEvent, InputState, KeyCode};

/// Background the frame is cleared to
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Offset that draws gizmos in front of the ribbon
pub const GIZMO_LIFT: Vec3 = Vec3::new(0.0, 0.0, 2.0);

/// Counters the headless runner reports
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EditorStats {
    pub frames: u64,
    pub reseeds: u64,
    pub picks: u64,
    pub drag_updates: u64,
    /// Emission anchors produced on the most recent frame
    pub last_anchor_count: usize,
}

pub struct RiverEditor {
    config: RiverConfig,
    store: ControlPointStore,
    particles: ParticleSystem,
    chain: PostProcessChain,
    instancer: SurfaceInstancer,
    input: InputState,
    clock: FrameClock,
    stats: EditorStats,
}

impl RiverEditor {
    /// Build an editor from a validated config
    pub fn new(config: RiverConfig) -> Result<Self> {
        config.validate()?;
        let chain = PostProcessChain::from_settings(&config.postprocess)?;
        let store = ControlPointStore::new(
            config.river.control_points_count,
            config.camera.view_height,
        );
        let particles = ParticleSystem::from_settings(&config.splash);

        Ok(Self {
            config,
            store,
            particles,
            chain,
            instancer: SurfaceInstancer::new(),
            input: InputState::new(),
            clock: FrameClock::new(),
            stats: EditorStats::default(),
        })
    }

    /// Seed the splash pool. Call once before the first frame.
    pub fn init(&mut self) {
        log::info!(
            "[editor] {} control points, width {:.2}, flow {:.2}, {} post-process effect(s)",
            self.store.len(),
            self.config.river.river_width,
            self.config.river.animation_speed,
            self.chain.effects().len()
        );
        self.reseed();
    }

    pub fn on_frame_start<L: RenderLayer + ?Sized>(&mut self, layer: &mut L) {
        layer.clear(CLEAR_COLOR);
    }

    /// Advance the splash by `dt` seconds and draw the scene.
    ///
    /// With a post-process effect active the scene goes to the offscreen
    /// target first and the effect pass runs on the default target.
    pub fn on_update<L: RenderLayer + ?Sized>(&mut self, dt: f32, layer: &mut L) {
        self.clock.advance(dt as f64);
        let time = self.clock.elapsed();
        let params = &self.config.river;

        let anchors = self
            .particles
            .emit(self.store.points(), params.animation_speed, self.clock.delta());
        self.stats.last_anchor_count = anchors.len();
        let batch = self.particles.draw_batch(anchors);
        let frame = self.instancer.assemble(self.store.points(), params, time);
        let gizmo_scale = gizmo_scale(params);

        match self.chain.pass(time) {
            Some(pass) => {
                {
                    let mut target = OffscreenTarget::bind(layer);
                    draw_scene(&mut *target, &self.store, gizmo_scale, &frame);
                    target.draw_particles(&batch);
                    target.finish();
                }
                layer.post_process(&pass);
            }
            None => {
                draw_scene(layer, &self.store, gizmo_scale, &frame);
                layer.draw_particles(&batch);
            }
        }
    }

    pub fn on_frame_end(&mut self) {
        self.input.end_frame();
        self.stats.frames += 1;
    }

    /// Handle one discrete input event; mouse positions go through `projector`
    pub fn on_input(&mut self, event: &InputEvent, projector: &dyn Projector) {
        self.input.process_event(event);

        match *event {
            InputEvent::KeyPressed(key) => self.on_key_press(key),
            InputEvent::MouseButtonPressed { x, y, button } => {
                if !self.input.button_triggers(button, actions::DRAG) {
                    return;
                }
                let Some(world) = screen_to_plane(projector, x as f32, y as f32) else {
                    return;
                };
                let params = &self.config.river;
                if let Some(index) =
                    self.store
                        .pick(world, params.click_distance_threshold, params.pick_policy)
                {
                    log::debug!("[editor] Picked control point {index}");
                    self.store.begin_drag(index);
                    self.stats.picks += 1;
                }
            }
            InputEvent::MouseMoved { x, y } => {
                if !self.store.is_dragging() {
                    return;
                }
                if let Some(world) = screen_to_plane(projector, x as f32, y as f32) {
                    if self.store.update_drag(world).is_some() {
                        self.stats.drag_updates += 1;
                    }
                }
            }
            InputEvent::MouseButtonReleased { button, .. } => {
                if self.input.button_triggers(button, actions::DRAG) {
                    self.store.end_drag();
                }
            }
            InputEvent::KeyReleased(_) | InputEvent::MouseScrolled { .. } => {}
        }
    }

    fn on_key_press(&mut self, key: KeyCode) {
        let flow_changed = if self.input.key_triggers(key, actions::FLOW_FASTER) {
            self.config.river.increase_flow()
        } else if self.input.key_triggers(key, actions::FLOW_SLOWER) {
            self.config.river.decrease_flow()
        } else {
            false
        };
        if flow_changed {
            log::debug!("[editor] Flow speed {:.2}", self.config.river.animation_speed);
            self.reseed();
        }

        if self.input.key_triggers(key, actions::CYCLE_POSTPROCESS) {
            self.chain.toggle_or_advance();
        }
    }

    /// Apply held keys: width and tiling change at `smoothness` per second
    pub fn on_input_update(&mut self, dt: f32) {
        let step = self.config.river.smoothness * dt;

        let width_dir = self.input.axis(actions::WIDEN, actions::NARROW);
        if width_dir != 0.0 {
            let before = self.config.river.river_width;
            self.config.river.adjust_width(width_dir * step);
            if self.config.river.river_width != before {
                self.reseed();
            }
        }

        let tiling_dir = self.input.axis(actions::TILE_MORE, actions::TILE_LESS);
        if tiling_dir != 0.0 {
            self.config.river.adjust_tiling(tiling_dir * step);
        }
    }

    fn reseed(&mut self) {
        let params = SplashParams::from_river(&self.config.river, &self.config.splash);
        self.particles.reseed(params);
        self.stats.reseeds += 1;
    }

    pub fn params(&self) -> &RiverParameters {
        &self.config.river
    }

    pub fn config(&self) -> &RiverConfig {
        &self.config
    }

    pub fn control_points(&self) -> &ControlPointStore {
        &self.store
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn post_process(&self) -> &PostProcessChain {
        &self.chain
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn stats(&self) -> EditorStats {
        self.stats
    }

    /// The ribbon parameters for the current state, as the next frame would draw them
    pub fn surface_frame(&self) -> SurfaceFrame {
        self.instancer
            .assemble(self.store.points(), &self.config.river, self.clock.elapsed())
    }
}

/// Gizmo quads span the click area's inscribed square
fn gizmo_scale(params: &RiverParameters) -> f32 {
    params.click_distance_threshold / std::f32::consts::SQRT_2
}

fn draw_scene<L: RenderLayer + ?Sized>(
    layer: &mut L,
    store: &ControlPointStore,
    gizmo_scale: f32,
    frame: &SurfaceFrame,
) {
    for point in store.points() {
        layer.draw_gizmo(*point + GIZMO_LIFT, gizmo_scale);
    }
    layer.draw_surface(frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use river_core::{CameraSettings, RiverError};
    use river_particles::SplashPhase;
    use river_render::{
        DrawCommand, EffectKind, OrthoCamera, RecordingLayer, RenderTarget, ResourceRegistry,
    };

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn camera() -> OrthoCamera {
        OrthoCamera::new(CameraSettings::default(), W, H)
    }

    fn editor() -> RiverEditor {
        let mut editor = RiverEditor::new(RiverConfig::default()).unwrap();
        editor.init();
        editor
    }

    /// Window pixel for a world point under the default camera
    fn to_screen(p: Vec3) -> (f64, f64) {
        let x = (p.x / 16.0 + 0.5) * W;
        let y = (0.5 - p.y / 9.0) * H;
        (x as f64, y as f64)
    }

    fn frame(editor: &mut RiverEditor, layer: &mut RecordingLayer, dt: f32) {
        editor.on_frame_start(layer);
        editor.on_input_update(dt);
        editor.on_update(dt, layer);
        editor.on_frame_end();
    }

    fn press(editor: &mut RiverEditor, key: KeyCode) {
        editor.on_input(&InputEvent::KeyPressed(key), &camera());
        editor.on_input(&InputEvent::KeyReleased(key), &camera());
    }

    #[test]
    fn init_seeds_splash_pool() {
        let editor = editor();
        assert_eq!(editor.particles().phase(), SplashPhase::Seeded);
        assert_eq!(editor.particles().capacity(), 1);
        assert_eq!(editor.stats().reseeds, 1);
    }

    #[test]
    fn click_and_drag_moves_control_point() {
        let mut editor = editor();
        let cam = camera();
        let start = editor.control_points().points()[1];
        let (x, y) = to_screen(start);

        editor.on_input(&InputEvent::MouseButtonPressed { x, y, button: 0 }, &cam);
        assert_eq!(editor.control_points().selection(), Some(1));

        let target = Vec3::new(4.0, 2.0, 0.0);
        let (tx, ty) = to_screen(target);
        editor.on_input(&InputEvent::MouseMoved { x: tx, y: ty }, &cam);
        let moved = editor.control_points().points()[1];
        assert!(moved.distance(&target) < 1e-3);

        editor.on_input(&InputEvent::MouseButtonReleased { x: tx, y: ty, button: 0 }, &cam);
        assert_eq!(editor.control_points().selection(), None);

        editor.on_input(&InputEvent::MouseMoved { x: 0.0, y: 0.0 }, &cam);
        assert_eq!(editor.control_points().points()[1], moved);
        assert_eq!(editor.stats().picks, 1);
        assert_eq!(editor.stats().drag_updates, 1);
    }

    #[test]
    fn right_click_and_misses_do_not_select() {
        let mut editor = editor();
        let cam = camera();
        let (x, y) = to_screen(editor.control_points().points()[0]);
        editor.on_input(&InputEvent::MouseButtonPressed { x, y, button: 1 }, &cam);
        assert_eq!(editor.control_points().selection(), None);

        editor.on_input(&InputEvent::MouseButtonPressed { x: 10.0, y: 10.0, button: 0 }, &cam);
        assert_eq!(editor.control_points().selection(), None);
    }

    #[test]
    fn flow_keys_step_clamp_and_reseed() {
        let mut editor = editor();
        press(&mut editor, KeyCode::NumpadAdd);
        assert!((editor.params().animation_speed - 0.6).abs() < 1e-6);
        assert_eq!(editor.stats().reseeds, 2);
        assert_eq!(editor.particles().capacity(), 6);

        for _ in 0..10 {
            press(&mut editor, KeyCode::Equal);
        }
        assert_eq!(editor.params().animation_speed, 2.0);
        assert_eq!(editor.stats().reseeds, 5);

        for _ in 0..10 {
            press(&mut editor, KeyCode::NumpadSubtract);
        }
        assert_eq!(editor.params().animation_speed, 0.0);
        assert_eq!(editor.particles().capacity(), 0);
    }

    #[test]
    fn held_width_key_widens_and_reseeds() {
        let mut editor = editor();
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        editor.on_input(&InputEvent::KeyPressed(KeyCode::KeyT), &camera());
        frame(&mut editor, &mut layer, 1.0);
        assert!((editor.params().river_width - 1.5).abs() < 1e-6);
        assert_eq!(editor.stats().reseeds, 2);

        editor.on_input(&InputEvent::KeyReleased(KeyCode::KeyT), &camera());
        editor.on_input(&InputEvent::KeyPressed(KeyCode::KeyR), &camera());
        for _ in 0..20 {
            frame(&mut editor, &mut layer, 0.25);
        }
        assert_eq!(editor.params().river_width, 0.0);
        assert_eq!(editor.particles().capacity(), 0);
    }

    #[test]
    fn held_tiling_key_changes_tiling_only() {
        let mut editor = editor();
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        editor.on_input(&InputEvent::KeyPressed(KeyCode::KeyO), &camera());
        frame(&mut editor, &mut layer, 0.2);
        assert!((editor.params().tiling_factor - 2.9).abs() < 1e-6);
        assert_eq!(editor.stats().reseeds, 1);
    }

    #[test]
    fn frame_draws_gizmos_surface_and_particles() {
        let mut editor = editor();
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        press(&mut editor, KeyCode::NumpadAdd);
        frame(&mut editor, &mut layer, 0.016);

        let commands = layer.take_commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        let gizmos: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Gizmo { position, scale, .. } => Some((*position, *scale)),
                _ => None,
            })
            .collect();
        assert_eq!(gizmos.len(), 4);
        assert_eq!(gizmos[0].0.z, 2.0);
        assert!((gizmos[0].1 - 0.2 / std::f32::consts::SQRT_2).abs() < 1e-6);

        assert!(commands.iter().any(|c| matches!(c, DrawCommand::Surface { .. })));
        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Particles { anchor_count: 1, .. })));
        assert_eq!(editor.stats().frames, 1);
        assert_eq!(editor.particles().phase(), SplashPhase::Advancing);
    }

    #[test]
    fn post_process_renders_offscreen_then_restores() {
        let mut editor = editor();
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        press(&mut editor, KeyCode::KeyE);
        assert_eq!(editor.post_process().active(), Some(EffectKind::Bloom));

        frame(&mut editor, &mut layer, 0.016);
        let commands = layer.take_commands();
        let bind_offscreen = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::BindTarget(RenderTarget::Offscreen)));
        let bind_default = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::BindTarget(RenderTarget::Default)));
        let pass = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::PostProcess { .. }));
        let surface = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Surface { .. }));

        let (Some(off), Some(def), Some(pass), Some(surface)) =
            (bind_offscreen, bind_default, pass, surface)
        else {
            panic!("missing commands: {commands:?}");
        };
        assert!(off < surface && surface < def && def < pass);
        assert_eq!(layer.current_target(), RenderTarget::Default);

        for _ in 0..4 {
            press(&mut editor, KeyCode::KeyE);
        }
        assert!(!editor.post_process().is_enabled());
    }

    #[test]
    fn long_frames_keep_time_and_edits_in_step() {
        let mut editor = editor();
        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        editor.on_input(&InputEvent::KeyPressed(KeyCode::KeyT), &camera());
        for _ in 0..4 {
            frame(&mut editor, &mut layer, 0.5);
        }
        assert!((editor.elapsed() - 2.0).abs() < 1e-6);
        assert!((editor.params().river_width - 2.0).abs() < 1e-6);
        assert!((editor.particles().age() - 0.5).abs() < 1e-6);
        assert!((editor.surface_frame().time - 2.0).abs() < 1e-6);
    }

    #[test]
    fn control_point_count_is_fixed() {
        let mut config = RiverConfig::default();
        config.river.control_points_count = 6;
        let mut editor = RiverEditor::new(config).unwrap();
        editor.init();
        assert_eq!(editor.control_points().len(), 6);
        assert_eq!(editor.surface_frame().control_points.len(), 6);

        let mut layer = RecordingLayer::new(ResourceRegistry::with_river_defaults());
        let cam = camera();
        let (x, y) = to_screen(editor.control_points().points()[5]);
        editor.on_input(&InputEvent::MouseButtonPressed { x, y, button: 0 }, &cam);
        editor.on_input(&InputEvent::MouseMoved { x: 100.0, y: 100.0 }, &cam);
        frame(&mut editor, &mut layer, 0.016);
        assert_eq!(editor.control_points().len(), 6);

        let mut config = RiverConfig::default();
        config.river.control_points_count = 0;
        assert!(matches!(
            RiverEditor::new(config),
            Err(RiverError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn bad_config_is_rejected() {
        let mut config = RiverConfig::default();
        config.postprocess.effects.push("vhs".into());
        assert!(matches!(
            RiverEditor::new(config),
            Err(RiverError::UnknownEffect { .. })
        ));
    }
}
