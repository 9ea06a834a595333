//! Headless simulation command
//!
//! Drives the editor through a scripted session (key presses, a held width
//! key, one control-point drag) against a recording render layer, then
//! prints what happened as JSON.

use super::load_config;
use anyhow::{bail, Context, Result};
use river_core::Vec3;
use river_editor::RiverEditor;
use river_render::{plane_to_screen, DrawCommand, OrthoCamera, RecordingLayer, ResourceRegistry};
use river_runtime::{EventBus, InputEvent, KeyCode, LEFT_MOUSE_BUTTON};
use serde::Serialize;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub dt: f32,
    pub width: f32,
    pub height: f32,
    pub drag: Option<usize>,
    pub to: Option<[f32; 3]>,
    pub flow_up: u32,
    pub flow_down: u32,
    pub widen: f32,
    pub cycle: u32,
    pub pretty: bool,
}

#[derive(Debug, Default, Serialize)]
struct DrawCounts {
    clears: usize,
    gizmos: usize,
    surfaces: usize,
    particle_draws: usize,
    particle_instances: usize,
    post_passes: usize,
    skipped: usize,
}

impl DrawCounts {
    fn tally(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear(_) => self.clears += 1,
                DrawCommand::Gizmo { .. } => self.gizmos += 1,
                DrawCommand::Surface { .. } => self.surfaces += 1,
                DrawCommand::Particles {
                    particle_count,
                    anchor_count,
                    ..
                } => {
                    self.particle_draws += 1;
                    self.particle_instances += particle_count * anchor_count;
                }
                DrawCommand::PostProcess { .. } => self.post_passes += 1,
                DrawCommand::BindTarget(_) => {}
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ParticleReport {
    count: usize,
    epoch: u64,
    age: f32,
    phase: String,
    anchors_last_frame: usize,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    frames: u64,
    elapsed: f32,
    control_points: Vec<Vec3>,
    river_width: f32,
    animation_speed: f32,
    tiling_factor: f32,
    active_effect: Option<String>,
    /// Size of the offscreen scene target, if an effect ever ran
    offscreen_target: Option<[u32; 2]>,
    reseeds: u64,
    picks: u64,
    drag_updates: u64,
    particles: ParticleReport,
    draws: DrawCounts,
}

/// A pointer drag from one window position to another
struct DragScript {
    from: [f32; 2],
    to: [f32; 2],
    frames: u32,
}

impl DragScript {
    /// Events to feed on `frame` (0-based)
    fn events(&self, frame: u32) -> Vec<InputEvent> {
        let at = |s: f32| {
            let x = self.from[0] + (self.to[0] - self.from[0]) * s;
            let y = self.from[1] + (self.to[1] - self.from[1]) * s;
            (x as f64, y as f64)
        };

        if frame == 0 {
            let (x, y) = at(0.0);
            return vec![InputEvent::MouseButtonPressed {
                x,
                y,
                button: LEFT_MOUSE_BUTTON,
            }];
        }
        if frame > self.frames {
            return Vec::new();
        }

        let (x, y) = at(frame as f32 / self.frames as f32);
        let mut events = vec![InputEvent::MouseMoved { x, y }];
        if frame == self.frames {
            events.push(InputEvent::MouseButtonReleased {
                x,
                y,
                button: LEFT_MOUSE_BUTTON,
            });
        }
        events
    }
}

fn tap(bus: &mut EventBus, key: KeyCode, times: u32) {
    for _ in 0..times {
        bus.push(InputEvent::KeyPressed(key));
        bus.push(InputEvent::KeyReleased(key));
    }
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.dt.is_nan() || args.dt <= 0.0 {
        bail!("--dt must be positive, got {}", args.dt);
    }

    let config = load_config(args.config.as_deref())?;
    let camera = OrthoCamera::new(config.camera.clone(), args.width, args.height);
    let mut editor = RiverEditor::new(config).context("Invalid river configuration")?;
    let mut layer =
        RecordingLayer::new(ResourceRegistry::with_river_defaults()).with_camera(&camera);
    let mut bus = EventBus::new();
    let mut draws = DrawCounts::default();

    let drag = match args.drag {
        Some(index) => {
            let start = editor
                .control_points()
                .get(index)
                .with_context(|| format!("No control point at index {}", index))?;
            let target = args.to.map(Vec3::from_array).unwrap_or(start);
            let from = plane_to_screen(&camera, start)
                .context("Drag start is not visible from the camera")?;
            let to = plane_to_screen(&camera, target)
                .context("Drag target is not visible from the camera")?;
            Some(DragScript {
                from,
                to,
                frames: (args.frames / 2).max(1),
            })
        }
        None => None,
    };

    let width_key = if args.widen < 0.0 {
        KeyCode::KeyR
    } else {
        KeyCode::KeyT
    };
    let hold_for = args.widen.abs();

    editor.init();
    log::info!(
        "[simulate] {} frame(s) at dt {:.3}s in a {}x{} window",
        args.frames,
        args.dt,
        args.width,
        args.height
    );
    tap(&mut bus, KeyCode::NumpadAdd, args.flow_up);
    tap(&mut bus, KeyCode::NumpadSubtract, args.flow_down);
    tap(&mut bus, KeyCode::KeyE, args.cycle);
    if hold_for > 0.0 {
        bus.push(InputEvent::KeyPressed(width_key));
    }

    let mut held = 0.0;
    for frame in 0..args.frames {
        if let Some(drag) = &drag {
            for event in drag.events(frame) {
                bus.push(event);
            }
        }
        if hold_for > 0.0 && held < hold_for && held + args.dt >= hold_for {
            bus.push(InputEvent::KeyReleased(width_key));
        }

        editor.on_frame_start(&mut layer);
        for event in bus.drain() {
            editor.on_input(&event, &camera);
        }
        editor.on_input_update(args.dt);
        editor.on_update(args.dt, &mut layer);
        editor.on_frame_end();

        held += args.dt;
        draws.tally(&layer.take_commands());
    }
    draws.skipped = layer.skipped();

    let stats = editor.stats();
    let params = editor.params();
    let particles = editor.particles();
    let report = SimulationReport {
        frames: stats.frames,
        elapsed: editor.elapsed(),
        control_points: editor.control_points().points().to_vec(),
        river_width: params.river_width,
        animation_speed: params.animation_speed,
        tiling_factor: params.tiling_factor,
        active_effect: editor.post_process().active().map(|e| e.to_string()),
        offscreen_target: layer
            .offscreen_target()
            .map(|desc| [desc.size.width, desc.size.height]),
        reseeds: stats.reseeds,
        picks: stats.picks,
        drag_updates: stats.drag_updates,
        particles: ParticleReport {
            count: particles.capacity(),
            epoch: particles.epoch(),
            age: particles.age(),
            phase: format!("{:?}", particles.phase()),
            anchors_last_frame: stats.last_anchor_count,
        },
        draws,
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
