//! River parameters and the `river.toml` configuration file
//!
//! Every field is defaulted, so a config file only needs the values it
//! overrides:
//!
//! ```toml
//! [river]
//! river_width = 1.5
//! pick_policy = "nearest"
//!
//! [postprocess]
//! effects = ["bloom", "ripple"]
//! ```

use crate::{Result, RiverError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum number of control points the ribbon shader accepts.
pub const MAX_CONTROL_POINTS: usize = 16;

/// How a click resolves when several control points lie within the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPolicy {
    /// The last qualifying point in sequence order wins.
    #[default]
    LastMatch,
    /// The closest qualifying point wins.
    Nearest,
}

/// Live-editable river settings, read every frame by the instancer and the splash effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverParameters {
    pub control_points_count: usize,
    /// Step size for width/tiling (per second held) and flow speed (per press).
    pub smoothness: f32,
    /// Flow rate of the water texture, clamped to `[0, max_animation_speed]`.
    pub animation_speed: f32,
    pub max_animation_speed: f32,
    pub tiling_factor: f32,
    pub river_width: f32,
    pub click_distance_threshold: f32,
    /// Tessellation resolution of each ribbon instance.
    pub generated_points: u32,
    pub instance_count: u32,
    pub pick_policy: PickPolicy,
}

impl Default for RiverParameters {
    fn default() -> Self {
        Self {
            control_points_count: 4,
            smoothness: 0.5,
            animation_speed: 0.1,
            max_animation_speed: 2.0,
            tiling_factor: 3.0,
            river_width: 1.0,
            click_distance_threshold: 0.2,
            generated_points: 30,
            instance_count: 1,
            pick_policy: PickPolicy::LastMatch,
        }
    }
}

impl RiverParameters {
    /// Change the river width, never letting it go negative.
    pub fn adjust_width(&mut self, delta: f32) {
        self.river_width = (self.river_width + delta).max(0.0);
    }

    pub fn adjust_tiling(&mut self, delta: f32) {
        self.tiling_factor += delta;
    }

    /// Step the flow speed up by `smoothness`. Returns true if the value changed.
    pub fn increase_flow(&mut self) -> bool {
        self.set_animation_speed(self.animation_speed + self.smoothness)
    }

    /// Step the flow speed down by `smoothness`. Returns true if the value changed.
    pub fn decrease_flow(&mut self) -> bool {
        self.set_animation_speed(self.animation_speed - self.smoothness)
    }

    /// Set the flow speed, clamped to `[0, max_animation_speed]`.
    pub fn set_animation_speed(&mut self, speed: f32) -> bool {
        let clamped = speed.clamp(0.0, self.max_animation_speed.max(0.0));
        let changed = clamped != self.animation_speed;
        self.animation_speed = clamped;
        changed
    }

    pub fn validate(&self) -> Result<()> {
        if self.control_points_count == 0 {
            return Err(out_of_range(
                "control_points_count",
                1.0,
                MAX_CONTROL_POINTS as f64,
                0.0,
            ));
        }
        if self.control_points_count > MAX_CONTROL_POINTS {
            return Err(RiverError::TooManyControlPoints {
                count: self.control_points_count,
                max: MAX_CONTROL_POINTS,
            });
        }
        if self.max_animation_speed < 0.0 {
            return Err(out_of_range(
                "max_animation_speed",
                0.0,
                f64::MAX,
                self.max_animation_speed as f64,
            ));
        }
        if !(0.0..=self.max_animation_speed).contains(&self.animation_speed) {
            return Err(out_of_range(
                "animation_speed",
                0.0,
                self.max_animation_speed as f64,
                self.animation_speed as f64,
            ));
        }
        if self.river_width < 0.0 {
            return Err(out_of_range("river_width", 0.0, f64::MAX, self.river_width as f64));
        }
        if self.click_distance_threshold < 0.0 {
            return Err(out_of_range(
                "click_distance_threshold",
                0.0,
                f64::MAX,
                self.click_distance_threshold as f64,
            ));
        }
        if self.generated_points < 2 {
            return Err(out_of_range(
                "generated_points",
                2.0,
                u32::MAX as f64,
                self.generated_points as f64,
            ));
        }
        if self.instance_count == 0 {
            return Err(out_of_range("instance_count", 1.0, u32::MAX as f64, 0.0));
        }
        Ok(())
    }
}

fn out_of_range(field: &str, min: f64, max: f64, value: f64) -> RiverError {
    RiverError::ValueOutOfRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}

/// Orthographic view settings for the reference camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub view_width: f32,
    pub view_height: f32,
    pub near: f32,
    pub view_distance: f32,
    /// Distance of the eye from the z = 0 editing plane.
    pub eye_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            view_width: 16.0,
            view_height: 9.0,
            near: 0.01,
            view_distance: 100.0,
            eye_distance: 5.0,
        }
    }
}

/// Post-processing chain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessSettings {
    /// Ordered effect names cycled through by the post-process key.
    pub effects: Vec<String>,
    /// Oscillation frequency handed to time-driven effects.
    pub frequency: f32,
    pub intensity: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            effects: vec![
                "bloom".to_string(),
                "blur".to_string(),
                "ripple".to_string(),
                "grayscale".to_string(),
            ],
            frequency: 2.0,
            intensity: 1.0,
        }
    }
}

/// How the splash pool is derived from the river parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashSettings {
    /// Particles per unit of width per unit of flow speed.
    pub density: f32,
    pub fall_speed_factor: f32,
    pub size_factor: f32,
    /// First emission parameter on the curve, keeping splashes off the source point.
    pub emission_offset: f32,
    pub seed: u32,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            density: 10.0,
            fall_speed_factor: 2.5,
            size_factor: 0.1,
            emission_offset: 0.05,
            seed: 0xDEAD_BEEF,
        }
    }
}

/// Top-level `river.toml` structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    pub river: RiverParameters,
    pub camera: CameraSettings,
    pub postprocess: PostProcessSettings,
    pub splash: SplashSettings,
}

impl RiverConfig {
    /// Load and validate a config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RiverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.river.validate()?;
        if self.camera.view_width <= 0.0 || self.camera.view_height <= 0.0 {
            return Err(out_of_range(
                "camera.view_height",
                f64::MIN_POSITIVE,
                f64::MAX,
                self.camera.view_width.min(self.camera.view_height) as f64,
            ));
        }
        if self.camera.near >= self.camera.view_distance {
            return Err(out_of_range(
                "camera.near",
                0.0,
                self.camera.view_distance as f64,
                self.camera.near as f64,
            ));
        }
        if self.splash.density < 0.0 {
            return Err(out_of_range("splash.density", 0.0, f64::MAX, self.splash.density as f64));
        }
        Ok(())
    }
}
