//! River Core - Foundational types for the river editor
//!
//! This crate provides the pieces every other river crate depends on:
//! - `Vec3` - Spatial vector type
//! - `bezier` - Bernstein-form Bezier evaluation and curve sampling
//! - `RiverParameters` / `RiverConfig` - Editable river settings and their TOML file
//! - Error types and Result alias

pub mod bezier;
mod error;
mod params;
mod types;

pub use bezier::{bezier_derivative, bezier_point, emission_parameters, sample_bezier, CurveSample};
pub use error::{Result, RiverError};
pub use params::{
    CameraSettings, PickPolicy, PostProcessSettings, RiverConfig, RiverParameters, SplashSettings,
    MAX_CONTROL_POINTS,
};
pub use types::Vec3;
