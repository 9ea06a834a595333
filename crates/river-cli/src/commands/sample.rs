//! Curve sampling command

use super::load_config;
use anyhow::{bail, Context, Result};
use river_core::{sample_bezier, Vec3};
use river_editor::control_points::default_layout;

pub fn run(config_path: Option<&str>, points: &[[f32; 3]], count: usize) -> Result<()> {
    if count < 2 {
        bail!("--count must be at least 2, got {}", count);
    }

    let points: Vec<Vec3> = if points.is_empty() {
        let config = load_config(config_path)?;
        default_layout(config.river.control_points_count, config.camera.view_height)
    } else {
        points.iter().copied().map(Vec3::from_array).collect()
    };

    let samples = sample_bezier(&points, count);
    let json = serde_json::to_string_pretty(&samples).context("Failed to serialize samples")?;
    println!("{}", json);

    Ok(())
}
