//! Ribbon surface instancing
//!
//! The ribbon is drawn from a single line primitive (first to last control
//! point). A geometry stage evaluates the Bezier curve from the uniform
//! control-point array, tessellates it into `generated_points_count` segments
//! and emits `no_of_instances` ribbons, `surface_width` wide, with the water
//! texture scrolled by `time * speed` and repeated `tilingFactor` times.
//! Nothing here computes geometry; it only assembles that uniform set.

use bytemuck::{Pod, Zeroable};
use river_core::{RiverParameters, Vec3, MAX_CONTROL_POINTS};

/// Uniform names bound by the ribbon shader, in declaration order.
pub const SURFACE_UNIFORM_NAMES: [&str; 8] = [
    "control_points",
    "control_point_count",
    "generated_points_count",
    "surface_width",
    "no_of_instances",
    "time",
    "speed",
    "tilingFactor",
];

/// GPU uniform block for the ribbon shader (std140-compatible).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    /// xyz = control point, w = 1
    pub control_points: [[f32; 4]; MAX_CONTROL_POINTS],
    pub control_point_count: u32,
    pub generated_points_count: u32,
    pub no_of_instances: u32,
    pub _padding: u32,
    pub surface_width: f32,
    pub time: f32,
    pub speed: f32,
    pub tiling_factor: f32,
}

/// One frame's worth of ribbon parameters, exactly as the shader consumes them
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    pub control_points: Vec<Vec3>,
    pub generated_points: u32,
    pub width: f32,
    pub instance_count: u32,
    pub time: f32,
    pub speed: f32,
    pub tiling_factor: f32,
}

impl SurfaceFrame {
    /// Pack into the uniform block. Points past the shader limit are dropped.
    pub fn uniforms(&self) -> SurfaceUniforms {
        let mut control_points = [[0.0; 4]; MAX_CONTROL_POINTS];
        let count = self.control_points.len().min(MAX_CONTROL_POINTS);
        for (slot, point) in control_points.iter_mut().zip(&self.control_points) {
            *slot = point.extend(1.0);
        }

        SurfaceUniforms {
            control_points,
            control_point_count: count as u32,
            generated_points_count: self.generated_points,
            no_of_instances: self.instance_count,
            _padding: 0,
            surface_width: self.width,
            time: self.time,
            speed: self.speed,
            tiling_factor: self.tiling_factor,
        }
    }

    /// The two-vertex line the geometry stage expands, or `None` without points
    pub fn line_vertices(&self) -> Option<[Vec3; 2]> {
        let first = *self.control_points.first()?;
        let last = *self.control_points.last()?;
        Some([first, last])
    }
}

/// Builds the ribbon's per-frame uniform set from the live river state
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfaceInstancer;

impl SurfaceInstancer {
    pub fn new() -> Self {
        Self
    }

    /// Assemble this frame's ribbon parameters.
    ///
    /// Instance count and control-point count vary independently.
    pub fn assemble(&self, points: &[Vec3], params: &RiverParameters, time: f32) -> SurfaceFrame {
        if points.len() > MAX_CONTROL_POINTS {
            log::warn!(
                "[surface] {} control points exceed the shader limit of {MAX_CONTROL_POINTS}",
                points.len()
            );
        }
        SurfaceFrame {
            control_points: points.to_vec(),
            generated_points: params.generated_points,
            width: params.river_width,
            instance_count: params.instance_count,
            time,
            speed: params.animation_speed,
            tiling_factor: params.tiling_factor,
        }
    }

    pub fn uniform_names(&self) -> &'static [&'static str] {
        &SURFACE_UNIFORM_NAMES
    }
}
