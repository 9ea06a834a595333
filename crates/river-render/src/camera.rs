//! Orthographic camera and screen-to-plane projection

use glam::{Mat4, Vec4};
use river_core::{CameraSettings, Vec3};

/// Below this the pick ray counts as parallel to the editing plane.
const PLANE_EPSILON: f32 = 1e-6;

/// Window-space rectangle the projection maps onto, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// The camera collaborator the editor projects mouse positions through.
pub trait Projector {
    fn view_matrix(&self) -> Mat4;

    fn projection_matrix(&self) -> Mat4;

    fn viewport(&self) -> Viewport;

    /// Map a window point (origin bottom-left) at normalized `depth` back to world space.
    ///
    /// Depth 0 is the near plane and 1 the far plane. Returns `None` for an
    /// empty viewport or a degenerate matrix.
    fn unproject(&self, screen: [f32; 2], depth: f32) -> Option<Vec3> {
        let vp = self.viewport();
        if vp.width <= 0.0 || vp.height <= 0.0 {
            return None;
        }

        let ndc = Vec4::new(
            2.0 * (screen[0] - vp.x) / vp.width - 1.0,
            2.0 * (screen[1] - vp.y) / vp.height - 1.0,
            2.0 * depth - 1.0,
            1.0,
        );
        let inverse = (self.projection_matrix() * self.view_matrix()).inverse();
        let world = inverse * ndc;
        if world.w.abs() < f32::EPSILON {
            return None;
        }

        let p = world.truncate() / world.w;
        p.is_finite().then(|| Vec3::new(p.x, p.y, p.z))
    }
}

/// Intersect the segment `near -> far` (extended as a line) with the z = 0 plane.
pub fn intersect_ground_plane(near: Vec3, far: Vec3) -> Option<Vec3> {
    let dz = far.z - near.z;
    if dz.abs() < PLANE_EPSILON {
        return None;
    }
    let t = -near.z / dz;
    let world = near + (far - near) * t;
    world.is_finite().then_some(world)
}

/// Project a window position (pixels, y down) onto the z = 0 editing plane.
pub fn screen_to_plane<P: Projector + ?Sized>(projector: &P, x: f32, y: f32) -> Option<Vec3> {
    let vp = projector.viewport();
    let flipped = [x, vp.height - y];
    let near = projector.unproject(flipped, 0.0)?;
    let far = projector.unproject(flipped, 1.0)?;
    intersect_ground_plane(near, far)
}

/// Project a world point to window pixels (y down). `None` if it falls behind the camera.
pub fn plane_to_screen<P: Projector + ?Sized>(projector: &P, world: Vec3) -> Option<[f32; 2]> {
    let vp = projector.viewport();
    let clip = projector.projection_matrix()
        * projector.view_matrix()
        * Vec4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= 1e-3 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some([
        vp.x + (ndc_x + 1.0) * 0.5 * vp.width,
        vp.height - (vp.y + (ndc_y + 1.0) * 0.5 * vp.height),
    ])
}

/// Fixed orthographic camera looking down -z at the editing plane
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    pub settings: CameraSettings,
    viewport: Viewport,
}

impl OrthoCamera {
    pub fn new(settings: CameraSettings, width: f32, height: f32) -> Self {
        Self {
            settings,
            viewport: Viewport::new(width, height),
        }
    }

    /// Track a window resize
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Combined matrix as a column-major array for GPU upload
    pub fn view_projection_cols(&self) -> [[f32; 4]; 4] {
        (self.projection_matrix() * self.view_matrix()).to_cols_array_2d()
    }
}

impl Projector for OrthoCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(
            glam::Vec3::new(0.0, 0.0, self.settings.eye_distance),
            glam::Vec3::NEG_Z,
            glam::Vec3::Y,
        )
    }

    fn projection_matrix(&self) -> Mat4 {
        let half_w = self.settings.view_width * 0.5;
        let half_h = self.settings.view_height * 0.5;
        Mat4::orthographic_rh_gl(
            -half_w,
            half_w,
            -half_h,
            half_h,
            self.settings.near,
            self.settings.view_distance,
        )
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
