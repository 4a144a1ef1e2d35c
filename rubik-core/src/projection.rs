/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector4};

use crate::transform::{Orientation, Transform};

/// Perspective camera looking down its local -Z axis
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub rotation: Orientation,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a camera at the origin from a vertical field of view in degrees
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::origin(),
            rotation: Orientation::zero(),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Point3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Orientation) -> Self {
        self.rotation = rotation;
        self
    }

    /// World to view space: the inverse of the camera's own placement
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Transform::new(self.position, self.rotation)
            .isometry()
            .inverse()
            .to_homogeneous()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Transform a model-space point into homogeneous clip space.
    ///
    /// `w` is the view-space distance in front of the camera, so points with
    /// `w < near` lie behind the near plane.
    pub fn to_clip(&self, point: &Point3<f32>, model_matrix: &Matrix4<f32>) -> Vector4<f32> {
        let mvp = Transform::mvp_matrix(
            model_matrix,
            &self.view_matrix(),
            &self.projection_matrix(),
        );
        mvp * point.to_homogeneous()
    }

    /// Perspective divide and viewport mapping of a clip-space point with
    /// positive `w`. Returns `(x, y, depth)`.
    pub fn clip_to_screen(
        &self,
        clip: &Vector4<f32>,
        width: u32,
        height: u32,
    ) -> (f32, f32, f32) {
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        (screen_x, screen_y, depth)
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `depth` in normalized device coordinates
    /// (smaller is closer). Points outside the viewport are still returned so
    /// that partially visible triangles can be clipped by the rasterizer;
    /// points behind the near plane yield `None`.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.to_clip(point, model_matrix);
        if clip.w < self.near {
            return None;
        }
        Some(self.clip_to_screen(&clip, width, height))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75.0, 1.0, 0.1, 1000.0)
    }
}
