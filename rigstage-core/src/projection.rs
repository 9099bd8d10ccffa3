/// Camera, viewport view modes and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::RigError;
use crate::transform::{RotationState, Transform};

const MIN_DISTANCE: f32 = 1.5;
const MAX_DISTANCE: f32 = 40.0;
const ZOOM_FACTOR: f32 = 0.8;
/// Keeps the orbiting camera away from the poles, where `up` degenerates
const MAX_PITCH: f32 = 1.4;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Where the viewport camera looks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Perspective,
    Top,
    Front,
    Side,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Perspective,
        ViewMode::Top,
        ViewMode::Front,
        ViewMode::Side,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Perspective => "perspective",
            ViewMode::Top => "top",
            ViewMode::Front => "front",
            ViewMode::Side => "side",
        }
    }

    pub fn projection(&self) -> ProjectionMode {
        match self {
            ViewMode::Perspective => ProjectionMode::Perspective,
            _ => ProjectionMode::Orthographic,
        }
    }

    /// Unit direction from the target towards the camera
    fn eye_direction(&self) -> Vector3<f32> {
        match self {
            ViewMode::Perspective => Vector3::new(0.45, 0.3, 1.0).normalize(),
            ViewMode::Top => Vector3::y(),
            ViewMode::Front => Vector3::z(),
            ViewMode::Side => Vector3::x(),
        }
    }

    fn up(&self) -> Vector3<f32> {
        match self {
            ViewMode::Top => -Vector3::z(),
            _ => Vector3::y(),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = RigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RigError::UnknownViewMode(name.to_string()))
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub view: ViewMode,
    pub distance: f32,
    /// Orbit applied on top of the view direction (perspective view only)
    pub orbit: RotationState,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Point3::new(0.0, -0.5, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            view: ViewMode::Perspective,
            distance: 6.0,
            orbit: RotationState::zero(),
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.view.projection()
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn zoom_in(&mut self) {
        self.distance = (self.distance * ZOOM_FACTOR).max(MIN_DISTANCE);
    }

    pub fn zoom_out(&mut self) {
        self.distance = (self.distance / ZOOM_FACTOR).min(MAX_DISTANCE);
    }

    /// Orbit the perspective camera around its target
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.orbit.rotate(pitch, yaw, 0.0);
        self.orbit.x = self.orbit.x.clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn position(&self) -> Point3<f32> {
        let direction = match self.view {
            ViewMode::Perspective => Transform::rotation_matrix(&self.orbit)
                .transform_vector(&self.view.eye_direction()),
            _ => self.view.eye_direction(),
        };
        self.target + direction * self.distance
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.view.up())
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode() {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards, or `None` for points
    /// behind the camera or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = Transform::mvp_matrix(model_matrix, &self.view_matrix(), &self.projection_matrix());

        // Transform to clip space
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero w (points on or behind the eye plane)
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(camera: &Camera, point: Point3<f32>) -> (f32, f32, f32) {
        camera
            .project_to_screen(&point, &Matrix4::identity(), 800, 600)
            .expect("point should be visible")
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode(), ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_center_in_every_view() {
        let mut camera = Camera::new(800, 600);
        for view in ViewMode::ALL {
            camera.set_view(view);
            let (x, y, _) = project(&camera, camera.target);
            assert!((x - 400.0).abs() < 1e-2, "{view}: x = {x}");
            assert!((y - 300.0).abs() < 1e-2, "{view}: y = {y}");
        }
    }

    #[test]
    fn test_orthographic_views() {
        let mut camera = Camera::new(800, 600);

        camera.set_view(ViewMode::Front);
        assert_eq!(camera.mode(), ProjectionMode::Orthographic);
        let (_, above, _) = project(&camera, camera.target + Vector3::y());
        assert!(above < 300.0);

        camera.set_view(ViewMode::Top);
        let (right, _, _) = project(&camera, camera.target + Vector3::x());
        assert!(right > 400.0);
        let (_, far, _) = project(&camera, camera.target - Vector3::z());
        assert!(far < 300.0);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = Camera::new(800, 600);
        let behind = camera.position() + (camera.position() - camera.target);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut camera = Camera::new(800, 600);
        for _ in 0..50 {
            camera.zoom_in();
        }
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..50 {
            camera.zoom_out();
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = Camera::new(800, 600);
        camera.orbit(0.3, 5.0);
        assert_eq!(camera.orbit.x, MAX_PITCH);
        assert!((camera.orbit.y - 0.3).abs() < 1e-6);
        assert!(((camera.position() - camera.target).norm() - camera.distance).abs() < 1e-4);
    }

    #[test]
    fn test_view_mode_names() {
        assert_eq!("Top".parse::<ViewMode>().unwrap(), ViewMode::Top);
        assert_eq!(" side ".parse::<ViewMode>().unwrap(), ViewMode::Side);
        assert!(matches!(
            "iso".parse::<ViewMode>(),
            Err(RigError::UnknownViewMode(_))
        ));
    }
}
