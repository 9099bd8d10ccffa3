/// 3D transformation matrices and orbit state
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Rotation of `angle` radians about `axis` through the origin
    pub fn axis_rotation(axis: &Vector3<f32>, angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Unit::new_normalize(*axis), angle)
    }

    /// Rotation of `angle` radians about `axis` through `pivot`
    pub fn pivot_rotation(pivot: &Point3<f32>, axis: &Vector3<f32>, angle: f32) -> Matrix4<f32> {
        let to_pivot = pivot.coords;
        Self::translation_matrix(&to_pivot)
            * Self::axis_rotation(axis, angle)
            * Self::translation_matrix(&-to_pivot)
    }

    /// Whole-model transform: uniform scale, then spin about the vertical axis
    pub fn model_matrix(spin: f32, scale: f32) -> Matrix4<f32> {
        Self::axis_rotation(&Vector3::y(), spin) * Matrix4::new_scaling(scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_pivot_stays_fixed() {
        let pivot = Point3::new(0.8, 0.6, 0.0);
        let matrix = Transform::pivot_rotation(&pivot, &Vector3::x(), 0.7);
        let moved = matrix.transform_point(&pivot);
        assert!((moved - pivot).norm() < 1e-6);

        let hand = Point3::new(0.8, -0.1, 0.0);
        let swung = matrix.transform_point(&hand);
        assert!(((swung - pivot).norm() - (hand - pivot).norm()).abs() < 1e-5);
        assert!(swung.z.abs() > 0.1);
    }

    #[test]
    fn test_model_matrix_identity_at_rest() {
        let matrix = Transform::model_matrix(0.0, 1.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);

        let scaled = Transform::model_matrix(0.0, 2.0);
        let p = scaled.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((p - Point3::new(2.0, 2.0, 2.0)).norm() < 1e-6);
    }
}
