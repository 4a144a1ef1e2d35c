/// Euler orientations and model transforms
use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Euler angles in radians, applied in XYZ order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub rx: f32,
    pub ry: f32,
    pub rz: f32,
}

impl Orientation {
    pub fn new(rx: f32, ry: f32, rz: f32) -> Self {
        Self { rx, ry, rz }
    }

    pub fn zero() -> Self {
        Self {
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
        }
    }

    /// Rotation matrix `Rx * Ry * Rz`, so the Z rotation is applied first
    pub fn rotation(&self) -> Rotation3<f32> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rx);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.ry);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.rz);

        rx * ry * rz
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f32; 3]> for Orientation {
    fn from([rx, ry, rz]: [f32; 3]) -> Self {
        Self::new(rx, ry, rz)
    }
}

/// Placement of an object in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: Orientation,
}

impl Transform {
    pub fn new(position: Point3<f32>, rotation: Orientation) -> Self {
        Self { position, rotation }
    }

    /// Rigid motion taking local coordinates to world coordinates
    pub fn isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(
            Translation3::from(self.position.coords),
            UnitQuaternion::from_rotation_matrix(&self.rotation.rotation()),
        )
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.isometry().to_homogeneous()
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

impl Default for Transform {
    fn default() -> Self {
        Self::new(Point3::origin(), Orientation::zero())
    }
}
