/// Geometry primitives for tile meshes
use nalgebra::{Point3, Vector3};

/// A 3D vertex. Shading uses the face normal, see [`Triangle::calculate_normal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices (counter-clockwise winding)
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Square of edge `size` in the XY plane, centered at the origin, facing +Z
    pub fn plane(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::new();

        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, 0.0),
            Vertex::new(half, -half, 0.0),
            Vertex::new(half, half, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, 0.0),
            Vertex::new(half, half, 0.0),
            Vertex::new(-half, half, 0.0),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_sets_normal() {
        let triangle = Triangle::new(
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
        );
        assert!((triangle.calculate_normal() + Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let plane = Mesh::plane(1.0);
        assert_eq!(plane.triangles.len(), 2);
        for triangle in &plane.triangles {
            assert!((triangle.calculate_normal() - Vector3::z()).norm() < 1e-6);
            for vertex in &triangle.vertices {
                assert_eq!(vertex.position.z, 0.0);
                assert_eq!(vertex.position.x.abs(), 0.5);
                assert_eq!(vertex.position.y.abs(), 0.5);
            }
        }
    }
}
