/// Geometry primitives used to rasterize limb boxes
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
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

    /// Calculate the face normal from the triangle's vertices
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
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Axis-aligned box centered on the origin, wound counter-clockwise when
    /// seen from outside
    pub fn cuboid(half_extents: &Vector3<f32>) -> Self {
        let mut mesh = Self::with_capacity(12);

        for normal in [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ] {
            // Two tangents spanning the face, ordered so u x v == normal
            let u = Vector3::new(normal.y, normal.z, normal.x);
            let v = normal.cross(&u);

            let corner = |a: f32, b: f32| {
                let p = normal + u * a + v * b;
                Vertex::new(Point3::from(p.component_mul(half_extents)), normal)
            };

            let (c0, c1, c2, c3) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.add_triangle(Triangle::new(c0, c1, c2));
            mesh.add_triangle(Triangle::new(c0, c2, c3));
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_faces_point_outwards() {
        let mesh = Mesh::cuboid(&Vector3::new(0.5, 1.0, 0.25));
        assert_eq!(mesh.triangles.len(), 12);

        for triangle in &mesh.triangles {
            let declared = triangle.vertices[0].normal;
            assert!((triangle.calculate_normal() - declared).norm() < 1e-5);
        }
    }

    #[test]
    fn test_cuboid_extents() {
        let half = Vector3::new(0.5, 1.0, 0.25);
        let mesh = Mesh::cuboid(&half);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                let p = vertex.position;
                assert!((p.x.abs() - half.x).abs() < 1e-6);
                assert!((p.y.abs() - half.y).abs() < 1e-6);
                assert!((p.z.abs() - half.z).abs() < 1e-6);
            }
        }
    }
}
