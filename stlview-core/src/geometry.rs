//! Geometry primitives for loaded STL meshes

use nalgebra::Vector3;

/// A triangular face with a single face normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub normal: Vector3<f32>,
    pub v1: Vector3<f32>,
    pub v2: Vector3<f32>,
    pub v3: Vector3<f32>,
}

impl Triangle {
    /// Build a triangle, replacing an all-zero `normal` with the one implied
    /// by the vertex winding.
    pub fn new(normal: Vector3<f32>, v1: Vector3<f32>, v2: Vector3<f32>, v3: Vector3<f32>) -> Self {
        let mut triangle = Self { normal, v1, v2, v3 };
        if triangle.normal.norm_squared() == 0.0 {
            triangle.normal = triangle.calculate_normal();
        }
        triangle
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Zero-area triangles have no defined direction and yield the zero
    /// vector, as do triangles whose cross product overflows `f32`.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let edge1 = self.v2 - self.v1;
        let edge2 = self.v3 - self.v1;

        let cross = edge1.cross(&edge2);
        if !cross.iter().all(|c| c.is_finite()) {
            return Vector3::zeros();
        }
        cross.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// True when the triangle carries no usable normal (zero area and no
    /// normal in the source data).
    pub fn is_degenerate(&self) -> bool {
        self.normal.norm_squared() == 0.0
    }

    pub fn vertices(&self) -> [Vector3<f32>; 3] {
        [self.v1, self.v2, self.v3]
    }
}

/// A 3D mesh composed of triangles, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn degenerate_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_degenerate()).count()
    }

    /// Axis-aligned cube of edge length `size` centered at `center`,
    /// wound counter-clockwise when viewed from outside.
    pub fn cube(size: f32, center: Vector3<f32>) -> Self {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| center + Vector3::new(x * h, y * h, z * h);
        // (outward normal, four corners counter-clockwise)
        let faces: [(Vector3<f32>, [(f32, f32, f32); 4]); 6] = [
            (Vector3::z(), [(-1., -1., 1.), (1., -1., 1.), (1., 1., 1.), (-1., 1., 1.)]),
            (-Vector3::z(), [(-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.), (1., -1., -1.)]),
            (Vector3::y(), [(-1., 1., -1.), (-1., 1., 1.), (1., 1., 1.), (1., 1., -1.)]),
            (-Vector3::y(), [(-1., -1., -1.), (1., -1., -1.), (1., -1., 1.), (-1., -1., 1.)]),
            (Vector3::x(), [(1., -1., -1.), (1., 1., -1.), (1., 1., 1.), (1., -1., 1.)]),
            (-Vector3::x(), [(-1., -1., -1.), (-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.)]),
        ];

        let mut mesh = Self::with_capacity(12);
        for (normal, quad) in faces {
            let [a, b, c, d] = quad.map(|(x, y, z)| corner(x, y, z));
            mesh.add_triangle(Triangle::new(normal, a, b, c));
            mesh.add_triangle(Triangle::new(normal, a, c, d));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_normal_is_recomputed() {
        let triangle = Triangle::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(triangle.normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_supplied_normal_is_kept() {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let triangle = Triangle::new(
            normal,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(triangle.normal, normal);
    }

    #[test]
    fn test_degenerate_triangle_keeps_zero_normal() {
        let p = Vector3::new(2.0, 2.0, 2.0);
        let triangle = Triangle::new(Vector3::zeros(), p, p, p);
        assert!(triangle.is_degenerate());
        assert!(!triangle.normal.x.is_nan());
    }

    #[test]
    fn test_overflowing_cross_product_gives_zero_normal() {
        let triangle = Triangle::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::new(3.0e38, 0.0, 0.0),
            Vector3::new(0.0, 3.0e38, 0.0),
        );
        assert_eq!(triangle.normal, Vector3::zeros());
        assert!(triangle.is_degenerate());
    }

    #[test]
    fn test_cube_normals_match_winding() {
        let cube = Mesh::cube(2.0, Vector3::zeros());
        assert_eq!(cube.len(), 12);
        for triangle in &cube.triangles {
            let computed = triangle.calculate_normal();
            assert!((computed - triangle.normal).norm() < 1e-6);
        }
    }
}
