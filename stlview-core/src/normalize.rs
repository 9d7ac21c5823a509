//! Bounding, centering and scaling of loaded meshes for display

use log::debug;
use nalgebra::Vector3;

use crate::geometry::Mesh;

/// Axis-aligned bounds of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// Componentwise extrema of `points`, or `None` when there are no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |bounds, p| Self {
            min: bounds.min.inf(&p),
            max: bounds.max.sup(&p),
        }))
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Length of the longest side
    pub fn max_extent(&self) -> f32 {
        self.extent().max()
    }
}

/// Translation and uniform scale that fit a mesh into the [-1, 1] view volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationTransform {
    pub center: Vector3<f32>,
    pub scale: f32,
}

impl NormalizationTransform {
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let max_extent = bounds.max_extent();
        let scale = if max_extent > 0.0 { 2.0 / max_extent } else { 1.0 };
        Self {
            center: bounds.center(),
            scale,
        }
    }
}

impl Default for NormalizationTransform {
    fn default() -> Self {
        Self {
            center: Vector3::zeros(),
            scale: 1.0,
        }
    }
}

/// Flattened, origin-centered geometry ready for upload.
///
/// `vertices` are already translated by `-transform.center`; the scale is
/// left for the consumer's model matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMesh {
    pub vertices: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub transform: NormalizationTransform,
    /// Bounds before centering
    pub bounds: BoundingBox,
}

impl NormalizedMesh {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Flatten `mesh` into per-vertex arrays with face normals and center it.
pub fn normalize(mesh: &Mesh) -> NormalizedMesh {
    let mut vertices = Vec::with_capacity(mesh.len() * 3);
    let mut normals = Vec::with_capacity(mesh.len() * 3);
    for triangle in &mesh.triangles {
        vertices.extend(triangle.vertices());
        normals.extend([triangle.normal; 3]);
    }

    // Only an empty mesh has no bounds; parsed meshes never are.
    let bounds = BoundingBox::from_points(vertices.iter().copied()).unwrap_or(BoundingBox {
        min: Vector3::zeros(),
        max: Vector3::zeros(),
    });
    let transform = NormalizationTransform::from_bounds(&bounds);

    for vertex in &mut vertices {
        *vertex -= transform.center;
    }

    debug!(
        "normalized {} vertices: center {:?}, scale {}",
        vertices.len(),
        transform.center,
        transform.scale
    );

    NormalizedMesh {
        vertices,
        normals,
        transform,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;

    #[test]
    fn test_bounding_box_empty() {
        assert_eq!(BoundingBox::from_points(Vec::new()), None);
    }

    #[test]
    fn test_bounding_box_extrema() {
        let bounds = BoundingBox::from_points(vec![
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(-1.0, 5.0, 0.0),
            Vector3::new(0.0, 0.0, 7.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 5.0, 7.0));
        assert_eq!(bounds.max_extent(), 7.0);
    }

    #[test]
    fn test_flattening_repeats_face_normal() {
        let mesh = Mesh::cube(3.0, Vector3::new(1.0, 2.0, 3.0));
        let normalized = normalize(&mesh);
        assert_eq!(normalized.vertices.len(), 3 * mesh.len());
        assert_eq!(normalized.normals.len(), 3 * mesh.len());
        for (i, triangle) in mesh.triangles.iter().enumerate() {
            assert_eq!(normalized.normals[3 * i], triangle.normal);
            assert_eq!(normalized.normals[3 * i + 1], triangle.normal);
            assert_eq!(normalized.normals[3 * i + 2], triangle.normal);
        }
    }

    #[test]
    fn test_cube_scale_and_centering() {
        let mesh = Mesh::cube(10.0, Vector3::new(-40.0, 12.5, 300.0));
        let normalized = normalize(&mesh);
        assert!((normalized.transform.scale - 0.2).abs() < 1e-6);
        assert!((normalized.transform.center - Vector3::new(-40.0, 12.5, 300.0)).norm() < 1e-4);

        let centered = BoundingBox::from_points(normalized.vertices.iter().copied()).unwrap();
        assert!(centered.center().norm() < 1e-4);
    }

    #[test]
    fn test_single_point_mesh_has_unit_scale() {
        let p = Vector3::new(4.0, 4.0, 4.0);
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(Vector3::zeros(), p, p, p));
        mesh.add_triangle(Triangle::new(Vector3::zeros(), p, p, p));

        let normalized = normalize(&mesh);
        assert_eq!(normalized.transform.scale, 1.0);
        assert!(normalized.vertices.iter().all(|v| *v == Vector3::zeros()));
        assert!(normalized.normals.iter().all(|n| !n.x.is_nan()));
    }

    #[test]
    fn test_flat_mesh_scales_by_largest_side() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ));
        let normalized = normalize(&mesh);
        assert_eq!(normalized.transform.scale, 0.5);
        assert_eq!(normalized.transform.center, Vector3::new(2.0, 0.5, 0.0));
    }
}
