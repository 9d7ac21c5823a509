//! stlview core library - STL loading, normalization and view math
//!
//! Loading is a single blocking call that returns either a complete mesh or
//! a `LoadError`; normalization is a pure function of the loaded mesh.

pub mod error;
pub mod geometry;
pub mod normalize;
pub mod projection;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use error::LoadError;
pub use geometry::{Mesh, Triangle};
pub use normalize::{normalize, BoundingBox, NormalizationTransform, NormalizedMesh};
pub use projection::{Camera, ProjectionMode};
pub use stl::{load as load_mesh, StlFormat};
pub use transform::{Transform, ViewControls};
