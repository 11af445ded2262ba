//! Bounding volume hierarchy over static triangle soup, with frustum-culling queries that
//! resolve per-source visibility.
//!
//! A tree is built once per static mesh set with [`build_tree`] and queried every frame with
//! [`find_triangles_intersecting_frustum`] (or one of its convenience wrappers).

pub mod culling;
pub mod error;
pub mod mesh;
pub mod trees;
pub mod utilities;

pub use culling::{
    classify_box, Classifier, ClassifierPreference, CullingConfig, DepthRange, Frustum,
};
pub use error::BuildError;
pub use mesh::MeshInput;
pub use trees::{
    build_tree, find_triangles_intersecting_frustum, find_triangles_intersecting_frustum_with,
    query_visibility, query_visibility_many, Node, Tree,
};
pub use utilities::{
    Arena, BoundingBox, BoxCornersWide, FrustumStatus, IBreakableForEach, PlaneWide, QuickList,
};
