mod node;
pub use self::node::Node;

mod tree;
pub use self::tree::Tree;

mod tree_builder;
pub use self::tree_builder::build_tree;

mod tree_diagnostics;

mod tree_frustum_query;
pub use self::tree_frustum_query::{
    find_triangles_intersecting_frustum, find_triangles_intersecting_frustum_with,
    query_visibility, query_visibility_many,
};
