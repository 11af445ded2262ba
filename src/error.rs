/// Reasons a mesh cannot be accepted as tree-building input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("vertex pool holds {0} floats, which is not a whole number of 3d positions")]
    VertexStride(usize),
    #[error("index pool holds {0} indices, which is not a whole number of triangles")]
    IndexCount(usize),
    #[error("index {index} at slot {slot} is past the end of {vertex_count} vertices")]
    IndexOutOfRange {
        slot: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("got {source_id_count} source ids for {triangle_count} triangles")]
    SourceIdCount {
        source_id_count: usize,
        triangle_count: usize,
    },
    #[error("{0} triangles exceed the addressable id range")]
    TooManyTriangles(usize),
}
