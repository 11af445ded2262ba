use crate::error::BuildError;
use crate::utilities::BoundingBox;
use glam::Vec3;

/// Validated tree-building input: flat positions, a triangle list and one source id per triangle.
///
/// The pools are borrowed, never modified. Triangulating any non-triangular faces is the loader's
/// job; every three consecutive indices form one triangle.
#[derive(Clone, Copy, Debug)]
pub struct MeshInput<'a> {
    vertices: &'a [f32],
    indices: &'a [u32],
    source_ids: &'a [u32],
}

impl<'a> MeshInput<'a> {
    /// Largest triangle count whose first-index ids still fit in a `u32`.
    pub const MAX_TRIANGLES: usize = (u32::MAX / 3) as usize;

    /// Checks the pools against each other once, so tree construction never has to.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Positions, three floats per vertex.
    /// * `indices` - Vertex indices, three per triangle.
    /// * `source_ids` - Culling unit of each triangle, one per triangle.
    pub fn new(
        vertices: &'a [f32],
        indices: &'a [u32],
        source_ids: &'a [u32],
    ) -> Result<Self, BuildError> {
        if vertices.len() % 3 != 0 {
            return Err(BuildError::VertexStride(vertices.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(BuildError::IndexCount(indices.len()));
        }
        let triangle_count = indices.len() / 3;
        if triangle_count > Self::MAX_TRIANGLES {
            return Err(BuildError::TooManyTriangles(triangle_count));
        }
        if source_ids.len() != triangle_count {
            return Err(BuildError::SourceIdCount {
                source_id_count: source_ids.len(),
                triangle_count,
            });
        }
        let vertex_count = vertices.len() / 3;
        if let Some((slot, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(BuildError::IndexOutOfRange {
                slot,
                index,
                vertex_count,
            });
        }
        Ok(Self {
            vertices,
            indices,
            source_ids,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &'a [f32] {
        self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    #[inline]
    pub fn source_ids(&self) -> &'a [u32] {
        self.source_ids
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of distinct culling units, assuming ids are dense: one past the largest source id.
    pub fn source_count(&self) -> usize {
        self.source_ids
            .iter()
            .max()
            .map_or(0, |&max_id| max_id as usize + 1)
    }

    #[inline]
    pub fn vertex(&self, vertex_index: u32) -> Vec3 {
        let start = vertex_index as usize * 3;
        Vec3::new(
            self.vertices[start],
            self.vertices[start + 1],
            self.vertices[start + 2],
        )
    }

    /// Gets the three corners of a triangle.
    #[inline]
    pub fn triangle(&self, triangle_id: u32) -> [Vec3; 3] {
        let first = triangle_id as usize * 3;
        [
            self.vertex(self.indices[first]),
            self.vertex(self.indices[first + 1]),
            self.vertex(self.indices[first + 2]),
        ]
    }

    #[inline]
    pub fn triangle_bounds(&self, triangle_id: u32) -> BoundingBox {
        let [a, b, c] = self.triangle(triangle_id);
        BoundingBox::from_triangle(a, b, c)
    }
}
