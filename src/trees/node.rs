use crate::utilities::BoundingBox;
use glam::Vec3;

/// Node of the flat hierarchy array.
///
/// Internal nodes only store the index of their left child; the right child always sits directly
/// after it, at `lchild_id + 1`. Leaves cover exactly one triangle and record where its indices
/// start and which source it belongs to.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Minimum bounds of the bounding box
    pub min: Vec3,
    /// Index of the left child. Only meaningful for internal nodes.
    pub lchild_id: u32,
    /// Maximum bounds of the bounding box
    pub max: Vec3,
    /// Offset of the triangle's first index in the index pool. Only meaningful for leaves.
    pub first_index_id: u32,
    /// Source of the triangle. Only meaningful for leaves.
    pub source_id: u32,
    pub is_leaf: bool,
}

impl Node {
    /// Creates an internal node placeholder with the given bounds. Construction fills in the
    /// linkage afterwards.
    #[inline]
    pub fn with_bounds(bounds: BoundingBox) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    #[inline(always)]
    pub fn left_child(&self) -> u32 {
        debug_assert!(!self.is_leaf, "Leaves have no children.");
        self.lchild_id
    }

    #[inline(always)]
    pub fn right_child(&self) -> u32 {
        debug_assert!(!self.is_leaf, "Leaves have no children.");
        self.lchild_id + 1
    }

    /// Index of the leaf's triangle in the mesh, derived from its first index.
    #[inline(always)]
    pub fn triangle_id(&self) -> u32 {
        debug_assert!(self.is_leaf, "Only leaves reference a triangle.");
        self.first_index_id / 3
    }
}

impl Default for Node {
    /// Unlinked internal node with the empty-box sentinel as bounds.
    fn default() -> Self {
        Self {
            min: BoundingBox::EMPTY.min,
            lchild_id: 0,
            max: BoundingBox::EMPTY.max,
            first_index_id: 0,
            source_id: 0,
            is_leaf: false,
        }
    }
}
