use super::node::Node;
use crate::utilities::{Arena, BoundingBox, BoxCornersWide, QuickList};

/// Bounding volume hierarchy over a static triangle set.
///
/// The tree is a read-only view into arena memory: `nodes` is a flat array with the root at index
/// 0, and `corners[i]` holds the bounds of `nodes[i]` in the 8-lane corner encoding used by wide
/// classification. A tree can never outlive the arena it was built into, and since it is never
/// mutated after construction it can be shared freely between concurrent queries.
#[derive(Clone, Copy, Debug)]
pub struct Tree<'a> {
    nodes: &'a [Node],
    corners: &'a [BoxCornersWide],
}

impl<'a> Tree<'a> {
    pub(crate) fn new(nodes: &'a [Node], corners: &'a [BoxCornersWide]) -> Self {
        debug_assert_eq!(
            nodes.len(),
            corners.len(),
            "Every node needs a packed corner set."
        );
        Self { nodes, corners }
    }

    /// Creates a tree with no nodes. Queries against it report nothing.
    pub fn empty() -> Self {
        Self {
            nodes: &[],
            corners: &[],
        }
    }

    #[inline(always)]
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    #[inline(always)]
    pub fn corners(&self) -> &'a [BoxCornersWide] {
        self.corners
    }

    #[inline(always)]
    pub fn node(&self, node_id: u32) -> &'a Node {
        &self.nodes[node_id as usize]
    }

    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Gets the number of leaves, which is also the number of triangles the tree was built over.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        // Every internal node has exactly two children.
        (self.nodes.len() + 1) / 2
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets the bounds of everything in the tree, or [`BoundingBox::EMPTY`] for an empty tree.
    pub fn root_bounds(&self) -> BoundingBox {
        self.nodes
            .first()
            .map_or(BoundingBox::EMPTY, |root| root.bounds())
    }

    /// Gets the number of nodes on the longest root-to-leaf path, or 0 for an empty tree.
    pub fn depth(&self) -> usize {
        // Children are always appended after their parent, so one forward pass sees every parent
        // before its children.
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (node_id, node) in self.nodes.iter().enumerate() {
            let depth = if node_id == 0 { 1 } else { depths[node_id] };
            max_depth = max_depth.max(depth);
            if !node.is_leaf {
                depths[node.left_child() as usize] = depth + 1;
                depths[node.right_child() as usize] = depth + 1;
            }
        }
        max_depth
    }

    /// Collects the bounds of every node `depth` levels below the root, along with the bounds of
    /// any leaf that ends above that level. The root is at depth 0.
    ///
    /// Meant for visualizing how the hierarchy partitions space one level at a time.
    pub fn boxes_at_depth<'s>(
        &self,
        depth: usize,
        scratch: &'s Arena,
    ) -> QuickList<'s, BoundingBox> {
        let mut boxes = QuickList::new();
        if self.is_empty() {
            return boxes;
        }
        let mut stack = QuickList::with_capacity(self.node_count(), scratch);
        stack.add_unsafely((0u32, 0usize));
        while let Some((node_id, node_depth)) = stack.pop() {
            let node = self.node(node_id);
            if node_depth == depth || node.is_leaf {
                boxes.add(node.bounds(), scratch);
            } else {
                stack.add_unsafely((node.right_child(), node_depth + 1));
                stack.add_unsafely((node.left_child(), node_depth + 1));
            }
        }
        boxes
    }
}

impl Default for Tree<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshInput;
    use crate::trees::build_tree;
    use glam::Vec3;

    /// Four unit-spaced triangles in a row along x, one source each.
    fn row_of_triangles() -> (Vec<f32>, Vec<u32>, Vec<u32>) {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for i in 0..4u32 {
            let x = i as f32 * 2.0;
            vertices.extend_from_slice(&[x, 0.0, 0.0, x + 1.0, 0.0, 0.0, x, 1.0, 0.0]);
            indices.extend_from_slice(&[i * 3, i * 3 + 1, i * 3 + 2]);
        }
        (vertices, indices, vec![0, 1, 2, 3])
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root_bounds(), BoundingBox::EMPTY);
        let scratch = Arena::new();
        assert!(tree.boxes_at_depth(3, &scratch).is_empty());
    }

    #[test]
    fn test_counts_and_bounds() {
        let (vertices, indices, source_ids) = row_of_triangles();
        let mesh = MeshInput::new(&vertices, &indices, &source_ids).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);

        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.nodes().iter().filter(|node| node.is_leaf).count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(
            tree.root_bounds(),
            BoundingBox::new(Vec3::ZERO, Vec3::new(7.0, 1.0, 0.0))
        );
        for (node, corners) in tree.nodes().iter().zip(tree.corners()) {
            assert_eq!(corners.to_bounding_box(), node.bounds());
        }
    }

    #[test]
    fn test_boxes_at_depth() {
        let (vertices, indices, source_ids) = row_of_triangles();
        let mesh = MeshInput::new(&vertices, &indices, &source_ids).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);

        let root = tree.boxes_at_depth(0, &scratch);
        assert_eq!(root.as_slice(), &[tree.root_bounds()]);

        let halves = tree.boxes_at_depth(1, &scratch);
        assert_eq!(halves.len(), 2);
        assert_eq!(halves[0].max.x, 3.0);
        assert_eq!(halves[1].min.x, 4.0);

        // past the bottom of the tree only leaves remain
        let leaves = tree.boxes_at_depth(10, &scratch);
        assert_eq!(leaves.len(), 4);
        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(leaf.min.x, i as f32 * 2.0);
        }
    }
}
