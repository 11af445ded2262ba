use super::tree::Tree;
use crate::mesh::MeshInput;
use crate::utilities::BoundingBox;

impl<'a> Tree<'a> {
    fn validate_node(
        &self,
        node_id: u32,
        mesh: &MeshInput,
        visited: &mut [bool],
        covered: &mut [bool],
    ) {
        assert!(
            (node_id as usize) < self.node_count(),
            "Node {node_id} is past the end of the node array."
        );
        assert!(
            !visited[node_id as usize],
            "Node {node_id} is reachable more than once."
        );
        visited[node_id as usize] = true;

        let node = self.node(node_id);
        assert!(
            node.bounds().is_valid(),
            "Node {node_id} has an inverted bounding box {}.",
            node.bounds()
        );
        assert_eq!(
            self.corners()[node_id as usize].to_bounding_box(),
            node.bounds(),
            "Packed corners of node {node_id} do not match its bounds."
        );

        if node.is_leaf {
            assert_eq!(
                node.first_index_id % 3,
                0,
                "Leaf {node_id} does not start on a triangle boundary."
            );
            let triangle_id = node.triangle_id();
            assert!(
                (triangle_id as usize) < mesh.triangle_count(),
                "Leaf {node_id} references triangle {triangle_id}, past the end of the mesh."
            );
            assert!(
                !covered[triangle_id as usize],
                "Triangle {triangle_id} is covered by more than one leaf."
            );
            covered[triangle_id as usize] = true;
            assert_eq!(
                node.bounds(),
                mesh.triangle_bounds(triangle_id),
                "Leaf {node_id} bounds are not the bounds of triangle {triangle_id}."
            );
            assert_eq!(
                node.source_id,
                mesh.source_ids()[triangle_id as usize],
                "Leaf {node_id} has the wrong source id."
            );
        } else {
            let (left_id, right_id) = (node.left_child(), node.right_child());
            assert_eq!(right_id, left_id + 1, "Children of node {node_id} are not adjacent.");
            assert!(
                left_id > node_id,
                "Node {node_id} has a child {left_id} that precedes it."
            );
            assert!(
                (right_id as usize) < self.node_count(),
                "Node {node_id} has children past the end of the node array."
            );
            let left = self.node(left_id).bounds();
            let right = self.node(right_id).bounds();
            for (child_id, child) in [(left_id, left), (right_id, right)] {
                assert!(
                    node.bounds().contains_box(&child),
                    "Node {node_id} does not contain its child {child_id}."
                );
            }
            assert_eq!(
                node.bounds(),
                BoundingBox::create_merged_boxes(left, right),
                "Node {node_id} is not the tight union of its children."
            );
            self.validate_node(left_id, mesh, visited, covered);
            self.validate_node(right_id, mesh, visited, covered);
        }
    }

    /// Checks every structural invariant of the tree against the mesh it was built from.
    ///
    /// Each internal node must be the tight union of two adjacent children, each leaf must carry
    /// the exact bounds and source of its triangle, every triangle must be covered by exactly one
    /// leaf, and every node must be reachable exactly once from the root.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violation found.
    pub fn validate(&self, mesh: &MeshInput) {
        if self.is_empty() {
            assert_eq!(
                mesh.triangle_count(),
                0,
                "An empty tree must come from an empty mesh."
            );
            return;
        }
        assert_eq!(
            self.node_count(),
            2 * mesh.triangle_count() - 1,
            "Node count does not match the triangle count."
        );
        let mut visited = vec![false; self.node_count()];
        let mut covered = vec![false; mesh.triangle_count()];
        self.validate_node(0, mesh, &mut visited, &mut covered);
        if let Some(node_id) = visited.iter().position(|&reached| !reached) {
            panic!("Node {node_id} is not reachable from the root.");
        }
        if let Some(triangle_id) = covered.iter().position(|&found| !found) {
            panic!("Triangle {triangle_id} is not covered by any leaf.");
        }
    }

    fn measure_depth_from(&self, node_id: u32) -> usize {
        let node = self.node(node_id);
        if node.is_leaf {
            1
        } else {
            1 + self
                .measure_depth_from(node.left_child())
                .max(self.measure_depth_from(node.right_child()))
        }
    }

    /// Measures the depth of the tree by walking it from the root. An empty tree has depth 0.
    pub fn measure_depth(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.measure_depth_from(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::{build_tree, Node};
    use crate::utilities::{Arena, BoxCornersWide};
    use glam::Vec3;

    const VERTICES: [f32; 12] = [
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        4.0, 4.0, 4.0, //
    ];
    const INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

    /// Copies a built tree into `arena` after letting `edit` tamper with its nodes.
    fn tampered<'a>(arena: &'a Arena, tree: &Tree, edit: impl FnOnce(&mut [Node])) -> Tree<'a> {
        let nodes = arena.alloc_slice_fill_with(tree.node_count(), |i| tree.nodes()[i]);
        edit(nodes);
        let nodes: &'a [Node] = nodes;
        let corners = arena.alloc_slice_fill_with(nodes.len(), |i| {
            BoxCornersWide::from_bounds(nodes[i].min, nodes[i].max)
        });
        Tree::new(nodes, corners)
    }

    #[test]
    fn test_valid_tree_passes() {
        let mesh = MeshInput::new(&VERTICES, &INDICES, &[0, 1]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        tree.validate(&mesh);
        assert_eq!(tree.measure_depth(), 2);
    }

    #[test]
    #[should_panic(expected = "is not the tight union of its children")]
    fn test_loose_parent_is_detected() {
        let mesh = MeshInput::new(&VERTICES, &INDICES, &[0, 1]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        let tree = tampered(&persistent, &tree, |nodes| nodes[0].max += Vec3::ONE);
        tree.validate(&mesh);
    }

    #[test]
    #[should_panic(expected = "Node 0 does not contain its child 2")]
    fn test_shrunken_parent_is_detected() {
        let mesh = MeshInput::new(&VERTICES, &INDICES, &[0, 1]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        // the second triangle reaches out to (4, 4, 4)
        let tree = tampered(&persistent, &tree, |nodes| nodes[0].max = Vec3::ONE);
        tree.validate(&mesh);
    }

    #[test]
    #[should_panic(expected = "has the wrong source id")]
    fn test_wrong_source_is_detected() {
        let mesh = MeshInput::new(&VERTICES, &INDICES, &[0, 1]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        let tree = tampered(&persistent, &tree, |nodes| nodes[1].source_id = 9);
        tree.validate(&mesh);
    }

    #[test]
    #[should_panic(expected = "is covered by more than one leaf")]
    fn test_duplicated_triangle_is_detected() {
        let mesh = MeshInput::new(&VERTICES, &INDICES, &[0, 0]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        let tree = tampered(&persistent, &tree, |nodes| {
            nodes[2] = nodes[1];
            let merged = BoundingBox::create_merged_boxes(nodes[1].bounds(), nodes[2].bounds());
            nodes[0].min = merged.min;
            nodes[0].max = merged.max;
        });
        tree.validate(&mesh);
    }
}
