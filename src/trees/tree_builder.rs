use super::node::Node;
use super::tree::Tree;
use crate::mesh::MeshInput;
use crate::utilities::{Arena, BoundingBox, BoxCornersWide, QuickList};
use glam::Vec3;

/// Construction-time view of one input triangle. Never retained past the build.
#[derive(Clone, Copy, Debug, Default)]
struct Triangle {
    min: Vec3,
    max: Vec3,
    /// Midpoint of the bounding box, not the vertex centroid. Only used to pick a side of a split.
    center: Vec3,
    first_index_id: u32,
    source_id: u32,
}

/// A contiguous run of the triangle id permutation waiting to be assigned below `node_id`.
#[derive(Clone, Copy, Debug, Default)]
struct BuildJob {
    start: usize,
    count: usize,
    node_id: u32,
    depth: usize,
}

struct BuildTreeContext<'a, 't> {
    nodes: QuickList<'a, Node>,
    persistent: &'a Arena,
    triangles: &'t [Triangle],
}

impl<'a, 't> BuildTreeContext<'a, 't> {
    fn bounds_of(&self, triangle_ids: &[u32]) -> BoundingBox {
        triangle_ids
            .iter()
            .fold(BoundingBox::EMPTY, |mut bounds, &triangle_id| {
                let triangle = &self.triangles[triangle_id as usize];
                bounds.min = bounds.min.min(triangle.min);
                bounds.max = bounds.max.max(triangle.max);
                bounds
            })
    }

    /// Turns `node_id` into a leaf for the single triangle in `triangle_ids`. The node's bounds
    /// were already set to the triangle's bounds by whoever created it.
    fn make_leaf(&mut self, triangle_ids: &[u32], node_id: u32) {
        debug_assert_eq!(triangle_ids.len(), 1);
        let triangle = &self.triangles[triangle_ids[0] as usize];
        let node = &mut self.nodes[node_id as usize];
        node.is_leaf = true;
        node.first_index_id = triangle.first_index_id;
        node.source_id = triangle.source_id;
    }

    /// Splits `triangle_ids` in two, in place, and appends a node for each half. Returns the size
    /// of the left half.
    fn split(&mut self, triangle_ids: &mut [u32], node_id: u32) -> usize {
        debug_assert!(triangle_ids.len() >= 2);
        let bounds = self.nodes[node_id as usize].bounds();
        let axis = bounds.widest_axis();
        let split_position = bounds.center()[axis];

        let mut left_count = partition(self.triangles, triangle_ids, axis, split_position);
        if left_count == 0 || left_count == triangle_ids.len() {
            // Every center fell on one side of the box midpoint. Give up on spatial locality and
            // split by position so both halves are non-empty.
            left_count = split_by_parity(triangle_ids);
        }

        let (left_ids, right_ids) = triangle_ids.split_at(left_count);
        let left_bounds = self.bounds_of(left_ids);
        let right_bounds = self.bounds_of(right_ids);

        // Nodes are addressed by index since pushing can move the backing span.
        let lchild_id = self.nodes.len() as u32;
        self.nodes[node_id as usize].lchild_id = lchild_id;
        self.nodes.add(Node::with_bounds(left_bounds), self.persistent);
        self.nodes.add(Node::with_bounds(right_bounds), self.persistent);
        left_count
    }
}

/// Hoare-style partition of `triangle_ids`: ids whose center along `axis` is below
/// `split_position` end up first. Returns how many that is.
fn partition(
    triangles: &[Triangle],
    triangle_ids: &mut [u32],
    axis: usize,
    split_position: f32,
) -> usize {
    let goes_left =
        |triangle_id: u32| triangles[triangle_id as usize].center[axis] < split_position;
    let mut left = 0;
    let mut right = triangle_ids.len();
    loop {
        while left < right && goes_left(triangle_ids[left]) {
            left += 1;
        }
        while left < right && !goes_left(triangle_ids[right - 1]) {
            right -= 1;
        }
        if left >= right {
            return left;
        }
        triangle_ids.swap(left, right - 1);
        left += 1;
        right -= 1;
    }
}

/// Splits without looking at geometry: walking inward from both ends, every odd slot of the front
/// half trades places with its mirror slot at the back. The first half ends up with `⌊n/2⌋` ids
/// and the second with `⌈n/2⌉`.
fn split_by_parity(triangle_ids: &mut [u32]) -> usize {
    let mut left = 0;
    let mut right = triangle_ids.len() - 1;
    while left < right {
        if left & 1 != 0 {
            triangle_ids.swap(left, right);
        }
        left += 1;
        right -= 1;
    }
    left
}

/// Builds a hierarchy over every triangle of `mesh`.
///
/// Nodes and their packed corners are allocated from `persistent`, which the returned tree borrows.
/// Per-triangle bounds and the working permutation of triangle ids come from `scratch` and can be
/// discarded as soon as this returns.
///
/// Each internal node splits its triangles at the midpoint of its widest axis, by the center of
/// each triangle's bounding box. When every center lands on the same side, the triangles are
/// split by their position in the node's range instead, which always terminates and keeps the
/// tree balanced.
///
/// A mesh without triangles produces an empty tree.
pub fn build_tree<'a>(persistent: &'a Arena, scratch: &Arena, mesh: &MeshInput) -> Tree<'a> {
    let triangle_count = mesh.triangle_count();
    if triangle_count == 0 {
        log::warn!("building a tree over zero triangles; the tree will be empty");
        return Tree::empty();
    }

    let source_ids = mesh.source_ids();
    let triangles = scratch.alloc_slice_fill_with(triangle_count, |triangle_id| {
        let bounds = mesh.triangle_bounds(triangle_id as u32);
        Triangle {
            min: bounds.min,
            max: bounds.max,
            center: bounds.center(),
            first_index_id: triangle_id as u32 * 3,
            source_id: source_ids[triangle_id],
        }
    });
    let triangle_ids =
        scratch.alloc_slice_fill_with(triangle_count, |triangle_id| triangle_id as u32);

    // A binary tree with one triangle per leaf has exactly 2n - 1 nodes.
    let mut context = BuildTreeContext {
        nodes: QuickList::with_capacity(2 * triangle_count - 1, persistent),
        persistent,
        triangles,
    };
    let root_bounds = context.bounds_of(triangle_ids);
    context.nodes.add(Node::with_bounds(root_bounds), persistent);

    // Explicit stack in place of recursion so that deep trees cannot exhaust the call stack. The
    // left job is always popped first, which assigns node ids in the same depth-first order a
    // recursive build would.
    let mut jobs = QuickList::with_capacity(64, scratch);
    jobs.add(
        BuildJob {
            start: 0,
            count: triangle_count,
            node_id: 0,
            depth: 1,
        },
        scratch,
    );
    let mut max_depth = 0;
    while let Some(job) = jobs.pop() {
        max_depth = max_depth.max(job.depth);
        let job_ids = &mut triangle_ids[job.start..job.start + job.count];
        if job.count == 1 {
            context.make_leaf(job_ids, job.node_id);
            continue;
        }
        let left_count = context.split(job_ids, job.node_id);
        let lchild_id = context.nodes[job.node_id as usize].lchild_id;
        jobs.add(
            BuildJob {
                start: job.start + left_count,
                count: job.count - left_count,
                node_id: lchild_id + 1,
                depth: job.depth + 1,
            },
            scratch,
        );
        jobs.add(
            BuildJob {
                start: job.start,
                count: left_count,
                node_id: lchild_id,
                depth: job.depth + 1,
            },
            scratch,
        );
    }

    let nodes: &'a [Node] = context.nodes.into_slice();
    debug_assert_eq!(nodes.len(), 2 * triangle_count - 1);
    let corners: &'a [BoxCornersWide] = persistent.alloc_slice_fill_with(nodes.len(), |node_id| {
        BoxCornersWide::from_bounds(nodes[node_id].min, nodes[node_id].max)
    });
    log::debug!(
        "built tree over {} triangles: {} nodes, depth {}",
        triangle_count,
        nodes.len(),
        max_depth
    );
    Tree::new(nodes, corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Triangle soup with every vertex drawn uniformly from a cube, sources assigned round-robin.
    fn random_soup(
        rng: &mut StdRng,
        triangle_count: usize,
        source_count: u32,
    ) -> (Vec<f32>, Vec<u32>, Vec<u32>) {
        let vertices: Vec<f32> = (0..triangle_count * 9)
            .map(|_| rng.gen_range(-50.0..50.0))
            .collect();
        let indices: Vec<u32> = (0..triangle_count as u32 * 3).collect();
        let source_ids: Vec<u32> = (0..triangle_count as u32).map(|i| i % source_count).collect();
        (vertices, indices, source_ids)
    }

    #[test]
    fn test_partition_splits_by_center() {
        let centers = [3.0f32, -1.0, 5.0, -2.0, 0.5];
        let triangles: Vec<Triangle> = centers
            .iter()
            .map(|&x| Triangle {
                center: Vec3::new(x, 0.0, 0.0),
                ..Default::default()
            })
            .collect();
        let mut ids = [0u32, 1, 2, 3, 4];
        let left_count = partition(&triangles, &mut ids, 0, 1.0);
        assert_eq!(left_count, 3);
        assert!(ids[..3].iter().all(|&id| centers[id as usize] < 1.0));
        assert!(ids[3..].iter().all(|&id| centers[id as usize] >= 1.0));
        ids.sort_unstable();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_partition_one_sided() {
        let triangles = [Triangle::default(); 3];
        let mut ids = [0u32, 1, 2];
        assert_eq!(partition(&triangles, &mut ids, 1, 0.0), 0);
        assert_eq!(partition(&triangles, &mut ids, 1, 1.0), 3);
    }

    #[test]
    fn test_split_by_parity() {
        let mut ids = [0u32, 1, 2, 3, 4, 5];
        assert_eq!(split_by_parity(&mut ids), 3);
        assert_eq!(ids, [0, 4, 2, 3, 1, 5]);

        let mut odd = [0u32, 1, 2, 3, 4];
        assert_eq!(split_by_parity(&mut odd), 2);
        assert_eq!(odd, [0, 3, 2, 1, 4]);

        let mut pair = [7u32, 9];
        assert_eq!(split_by_parity(&mut pair), 1);
        assert_eq!(pair, [7, 9]);
    }

    #[test]
    fn test_single_triangle_is_root_leaf() {
        let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 3.0];
        let mesh = MeshInput::new(&vertices, &[0, 1, 2], &[42]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);

        assert_eq!(tree.node_count(), 1);
        let root = tree.node(0);
        assert!(root.is_leaf);
        assert_eq!(root.source_id, 42);
        assert_eq!(root.first_index_id, 0);
        assert_eq!(root.bounds(), BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)));
        tree.validate(&mesh);
    }

    #[test]
    fn test_zero_triangles_gives_empty_tree() {
        let mesh = MeshInput::new(&[], &[], &[]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);
        assert!(tree.is_empty());
        tree.validate(&mesh);
    }

    #[test]
    fn test_two_quads_split_on_x() {
        #[rustfmt::skip]
        let vertices = [
            0.0, 0.0, 0.0,   1.0, 0.0, 0.0,   1.0, 1.0, 0.0,   0.0, 1.0, 0.0,
            100.0, 0.0, 0.0, 101.0, 0.0, 0.0, 101.0, 1.0, 0.0, 100.0, 1.0, 0.0,
        ];
        let indices = [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];
        let mesh = MeshInput::new(&vertices, &indices, &[0, 0, 1, 1]).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);

        assert_eq!(tree.node_count(), 7);
        let root = tree.node(0);
        assert_eq!(root.left_child(), 1);
        let (left, right) = (tree.node(1), tree.node(2));
        assert_eq!(left.bounds(), BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(
            right.bounds(),
            BoundingBox::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(101.0, 1.0, 0.0))
        );
        tree.validate(&mesh);
    }

    #[test]
    fn test_coincident_triangles_use_parity_split() {
        // identical triangles: every split is degenerate
        let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices: Vec<u32> = (0..7).flat_map(|_| [0, 1, 2]).collect();
        let source_ids: Vec<u32> = (0..7).collect();
        let mesh = MeshInput::new(&vertices, &indices, &source_ids).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let tree = build_tree(&persistent, &scratch, &mesh);

        assert_eq!(tree.node_count(), 13);
        // parity splits keep the tree balanced: 7 -> 3 + 4 -> 1 + 2, 2 + 2
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.measure_depth(), 4);
        tree.validate(&mesh);
    }

    #[test]
    fn test_random_soup_invariants() {
        let mut rng = StdRng::seed_from_u64(17);
        let (persistent, scratch) = (Arena::new(), Arena::new());
        for triangle_count in [2, 3, 10, 100, 1000] {
            let (vertices, indices, source_ids) = random_soup(&mut rng, triangle_count, 13);
            let mesh = MeshInput::new(&vertices, &indices, &source_ids).unwrap();
            let tree = build_tree(&persistent, &scratch, &mesh);
            assert_eq!(tree.node_count(), 2 * triangle_count - 1);
            assert_eq!(tree.leaf_count(), triangle_count);
            assert_eq!(tree.depth(), tree.measure_depth());
            tree.validate(&mesh);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(99);
        let (vertices, indices, source_ids) = random_soup(&mut rng, 500, 7);
        let mesh = MeshInput::new(&vertices, &indices, &source_ids).unwrap();
        let (persistent, scratch) = (Arena::new(), Arena::new());
        let first = build_tree(&persistent, &scratch, &mesh);
        let second = build_tree(&persistent, &scratch, &mesh);
        assert_eq!(first.nodes(), second.nodes());
        assert_eq!(first.corners(), second.corners());
    }

    #[test]
    fn test_nodes_survive_scratch_reset() {
        let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0];
        let indices = [0, 1, 2, 1, 2, 3];
        let mesh = MeshInput::new(&vertices, &indices, &[0, 1]).unwrap();
        let persistent = Arena::new();
        let mut scratch = Arena::new();
        let tree = build_tree(&persistent, &scratch, &mesh);
        scratch.reset();
        scratch.alloc_slice_fill_copy(1024, 0xffu8);
        assert_eq!(tree.node_count(), 3);
        tree.validate(&mesh);
    }
}
