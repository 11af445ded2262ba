use super::tree::Tree;
use crate::culling::{Classifier, Frustum, PreparedPlanes};
use crate::utilities::{Arena, FrustumStatus, IBreakableForEach, QuickList};
use glam::Vec4;

/// Stack entry of the frustum traversal: a node still to visit and the classification of its
/// box.
#[derive(Clone, Copy, Debug)]
struct FrustumQueryNode {
    node_id: u32,
    status: FrustumStatus,
}

impl Default for FrustumQueryNode {
    fn default() -> Self {
        Self {
            node_id: 0,
            status: FrustumStatus::Intersecting,
        }
    }
}

impl<'a> Tree<'a> {
    #[inline(always)]
    fn classify_node(
        &self,
        classifier: &Classifier,
        planes: &PreparedPlanes,
        node_id: u32,
    ) -> FrustumStatus {
        let node = self.node(node_id);
        classifier.classify(planes, node.min, node.max, &self.corners()[node_id as usize])
    }

    /// Reports the id of every leaf whose box is not entirely outside the volume bounded by
    /// `planes`.
    ///
    /// Subtrees whose box is outside a single plane are skipped without visiting their children.
    /// Once a box is fully inside, its whole subtree is reported without further plane tests.
    /// A leaf that straddles the boundary is reported; the test is conservative and never drops
    /// a leaf that touches the volume.
    ///
    /// The root box is tested like any other, so a tree lying entirely outside the volume
    /// reports nothing. This includes a tree of a single leaf.
    ///
    /// The traversal stack is taken from `scratch` up front, sized to the node count, so the
    /// loop itself never allocates. Returning false from the enumerator stops the traversal.
    pub fn find_visible_leaves<TEnumerator: IBreakableForEach<u32>>(
        &self,
        scratch: &Arena,
        planes: &[Vec4],
        classifier: &Classifier,
        leaf_enumerator: &mut TEnumerator,
    ) {
        if self.is_empty() {
            return;
        }
        let planes = classifier.prepare(planes, scratch);
        let root_status = self.classify_node(classifier, &planes, 0);
        if root_status == FrustumStatus::Out {
            return;
        }

        // Every node is pushed at most once.
        let mut stack = QuickList::with_capacity(self.node_count(), scratch);
        stack.add_unsafely(FrustumQueryNode {
            node_id: 0,
            status: root_status,
        });
        while let Some(entry) = stack.pop() {
            let node = self.node(entry.node_id);
            if node.is_leaf {
                if !leaf_enumerator.loop_body(entry.node_id) {
                    return;
                }
            } else if entry.status == FrustumStatus::In {
                stack.add_unsafely(FrustumQueryNode {
                    node_id: node.left_child(),
                    status: FrustumStatus::In,
                });
                stack.add_unsafely(FrustumQueryNode {
                    node_id: node.right_child(),
                    status: FrustumStatus::In,
                });
            } else {
                for child_id in [node.left_child(), node.right_child()] {
                    let status = self.classify_node(classifier, &planes, child_id);
                    if status != FrustumStatus::Out {
                        stack.add_unsafely(FrustumQueryNode {
                            node_id: child_id,
                            status,
                        });
                    }
                }
            }
        }
    }
}

/// Marks `visibility[source_id]` for every source with at least one triangle that survives
/// culling against `planes`.
///
/// Entries are only ever set to true. Clear `visibility` before reusing it for another frustum,
/// or use [`query_visibility`] to get a fresh array. `visibility` must have an entry for every
/// source id in the tree.
///
/// The root box is classified before any child, so nothing is marked when the whole tree is
/// outside `planes`, even if the tree is a single leaf. Boxes are classified with
/// [`Classifier::detected`].
pub fn find_triangles_intersecting_frustum(
    scratch: &Arena,
    visibility: &mut [bool],
    tree: &Tree,
    planes: &[Vec4],
) {
    find_triangles_intersecting_frustum_with(
        scratch,
        visibility,
        tree,
        planes,
        &Classifier::detected(),
    );
}

/// Same as [`find_triangles_intersecting_frustum`], classifying boxes with `classifier`.
pub fn find_triangles_intersecting_frustum_with(
    scratch: &Arena,
    visibility: &mut [bool],
    tree: &Tree,
    planes: &[Vec4],
    classifier: &Classifier,
) {
    let nodes = tree.nodes();
    tree.find_visible_leaves(scratch, planes, classifier, &mut |leaf_id: u32| {
        visibility[nodes[leaf_id as usize].source_id as usize] = true;
        true
    });
}

/// Computes the visibility of sources `0..source_count` in `frustum` into a new array, using the
/// classifier the frustum was configured with.
pub fn query_visibility(
    scratch: &Arena,
    tree: &Tree,
    frustum: &Frustum,
    source_count: usize,
) -> Vec<bool> {
    let mut visibility = vec![false; source_count];
    find_triangles_intersecting_frustum_with(
        scratch,
        &mut visibility,
        tree,
        frustum.planes(),
        &frustum.classifier(),
    );
    visibility
}

/// Runs one visibility query per frustum, concurrently, against the same tree.
///
/// Each query runs on its own scoped thread with its own scratch arena and output array; the
/// tree is only read. Results are returned in the order of `frustums`, and each frustum is
/// classified with its own configured classifier.
pub fn query_visibility_many(
    tree: &Tree,
    frustums: &[Frustum],
    source_count: usize,
) -> Vec<Vec<bool>> {
    crossbeam_utils::thread::scope(|scope| {
        let handles: Vec<_> = frustums
            .iter()
            .map(|frustum| {
                scope.spawn(move |_| {
                    let scratch = Arena::new();
                    let mut visibility = vec![false; source_count];
                    find_triangles_intersecting_frustum_with(
                        &scratch,
                        &mut visibility,
                        tree,
                        frustum.planes(),
                        &frustum.classifier(),
                    );
                    visibility
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
