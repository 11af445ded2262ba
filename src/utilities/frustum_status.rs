/// Classification of a bounding box against a set of clip planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumStatus {
    /// Every corner of the box is on the inner side of every plane.
    In,
    /// Neither fully in nor fully outside a single plane. This is conservative: the box may
    /// still miss the frustum.
    Intersecting,
    /// Every corner of the box is on the outer side of at least one plane.
    Out,
}

impl FrustumStatus {
    /// Folds the negative-corner count of one plane into the running classification.
    /// Returns `None` once the box is known to be out, so callers can stop testing planes.
    #[inline(always)]
    pub(crate) fn accumulate(self, negative_corner_count: u32) -> Option<Self> {
        debug_assert!(negative_corner_count <= 8);
        match negative_corner_count {
            8 => None,
            0 => Some(self),
            _ => Some(FrustumStatus::Intersecting),
        }
    }
}
