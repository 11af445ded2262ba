use super::classify::Classifier;
use super::config::{ClassifierPreference, CullingConfig, DepthRange};
use glam::{Mat4, Vec3, Vec4};

/// A convex volume given as the intersection of up to [`Frustum::MAX_PLANES`] half-spaces.
///
/// Each plane `(a, b, c, d)` keeps the points where `a*x + b*y + c*z + d >= 0`. Planes are
/// normalized so that the xyz part has unit length.
///
/// A frustum also remembers which classification routine its queries should run, taken from the
/// [`CullingConfig`] it was extracted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: [Vec4; Frustum::MAX_PLANES],
    plane_count: usize,
    classifier: ClassifierPreference,
}

#[inline]
fn normalize_plane(plane: Vec4) -> Vec4 {
    plane / plane.truncate().length()
}

impl Frustum {
    pub const MAX_PLANES: usize = 16;

    // Slots produced by `from_view_projection`.
    pub const NEAR: usize = 0;
    pub const FAR: usize = 1;
    pub const LEFT: usize = 2;
    pub const RIGHT: usize = 3;
    pub const BOTTOM: usize = 4;
    pub const TOP: usize = 5;

    /// Creates a frustum with no planes, which contains everything.
    pub fn new() -> Self {
        Self {
            planes: [Vec4::ZERO; Self::MAX_PLANES],
            plane_count: 0,
            classifier: ClassifierPreference::Auto,
        }
    }

    /// Creates a frustum from planes that are already oriented and normalized.
    pub fn from_planes(planes: &[Vec4]) -> Self {
        let mut frustum = Self::new();
        for plane in planes {
            frustum.push_plane(*plane);
        }
        frustum
    }

    /// Appends a plane.
    ///
    /// # Panics
    ///
    /// Panics if the frustum already holds [`Frustum::MAX_PLANES`] planes.
    pub fn push_plane(&mut self, plane: Vec4) {
        assert!(
            self.plane_count < Self::MAX_PLANES,
            "A frustum holds at most {} planes.",
            Self::MAX_PLANES
        );
        self.planes[self.plane_count] = plane;
        self.plane_count += 1;
    }

    /// Extracts the six clip planes of a view-projection matrix (Gribb-Hartmann), in the slot
    /// order near, far, left, right, bottom, top. Planes disabled in `config` are skipped.
    pub fn from_view_projection(
        view_projection: Mat4,
        depth_range: DepthRange,
        config: &CullingConfig,
    ) -> Self {
        let row0 = view_projection.row(0);
        let row1 = view_projection.row(1);
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);
        let extracted = [
            Self::near_plane(row2, row3, depth_range),
            row3 - row2,
            row3 + row0,
            row3 - row0,
            row3 + row1,
            row3 - row1,
        ];

        let mut frustum = Self::new().with_classifier(config.classifier);
        for (slot, plane) in extracted.into_iter().enumerate() {
            if config.is_plane_enabled(slot) {
                frustum.push_plane(normalize_plane(plane));
            }
        }
        frustum
    }

    /// Builds the volume seen from `eye` through a convex polygon, such as a mirror or portal.
    ///
    /// Near and far come from the view-projection matrix (slots 0 and 1); every polygon edge then
    /// contributes a plane through the eye (slots 2 onward). The polygon must be wound
    /// counter-clockwise as seen from the eye.
    ///
    /// # Panics
    ///
    /// Panics if the polygon has fewer than three vertices or more than `MAX_PLANES - 2`.
    pub fn from_portal(
        view_projection: Mat4,
        depth_range: DepthRange,
        eye: Vec3,
        polygon: &[Vec3],
        config: &CullingConfig,
    ) -> Self {
        assert!(
            polygon.len() >= 3 && polygon.len() <= Self::MAX_PLANES - 2,
            "Portal polygon has {} vertices.",
            polygon.len()
        );
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);

        let mut frustum = Self::new().with_classifier(config.classifier);
        if config.is_plane_enabled(Self::NEAR) {
            frustum.push_plane(normalize_plane(Self::near_plane(row2, row3, depth_range)));
        }
        if config.is_plane_enabled(Self::FAR) {
            frustum.push_plane(normalize_plane(row3 - row2));
        }

        let mut previous = polygon[polygon.len() - 1];
        for (edge, &current) in polygon.iter().enumerate() {
            if config.is_plane_enabled(2 + edge) {
                let normal = (eye - current).cross(current - previous).normalize();
                frustum.push_plane(normal.extend(-current.dot(normal)));
            }
            previous = current;
        }
        frustum
    }

    #[inline]
    fn near_plane(row2: Vec4, row3: Vec4, depth_range: DepthRange) -> Vec4 {
        row2 - row3 * depth_range.min_z()
    }

    #[inline]
    pub fn planes(&self) -> &[Vec4] {
        &self.planes[..self.plane_count]
    }

    #[inline]
    pub fn plane_count(&self) -> usize {
        self.plane_count
    }

    pub fn with_classifier(mut self, preference: ClassifierPreference) -> Self {
        self.classifier = preference;
        self
    }

    #[inline]
    pub fn classifier_preference(&self) -> ClassifierPreference {
        self.classifier
    }

    /// Resolves the classifier queries against this frustum run.
    #[inline]
    pub fn classifier(&self) -> Classifier {
        Classifier::for_preference(self.classifier)
    }

    /// True if `point` is on the inner side of every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes()
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self::new()
    }
}
