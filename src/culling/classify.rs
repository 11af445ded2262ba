use super::config::ClassifierPreference;
use crate::utilities::{Arena, BoundingBox, BoxCornersWide, FrustumStatus, PlaneWide};
use glam::{Vec3, Vec4};
use std::sync::OnceLock;

/// Classifies the box spanned by `min` and `max` against `planes`.
///
/// A plane with all eight corners strictly on its negative side makes the box
/// [`FrustumStatus::Out`] and ends the test early. If no corner is negative for any plane the box
/// is [`FrustumStatus::In`]; anything else is [`FrustumStatus::Intersecting`]. The test never
/// reports `Out` for a box that touches the volume.
pub fn classify_box(planes: &[Vec4], min: Vec3, max: Vec3) -> FrustumStatus {
    let corners = BoundingBox::new(min, max).corners();
    let mut status = FrustumStatus::In;
    for plane in planes {
        let normal = plane.truncate();
        let negative_corner_count = corners
            .iter()
            .filter(|corner| normal.dot(**corner) + plane.w < 0.0)
            .count() as u32;
        match status.accumulate(negative_corner_count) {
            Some(next) => status = next,
            None => return FrustumStatus::Out,
        }
    }
    status
}

/// Implementation backing a [`Classifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierPath {
    Scalar,
    /// Eight corners per instruction with 256-bit AVX.
    Avx,
    /// As `Avx`, with fused multiply-adds.
    AvxFma,
}

/// Planes in the forms both classification paths read.
#[derive(Clone, Copy, Debug)]
pub struct PreparedPlanes<'a> {
    pub planes: &'a [Vec4],
    /// Lane-splatted copies of `planes`. Empty when the scalar path is in use.
    pub wide: &'a [PlaneWide],
}

/// Frustum-versus-box classification with the implementation resolved once up front.
///
/// Every path returns the same classification for the same input, up to rounding in the last
/// bit of a plane evaluation when fused multiply-adds are used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classifier {
    path: ClassifierPath,
}

impl Classifier {
    pub fn new(preference: ClassifierPreference) -> Self {
        let path = match preference {
            ClassifierPreference::Scalar => ClassifierPath::Scalar,
            ClassifierPreference::Auto | ClassifierPreference::Wide => {
                let detected = Self::detect_wide_path();
                if detected.is_none() && preference == ClassifierPreference::Wide {
                    log::debug!(
                        "wide frustum classification unsupported on this cpu, using scalar"
                    );
                }
                detected.unwrap_or(ClassifierPath::Scalar)
            }
        };
        log::trace!("frustum classifier resolved to {path:?}");
        Self { path }
    }

    /// Gets the classifier for [`ClassifierPreference::Auto`], detecting cpu features on the first
    /// call only.
    pub fn detected() -> Self {
        static DETECTED: OnceLock<Classifier> = OnceLock::new();
        *DETECTED.get_or_init(|| Classifier::new(ClassifierPreference::Auto))
    }

    /// Same as [`Classifier::new`], reusing the cached detection for `Auto`.
    pub fn for_preference(preference: ClassifierPreference) -> Self {
        match preference {
            ClassifierPreference::Auto => Self::detected(),
            _ => Self::new(preference),
        }
    }

    #[inline]
    pub fn scalar() -> Self {
        Self {
            path: ClassifierPath::Scalar,
        }
    }

    #[inline]
    pub fn path(&self) -> ClassifierPath {
        self.path
    }

    #[inline]
    pub fn is_wide(&self) -> bool {
        self.path != ClassifierPath::Scalar
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_wide_path() -> Option<ClassifierPath> {
        if is_x86_feature_detected!("avx") && is_x86_feature_detected!("fma") {
            Some(ClassifierPath::AvxFma)
        } else if is_x86_feature_detected!("avx") {
            Some(ClassifierPath::Avx)
        } else {
            None
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn detect_wide_path() -> Option<ClassifierPath> {
        None
    }

    /// Converts `planes` into the forms this classifier reads, allocating from `scratch`.
    pub fn prepare<'a>(&self, planes: &'a [Vec4], scratch: &'a Arena) -> PreparedPlanes<'a> {
        let wide: &'a [PlaneWide] = if self.is_wide() {
            scratch.alloc_slice_fill_with(planes.len(), |i| PlaneWide::from_plane(planes[i]))
        } else {
            &[]
        };
        PreparedPlanes { planes, wide }
    }

    /// Classifies a box given both as a `(min, max)` pair and as packed corners; each path reads
    /// the form it needs.
    #[inline]
    pub fn classify(
        &self,
        planes: &PreparedPlanes,
        min: Vec3,
        max: Vec3,
        corners: &BoxCornersWide,
    ) -> FrustumStatus {
        match self.path {
            ClassifierPath::Scalar => classify_box(planes.planes, min, max),
            _ => self.classify_wide(planes.wide, corners),
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[inline]
    fn classify_wide(&self, planes: &[PlaneWide], corners: &BoxCornersWide) -> FrustumStatus {
        let mut status = FrustumStatus::In;
        for plane in planes {
            // Safety: wide paths are only selected after runtime feature detection.
            let negative_corner_count = unsafe {
                match self.path {
                    ClassifierPath::AvxFma => corners.negative_corner_count_fma(plane),
                    _ => corners.negative_corner_count_avx(plane),
                }
            };
            match status.accumulate(negative_corner_count) {
                Some(next) => status = next,
                None => return FrustumStatus::Out,
            }
        }
        status
    }

    #[cfg(not(target_arch = "x86_64"))]
    #[inline]
    fn classify_wide(&self, _planes: &[PlaneWide], _corners: &BoxCornersWide) -> FrustumStatus {
        unreachable!("wide classification is never selected off x86-64")
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierPreference::Auto)
    }
}
