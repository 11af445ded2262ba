#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::utilities::bounding_box::BoundingBox;
use glam::{Vec3, Vec4};

/// The eight corners of a bounding box, stored one corner per lane.
///
/// Lane `i` holds corner `i` of [`BoundingBox::corners`]: x alternates min/max every lane, y every
/// two lanes and z every four lanes. A plane can then be evaluated at all corners with one
/// multiply-add per axis.
#[repr(C, align(32))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCornersWide {
    pub x: [f32; 8],
    pub y: [f32; 8],
    pub z: [f32; 8],
}

impl BoxCornersWide {
    /// Packs the corners of the box spanned by `min` and `max`.
    #[inline]
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        Self {
            x: [min.x, max.x, min.x, max.x, min.x, max.x, min.x, max.x],
            y: [min.y, min.y, max.y, max.y, min.y, min.y, max.y, max.y],
            z: [min.z, min.z, min.z, min.z, max.z, max.z, max.z, max.z],
        }
    }

    /// Recovers the `(min, max)` pair the corners were packed from.
    #[inline]
    pub fn to_bounds(&self) -> (Vec3, Vec3) {
        (
            Vec3::new(self.x[0], self.y[0], self.z[0]),
            Vec3::new(self.x[7], self.y[7], self.z[7]),
        )
    }

    #[inline]
    pub fn to_bounding_box(&self) -> BoundingBox {
        let (min, max) = self.to_bounds();
        BoundingBox::new(min, max)
    }

    /// Counts the corners strictly on the negative side of `plane` using 256-bit lanes.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx")]
    #[inline]
    pub unsafe fn negative_corner_count_avx(&self, plane: &PlaneWide) -> u32 {
        let vx = _mm256_load_ps(self.x.as_ptr());
        let vy = _mm256_load_ps(self.y.as_ptr());
        let vz = _mm256_load_ps(self.z.as_ptr());
        let (px, py) = (_mm256_load_ps(plane.x.as_ptr()), _mm256_load_ps(plane.y.as_ptr()));
        let (pz, pw) = (_mm256_load_ps(plane.z.as_ptr()), _mm256_load_ps(plane.w.as_ptr()));
        let dot_x = _mm256_add_ps(_mm256_mul_ps(vx, px), pw);
        let dot_xy = _mm256_add_ps(_mm256_mul_ps(vy, py), dot_x);
        let dot = _mm256_add_ps(_mm256_mul_ps(vz, pz), dot_xy);
        Self::count_negative_lanes(dot)
    }

    /// Same as [`BoxCornersWide::negative_corner_count_avx`], fusing each multiply-add.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX and FMA.
    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx,fma")]
    #[inline]
    pub unsafe fn negative_corner_count_fma(&self, plane: &PlaneWide) -> u32 {
        let vx = _mm256_load_ps(self.x.as_ptr());
        let vy = _mm256_load_ps(self.y.as_ptr());
        let vz = _mm256_load_ps(self.z.as_ptr());
        let (px, py) = (_mm256_load_ps(plane.x.as_ptr()), _mm256_load_ps(plane.y.as_ptr()));
        let (pz, pw) = (_mm256_load_ps(plane.z.as_ptr()), _mm256_load_ps(plane.w.as_ptr()));
        let dot_x = _mm256_fmadd_ps(vx, px, pw);
        let dot_xy = _mm256_fmadd_ps(vy, py, dot_x);
        let dot = _mm256_fmadd_ps(vz, pz, dot_xy);
        Self::count_negative_lanes(dot)
    }

    // Compares rather than reading raw sign bits so that -0.0 is not counted as outside.
    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx")]
    #[inline]
    unsafe fn count_negative_lanes(dot: __m256) -> u32 {
        let negative = _mm256_cmp_ps::<_CMP_LT_OQ>(dot, _mm256_setzero_ps());
        (_mm256_movemask_ps(negative) as u32).count_ones()
    }
}

impl Default for BoxCornersWide {
    fn default() -> Self {
        Self::from_bounds(BoundingBox::EMPTY.min, BoundingBox::EMPTY.max)
    }
}

impl From<BoundingBox> for BoxCornersWide {
    fn from(bounds: BoundingBox) -> Self {
        Self::from_bounds(bounds.min, bounds.max)
    }
}

/// A plane `(a, b, c, d)` splatted across eight lanes.
#[repr(C, align(32))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneWide {
    pub x: [f32; 8],
    pub y: [f32; 8],
    pub z: [f32; 8],
    pub w: [f32; 8],
}

impl PlaneWide {
    #[inline]
    pub fn from_plane(plane: Vec4) -> Self {
        Self {
            x: [plane.x; 8],
            y: [plane.y; 8],
            z: [plane.z; 8],
            w: [plane.w; 8],
        }
    }
}

impl Default for PlaneWide {
    fn default() -> Self {
        Self::from_plane(Vec4::ZERO)
    }
}
