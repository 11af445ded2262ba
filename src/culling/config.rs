/// Which frustum classification routine to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassifierPreference {
    /// Use the 8-lane path when the CPU supports it, the scalar path otherwise.
    #[default]
    Auto,
    /// Always use the scalar path.
    Scalar,
    /// Request the 8-lane path. Falls back to scalar when the CPU lacks support.
    Wide,
}

/// Clip-space depth convention of the projection the planes are extracted from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthRange {
    /// Direct3D, Metal and Vulkan style `[0, 1]` depth.
    #[default]
    ZeroToOne,
    /// OpenGL style `[-1, 1]` depth.
    NegativeOneToOne,
}

impl DepthRange {
    /// Clip-space z of the near plane.
    #[inline]
    pub fn min_z(self) -> f32 {
        match self {
            DepthRange::ZeroToOne => 0.0,
            DepthRange::NegativeOneToOne => -1.0,
        }
    }
}

/// Culling toggles, passed by value into frustum extraction.
///
/// Disabled planes are left out of the extracted [`Frustum`](super::Frustum), which widens the
/// culled volume. Useful for inspecting which plane is responsible for culling something.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullingConfig {
    /// Bit `i` set drops the plane extracted into slot `i`.
    pub disabled_planes: u32,
    /// Carried onto every frustum extracted with this config.
    pub classifier: ClassifierPreference,
}

impl CullingConfig {
    pub fn with_plane_disabled(mut self, slot: usize) -> Self {
        debug_assert!(slot < 32);
        self.disabled_planes |= 1 << slot;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierPreference) -> Self {
        self.classifier = classifier;
        self
    }

    #[inline]
    pub fn is_plane_enabled(&self, slot: usize) -> bool {
        slot >= 32 || self.disabled_planes & (1 << slot) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_toggles() {
        let config = CullingConfig::default().with_plane_disabled(1).with_plane_disabled(4);
        assert!(config.is_plane_enabled(0));
        assert!(!config.is_plane_enabled(1));
        assert!(!config.is_plane_enabled(4));
        assert!(config.is_plane_enabled(5));
        assert_eq!(config.classifier, ClassifierPreference::Auto);
    }
}
