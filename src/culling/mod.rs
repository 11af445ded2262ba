//! Clip planes and the classification of boxes against them.

mod classify;
pub use self::classify::{classify_box, Classifier, ClassifierPath, PreparedPlanes};

mod config;
pub use self::config::{ClassifierPreference, CullingConfig, DepthRange};

mod frustum;
pub use self::frustum::Frustum;
