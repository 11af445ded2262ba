mod collections;
pub use self::collections::*;

mod memory;
pub use self::memory::*;

mod bounding_box;
pub use self::bounding_box::BoundingBox;

mod box_corners_wide;
pub use self::box_corners_wide::{BoxCornersWide, PlaneWide};

mod for_each;
pub use self::for_each::IBreakableForEach;

mod frustum_status;
pub use self::frustum_status::FrustumStatus;
