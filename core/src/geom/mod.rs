pub mod bbox;
pub mod point;

pub use self::bbox::{GeoBoundingBox, InvalidBox};
pub use self::point::{GeoPoint, OutOfRange};
