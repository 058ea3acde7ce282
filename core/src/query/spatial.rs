use crate::geom::{GeoBoundingBox, GeoPoint};
use crate::util::units::meters_to_degrees;

use super::Clause;

/// Builds the spatial clause for a bounding box that does not cross the
/// antimeridian (callers split crossing boxes first).
///
/// If the box fits within a hemisphere, a within-geometry clause over the
/// closed polygon ring is emitted; the store evaluates it along great-circle
/// edges, which makes it the preferred representation. Otherwise the
/// always-valid but planar within-box clause over the two input corners is
/// used as the fallback.
pub fn within_bbox(field: impl Into<String>, bbox: &GeoBoundingBox) -> Clause {
    if bbox.fits_within_hemisphere() {
        Clause::WithinPolygon {
            field: field.into(),
            ring: bbox.polygon_ring().to_vec(),
        }
    } else {
        Clause::WithinBox {
            field: field.into(),
            lower_left: bbox.lower_left().position(),
            upper_right: bbox.upper_right().position(),
        }
    }
}

/// Builds a clause matching points within `radius_meters` of `center`.
/// The radius is converted with the flat-earth approximation in
/// [`meters_to_degrees`] and shares its accuracy caveats.
pub fn within_center(
    field: impl Into<String>,
    center: GeoPoint,
    radius_meters: f64,
) -> Clause {
    Clause::WithinCenter {
        field: field.into(),
        center: center.position(),
        radius_degrees: meters_to_degrees(radius_meters),
    }
}

/// Builds a clause matching points near the given one, closest first
pub fn near(field: impl Into<String>, point: GeoPoint) -> Clause {
    Clause::Near {
        field: field.into(),
        position: point.position(),
        max_distance_degrees: None,
    }
}

/// Builds a clause matching points no further than `max_meters` from the
/// given one, closest first. The distance is converted with the flat-earth
/// approximation in [`meters_to_degrees`].
pub fn near_within_meters(
    field: impl Into<String>,
    point: GeoPoint,
    max_meters: f64,
) -> Clause {
    Clause::Near {
        field: field.into(),
        position: point.position(),
        max_distance_degrees: Some(meters_to_degrees(max_meters)),
    }
}
