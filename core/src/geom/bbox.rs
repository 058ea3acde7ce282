use thiserror::Error;

use super::point::GeoPoint;

/// Longitude used in place of ±180° when a split half ends at the
/// antimeridian. The store rejects exactly ±180° as a degenerate longitude,
/// so split halves must stop just short of it.
pub const ANTIMERIDIAN_LON: f64 = 179.99999;

/// A bounding box construction invariant was violated
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidBox {
    /// Both corners are the same point
    #[error("bounding box is a single point")]
    SinglePoint,

    /// The corners share a latitude or a longitude, describing a line
    #[error("latitude or longitude of both corners are the same")]
    SameLatitudeOrLongitude,

    /// Both corners are exactly (0, 0), the unset-default sentinel
    #[error("both corners are (0, 0)")]
    BothCornersZero,
}

/// A bounding box given by a lower left and an upper right corner, with the
/// upper left and lower right corners derived at construction.
///
/// The box is immutable: the derived corners are computed once and all
/// operations are pure functions over the four corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    lower_left: GeoPoint,
    upper_right: GeoPoint,
    upper_left: GeoPoint,
    lower_right: GeoPoint,
}

impl GeoBoundingBox {
    /// Creates a bounding box from its lower left and upper right corners.
    ///
    /// Fails if the corners are identical, share a latitude or longitude,
    /// or are both exactly (0, 0).
    pub fn new(lower_left: GeoPoint, upper_right: GeoPoint) -> Result<Self, InvalidBox> {
        if lower_left == upper_right {
            return Err(InvalidBox::SinglePoint);
        }

        if lower_left.latitude() == upper_right.latitude()
            || lower_left.longitude() == upper_right.longitude()
        {
            return Err(InvalidBox::SameLatitudeOrLongitude);
        }

        if lower_left.is_zero() && upper_right.is_zero() {
            return Err(InvalidBox::BothCornersZero);
        }

        Ok(Self {
            lower_left,
            upper_right,
            upper_left: GeoPoint::from_validated(upper_right.latitude(), lower_left.longitude()),
            lower_right: GeoPoint::from_validated(lower_left.latitude(), upper_right.longitude()),
        })
    }

    pub fn lower_left(&self) -> GeoPoint {
        self.lower_left
    }

    pub fn upper_right(&self) -> GeoPoint {
        self.upper_right
    }

    pub fn upper_left(&self) -> GeoPoint {
        self.upper_left
    }

    pub fn lower_right(&self) -> GeoPoint {
        self.lower_right
    }

    /// Returns true if the box crosses the antimeridian, the ±180° line
    /// opposite the prime meridian.
    ///
    /// A box crosses it exactly when the lower left longitude is greater
    /// than the upper right longitude. Longitudes are assumed not to have
    /// been normalized by the caller.
    pub fn is_over_antimeridian(&self) -> bool {
        self.lower_left.longitude() > self.upper_right.longitude()
    }

    /// Splits the box at the antimeridian.
    ///
    /// A box that does not cross it is returned unchanged as the only
    /// element. A crossing box is decomposed into a western-hemisphere-bound
    /// left half ending at +179.99999° and a right half starting at
    /// -179.99999°, neither of which crosses the antimeridian itself.
    pub fn split_by_antimeridian(&self) -> Result<Vec<GeoBoundingBox>, InvalidBox> {
        if !self.is_over_antimeridian() {
            return Ok(vec![*self]);
        }

        let left_upper_right =
            GeoPoint::from_validated(self.upper_left.latitude(), ANTIMERIDIAN_LON);
        let left = GeoBoundingBox::new(self.lower_left, left_upper_right)?;

        let right_lower_left =
            GeoPoint::from_validated(self.lower_right.latitude(), -ANTIMERIDIAN_LON);
        let right = GeoBoundingBox::new(right_lower_left, self.upper_right)?;

        Ok(vec![left, right])
    }

    /// Returns true if the box is small enough that a GeoJSON polygon query
    /// for it is unambiguous on a sphere.
    ///
    /// The store requires any polygon passed to a within-geometry query to
    /// fit within a single hemisphere; larger geometries are silently
    /// interpreted as the smaller, complementary region. The check compares
    /// the latitude and longitude spans against two framings and passes if
    /// either holds: east/west (both spans below 90°) or north/south
    /// (latitude span below 180° and longitude span below 45°). These
    /// thresholds are a policy choice, not exact spherical geometry.
    pub fn fits_within_hemisphere(&self) -> bool {
        // east/west framing: half of 180° in both axes
        let max_lat_east_west = 90.0;
        let max_lon_east_west = 90.0;

        // north/south framing: half of 360° along latitude, half of 90°
        // along longitude
        let max_lat_north_south = 180.0;
        let max_lon_north_south = 45.0;

        let lat_span = (self.lower_left.latitude() - self.upper_left.latitude()).abs();

        let lon_span = if self.is_over_antimeridian() {
            // measure through the antimeridian
            (180.0 - self.lower_left.longitude().abs())
                + (180.0 - self.lower_right.longitude().abs())
        } else {
            (self.lower_left.longitude() - self.lower_right.longitude()).abs()
        };

        (lat_span < max_lat_east_west && lon_span < max_lon_east_west)
            || (lat_span < max_lat_north_south && lon_span < max_lon_north_south)
    }

    /// Returns the box as a closed GeoJSON linear ring of five positions,
    /// counter-clockwise from the lower left corner. The first and last
    /// positions are equal.
    pub fn polygon_ring(&self) -> [[f64; 2]; 5] {
        [
            self.lower_left.position(),
            self.upper_left.position(),
            self.upper_right.position(),
            self.lower_right.position(),
            self.lower_left.position(),
        ]
    }

    /// Returns the box as an open sequence of four positions, counter-
    /// clockwise from the lower left corner.
    pub fn polygon(&self) -> [[f64; 2]; 4] {
        [
            self.lower_left.position(),
            self.upper_left.position(),
            self.upper_right.position(),
            self.lower_right.position(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn bbox(ll: (f64, f64), ur: (f64, f64)) -> GeoBoundingBox {
        GeoBoundingBox::new(point(ll.0, ll.1), point(ur.0, ur.1)).unwrap()
    }

    #[test]
    fn derives_missing_corners() {
        let b = bbox((49.74733, 6.63575), (51.53075, 9.07471));
        assert_eq!(b.upper_left(), point(51.53075, 6.63575));
        assert_eq!(b.lower_right(), point(49.74733, 9.07471));
    }

    #[test]
    fn rejects_single_point() {
        assert_eq!(
            GeoBoundingBox::new(point(10.0, 20.0), point(10.0, 20.0)),
            Err(InvalidBox::SinglePoint)
        );
        // the all-zero pair is also a single point, which is checked first
        assert_eq!(
            GeoBoundingBox::new(point(0.0, 0.0), point(0.0, 0.0)),
            Err(InvalidBox::SinglePoint)
        );
    }

    #[test]
    fn rejects_degenerate_line() {
        assert_eq!(
            GeoBoundingBox::new(point(10.0, 20.0), point(10.0, 30.0)),
            Err(InvalidBox::SameLatitudeOrLongitude)
        );
        assert_eq!(
            GeoBoundingBox::new(point(10.0, 20.0), point(15.0, 20.0)),
            Err(InvalidBox::SameLatitudeOrLongitude)
        );
    }

    #[test]
    fn antimeridian_detection() {
        assert!(!bbox((10.0, 20.0), (20.0, 30.0)).is_over_antimeridian());
        assert!(!bbox((10.0, -30.0), (20.0, -20.0)).is_over_antimeridian());
        // Philippines to Alaska
        assert!(bbox((16.67304, 121.11328), (65.08833, -152.40234)).is_over_antimeridian());
    }

    #[test]
    fn split_keeps_non_crossing_box() {
        let b = bbox((10.0, 20.0), (20.0, 30.0));
        assert_eq!(b.split_by_antimeridian().unwrap(), vec![b]);
    }

    #[test]
    fn split_crossing_box() {
        let b = bbox((16.67304, 121.11328), (65.08833, -152.40234));
        let halves = b.split_by_antimeridian().unwrap();
        assert_eq!(halves.len(), 2);

        let left = halves[0];
        assert_eq!(left.lower_left(), point(16.67304, 121.11328));
        assert_eq!(left.upper_right(), point(65.08833, ANTIMERIDIAN_LON));

        let right = halves[1];
        assert_eq!(right.lower_left(), point(16.67304, -ANTIMERIDIAN_LON));
        assert_eq!(right.upper_right(), point(65.08833, -152.40234));

        assert!(!left.is_over_antimeridian());
        assert!(!right.is_over_antimeridian());
    }

    #[test]
    fn small_box_fits_within_hemisphere() {
        assert!(bbox((49.74733, 6.63575), (51.53075, 9.07471)).fits_within_hemisphere());
    }

    #[test]
    fn tall_narrow_box_fits_in_north_south_framing() {
        // latitude span 120° fails the east/west framing but the narrow
        // longitude span keeps the north/south framing valid
        assert!(bbox((-60.0, 0.0), (60.0, 10.0)).fits_within_hemisphere());
        assert!(!bbox((-60.0, 0.0), (60.0, 50.0)).fits_within_hemisphere());
    }

    #[test]
    fn wide_box_does_not_fit() {
        assert!(!bbox((10.0, -170.0), (20.0, 170.0)).fits_within_hemisphere());
    }

    #[test]
    fn crossing_box_measures_span_through_antimeridian() {
        // 59° of longitude in total, 29° east of the antimeridian and 30°
        // west of it
        assert!(bbox((10.0, 151.0), (20.0, -150.0)).fits_within_hemisphere());
        // 160° in total
        assert!(!bbox((10.0, 100.0), (20.0, -100.0)).fits_within_hemisphere());
    }

    #[test]
    fn polygon_ring_is_closed() {
        let ring = bbox((49.74733, 6.63575), (51.53075, 9.07471)).polygon_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[0], [6.63575, 49.74733]);
        assert_eq!(ring[2], [9.07471, 51.53075]);
    }

    #[test]
    fn polygon_is_open() {
        let polygon = bbox((49.74733, 6.63575), (51.53075, 9.07471)).polygon();
        assert_eq!(polygon.len(), 4);
        assert_ne!(polygon[0], polygon[3]);
    }
}
