//! Conversions between physical distances and angular degrees.

/// One meter expressed in miles
const ONE_METER_IN_MILES: f64 = 0.0006213712;

/// Miles covered by one degree of latitude or longitude at the equator
const MILES_PER_DEGREE: f64 = 69.0;

/// Converts a distance in meters to angular degrees.
///
/// This is a flat-earth approximation: one degree is taken to span 69 miles
/// everywhere on the globe. Longitudinal error grows towards the poles (up
/// to roughly a factor of two in the northern- and southernmost populated
/// regions), which is acceptable for radius filters but not for anything
/// that needs geodesic accuracy.
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters * ONE_METER_IN_MILES / MILES_PER_DEGREE
}
