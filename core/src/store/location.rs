use serde_json::json;
use thiserror::Error;

use crate::geom::GeoPoint;

use super::RawDocument;

/// Document field holding the location's point as a two-element
/// (longitude, latitude) array. The reversed order is the store's indexing
/// convention; [`decode`] and [`Location::to_document`] are the only places
/// that convert between it and the (latitude, longitude) API order.
pub const FIELD_GEO_POINT: &str = "gl";

/// Document field holding the location's opaque description
pub const FIELD_DESCRIPTION: &str = "d";

/// A document that cannot be decoded into a [`Location`] at all.
///
/// A missing or malformed geo field is deliberately not part of this error:
/// the description is authoritative, so such documents decode to a location
/// without a point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedDocument {
    #[error("document is not an object")]
    NotAnObject,

    #[error("description field `{FIELD_DESCRIPTION}' is missing or not a string")]
    MissingDescription,
}

/// A geographical location read from the store: a point plus an opaque
/// description. The core never alters what the store returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    point: Option<GeoPoint>,
    description: String,
}

impl Location {
    pub fn new(point: GeoPoint, description: impl Into<String>) -> Self {
        Self {
            point: Some(point),
            description: description.into(),
        }
    }

    pub fn point(&self) -> Option<GeoPoint> {
        self.point
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the document representation used to persist this location,
    /// with the point stored in (longitude, latitude) order for geo indexing
    pub fn to_document(&self) -> RawDocument {
        match self.point {
            Some(point) => json!({
                FIELD_GEO_POINT: point.position(),
                FIELD_DESCRIPTION: self.description,
            }),
            None => json!({ FIELD_DESCRIPTION: self.description }),
        }
    }
}

/// Decodes a raw store document into a [`Location`].
///
/// The description must be present; a document without one is malformed. The
/// geo field is decoded leniently: if it is missing, not a two-element
/// numeric array, or holds an out-of-range position, the location is
/// returned without a point.
pub fn decode(raw: &RawDocument) -> Result<Location, MalformedDocument> {
    let object = raw.as_object().ok_or(MalformedDocument::NotAnObject)?;

    let description = object
        .get(FIELD_DESCRIPTION)
        .and_then(|d| d.as_str())
        .ok_or(MalformedDocument::MissingDescription)?;

    let point = object.get(FIELD_GEO_POINT).and_then(decode_point);

    Ok(Location {
        point,
        description: description.to_owned(),
    })
}

fn decode_point(value: &serde_json::Value) -> Option<GeoPoint> {
    let position = value.as_array()?;
    if position.len() != 2 {
        return None;
    }
    let longitude = position[0].as_f64()?;
    let latitude = position[1].as_f64()?;
    GeoPoint::new(latitude, longitude).ok()
}
