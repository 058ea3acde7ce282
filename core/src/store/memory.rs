//! An in-process implementation of the [`DocumentStore`] trait.
//!
//! The store keeps its documents in a plain vector and interprets query
//! documents directly. It supports the operator subset the query layer
//! emits for bounding-box searches (within-geometry over a polygon ring,
//! within-box, within-center) plus the scalar passthrough operators.
//! `$near` and `$regex` are reported as failed queries instead of being
//! approximated.

use geo::{coord, Contains, EuclideanDistance, LineString, Point, Polygon, Rect};

use super::location::Location;
use super::{DocumentStore, QueryDocument, RawDocument, StoreError};

/// A [`DocumentStore`] backed by a vector of documents
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Vec<RawDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a location in its document representation
    pub fn insert(&mut self, location: &Location) {
        self.documents.push(location.to_document());
    }

    /// Adds a raw document as-is
    pub fn insert_document(&mut self, document: RawDocument) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        query: &QueryDocument,
    ) -> Result<impl Iterator<Item = Result<RawDocument, StoreError>>, StoreError> {
        let mut matches = Vec::new();
        for document in &self.documents {
            if eval_query(query, document)? {
                matches.push(document.clone());
            }
        }
        Ok(matches.into_iter().map(Ok))
    }
}

/// Evaluates a query document against a single document. Top-level entries
/// are combined with logical AND.
fn eval_query(query: &QueryDocument, document: &RawDocument) -> Result<bool, StoreError> {
    let conditions = query
        .as_object()
        .ok_or_else(|| StoreError::QueryFailed("query must be an object".into()))?;

    for (key, condition) in conditions {
        let matched = match key.as_str() {
            "$and" => eval_combinator(condition, document, true)?,
            "$or" => eval_combinator(condition, document, false)?,
            field => eval_field(field, condition, document)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_combinator(
    operand: &serde_json::Value,
    document: &RawDocument,
    all: bool,
) -> Result<bool, StoreError> {
    let clauses = operand
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("logical operator expects an array".into()))?;

    for clause in clauses {
        let matched = eval_query(clause, document)?;
        if all && !matched {
            return Ok(false);
        }
        if !all && matched {
            return Ok(true);
        }
    }
    Ok(all)
}

fn eval_field(
    field: &str,
    condition: &serde_json::Value,
    document: &RawDocument,
) -> Result<bool, StoreError> {
    let value = document.get(field);

    // an object whose keys are operators is a condition; any other value is
    // matched by equality
    let operators = match condition.as_object() {
        Some(object) if object.keys().any(|k| k.starts_with('$')) => object,
        _ => return Ok(value == Some(condition)),
    };

    for (operator, operand) in operators {
        let matched = match operator.as_str() {
            "$ne" => value != Some(operand),
            "$gt" | "$gte" | "$lt" | "$lte" => eval_comparison(operator, value, operand),
            "$in" => eval_membership(value, operand)?,
            "$nin" => !eval_membership(value, operand)?,
            "$exists" => {
                let want = operand.as_bool().ok_or_else(|| {
                    StoreError::QueryFailed("$exists expects a boolean".into())
                })?;
                value.is_some() == want
            }
            "$geoWithin" => eval_geo_within(operand, value)?,
            other => {
                return Err(StoreError::QueryFailed(format!(
                    "unsupported operator `{other}'"
                )))
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_comparison(
    operator: &str,
    value: Option<&serde_json::Value>,
    operand: &serde_json::Value,
) -> bool {
    let Some(value) = value else {
        return false;
    };

    if let (Some(a), Some(b)) = (value.as_f64(), operand.as_f64()) {
        match operator {
            "$gt" => a > b,
            "$gte" => a >= b,
            "$lt" => a < b,
            _ => a <= b,
        }
    } else if let (Some(a), Some(b)) = (value.as_str(), operand.as_str()) {
        match operator {
            "$gt" => a > b,
            "$gte" => a >= b,
            "$lt" => a < b,
            _ => a <= b,
        }
    } else {
        false
    }
}

fn eval_membership(
    value: Option<&serde_json::Value>,
    operand: &serde_json::Value,
) -> Result<bool, StoreError> {
    let candidates = operand
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("$in/$nin expect an array".into()))?;
    Ok(value.is_some_and(|v| candidates.contains(v)))
}

fn eval_geo_within(
    operand: &serde_json::Value,
    value: Option<&serde_json::Value>,
) -> Result<bool, StoreError> {
    let Some(point) = value.and_then(decode_position) else {
        return Ok(false);
    };

    if let Some(geometry) = operand.get("$geometry") {
        let polygon = decode_polygon(geometry)?;
        Ok(polygon.contains(&point))
    } else if let Some(corners) = operand.get("$box") {
        let rect = decode_box(corners)?;
        Ok(rect.contains(&point))
    } else if let Some(center) = operand.get("$center") {
        let (center, radius) = decode_center(center)?;
        Ok(point.euclidean_distance(&center) <= radius)
    } else {
        Err(StoreError::QueryFailed(
            "$geoWithin expects $geometry, $box or $center".into(),
        ))
    }
}

/// Decodes a (longitude, latitude) position array into a planar point
fn decode_position(value: &serde_json::Value) -> Option<Point> {
    let position = value.as_array()?;
    if position.len() != 2 {
        return None;
    }
    Some(Point::new(position[0].as_f64()?, position[1].as_f64()?))
}

fn require_position(value: &serde_json::Value) -> Result<Point, StoreError> {
    decode_position(value).ok_or_else(|| {
        StoreError::QueryFailed("expected a two-element numeric position".into())
    })
}

fn decode_polygon(geometry: &serde_json::Value) -> Result<Polygon, StoreError> {
    if geometry.get("type").and_then(|t| t.as_str()) != Some("Polygon") {
        return Err(StoreError::QueryFailed(
            "$geometry must be of type Polygon".into(),
        ));
    }

    let rings = geometry
        .get("coordinates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| StoreError::QueryFailed("Polygon coordinates missing".into()))?;

    // only a single exterior ring is supported
    let exterior = rings
        .first()
        .and_then(|r| r.as_array())
        .ok_or_else(|| StoreError::QueryFailed("Polygon has no exterior ring".into()))?;
    if rings.len() > 1 {
        return Err(StoreError::QueryFailed(
            "polygons with holes are not supported".into(),
        ));
    }
    if exterior.len() < 4 {
        return Err(StoreError::QueryFailed(
            "a linear ring requires at least 4 positions".into(),
        ));
    }

    let mut coords = Vec::with_capacity(exterior.len());
    for position in exterior {
        let point = require_position(position)?;
        coords.push(coord! { x: point.x(), y: point.y() });
    }

    Ok(Polygon::new(LineString::new(coords), vec![]))
}

fn decode_box(corners: &serde_json::Value) -> Result<Rect, StoreError> {
    let corners = corners
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("$box expects two corner positions".into()))?;
    if corners.len() != 2 {
        return Err(StoreError::QueryFailed(
            "$box expects two corner positions".into(),
        ));
    }

    let lower_left = require_position(&corners[0])?;
    let upper_right = require_position(&corners[1])?;
    Ok(Rect::new(
        coord! { x: lower_left.x(), y: lower_left.y() },
        coord! { x: upper_right.x(), y: upper_right.y() },
    ))
}

fn decode_center(center: &serde_json::Value) -> Result<(Point, f64), StoreError> {
    let parts = center
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("$center expects [position, radius]".into()))?;
    if parts.len() != 2 {
        return Err(StoreError::QueryFailed(
            "$center expects [position, radius]".into(),
        ));
    }

    let position = require_position(&parts[0])?;
    let radius = parts[1]
        .as_f64()
        .ok_or_else(|| StoreError::QueryFailed("$center radius must be numeric".into()))?;
    Ok((position, radius))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geom::GeoPoint;
    use crate::query::{self, spatial, wire};
    use crate::store::location;

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(&Location::new(
            GeoPoint::new(50.91147, 6.94336).unwrap(),
            "Cologne",
        ));
        store.insert(&Location::new(
            GeoPoint::new(50.08689, 8.67920).unwrap(),
            "Frankfurt",
        ));
        store.insert(&Location::new(
            GeoPoint::new(52.49094, 13.38135).unwrap(),
            "Berlin",
        ));
        store
    }

    fn descriptions(store: &MemoryStore, query: &QueryDocument) -> Vec<String> {
        store
            .find(query)
            .unwrap()
            .map(|raw| {
                location::decode(&raw.unwrap())
                    .unwrap()
                    .description()
                    .to_owned()
            })
            .collect()
    }

    #[test]
    fn equality_query() {
        let store = seeded_store();
        let query = wire::render(&query::eq("d", "Cologne"));
        assert_eq!(descriptions(&store, &query), vec!["Cologne"]);
    }

    #[test]
    fn membership_and_existence() {
        let store = seeded_store();

        let query = wire::render(&query::is_in("d", ["Cologne", "Berlin"]));
        assert_eq!(descriptions(&store, &query), vec!["Cologne", "Berlin"]);

        let query = wire::render(&query::not_in("d", ["Cologne", "Berlin"]));
        assert_eq!(descriptions(&store, &query), vec!["Frankfurt"]);

        let query = wire::render(&query::exists("gl", true));
        assert_eq!(descriptions(&store, &query).len(), 3);
    }

    #[test]
    fn logical_combinators() {
        let store = seeded_store();
        let query = wire::render(
            &query::eq("d", "Cologne").or(query::eq("d", "Berlin")),
        );
        assert_eq!(descriptions(&store, &query), vec!["Cologne", "Berlin"]);
    }

    #[test]
    fn polygon_query_matches_contained_points() {
        let store = seeded_store();
        let bbox = crate::geom::GeoBoundingBox::new(
            GeoPoint::new(49.74733, 6.63575).unwrap(),
            GeoPoint::new(51.53075, 9.07471).unwrap(),
        )
        .unwrap();
        let query = wire::render(&spatial::within_bbox(location::FIELD_GEO_POINT, &bbox));
        assert_eq!(descriptions(&store, &query), vec!["Cologne", "Frankfurt"]);
    }

    #[test]
    fn box_query_matches_contained_points() {
        let store = seeded_store();
        let query = json!({ "gl": { "$geoWithin": { "$box": [
            [6.63575, 49.74733],
            [9.07471, 51.53075],
        ] } } });
        assert_eq!(descriptions(&store, &query), vec!["Cologne", "Frankfurt"]);
    }

    #[test]
    fn center_query_matches_nearby_points() {
        let store = seeded_store();
        // one degree around a point between Cologne and Frankfurt
        let query = json!({ "gl": { "$geoWithin": { "$center": [[7.8, 50.5], 1.0] } } });
        assert_eq!(descriptions(&store, &query), vec!["Cologne", "Frankfurt"]);
    }

    #[test]
    fn document_without_point_never_matches_geo_queries() {
        let mut store = seeded_store();
        store.insert_document(json!({ "d": "Nowhere" }));
        let query = json!({ "gl": { "$geoWithin": { "$box": [[-180.0, -90.0], [180.0, 90.0]] } } });
        assert_eq!(
            descriptions(&store, &query),
            vec!["Cologne", "Frankfurt", "Berlin"]
        );
    }

    #[test]
    fn unsupported_operator_fails_query() {
        let store = seeded_store();
        let query = json!({ "gl": { "$near": [7.0, 50.0] } });
        assert!(matches!(
            store.find(&query).map(|_| ()),
            Err(StoreError::QueryFailed(_))
        ));
    }
}
