//! Renders a clause tree into the store's native query document.
//!
//! The store speaks a JSON query language: field conditions keyed by field
//! name, operator objects for everything but plain equality, and GeoJSON
//! geometry payloads for the spherical operators. Positions are always
//! (longitude, latitude).

use serde_json::{json, Map};

use crate::store::QueryDocument;

use super::{Clause, Comparison, Value};

const GEO_WITHIN_KEY: &str = "$geoWithin";
const GEOMETRY_KEY: &str = "$geometry";
const COORDINATES_KEY: &str = "coordinates";
const BOX_KEY: &str = "$box";
const CENTER_KEY: &str = "$center";
const NEAR_KEY: &str = "$near";
const MAX_DISTANCE_KEY: &str = "$maxDistance";
const POLYGON_TYPE: &str = "Polygon";

/// Renders the given clause as a query document the store can execute
pub fn render(clause: &Clause) -> QueryDocument {
    match clause {
        Clause::Compare { field, op, value } => render_compare(field, *op, value),

        Clause::In { field, values } => {
            json!({ field: { "$in": values.iter().map(value_to_json).collect::<Vec<_>>() } })
        }

        Clause::NotIn { field, values } => {
            json!({ field: { "$nin": values.iter().map(value_to_json).collect::<Vec<_>>() } })
        }

        Clause::Exists { field, exists } => json!({ field: { "$exists": exists } }),

        Clause::Regex { field, pattern } => json!({ field: { "$regex": pattern } }),

        Clause::And(clauses) => {
            json!({ "$and": clauses.iter().map(render).collect::<Vec<_>>() })
        }

        Clause::Or(clauses) => {
            json!({ "$or": clauses.iter().map(render).collect::<Vec<_>>() })
        }

        Clause::WithinBox {
            field,
            lower_left,
            upper_right,
        } => json!({
            field: { GEO_WITHIN_KEY: { BOX_KEY: [lower_left, upper_right] } }
        }),

        Clause::WithinPolygon { field, ring } => json!({
            field: {
                GEO_WITHIN_KEY: {
                    GEOMETRY_KEY: {
                        "type": POLYGON_TYPE,
                        // a polygon is a list of linear rings; ours only
                        // ever has the exterior one
                        COORDINATES_KEY: [ring],
                    }
                }
            }
        }),

        Clause::WithinCenter {
            field,
            center,
            radius_degrees,
        } => json!({
            field: { GEO_WITHIN_KEY: { CENTER_KEY: [center, radius_degrees] } }
        }),

        Clause::Near {
            field,
            position,
            max_distance_degrees,
        } => {
            let mut condition = Map::new();
            condition.insert(NEAR_KEY.into(), json!(position));
            if let Some(max) = max_distance_degrees {
                condition.insert(MAX_DISTANCE_KEY.into(), json!(max));
            }
            json!({ field: condition })
        }
    }
}

fn render_compare(field: &str, op: Comparison, value: &Value) -> QueryDocument {
    let value = value_to_json(value);
    match op {
        Comparison::Eq => json!({ field: value }),
        Comparison::Ne => json!({ field: { "$ne": value } }),
        Comparison::Gt => json!({ field: { "$gt": value } }),
        Comparison::Gte => json!({ field: { "$gte": value } }),
        Comparison::Lt => json!({ field: { "$lt": value } }),
        Comparison::Lte => json!({ field: { "$lte": value } }),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(s),
        Value::Float(f) => json!(f),
        Value::Integer(i) => json!(i),
        Value::Bool(b) => json!(b),
    }
}
