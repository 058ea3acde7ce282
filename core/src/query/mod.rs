use std::fmt::{Display, Formatter};

pub mod spatial;
pub mod wire;

/// A literal value a document field can be compared against
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Bool(bool),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Specifies how a field is compared against a value
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// The values must be equal
    Eq,

    /// The values must not be equal
    Ne,

    /// The field value must be greater than the given one
    Gt,

    /// The field value must be greater than or equal to the given one
    Gte,

    /// The field value must be less than the given one
    Lt,

    /// The field value must be less than or equal to the given one
    Lte,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Eq => write!(f, "="),
            Comparison::Ne => write!(f, "!="),
            Comparison::Gt => write!(f, ">"),
            Comparison::Gte => write!(f, ">="),
            Comparison::Lt => write!(f, "<"),
            Comparison::Lte => write!(f, "<="),
        }
    }
}

/// A node in a query-clause expression tree.
///
/// Clauses are immutable values: the composition helpers below return new
/// nodes instead of mutating shared builder state, so a clause can be reused
/// across queries without aliasing.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Compare a field against a value
    Compare {
        field: String,
        op: Comparison,
        value: Value,
    },

    /// The field value must be one of the given values
    In { field: String, values: Vec<Value> },

    /// The field value must be none of the given values
    NotIn { field: String, values: Vec<Value> },

    /// The field must (or must not) be present
    Exists { field: String, exists: bool },

    /// The field value must match the given regular expression
    Regex { field: String, pattern: String },

    /// All sub-clauses must match
    And(Vec<Clause>),

    /// At least one sub-clause must match
    Or(Vec<Clause>),

    /// The point field must lie within the axis-aligned box spanned by the
    /// two (longitude, latitude) corner positions. Planar, always valid
    /// regardless of extent.
    WithinBox {
        field: String,
        lower_left: [f64; 2],
        upper_right: [f64; 2],
    },

    /// The point field must lie within the polygon described by the closed
    /// (longitude, latitude) ring. Spherical-geometry-aware; only valid for
    /// geometries that fit within a hemisphere.
    WithinPolygon { field: String, ring: Vec<[f64; 2]> },

    /// The point field must lie within the circle around the given
    /// (longitude, latitude) center, radius in angular degrees
    WithinCenter {
        field: String,
        center: [f64; 2],
        radius_degrees: f64,
    },

    /// The point field must be near the given (longitude, latitude)
    /// position, optionally no further away than the given angular distance
    Near {
        field: String,
        position: [f64; 2],
        max_distance_degrees: Option<f64>,
    },
}

impl Clause {
    /// Combines this clause with another one; both must match
    pub fn and(self, other: Clause) -> Clause {
        match self {
            Clause::And(mut clauses) => {
                clauses.push(other);
                Clause::And(clauses)
            }
            first => Clause::And(vec![first, other]),
        }
    }

    /// Combines this clause with another one; either may match
    pub fn or(self, other: Clause) -> Clause {
        match self {
            Clause::Or(mut clauses) => {
                clauses.push(other);
                Clause::Or(clauses)
            }
            first => Clause::Or(vec![first, other]),
        }
    }
}

/// The field value must equal the given value
pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Eq, value)
}

/// The field value must not equal the given value
pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Ne, value)
}

/// The field value must be greater than the given value
pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Gt, value)
}

/// The field value must be greater than or equal to the given value
pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Gte, value)
}

/// The field value must be less than the given value
pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Lt, value)
}

/// The field value must be less than or equal to the given value
pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Clause {
    compare(field, Comparison::Lte, value)
}

fn compare(field: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Clause {
    Clause::Compare {
        field: field.into(),
        op,
        value: value.into(),
    }
}

/// The field value must be one of the given values
pub fn is_in<V>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Clause
where
    V: Into<Value>,
{
    Clause::In {
        field: field.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// The field value must be none of the given values
pub fn not_in<V>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Clause
where
    V: Into<Value>,
{
    Clause::NotIn {
        field: field.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// The field must (or must not) be present
pub fn exists(field: impl Into<String>, exists: bool) -> Clause {
    Clause::Exists {
        field: field.into(),
        exists,
    }
}

/// The field value must match the given regular expression
pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Clause {
    Clause::Regex {
        field: field.into(),
        pattern: pattern.into(),
    }
}

#[cfg(test)]
macro_rules! and {
    ($($x:expr),* $(,)?) => {
        $crate::query::Clause::And(vec![$($x,)*])
    };
}

#[cfg(test)]
macro_rules! or {
    ($($x:expr),* $(,)?) => {
        $crate::query::Clause::Or(vec![$($x,)*])
    };
}

#[cfg(test)]
pub(crate) use and;
#[cfg(test)]
pub(crate) use or;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_composition_returns_new_nodes() {
        let base = eq("city", "Cologne");
        let composed = base.clone().and(gt("height", 12_i64));

        // the original clause is untouched by composition
        assert_eq!(base, eq("city", "Cologne"));
        assert_eq!(composed, and![eq("city", "Cologne"), gt("height", 12_i64)]);
    }

    #[test]
    fn and_flattens_left_chain() {
        let composed = eq("a", 1_i64).and(eq("b", 2_i64)).and(eq("c", 3_i64));
        assert_eq!(
            composed,
            and![eq("a", 1_i64), eq("b", 2_i64), eq("c", 3_i64)]
        );
    }

    #[test]
    fn or_composition() {
        let composed = eq("a", 1_i64).or(lte("b", 2.5));
        assert_eq!(composed, or![eq("a", 1_i64), lte("b", 2.5)]);
    }

    #[test]
    fn values_from_literals() {
        assert_eq!(Value::from("x"), Value::String("x".into()));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
        assert_eq!(Value::from(3_i64), Value::Integer(3));
        assert_eq!(Value::from(true), Value::Bool(true));
    }
}
