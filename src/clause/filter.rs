use serde_json::{Map, Number, Value};

use super::error::ClauseError;
use super::types::{ClauseResult, ClauseTerm, CompareOp, Separator};

/// Rewrite applied to a filter value before it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Wrap text in `%` wildcards for a substring match.
    Contains,
    /// Boolean "has" flag. `false` or `null` means no filter; any other value
    /// is replaced with the threshold the column is compared against.
    PresenceThreshold(i64),
}

impl ValueTransform {
    /// `None` when the filter should be dropped altogether.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            ValueTransform::Contains => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(Value::String(format!("%{}%", text)))
            }
            ValueTransform::PresenceThreshold(threshold) => match value {
                Value::Null | Value::Bool(false) => None,
                _ => Some(Value::Number(Number::from(*threshold))),
            },
        }
    }
}

/// Shape a filter value must have when it arrives as query-string text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Boolean,
}

/// The closed set of filters one resource accepts.
///
/// Implementors are small `Copy` enums; anything that does not parse to a
/// variant is rejected before it can reach a query.
pub trait FilterField: Copy + Eq + Sized + 'static {
    /// Whitelist lookup for an external filter key.
    fn parse(key: &str) -> Option<Self>;

    /// External key as it appears in requests.
    fn key(self) -> &'static str;

    /// Storage column compared against.
    fn column(self) -> &'static str;

    fn operator(self) -> CompareOp;

    fn transform(self) -> Option<ValueTransform> {
        None
    }

    fn kind(self) -> ValueKind {
        ValueKind::Text
    }

    /// `(min, max)` pairs that bound the same quantity.
    fn range_pairs() -> &'static [(Self, Self)] {
        &[]
    }
}

/// Build the `WHERE` conjunction for a filter payload.
///
/// An empty payload, or one whose every term is dropped by a transform,
/// yields an empty clause; callers must then omit `WHERE` entirely.
/// The payload is only read. Values are checked against each field's
/// [`ValueKind`] (numeric strings are accepted for integers) before the range
/// check runs. Transforms run before positions are assigned, so a dropped
/// term never leaves a gap in the placeholders.
pub fn build_filter_clause<F: FilterField>(payload: &Map<String, Value>) -> Result<ClauseResult, ClauseError> {
    if payload.is_empty() {
        return Ok(ClauseResult::empty(Separator::And));
    }

    let mut fields = Vec::with_capacity(payload.len());
    for key in payload.keys() {
        let field = F::parse(key).ok_or_else(|| ClauseError::UnsupportedFilterField(key.clone()))?;
        fields.push(field);
    }

    let fields = fields
        .into_iter()
        .zip(payload.values())
        .map(|(field, value)| Ok((field, check_kind(field, value)?)))
        .collect::<Result<Vec<_>, ClauseError>>()?;

    check_ranges(&fields)?;

    let terms = fields
        .into_iter()
        .filter_map(|(field, value)| {
            let value = match field.transform() {
                Some(transform) => transform.apply(&value)?,
                None => value,
            };
            Some(ClauseTerm {
                column: field.column().to_string(),
                operator: field.operator(),
                value,
            })
        })
        .collect();

    Ok(ClauseResult::from_terms(terms, Separator::And))
}

/// Normalize a JSON filter value to the field's kind.
fn check_kind<F: FilterField>(field: F, value: &Value) -> Result<Value, ClauseError> {
    match (field.kind(), value) {
        (_, Value::String(raw)) => coerce(field, raw),
        (ValueKind::Text, Value::Number(_) | Value::Bool(_)) => Ok(Value::String(value.to_string())),
        (ValueKind::Integer, Value::Number(n)) if n.is_i64() => Ok(value.clone()),
        // null leaves a presence flag unset
        (ValueKind::Boolean, Value::Bool(_) | Value::Null) => Ok(value.clone()),
        _ => Err(ClauseError::InvalidFilterValue {
            field: field.key(),
            value: value.to_string(),
        }),
    }
}

fn check_ranges<F: FilterField>(fields: &[(F, Value)]) -> Result<(), ClauseError> {
    let lookup = |wanted: F| {
        fields
            .iter()
            .find(|(field, _)| *field == wanted)
            .and_then(|(_, value)| value.as_i64())
    };
    for &(min, max) in F::range_pairs() {
        if let (Some(lo), Some(hi)) = (lookup(min), lookup(max)) {
            if lo > hi {
                return Err(ClauseError::InvalidRange {
                    min_field: min.key(),
                    max_field: max.key(),
                });
            }
        }
    }
    Ok(())
}

/// Decode a urlencoded query string into a filter payload for `F`.
///
/// Keys are whitelisted and values coerced to each field's [`ValueKind`].
/// A repeated key keeps its last value.
pub fn filters_from_query<F: FilterField>(query: &str) -> Result<Map<String, Value>, ClauseError> {
    let mut filters = Map::new();
    for (key, raw) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        let field = F::parse(&key).ok_or_else(|| ClauseError::UnsupportedFilterField(key.to_string()))?;
        let value = coerce(field, &raw)?;
        filters.insert(field.key().to_string(), value);
    }
    Ok(filters)
}

fn coerce<F: FilterField>(field: F, raw: &str) -> Result<Value, ClauseError> {
    let invalid = || ClauseError::InvalidFilterValue {
        field: field.key(),
        value: raw.to_string(),
    };
    match field.kind() {
        ValueKind::Text => Ok(Value::String(raw.to_string())),
        ValueKind::Integer => raw.trim().parse::<i64>().map(Value::from).map_err(|_| invalid()),
        ValueKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
    }
}
