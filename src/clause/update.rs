use serde_json::{Map, Value};

use super::error::ClauseError;
use super::types::{ClauseResult, ClauseTerm, CompareOp, FieldMap, Separator};

/// Build the `SET` fragment for a partial update.
///
/// Every key in `payload` becomes `"<column>"=$n` in iteration order, with the
/// column taken from `field_map` when present. Keys are not whitelisted here;
/// the payload shape is validated upstream.
///
/// ```ignore
/// // {"name": "newName", "numEmployees": 324}
/// // => "\"name\"=$1, \"num_employees\"=$2", ["newName", 324]
/// ```
pub fn build_update_clause(
    payload: &Map<String, Value>,
    field_map: &FieldMap<'_>,
) -> Result<ClauseResult, ClauseError> {
    if payload.is_empty() {
        return Err(ClauseError::EmptyPayload);
    }

    let terms = payload
        .iter()
        .map(|(key, value)| ClauseTerm {
            column: field_map.resolve(key).to_string(),
            operator: CompareOp::Eq,
            value: value.clone(),
        })
        .collect();

    Ok(ClauseResult::from_terms(terms, Separator::Comma))
}
