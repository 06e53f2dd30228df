//! Parameterized `SET` and `WHERE` fragments built from sparse request payloads.
//!
//! Both builders are pure: they read the payload, never mutate it, and return a
//! [`ClauseResult`] whose `$n` placeholders line up with its `values`.

pub mod error;
pub mod filter;
pub mod types;
pub mod update;

pub use error::ClauseError;
pub use filter::{build_filter_clause, filters_from_query, FilterField, ValueKind, ValueTransform};
pub use types::{quote_ident, ClauseResult, ClauseTerm, CompareOp, FieldMap, PlaceholderStyle};
pub use update::build_update_clause;
