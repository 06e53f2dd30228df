use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::clause::{
    build_filter_clause, build_update_clause, ClauseError, CompareOp, FieldMap, FilterField, ValueKind,
    ValueTransform,
};
use crate::database::error::DatabaseError;
use crate::database::statement::{self, SqlResult};

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// API field names that differ from their `companies` columns.
pub const COMPANY_FIELDS: FieldMap<'static> =
    FieldMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Filters accepted by the company list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyFilter {
    /// Case-insensitive partial match on name
    Name,
    MinEmployees,
    MaxEmployees,
}

impl FilterField for CompanyFilter {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(CompanyFilter::Name),
            "minEmployees" => Some(CompanyFilter::MinEmployees),
            "maxEmployees" => Some(CompanyFilter::MaxEmployees),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            CompanyFilter::Name => "name",
            CompanyFilter::MinEmployees => "minEmployees",
            CompanyFilter::MaxEmployees => "maxEmployees",
        }
    }

    fn column(self) -> &'static str {
        match self {
            CompanyFilter::Name => "name",
            CompanyFilter::MinEmployees | CompanyFilter::MaxEmployees => "num_employees",
        }
    }

    fn operator(self) -> CompareOp {
        match self {
            CompanyFilter::Name => CompareOp::ILike,
            CompanyFilter::MinEmployees => CompareOp::Gte,
            CompanyFilter::MaxEmployees => CompareOp::Lte,
        }
    }

    fn transform(self) -> Option<ValueTransform> {
        match self {
            CompanyFilter::Name => Some(ValueTransform::Contains),
            _ => None,
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            CompanyFilter::Name => ValueKind::Text,
            CompanyFilter::MinEmployees | CompanyFilter::MaxEmployees => ValueKind::Integer,
        }
    }

    fn range_pairs() -> &'static [(Self, Self)] {
        &[(CompanyFilter::MinEmployees, CompanyFilter::MaxEmployees)]
    }
}

impl Company {
    /// `SELECT` for the company list, ordered by name. `WHERE` is left out
    /// when no filter survives.
    pub fn find_all_sql(filters: &Map<String, Value>) -> Result<SqlResult, ClauseError> {
        let clause = build_filter_clause::<CompanyFilter>(filters)?;
        let query = format!("SELECT {} FROM companies{} ORDER BY name", COLUMNS, clause.where_sql());
        Ok(SqlResult { query, params: clause.values })
    }

    /// Partial `UPDATE` keyed by handle, which binds after the changed fields.
    pub fn update_sql(handle: &str, data: &Map<String, Value>) -> Result<SqlResult, ClauseError> {
        let clause = build_update_clause(data, &COMPANY_FIELDS)?;
        let key_placeholder = clause.next_placeholder();
        let (set_clause, mut params) = clause.into_parts();
        let query = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
            set_clause,
            key_placeholder,
            COLUMNS
        );
        params.push(Value::String(handle.to_string()));
        Ok(SqlResult { query, params })
    }

    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Company>, DatabaseError> {
        let sql = Self::find_all_sql(filters)?;
        statement::fetch_all(pool, &sql).await
    }

    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Company, DatabaseError> {
        let sql = Self::update_sql(handle, data)?;
        statement::fetch_optional(pool, &sql)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }
}
