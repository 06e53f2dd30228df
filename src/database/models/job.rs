use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::clause::{
    build_filter_clause, build_update_clause, ClauseError, CompareOp, FieldMap, FilterField, ValueKind,
    ValueTransform,
};
use crate::database::error::DatabaseError;
use crate::database::statement::{self, SqlResult};

const COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Job fields are updated under their column names.
pub const JOB_FIELDS: FieldMap<'static> = FieldMap::EMPTY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFilter {
    Title,
    MinSalary,
    /// `true` keeps only jobs with non-zero equity; `false` means no filter
    HasEquity,
}

impl FilterField for JobFilter {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "title" => Some(JobFilter::Title),
            "minSalary" => Some(JobFilter::MinSalary),
            "hasEquity" => Some(JobFilter::HasEquity),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            JobFilter::Title => "title",
            JobFilter::MinSalary => "minSalary",
            JobFilter::HasEquity => "hasEquity",
        }
    }

    fn column(self) -> &'static str {
        match self {
            JobFilter::Title => "title",
            JobFilter::MinSalary => "salary",
            JobFilter::HasEquity => "equity",
        }
    }

    fn operator(self) -> CompareOp {
        match self {
            JobFilter::Title => CompareOp::ILike,
            JobFilter::MinSalary => CompareOp::Gte,
            JobFilter::HasEquity => CompareOp::Gt,
        }
    }

    fn transform(self) -> Option<ValueTransform> {
        match self {
            JobFilter::Title => Some(ValueTransform::Contains),
            JobFilter::MinSalary => None,
            JobFilter::HasEquity => Some(ValueTransform::PresenceThreshold(0)),
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            JobFilter::Title => ValueKind::Text,
            JobFilter::MinSalary => ValueKind::Integer,
            JobFilter::HasEquity => ValueKind::Boolean,
        }
    }
}

impl Job {
    pub fn find_all_sql(filters: &Map<String, Value>) -> Result<SqlResult, ClauseError> {
        let clause = build_filter_clause::<JobFilter>(filters)?;
        let query = format!("SELECT {} FROM jobs{} ORDER BY id", COLUMNS, clause.where_sql());
        Ok(SqlResult { query, params: clause.values })
    }

    pub fn update_sql(id: i32, data: &Map<String, Value>) -> Result<SqlResult, ClauseError> {
        let clause = build_update_clause(data, &JOB_FIELDS)?;
        let key_placeholder = clause.next_placeholder();
        let (set_clause, mut params) = clause.into_parts();
        let query = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            set_clause,
            key_placeholder,
            COLUMNS
        );
        params.push(Value::from(id));
        Ok(SqlResult { query, params })
    }

    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Job>, DatabaseError> {
        let sql = Self::find_all_sql(filters)?;
        statement::fetch_all(pool, &sql).await
    }

    pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<Job, DatabaseError> {
        let sql = Self::update_sql(id, data)?;
        statement::fetch_optional(pool, &sql)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }
}
