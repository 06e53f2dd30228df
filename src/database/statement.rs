use std::time::{Duration, Instant};

use serde_json::Value;
use sqlx::encode::IsNull;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgRow, PgTypeInfo};
use sqlx::{Arguments, Encode, FromRow, PgPool, Postgres, Type};

use crate::config::config;
use crate::database::error::DatabaseError;

/// A complete statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

pub async fn fetch_all<T>(pool: &PgPool, statement: &SqlResult) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    log_statement(statement);
    let started = Instant::now();
    let rows = sqlx::query_as_with::<_, T, _>(&statement.query, bind_params(&statement.params))
        .fetch_all(pool)
        .await?;
    warn_if_slow(statement, started.elapsed());
    Ok(rows)
}

pub async fn fetch_optional<T>(pool: &PgPool, statement: &SqlResult) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    log_statement(statement);
    let started = Instant::now();
    let row = sqlx::query_as_with::<_, T, _>(&statement.query, bind_params(&statement.params))
        .fetch_optional(pool)
        .await?;
    warn_if_slow(statement, started.elapsed());
    Ok(row)
}

/// Bind JSON scalars in order, so `$k` receives `params[k - 1]`.
pub fn bind_params(params: &[Value]) -> PgArguments {
    let mut args = PgArguments::default();
    for value in params {
        match value {
            Value::Null => args.add(UntypedNull),
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    args.add(i)
                } else if let Some(f) = n.as_f64() {
                    // u64 beyond i64::MAX lands here too; Postgres has no unsigned type
                    args.add(f)
                } else {
                    args.add(n.to_string())
                }
            }
            Value::String(s) => args.add(s.clone()),
            Value::Array(_) | Value::Object(_) => args.add(value.clone()), // JSONB
        }
    }
    args
}

/// A NULL parameter declared with oid 0, so Postgres infers its type from the
/// column it is compared with or assigned to.
#[derive(Debug, Clone, Copy)]
pub struct UntypedNull;

impl Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl<'q> Encode<'q, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> IsNull {
        IsNull::Yes
    }
}

fn log_statement(statement: &SqlResult) {
    if config().database.enable_query_logging {
        tracing::debug!(query = %statement.query, params = ?statement.params, "executing statement");
    }
}

fn warn_if_slow(statement: &SqlResult, elapsed: Duration) {
    let db = &config().database;
    if db.enable_slow_query_warning && elapsed.as_millis() as u64 > db.slow_query_threshold_ms {
        tracing::warn!("Slow query ({} ms): {}", elapsed.as_millis(), statement.query);
    }
}

