#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

static TRACING: OnceLock<()> = OnceLock::new();
static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

const SCHEMA_SQL: &str = r#"
CREATE TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
);

CREATE TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);

INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
    ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
    ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
    ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

INSERT INTO jobs (title, salary, equity, company_handle) VALUES
    ('jobtitle', 100000, 0.001, 'c1'),
    ('jobtitle2', 200000, 0, 'c2'),
    ('jobtitle3', 300000, NULL, 'c3');
"#;

/// Install a test subscriber once; honours RUST_LOG.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Object literal to payload map, keeping key order.
pub fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {}", other),
    }
}

/// Count `$n` placeholders in rendered clause text.
pub fn placeholder_count(clause_text: &str) -> usize {
    clause_text
        .match_indices('$')
        .filter(|(idx, _)| {
            clause_text[idx + 1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
        .count()
}

/// Seeded `companies`/`jobs` tables in a private schema of the database at
/// DATABASE_URL.
pub struct TestDb {
    pub pool: PgPool,
    url: String,
    schema: String,
}

impl TestDb {
    /// `None` when DATABASE_URL is unset, so the suite still runs without Postgres.
    pub async fn connect() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return Ok(None);
        };

        let schema = format!(
            "jobly_test_{}_{}",
            std::process::id(),
            SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
        );
        let admin = PgPoolOptions::new().max_connections(1).connect(&url).await?;
        admin
            .execute(format!("CREATE SCHEMA {}", schema).as_str())
            .await
            .context("failed to create test schema")?;
        admin.close().await;

        let search_path = format!("SET search_path TO {}", schema);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let stmt = search_path.clone();
                Box::pin(async move {
                    conn.execute(stmt.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await?;
        pool.execute(SCHEMA_SQL).await.context("failed to seed test schema")?;

        Ok(Some(Self { pool, url, schema }))
    }

    pub async fn job_id(&self, title: &str) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE title = $1")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn cleanup(self) -> Result<()> {
        self.pool.close().await;
        let admin = PgPoolOptions::new().max_connections(1).connect(&self.url).await?;
        admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await?;
        admin.close().await;
        Ok(())
    }
}
