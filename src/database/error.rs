use thiserror::Error;

use crate::clause::ClauseError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Clause(#[from] ClauseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
