pub mod error;
pub mod models;
pub mod statement;

pub use error::DatabaseError;
pub use statement::SqlResult;
