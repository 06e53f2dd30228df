pub mod clause;
pub mod config;
pub mod database;
pub mod error;
