//! Error types for quarry-db.

use miette::Diagnostic;
use quarry_cache::CacheError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(quarry_db::connection),
        help("Check that the database file exists and is accessible")
    )]
    Connection(String),

    #[error("Query failed: {message}")]
    #[diagnostic(code(quarry_db::execution), help("Statement: {query}"))]
    Execution { query: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] CacheError),

    #[error("No transaction is active")]
    #[diagnostic(
        code(quarry_db::no_transaction),
        help("Call `transaction()` before committing or rolling back")
    )]
    NoTransaction,

    #[error("Cannot build statement: {0}")]
    #[diagnostic(code(quarry_db::invalid_statement))]
    InvalidStatement(String),

    #[error("Column `{0}` is not present in the row")]
    #[diagnostic(code(quarry_db::missing_column))]
    MissingColumn(String),

    #[error("Cannot decode column `{column}`: {message}")]
    #[diagnostic(code(quarry_db::decode))]
    Decode { column: String, message: String },
}

pub type Result<T> = std::result::Result<T, DbError>;
