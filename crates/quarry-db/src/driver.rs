//! The capability contract the builder needs from a database engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// A failure reported by the engine, carried as its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result set as returned by the engine: column names plus positional rows.
///
/// This is also the payload stored in the result cache, so a cached result can be reshaped
/// for any later request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Engine operations the builder dispatches through.
///
/// Every method that touches the engine records its failure so that
/// [`last_error`](Driver::last_error) can report it afterwards.
pub trait Driver {
    /// Quotes `text` as a string literal safe to splice into a statement.
    fn quote(&self, text: &str) -> String;

    /// Runs a statement that yields rows.
    fn fetch(&mut self, sql: &str) -> Result<RawRows, DriverError>;

    /// Runs a statement that yields no rows, returning the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Identifier generated by the most recent insert.
    fn last_insert_id(&self) -> Option<Value>;

    fn begin(&mut self) -> Result<(), DriverError>;

    fn commit(&mut self) -> Result<(), DriverError>;

    fn rollback(&mut self) -> Result<(), DriverError>;

    /// Runs a statement for its side effect only, such as a savepoint.
    fn exec_raw(&mut self, sql: &str) -> Result<(), DriverError>;

    fn last_error(&self) -> Option<String>;
}
