//! A fluent SQL statement builder over an injected [`Driver`].
//!
//! Clauses accumulate on a [`QueryBuilder`] through chained `&mut self` calls. A terminal call
//! renders one statement, dispatches it through the driver (or answers it from an armed
//! [`ResultCache`](quarry_cache::ResultCache)) and resets the clause state for the next one.
//!
//! ```
//! use quarry_db::{BuilderConfig, QueryBuilder, SqliteDriver};
//!
//! let driver = SqliteDriver::open_in_memory().unwrap();
//! let mut db = QueryBuilder::new(driver, BuilderConfig::default());
//!
//! let sql = db.table("users").where_("id", 5).get_sql();
//! assert_eq!(sql, "SELECT * FROM `users` WHERE id=5 LIMIT 1");
//! ```

pub mod builder;
pub mod config;
pub mod driver;
pub mod error;
pub mod escape;
mod executor;
pub mod macros;
pub mod query;
pub mod sqlite;
pub mod traits;
mod transaction;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::QueryBuilder;
pub use config::BuilderConfig;
pub use driver::{Driver, DriverError, RawRows};
pub use error::{DbError, Result};
pub use executor::Outcome;
pub use query::clause::{JoinKind, JoinOn, Limit};
pub use sqlite::SqliteDriver;
pub use traits::{FromRow, FromValue, RowView};
pub use value::{Record, Row, Shape, Value};
