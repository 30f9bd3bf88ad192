//! Disk-backed result cache keyed by SQL statement text.
//!
//! Each entry lives in its own `<hash>.cache` file holding the payload and an absolute expiry
//! time. The cache is best effort: concurrent writers race with last write wins, and anything
//! that fails to decode is treated as absent.

pub mod cache;
pub mod error;

pub use cache::{CacheEntry, ResultCache};
pub use error::{CacheError, Result};
