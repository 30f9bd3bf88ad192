//! Conversions from fetched rows into caller types.

use crate::{
    error::{DbError, Result},
    value::{Record, Value},
};

/// Borrowed view over one fetched row, addressed by column name.
pub struct RowView<'a> {
    record: &'a Record,
}

impl<'a> RowView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Reads `column` and converts it.
    ///
    /// # Errors
    ///
    /// * [`DbError::MissingColumn`] if the row has no such column
    /// * [`DbError::Decode`] if the value cannot be converted to `T`
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self
            .record
            .get(column)
            .ok_or_else(|| DbError::MissingColumn(column.to_string()))?;
        T::from_value(value).map_err(|message| {
            DbError::Decode {
                column: column.to_string(),
                message,
            }
        })
    }

    pub fn record(&self) -> &Record {
        self.record
    }
}

/// A trait for types that can be constructed from a fetched row.
///
/// Typed fetches bypass the result cache.
///
/// # Example
///
/// ```
/// use quarry_db::{FromRow, RowView};
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &RowView) -> quarry_db::Result<Self> {
///         Ok(User {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &RowView) -> Result<Self>;
}

/// Conversion from a single column value. The error is a human readable reason.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> std::result::Result<Self, String>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {expected}, found {value:?}")
}

impl FromValue for Value {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        value.as_i64().ok_or_else(|| mismatch("integer", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|err| err.to_string())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        value.as_f64().ok_or_else(|| mismatch("number", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        i64::from_value(value).map(|i| i != 0)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
