//! Macros for building rows to insert or update.

/// Builds a [`Record`](crate::Record) from `column => value` pairs, keeping their order.
///
/// Values are converted with `Into<Value>`.
///
/// # Example
///
/// ```
/// use quarry_db::{record, Value};
///
/// let row = record! {
///     "name" => "ada",
///     "age" => 36,
///     "email" => None::<String>,
/// };
///
/// assert_eq!(row["age"], Value::Integer(36));
/// assert_eq!(row.keys().collect::<Vec<_>>(), ["name", "age", "email"]);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(::std::string::String::from($column), $crate::Value::from($value));
        )+
        record
    }};
}
