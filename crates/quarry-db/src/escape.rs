//! Conversion of values into SQL literals.

use crate::{driver::Driver, value::Value};

/// Renders `value` as a literal for direct inclusion in a statement.
///
/// Text goes through the driver's quoting; numbers are written as-is and non-finite floats,
/// which have no literal form, become `NULL`.
pub fn escape<D: Driver + ?Sized>(value: &Value, driver: &D) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(_) => "NULL".to_string(),
        Value::Text(text) => driver.quote(text),
    }
}

/// Replaces each `?` in `template`, left to right, with the next escaped parameter.
///
/// Placeholders left over once the parameters run out are dropped.
pub fn bind_placeholders<D: Driver + ?Sized>(
    template: &str,
    params: &[Value],
    driver: &D,
) -> String {
    let mut params = params.iter();
    let mut out = String::with_capacity(template.len());

    for c in template.chars() {
        if c == '?' {
            if let Some(value) = params.next() {
                out.push_str(&escape(value, driver));
            }
        } else {
            out.push(c);
        }
    }

    out
}
