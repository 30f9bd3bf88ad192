use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single SQL value as it travels between the builder, the driver and the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Column name to value, in column order.
pub type Record = IndexMap<String, Value>;

/// How fetched rows are handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shape {
    /// Rows keyed by column name.
    #[default]
    Mapping,
    /// Rows as positional value lists.
    Tuple,
}

/// A fetched row in the requested [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Row {
    Mapping(Record),
    Tuple(Vec<Value>),
}

impl Row {
    /// Builds a row from parallel column and value lists.
    ///
    /// In mapping shape a repeated column name keeps the last value.
    pub fn from_parts(columns: &[String], values: Vec<Value>, shape: Shape) -> Self {
        match shape {
            Shape::Tuple => Row::Tuple(values),
            Shape::Mapping => Row::Mapping(columns.iter().cloned().zip(values).collect()),
        }
    }

    /// Looks a column up by name. Always `None` for tuple rows.
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            Row::Mapping(record) => record.get(column),
            Row::Tuple(_) => None,
        }
    }

    /// Looks a value up by position, in either shape.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Row::Mapping(record) => record.get_index(index).map(|(_, v)| v),
            Row::Tuple(values) => values.get(index),
        }
    }

    pub fn as_mapping(&self) -> Option<&Record> {
        match self {
            Row::Mapping(record) => Some(record),
            Row::Tuple(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Mapping(record) => record.len(),
            Row::Tuple(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(5), Value::Integer(5));
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
        assert_eq!(Value::from("ada"), Value::Text("ada".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_value_json_shape() {
        let values = vec![
            Value::Null,
            Value::Integer(3),
            Value::Float(2.5),
            Value::Text("x".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,3,2.5,"x"]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_row_shapes() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let values = vec![Value::Integer(1), Value::Text("ada".into())];

        let mapping = Row::from_parts(&columns, values.clone(), Shape::Mapping);
        assert_eq!(mapping.get("name"), Some(&Value::Text("ada".into())));
        assert_eq!(mapping.get_index(0), Some(&Value::Integer(1)));

        let tuple = Row::from_parts(&columns, values, Shape::Tuple);
        assert_eq!(tuple.get("name"), None);
        assert_eq!(tuple.get_index(1), Some(&Value::Text("ada".into())));
        assert_eq!(tuple.len(), 2);
    }

    #[test]
    fn test_row_mapping_keeps_last_duplicate() {
        let columns = vec!["id".to_string(), "id".to_string()];
        let row = Row::from_parts(
            &columns,
            vec![Value::Integer(1), Value::Integer(2)],
            Shape::Mapping,
        );
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("id"), Some(&Value::Integer(2)));
    }
}
