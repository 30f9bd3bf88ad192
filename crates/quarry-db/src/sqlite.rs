use std::path::Path;

use rusqlite::{types::ValueRef, Connection};
use tracing::trace;

use crate::{
    driver::{Driver, DriverError, RawRows},
    error::{DbError, Result},
    value::Value,
};

/// [`Driver`] backed by a SQLite connection.
pub struct SqliteDriver {
    conn: Connection,
    last_error: Option<String>,
}

impl SqliteDriver {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            DbError::Connection(format!("{}: {err}", path.display()))
        })?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|err| DbError::Connection(err.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            last_error: None,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn record<T>(&mut self, result: rusqlite::Result<T>) -> std::result::Result<T, DriverError> {
        result.map_err(|err| {
            let message = err.to_string();
            self.last_error = Some(message.clone());
            DriverError::new(message)
        })
    }

    fn query_rows(&self, sql: &str) -> rusqlite::Result<RawRows> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(from_value_ref(row.get_ref(idx)?));
            }
            out.push(values);
        }

        Ok(RawRows { columns, rows: out })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl Driver for SqliteDriver {
    fn quote(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn fetch(&mut self, sql: &str) -> std::result::Result<RawRows, DriverError> {
        trace!("sqlite fetch: {}", sql);
        let result = self.query_rows(sql);
        self.record(result)
    }

    fn execute(&mut self, sql: &str) -> std::result::Result<u64, DriverError> {
        trace!("sqlite execute: {}", sql);
        let result = self.conn.execute(sql, []);
        self.record(result).map(|n| n as u64)
    }

    fn last_insert_id(&self) -> Option<Value> {
        Some(Value::Integer(self.conn.last_insert_rowid()))
    }

    fn begin(&mut self) -> std::result::Result<(), DriverError> {
        let result = self.conn.execute_batch("BEGIN");
        self.record(result)
    }

    fn commit(&mut self) -> std::result::Result<(), DriverError> {
        let result = self.conn.execute_batch("COMMIT");
        self.record(result)
    }

    fn rollback(&mut self) -> std::result::Result<(), DriverError> {
        let result = self.conn.execute_batch("ROLLBACK");
        self.record(result)
    }

    fn exec_raw(&mut self, sql: &str) -> std::result::Result<(), DriverError> {
        let result = self.conn.execute_batch(sql);
        self.record(result)
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
