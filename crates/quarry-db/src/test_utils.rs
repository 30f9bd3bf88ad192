use std::collections::VecDeque;

use crate::{
    driver::{Driver, DriverError, RawRows},
    value::Value,
};

/// Driver double that records every call and replays queued results.
#[derive(Default)]
pub struct MockDriver {
    pub fetched: Vec<String>,
    pub executed: Vec<String>,
    pub raw: Vec<String>,
    pub calls: Vec<&'static str>,
    pub results: VecDeque<RawRows>,
    pub affected: u64,
    pub insert_id: Option<Value>,
    pub fail_with: Option<String>,
    /// Reported by `last_error` in place of the failure message when set.
    pub diagnostic: Option<String>,
    last_error: Option<String>,
}

impl MockDriver {
    pub fn with_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let mut driver = Self::default();
        driver.push_rows(columns, rows);
        driver
    }

    pub fn push_rows(&mut self, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.results.push_back(RawRows {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
    }

    fn check(&mut self) -> Result<(), DriverError> {
        match &self.fail_with {
            Some(message) => {
                self.last_error = Some(message.clone());
                Err(DriverError::new(message.clone()))
            }
            None => Ok(()),
        }
    }
}

impl Driver for MockDriver {
    fn quote(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn fetch(&mut self, sql: &str) -> Result<RawRows, DriverError> {
        self.calls.push("fetch");
        self.fetched.push(sql.to_string());
        self.check()?;
        Ok(self.results.pop_front().unwrap_or_default())
    }

    fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.calls.push("execute");
        self.executed.push(sql.to_string());
        self.check()?;
        Ok(self.affected)
    }

    fn last_insert_id(&self) -> Option<Value> {
        self.insert_id.clone()
    }

    fn begin(&mut self) -> Result<(), DriverError> {
        self.calls.push("begin");
        self.check()
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.calls.push("commit");
        self.check()
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.calls.push("rollback");
        self.check()
    }

    fn exec_raw(&mut self, sql: &str) -> Result<(), DriverError> {
        self.calls.push("exec_raw");
        self.raw.push(sql.to_string());
        self.check()
    }

    fn last_error(&self) -> Option<String> {
        self.diagnostic.clone().or_else(|| self.last_error.clone())
    }
}
