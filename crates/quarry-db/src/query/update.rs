//! UPDATE assembly, including counters and in-place text replacement.

use crate::{
    builder::QueryBuilder,
    driver::Driver,
    error::{DbError, Result},
    escape::escape,
    value::{Record, Value},
};

impl<D: Driver> QueryBuilder<D> {
    /// Sets each column of `record` to its escaped value and returns the affected row count.
    pub fn update(&mut self, record: &Record) -> Result<u64> {
        let sql = self.update_sql(record)?;
        self.mutate(&sql)
    }

    /// Like [`update`](Self::update) with right-hand sides written into the statement as-is,
    /// for expressions such as `NOW()` or `hits + 1`.
    pub fn update_raw(&mut self, assignments: &[(&str, &str)]) -> Result<u64> {
        let assignments = assignments
            .iter()
            .map(|(column, expr)| format!("{column}={expr}"))
            .collect::<Vec<_>>();
        let sql = self.assemble_update(assignments)?;
        self.mutate(&sql)
    }

    /// Renders what [`update`](Self::update) would run without running it.
    pub fn update_sql(&mut self, record: &Record) -> Result<String> {
        let assignments = record
            .iter()
            .map(|(column, value)| format!("{column}={}", escape(value, &self.driver)))
            .collect::<Vec<_>>();
        self.assemble_update(assignments)
    }

    /// Adds `amount` to `field`.
    pub fn increment_field(&mut self, field: &str, amount: impl Into<Value>) -> Result<u64> {
        self.increment_field_with(field, "+", amount)
    }

    /// Applies `field = field<op><amount>`. Meant for arithmetic operators such as `-` or `*`.
    pub fn increment_field_with(
        &mut self,
        field: &str,
        op: &str,
        amount: impl Into<Value>,
    ) -> Result<u64> {
        let amount = self.escape(amount);
        let sql = self.assemble_update(vec![format!("`{field}` = `{field}`{op}{amount}")])?;
        self.mutate(&sql)
    }

    /// Replaces every occurrence of `from` with `to` inside `field`.
    pub fn replace_text(&mut self, field: &str, from: &str, to: &str) -> Result<u64> {
        let state = std::mem::take(&mut self.state);
        let mut sql = format!(
            "UPDATE {} SET `{field}` = replace(`{field}`, {}, {})",
            state.from,
            self.driver.quote(from),
            self.driver.quote(to)
        );
        state.push_where(&mut sql);
        self.mutate(&sql)
    }

    fn assemble_update(&mut self, assignments: Vec<String>) -> Result<String> {
        let state = std::mem::take(&mut self.state);
        if assignments.is_empty() {
            return Err(DbError::InvalidStatement(format!(
                "nothing to update in {}",
                state.from
            )));
        }

        let mut sql = format!("UPDATE {}", state.from);
        state.push_joins(&mut sql);
        sql.push_str(" SET ");
        sql.push_str(&assignments.join(", "));
        state.push_trailer(&mut sql);
        Ok(sql)
    }
}
