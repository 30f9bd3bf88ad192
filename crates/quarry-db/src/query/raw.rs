//! Caller-written statements with positional `?` placeholders.

use crate::{
    builder::QueryBuilder,
    driver::Driver,
    error::Result,
    escape::bind_placeholders,
    executor::Outcome,
    value::{Row, Value},
};

impl<D: Driver> QueryBuilder<D> {
    /// Binds `params` into `sql` and runs it, returning rows for reads and the affected count
    /// otherwise. An armed cache applies to reads.
    pub fn raw(&mut self, sql: &str, params: &[Value]) -> Result<Outcome> {
        let sql = bind_placeholders(sql, params, &self.driver);
        let shape = std::mem::take(&mut self.state).shape;
        self.run(&sql, shape)
    }

    /// Binds `params` into `sql` and holds the statement for [`fetch`](Self::fetch),
    /// [`fetch_all`](Self::fetch_all) or [`exec`](Self::exec).
    pub fn query(&mut self, sql: &str, params: &[Value]) -> &mut Self {
        let sql = bind_placeholders(sql, params, &self.driver);
        self.reset();
        self.last_query = Some(sql.clone());
        self.staged = Some(sql);
        self
    }

    /// Runs the held statement and returns its first row.
    pub fn fetch(&mut self) -> Result<Option<Row>> {
        let Some(sql) = self.staged.take() else {
            return Ok(None);
        };
        let shape = std::mem::take(&mut self.state).shape;
        Ok(self.read(&sql, shape, true, false)?.into_iter().next())
    }

    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        let Some(sql) = self.staged.take() else {
            return Ok(Vec::new());
        };
        let shape = std::mem::take(&mut self.state).shape;
        self.read(&sql, shape, false, false)
    }

    /// Runs the held statement as a mutation and returns the affected row count.
    pub fn exec(&mut self) -> Result<Option<u64>> {
        let Some(sql) = self.staged.take() else {
            return Ok(None);
        };
        self.mutate(&sql).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use crate::{test_utils::MockDriver, BuilderConfig, QueryBuilder, Value};

    #[test]
    fn test_query_stages_bound_text() {
        let driver = MockDriver::with_rows(&["id"], vec![vec![Value::Integer(1)], vec![Value::Integer(2)]]);
        let mut db = QueryBuilder::new(driver, BuilderConfig::default());

        db.query("SELECT id FROM t WHERE name = ? AND n > ?", &[Value::from("a'b"), Value::Integer(0)]);
        assert_eq!(
            db.last_query(),
            Some("SELECT id FROM t WHERE name = 'a''b' AND n > 0")
        );
        assert!(db.driver().calls.is_empty());

        let row = db.fetch().unwrap().unwrap();
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(db.num_rows(), 1);
    }

    #[test]
    fn test_fetch_all_and_exec() {
        let mut driver = MockDriver::with_rows(&["id"], vec![vec![Value::Integer(1)], vec![Value::Integer(2)]]);
        driver.affected = 5;
        let mut db = QueryBuilder::new(driver, BuilderConfig::default());

        let rows = db.query("SELECT id FROM t", &[]).fetch_all().unwrap();
        assert_eq!(rows.len(), 2);

        let affected = db.query("DELETE FROM t WHERE id > ?", &[Value::Integer(1)]).exec().unwrap();
        assert_eq!(affected, Some(5));
        assert_eq!(db.driver().executed, vec!["DELETE FROM t WHERE id > 1"]);
    }

    #[test]
    fn test_nothing_staged() {
        let mut db = QueryBuilder::new(MockDriver::default(), BuilderConfig::default());
        assert_eq!(db.fetch().unwrap(), None);
        assert!(db.fetch_all().unwrap().is_empty());
        assert_eq!(db.exec().unwrap(), None);
        assert!(db.driver().calls.is_empty());
    }

    #[test]
    fn test_missing_params_leave_blank() {
        let mut db = QueryBuilder::new(MockDriver::default(), BuilderConfig::default());
        db.query("SELECT * FROM t WHERE a = ? AND b = ?", &[Value::Integer(1)]);
        assert_eq!(db.last_query(), Some("SELECT * FROM t WHERE a = 1 AND b = "));
    }
}
