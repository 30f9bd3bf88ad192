//! INSERT assembly.

use crate::{
    builder::QueryBuilder,
    driver::Driver,
    error::{DbError, Result},
    escape::escape,
    value::{Record, Value},
};

impl<D: Driver> QueryBuilder<D> {
    /// Inserts one row and returns the identifier the driver reports for it.
    pub fn insert(&mut self, record: &Record) -> Result<Option<Value>> {
        let sql = self.insert_sql(record)?;
        self.mutate(&sql)?;
        Ok(self.insert_id.clone())
    }

    /// Inserts several rows with one statement. Columns are taken from the first record.
    pub fn insert_many(&mut self, records: &[Record]) -> Result<Option<Value>> {
        let sql = self.insert_many_sql(records)?;
        self.mutate(&sql)?;
        Ok(self.insert_id.clone())
    }

    /// Renders what [`insert`](Self::insert) would run without running it.
    pub fn insert_sql(&mut self, record: &Record) -> Result<String> {
        self.insert_many_sql(std::slice::from_ref(record))
    }

    /// Renders what [`insert_many`](Self::insert_many) would run without running it.
    pub fn insert_many_sql(&mut self, records: &[Record]) -> Result<String> {
        let state = std::mem::take(&mut self.state);

        let Some(first) = records.first().filter(|record| !record.is_empty()) else {
            return Err(DbError::InvalidStatement(format!(
                "nothing to insert into {}",
                state.from
            )));
        };

        let columns = first.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
        let tuples = records
            .iter()
            .map(|record| {
                let values = record
                    .values()
                    .map(|value| escape(value, &self.driver))
                    .collect::<Vec<_>>();
                format!("({})", values.join(", "))
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "INSERT INTO {} ({columns}) VALUES {tuples}",
            state.from
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{record, test_utils::MockDriver, BuilderConfig, DbError, QueryBuilder, Value};

    fn db() -> QueryBuilder<MockDriver> {
        QueryBuilder::new(MockDriver::default(), BuilderConfig::default())
    }

    #[test]
    fn test_insert_sql() {
        let sql = db()
            .table("users")
            .insert_sql(&record! { "name" => "o'hara", "age" => 40, "email" => None::<String> })
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `users` (name, age, email) VALUES ('o''hara', 40, NULL)"
        );
    }

    #[test]
    fn test_insert_many_sql() {
        let rows = [record! { "a" => 1, "b" => 2 }, record! { "a" => 3, "b" => 4 }];
        let sql = db().table("t").insert_many_sql(&rows).unwrap();
        assert_eq!(sql, "INSERT INTO `t` (a, b) VALUES (1, 2), (3, 4)");
    }

    #[test]
    fn test_insert_many_dispatches_once() {
        let mut driver = MockDriver::default();
        driver.affected = 2;
        driver.insert_id = Some(Value::Integer(7));
        let mut db = QueryBuilder::new(driver, BuilderConfig::default());

        let rows = [record! { "a" => 1 }, record! { "a" => 2 }];
        let id = db.table("t").insert_many(&rows).unwrap();

        assert_eq!(id, Some(Value::Integer(7)));
        assert_eq!(db.num_rows(), 2);
        assert_eq!(db.driver().executed, vec!["INSERT INTO `t` (a) VALUES (1), (2)"]);
    }

    #[test]
    fn test_empty_insert_is_rejected() {
        let mut db = db();
        let err = db.table("t").insert(&record! {}).unwrap_err();
        assert!(matches!(err, DbError::InvalidStatement(_)));
        assert!(db.driver().executed.is_empty());

        let err = db.table("t").insert_many(&[]).unwrap_err();
        assert!(matches!(err, DbError::InvalidStatement(_)));
    }
}
