//! DELETE assembly.

use crate::{builder::QueryBuilder, driver::Driver, error::Result};

impl<D: Driver> QueryBuilder<D> {
    /// Deletes matching rows and returns how many were affected.
    ///
    /// Without a WHERE condition the statement becomes `TRUNCATE TABLE`, so an unconditional
    /// `DELETE FROM` is never issued. ORDER BY and LIMIT only apply to a conditional delete.
    pub fn delete(&mut self) -> Result<u64> {
        let sql = self.delete_sql();
        self.mutate(&sql)
    }

    /// Renders what [`delete`](Self::delete) would run without running it.
    pub fn delete_sql(&mut self) -> String {
        let state = std::mem::take(&mut self.state);
        if state.where_expr.is_empty() {
            return format!("TRUNCATE TABLE {}", state.from);
        }

        let mut sql = format!("DELETE FROM {}", state.from);
        state.push_trailer(&mut sql);
        sql
    }
}

#[cfg(test)]
mod tests {
    use crate::{test_utils::MockDriver, BuilderConfig, QueryBuilder};

    fn db() -> QueryBuilder<MockDriver> {
        QueryBuilder::new(MockDriver::default(), BuilderConfig::default())
    }

    #[test]
    fn test_delete_without_filter_truncates() {
        assert_eq!(db().table("logs").delete_sql(), "TRUNCATE TABLE `logs`");
    }

    #[test]
    fn test_delete_with_trailer() {
        assert_eq!(
            db().table("logs").where_op("age", ">", 30).delete_sql(),
            "DELETE FROM `logs` WHERE age > 30"
        );
        assert_eq!(
            db()
                .table("logs")
                .where_("level", "debug")
                .order_by_dir("id", "asc")
                .limit(100)
                .delete_sql(),
            "DELETE FROM `logs` WHERE level='debug' ORDER BY id ASC LIMIT 100"
        );
    }

    #[test]
    fn test_delete_without_where_ignores_trailer() {
        assert_eq!(
            db().table("logs").order_by("id").limit(100).delete_sql(),
            "TRUNCATE TABLE `logs`"
        );
    }

    #[test]
    fn test_delete_reports_affected() {
        let mut driver = MockDriver::default();
        driver.affected = 4;
        let mut db = QueryBuilder::new(driver, BuilderConfig::default());

        assert_eq!(db.table("logs").where_("level", "debug").delete().unwrap(), 4);
        assert_eq!(db.num_rows(), 4);
        assert_eq!(
            db.driver().executed,
            vec!["DELETE FROM `logs` WHERE level='debug'"]
        );
    }
}
