//! Nestable transactions. Inner levels are savepoints named after their depth.

use tracing::debug;

use crate::{
    builder::QueryBuilder,
    driver::Driver,
    error::{DbError, Result},
};

impl<D: Driver> QueryBuilder<D> {
    /// Opens a transaction, or a `SAVEPOINT trans<depth>` when one is already open.
    pub fn transaction(&mut self) -> Result<()> {
        let depth = self.transaction_depth + 1;
        if depth == 1 {
            debug!("begin transaction");
            if let Err(err) = self.driver.begin() {
                return Err(self.fail("BEGIN", err));
            }
        } else {
            self.exec_transaction_statement(&format!("SAVEPOINT trans{depth}"))?;
        }
        self.transaction_depth = depth;
        Ok(())
    }

    /// Leaves one level. Only leaving the outermost level commits.
    pub fn commit(&mut self) -> Result<()> {
        match self.transaction_depth {
            0 => Err(DbError::NoTransaction),
            1 => {
                debug!("commit transaction");
                if let Err(err) = self.driver.commit() {
                    return Err(self.fail("COMMIT", err));
                }
                self.transaction_depth = 0;
                Ok(())
            }
            _ => {
                self.transaction_depth -= 1;
                Ok(())
            }
        }
    }

    /// Undoes the innermost level: back to its savepoint, or the whole transaction at the
    /// outermost level.
    pub fn rollback(&mut self) -> Result<()> {
        match self.transaction_depth {
            0 => Err(DbError::NoTransaction),
            1 => {
                debug!("rollback transaction");
                self.transaction_depth = 0;
                if let Err(err) = self.driver.rollback() {
                    return Err(self.fail("ROLLBACK", err));
                }
                Ok(())
            }
            depth => {
                self.transaction_depth -= 1;
                self.exec_transaction_statement(&format!("ROLLBACK TO trans{depth}"))
            }
        }
    }

    fn exec_transaction_statement(&mut self, sql: &str) -> Result<()> {
        debug!("{}", sql);
        match self.driver.exec_raw(sql) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(sql, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{test_utils::MockDriver, BuilderConfig, DbError, QueryBuilder};

    fn db() -> QueryBuilder<MockDriver> {
        QueryBuilder::new(MockDriver::default(), BuilderConfig::default())
    }

    #[test]
    fn test_nested_commit() {
        let mut db = db();
        db.transaction().unwrap();
        db.transaction().unwrap();
        assert_eq!(db.transaction_depth(), 2);

        db.commit().unwrap();
        assert_eq!(db.transaction_depth(), 1);
        db.commit().unwrap();
        assert_eq!(db.transaction_depth(), 0);

        assert_eq!(db.driver().calls, vec!["begin", "exec_raw", "commit"]);
        assert_eq!(db.driver().raw, vec!["SAVEPOINT trans2"]);
    }

    #[test]
    fn test_nested_rollback() {
        let mut db = db();
        db.transaction().unwrap();
        db.transaction().unwrap();
        db.transaction().unwrap();

        db.rollback().unwrap();
        assert_eq!(db.transaction_depth(), 2);
        db.rollback().unwrap();
        db.rollback().unwrap();
        assert_eq!(db.transaction_depth(), 0);

        assert_eq!(
            db.driver().raw,
            vec![
                "SAVEPOINT trans2",
                "SAVEPOINT trans3",
                "ROLLBACK TO trans3",
                "ROLLBACK TO trans2",
            ]
        );
        assert_eq!(db.driver().calls.last(), Some(&"rollback"));
    }

    #[test]
    fn test_commit_without_transaction() {
        let mut db = db();
        assert!(matches!(db.commit(), Err(DbError::NoTransaction)));
        assert!(matches!(db.rollback(), Err(DbError::NoTransaction)));
        assert!(db.driver().calls.is_empty());
    }

    #[test]
    fn test_failed_begin_keeps_depth() {
        let mut driver = MockDriver::default();
        driver.fail_with = Some("database is locked".into());
        let mut db = QueryBuilder::new(driver, BuilderConfig::default());

        assert!(db.transaction().is_err());
        assert_eq!(db.transaction_depth(), 0);
        assert_eq!(db.last_error(), Some("database is locked"));
    }

    #[test]
    fn test_depth_survives_clause_reset() {
        let mut db = db();
        db.transaction().unwrap();
        db.table("t").where_("a", 1).get_all_sql();
        assert_eq!(db.transaction_depth(), 1);
    }
}
