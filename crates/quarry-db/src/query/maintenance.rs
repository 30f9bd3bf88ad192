//! Table maintenance statements.

use crate::{builder::QueryBuilder, driver::Driver, error::Result, value::Row};

impl<D: Driver> QueryBuilder<D> {
    pub fn analyze(&mut self) -> Result<Vec<Row>> {
        self.maintain("ANALYZE")
    }

    pub fn check(&mut self) -> Result<Vec<Row>> {
        self.maintain("CHECK")
    }

    pub fn checksum(&mut self) -> Result<Vec<Row>> {
        self.maintain("CHECKSUM")
    }

    pub fn optimize(&mut self) -> Result<Vec<Row>> {
        self.maintain("OPTIMIZE")
    }

    pub fn repair(&mut self) -> Result<Vec<Row>> {
        self.maintain("REPAIR")
    }

    /// Runs `<verb> TABLE <from>`. The report rows are read like any SELECT, so an armed cache
    /// applies.
    fn maintain(&mut self, verb: &str) -> Result<Vec<Row>> {
        let state = std::mem::take(&mut self.state);
        let sql = format!("{verb} TABLE {}", state.from);
        self.read(&sql, state.shape, false, true)
    }
}
