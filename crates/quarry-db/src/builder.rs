//! The builder type, table and column selection, and run introspection.

use quarry_cache::ResultCache;

use crate::{
    config::BuilderConfig,
    driver::Driver,
    escape::escape,
    query::state::BuilderState,
    value::{Shape, Value},
};

/// Fluent SQL builder owning its [`Driver`].
///
/// Clause methods take `&mut self` and return `&mut Self` so they chain. Terminal methods render
/// the accumulated clauses into one statement, run it, and reset the clause state; run
/// statistics such as [`num_rows`](Self::num_rows) survive until the next statement.
///
/// # Example
///
/// ```
/// use quarry_db::{BuilderConfig, QueryBuilder, SqliteDriver};
///
/// let mut db = QueryBuilder::new(
///     SqliteDriver::open_in_memory().unwrap(),
///     BuilderConfig::default(),
/// );
///
/// let sql = db
///     .table("posts")
///     .select("id, title")
///     .where_("status", "published")
///     .order_by_dir("created_at", "desc")
///     .limit(10)
///     .get_all_sql();
///
/// assert_eq!(
///     sql,
///     "SELECT id, title FROM `posts` WHERE status='published' ORDER BY created_at DESC LIMIT 10"
/// );
/// ```
pub struct QueryBuilder<D: Driver> {
    pub(crate) driver: D,
    pub(crate) config: BuilderConfig,
    pub(crate) state: BuilderState,
    pub(crate) active_cache: Option<ResultCache>,
    pub(crate) staged: Option<String>,
    pub(crate) last_query: Option<String>,
    pub(crate) last_error: Option<String>,
    pub(crate) num_rows: u64,
    pub(crate) insert_id: Option<Value>,
    pub(crate) query_count: usize,
    pub(crate) transaction_depth: usize,
}

impl<D: Driver> QueryBuilder<D> {
    pub fn new(driver: D, config: BuilderConfig) -> Self {
        Self {
            driver,
            config,
            state: BuilderState::default(),
            active_cache: None,
            staged: None,
            last_query: None,
            last_error: None,
            num_rows: 0,
            insert_id: None,
            query_count: 0,
            transaction_depth: 0,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Sets the table to work on. A comma separated list selects several tables.
    pub fn table(&mut self, table: &str) -> &mut Self {
        self.state.from = table
            .split(',')
            .map(|name| self.quote_table(name.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        self
    }

    pub fn tables(&mut self, tables: &[&str]) -> &mut Self {
        self.state.from = tables
            .iter()
            .map(|name| self.quote_table(name))
            .collect::<Vec<_>>()
            .join(", ");
        self
    }

    /// Adds columns to the select list. The first call replaces the default `*`.
    pub fn select(&mut self, fields: &str) -> &mut Self {
        self.push_select(fields);
        self
    }

    pub fn select_fields(&mut self, fields: &[&str]) -> &mut Self {
        self.push_select(&fields.join(", "));
        self
    }

    pub fn max(&mut self, field: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate("MAX", field, alias)
    }

    pub fn min(&mut self, field: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate("MIN", field, alias)
    }

    pub fn sum(&mut self, field: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate("SUM", field, alias)
    }

    pub fn count(&mut self, field: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate("COUNT", field, alias)
    }

    pub fn avg(&mut self, field: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate("AVG", field, alias)
    }

    /// Chooses how rows of the next statement are returned.
    pub fn shape(&mut self, shape: Shape) -> &mut Self {
        self.state.shape = shape;
        self
    }

    /// Rows returned (or affected) by the last statement.
    pub fn num_rows(&self) -> u64 {
        self.num_rows
    }

    /// Identifier generated by the last insert.
    pub fn insert_id(&self) -> Option<&Value> {
        self.insert_id.as_ref()
    }

    /// Text of the last statement dispatched or staged.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Statements executed successfully, cache hits included.
    pub fn query_count(&self) -> usize {
        self.query_count
    }

    pub fn transaction_depth(&self) -> usize {
        self.transaction_depth
    }

    /// Renders `value` as a literal using this builder's driver.
    pub fn escape(&self, value: impl Into<Value>) -> String {
        escape(&value.into(), &self.driver)
    }

    pub(crate) fn quote_table(&self, name: &str) -> String {
        format!("`{}{}`", self.config.table_prefix, name)
    }

    pub(crate) fn reset(&mut self) {
        self.state = BuilderState::default();
    }

    fn push_select(&mut self, fields: &str) {
        if self.state.select == "*" {
            self.state.select = fields.to_string();
        } else {
            self.state.select.push_str(", ");
            self.state.select.push_str(fields);
        }
    }

    fn aggregate(&mut self, func: &str, field: &str, alias: Option<&str>) -> &mut Self {
        let column = match alias {
            Some(alias) => format!("{func}({field}) AS {alias}"),
            None => format!("{func}({field})"),
        };
        self.push_select(&column);
        self
    }
}
