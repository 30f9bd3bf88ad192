//! Statement dispatch: cache lookup, driver execution, row shaping and failure handling.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::{
    builder::QueryBuilder,
    driver::{Driver, DriverError, RawRows},
    error::{DbError, Result},
    value::{Row, Shape},
};

/// Quoted literals are matched first so whitespace inside them is never collapsed.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|\s{2,}"#)
        .expect("unable to compile whitespace regex")
});

static READ_STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(select|optimize|check|repair|checksum|analyze)")
        .expect("unable to compile statement classification regex")
});

/// What a dispatched statement produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Rows(Vec<Row>),
    Affected(u64),
}

/// Trims the statement and collapses whitespace runs outside quoted literals into a single
/// space.
pub fn normalize_statement(sql: &str) -> String {
    WHITESPACE_RE
        .replace_all(sql.trim(), |caps: &Captures| {
            let matched = &caps[0];
            if matched.starts_with(['\'', '"']) {
                matched.to_string()
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Whether the statement yields rows and is therefore eligible for the result cache.
pub fn is_read_statement(sql: &str) -> bool {
    READ_STATEMENT_RE.is_match(sql)
}

fn is_insert_statement(sql: &str) -> bool {
    sql.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("insert"))
}

pub(crate) fn shape_rows(raw: RawRows, shape: Shape) -> Vec<Row> {
    let RawRows { columns, rows } = raw;
    rows.into_iter()
        .map(|values| Row::from_parts(&columns, values, shape))
        .collect()
}

impl<D: Driver> QueryBuilder<D> {
    /// Classifies `sql` and runs it as a read or a mutation.
    pub(crate) fn run(&mut self, sql: &str, shape: Shape) -> Result<Outcome> {
        let sql = normalize_statement(sql);
        if is_read_statement(&sql) {
            let raw = self.read_raw(&sql, false, true)?;
            Ok(Outcome::Rows(shape_rows(raw, shape)))
        } else {
            self.mutate(&sql).map(Outcome::Affected)
        }
    }

    pub(crate) fn read(
        &mut self,
        sql: &str,
        shape: Shape,
        single: bool,
        cacheable: bool,
    ) -> Result<Vec<Row>> {
        let sql = normalize_statement(sql);
        let raw = self.read_raw(&sql, single, cacheable)?;
        Ok(shape_rows(raw, shape))
    }

    /// Fetches rows for an already normalized statement, consulting the armed cache when
    /// `cacheable` is set. The armed cache is consumed either way.
    pub(crate) fn read_raw(&mut self, sql: &str, single: bool, cacheable: bool) -> Result<RawRows> {
        self.begin_statement(sql);
        let cache = self.active_cache.take().filter(|_| cacheable);

        if let Some(cache) = &cache {
            if let Some(rows) = cache.get::<RawRows>(sql) {
                debug!(rows = rows.len(), "served from cache: {}", sql);
                self.num_rows = rows.len() as u64;
                self.query_count += 1;
                return Ok(rows);
            }
        }

        debug!("fetch: {}", sql);
        let mut rows = match self.driver.fetch(sql) {
            Ok(rows) => rows,
            Err(err) => return Err(self.fail(sql, err)),
        };
        if single {
            rows.rows.truncate(1);
        }
        self.num_rows = rows.len() as u64;
        debug!(rows = rows.len(), "fetched");

        if let Some(cache) = &cache {
            if let Err(err) = cache.set(sql, &rows) {
                warn!("failed to store cached result: {}", err);
            }
        }

        self.query_count += 1;
        Ok(rows)
    }

    /// Executes a statement that yields no rows and returns the affected row count.
    pub(crate) fn mutate(&mut self, sql: &str) -> Result<u64> {
        let sql = normalize_statement(sql);
        self.begin_statement(&sql);
        self.active_cache = None;

        debug!("execute: {}", sql);
        let affected = match self.driver.execute(&sql) {
            Ok(affected) => affected,
            Err(err) => return Err(self.fail(&sql, err)),
        };

        self.num_rows = affected;
        debug!(affected, "executed");
        if is_insert_statement(&sql) {
            self.insert_id = self.driver.last_insert_id();
        }
        self.query_count += 1;
        Ok(affected)
    }

    fn begin_statement(&mut self, sql: &str) {
        self.last_query = Some(sql.to_string());
        self.last_error = None;
        self.num_rows = 0;
        self.insert_id = None;
    }

    /// Records a driver failure, preferring the diagnostic the driver reports. In debug mode the failure is logged and the process exits.
    pub(crate) fn fail(&mut self, query: &str, err: DriverError) -> DbError {
        let message = self.driver.last_error().unwrap_or(err.message);
        self.last_error = Some(message.clone());

        if self.config.debug {
            error!("Query: {}", query);
            error!("Error: {}", message);
            std::process::exit(1);
        }

        DbError::Execution {
            query: query.to_string(),
            message,
        }
    }
}
