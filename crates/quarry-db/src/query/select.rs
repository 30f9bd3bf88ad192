//! SELECT assembly plus the join, grouping, ordering and paging clauses.

use quarry_cache::ResultCache;
use tracing::warn;

use super::{
    clause::{is_operator, JoinKind, JoinOn, Limit},
    state::BuilderState,
};
use crate::{
    builder::QueryBuilder,
    driver::Driver,
    error::Result,
    escape::bind_placeholders,
    traits::{FromRow, RowView},
    value::{Row, Shape, Value},
};

/// Renders `SELECT` with each optional clause in its fixed position.
pub(crate) fn build_select(state: &BuilderState) -> String {
    let mut sql = format!("SELECT {} FROM {}", state.select, state.from);
    state.push_joins(&mut sql);
    state.push_where(&mut sql);
    if let Some(group_by) = &state.group_by {
        sql.push_str(" GROUP BY ");
        sql.push_str(group_by);
    }
    if let Some(having) = &state.having {
        sql.push_str(" HAVING ");
        sql.push_str(having);
    }
    if let Some(order_by) = &state.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
    if let Some(limit) = &state.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = state.offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

impl<D: Driver> QueryBuilder<D> {
    /// Plain `JOIN`. See [`JoinOn`] for the accepted ON forms.
    ///
    /// A table written as `"name as alias"` keeps its alias outside the quotes.
    pub fn join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::Plain, table, on.into())
    }

    pub fn inner_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::Inner, table, on.into())
    }

    pub fn left_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::Left, table, on.into())
    }

    pub fn right_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::Right, table, on.into())
    }

    pub fn full_outer_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::FullOuter, table, on.into())
    }

    pub fn left_outer_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::LeftOuter, table, on.into())
    }

    pub fn right_outer_join(&mut self, table: &str, on: impl Into<JoinOn>) -> &mut Self {
        self.join_with(JoinKind::RightOuter, table, on.into())
    }

    pub fn join_with(&mut self, kind: JoinKind, table: &str, on: JoinOn) -> &mut Self {
        let table = match table.split_once(" as ") {
            Some((name, alias)) => format!("{} as {}", self.quote_table(name.trim()), alias.trim()),
            None => self.quote_table(table),
        };

        let condition = match on {
            JoinOn::None => None,
            JoinOn::Raw(on) => Some(on),
            JoinOn::Compare { left, op, right } if is_operator(&op) => {
                Some(format!("{left} {op} {right}"))
            }
            JoinOn::Compare { left, op, .. } => {
                warn!(
                    "`{}` is not a comparison operator in join on {}; comparing `{}` to it",
                    op, table, left
                );
                Some(format!("{left} = {op}"))
            }
        };

        let join = match condition {
            Some(condition) => format!("{} {table} ON {condition}", kind.keyword()),
            None => format!("{} {table}", kind.keyword()),
        };
        self.state.joins.push(join);
        self
    }

    /// Orders by `field`, ascending unless the field already carries a direction or is
    /// `rand()`.
    pub fn order_by(&mut self, field: &str) -> &mut Self {
        self.state.order_by = Some(
            if field.contains(' ') || field.eq_ignore_ascii_case("rand()") {
                field.to_string()
            } else {
                format!("{field} ASC")
            },
        );
        self
    }

    pub fn order_by_dir(&mut self, field: &str, dir: &str) -> &mut Self {
        self.state.order_by = Some(format!("{field} {}", dir.to_uppercase()));
        self
    }

    pub fn group_by(&mut self, field: &str) -> &mut Self {
        self.state.group_by = Some(field.to_string());
        self
    }

    pub fn group_by_fields(&mut self, fields: &[&str]) -> &mut Self {
        self.state.group_by = Some(fields.join(", "));
        self
    }

    /// `HAVING field=value`.
    pub fn having(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.having = Some(format!("{field}={}", self.escape(value)));
        self
    }

    /// `HAVING field op value`, with the same operator fallback as
    /// [`where_op`](Self::where_op).
    pub fn having_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.state.having = Some(self.compare(field, op, value.into()));
        self
    }

    pub fn having_params(&mut self, condition: &str, params: &[Value]) -> &mut Self {
        self.state.having = Some(bind_placeholders(condition, params, &self.driver));
        self
    }

    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.state.limit = Some(Limit::Count(count));
        self
    }

    /// `LIMIT offset, count`.
    pub fn limit_range(&mut self, offset: u64, count: u64) -> &mut Self {
        self.state.limit = Some(Limit::Range(offset, count));
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.state.offset = Some(offset);
        self
    }

    /// Limits to `per_page` rows starting at 1-based `page`. Pages below 1 read as page 1.
    pub fn pagination(&mut self, per_page: u64, page: i64) -> &mut Self {
        let page = u64::try_from(page.max(1)).unwrap_or(1);
        self.state.limit = Some(Limit::Count(per_page));
        self.state.offset = Some((page - 1).saturating_mul(per_page));
        self
    }

    /// Arms the result cache for the next statement. Entries live for `ttl_secs`.
    pub fn cache(&mut self, ttl_secs: u64) -> Result<&mut Self> {
        self.active_cache = Some(ResultCache::new(&self.config.cache_dir, ttl_secs)?);
        Ok(self)
    }

    /// Fetches the first matching row. Forces `LIMIT 1`.
    pub fn get(&mut self) -> Result<Option<Row>> {
        let (sql, shape) = self.take_single_select();
        Ok(self.read(&sql, shape, true, true)?.into_iter().next())
    }

    pub fn get_all(&mut self) -> Result<Vec<Row>> {
        let (sql, shape) = self.take_select();
        self.read(&sql, shape, false, true)
    }

    /// Renders what [`get`](Self::get) would run without running it.
    pub fn get_sql(&mut self) -> String {
        self.take_single_select().0
    }

    /// Renders what [`get_all`](Self::get_all) would run without running it.
    pub fn get_all_sql(&mut self) -> String {
        self.take_select().0
    }

    /// Fetches the first matching row as `T`. Typed fetches skip the result cache.
    pub fn get_as<T: FromRow>(&mut self) -> Result<Option<T>> {
        let (sql, _) = self.take_single_select();
        self.typed(&sql, true).map(|rows| rows.into_iter().next())
    }

    pub fn get_all_as<T: FromRow>(&mut self) -> Result<Vec<T>> {
        let (sql, _) = self.take_select();
        self.typed(&sql, false)
    }

    fn take_select(&mut self) -> (String, Shape) {
        let state = std::mem::take(&mut self.state);
        (build_select(&state), state.shape)
    }

    fn take_single_select(&mut self) -> (String, Shape) {
        self.state.limit = Some(Limit::Count(1));
        self.take_select()
    }

    fn typed<T: FromRow>(&mut self, sql: &str, single: bool) -> Result<Vec<T>> {
        let rows = self.read(sql, Shape::Mapping, single, false)?;
        rows.iter()
            .filter_map(Row::as_mapping)
            .map(|record| T::from_row(&RowView::new(record)))
            .collect()
    }
}
