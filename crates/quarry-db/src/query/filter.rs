//! WHERE accumulators.
//!
//! Every method appends one condition, joined to the previous ones with `AND` or `OR`. The
//! `not_` variants negate the condition itself, never the connector.

use tracing::warn;

use super::clause::{is_operator, Connector};
use crate::{builder::QueryBuilder, driver::Driver, escape::bind_placeholders, value::Value};

impl<D: Driver> QueryBuilder<D> {
    /// `field=value`.
    pub fn where_(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = self.equals(field, value.into());
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_where(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = self.equals(field, value.into());
        self.push_condition(Connector::Or, fragment)
    }

    pub fn not_where(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = format!("NOT {}", self.equals(field, value.into()));
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_not_where(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = format!("NOT {}", self.equals(field, value.into()));
        self.push_condition(Connector::Or, fragment)
    }

    /// `field op value` for one of the comparison tokens in
    /// [`OPERATORS`](super::clause::OPERATORS).
    ///
    /// Any other `op` is taken as the value itself and compared with `=`, discarding `value`.
    pub fn where_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = self.compare(field, op, value.into());
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_where_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        let fragment = self.compare(field, op, value.into());
        self.push_condition(Connector::Or, fragment)
    }

    /// Appends a pre-formed condition verbatim.
    pub fn where_raw(&mut self, condition: &str) -> &mut Self {
        self.push_condition(Connector::And, condition.to_string())
    }

    pub fn or_where_raw(&mut self, condition: &str) -> &mut Self {
        self.push_condition(Connector::Or, condition.to_string())
    }

    /// One `column=value` condition per pair, joined with `AND`.
    pub fn where_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fragment = pairs
            .into_iter()
            .map(|(column, value)| self.equals(column.as_ref(), value.into()))
            .collect::<Vec<_>>()
            .join(" AND ");
        if fragment.is_empty() {
            return self;
        }
        self.push_condition(Connector::And, fragment)
    }

    /// A condition with `?` placeholders bound, in order, to `params`.
    pub fn where_params(&mut self, condition: &str, params: &[Value]) -> &mut Self {
        let fragment = bind_placeholders(condition, params, &self.driver);
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_where_params(&mut self, condition: &str, params: &[Value]) -> &mut Self {
        let fragment = bind_placeholders(condition, params, &self.driver);
        self.push_condition(Connector::Or, fragment)
    }

    pub fn where_null(&mut self, field: &str) -> &mut Self {
        self.push_condition(Connector::And, format!("{field} IS NULL"))
    }

    pub fn where_not_null(&mut self, field: &str) -> &mut Self {
        self.push_condition(Connector::And, format!("{field} IS NOT NULL"))
    }

    /// Wraps every condition added inside `scope` in one pair of parentheses.
    ///
    /// The group joins the surrounding expression with the connector of its first condition.
    ///
    /// ```
    /// use quarry_db::{BuilderConfig, QueryBuilder, SqliteDriver};
    ///
    /// let mut db = QueryBuilder::new(SqliteDriver::open_in_memory().unwrap(), BuilderConfig::default());
    /// let sql = db
    ///     .table("users")
    ///     .where_("active", 1)
    ///     .grouped(|q| {
    ///         q.where_("role", "admin").or_where("role", "owner");
    ///     })
    ///     .get_all_sql();
    ///
    /// assert_eq!(
    ///     sql,
    ///     "SELECT * FROM `users` WHERE active=1 AND (role='admin' OR role='owner')"
    /// );
    /// ```
    pub fn grouped<F>(&mut self, scope: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let before = self.state.where_expr.len();
        self.state.group_pending += 1;

        scope(self);

        if self.state.where_expr.len() == before {
            warn!("grouped scope added no conditions; dropping its parentheses");
            self.state.group_pending = self.state.group_pending.saturating_sub(1);
        } else {
            self.state.where_expr.close_last();
        }
        self
    }

    pub fn in_<I, V>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fragment = self.in_list(field, "IN", values);
        self.push_condition(Connector::And, fragment)
    }

    pub fn not_in<I, V>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fragment = self.in_list(field, "NOT IN", values);
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_in<I, V>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fragment = self.in_list(field, "IN", values);
        self.push_condition(Connector::Or, fragment)
    }

    pub fn or_not_in<I, V>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fragment = self.in_list(field, "NOT IN", values);
        self.push_condition(Connector::Or, fragment)
    }

    /// `(field BETWEEN low AND high)`.
    pub fn between(
        &mut self,
        field: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        let fragment = self.range(field, "BETWEEN", low.into(), high.into());
        self.push_condition(Connector::And, fragment)
    }

    pub fn not_between(
        &mut self,
        field: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        let fragment = self.range(field, "NOT BETWEEN", low.into(), high.into());
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_between(
        &mut self,
        field: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        let fragment = self.range(field, "BETWEEN", low.into(), high.into());
        self.push_condition(Connector::Or, fragment)
    }

    pub fn or_not_between(
        &mut self,
        field: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        let fragment = self.range(field, "NOT BETWEEN", low.into(), high.into());
        self.push_condition(Connector::Or, fragment)
    }

    pub fn like(&mut self, field: &str, pattern: &str) -> &mut Self {
        let fragment = self.pattern(field, "LIKE", pattern);
        self.push_condition(Connector::And, fragment)
    }

    pub fn not_like(&mut self, field: &str, pattern: &str) -> &mut Self {
        let fragment = self.pattern(field, "NOT LIKE", pattern);
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_like(&mut self, field: &str, pattern: &str) -> &mut Self {
        let fragment = self.pattern(field, "LIKE", pattern);
        self.push_condition(Connector::Or, fragment)
    }

    pub fn or_not_like(&mut self, field: &str, pattern: &str) -> &mut Self {
        let fragment = self.pattern(field, "NOT LIKE", pattern);
        self.push_condition(Connector::Or, fragment)
    }

    /// Matches `pattern` against any of `fields`: `(f1 LIKE p OR f2 LIKE p)`.
    pub fn group_or_like(&mut self, fields: &[&str], pattern: &str) -> &mut Self {
        if fields.is_empty() {
            warn!("group_or_like called without fields; condition skipped");
            return self;
        }
        let like = self.escape(pattern);
        let alternatives = fields
            .iter()
            .map(|field| format!("{field} LIKE {like}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.push_condition(Connector::And, format!("({alternatives})"))
    }

    /// `FIND_IN_SET (key, field)`. Fractional numeric keys are truncated.
    pub fn find_in_set(&mut self, field: &str, key: impl Into<Value>) -> &mut Self {
        let fragment = self.set_lookup(field, key.into());
        self.push_condition(Connector::And, fragment)
    }

    pub fn not_find_in_set(&mut self, field: &str, key: impl Into<Value>) -> &mut Self {
        let fragment = format!("NOT {}", self.set_lookup(field, key.into()));
        self.push_condition(Connector::And, fragment)
    }

    pub fn or_find_in_set(&mut self, field: &str, key: impl Into<Value>) -> &mut Self {
        let fragment = self.set_lookup(field, key.into());
        self.push_condition(Connector::Or, fragment)
    }

    pub fn or_not_find_in_set(&mut self, field: &str, key: impl Into<Value>) -> &mut Self {
        let fragment = format!("NOT {}", self.set_lookup(field, key.into()));
        self.push_condition(Connector::Or, fragment)
    }

    /// Full-text search in boolean mode.
    ///
    /// A single field is backtick quoted, several are listed as given. A single term renders as
    /// `'+term*'`; several terms are joined with `+`.
    pub fn match_against(&mut self, fields: &[&str], terms: &[&str]) -> &mut Self {
        if fields.is_empty() || terms.is_empty() {
            return self;
        }

        let columns = match fields {
            [single] => format!("`{single}`"),
            many => many.join(","),
        };
        let expression = match terms {
            [single] => format!("+{}*", sanitize_term(single)),
            many => {
                many.iter()
                    .map(|term| sanitize_term(term))
                    .collect::<Vec<_>>()
                    .join("+")
            }
        };

        let fragment = format!("MATCH ({columns}) AGAINST('{expression}' IN BOOLEAN MODE)");
        self.push_condition(Connector::And, fragment)
    }

    pub(crate) fn push_condition(&mut self, connector: Connector, fragment: String) -> &mut Self {
        let opens = std::mem::take(&mut self.state.group_pending);
        self.state.where_expr.push(connector, fragment, opens);
        self
    }

    fn equals(&self, field: &str, value: Value) -> String {
        format!("{field}={}", self.escape(value))
    }

    pub(crate) fn compare(&self, field: &str, op: &str, value: Value) -> String {
        if is_operator(op) {
            format!("{field} {op} {}", self.escape(value))
        } else {
            warn!(
                "`{}` is not a comparison operator; comparing {} = '{}' instead",
                op, field, op
            );
            format!("{field} = {}", self.escape(op))
        }
    }

    fn in_list<I, V>(&self, field: &str, keyword: &str, values: I) -> String
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let literals = values
            .into_iter()
            .map(|v| self.escape(v))
            .collect::<Vec<_>>();
        if literals.is_empty() {
            warn!("empty value list for {} {}", field, keyword);
        }
        format!("{field} {keyword} ({})", literals.join(", "))
    }

    fn range(&self, field: &str, keyword: &str, low: Value, high: Value) -> String {
        format!(
            "({field} {keyword} {} AND {})",
            self.escape(low),
            self.escape(high)
        )
    }

    fn pattern(&self, field: &str, keyword: &str, pattern: &str) -> String {
        format!("{field} {keyword} {}", self.escape(pattern))
    }

    fn set_lookup(&self, field: &str, key: Value) -> String {
        let key = match key {
            Value::Float(f) if f.is_finite() => self.escape(f.trunc() as i64),
            other => self.escape(other),
        };
        format!("FIND_IN_SET ({key}, {field})")
    }
}

/// Entity-encodes the characters that could terminate or alter the search literal.
fn sanitize_term(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\\' => out.push_str("&#092;"),
            c => out.push(c),
        }
    }
    out
}
