//! Per-statement clause state.

use super::clause::{Limit, WhereExpr};
use crate::value::Shape;

/// Everything accumulated for the statement being built. Replaced wholesale after every
/// terminal call.
#[derive(Debug, Clone)]
pub struct BuilderState {
    pub select: String,
    pub from: String,
    pub joins: Vec<String>,
    pub where_expr: WhereExpr,
    /// Parentheses opened by `grouped` that no condition has claimed yet.
    pub group_pending: usize,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<Limit>,
    pub offset: Option<u64>,
    pub shape: Shape,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self {
            select: "*".to_string(),
            from: String::new(),
            joins: Vec::new(),
            where_expr: WhereExpr::default(),
            group_pending: 0,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
            offset: None,
            shape: Shape::default(),
        }
    }
}

impl BuilderState {
    /// Appends the joins, space separated with a leading space, if any.
    pub fn push_joins(&self, sql: &mut String) {
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
    }

    /// Appends WHERE, ORDER BY and LIMIT, the trailer shared by UPDATE and DELETE.
    pub fn push_trailer(&self, sql: &mut String) {
        self.push_where(sql);
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(limit) = &self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
    }

    pub fn push_where(&self, sql: &mut String) {
        if let Some(conditions) = self.where_expr.render() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }
    }
}
