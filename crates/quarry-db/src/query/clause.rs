//! Internal representation of query clauses.

use std::fmt;

/// Comparison tokens accepted as an explicit operator.
pub const OPERATORS: [&str; 8] = ["=", "!=", "<", ">", "<=", ">=", "<>", "RLIKE"];

pub fn is_operator(token: &str) -> bool {
    OPERATORS.contains(&token)
}

/// How a condition attaches to the conditions before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::And => write!(f, "AND"),
            Connector::Or => write!(f, "OR"),
        }
    }
}

/// One condition of a WHERE expression together with the parentheses around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereNode {
    pub connector: Connector,
    pub fragment: String,
    pub opens: usize,
    pub closes: usize,
}

/// Ordered WHERE conditions. The first node's connector is never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereExpr {
    nodes: Vec<WhereNode>,
}

impl WhereExpr {
    pub fn push(&mut self, connector: Connector, fragment: String, opens: usize) {
        self.nodes.push(WhereNode {
            connector,
            fragment,
            opens,
            closes: 0,
        });
    }

    /// Closes a parenthesis after the most recent condition. Returns false when empty.
    pub fn close_last(&mut self) -> bool {
        match self.nodes.last_mut() {
            Some(node) => {
                node.closes += 1;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[WhereNode] {
        &self.nodes
    }

    pub fn render(&self) -> Option<String> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut out = String::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
                out.push_str(&node.connector.to_string());
                out.push(' ');
            }
            out.push_str(&"(".repeat(node.opens));
            out.push_str(&node.fragment);
            out.push_str(&")".repeat(node.closes));
        }
        Some(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Plain,
    Inner,
    Left,
    Right,
    FullOuter,
    LeftOuter,
    RightOuter,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
        }
    }
}

/// The ON part of a join.
///
/// Converts from a pre-formed condition (`&str`), a `(left, right)` pair compared with `=`, or a
/// `(left, op, right)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOn {
    None,
    Raw(String),
    Compare {
        left: String,
        op: String,
        right: String,
    },
}

impl From<&str> for JoinOn {
    fn from(on: &str) -> Self {
        JoinOn::Raw(on.to_string())
    }
}

impl From<String> for JoinOn {
    fn from(on: String) -> Self {
        JoinOn::Raw(on)
    }
}

impl From<(&str, &str)> for JoinOn {
    fn from((left, right): (&str, &str)) -> Self {
        JoinOn::Compare {
            left: left.to_string(),
            op: "=".to_string(),
            right: right.to_string(),
        }
    }
}

impl From<(&str, &str, &str)> for JoinOn {
    fn from((left, op, right): (&str, &str, &str)) -> Self {
        JoinOn::Compare {
            left: left.to_string(),
            op: op.to_string(),
            right: right.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range(u64, u64),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Count(n) => write!(f, "{n}"),
            Limit::Range(offset, count) => write!(f, "{offset}, {count}"),
        }
    }
}
