//! Clause model for relational queries.
//!
//! Plain value types describing the pieces a query is assembled from:
//! comparison conditions, joins, ordering, and column assignments. They
//! carry no behavior beyond their SQL spelling; the builder accumulates
//! them and the compiler renders them.

use serde::Serialize;

use crate::value::QueryValue;

/// Comparison operators usable in WHERE and HAVING conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Like,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
}

impl Comparison {
    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "!=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::GtEq => ">=",
            Comparison::LtEq => "<=",
            Comparison::Like => "LIKE",
            Comparison::In => "IN",
            Comparison::NotIn => "NOT IN",
            Comparison::Between => "BETWEEN",
            Comparison::IsNull => "IS NULL",
            Comparison::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator binds a value. False only for the null tests.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Comparison::IsNull | Comparison::IsNotNull)
    }
}

/// Logical junction between two adjacent conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// A single WHERE or HAVING condition.
///
/// `connector` names the junction between this condition and the one
/// *after* it; the final condition's connector is never rendered. This is
/// the storage `or_where` flips, so `a.or_where(b)` marks `a` rather than
/// `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub field: String,
    pub comparison: Comparison,
    /// `None` only for `IsNull` / `IsNotNull`.
    pub value: Option<QueryValue>,
    pub connector: Connector,
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    FullOuter,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
        }
    }
}

/// A JOIN clause: `<kind> <table> ON <condition>`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub condition: String,
    pub kind: JoinKind,
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub field: String,
    pub direction: SortDirection,
}

/// A column/value pair for INSERT values and UPDATE SET lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: QueryValue,
}

/// Statement family of a built query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

impl QueryKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryKind::Select => "SELECT",
            QueryKind::Insert => "INSERT",
            QueryKind::Update => "UPDATE",
            QueryKind::Delete => "DELETE",
        }
    }
}

/// An immutable, fully rendered relational query.
///
/// `text` never embeds literal values — every bound value is a `?`
/// placeholder matched by position against `parameters`, which holds one
/// scalar entry per placeholder (multi-value operators are flattened at
/// build time). `estimated_cost` is the advisory heuristic consumed by the
/// analyzer, not a promise about execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationalQuery {
    pub text: String,
    pub parameters: Vec<QueryValue>,
    pub kind: QueryKind,
    pub estimated_cost: f64,
}

impl RelationalQuery {
    /// Number of `?` placeholders in the rendered text.
    ///
    /// Equals `parameters.len()` for every query this crate builds.
    pub fn placeholder_count(&self) -> usize {
        self.text.matches('?').count()
    }
}
