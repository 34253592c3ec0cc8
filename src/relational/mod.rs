/// Relational query construction.
///
/// The pieces fit together as a short pipeline:
///
/// ```text
/// QueryBuilder calls        (builder.rs)
///       ↓
/// Recorded clause lists     (types.rs)
///       ↓
/// SQL text + parameters     (compiler.rs)
///       ↓
/// RelationalQuery
/// ```
///
/// The builder only records; nothing is rendered until `build()`, which
/// hands the clause lists to the compiler in one pass.
pub mod builder;
pub mod types;

mod compiler;

// Re-export key types for convenience
pub use builder::QueryBuilder;
pub use types::{
    Assignment, Comparison, Connector, JoinClause, JoinKind, OrderByClause, QueryKind,
    RelationalQuery, SortDirection, WhereCondition,
};
