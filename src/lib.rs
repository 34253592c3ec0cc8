//! # queryforge
//!
//! Fluent builders and advisory analysis for parameterized SQL and search
//! queries.
//!
//! The crate has three surfaces:
//!
//! - [`QueryBuilder`] assembles SELECT, INSERT, UPDATE and DELETE
//!   statements as text with `?` placeholders plus the bound parameters in
//!   placeholder order.
//! - [`SearchQueryBuilder`] assembles a document-store search request
//!   (match/term/range predicates, boolean composition, filters, sorting,
//!   pagination, aggregations, highlighting) and renders it to a JSON body.
//! - [`analyze_relational`] and [`analyze_search`] read a built query and
//!   return a rating with improvement notes.
//!
//! Everything is pure in-memory construction. The crate never talks to a
//! database or a search cluster; it produces values for some other layer to
//! execute.
//!
//! ```
//! use queryforge::{analyze_relational, Comparison, QueryBuilder, Rating};
//!
//! let query = QueryBuilder::new()
//!     .select(["id", "email"])
//!     .from("users")?
//!     .where_("age", Comparison::GtEq, 18)
//!     .or_where_eq("vip", true)
//!     .limit(25)?
//!     .build()?;
//!
//! assert_eq!(
//!     query.text,
//!     "SELECT id, email FROM users WHERE age >= ? OR vip = ? LIMIT 25"
//! );
//! assert_eq!(query.parameters.len(), 2);
//! assert_eq!(analyze_relational(&query).rating, Rating::Good);
//! # Ok::<(), queryforge::ValidationError>(())
//! ```
//!
//! Builders move through every call and are `Clone`, so a shared base query
//! can be branched without the variants corrupting each other.

pub mod analyzer;
pub mod error;
pub mod relational;
pub mod search;
pub mod value;

// Re-export key types for convenience
pub use analyzer::{analyze_relational, analyze_search, QueryReport, Rating};
pub use error::{Result, ValidationError};
pub use relational::{
    Comparison, JoinKind, QueryBuilder, QueryKind, RelationalQuery, SortDirection,
};
pub use search::{
    AggregationSpec, BoolQueryBuilder, HighlightSpec, QueryPredicate, RangeBounds, SearchQuery,
    SearchQueryBuilder, SortOrder,
};
pub use value::QueryValue;
