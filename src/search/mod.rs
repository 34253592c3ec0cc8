/// Search query construction.
///
/// The same record-then-render split as the relational side:
///
/// ```text
/// SearchQueryBuilder calls  (builder.rs)
///       ↓
/// Predicates and options    (types.rs)
///       ↓
/// JSON request body         (document.rs)
///       ↓
/// SearchQuery
/// ```
///
/// `build()` is where filters fold into a `bool` predicate; after that the
/// query is a plain value and `to_document()` can render it any number of
/// times.
pub mod builder;
pub mod types;

mod document;

// Re-export key types for convenience
pub use builder::{BoolQueryBuilder, SearchQueryBuilder};
pub use types::{
    AggregationSpec, HighlightSpec, QueryPredicate, RangeBounds, SearchQuery, SortClause,
    SortOrder,
};
