//! Advisory analysis of built queries.
//!
//! Two pure functions, one per query family, each reading a materialized
//! query and returning a rating plus human-readable notes. Every rule is a
//! rough heuristic over the query's visible structure; none consults an
//! index, a planner or any live system. Treat the output as a code-review
//! comment, not a measurement.

use std::fmt;

use serde::Serialize;

use crate::relational::{QueryKind, RelationalQuery};
use crate::search::{QueryPredicate, SearchQuery};

/// Estimated cost above which a relational query is rated poor.
const HIGH_COST: f64 = 5.0;

/// Result sizes above this want explicit pagination.
const LARGE_RESULT_SIZE: i64 = 1000;

/// Result sizes above this want a sort for stable ordering.
const UNSORTED_RESULT_SIZE: i64 = 100;

/// Qualitative verdict on a query. Ordered from best to worst, so folding
/// independent rules with `max` keeps the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Good => write!(f, "good"),
            Rating::Fair => write!(f, "fair"),
            Rating::Poor => write!(f, "poor"),
        }
    }
}

/// Outcome of analyzing one query: the overall rating and one note per
/// rule that fired. An empty note list means nothing stood out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub rating: Rating,
    pub notes: Vec<String>,
}

impl QueryReport {
    fn good() -> Self {
        Self {
            rating: Rating::Good,
            notes: Vec::new(),
        }
    }

    /// Record a fired rule. The report keeps the worst rating seen.
    fn flag(&mut self, rating: Rating, note: impl Into<String>) {
        self.rating = self.rating.max(rating);
        self.notes.push(note.into());
    }

    /// Record a suggestion that does not affect the rating.
    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Rate a relational query.
///
/// Rules are evaluated independently and the worst rating wins:
/// a wildcard projection rates poor, an estimated cost above 5 rates poor,
/// and a statement with neither WHERE nor LIMIT rates at least fair.
/// INSERT is exempt from the last rule since it writes exactly the rows
/// it names.
pub fn analyze_relational(query: &RelationalQuery) -> QueryReport {
    let mut report = QueryReport::good();

    if projects_wildcard(&query.text) {
        report.flag(
            Rating::Poor,
            "avoid selecting all columns; name the fields the caller reads",
        );
    }

    if query.estimated_cost > HIGH_COST {
        report.flag(
            Rating::Poor,
            format!(
                "high estimated cost ({:.1}), consider indexes on joined and filtered columns",
                query.estimated_cost
            ),
        );
    }

    let unbounded = !query.text.contains(" WHERE ") && !query.text.contains(" LIMIT ");
    if unbounded && query.kind != QueryKind::Insert {
        report.flag(
            Rating::Fair,
            "no WHERE or LIMIT; add LIMIT to bound result size",
        );
    }

    tracing::debug!(
        kind = query.kind.as_sql(),
        rating = %report.rating,
        notes = report.notes.len(),
        "analyzed relational query"
    );
    report
}

/// Rate a search query.
///
/// A size above 1000 rates at least fair; a size above 100 without a sort
/// gets a determinism note; a match-everything query with no filters gets a
/// performance note. The notes alone never downgrade the rating.
pub fn analyze_search(query: &SearchQuery) -> QueryReport {
    let mut report = QueryReport::good();

    if matches!(query.size, Some(size) if size > LARGE_RESULT_SIZE) {
        report.flag(
            Rating::Fair,
            "large result set, consider paginating with size and from",
        );
    }

    if query.sort.is_empty() && matches!(query.size, Some(size) if size > UNSORTED_RESULT_SIZE) {
        report.note("add sorting for deterministic results across pages");
    }

    if query.query == QueryPredicate::MatchAll && query.filters.is_empty() {
        report.note("query matches everything; add filters to improve performance");
    }

    tracing::debug!(
        index = query.index.as_str(),
        rating = %report.rating,
        notes = report.notes.len(),
        "analyzed search query"
    );
    report
}

/// True when the SELECT clause of the rendered text projects a bare `*`.
///
/// The materialized query no longer carries its clause lists, so this reads
/// the text: everything between `SELECT [DISTINCT]` and the first ` FROM `
/// is the projection, and any comma-separated entry equal to `*` counts.
fn projects_wildcard(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("SELECT ") else {
        return false;
    };
    let rest = rest.strip_prefix("DISTINCT ").unwrap_or(rest);
    let Some(end) = rest.find(" FROM ") else {
        return false;
    };
    rest[..end].split(',').any(|field| field.trim() == "*")
}
