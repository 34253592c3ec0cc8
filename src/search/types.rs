//! Clause model for search queries.
//!
//! Predicates and request options mirroring the document-store query DSL:
//! full-text matches, exact term filters, range bounds, boolean composition,
//! plus aggregations and highlighting. The builder accumulates these and
//! `to_document` renders them into the JSON request body.

use std::collections::BTreeMap;

use crate::value::QueryValue;

use super::document;

/// Sort direction for a search request. Spelled lowercase in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One entry in the sort list.
#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
}

/// Bounds for a range predicate. Any subset of the four edges may be set.
///
/// ```
/// use queryforge::RangeBounds;
///
/// let bounds = RangeBounds::new().gte(18).lt(65);
/// assert!(!bounds.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeBounds {
    pub gt: Option<QueryValue>,
    pub gte: Option<QueryValue>,
    pub lt: Option<QueryValue>,
    pub lte: Option<QueryValue>,
}

impl RangeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive lower bound.
    pub fn gt(mut self, value: impl Into<QueryValue>) -> Self {
        self.gt = Some(value.into());
        self
    }

    /// Inclusive lower bound.
    pub fn gte(mut self, value: impl Into<QueryValue>) -> Self {
        self.gte = Some(value.into());
        self
    }

    /// Exclusive upper bound.
    pub fn lt(mut self, value: impl Into<QueryValue>) -> Self {
        self.lt = Some(value.into());
        self
    }

    /// Inclusive upper bound.
    pub fn lte(mut self, value: impl Into<QueryValue>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }
}

/// A single query predicate. `Bool` nests predicates into the four standard
/// occurrence slots; everything else is a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPredicate {
    /// Matches every document. The default when no predicate is set.
    MatchAll,
    /// Full-text match on one field.
    Match { field: String, value: QueryValue },
    /// Full-text match requiring the terms in order.
    MatchPhrase { field: String, phrase: String },
    /// Full-text match across several fields.
    MultiMatch {
        fields: Vec<String>,
        value: QueryValue,
    },
    /// Exact value on one field. Not analyzed.
    Term { field: String, value: QueryValue },
    /// Exact match against any of several values.
    Terms {
        field: String,
        values: Vec<QueryValue>,
    },
    /// Range test on one field.
    Range { field: String, bounds: RangeBounds },
    /// Boolean composition of sub-predicates.
    Bool {
        must: Vec<QueryPredicate>,
        must_not: Vec<QueryPredicate>,
        should: Vec<QueryPredicate>,
        filter: Vec<QueryPredicate>,
    },
}

/// Leaf constructors, so composing boolean queries does not require
/// spelling out struct variants.
impl QueryPredicate {
    pub fn match_(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        QueryPredicate::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn match_phrase(field: impl Into<String>, phrase: impl Into<String>) -> Self {
        QueryPredicate::MatchPhrase {
            field: field.into(),
            phrase: phrase.into(),
        }
    }

    pub fn multi_match<I, S>(value: impl Into<QueryValue>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryPredicate::MultiMatch {
            fields: fields.into_iter().map(Into::into).collect(),
            value: value.into(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        QueryPredicate::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn terms<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        QueryPredicate::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        QueryPredicate::Range {
            field: field.into(),
            bounds,
        }
    }
}

/// An aggregation over one field. Each variant carries exactly the options
/// its document shape accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationSpec {
    /// Bucket by distinct values, optionally capping the bucket count.
    Terms { field: String, size: Option<i64> },
    Avg { field: String },
    Sum { field: String },
    Min { field: String },
    Max { field: String },
    /// Bucket by calendar interval, e.g. `"day"` or `"1h"`.
    DateHistogram { field: String, interval: String },
}

/// Snippet highlighting for matched fields. Default tags wrap matches
/// in `<em>` like the upstream store does.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpec {
    pub fields: Vec<String>,
    pub pre_tag: String,
    pub post_tag: String,
    pub fragment_size: Option<i64>,
}

impl HighlightSpec {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Override the default tag pair.
    pub fn tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_tag = pre.into();
        self.post_tag = post.into();
        self
    }

    /// Cap each highlighted fragment at `size` characters.
    pub fn fragment_size(mut self, size: i64) -> Self {
        self.fragment_size = Some(size);
        self
    }
}

impl Default for HighlightSpec {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            pre_tag: "<em>".to_string(),
            post_tag: "</em>".to_string(),
            fragment_size: None,
        }
    }
}

/// A finished search request: the target index plus everything needed to
/// render the JSON body. Built by the search builder; immutable after that.
///
/// `query` is the effective predicate, already wrapped in a `Bool` when
/// filters were added. `filters` keeps the raw filter list around for
/// inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub index: String,
    pub query: QueryPredicate,
    pub filters: Vec<QueryPredicate>,
    pub sort: Vec<SortClause>,
    pub size: Option<i64>,
    pub from: Option<i64>,
    pub source_fields: Option<Vec<String>>,
    pub aggregations: BTreeMap<String, AggregationSpec>,
    pub highlight: Option<HighlightSpec>,
}

impl SearchQuery {
    /// Render the request body. The index is addressing metadata and stays
    /// out of the document.
    pub fn to_document(&self) -> serde_json::Value {
        document::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_spelling_is_lowercase() {
        assert_eq!(SortOrder::Asc.as_str(), "asc");
        assert_eq!(SortOrder::Desc.as_str(), "desc");
    }

    #[test]
    fn test_range_bounds_chain_and_emptiness() {
        assert!(RangeBounds::new().is_empty());
        let bounds = RangeBounds::new().gte(10).lt(20);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.gte, Some(QueryValue::Integer(10)));
        assert_eq!(bounds.lt, Some(QueryValue::Integer(20)));
        assert_eq!(bounds.gt, None);
    }

    #[test]
    fn test_highlight_defaults_to_em_tags() {
        let spec = HighlightSpec::new(["title"]);
        assert_eq!(spec.pre_tag, "<em>");
        assert_eq!(spec.post_tag, "</em>");
        assert_eq!(spec.fields, vec!["title".to_string()]);
    }

    #[test]
    fn test_predicate_constructors_fill_variants() {
        assert_eq!(
            QueryPredicate::term("status", "active"),
            QueryPredicate::Term {
                field: "status".to_string(),
                value: QueryValue::String("active".to_string()),
            }
        );
        assert_eq!(
            QueryPredicate::terms("tag", ["a", "b"]),
            QueryPredicate::Terms {
                field: "tag".to_string(),
                values: vec![
                    QueryValue::String("a".to_string()),
                    QueryValue::String("b".to_string()),
                ],
            }
        );
    }
}
