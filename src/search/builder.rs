//! Fluent construction of search requests.

use std::collections::BTreeMap;

use crate::error::{Result, ValidationError};
use crate::value::QueryValue;

use super::types::{
    AggregationSpec, HighlightSpec, QueryPredicate, RangeBounds, SearchQuery, SortClause,
    SortOrder,
};

/// Chainable builder for search requests.
///
/// Holds a single primary predicate slot plus a list of non-scoring
/// filters. Predicate setters replace the slot; filters accumulate. When
/// any filters are present, [`build`](SearchQueryBuilder::build) wraps the
/// primary predicate and the filters together in a `bool` query.
///
/// Like its relational counterpart the builder moves through each call and
/// is `Clone`, so branching variants off a shared base is safe.
///
/// # Example
///
/// ```
/// use queryforge::SearchQueryBuilder;
///
/// let query = SearchQueryBuilder::new()
///     .index("products")?
///     .match_("name", "laptop")
///     .filter("in_stock", true)
///     .sort_desc("price")
///     .size(20)?
///     .build();
///
/// let body = query.to_document();
/// assert!(body["query"]["bool"]["filter"].is_array());
/// # Ok::<(), queryforge::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchQueryBuilder {
    index: String,
    predicate: Option<QueryPredicate>,
    filters: Vec<QueryPredicate>,
    sort: Vec<SortClause>,
    size: Option<i64>,
    from: Option<i64>,
    source_fields: Option<Vec<String>>,
    aggregations: BTreeMap<String, AggregationSpec>,
    highlight: Option<HighlightSpec>,
}

impl SearchQueryBuilder {
    /// Starts a builder with no predicate. Built as-is it matches
    /// everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the index the request targets.
    pub fn index(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyIdentifier { what: "index name" });
        }
        self.index = trimmed.to_string();
        Ok(self)
    }

    /// Sets a full-text match as the primary predicate.
    pub fn match_(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.predicate = Some(QueryPredicate::match_(field, value));
        self
    }

    /// Sets an in-order phrase match as the primary predicate.
    pub fn match_phrase(mut self, field: impl Into<String>, phrase: impl Into<String>) -> Self {
        self.predicate = Some(QueryPredicate::match_phrase(field, phrase));
        self
    }

    /// Sets a multi-field match as the primary predicate.
    pub fn multi_match<I, S>(mut self, value: impl Into<QueryValue>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate = Some(QueryPredicate::multi_match(value, fields));
        self
    }

    /// Sets an exact-value test as the primary predicate.
    pub fn term(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.predicate = Some(QueryPredicate::term(field, value));
        self
    }

    /// Sets an any-of-these-values test as the primary predicate.
    pub fn terms<I, T>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        self.predicate = Some(QueryPredicate::terms(field, values));
        self
    }

    /// Sets a range test as the primary predicate.
    pub fn range(mut self, field: impl Into<String>, bounds: RangeBounds) -> Self {
        self.predicate = Some(QueryPredicate::range(field, bounds));
        self
    }

    /// Appends a non-scoring exact filter. A list value filters against any
    /// of its entries.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let predicate = match value.into() {
            QueryValue::List(values) => QueryPredicate::Terms {
                field: field.into(),
                values,
            },
            scalar => QueryPredicate::Term {
                field: field.into(),
                value: scalar,
            },
        };
        self.filters.push(predicate);
        self
    }

    /// Appends a non-scoring range filter.
    pub fn filter_range(mut self, field: impl Into<String>, bounds: RangeBounds) -> Self {
        self.filters.push(QueryPredicate::range(field, bounds));
        self
    }

    /// Appends a sort entry.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortClause {
            field: field.into(),
            order,
        });
        self
    }

    /// Shorthand for an ascending sort entry.
    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort(field, SortOrder::Asc)
    }

    /// Shorthand for a descending sort entry.
    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort(field, SortOrder::Desc)
    }

    /// Caps the number of returned hits.
    pub fn size(mut self, count: i64) -> Result<Self> {
        if count < 0 {
            return Err(ValidationError::NegativeBound {
                what: "size",
                value: count,
            });
        }
        self.size = Some(count);
        Ok(self)
    }

    /// Skips hits before the first returned one.
    pub fn from(mut self, count: i64) -> Result<Self> {
        if count < 0 {
            return Err(ValidationError::NegativeBound {
                what: "from",
                value: count,
            });
        }
        self.from = Some(count);
        Ok(self)
    }

    /// Restricts which stored fields come back with each hit.
    pub fn source<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Registers a named aggregation. Reusing a name overwrites the earlier
    /// entry.
    pub fn aggregate(mut self, name: impl Into<String>, spec: AggregationSpec) -> Self {
        self.aggregations.insert(name.into(), spec);
        self
    }

    /// Average of a numeric field.
    pub fn avg_aggregation(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(
            name,
            AggregationSpec::Avg {
                field: field.into(),
            },
        )
    }

    /// Sum of a numeric field.
    pub fn sum_aggregation(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(
            name,
            AggregationSpec::Sum {
                field: field.into(),
            },
        )
    }

    /// Minimum of a numeric field.
    pub fn min_aggregation(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(
            name,
            AggregationSpec::Min {
                field: field.into(),
            },
        )
    }

    /// Maximum of a numeric field.
    pub fn max_aggregation(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(
            name,
            AggregationSpec::Max {
                field: field.into(),
            },
        )
    }

    /// Bucket by distinct values of a field. `size` caps the bucket count
    /// and may be omitted with `None`.
    pub fn terms_aggregation(
        self,
        name: impl Into<String>,
        field: impl Into<String>,
        size: impl Into<Option<i64>>,
    ) -> Self {
        self.aggregate(
            name,
            AggregationSpec::Terms {
                field: field.into(),
                size: size.into(),
            },
        )
    }

    /// Bucket by calendar interval.
    pub fn date_histogram(
        self,
        name: impl Into<String>,
        field: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        self.aggregate(
            name,
            AggregationSpec::DateHistogram {
                field: field.into(),
                interval: interval.into(),
            },
        )
    }

    /// Configures snippet highlighting.
    pub fn highlight(mut self, spec: HighlightSpec) -> Self {
        self.highlight = Some(spec);
        self
    }

    /// Opens a boolean sub-builder. The finished `bool` predicate becomes
    /// the primary predicate when [`done`](BoolQueryBuilder::done) hands the
    /// builder back.
    pub fn bool_query(self) -> BoolQueryBuilder {
        BoolQueryBuilder {
            parent: self,
            must: Vec::new(),
            must_not: Vec::new(),
            should: Vec::new(),
            filter: Vec::new(),
        }
    }

    /// Assembles the immutable search query. With no predicate set the
    /// request matches everything; with filters present the predicate and
    /// filters are wrapped together in a `bool` query.
    pub fn build(self) -> SearchQuery {
        let primary = self.predicate.unwrap_or(QueryPredicate::MatchAll);
        let query = if self.filters.is_empty() {
            primary
        } else {
            QueryPredicate::Bool {
                must: vec![primary],
                must_not: Vec::new(),
                should: Vec::new(),
                filter: self.filters.clone(),
            }
        };
        tracing::debug!(
            index = self.index.as_str(),
            filters = self.filters.len(),
            aggregations = self.aggregations.len(),
            "built search query"
        );
        SearchQuery {
            index: self.index,
            query,
            filters: self.filters,
            sort: self.sort,
            size: self.size,
            from: self.from,
            source_fields: self.source_fields,
            aggregations: self.aggregations,
            highlight: self.highlight,
        }
    }
}

/// Collects predicates into the four `bool` occurrence slots, then hands
/// control back to the search builder it came from.
///
/// ```
/// use queryforge::{QueryPredicate, SearchQueryBuilder};
///
/// let query = SearchQueryBuilder::new()
///     .index("articles")?
///     .bool_query()
///     .must(QueryPredicate::match_("title", "rust"))
///     .should(QueryPredicate::term("featured", true))
///     .done()
///     .size(10)?
///     .build();
///
/// let body = query.to_document();
/// assert!(body["query"]["bool"]["must"].is_array());
/// # Ok::<(), queryforge::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoolQueryBuilder {
    parent: SearchQueryBuilder,
    must: Vec<QueryPredicate>,
    must_not: Vec<QueryPredicate>,
    should: Vec<QueryPredicate>,
    filter: Vec<QueryPredicate>,
}

impl BoolQueryBuilder {
    /// The document must satisfy this predicate; contributes to scoring.
    pub fn must(mut self, predicate: QueryPredicate) -> Self {
        self.must.push(predicate);
        self
    }

    /// The document must not satisfy this predicate.
    pub fn must_not(mut self, predicate: QueryPredicate) -> Self {
        self.must_not.push(predicate);
        self
    }

    /// Optional predicate that boosts matching documents.
    pub fn should(mut self, predicate: QueryPredicate) -> Self {
        self.should.push(predicate);
        self
    }

    /// The document must satisfy this predicate; does not affect scoring.
    pub fn filter(mut self, predicate: QueryPredicate) -> Self {
        self.filter.push(predicate);
        self
    }

    /// Installs the assembled `bool` predicate and returns the search
    /// builder for further chaining.
    pub fn done(self) -> SearchQueryBuilder {
        let mut parent = self.parent;
        parent.predicate = Some(QueryPredicate::Bool {
            must: self.must,
            must_not: self.must_not,
            should: self.should,
            filter: self.filter,
        });
        parent
    }
}
