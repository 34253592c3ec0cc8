/// Clause model → JSON request body.
///
/// One converter per DSL node. Optional request parts are simply absent
/// from the output, never present with a null or empty placeholder, so the
/// rendered body stays minimal.
use super::types::{
    AggregationSpec, HighlightSpec, QueryPredicate, RangeBounds, SearchQuery, SortClause,
};

/// Render a finished search query into its request body.
pub(crate) fn render(query: &SearchQuery) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("query".to_string(), predicate_to_json(&query.query));

    if !query.sort.is_empty() {
        let entries: Vec<serde_json::Value> = query.sort.iter().map(sort_to_json).collect();
        body.insert("sort".to_string(), serde_json::Value::Array(entries));
    }
    if let Some(size) = query.size {
        body.insert("size".to_string(), serde_json::json!(size));
    }
    if let Some(from) = query.from {
        body.insert("from".to_string(), serde_json::json!(from));
    }
    if let Some(fields) = &query.source_fields {
        body.insert("_source".to_string(), serde_json::json!(fields));
    }
    if !query.aggregations.is_empty() {
        let mut aggs = serde_json::Map::new();
        for (name, spec) in &query.aggregations {
            aggs.insert(name.clone(), aggregation_to_json(spec));
        }
        body.insert("aggs".to_string(), serde_json::Value::Object(aggs));
    }
    if let Some(highlight) = &query.highlight {
        body.insert("highlight".to_string(), highlight_to_json(highlight));
    }

    serde_json::Value::Object(body)
}

fn predicate_to_json(predicate: &QueryPredicate) -> serde_json::Value {
    match predicate {
        QueryPredicate::MatchAll => serde_json::json!({ "match_all": {} }),
        QueryPredicate::Match { field, value } => wrap("match", field, value.to_json()),
        QueryPredicate::MatchPhrase { field, phrase } => {
            wrap("match_phrase", field, serde_json::json!(phrase))
        }
        QueryPredicate::MultiMatch { fields, value } => serde_json::json!({
            "multi_match": {
                "query": value.to_json(),
                "fields": fields,
            }
        }),
        QueryPredicate::Term { field, value } => wrap("term", field, value.to_json()),
        QueryPredicate::Terms { field, values } => {
            let items: Vec<serde_json::Value> = values.iter().map(|v| v.to_json()).collect();
            wrap("terms", field, serde_json::Value::Array(items))
        }
        QueryPredicate::Range { field, bounds } => wrap("range", field, bounds_to_json(bounds)),
        QueryPredicate::Bool {
            must,
            must_not,
            should,
            filter,
        } => {
            let mut clauses = serde_json::Map::new();
            let slots: [(&str, &Vec<QueryPredicate>); 4] = [
                ("must", must),
                ("must_not", must_not),
                ("should", should),
                ("filter", filter),
            ];
            for (slot, predicates) in slots {
                if !predicates.is_empty() {
                    let rendered: Vec<serde_json::Value> =
                        predicates.iter().map(predicate_to_json).collect();
                    clauses.insert(slot.to_string(), serde_json::Value::Array(rendered));
                }
            }
            let mut outer = serde_json::Map::new();
            outer.insert("bool".to_string(), serde_json::Value::Object(clauses));
            serde_json::Value::Object(outer)
        }
    }
}

/// Build the `{kind: {field: payload}}` shape shared by most leaf nodes.
fn wrap(kind: &str, field: &str, payload: serde_json::Value) -> serde_json::Value {
    let mut inner = serde_json::Map::new();
    inner.insert(field.to_string(), payload);
    let mut outer = serde_json::Map::new();
    outer.insert(kind.to_string(), serde_json::Value::Object(inner));
    serde_json::Value::Object(outer)
}

fn bounds_to_json(bounds: &RangeBounds) -> serde_json::Value {
    let mut edges = serde_json::Map::new();
    if let Some(value) = &bounds.gt {
        edges.insert("gt".to_string(), value.to_json());
    }
    if let Some(value) = &bounds.gte {
        edges.insert("gte".to_string(), value.to_json());
    }
    if let Some(value) = &bounds.lt {
        edges.insert("lt".to_string(), value.to_json());
    }
    if let Some(value) = &bounds.lte {
        edges.insert("lte".to_string(), value.to_json());
    }
    serde_json::Value::Object(edges)
}

fn sort_to_json(clause: &SortClause) -> serde_json::Value {
    let mut inner = serde_json::Map::new();
    inner.insert(
        "order".to_string(),
        serde_json::json!(clause.order.as_str()),
    );
    let mut entry = serde_json::Map::new();
    entry.insert(clause.field.clone(), serde_json::Value::Object(inner));
    serde_json::Value::Object(entry)
}

fn aggregation_to_json(spec: &AggregationSpec) -> serde_json::Value {
    let mut options = serde_json::Map::new();
    let kind = match spec {
        AggregationSpec::Terms { field, size } => {
            options.insert("field".to_string(), serde_json::json!(field));
            if let Some(size) = size {
                options.insert("size".to_string(), serde_json::json!(size));
            }
            "terms"
        }
        AggregationSpec::Avg { field } => {
            options.insert("field".to_string(), serde_json::json!(field));
            "avg"
        }
        AggregationSpec::Sum { field } => {
            options.insert("field".to_string(), serde_json::json!(field));
            "sum"
        }
        AggregationSpec::Min { field } => {
            options.insert("field".to_string(), serde_json::json!(field));
            "min"
        }
        AggregationSpec::Max { field } => {
            options.insert("field".to_string(), serde_json::json!(field));
            "max"
        }
        AggregationSpec::DateHistogram { field, interval } => {
            options.insert("field".to_string(), serde_json::json!(field));
            options.insert("interval".to_string(), serde_json::json!(interval));
            "date_histogram"
        }
    };
    let mut agg = serde_json::Map::new();
    agg.insert(kind.to_string(), serde_json::Value::Object(options));
    serde_json::Value::Object(agg)
}

fn highlight_to_json(spec: &HighlightSpec) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    for field in &spec.fields {
        fields.insert(field.clone(), serde_json::json!({}));
    }
    let mut highlight = serde_json::Map::new();
    highlight.insert(
        "pre_tags".to_string(),
        serde_json::json!([spec.pre_tag.as_str()]),
    );
    highlight.insert(
        "post_tags".to_string(),
        serde_json::json!([spec.post_tag.as_str()]),
    );
    highlight.insert("fields".to_string(), serde_json::Value::Object(fields));
    if let Some(size) = spec.fragment_size {
        highlight.insert("fragment_size".to_string(), serde_json::json!(size));
    }
    serde_json::Value::Object(highlight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::SortOrder;
    use crate::value::QueryValue;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn base(query: QueryPredicate) -> SearchQuery {
        SearchQuery {
            index: "test".to_string(),
            query,
            filters: Vec::new(),
            sort: Vec::new(),
            size: None,
            from: None,
            source_fields: None,
            aggregations: BTreeMap::new(),
            highlight: None,
        }
    }

    #[test]
    fn test_minimal_body_is_match_all_only() {
        let body = render(&base(QueryPredicate::MatchAll));
        assert_eq!(body, json!({ "query": { "match_all": {} } }));
    }

    #[test]
    fn test_match_node_shape() {
        let node = predicate_to_json(&QueryPredicate::Match {
            field: "title".to_string(),
            value: QueryValue::String("rust".to_string()),
        });
        assert_eq!(node, json!({ "match": { "title": "rust" } }));
    }

    #[test]
    fn test_multi_match_node_shape() {
        let node = predicate_to_json(&QueryPredicate::MultiMatch {
            fields: vec!["title".to_string(), "body".to_string()],
            value: QueryValue::String("rust".to_string()),
        });
        assert_eq!(
            node,
            json!({ "multi_match": { "query": "rust", "fields": ["title", "body"] } })
        );
    }

    #[test]
    fn test_range_node_keeps_only_set_edges() {
        let node = predicate_to_json(&QueryPredicate::Range {
            field: "age".to_string(),
            bounds: RangeBounds::new().gte(18).lt(65),
        });
        assert_eq!(node, json!({ "range": { "age": { "gte": 18, "lt": 65 } } }));
    }

    #[test]
    fn test_bool_node_omits_empty_slots() {
        let node = predicate_to_json(&QueryPredicate::Bool {
            must: vec![QueryPredicate::Term {
                field: "status".to_string(),
                value: QueryValue::String("active".to_string()),
            }],
            must_not: Vec::new(),
            should: Vec::new(),
            filter: Vec::new(),
        });
        assert_eq!(
            node,
            json!({ "bool": { "must": [ { "term": { "status": "active" } } ] } })
        );
    }

    #[test]
    fn test_body_carries_paging_sort_and_source() {
        let mut query = base(QueryPredicate::MatchAll);
        query.sort.push(SortClause {
            field: "created_at".to_string(),
            order: SortOrder::Desc,
        });
        query.size = Some(25);
        query.from = Some(50);
        query.source_fields = Some(vec!["id".to_string(), "title".to_string()]);

        let body = render(&query);
        assert_eq!(body["sort"], json!([{ "created_at": { "order": "desc" } }]));
        assert_eq!(body["size"], json!(25));
        assert_eq!(body["from"], json!(50));
        assert_eq!(body["_source"], json!(["id", "title"]));
    }

    #[test]
    fn test_aggregations_render_under_aggs() {
        let mut query = base(QueryPredicate::MatchAll);
        query.aggregations.insert(
            "max_price".to_string(),
            AggregationSpec::Max {
                field: "price".to_string(),
            },
        );
        query.aggregations.insert(
            "by_category".to_string(),
            AggregationSpec::Terms {
                field: "category".to_string(),
                size: Some(5),
            },
        );

        let body = render(&query);
        assert_eq!(
            body["aggs"],
            json!({
                "by_category": { "terms": { "field": "category", "size": 5 } },
                "max_price": { "max": { "field": "price" } },
            })
        );
    }

    #[test]
    fn test_date_histogram_renders_interval() {
        let node = aggregation_to_json(&AggregationSpec::DateHistogram {
            field: "created_at".to_string(),
            interval: "day".to_string(),
        });
        assert_eq!(
            node,
            json!({ "date_histogram": { "field": "created_at", "interval": "day" } })
        );
    }

    #[test]
    fn test_highlight_renders_tags_and_fields() {
        let mut query = base(QueryPredicate::MatchAll);
        query.highlight = Some(HighlightSpec::new(["title"]).fragment_size(150));

        let body = render(&query);
        assert_eq!(
            body["highlight"],
            json!({
                "pre_tags": ["<em>"],
                "post_tags": ["</em>"],
                "fields": { "title": {} },
                "fragment_size": 150,
            })
        );
    }

    #[test]
    fn test_unset_parts_never_appear() {
        let body = render(&base(QueryPredicate::MatchAll));
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("query"));
    }
}
