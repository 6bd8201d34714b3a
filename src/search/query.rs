use serde_json::{json, Map, Value as JsonValue};

use crate::models::SearchQuery;

/// Assemble the request body the payments API forwards to its search
/// backend. Pure; the query is not consumed so the caller can still echo
/// it into the result envelope.
pub fn build_request_body(query: &SearchQuery) -> JsonValue {
    let mut must = Vec::new();

    if !query.search.is_empty() {
        must.push(json!({ "query_string": { "query": query.search } }));
    }

    must.push(json!({
        "range": {
            "date_created": {
                "gte": query.dates.start.timestamp_millis(),
                "lte": query.dates.end.timestamp_millis(),
            }
        }
    }));

    // Deterministic body: filter clauses in field order.
    let mut filters: Vec<_> = query.filters.iter().collect();
    filters.sort_by(|a, b| a.0.cmp(b.0));
    for (field, values) in filters {
        let mut terms = Map::new();
        terms.insert(field.clone(), json!(values));
        must.push(json!({ "terms": terms }));
    }

    let mut body = json!({
        "query": { "bool": { "must": must } },
        "from": page_start(query),
        "size": query.count,
    });

    if !query.aggregations.is_empty() {
        body["aggregations"] =
            serde_json::to_value(&query.aggregations).unwrap_or_else(|_| json!({}));
    }

    if let Some(sort) = &query.sort {
        body["sort"] = sort.clone();
    }

    body
}

/// `offset` is the dashboard's 1-based page index.
fn page_start(query: &SearchQuery) -> u64 {
    query.offset.saturating_sub(1) * query.count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregationSpec, DateRange};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn query() -> SearchQuery {
        SearchQuery {
            search: String::new(),
            dates: DateRange {
                start: Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2018, 1, 31, 0, 0, 0).unwrap(),
            },
            filters: HashMap::new(),
            offset: 1,
            count: 15,
            aggregations: HashMap::new(),
            sort: None,
        }
    }

    #[test]
    fn minimal_query_is_just_the_date_range() {
        let body = build_request_body(&query());

        let must = body["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 1);
        assert!(must[0].get("range").is_some());
        assert_eq!(body["from"], json!(0));
        assert_eq!(body["size"], json!(15));
        assert!(body.get("aggregations").is_none());
        assert!(body.get("sort").is_none());
    }

    #[test]
    fn search_text_and_filters_become_clauses() {
        let mut query = query();
        query.search = "12345".to_string();
        query.filters.insert(
            "payment_method".to_string(),
            vec!["credit_card".to_string(), "debit_card".to_string()],
        );
        query.filters.insert("status".to_string(), vec!["paid".to_string()]);

        let body = build_request_body(&query);
        let must = body["query"]["bool"]["must"].as_array().unwrap();

        assert_eq!(must[0], json!({ "query_string": { "query": "12345" } }));
        assert_eq!(
            must[2],
            json!({ "terms": { "payment_method": ["credit_card", "debit_card"] } })
        );
        assert_eq!(must[3], json!({ "terms": { "status": ["paid"] } }));
    }

    #[test]
    fn paging_is_one_based() {
        let mut query = query();
        query.offset = 3;
        query.count = 20;

        assert_eq!(build_request_body(&query)["from"], json!(40));
    }

    #[test]
    fn aggregations_serialize_in_backend_shape() {
        let mut query = query();
        query.aggregations.insert(
            "total_amount".to_string(),
            AggregationSpec::sum("amount"),
        );

        let body = build_request_body(&query);
        assert_eq!(
            body["aggregations"]["total_amount"],
            json!({ "sum": { "field": "amount" } })
        );
    }

    #[test]
    fn sort_passes_through() {
        let mut query = query();
        query.sort = Some(json!([{ "date_created": { "order": "desc" } }]));

        let body = build_request_body(&query);
        assert_eq!(body["sort"], json!([{ "date_created": { "order": "desc" } }]));
    }
}
