mod query;
mod result;

pub use query::build_request_body;
pub use result::ResultShaper;

use crate::client::PaymentsClient;
use crate::error::Result;
use crate::models::{ResultEnvelope, SearchQuery};

/// Run a search end to end: build the backend request, dispatch it through
/// the payments client and reshape the response for the dashboard.
pub async fn search(client: &dyn PaymentsClient, query: &SearchQuery) -> Result<ResultEnvelope> {
    let body = build_request_body(query);
    tracing::debug!(
        offset = query.offset,
        count = query.count,
        "dispatching transaction search"
    );
    let raw = client.search(&body).await?;
    ResultShaper::new(query.clone()).shape(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Resource};
    use async_trait::async_trait;
    use serde_json::{json, Value as JsonValue};

    struct StubSearch {
        /// None makes the search endpoint fail.
        response: Option<JsonValue>,
    }

    #[async_trait]
    impl PaymentsClient for StubSearch {
        async fn transaction(&self, _id: &str) -> Result<JsonValue> {
            unimplemented!()
        }
        async fn gateway_operations(&self, _transaction_id: &str) -> Result<JsonValue> {
            unimplemented!()
        }
        async fn chargeback_operations(&self, _transaction_id: &str) -> Result<JsonValue> {
            unimplemented!()
        }
        async fn payables(&self, _transaction_id: &str) -> Result<JsonValue> {
            unimplemented!()
        }
        async fn recipient(&self, _id: &str) -> Result<JsonValue> {
            unimplemented!()
        }
        async fn search(&self, _body: &JsonValue) -> Result<JsonValue> {
            self.response.clone().ok_or_else(|| {
                Error::upstream(Resource::Search, anyhow::anyhow!("502 from upstream"))
            })
        }
    }

    #[tokio::test]
    async fn dispatch_shapes_what_the_backend_returns() {
        let client = StubSearch {
            response: Some(json!({ "hits": { "total": 0, "max_score": null, "hits": [] } })),
        };
        let query = SearchQuery::last_30_days();

        let envelope = search(&client, &query).await.unwrap();

        assert_eq!(envelope.query, query);
        assert_eq!(envelope.result.total.count, 0);
        assert!(envelope.result.list.rows.is_empty());
    }

    #[tokio::test]
    async fn backend_failures_propagate_unchanged() {
        let client = StubSearch { response: None };

        let err = search(&client, &SearchQuery::last_30_days()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::UpstreamFetch { resource: Resource::Search, .. }
        ));
    }
}
