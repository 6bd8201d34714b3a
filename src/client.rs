use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use url::Url;

use crate::error::{Error, Resource, Result};

/// Capabilities the search and detail flows need from the payments API.
///
/// Each lookup resolves to the raw JSON record. Retries and timeouts are
/// the implementation's concern; this crate only propagates failures.
#[async_trait]
pub trait PaymentsClient: Send + Sync {
    async fn transaction(&self, id: &str) -> Result<JsonValue>;
    async fn gateway_operations(&self, transaction_id: &str) -> Result<JsonValue>;
    async fn chargeback_operations(&self, transaction_id: &str) -> Result<JsonValue>;
    async fn payables(&self, transaction_id: &str) -> Result<JsonValue>;
    async fn recipient(&self, id: &str) -> Result<JsonValue>;
    async fn search(&self, body: &JsonValue) -> Result<JsonValue>;
}

/// HTTP client for the payments API.
pub struct HttpPaymentsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpPaymentsClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url).context("Failed to parse payments API URL")?;

        // Url::join treats a path without a trailing slash as a file.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    async fn get(
        &self,
        resource: Resource,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<JsonValue> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::upstream(resource, e))?;
        tracing::debug!(%url, "GET payments API");

        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| Error::upstream(resource, e))?
            .error_for_status()
            .map_err(|e| Error::upstream(resource, e))?;

        response
            .json()
            .await
            .map_err(|e| Error::upstream(resource, e))
    }
}

#[async_trait]
impl PaymentsClient for HttpPaymentsClient {
    async fn transaction(&self, id: &str) -> Result<JsonValue> {
        self.get(Resource::Transaction, &format!("transactions/{id}"), &[])
            .await
    }

    async fn gateway_operations(&self, transaction_id: &str) -> Result<JsonValue> {
        self.get(
            Resource::GatewayOperations,
            &format!("transactions/{transaction_id}/operations"),
            &[],
        )
        .await
    }

    async fn chargeback_operations(&self, transaction_id: &str) -> Result<JsonValue> {
        self.get(
            Resource::ChargebackOperations,
            "chargeback_operations",
            &[("transaction_id", transaction_id)],
        )
        .await
    }

    async fn payables(&self, transaction_id: &str) -> Result<JsonValue> {
        self.get(
            Resource::Payables,
            &format!("transactions/{transaction_id}/payables"),
            &[],
        )
        .await
    }

    async fn recipient(&self, id: &str) -> Result<JsonValue> {
        self.get(Resource::Recipient, &format!("recipients/{id}"), &[])
            .await
    }

    async fn search(&self, body: &JsonValue) -> Result<JsonValue> {
        let url = self
            .base_url
            .join("search")
            .map_err(|e| Error::upstream(Resource::Search, e))?;
        tracing::debug!(%url, "POST payments API search");

        let response = self
            .http
            .post(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("type", "transaction"),
            ])
            .json(body)
            .send()
            .await
            .map_err(|e| Error::upstream(Resource::Search, e))?
            .error_for_status()
            .map_err(|e| Error::upstream(Resource::Search, e))?;

        response
            .json()
            .await
            .map_err(|e| Error::upstream(Resource::Search, e))
    }
}
