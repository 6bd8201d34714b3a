use std::fmt;

use thiserror::Error;

/// Fetch kinds the payments API exposes, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Transaction,
    GatewayOperations,
    ChargebackOperations,
    Payables,
    Recipient,
    Search,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Transaction => "transaction",
            Resource::GatewayOperations => "gateway operations",
            Resource::ChargebackOperations => "chargeback operations",
            Resource::Payables => "payables",
            Resource::Recipient => "recipient",
            Resource::Search => "search",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A required top-level field is missing from a backend response.
    /// Contract violation, not a recoverable condition.
    #[error("malformed backend response: missing `{field}`")]
    MalformedResponse { field: &'static str },

    /// One of the upstream fetches failed. Propagated unchanged; no
    /// retries here and no partial result is assembled.
    #[error("upstream fetch failed for {resource}")]
    UpstreamFetch {
        resource: Resource,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn malformed(field: &'static str) -> Self {
        Error::MalformedResponse { field }
    }

    pub fn upstream(resource: Resource, source: impl Into<anyhow::Error>) -> Self {
        Error::UpstreamFetch {
            resource,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
