//! Data core of the payments dashboard: reshapes transaction-search
//! responses into the envelope the operator view renders, and assembles
//! enriched transaction detail (operations, payables, resolved split-rule
//! recipients) from the payments API.

pub mod client;
pub mod details;
pub mod error;
pub mod models;
pub mod search;
pub mod status;

pub use client::{HttpPaymentsClient, PaymentsClient};
pub use details::details;
pub use error::{Error, Resource, Result};
pub use models::{ResultEnvelope, SearchQuery, TransactionDetails};
pub use search::{search, ResultShaper};
pub use status::{TransactionFlow, TransactionStatus};
