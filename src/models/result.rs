use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::query::SearchQuery;

/// Search response reshaped for the dashboard: the originating query plus
/// totals, the page of rows, and the chart dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub query: SearchQuery,
    pub result: SearchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: TotalSummary,
    pub list: RowList,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalSummary {
    pub count: u64,
    pub payment: PaymentTotals,
}

/// Amounts in cents, summed over the returned rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTotals {
    pub net_amount: i64,
    pub paid_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowList {
    pub count: u64,
    /// The query's page index, passed through untouched.
    pub offset: u64,
    /// Hit sources, field for field, in backend order.
    pub rows: Vec<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub dataset: Vec<ChartPoint>,
}

/// One time bucket of the chart. `amounts` is sparse: a status with no
/// records in the bucket has no key at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    #[serde(flatten)]
    pub amounts: BTreeMap<String, i64>,
}
