use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::status::TransactionStatus;

/// Date window a search covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Search request as assembled by the dashboard. Immutable once built;
/// echoed back unchanged inside the result envelope so consumers can
/// correlate a response with the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search: String,
    pub dates: DateRange,
    #[serde(default)]
    pub filters: HashMap<String, Vec<String>>,
    /// 1-based page index.
    pub offset: u64,
    /// Rows per page.
    pub count: u64,
    #[serde(default)]
    pub aggregations: HashMap<String, AggregationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<JsonValue>,
}

impl SearchQuery {
    /// Query with the dashboard's landing defaults: everything from the
    /// last 30 days, first page of 15 rows, no filters.
    pub fn last_30_days() -> Self {
        let end = Utc::now();
        Self {
            search: String::new(),
            dates: DateRange {
                start: end - Duration::days(30),
                end,
            },
            filters: HashMap::new(),
            offset: 1,
            count: 15,
            aggregations: HashMap::new(),
            sort: None,
        }
    }

    /// Narrow the search to a lifecycle status, the way the dashboard's
    /// filter panel stacks them up.
    pub fn filter_by_status(mut self, status: TransactionStatus) -> Self {
        self.filters
            .entry("status".to_string())
            .or_default()
            .push(status.as_str().to_string());
        self
    }
}

/// One node of the aggregation tree a query declares. The wire shape puts
/// the variant body and the nested `aggregations` map at the same level,
/// hence the flatten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    #[serde(flatten)]
    pub kind: AggregationKind,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub aggregations: HashMap<String, AggregationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    Sum(SumSpec),
    DateHistogram(DateHistogramSpec),
    Terms(TermsSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumSpec {
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateHistogramSpec {
    pub field: String,
    pub interval: String,
    /// Date pattern for bucket labels, `MM/dd/yyyy` style.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsSpec {
    pub field: String,
}

impl AggregationSpec {
    pub fn sum(field: impl Into<String>) -> Self {
        Self {
            kind: AggregationKind::Sum(SumSpec {
                field: field.into(),
            }),
            aggregations: HashMap::new(),
        }
    }

    pub fn date_histogram(
        field: impl Into<String>,
        interval: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            kind: AggregationKind::DateHistogram(DateHistogramSpec {
                field: field.into(),
                interval: interval.into(),
                format: format.into(),
            }),
            aggregations: HashMap::new(),
        }
    }

    pub fn terms(field: impl Into<String>) -> Self {
        Self {
            kind: AggregationKind::Terms(TermsSpec {
                field: field.into(),
            }),
            aggregations: HashMap::new(),
        }
    }

    pub fn nest(mut self, name: impl Into<String>, child: AggregationSpec) -> Self {
        self.aggregations.insert(name.into(), child);
        self
    }

    pub fn histogram_spec(&self) -> Option<&DateHistogramSpec> {
        match &self.kind {
            AggregationKind::DateHistogram(spec) => Some(spec),
            _ => None,
        }
    }

    /// Nested `terms` sub-aggregation. When several are declared the
    /// lexicographically first name wins, so the choice is deterministic.
    pub fn terms_child(&self) -> Option<(&str, &AggregationSpec)> {
        let mut entries: Vec<_> = self
            .aggregations
            .iter()
            .filter(|(_, spec)| matches!(spec.kind, AggregationKind::Terms(_)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .first()
            .map(|(name, spec)| (name.as_str(), *spec))
    }

    /// Name of the nested `sum` sub-aggregation carrying a bucket's metric.
    pub fn sum_child(&self) -> Option<&str> {
        let mut entries: Vec<_> = self
            .aggregations
            .iter()
            .filter(|(_, spec)| matches!(spec.kind, AggregationKind::Sum(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        entries.sort();
        entries.first().copied()
    }
}
