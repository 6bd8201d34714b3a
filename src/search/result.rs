use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::{
    AggregationSpec, Chart, ChartPoint, PaymentTotals, ResultEnvelope, RowList, SearchQuery,
    SearchResult, TotalSummary,
};

/// Reshapes raw search responses for one query.
///
/// The shaper holds the originating query so a single instance can format
/// a stream of responses for the same search (polling refreshes reuse it),
/// and so the envelope can echo the query back to the consumer.
#[derive(Debug, Clone)]
pub struct ResultShaper {
    query: SearchQuery,
    histogram: Option<String>,
}

impl ResultShaper {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            histogram: None,
        }
    }

    /// Name the aggregation that buckets the chart's time axis. Without
    /// this, the query's sole `date_histogram` entry is used.
    pub fn with_histogram(mut self, name: impl Into<String>) -> Self {
        self.histogram = Some(name.into());
        self
    }

    /// Shape one raw response. Pure; identical inputs give identical
    /// envelopes.
    pub fn shape(&self, raw: &JsonValue) -> Result<ResultEnvelope> {
        let hits = raw.get("hits").ok_or(Error::malformed("hits"))?;

        let total = hits.get("total").and_then(JsonValue::as_u64).unwrap_or(0);
        let rows = project_rows(hits);
        let payment = sum_payment_totals(&rows);
        let dataset = self.chart_dataset(raw);

        Ok(ResultEnvelope {
            query: self.query.clone(),
            result: SearchResult {
                total: TotalSummary {
                    count: total,
                    payment,
                },
                list: RowList {
                    count: total,
                    offset: self.query.offset,
                    rows,
                },
                chart: Chart { dataset },
            },
        })
    }

    /// The query aggregation driving the chart, by explicit name or by
    /// scanning for a `date_histogram` entry (lexicographically first name
    /// wins, so the fallback stays deterministic).
    fn histogram_entry(&self) -> Option<(&str, &AggregationSpec)> {
        if let Some(name) = &self.histogram {
            return self
                .query
                .aggregations
                .get_key_value(name.as_str())
                .map(|(name, spec)| (name.as_str(), spec));
        }

        let mut entries: Vec<_> = self
            .query
            .aggregations
            .iter()
            .filter(|(_, spec)| spec.histogram_spec().is_some())
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.first().map(|(name, spec)| (name.as_str(), *spec))
    }

    fn chart_dataset(&self, raw: &JsonValue) -> Vec<ChartPoint> {
        let Some((agg_name, spec)) = self.histogram_entry() else {
            return Vec::new();
        };
        let Some(histogram) = spec.histogram_spec() else {
            return Vec::new();
        };
        let Some((terms_name, terms_spec)) = spec.terms_child() else {
            return Vec::new();
        };
        let sum_name = terms_spec.sum_child();

        let buckets = raw
            .get("aggregations")
            .and_then(|aggs| aggs.get(agg_name))
            .and_then(|agg| agg.get("buckets"))
            .and_then(JsonValue::as_array);
        let Some(buckets) = buckets else {
            return Vec::new();
        };

        let mut dataset = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let name = match bucket.get("key").and_then(JsonValue::as_i64) {
                Some(millis) => format_bucket_key(millis, &histogram.format),
                // Backends that pre-format keys report them as strings.
                None => match bucket.get("key_as_string").and_then(JsonValue::as_str) {
                    Some(formatted) => formatted.to_string(),
                    None => continue,
                },
            };

            let mut amounts = BTreeMap::new();
            let statuses = bucket
                .get(terms_name)
                .and_then(|terms| terms.get("buckets"))
                .and_then(JsonValue::as_array);
            if let Some(statuses) = statuses {
                for status_bucket in statuses {
                    let Some(status) = status_bucket.get("key").and_then(JsonValue::as_str) else {
                        continue;
                    };
                    let value = sum_name
                        .and_then(|metric| status_bucket.get(metric))
                        .and_then(|sum| sum.get("value"))
                        .and_then(JsonValue::as_f64);
                    if let Some(value) = value {
                        amounts.insert(status.to_string(), value.round() as i64);
                    }
                }
            }

            dataset.push(ChartPoint { name, amounts });
        }

        dataset
    }
}

/// Hit sources in backend order. A hit without a `_source` envelope is
/// taken as the row itself.
fn project_rows(hits: &JsonValue) -> Vec<JsonValue> {
    hits.get("hits")
        .and_then(JsonValue::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|hit| hit.get("_source").unwrap_or(hit).clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Net and paid sums over the page rows. Rows without a `payment` block
/// count as zero rather than failing the shape.
fn sum_payment_totals(rows: &[JsonValue]) -> PaymentTotals {
    let mut totals = PaymentTotals::default();
    for row in rows {
        totals.net_amount += row
            .pointer("/payment/net_amount")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0);
        totals.paid_amount += row
            .pointer("/payment/paid_amount")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0);
    }
    totals
}

/// Render a bucket key (epoch milliseconds) with the query's date pattern.
fn format_bucket_key(millis: i64, pattern: &str) -> String {
    let timestamp = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
    timestamp.format(&translate_pattern(pattern)).to_string()
}

/// Map the backend's date-pattern tokens onto strftime. `yyyy`, `MM` and
/// `dd` are the tokens dashboard queries use; everything else passes
/// through literally.
fn translate_pattern(pattern: &str) -> String {
    pattern
        .replace('%', "%%")
        .replace("yyyy", "%Y")
        .replace("MM", "%m")
        .replace("dd", "%d")
}
