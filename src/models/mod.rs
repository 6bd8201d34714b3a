pub mod detail;
pub mod query;
pub mod result;

pub use detail::{SplitRule, TransactionDetails};
pub use query::{
    AggregationKind, AggregationSpec, DateHistogramSpec, DateRange, SearchQuery, SumSpec,
    TermsSpec,
};
pub use result::{
    Chart, ChartPoint, PaymentTotals, ResultEnvelope, RowList, SearchResult, TotalSummary,
};
