use serde_json::Value as JsonValue;

use crate::models::{SplitRule, TransactionDetails};
use crate::status;

/// Close the enrichment: put the resolved rules where the consumer expects
/// them and classify the transaction once, so the view never re-derives
/// status semantics from raw strings.
pub fn build(
    transaction: JsonValue,
    gateway_operations: JsonValue,
    chargeback_operations: JsonValue,
    payables: JsonValue,
    split_rules: Vec<SplitRule>,
) -> TransactionDetails {
    let flow = status::classify(&transaction);

    TransactionDetails {
        transaction,
        gateway_operations,
        chargeback_operations,
        payables,
        split_rules,
        flow,
    }
}
