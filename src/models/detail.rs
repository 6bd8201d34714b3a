use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::status::TransactionFlow;

/// How a share of a transaction's settlement is routed to one recipient.
///
/// Rules coming back from the API may carry fields beyond the ones named
/// here (amounts, percentages); the flattened map keeps them intact so the
/// resolved rule is the original rule plus `recipient`, never a rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRule {
    /// Null on the synthetic rule derived from a payable.
    #[serde(default)]
    pub id: JsonValue,
    pub recipient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_processing_fee: Option<bool>,
    /// Resolved recipient record, attached during enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl SplitRule {
    /// Rule derived from the first payable when the transaction carries no
    /// split rules of its own: the whole settlement goes to that payable's
    /// recipient, liable and charged for processing.
    pub fn from_payable(recipient_id: impl Into<String>) -> Self {
        Self {
            id: JsonValue::Null,
            recipient_id: recipient_id.into(),
            liable: Some(true),
            charge_processing_fee: Some(true),
            recipient: None,
            extra: Map::new(),
        }
    }
}

/// Everything the transaction-detail view consumes, assembled from the
/// five upstream fetches. Key names match what the presentation layer
/// already binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: JsonValue,
    #[serde(rename = "gatewayOperations")]
    pub gateway_operations: JsonValue,
    #[serde(rename = "chargebackOperations")]
    pub chargeback_operations: JsonValue,
    pub payables: JsonValue,
    pub split_rules: Vec<SplitRule>,
    pub flow: TransactionFlow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn synthetic_rule_has_null_id_and_full_liability() {
        let rule = SplitRule::from_payable("re_1");

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "id": null,
                "recipient_id": "re_1",
                "liable": true,
                "charge_processing_fee": true,
            })
        );
    }

    #[test]
    fn api_rule_keeps_unknown_fields() {
        let raw = json!({
            "id": 42,
            "recipient_id": "re_9",
            "liable": false,
            "charge_processing_fee": true,
            "percentage": 60,
            "amount": null,
        });

        let rule: SplitRule = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(rule.extra["percentage"], json!(60));
        assert_eq!(serde_json::to_value(&rule).unwrap(), raw);
    }

    #[test]
    fn detail_keys_match_the_consumer_contract() {
        let details = TransactionDetails {
            transaction: json!({ "id": 1 }),
            gateway_operations: json!([]),
            chargeback_operations: json!([]),
            payables: json!([]),
            split_rules: vec![],
            flow: TransactionFlow::Regular,
        };

        let value = serde_json::to_value(&details).unwrap();
        assert!(value.get("gatewayOperations").is_some());
        assert!(value.get("chargebackOperations").is_some());
        assert!(value.get("split_rules").is_some());
    }
}
