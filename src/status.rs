use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Transaction lifecycle statuses reported by the payments API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Processing,
    Authorized,
    Paid,
    Refunded,
    WaitingPayment,
    PendingRefund,
    Refused,
    Chargedback,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Processing => "processing",
            TransactionStatus::Authorized => "authorized",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::WaitingPayment => "waiting_payment",
            TransactionStatus::PendingRefund => "pending_refund",
            TransactionStatus::Refused => "refused",
            TransactionStatus::Chargedback => "chargedback",
        }
    }
}

/// Display-relevant classification of a transaction, derived once instead
/// of re-testing status strings all over the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFlow {
    /// Status is anywhere in the chargeback cycle.
    Chargebacked,
    /// Boleto issued, payment not yet registered.
    BoletoWaitingPayment,
    Regular,
}

impl TransactionFlow {
    /// Whether the detail view should call the operator's attention.
    pub fn requires_attention(&self) -> bool {
        !matches!(self, TransactionFlow::Regular)
    }
}

/// Classify a raw transaction document.
///
/// Statuses in the chargeback cycle appear both as `chargedback` and as
/// composites like `chargeback_refund`, so both spellings are checked.
/// The payment method lives under `payment.method` on shaped rows and
/// `payment_method` on raw API records; either is accepted.
pub fn classify(transaction: &JsonValue) -> TransactionFlow {
    let status = transaction
        .get("status")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();

    if status.contains("chargeback") || status.contains("chargedback") {
        return TransactionFlow::Chargebacked;
    }

    let method = transaction
        .pointer("/payment/method")
        .or_else(|| transaction.get("payment_method"))
        .and_then(JsonValue::as_str);

    if method == Some("boleto") && status == "waiting_payment" {
        return TransactionFlow::BoletoWaitingPayment;
    }

    TransactionFlow::Regular
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chargeback_cycle_is_flagged() {
        for status in ["chargedback", "chargeback_refund"] {
            let flow = classify(&json!({ "status": status }));
            assert_eq!(flow, TransactionFlow::Chargebacked);
            assert!(flow.requires_attention());
        }
    }

    #[test]
    fn boleto_waiting_payment_is_flagged() {
        let raw = json!({
            "status": "waiting_payment",
            "payment_method": "boleto",
        });
        assert_eq!(classify(&raw), TransactionFlow::BoletoWaitingPayment);

        let shaped = json!({
            "status": "waiting_payment",
            "payment": { "method": "boleto" },
        });
        assert_eq!(classify(&shaped), TransactionFlow::BoletoWaitingPayment);
    }

    #[test]
    fn card_flows_are_regular() {
        let paid = json!({ "status": "paid", "payment": { "method": "credit_card" } });
        assert_eq!(classify(&paid), TransactionFlow::Regular);
        assert!(!classify(&paid).requires_attention());

        // waiting_payment alone is only notable for boletos
        let waiting = json!({ "status": "waiting_payment", "payment_method": "credit_card" });
        assert_eq!(classify(&waiting), TransactionFlow::Regular);
    }

    #[test]
    fn status_round_trips_snake_case() {
        let status: TransactionStatus = serde_json::from_value(json!("waiting_payment")).unwrap();
        assert_eq!(status, TransactionStatus::WaitingPayment);
        assert_eq!(serde_json::to_value(status).unwrap(), json!("waiting_payment"));
    }
}
