mod result;

pub use result::build;

use futures::future::try_join_all;
use serde_json::Value as JsonValue;

use crate::client::PaymentsClient;
use crate::error::{Error, Result};
use crate::models::{SplitRule, TransactionDetails};

/// Fetch everything the transaction-detail view needs.
///
/// The four primary lookups run concurrently and the first failure aborts
/// the whole call; recipient resolution only starts once all four are in.
/// No partial detail is ever returned.
pub async fn details(
    client: &dyn PaymentsClient,
    transaction_id: &str,
) -> Result<TransactionDetails> {
    let (transaction, gateway_operations, chargeback_operations, payables) = tokio::try_join!(
        client.transaction(transaction_id),
        client.gateway_operations(transaction_id),
        client.chargeback_operations(transaction_id),
        client.payables(transaction_id),
    )?;

    let rules = split_rule_source(&transaction, &payables)?;
    tracing::debug!(
        transaction_id,
        rules = rules.len(),
        "resolving split-rule recipients"
    );

    let split_rules = try_join_all(
        rules
            .into_iter()
            .map(|rule| resolve_recipient(client, rule)),
    )
    .await?;

    Ok(build(
        transaction,
        gateway_operations,
        chargeback_operations,
        payables,
        split_rules,
    ))
}

/// Rules to resolve: the transaction's own when present, otherwise one
/// synthetic rule pointing at the first payable's recipient. No payables
/// means no recipients at all.
fn split_rule_source(transaction: &JsonValue, payables: &JsonValue) -> Result<Vec<SplitRule>> {
    match transaction.get("split_rules") {
        Some(rules) if !rules.is_null() => serde_json::from_value(rules.clone())
            .map_err(|_| Error::malformed("split_rules")),
        _ => {
            let recipient_id = payables
                .as_array()
                .and_then(|entries| entries.first())
                .and_then(|payable| payable.get("recipient_id"))
                .and_then(JsonValue::as_str);

            Ok(recipient_id.map(SplitRule::from_payable).into_iter().collect())
        }
    }
}

async fn resolve_recipient(client: &dyn PaymentsClient, mut rule: SplitRule) -> Result<SplitRule> {
    let recipient = client.recipient(&rule.recipient_id).await?;
    rule.recipient = Some(recipient);
    Ok(rule)
}
