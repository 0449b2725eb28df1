//! Inbound callback handling.
//!
//! Payloads are not signed by the gateway, so [`parse_webhook`] can only check
//! shape and required identifiers. Anything that fails should be answered with
//! [`webhook_acknowledgement`]'s rejection so the gateway redelivers.

use crate::error::{TemboError, TemboResult};
use crate::payments::catalog::PaymentStatusCode;
use crate::payments::types::WebhookPayload;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub fn parse_webhook(payload: &[u8]) -> TemboResult<WebhookPayload> {
    let webhook: WebhookPayload = serde_json::from_slice(payload).map_err(|e| {
        warn!("Failed to parse webhook payload: {}", e);
        TemboError::decode(
            format!("failed to parse webhook payload: {}", e),
            Some(String::from_utf8_lossy(payload).into_owned()),
        )
    })?;

    if webhook.transaction_ref.is_empty() {
        return Err(TemboError::validation(
            "transactionRef",
            "invalid webhook payload: missing transactionRef",
        ));
    }
    if webhook.transaction_id.is_empty() {
        return Err(TemboError::validation(
            "transactionId",
            "invalid webhook payload: missing transactionId",
        ));
    }

    debug!(
        transaction_ref = %webhook.transaction_ref,
        status_code = %webhook.status_code,
        "Parsed TemboPlus webhook"
    );
    Ok(webhook)
}

impl WebhookPayload {
    pub fn is_successful(&self) -> bool {
        self.status_code == PaymentStatusCode::PaymentAccepted
    }

    pub fn is_failed(&self) -> bool {
        self.status_code.is_failure()
    }
}

/// HTTP status and JSON body to send back to the gateway.
pub fn webhook_acknowledgement(result: &TemboResult<WebhookPayload>) -> (u16, Value) {
    match result {
        Ok(_) => (200, json!({ "status": "received" })),
        Err(err) => (400, json!({ "status": "rejected", "error": err.to_string() })),
    }
}
