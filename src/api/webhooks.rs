use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use temboplus::payments::webhook::webhook_acknowledgement;
use temboplus::MobileMoneyGateway;

use super::AppState;

/// Receives gateway callbacks. Invalid payloads get a 400 so the gateway
/// redelivers them.
pub async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    tracing::info!("Received webhook: {}", String::from_utf8_lossy(&body));

    let result = state.client.validate_webhook(&body);
    match &result {
        Ok(webhook) if webhook.is_successful() => {
            tracing::info!(
                "Payment successful for transaction {} ({})",
                webhook.transaction_ref,
                webhook.transaction_id
            );
        }
        Ok(webhook) if webhook.is_failed() => {
            tracing::warn!(
                "Payment failed for transaction {}: {}",
                webhook.transaction_ref,
                webhook.status_code
            );
        }
        Ok(webhook) => {
            tracing::warn!("Unknown webhook status: {}", webhook.status_code);
        }
        Err(e) => {
            tracing::error!("Invalid webhook payload: {}", e);
        }
    }

    let (status, reply) = webhook_acknowledgement(&result);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(reply))
}
