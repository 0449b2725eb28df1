//! Authenticated HTTP transport and response classification.
//!
//! Every call is a single POST with the account credentials and a fresh
//! `x-request-id`. Replies are classified as:
//!
//! - non-2xx: a gateway [`ApiError`] envelope if one decodes with a non-zero
//!   `statusCode`, otherwise a transport error carrying status and body
//! - 2xx: the expected shape, or a decode error
//!
//! Payment replies go through [`check_business_outcome`] as well, so a 2xx
//! carrying `PAYMENT_REJECTED` or `GENERIC_ERROR` is surfaced as a
//! [`BusinessError`]. Nothing here retries.

use crate::config::{ClientConfig, Credentials};
use crate::error::{ApiError, BusinessError, TemboError, TemboResult};
use crate::payments::types::CollectionResponse;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub const HEADER_ACCOUNT_ID: &str = "x-account-id";
pub const HEADER_SECRET_KEY: &str = "x-secret-key";
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Unique per call. UUIDv7 is time-ordered, which keeps ids sortable in
/// gateway logs.
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::now_v7().simple())
}

pub struct HttpTransport {
    http_client: Client,
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> TemboResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("temboplus-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TemboError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` (if any) to `path` and decode a 2xx reply into `T`.
    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> TemboResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let request_id = generate_request_id();

        debug!(path, request_id = %request_id, "Sending TemboPlus request");

        let mut request = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(HEADER_ACCOUNT_ID, &self.credentials.account_id)
            .header(HEADER_SECRET_KEY, self.credentials.secret_key())
            .header(HEADER_REQUEST_ID, &request_id);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.send_error(path, e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.send_error(path, e))?;

        debug!(path, request_id = %request_id, status, "Received TemboPlus response");

        decode_response(status, &text)
    }

    fn send_error(&self, path: &str, err: reqwest::Error) -> TemboError {
        if err.is_timeout() {
            warn!(path, "TemboPlus request timed out after {:?}", self.timeout);
            TemboError::timeout(self.timeout)
        } else {
            error!(path, "TemboPlus request failed: {}", err);
            TemboError::from(err)
        }
    }
}

pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> TemboResult<T> {
    if !(200..300).contains(&status) {
        return Err(classify_error(status, body));
    }

    serde_json::from_str(body).map_err(|e| {
        error!(status, "Failed to parse TemboPlus response: {}", e);
        TemboError::decode(
            format!("failed to unmarshal response: {}", e),
            Some(body.to_string()),
        )
    })
}

/// Error for a non-2xx reply.
pub fn classify_error(status: u16, body: &str) -> TemboError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) if api_error.status_code != 0 => {
            warn!(status, "TemboPlus API error: {}", api_error);
            TemboError::Api(api_error)
        }
        _ => {
            warn!(status, "TemboPlus returned unexpected status");
            TemboError::unexpected_status(status, body)
        }
    }
}

pub fn check_business_outcome(response: CollectionResponse) -> TemboResult<CollectionResponse> {
    if response.status_code.is_failure() {
        warn!(
            status_code = %response.status_code,
            transaction_ref = %response.transaction_ref,
            "TemboPlus reported a failed payment"
        );
        return Err(BusinessError::from_response(response).into());
    }
    Ok(response)
}

/// Races `operation` against `cancel`. When the signal wins the in-flight
/// call is dropped and [`TemboError::Cancelled`] is returned; the gateway may
/// still have accepted the request.
pub async fn with_cancellation<T, F, C>(operation: F, cancel: C) -> TemboResult<T>
where
    F: Future<Output = TemboResult<T>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            warn!("TemboPlus call cancelled by caller");
            Err(TemboError::Cancelled)
        }
        result = operation => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::payments::catalog::PaymentStatusCode;
    use crate::payments::types::CollectionBalanceResponse;
    use std::collections::HashSet;

    #[test]
    fn test_api_error_envelope_on_non_2xx() {
        let err = decode_response::<CollectionResponse>(
            401,
            r#"{"statusCode":401,"reason":"INVALID_CREDENTIALS"}"#,
        )
        .unwrap_err();

        match err {
            TemboError::Api(api) => {
                assert_eq!(api.status_code, 401);
                assert_eq!(api.reason.as_deref(), Some("INVALID_CREDENTIALS"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_2xx_without_envelope_is_transport_error() {
        let err = decode_response::<CollectionResponse>(502, "<html>Bad Gateway</html>").unwrap_err();
        match err {
            TemboError::Transport { status, body, .. } => {
                assert_eq!(status, Some(502));
                assert_eq!(body.as_deref(), Some("<html>Bad Gateway</html>"));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_with_zero_status_is_transport_error() {
        let err = decode_response::<CollectionResponse>(500, r#"{"statusCode":0}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_malformed_2xx_body_is_decode_error() {
        let err = decode_response::<CollectionBalanceResponse>(200, "not json").unwrap_err();
        match err {
            TemboError::Decode { body, .. } => assert_eq!(body.as_deref(), Some("not json")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_payment_is_business_error() {
        let response: CollectionResponse = decode_response(
            200,
            r#"{"statusCode":"PAYMENT_REJECTED","transactionRef":"ORDER_1","transactionId":"T9"}"#,
        )
        .unwrap();

        let err = check_business_outcome(response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Business);
        assert_eq!(err.business_response().unwrap().transaction_id, "T9");
        match err {
            TemboError::Business(business) => {
                assert_eq!(business.status_code, PaymentStatusCode::PaymentRejected)
            }
            other => panic!("expected business error, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_error_is_business_error() {
        let response: CollectionResponse =
            decode_response(200, r#"{"statusCode":"GENERIC_ERROR","transactionRef":"R"}"#).unwrap();
        assert_eq!(check_business_outcome(response).unwrap_err().kind(), ErrorKind::Business);
    }

    #[test]
    fn test_pending_ack_is_success() {
        let response: CollectionResponse = decode_response(
            200,
            r#"{"statusCode":"PENDING_ACK","transactionRef":"ORDER_1","transactionId":"T1"}"#,
        )
        .unwrap();
        let response = check_business_outcome(response).unwrap();
        assert_eq!(response.status_code, PaymentStatusCode::PendingAck);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_request_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("req_")));
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_pending_call() {
        let result: TemboResult<()> =
            with_cancellation(std::future::pending(), std::future::ready(())).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_completed_call_is_returned() {
        let result = with_cancellation(async { Ok(7) }, std::future::pending()).await;
        assert_eq!(result.unwrap(), 7);
    }
}
