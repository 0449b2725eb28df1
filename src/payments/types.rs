//! Request and response records exchanged with the TemboPlus gateway.
//!
//! Field names follow the gateway's camelCase JSON.

use crate::payments::amount::OptionalAmount;
use crate::payments::catalog::PaymentStatusCode;
use serde::{Deserialize, Serialize};

/// USSD-push collection from a mobile subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    /// Phone number in international format, e.g. 255715123456
    pub msisdn: String,
    /// MNO channel, e.g. TZ-TIGO-C2B
    pub channel: String,
    /// Amount in TZS; must be greater than zero
    pub amount: f64,
    /// Text shown to the subscriber on the USSD prompt
    pub narration: String,
    /// Caller-assigned reference
    pub transaction_ref: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub transaction_date: String,
    /// Where the gateway delivers the final outcome
    pub callback_url: String,
}

/// Reply to collections, disbursements and status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    /// `PENDING_ACK`, `PAYMENT_ACCEPTED`, `PAYMENT_REJECTED` or `GENERIC_ERROR`
    pub status_code: PaymentStatusCode,
    /// Echo of the caller reference
    #[serde(default)]
    pub transaction_ref: String,
    /// Gateway-assigned transaction id
    #[serde(default)]
    pub transaction_id: String,
}

pub type DisbursementResponse = CollectionResponse;
pub type PaymentStatusResponse = CollectionResponse;

/// Wallet-to-mobile or wallet-to-bank payout.
///
/// For bank payouts `msisdn` carries `<BIC>:<ACCOUNT NUMBER>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementRequest {
    /// Always `TZ`
    pub country_code: String,
    /// Source wallet account number
    pub account_no: String,
    /// Payout route, e.g. TZ-TIGO-B2C or TZ-BANK-B2C
    pub service_code: String,
    pub amount: f64,
    /// Recipient phone number, or `<BIC>:<ACCOUNT NUMBER>` for bank payouts
    pub msisdn: String,
    pub narration: String,
    /// Always `TZS`
    pub currency_code: String,
    /// Recipient display name
    pub recipient_names: String,
    pub transaction_ref: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub transaction_date: String,
    pub callback_url: String,
}

/// Lookup by caller reference and/or gateway id. Empty fields are omitted on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    /// Caller-assigned reference
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transaction_ref: String,
    /// Gateway-assigned transaction id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transaction_id: String,
}

impl PaymentStatusRequest {
    pub fn by_reference(transaction_ref: impl Into<String>) -> Self {
        Self {
            transaction_ref: transaction_ref.into(),
            ..Default::default()
        }
    }

    pub fn by_id(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            ..Default::default()
        }
    }
}

/// Balance of the collection or main account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionBalanceResponse {
    /// Funds that can be paid out now
    pub available_balance: f64,
    /// Ledger balance, including funds not yet cleared
    pub current_balance: f64,
    pub account_no: String,
    pub account_status: String,
    pub account_name: String,
}

pub type BalanceResponse = CollectionBalanceResponse;

/// Date range for a statement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    /// `YYYY-MM-DD`, inclusive
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: String,
    /// Sub-wallet to restrict the statement to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
}

impl StatementQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            wallet_id: None,
        }
    }

    pub fn with_wallet(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }
}

/// One ledger line.
///
/// Credited and debited amounts are decoded tolerantly; see [`OptionalAmount`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementEntry {
    pub account_no: String,
    pub debit_or_credit: String,
    pub tran_ref_no: String,
    pub narration: String,
    pub txn_date: String,
    pub value_date: String,
    #[serde(default)]
    pub amount_credited: OptionalAmount,
    #[serde(default)]
    pub amount_debited: OptionalAmount,
    pub balance: f64,
}

impl StatementEntry {
    pub fn is_credit(&self) -> bool {
        self.debit_or_credit.eq_ignore_ascii_case("credit")
            || self.debit_or_credit.eq_ignore_ascii_case("cr")
    }
}

/// Callback delivered by the gateway to the caller's `callbackUrl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub status_code: PaymentStatusCode,
    #[serde(default)]
    pub transaction_ref: String,
    #[serde(default)]
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_request_wire_names() {
        let request = CollectionRequest {
            msisdn: "255715123456".to_string(),
            channel: "TZ-TIGO-C2B".to_string(),
            amount: 10000.0,
            narration: "Order #123".to_string(),
            transaction_ref: "ORDER_1".to_string(),
            transaction_date: "2024-01-01 10:00:00".to_string(),
            callback_url: "https://example.com/hook".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "msisdn": "255715123456",
                "channel": "TZ-TIGO-C2B",
                "amount": 10000.0,
                "narration": "Order #123",
                "transactionRef": "ORDER_1",
                "transactionDate": "2024-01-01 10:00:00",
                "callbackUrl": "https://example.com/hook"
            })
        );

        let decoded: CollectionRequest = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_status_request_omits_empty_fields() {
        let value = serde_json::to_value(PaymentStatusRequest::by_reference("REF-1")).unwrap();
        assert_eq!(value, json!({ "transactionRef": "REF-1" }));

        let value = serde_json::to_value(PaymentStatusRequest::by_id("X50jcLDcU")).unwrap();
        assert_eq!(value, json!({ "transactionId": "X50jcLDcU" }));
    }

    #[test]
    fn test_statement_query_omits_missing_wallet() {
        let value = serde_json::to_value(StatementQuery::new("2023-01-01", "2023-01-31")).unwrap();
        assert_eq!(value, json!({ "startDate": "2023-01-01", "endDate": "2023-01-31" }));

        let value =
            serde_json::to_value(StatementQuery::new("2023-01-01", "2023-01-31").with_wallet("W1"))
                .unwrap();
        assert_eq!(value["walletId"], "W1");
    }

    #[test]
    fn test_statement_entry_with_mixed_amounts() {
        let body = json!([
            {
                "accountNo": "8000837333",
                "debitOrCredit": "credit",
                "tranRefNo": "T1",
                "narration": "Collection",
                "txnDate": "2023-01-02",
                "valueDate": "2023-01-02",
                "amountCredited": "2500.00",
                "amountDebited": "",
                "balance": 12500.0
            },
            {
                "accountNo": "8000837333",
                "debitOrCredit": "debit",
                "tranRefNo": "T2",
                "narration": "Payout",
                "txnDate": "2023-01-03",
                "valueDate": "2023-01-03",
                "amountCredited": null,
                "amountDebited": 1000,
                "balance": 11500.0
            },
            {
                "accountNo": "8000837333",
                "debitOrCredit": "debit",
                "tranRefNo": "T3",
                "narration": "Fee",
                "txnDate": "2023-01-04",
                "valueDate": "2023-01-04",
                "amountDebited": "n/a",
                "balance": 11500.0
            }
        ])
        .to_string();
        let entries: Vec<StatementEntry> = serde_json::from_str(&body).unwrap();

        assert_eq!(entries[0].amount_credited, OptionalAmount::Present(2500.0));
        assert_eq!(entries[0].amount_debited, OptionalAmount::Absent);
        assert!(entries[0].is_credit());
        assert_eq!(entries[1].amount_credited, OptionalAmount::Absent);
        assert_eq!(entries[1].amount_debited, OptionalAmount::Present(1000.0));
        assert!(!entries[1].is_credit());
        assert_eq!(entries[2].amount_credited, OptionalAmount::Absent);
        assert_eq!(entries[2].amount_debited, OptionalAmount::Absent);
    }

    #[test]
    fn test_statement_survives_out_of_range_amount() {
        let body = r#"[
            {"accountNo":"8000837333","debitOrCredit":"credit","tranRefNo":"T1",
             "narration":"Collection","txnDate":"2023-01-02","valueDate":"2023-01-02",
             "amountCredited":1e400,"amountDebited":"","balance":2500.0},
            {"accountNo":"8000837333","debitOrCredit":"credit","tranRefNo":"T2",
             "narration":"Collection","txnDate":"2023-01-03","valueDate":"2023-01-03",
             "amountCredited":750,"amountDebited":null,"balance":3250.0}
        ]"#;

        let entries: Vec<StatementEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount_credited, OptionalAmount::Absent);
        assert_eq!(entries[0].tran_ref_no, "T1");
        assert_eq!(entries[1].amount_credited, OptionalAmount::Present(750.0));
    }

    #[test]
    fn test_collection_response_decodes_status() {
        let response: CollectionResponse = serde_json::from_str(
            r#"{"statusCode":"PENDING_ACK","transactionRef":"ORDER_1","transactionId":"X50jcLDcU"}"#,
        )
        .unwrap();
        assert_eq!(response.status_code, PaymentStatusCode::PendingAck);
        assert_eq!(response.transaction_id, "X50jcLDcU");
    }
}
