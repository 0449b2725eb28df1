//! Mobile-money gateway trait definitions
//!
//! Defines the operation surface of a collection/disbursement gateway so that
//! callers can substitute a fake in their own tests.

use crate::error::TemboResult;
use crate::payments::types::{
    BalanceResponse, CollectionRequest, CollectionResponse, DisbursementRequest,
    PaymentStatusRequest, StatementEntry, StatementQuery, WebhookPayload,
};
use async_trait::async_trait;

/// Which wallet a balance or statement call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Account that receives collections
    Collection,
    /// Disbursement (main) wallet
    Main,
}

/// Trait for mobile-money gateway implementations
///
/// Every operation validates its input before any network call. Nothing is
/// retried; callers decide using [`TemboError::is_retryable`](crate::TemboError::is_retryable).
#[async_trait]
pub trait MobileMoneyGateway: Send + Sync {
    /// Send a USSD push asking the subscriber to approve a payment
    ///
    /// # Arguments
    /// * `request` - Subscriber MSISDN, channel, amount and caller reference
    ///
    /// # Returns
    /// * `CollectionResponse` - Normally `PENDING_ACK`; the final outcome
    ///   arrives later as a webhook
    async fn collect(&self, request: CollectionRequest) -> TemboResult<CollectionResponse>;

    /// Look up the state of a collection
    ///
    /// # Arguments
    /// * `request` - Caller reference and/or gateway transaction id; at least
    ///   one must be set
    ///
    /// # Returns
    /// * `CollectionResponse` - Current status; rejected or failed
    ///   collections surface as a business error
    async fn collection_status(
        &self,
        request: PaymentStatusRequest,
    ) -> TemboResult<CollectionResponse>;

    /// Look up the state of a wallet-to-mobile or wallet-to-bank payout
    ///
    /// # Arguments
    /// * `request` - Caller reference and/or gateway transaction id
    ///
    /// # Returns
    /// * `CollectionResponse` - Current status of the payout
    async fn payment_status(&self, request: PaymentStatusRequest)
        -> TemboResult<CollectionResponse>;

    /// Fetch the balance of the collection or main account
    ///
    /// # Arguments
    /// * `account` - Which wallet to query; no request body is sent
    ///
    /// # Returns
    /// * `BalanceResponse` - Available and current balance with account details
    async fn balance(&self, account: AccountKind) -> TemboResult<BalanceResponse>;

    /// Fetch ledger entries for a date range
    ///
    /// All entries for the range come back in one response; the gateway
    /// exposes no paging cursor.
    ///
    /// # Arguments
    /// * `account` - Which wallet's statement to fetch
    /// * `query` - Inclusive `YYYY-MM-DD` start and end dates
    ///
    /// # Returns
    /// * `Vec<StatementEntry>` - Entries in gateway order; unreadable amounts
    ///   are decoded as absent rather than failing the call
    async fn statement(
        &self,
        account: AccountKind,
        query: StatementQuery,
    ) -> TemboResult<Vec<StatementEntry>>;

    /// Pay out to a mobile wallet or, with the bank service code, a bank account
    ///
    /// # Arguments
    /// * `request` - Source account, service code, recipient and amount
    ///
    /// # Returns
    /// * `CollectionResponse` - Submission status; the final outcome arrives
    ///   as a webhook
    async fn disburse(&self, request: DisbursementRequest) -> TemboResult<CollectionResponse>;

    /// [`disburse`](Self::disburse) with the service code pinned to the bank payout route
    ///
    /// # Arguments
    /// * `request` - Payout whose `msisdn` carries `<BIC>:<ACCOUNT NUMBER>`;
    ///   an empty service code is filled in, any other code is rejected
    ///
    /// # Returns
    /// * `CollectionResponse` - Submission status
    async fn disburse_to_bank(
        &self,
        request: DisbursementRequest,
    ) -> TemboResult<CollectionResponse>;

    /// Decode and check an inbound webhook body
    ///
    /// The gateway does not sign callbacks, so only shape and identifiers are
    /// checked.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook request body
    ///
    /// # Returns
    /// * `WebhookPayload` - Status code, caller reference and gateway id
    fn validate_webhook(&self, payload: &[u8]) -> TemboResult<WebhookPayload>;
}
