//! TemboPlus gateway client
//!
//! Each operation validates its input locally, posts it through
//! [`HttpTransport`] and returns the typed reply or a typed error.

use crate::config::ClientConfig;
use crate::error::TemboResult;
use crate::payments::catalog::{Catalog, Endpoints};
use crate::payments::traits::{AccountKind, MobileMoneyGateway};
use crate::payments::transport::{check_business_outcome, HttpTransport};
use crate::payments::types::{
    BalanceResponse, CollectionRequest, CollectionResponse, DisbursementRequest,
    PaymentStatusRequest, StatementEntry, StatementQuery, WebhookPayload,
};
use crate::payments::{validation, webhook};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

pub struct TemboPlusClient {
    transport: HttpTransport,
    endpoints: Endpoints,
    catalog: Catalog,
}

impl TemboPlusClient {
    pub fn new(config: ClientConfig) -> TemboResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;

        info!(
            "TemboPlus client initialized for {} environment with URL: {}",
            config.environment,
            transport.base_url()
        );

        Ok(Self {
            transport,
            endpoints: Endpoints::default(),
            catalog: Catalog::default(),
        })
    }

    pub fn from_env() -> TemboResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Effective base URL, including any override.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn post_payment<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> TemboResult<CollectionResponse> {
        let response: CollectionResponse = self.transport.post(path, Some(body)).await?;
        check_business_outcome(response)
    }

    fn balance_path(&self, account: AccountKind) -> &str {
        match account {
            AccountKind::Collection => self.endpoints.collection_balance.as_str(),
            AccountKind::Main => self.endpoints.main_balance.as_str(),
        }
    }

    fn statement_path(&self, account: AccountKind) -> &str {
        match account {
            AccountKind::Collection => self.endpoints.collection_statement.as_str(),
            AccountKind::Main => self.endpoints.main_statement.as_str(),
        }
    }

    pub async fn collection_balance(&self) -> TemboResult<BalanceResponse> {
        self.balance(AccountKind::Collection).await
    }

    pub async fn main_balance(&self) -> TemboResult<BalanceResponse> {
        self.balance(AccountKind::Main).await
    }

    pub async fn collection_statement(
        &self,
        query: StatementQuery,
    ) -> TemboResult<Vec<StatementEntry>> {
        self.statement(AccountKind::Collection, query).await
    }

    pub async fn main_statement(&self, query: StatementQuery) -> TemboResult<Vec<StatementEntry>> {
        self.statement(AccountKind::Main, query).await
    }
}

#[async_trait]
impl MobileMoneyGateway for TemboPlusClient {
    async fn collect(&self, request: CollectionRequest) -> TemboResult<CollectionResponse> {
        validation::validate_collection(&self.catalog, &request)?;

        info!(
            "Initiating TemboPlus collection: {} {} {}",
            request.amount, request.channel, request.transaction_ref
        );

        let response = self
            .post_payment(&self.endpoints.collection, &request)
            .await?;

        info!(
            "TemboPlus collection submitted: reference={}, status={}, id={}",
            response.transaction_ref, response.status_code, response.transaction_id
        );
        Ok(response)
    }

    async fn collection_status(
        &self,
        request: PaymentStatusRequest,
    ) -> TemboResult<CollectionResponse> {
        validation::validate_status_query(&request)?;
        self.post_payment(&self.endpoints.collection_status, &request)
            .await
    }

    async fn payment_status(
        &self,
        request: PaymentStatusRequest,
    ) -> TemboResult<CollectionResponse> {
        validation::validate_status_query(&request)?;
        self.post_payment(&self.endpoints.payment_status, &request)
            .await
    }

    async fn balance(&self, account: AccountKind) -> TemboResult<BalanceResponse> {
        self.transport
            .post::<(), _>(self.balance_path(account), None)
            .await
    }

    async fn statement(
        &self,
        account: AccountKind,
        query: StatementQuery,
    ) -> TemboResult<Vec<StatementEntry>> {
        validation::validate_statement_query(&query)?;

        let entries: Vec<StatementEntry> = self
            .transport
            .post(self.statement_path(account), Some(&query))
            .await?;

        info!(
            "Fetched {:?} statement {}..{}: {} entries",
            account,
            query.start_date,
            query.end_date,
            entries.len()
        );
        Ok(entries)
    }

    async fn disburse(&self, request: DisbursementRequest) -> TemboResult<CollectionResponse> {
        validation::validate_disbursement(&self.catalog, &request)?;

        info!(
            "Processing TemboPlus payout: {} {} {} {}",
            request.amount, request.currency_code, request.service_code, request.transaction_ref
        );

        let response = self
            .post_payment(&self.endpoints.wallet_to_mobile, &request)
            .await?;

        info!(
            "TemboPlus payout submitted: reference={}, status={}, id={}",
            response.transaction_ref, response.status_code, response.transaction_id
        );
        Ok(response)
    }

    async fn disburse_to_bank(
        &self,
        request: DisbursementRequest,
    ) -> TemboResult<CollectionResponse> {
        let request = validation::prepare_bank_payout(&self.catalog, request)?;
        self.disburse(request).await
    }

    fn validate_webhook(&self, payload: &[u8]) -> TemboResult<WebhookPayload> {
        webhook::parse_webhook(payload)
    }
}
