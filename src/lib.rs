//! Client library for the TemboPlus mobile-money gateway.
//!
//! Supports USSD-push collections, wallet-to-mobile and wallet-to-bank
//! payouts, status lookups, balances and statements, and inbound webhook
//! parsing.
//!
//! ```rust,no_run
//! use temboplus::payments::helpers::build_collection_request;
//! use temboplus::payments::catalog::CHANNEL_TZ_TIGO_C2B;
//! use temboplus::{ClientConfig, Credentials, Environment, MobileMoneyGateway, TemboPlusClient};
//!
//! # async fn example() -> temboplus::TemboResult<()> {
//! let config = ClientConfig::new(Environment::Sandbox, Credentials::new("account-id", "secret"));
//! let client = TemboPlusClient::new(config)?;
//!
//! let request = build_collection_request(
//!     "0715123456",
//!     CHANNEL_TZ_TIGO_C2B,
//!     10_000.0,
//!     "Order #123",
//!     "https://example.com/webhooks/temboplus",
//! );
//! let response = client.collect(request).await?;
//! println!("{} {}", response.status_code, response.transaction_id);
//! # Ok(())
//! # }
//! ```
//!
//! Retries are left to the caller; [`TemboError::is_retryable`] helps decide.

pub mod config;
pub mod error;
pub mod payments;

pub use config::{ClientConfig, Credentials, Environment};
pub use error::{ApiError, BusinessError, ErrorKind, TemboError, TemboResult};
pub use payments::providers::TemboPlusClient;
pub use payments::traits::{AccountKind, MobileMoneyGateway};
pub use payments::transport::with_cancellation;
