//! Gateway vocabulary: status codes, supported channels and services, and
//! endpoint paths.
//!
//! The tables are plain values owned by the client so tests can swap in
//! alternate endpoint sets (for example a local mock gateway).

use serde::{Deserialize, Serialize};
use std::fmt;

pub const STATUS_PENDING_ACK: &str = "PENDING_ACK";
pub const STATUS_PAYMENT_ACCEPTED: &str = "PAYMENT_ACCEPTED";
pub const STATUS_PAYMENT_REJECTED: &str = "PAYMENT_REJECTED";
pub const STATUS_GENERIC_ERROR: &str = "GENERIC_ERROR";

pub const CHANNEL_TZ_TIGO_C2B: &str = "TZ-TIGO-C2B";
pub const CHANNEL_TZ_AIRTEL_C2B: &str = "TZ-AIRTEL-C2B";
pub const CHANNEL_TZ_HALOTEL_C2B: &str = "TZ-HALOTEL-C2B";

pub const SERVICE_TZ_TIGO_B2C: &str = "TZ-TIGO-B2C";
pub const SERVICE_TZ_AIRTEL_B2C: &str = "TZ-AIRTEL-B2C";
pub const SERVICE_TZ_BANK_B2C: &str = "TZ-BANK-B2C";

pub const COUNTRY_CODE_TZ: &str = "TZ";
pub const CURRENCY_CODE_TZS: &str = "TZS";

/// Status code carried by collection, disbursement, status-query and webhook
/// payloads. Unrecognised codes are kept verbatim in [`PaymentStatusCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatusCode {
    PendingAck,
    PaymentAccepted,
    PaymentRejected,
    GenericError,
    Other(String),
}

impl PaymentStatusCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingAck => STATUS_PENDING_ACK,
            Self::PaymentAccepted => STATUS_PAYMENT_ACCEPTED,
            Self::PaymentRejected => STATUS_PAYMENT_REJECTED,
            Self::GenericError => STATUS_GENERIC_ERROR,
            Self::Other(code) => code,
        }
    }

    /// Rejected or generic-error outcomes.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PaymentRejected | Self::GenericError)
    }
}

impl From<String> for PaymentStatusCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            STATUS_PENDING_ACK => Self::PendingAck,
            STATUS_PAYMENT_ACCEPTED => Self::PaymentAccepted,
            STATUS_PAYMENT_REJECTED => Self::PaymentRejected,
            STATUS_GENERIC_ERROR => Self::GenericError,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for PaymentStatusCode {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<PaymentStatusCode> for String {
    fn from(code: PaymentStatusCode) -> Self {
        match code {
            PaymentStatusCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub code: String,
    /// Mobile network operator behind the channel.
    pub provider: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    MobileWallet,
    Bank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub code: String,
    pub kind: ServiceKind,
}

/// Whitelists used by request validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub channels: Vec<ChannelInfo>,
    pub services: Vec<ServiceInfo>,
    pub country_code: String,
    pub currency_code: String,
    pub bank_service_code: String,
}

impl Default for Catalog {
    fn default() -> Self {
        let channel = |code: &str, provider: &str| ChannelInfo {
            code: code.to_string(),
            provider: provider.to_string(),
        };
        let service = |code: &str, kind| ServiceInfo {
            code: code.to_string(),
            kind,
        };

        Self {
            channels: vec![
                channel(CHANNEL_TZ_TIGO_C2B, "Tigo"),
                channel(CHANNEL_TZ_AIRTEL_C2B, "Airtel"),
                channel(CHANNEL_TZ_HALOTEL_C2B, "Halotel"),
            ],
            services: vec![
                service(SERVICE_TZ_TIGO_B2C, ServiceKind::MobileWallet),
                service(SERVICE_TZ_AIRTEL_B2C, ServiceKind::MobileWallet),
                service(SERVICE_TZ_BANK_B2C, ServiceKind::Bank),
            ],
            country_code: COUNTRY_CODE_TZ.to_string(),
            currency_code: CURRENCY_CODE_TZS.to_string(),
            bank_service_code: SERVICE_TZ_BANK_B2C.to_string(),
        }
    }
}

impl Catalog {
    pub fn supported_channels(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.code.as_str()).collect()
    }

    pub fn supported_services(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.code.as_str()).collect()
    }

    pub fn is_valid_channel(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c.code == channel)
    }

    pub fn is_valid_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s.code == service)
    }

    pub fn channel(&self, code: &str) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.code == code)
    }

    pub fn service(&self, code: &str) -> Option<&ServiceInfo> {
        self.services.iter().find(|s| s.code == code)
    }
}

/// Request paths, relative to the environment base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub collection: String,
    pub collection_status: String,
    pub collection_balance: String,
    pub collection_statement: String,
    pub main_balance: String,
    pub main_statement: String,
    pub wallet_to_mobile: String,
    pub payment_status: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            collection: "/tembo/v1/collection".to_string(),
            collection_status: "/tembo/v1/collection/status".to_string(),
            collection_balance: "/tembo/v1/wallet/collection-balance".to_string(),
            collection_statement: "/tembo/v1/wallet/collection-statement".to_string(),
            main_balance: "/tembo/v1/wallet/main-balance".to_string(),
            main_statement: "/tembo/v1/wallet/main-statement".to_string(),
            wallet_to_mobile: "/tembo/v1/payment/wallet-to-mobile".to_string(),
            payment_status: "/tembo/v1/payment/status".to_string(),
        }
    }
}
