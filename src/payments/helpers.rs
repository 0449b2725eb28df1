//! Convenience helpers for building requests.

use crate::error::{TemboError, TemboResult};
use crate::payments::catalog::{CHANNEL_TZ_AIRTEL_C2B, CHANNEL_TZ_HALOTEL_C2B, CHANNEL_TZ_TIGO_C2B};
use crate::payments::types::CollectionRequest;
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

pub const TRANSACTION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static MSISDN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^255[0-9]{7,12}$").expect("MSISDN pattern is valid")
});

/// Normalises a Tanzanian phone number to `255XXXXXXXXX`.
///
/// A leading `+` and a single leading `0` are stripped; 9-digit numbers
/// starting with 6 or 7 get the `255` country code.
pub fn format_msisdn(phone_number: &str) -> String {
    let number = phone_number.trim();
    let number = number.strip_prefix('+').unwrap_or(number);
    let number = number.strip_prefix('0').unwrap_or(number);

    if number.len() == 9 && (number.starts_with('6') || number.starts_with('7')) {
        format!("255{}", number)
    } else {
        number.to_string()
    }
}

pub fn validate_msisdn(msisdn: &str) -> TemboResult<()> {
    if msisdn.len() < 10 || msisdn.len() > 15 {
        return Err(TemboError::validation(
            "msisdn",
            format!("invalid MSISDN length: {}", msisdn),
        ));
    }
    if !MSISDN_RE.is_match(msisdn) {
        return Err(TemboError::validation(
            "msisdn",
            format!("MSISDN should start with country code 255 for Tanzania: {}", msisdn),
        ));
    }
    Ok(())
}

/// `<PREFIX>_<unix millis>_<6 hex chars>`
pub fn generate_transaction_ref(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), &suffix[..6])
}

pub fn format_transaction_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TRANSACTION_DATE_FORMAT).to_string()
}

pub fn channel_provider(channel: &str) -> &'static str {
    match channel {
        CHANNEL_TZ_TIGO_C2B => "Tigo",
        CHANNEL_TZ_AIRTEL_C2B => "Airtel",
        CHANNEL_TZ_HALOTEL_C2B => "Halotel",
        _ => "Unknown",
    }
}

/// Collection request with a formatted MSISDN, a fresh `TXN` reference and
/// the current UTC timestamp.
pub fn build_collection_request(
    phone_number: &str,
    channel: &str,
    amount: f64,
    narration: &str,
    callback_url: &str,
) -> CollectionRequest {
    CollectionRequest {
        msisdn: format_msisdn(phone_number),
        channel: channel.to_string(),
        amount,
        narration: narration.to_string(),
        transaction_ref: generate_transaction_ref("TXN"),
        transaction_date: format_transaction_date(&Utc::now()),
        callback_url: callback_url.to_string(),
    }
}
