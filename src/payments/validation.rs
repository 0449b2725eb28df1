//! Pre-flight checks run before any request reaches the network.

use crate::error::{TemboError, TemboResult};
use crate::payments::catalog::Catalog;
use crate::payments::types::{
    CollectionRequest, DisbursementRequest, PaymentStatusRequest, StatementQuery,
};

fn require(field: &str, value: &str) -> TemboResult<()> {
    if value.is_empty() {
        return Err(TemboError::validation(field, format!("{} is required", field)));
    }
    Ok(())
}

fn require_positive(amount: f64) -> TemboResult<()> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(TemboError::validation(
            "amount",
            "amount must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_collection(catalog: &Catalog, request: &CollectionRequest) -> TemboResult<()> {
    require("msisdn", &request.msisdn)?;
    require("channel", &request.channel)?;
    require_positive(request.amount)?;
    require("narration", &request.narration)?;
    require("transactionRef", &request.transaction_ref)?;
    require("transactionDate", &request.transaction_date)?;
    require("callbackUrl", &request.callback_url)?;

    if !catalog.is_valid_channel(&request.channel) {
        return Err(TemboError::validation(
            "channel",
            format!(
                "invalid channel: {}. Supported channels: {:?}",
                request.channel,
                catalog.supported_channels()
            ),
        ));
    }

    Ok(())
}

pub fn validate_disbursement(catalog: &Catalog, request: &DisbursementRequest) -> TemboResult<()> {
    require("countryCode", &request.country_code)?;
    if request.country_code != catalog.country_code {
        return Err(TemboError::validation(
            "countryCode",
            format!("unsupported countryCode: {}", request.country_code),
        ));
    }
    require("accountNo", &request.account_no)?;
    require("serviceCode", &request.service_code)?;
    if !catalog.is_valid_service(&request.service_code) {
        return Err(TemboError::validation(
            "serviceCode",
            format!(
                "invalid serviceCode: {}. Supported services: {:?}",
                request.service_code,
                catalog.supported_services()
            ),
        ));
    }
    require_positive(request.amount)?;
    require("msisdn", &request.msisdn)?;
    require("narration", &request.narration)?;
    require("currencyCode", &request.currency_code)?;
    if request.currency_code != catalog.currency_code {
        return Err(TemboError::validation(
            "currencyCode",
            format!("unsupported currencyCode: {}", request.currency_code),
        ));
    }
    require("recipientNames", &request.recipient_names)?;
    require("transactionRef", &request.transaction_ref)?;
    require("transactionDate", &request.transaction_date)?;
    require("callbackUrl", &request.callback_url)?;
    Ok(())
}

/// Pins the bank-payout service code. An empty code is filled in; any other
/// explicit code is rejected rather than overridden.
pub fn prepare_bank_payout(
    catalog: &Catalog,
    mut request: DisbursementRequest,
) -> TemboResult<DisbursementRequest> {
    if request.service_code.is_empty() {
        request.service_code = catalog.bank_service_code.clone();
    }
    if request.service_code != catalog.bank_service_code {
        return Err(TemboError::validation(
            "serviceCode",
            format!(
                "serviceCode must be {} for bank payouts",
                catalog.bank_service_code
            ),
        ));
    }
    Ok(request)
}

pub fn validate_status_query(request: &PaymentStatusRequest) -> TemboResult<()> {
    if request.transaction_ref.is_empty() && request.transaction_id.is_empty() {
        return Err(TemboError::validation(
            "transactionRef",
            "either transactionRef or transactionId is required",
        ));
    }
    Ok(())
}

pub fn validate_statement_query(query: &StatementQuery) -> TemboResult<()> {
    require("startDate", &query.start_date)?;
    require("endDate", &query.end_date)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::payments::catalog::{
        CHANNEL_TZ_AIRTEL_C2B, CHANNEL_TZ_HALOTEL_C2B, CHANNEL_TZ_TIGO_C2B,
        SERVICE_TZ_BANK_B2C, SERVICE_TZ_TIGO_B2C,
    };

    fn collection() -> CollectionRequest {
        CollectionRequest {
            msisdn: "255715123456".to_string(),
            channel: CHANNEL_TZ_TIGO_C2B.to_string(),
            amount: 10000.0,
            narration: "Order #123".to_string(),
            transaction_ref: "ORDER_1".to_string(),
            transaction_date: "2024-01-01 10:00:00".to_string(),
            callback_url: "https://example.com/hook".to_string(),
        }
    }

    fn disbursement() -> DisbursementRequest {
        DisbursementRequest {
            country_code: "TZ".to_string(),
            account_no: "8000837333".to_string(),
            service_code: SERVICE_TZ_TIGO_B2C.to_string(),
            amount: 2500.0,
            msisdn: "255715123456".to_string(),
            narration: "Payout".to_string(),
            currency_code: "TZS".to_string(),
            recipient_names: "John Doe".to_string(),
            transaction_ref: "PAYOUT_1".to_string(),
            transaction_date: "2024-01-01 10:00:00".to_string(),
            callback_url: "https://example.com/hook".to_string(),
        }
    }

    fn field_of(err: TemboError) -> String {
        match err {
            TemboError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_every_supported_channel() {
        let catalog = Catalog::default();
        for channel in [CHANNEL_TZ_TIGO_C2B, CHANNEL_TZ_AIRTEL_C2B, CHANNEL_TZ_HALOTEL_C2B] {
            let mut request = collection();
            request.channel = channel.to_string();
            assert!(validate_collection(&catalog, &request).is_ok(), "{}", channel);
        }
    }

    #[test]
    fn test_rejects_unknown_channel() {
        let catalog = Catalog::default();
        for channel in ["TZ-VODACOM-C2B", "tz-tigo-c2b", "TZ-TIGO-B2C", " "] {
            let mut request = collection();
            request.channel = channel.to_string();
            let err = validate_collection(&catalog, &request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(field_of(err), "channel");
        }
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let catalog = Catalog::default();
        for amount in [0.0, -0.0, -1.0, -10000.0, f64::NAN] {
            let mut request = collection();
            request.amount = amount;
            assert_eq!(field_of(validate_collection(&catalog, &request).unwrap_err()), "amount");

            let mut payout = disbursement();
            payout.amount = amount;
            assert_eq!(
                field_of(validate_disbursement(&catalog, &payout).unwrap_err()),
                "amount"
            );
        }
    }

    #[test]
    fn test_rejects_missing_collection_fields() {
        let catalog = Catalog::default();
        let cases: Vec<(&str, fn(&mut CollectionRequest))> = vec![
            ("msisdn", |r| r.msisdn.clear()),
            ("narration", |r| r.narration.clear()),
            ("transactionRef", |r| r.transaction_ref.clear()),
            ("transactionDate", |r| r.transaction_date.clear()),
            ("callbackUrl", |r| r.callback_url.clear()),
        ];
        for (field, mutate) in cases {
            let mut request = collection();
            mutate(&mut request);
            assert_eq!(field_of(validate_collection(&catalog, &request).unwrap_err()), field);
        }
    }

    #[test]
    fn test_only_empty_counts_as_missing() {
        let catalog = Catalog::default();
        let mut request = collection();
        request.narration = " ".to_string();
        assert!(validate_collection(&catalog, &request).is_ok());

        let status = PaymentStatusRequest::by_reference("  ");
        assert!(validate_status_query(&status).is_ok());

        request.narration.clear();
        assert_eq!(field_of(validate_collection(&catalog, &request).unwrap_err()), "narration");
    }

    #[test]
    fn test_disbursement_whitelists() {
        let catalog = Catalog::default();
        assert!(validate_disbursement(&catalog, &disbursement()).is_ok());

        let mut request = disbursement();
        request.country_code = "KE".to_string();
        assert_eq!(field_of(validate_disbursement(&catalog, &request).unwrap_err()), "countryCode");

        let mut request = disbursement();
        request.currency_code = "KES".to_string();
        assert_eq!(field_of(validate_disbursement(&catalog, &request).unwrap_err()), "currencyCode");

        let mut request = disbursement();
        request.service_code = "TZ-MPESA-B2C".to_string();
        assert_eq!(field_of(validate_disbursement(&catalog, &request).unwrap_err()), "serviceCode");

        let mut request = disbursement();
        request.recipient_names.clear();
        assert_eq!(
            field_of(validate_disbursement(&catalog, &request).unwrap_err()),
            "recipientNames"
        );

        let mut request = disbursement();
        request.account_no.clear();
        assert_eq!(field_of(validate_disbursement(&catalog, &request).unwrap_err()), "accountNo");
    }

    #[test]
    fn test_bank_payout_defaults_service_code() {
        let catalog = Catalog::default();
        let mut request = disbursement();
        request.service_code = String::new();

        let prepared = prepare_bank_payout(&catalog, request).unwrap();
        assert_eq!(prepared.service_code, SERVICE_TZ_BANK_B2C);
    }

    #[test]
    fn test_bank_payout_rejects_other_service_code() {
        let catalog = Catalog::default();
        let err = prepare_bank_payout(&catalog, disbursement()).unwrap_err();
        assert_eq!(field_of(err), "serviceCode");
    }

    #[test]
    fn test_status_query_needs_an_identifier() {
        let err = validate_status_query(&PaymentStatusRequest::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(validate_status_query(&PaymentStatusRequest::by_reference("REF")).is_ok());
        assert!(validate_status_query(&PaymentStatusRequest::by_id("ID")).is_ok());
    }

    #[test]
    fn test_statement_query_needs_dates() {
        assert!(validate_statement_query(&StatementQuery::new("2023-01-01", "2023-01-31")).is_ok());
        let err = validate_statement_query(&StatementQuery::new("", "2023-01-31")).unwrap_err();
        assert_eq!(field_of(err), "startDate");
    }
}
