mod api;

use anyhow::{bail, Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use temboplus::payments::catalog::{
    CHANNEL_TZ_AIRTEL_C2B, CHANNEL_TZ_TIGO_C2B, COUNTRY_CODE_TZ, CURRENCY_CODE_TZS,
    SERVICE_TZ_TIGO_B2C,
};
use temboplus::payments::helpers::{
    build_collection_request, format_msisdn, format_transaction_date, generate_transaction_ref,
};
use temboplus::payments::types::{DisbursementRequest, PaymentStatusRequest, StatementQuery};
use temboplus::{
    with_cancellation, AccountKind, ClientConfig, MobileMoneyGateway, TemboPlusClient,
};
use tracing_subscriber::EnvFilter;

const CALLBACK_URL: &str = "https://your-app.com/webhooks/temboplus";
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = ClientConfig::from_env().context("Failed to load TemboPlus configuration")?;
    let environment = config.environment;
    let client = Arc::new(TemboPlusClient::new(config)?);

    tracing::info!("Starting TemboPlus demo");
    tracing::info!("Environment: {}", environment);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("collect");

    match command {
        "collect" => collect_with_retry(&client).await,
        "batch" => batch_collect(&client).await,
        "balance" => show_balances(&client).await,
        "statement" => {
            let start = args.get(1).map(String::as_str).unwrap_or("2023-01-01");
            let end = args.get(2).map(String::as_str).unwrap_or("2023-01-31");
            show_statements(&client, start, end).await
        }
        "status" => {
            let reference = args.get(1).context("usage: status <transactionRef>")?;
            show_payment_status(&client, reference).await
        }
        "payout" => wallet_to_mobile(&client).await,
        "bank-payout" => wallet_to_bank(&client).await,
        "serve" => serve_webhooks(client, environment).await,
        other => bail!(
            "unknown command '{}'; expected collect, batch, balance, statement, status, payout, bank-payout or serve",
            other
        ),
    }
}

/// Retries are the caller's job: each attempt gets a fresh reference and
/// only retryable failures are repeated. Ctrl-C abandons the in-flight call.
async fn collect_with_retry(client: &TemboPlusClient) -> Result<()> {
    let mut request = build_collection_request(
        "0715123456",
        CHANNEL_TZ_TIGO_C2B,
        8000.0,
        "Payment with retry logic",
        CALLBACK_URL,
    );

    for attempt in 1..=MAX_ATTEMPTS {
        tracing::info!("Collection attempt {}/{}", attempt, MAX_ATTEMPTS);
        request.transaction_ref = generate_transaction_ref(&format!("RETRY_{}", attempt));
        request.transaction_date = format_transaction_date(&chrono::Utc::now());

        let call = client.collect(request.clone());
        let interrupted = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        match with_cancellation(call, interrupted).await {
            Ok(response) => {
                tracing::info!(
                    "USSD push sent: status={}, id={}, ref={}",
                    response.status_code,
                    response.transaction_id,
                    response.transaction_ref
                );
                return Ok(());
            }
            Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                tracing::warn!("Attempt {} failed: {}; retrying in {:?}", attempt, e, RETRY_DELAY);
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e).context("Collection failed"),
        }
    }

    bail!("All retry attempts exhausted")
}

async fn batch_collect(client: &TemboPlusClient) -> Result<()> {
    let customers = [
        ("0715111111", CHANNEL_TZ_TIGO_C2B, 5000.0, "Customer A payment"),
        ("0785222222", CHANNEL_TZ_AIRTEL_C2B, 7500.0, "Customer B payment"),
        ("0715333333", CHANNEL_TZ_TIGO_C2B, 3000.0, "Customer C payment"),
    ];

    for (i, (phone, channel, amount, narration)) in customers.iter().enumerate() {
        tracing::info!("Processing customer {}/{}", i + 1, customers.len());
        let request = build_collection_request(phone, channel, *amount, narration, CALLBACK_URL);

        match client.collect(request).await {
            Ok(response) => println!("SUCCESS: {} -> {}", phone, response.transaction_id),
            Err(e) => {
                tracing::error!("Failed to collect from {}: {}", phone, e);
                println!("FAILED: {}", phone);
            }
        }

        // Spread requests out to stay clear of gateway rate limits
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}

async fn show_balances(client: &TemboPlusClient) -> Result<()> {
    for account in [AccountKind::Main, AccountKind::Collection] {
        let balance = client.balance(account).await?;
        println!("=== {:?} balance ===", account);
        println!("Available: TZS {:.2}", balance.available_balance);
        println!("Current:   TZS {:.2}", balance.current_balance);
        println!("Account:   {} ({})", balance.account_no, balance.account_status);
        println!("Name:      {}", balance.account_name);
    }
    Ok(())
}

async fn show_statements(client: &TemboPlusClient, start: &str, end: &str) -> Result<()> {
    for account in [AccountKind::Collection, AccountKind::Main] {
        let entries = client.statement(account, StatementQuery::new(start, end)).await?;
        println!("=== {:?} statement: {} entries ===", account, entries.len());
        for (i, e) in entries.iter().take(3).enumerate() {
            println!(
                "{}) {} {} {} CR:{:.2} DR:{:.2} BAL:{:.2}",
                i + 1,
                e.txn_date,
                e.account_no,
                e.narration,
                e.amount_credited.unwrap_or(0.0),
                e.amount_debited.unwrap_or(0.0),
                e.balance
            );
        }
    }
    Ok(())
}

async fn show_payment_status(client: &TemboPlusClient, reference: &str) -> Result<()> {
    let response = client
        .payment_status(PaymentStatusRequest::by_reference(reference))
        .await?;
    println!(
        "Status: {}, TxnID: {}, Ref: {}",
        response.status_code, response.transaction_id, response.transaction_ref
    );
    Ok(())
}

fn payout_request(service_code: &str, msisdn: String, prefix: &str) -> DisbursementRequest {
    DisbursementRequest {
        country_code: COUNTRY_CODE_TZ.to_string(),
        account_no: std::env::var("TEMBOPLUS_WALLET_ACCOUNT_NO")
            .unwrap_or_else(|_| "8000837333".to_string()),
        service_code: service_code.to_string(),
        amount: 2500.0,
        msisdn,
        narration: "Payout - Order #123".to_string(),
        currency_code: CURRENCY_CODE_TZS.to_string(),
        recipient_names: "John Doe".to_string(),
        transaction_ref: generate_transaction_ref(prefix),
        transaction_date: format_transaction_date(&chrono::Utc::now()),
        callback_url: CALLBACK_URL.to_string(),
    }
}

async fn wallet_to_mobile(client: &TemboPlusClient) -> Result<()> {
    let request = payout_request(SERVICE_TZ_TIGO_B2C, format_msisdn("0715123456"), "PAYOUT");
    let response = client.disburse(request).await?;
    println!(
        "Submitted. Status: {}, TxnID: {}, Ref: {}",
        response.status_code, response.transaction_id, response.transaction_ref
    );
    Ok(())
}

async fn wallet_to_bank(client: &TemboPlusClient) -> Result<()> {
    // Bank payouts carry <BIC>:<ACCOUNT NUMBER> in the msisdn field
    let request = payout_request("", "CORUTZTZ:0150078564433".to_string(), "BANKPAY");
    let response = client.disburse_to_bank(request).await?;
    println!(
        "Submitted. Status: {}, TxnID: {}, Ref: {}",
        response.status_code, response.transaction_id, response.transaction_ref
    );
    Ok(())
}

async fn serve_webhooks(
    client: Arc<TemboPlusClient>,
    environment: temboplus::Environment,
) -> Result<()> {
    let state = api::AppState {
        client,
        environment,
    };

    let app = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/webhooks/temboplus", post(api::webhooks::receive_webhook))
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .context("PORT must be a valid number")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Webhook server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
