use crate::error::{TemboError, TemboResult};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL_SANDBOX: &str = "https://sandbox.temboplus.com";
pub const DEFAULT_BASE_URL_PRODUCTION: &str = "https://api.temboplus.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => DEFAULT_BASE_URL_SANDBOX,
            Environment::Production => DEFAULT_BASE_URL_PRODUCTION,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Sent as `x-account-id` / `x-secret-key` on every call. The secret is
/// redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub credentials: Credentials,
    /// Per-call timeout
    pub timeout: Duration,
    /// Replaces the environment host, e.g. to target a mock gateway
    pub base_url_override: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnvSettings {
    #[serde(default)]
    environment: Environment,
    account_id: String,
    secret_key: String,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(environment: Environment, credentials: Credentials) -> Self {
        Self {
            environment,
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url_override: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// Loads `TEMBOPLUS_ENVIRONMENT`, `TEMBOPLUS_ACCOUNT_ID`,
    /// `TEMBOPLUS_SECRET_KEY`, `TEMBOPLUS_TIMEOUT_SECS` and `TEMBOPLUS_BASE_URL`.
    pub fn from_env() -> TemboResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("TEMBOPLUS").try_parsing(true))
            .build()
            .map_err(|e| TemboError::config_error(format!("Failed to read environment: {}", e)))?;

        Self::from_settings(settings)
    }

    pub fn from_settings(settings: config::Config) -> TemboResult<Self> {
        let raw: EnvSettings = settings
            .try_deserialize()
            .map_err(|e| TemboError::config_error(format!("Invalid TemboPlus settings: {}", e)))?;

        let config = Self {
            environment: raw.environment,
            credentials: Credentials::new(raw.account_id, raw.secret_key),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            base_url_override: raw.base_url.filter(|url| !url.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TemboResult<()> {
        if self.credentials.account_id.trim().is_empty() {
            return Err(TemboError::config_error("account id cannot be empty"));
        }

        if self.credentials.secret_key().trim().is_empty() {
            return Err(TemboError::config_error("secret key cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(TemboError::config_error("timeout must be greater than 0"));
        }

        if let Some(url) = &self.base_url_override {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(TemboError::config_error(format!(
                    "base URL must start with http:// or https://, got {}",
                    url
                )));
            }
        }

        Ok(())
    }
}
