use std::path::PathBuf;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::error::PaymentError;

#[derive(Debug)]
pub struct PaymentConfig {
    pub creem_webhook_secret: SecretString,
    pub creem_api_key: Option<SecretString>,
    pub creem_api_url: Option<String>,
    /// Bearer token for replacing the product table. The admin route refuses
    /// every request when unset.
    pub admin_token: Option<SecretString>,
    /// JSON product table loaded at startup instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub frontend_url: String,
}

impl PaymentConfig {
    pub fn from_env() -> Result<Self, PaymentError> {
        let creem_webhook_secret = std::env::var("CREEM_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                PaymentError::Config("CREEM_WEBHOOK_SECRET environment variable must be set".into())
            })?;

        let creem_api_key = non_empty_var("CREEM_API_KEY").map(SecretString::from);
        let creem_api_url = non_empty_var("CREEM_API_URL");
        let admin_token = non_empty_var("CATALOG_ADMIN_TOKEN").map(SecretString::from);
        let catalog_path = non_empty_var("CATALOG_PATH").map(PathBuf::from);

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        HeaderValue::from_str(&frontend_url).map_err(|e| {
            PaymentError::Config(format!(
                "FRONTEND_URL '{frontend_url}' is not a valid header value: {e}"
            ))
        })?;

        Ok(Self {
            creem_webhook_secret,
            creem_api_key,
            creem_api_url,
            admin_token,
            catalog_path,
            frontend_url,
        })
    }

    /// Creem serves its sandbox from a `test-api` host.
    pub fn is_test_mode(&self) -> bool {
        self.creem_api_url
            .as_deref()
            .is_some_and(|url| url.contains("test-api"))
    }

    /// Whether enough is configured to talk to Creem at all.
    pub fn is_ready(&self) -> bool {
        self.creem_api_key.is_some() && self.creem_api_url.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
