//! Fail-silent remote error logging.

use serde::Serialize;
use tracing::{debug, warn};

/// One row for the remote `error_logs` table.
#[derive(Debug, Clone, Serialize)]
struct ErrorLogRow<'a> {
    error_message: &'a str,
    endpoint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_address: Option<&'a str>,
}

/// Remote error log writer.
///
/// Every write is best-effort: a broken log backend must never turn into a
/// user-visible failure, so errors are downgraded to a `warn!` and dropped.
#[derive(Debug, Clone)]
pub struct ErrorLogger {
    base_url: Option<String>,
    api_key: String,
    client: reqwest::Client,
}

impl ErrorLogger {
    /// Creates a logger posting to `{base_url}/rest/v1/error_logs`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url: Some(base_url),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a logger that drops everything, for deployments without a
    /// log backend.
    pub fn disabled() -> Self {
        Self {
            base_url: None,
            api_key: String::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Records an error row, swallowing any backend failure.
    pub async fn log(
        &self,
        error_message: &str,
        endpoint: &str,
        user_id: Option<&str>,
        ip_address: Option<&str>,
    ) {
        let Some(base_url) = &self.base_url else {
            return;
        };
        let row = ErrorLogRow {
            error_message,
            endpoint,
            user_id,
            ip_address,
        };

        let result = self
            .client
            .post(format!("{base_url}/rest/v1/error_logs"))
            .json(&row)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(endpoint, "Error row recorded");
            }
            Ok(response) => {
                warn!(endpoint, status = %response.status(), "Error log insert rejected");
            }
            Err(e) => {
                warn!(endpoint, error = %e, "Error log insert failed");
            }
        }
    }
}
