//! PostgREST ledger client.

use adforge_error::{AdforgeResult, CreditError, CreditErrorKind};
use adforge_rate_limit::CreditCosts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::Operation;

/// A single ledger entry in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Signed credit delta; debits are negative.
    pub amount: f64,
    /// Transaction class, e.g. "usage" or "purchase".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// When the ledger recorded the entry.
    pub created_at: DateTime<Utc>,
}

/// Current balance with recent history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    /// Remaining credits.
    pub credits: f64,
    /// Recent transactions, newest first.
    #[serde(default)]
    pub history: Vec<CreditTransaction>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    new_balance: f64,
}

/// Client for the remote credit ledger.
///
/// Talks to two stored procedures: `get_user_credits_with_history` for
/// balance reads and `update_user_credits` for debits. Callers are expected
/// to charge only after the metered work has succeeded.
#[derive(Debug, Clone)]
pub struct CreditLedger {
    base_url: String,
    api_key: String,
    costs: CreditCosts,
    client: reqwest::Client,
}

impl CreditLedger {
    /// Creates a ledger client against `base_url` with the given service
    /// key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, costs: CreditCosts) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: api_key.into(),
            costs,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a ledger client from `LEDGER_URL` and `LEDGER_API_KEY`.
    pub fn from_env(costs: CreditCosts) -> AdforgeResult<Self> {
        let base_url = std::env::var("LEDGER_URL").map_err(|_| {
            CreditError::new(CreditErrorKind::Http(
                "LEDGER_URL environment variable not set".to_string(),
            ))
        })?;
        let api_key = std::env::var("LEDGER_API_KEY").map_err(|_| {
            CreditError::new(CreditErrorKind::Http(
                "LEDGER_API_KEY environment variable not set".to_string(),
            ))
        })?;
        Ok(Self::new(base_url, api_key, costs))
    }

    /// The configured operation pricing.
    pub fn costs(&self) -> &CreditCosts {
        &self.costs
    }

    async fn rpc<T: serde::de::DeserializeOwned>(
        &self,
        procedure: &str,
        args: serde_json::Value,
    ) -> Result<T, CreditError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, procedure);
        debug!(procedure, "Calling ledger procedure");

        let response = self
            .client
            .post(&url)
            .json(&args)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ledger request failed: {}", e);
                CreditError::new(CreditErrorKind::Http(format!("{procedure}: {e}")))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Ledger procedure failed: {} {}", status, message);
            return Err(CreditError::new(CreditErrorKind::Rpc(format!(
                "{procedure} returned {status}: {message}"
            ))));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to decode ledger response: {}", e);
            CreditError::new(CreditErrorKind::Decode(format!("{procedure}: {e}")))
        })
    }

    /// Fetches the user's balance and recent history.
    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: &str) -> AdforgeResult<CreditSummary> {
        if user_id.trim().is_empty() {
            return Err(CreditError::new(CreditErrorKind::NotAuthenticated).into());
        }
        let summary = self
            .rpc("get_user_credits_with_history", json!({ "p_user_id": user_id }))
            .await?;
        Ok(summary)
    }

    /// Errors with `InsufficientCredits` when the balance cannot cover
    /// `operation`.
    pub fn ensure_affordable(&self, balance: f64, operation: Operation) -> AdforgeResult<()> {
        let required = operation.cost(&self.costs);
        if balance < required {
            return Err(CreditError::new(CreditErrorKind::InsufficientCredits {
                required,
                available: balance,
            })
            .into());
        }
        Ok(())
    }

    /// Debits the user for `operation` and returns the new balance.
    ///
    /// `reference_id` ties the ledger entry back to the generated artifact.
    /// Call this only after the metered work has succeeded.
    #[instrument(skip(self), fields(cost = operation.cost(&self.costs)))]
    pub async fn charge(
        &self,
        user_id: &str,
        operation: Operation,
        reference_id: Option<&str>,
    ) -> AdforgeResult<f64> {
        if user_id.trim().is_empty() {
            return Err(CreditError::new(CreditErrorKind::NotAuthenticated).into());
        }
        let cost = operation.cost(&self.costs);
        let response: UpdateResponse = self
            .rpc(
                "update_user_credits",
                json!({
                    "p_user_id": user_id,
                    "p_amount": -cost,
                    "p_type": "usage",
                    "p_description": operation.description(),
                    "p_reference_id": reference_id,
                }),
            )
            .await?;
        debug!(new_balance = response.new_balance, "Ledger debit recorded");
        Ok(response.new_balance)
    }
}
