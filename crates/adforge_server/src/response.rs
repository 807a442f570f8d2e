//! Response bodies and error-to-status mapping.

use adforge_credits::CreditSummary;
use adforge_error::{
    AdforgeError, AdforgeErrorKind, CreditErrorKind, GeminiErrorKind, SecurityErrorKind,
};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Body for a successful `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// Generated ad text in Markdown.
    pub ad_text: String,
    /// Advisory tip for the seller.
    pub smart_tip: String,
    /// Balance after the debit, when the request was metered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}

/// Body for a successful `POST /api/optimize`.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    /// Rewritten ad text with the trailing search-tags line.
    pub ad_text: String,
    /// Keywords woven into the rewrite.
    pub keywords: Vec<String>,
    /// Balance after the debit, when the request was metered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}

/// Body for `GET /api/credits`.
#[derive(Debug, Clone, Serialize)]
pub struct CreditsResponse {
    /// Remaining credits.
    pub credits: f64,
    /// Recent ledger entries.
    pub history: Vec<adforge_credits::CreditTransaction>,
}

impl From<CreditSummary> for CreditsResponse {
    fn from(summary: CreditSummary) -> Self {
        Self {
            credits: summary.credits,
            history: summary.history,
        }
    }
}

/// An API failure with its HTTP status and user-facing message.
///
/// The message is product copy shown directly in the client UI, hence
/// Russian. Full error details go to the log, never over the wire.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    retry_after_secs: Option<u64>,
}

impl ApiError {
    /// The mapped HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AdforgeError> for ApiError {
    fn from(err: AdforgeError) -> Self {
        tracing::error!("Request failed: {}", err);
        let (status, message, retry_after_secs) = match err.kind() {
            AdforgeErrorKind::Security(e) => match &e.kind {
                SecurityErrorKind::RefererMissing | SecurityErrorKind::RefererRejected(_) => (
                    StatusCode::FORBIDDEN,
                    "Доступ запрещен.".to_string(),
                    None,
                ),
                SecurityErrorKind::RateLimitExceeded {
                    retry_after_secs, ..
                } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Слишком много запросов. Попробуйте позже.".to_string(),
                    Some(*retry_after_secs),
                ),
                SecurityErrorKind::LoggingFailed(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Произошла ошибка. Попробуйте позже.".to_string(),
                    None,
                ),
            },
            AdforgeErrorKind::Form(e) => (StatusCode::BAD_REQUEST, e.kind.to_string(), None),
            AdforgeErrorKind::Credit(e) => match &e.kind {
                CreditErrorKind::NotAuthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "Войдите в аккаунт, чтобы продолжить.".to_string(),
                    None,
                ),
                CreditErrorKind::InsufficientCredits { .. } => (
                    StatusCode::PAYMENT_REQUIRED,
                    "Недостаточно кредитов. Пополните баланс.".to_string(),
                    None,
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Произошла ошибка. Попробуйте позже.".to_string(),
                    None,
                ),
            },
            AdforgeErrorKind::Gemini(e) => match &e.kind {
                GeminiErrorKind::HttpError { status_code, .. } if *status_code == 429 => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Превышен лимит запросов к AI. Попробуйте через минуту.".to_string(),
                    None,
                ),
                GeminiErrorKind::HttpError { status_code, .. } if *status_code == 503 => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI-сервис перегружен. Попробуйте позже.".to_string(),
                    None,
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "Не удалось сгенерировать текст. Попробуйте еще раз.".to_string(),
                    None,
                ),
            },
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Произошла ошибка. Попробуйте позже.".to_string(),
                None,
            ),
        };
        Self {
            status,
            message,
            retry_after_secs,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            retry_after_secs: self.retry_after_secs,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_error::{CreditError, FormError, FormErrorKind, GeminiError, SecurityError};

    #[test]
    fn rate_limit_maps_to_429_with_retry_hint() {
        let err: AdforgeError = SecurityError::new(SecurityErrorKind::RateLimitExceeded {
            client: "1.2.3.4".to_string(),
            limit: 10,
            window_secs: 600,
            retry_after_secs: 42,
        })
        .into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(api.retry_after_secs, Some(42));
    }

    #[test]
    fn referer_rejection_maps_to_403() {
        let err: AdforgeError =
            SecurityError::new(SecurityErrorKind::RefererMissing).into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn insufficient_credits_maps_to_402() {
        let err: AdforgeError = CreditError::new(CreditErrorKind::InsufficientCredits {
            required: 1.0,
            available: 0.5,
        })
        .into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn provider_overload_maps_to_503() {
        let err: AdforgeError = GeminiError::new(GeminiErrorKind::HttpError {
            status_code: 503,
            message: "overloaded".to_string(),
        })
        .into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn form_errors_surface_their_own_message() {
        let err: AdforgeError =
            FormError::new(FormErrorKind::MissingFields(vec!["model".to_string()])).into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert!(api.message().contains("model"));
    }
}
