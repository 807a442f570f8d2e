//! Route handlers and server entry point.

use adforge_core::{AdRequest, OptimizeRequest};
use adforge_credits::Operation;
use adforge_error::AdforgeResult;
use adforge_interface::HealthStatus;
use axum::{
    Router,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{info, instrument, warn};

use crate::{
    ApiError, AppState, CreditsQuery, CreditsResponse, GenerateBody, GenerateResponse,
    OptimizeBody, OptimizeResponse,
};

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate", post(generate))
        .route("/api/optimize", post(optimize))
        .route("/api/credits", get(credits))
        .with_state(state)
}

/// Binds `addr` and serves the API until the process exits.
pub async fn serve(addr: SocketAddr, state: AppState) -> AdforgeResult<()> {
    use adforge_error::{ServerError, ServerErrorKind};

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Http(format!("Failed to bind {addr}: {e}")))
    })?;
    info!("Listening on {}", addr);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| ServerError::new(ServerErrorKind::Http(format!("Server failed: {e}"))))?;
    Ok(())
}

/// Resolves the client address, preferring the proxy-forwarded one.
fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

fn referer(headers: &HeaderMap) -> Option<&str> {
    headers.get("referer").and_then(|value| value.to_str().ok())
}

/// Pre-flight balance check; skipped entirely for unmetered requests.
async fn check_balance(
    state: &AppState,
    user_id: Option<&str>,
    operation: Operation,
) -> Result<(), ApiError> {
    let (Some(ledger), Some(user_id)) = (&state.ledger, user_id) else {
        return Ok(());
    };
    let summary = ledger.summary(user_id).await?;
    ledger.ensure_affordable(summary.credits, operation)?;
    Ok(())
}

/// Debit after the provider call succeeded. A ledger failure here is logged
/// but does not claw back the copy the user already has.
async fn settle(
    state: &AppState,
    user_id: Option<&str>,
    operation: Operation,
    reference_id: Option<&str>,
) -> Option<f64> {
    let (ledger, user_id) = (state.ledger.as_ref()?, user_id?);
    match ledger.charge(user_id, operation, reference_id).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!("Post-success debit failed: {}", e);
            None
        }
    }
}

/// Liveness probe, delegating to the driver's own health check.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let meta = state.driver.metadata();
    let (status, detail) = match state.driver.health().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, json!("ok")),
        Ok(HealthStatus::Degraded { message }) => (StatusCode::OK, json!(message)),
        Ok(HealthStatus::Unhealthy { message }) => (StatusCode::SERVICE_UNAVAILABLE, json!(message)),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, json!(e.to_string()))
        }
    };
    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "unavailable" },
            "detail": detail,
            "provider": meta.provider,
            "model": meta.model,
        })),
    )
}

#[instrument(skip(state, headers, body), fields(category = %body.details.category()))]
async fn generate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let ip = client_ip(&headers, &addr);
    state
        .gate
        .admit(&ip, referer(&headers), "/api/generate")
        .await?;

    body.details
        .validate()
        .map_err(adforge_error::AdforgeError::from)?;

    let operation = if body.regeneration {
        Operation::Regeneration
    } else {
        Operation::Generation
    };
    check_balance(&state, body.user_id.as_deref(), operation).await?;

    let request = AdRequest {
        details: body.details.clone(),
        tone: body.tone,
        model: body.model.clone(),
    };
    let ad = state.driver.draft(&request).await?;

    let credits = settle(&state, body.user_id.as_deref(), operation, None).await;
    state
        .records
        .record(body.user_id.as_deref(), &body.details, &ad.ad_text);

    Ok(Json(GenerateResponse {
        ad_text: ad.ad_text,
        smart_tip: ad.smart_tip,
        credits,
    }))
}

#[instrument(skip(state, headers, body), fields(category = %body.details.category()))]
async fn optimize(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<OptimizeBody>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let ip = client_ip(&headers, &addr);
    state
        .gate
        .admit(&ip, referer(&headers), "/api/optimize")
        .await?;

    check_balance(&state, body.user_id.as_deref(), Operation::Optimization).await?;

    let request = OptimizeRequest {
        current_text: body.current_text,
        details: body.details,
        model: body.model,
    };
    let ad = state.driver.optimize(&request).await?;

    let credits = settle(
        &state,
        body.user_id.as_deref(),
        Operation::Optimization,
        None,
    )
    .await;

    Ok(Json(OptimizeResponse {
        ad_text: ad.tagged_text(),
        keywords: ad.keywords,
        credits,
    }))
}

#[instrument(skip(state, headers))]
async fn credits(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<CreditsQuery>,
) -> Result<Json<CreditsResponse>, ApiError> {
    let ip = client_ip(&headers, &addr);
    state
        .gate
        .admit(&ip, referer(&headers), "/api/credits")
        .await?;

    let Some(ledger) = &state.ledger else {
        return Err(adforge_error::AdforgeError::from(
            adforge_error::ServerError::new(adforge_error::ServerErrorKind::Configuration(
                "No credit ledger configured".to_string(),
            )),
        )
        .into());
    };
    let summary = ledger.summary(&query.user_id).await?;
    Ok(Json(summary.into()))
}
