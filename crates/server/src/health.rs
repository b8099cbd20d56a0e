use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use quotesearch_core::{DatasetStats, Fulfillment};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    fulfillment: Fulfillment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetCheck {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: DatasetStats,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub dataset: DatasetCheck,
    pub checked_at: String,
}

pub fn router(fulfillment: Fulfillment) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { fulfillment })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let stats = state.fulfillment.dataset().stats();
    let ready = stats.quotes > 0;

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "quotesearch-server runtime initialized".to_string(),
        },
        dataset: DatasetCheck { status: if ready { "ready" } else { "empty" }, stats },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
