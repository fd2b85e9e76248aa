//! HTTP 介面
//!
//!   GET /competitors?appDescription=...  — 競品網域與排名關鍵字
//!   GET /health                          — 服務資訊

use crate::core::pipeline::CompetitorScan;
use crate::domain::model::ResponseEnvelope;
use crate::domain::ports::{CompetitorSource, KeywordSource};
use crate::utils::error::ScoutError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const SERVICE_TITLE: &str = "Competitor + SEO POC";
pub const SERVICE_DESCRIPTION: &str = "Returns competitor domains and their ranked keywords";

pub struct AppState<E: CompetitorSource, K: KeywordSource> {
    pub scan: Arc<CompetitorScan<E, K>>,
    pub started_at: DateTime<Utc>,
}

// derive(Clone) 會要求 E、K 也是 Clone，這裡只需要複製 Arc
impl<E: CompetitorSource, K: KeywordSource> Clone for AppState<E, K> {
    fn clone(&self) -> Self {
        Self {
            scan: Arc::clone(&self.scan),
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompetitorQuery {
    #[serde(rename = "appDescription")]
    pub app_description: String,
}

pub fn router<E, K>(scan: Arc<CompetitorScan<E, K>>) -> Router
where
    E: CompetitorSource + 'static,
    K: KeywordSource + 'static,
{
    let state = AppState {
        scan,
        started_at: Utc::now(),
    };

    Router::new()
        .route("/competitors", get(competitors_handler::<E, K>))
        .route("/health", get(health_handler::<E, K>))
        .with_state(state)
}

async fn competitors_handler<E, K>(
    State(state): State<AppState<E, K>>,
    Query(query): Query<CompetitorQuery>,
) -> Result<Json<ResponseEnvelope>, ScoutError>
where
    E: CompetitorSource + 'static,
    K: KeywordSource + 'static,
{
    let envelope = state.scan.run(&query.app_description).await?;
    Ok(Json(envelope))
}

async fn health_handler<E, K>(State(state): State<AppState<E, K>>) -> impl IntoResponse
where
    E: CompetitorSource + 'static,
    K: KeywordSource + 'static,
{
    Json(json!({
        "status": "ok",
        "service": SERVICE_TITLE,
        "description": SERVICE_DESCRIPTION,
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at,
    }))
}

impl ScoutError {
    /// 擷取階段失敗一律 502，請求錯誤 400，其餘 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScoutError::UpstreamModel { .. } | ScoutError::InvalidModelOutput { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ScoutError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
