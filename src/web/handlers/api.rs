use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::chart::ChartKind;
use crate::db;
use crate::pipeline::{self, AskError};
use crate::web::state::AppState;

// Query types

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub chart_type: Option<ChartKind>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub sql: String,
    pub chart_kind: ChartKind,
    pub chart: Option<serde_json::Value>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub cache_hit: bool,
}

// System status

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub cached_questions: usize,
    pub database_path: String,
}

// API Implementations

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Question must not be empty".to_string()));
    }

    info!("NL question: {}", question);

    let outcome = pipeline::answer_question(&state, question, payload.chart_type)
        .await
        .map_err(|e| {
            error!("Question failed: {}", e);
            let status = match e {
                AskError::Generation(_) => StatusCode::BAD_GATEWAY,
                AskError::Execution(_) => StatusCode::BAD_REQUEST,
                AskError::QueryTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            };
            (status, e.to_string())
        })?;

    Ok(Json(AskResponse {
        row_count: outcome.result.row_count(),
        question: outcome.question,
        sql: outcome.sql,
        chart_kind: outcome.chart_kind,
        chart: outcome.chart,
        columns: outcome.result.columns,
        rows: outcome.result.rows,
        cache_hit: outcome.cache_hit,
    }))
}

// Schema
pub async fn get_schema() -> Json<String> {
    Json(db::RETAIL_SALES_DDL.to_string())
}

// System status
pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let now = chrono::Utc::now();
    let uptime = now.signed_duration_since(state.startup_time).num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        cached_questions: state.cache.len().await,
        database_path: state.config.database.path.clone(),
    })
}
