use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::CachedAnswer;
use crate::chart::{self, ChartKind};
use crate::db::{DbError, ResultSet};
use crate::llm::sanitize::sanitize_response;
use crate::llm::LlmError;
use crate::web::state::AppState;

/// First failure wins; nothing is retried.
#[derive(Debug)]
pub enum AskError {
    Generation(LlmError),
    Execution(DbError),
    QueryTimeout(u64),
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::Generation(err) => write!(f, "Failed to generate SQL: {}", err),
            AskError::Execution(err) => write!(f, "Query execution failed: {}", err),
            AskError::QueryTimeout(secs) => {
                write!(f, "Query did not complete within {}s", secs)
            }
        }
    }
}

impl std::error::Error for AskError {}

#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub question: String,
    pub sql: String,
    pub chart_kind: ChartKind,
    pub chart: Option<serde_json::Value>,
    pub result: ResultSet,
    pub cache_hit: bool,
}

/// Answer one question end to end: cache lookup, otherwise generate →
/// sanitize → execute, then pick and render the chart.
///
/// Chart selection runs after the cache on purpose, so a cached question can
/// still be re-drawn with a different explicit kind.
pub async fn answer_question(
    state: &AppState,
    question: &str,
    requested_chart: Option<ChartKind>,
) -> Result<AskOutcome, AskError> {
    let (answer, cache_hit) = match state.cache.get(question).await {
        Some(answer) => {
            debug!("Cache hit for question: {}", question);
            (answer, true)
        }
        None => {
            let raw = state
                .llm_manager
                .generate_sql(question)
                .await
                .map_err(AskError::Generation)?;
            let sql = sanitize_response(&raw);
            info!("Generated SQL: {}", sql);

            let executor = state.executor.clone();
            let timeout_secs = state.config.database.query_timeout_secs;
            let sql_for_task = sql.clone();
            let task = tokio::task::spawn_blocking(move || executor.execute(&sql_for_task));

            let result = match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await
            {
                Err(_) => return Err(AskError::QueryTimeout(timeout_secs)),
                Ok(Err(join_err)) => {
                    return Err(AskError::Execution(DbError::Execution(join_err.to_string())))
                }
                Ok(Ok(result)) => result.map_err(AskError::Execution)?,
            };

            let answer = CachedAnswer { sql, result };
            state.cache.set(question, answer.clone()).await;
            (answer, false)
        }
    };

    let chart_kind = requested_chart.unwrap_or_else(|| chart::select_chart(question));
    let chart = chart::render(&answer.result, chart_kind);
    if chart.is_none() {
        debug!("No {} chart: result shape does not support it", chart_kind);
    }

    Ok(AskOutcome {
        question: question.to_string(),
        sql: answer.sql,
        chart_kind,
        chart,
        result: answer.result,
        cache_hit,
    })
}
