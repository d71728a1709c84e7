use axum::extract::State;
use axum::response::Html;
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chart::ChartKind;
use crate::pipeline;
use crate::web::state::AppState;
use crate::web::templates::render_template;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
    #[serde(default)]
    pub chart_type: Option<String>,
}

// Main UI entry point
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_template(
        &state.template_env,
        "index.html",
        context! { chart_choice => "auto" },
    ))
}

// Form submission: run the question and re-render the page with results
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AskForm>,
) -> Html<String> {
    let question = form.question.trim().to_string();
    let chart_choice = form
        .chart_type
        .clone()
        .unwrap_or_else(|| "auto".to_string());

    if question.is_empty() {
        return Html(render_template(
            &state.template_env,
            "index.html",
            context! {
                error => "Please enter a question.",
                chart_choice => chart_choice,
            },
        ));
    }

    debug!("UI question: {}", question);
    let requested_chart = parse_chart_choice(form.chart_type.as_deref());

    match pipeline::answer_question(&state, &question, requested_chart).await {
        Ok(outcome) => {
            let chart_json = outcome
                .chart
                .as_ref()
                .and_then(|figure| serde_json::to_string(figure).ok());
            let row_count = outcome.result.row_count();

            Html(render_template(
                &state.template_env,
                "index.html",
                context! {
                    question => outcome.question,
                    sql => outcome.sql,
                    columns => outcome.result.columns,
                    rows => outcome.result.rows,
                    row_count => row_count,
                    chart_kind => outcome.chart_kind.label(),
                    chart_json => chart_json,
                    cache_hit => outcome.cache_hit,
                    chart_choice => chart_choice,
                },
            ))
        }
        Err(e) => {
            warn!("Question failed: {}", e);
            Html(render_template(
                &state.template_env,
                "index.html",
                context! {
                    question => question,
                    error => e.to_string(),
                    chart_choice => chart_choice,
                },
            ))
        }
    }
}

// "auto" and anything unparseable fall back to keyword selection
fn parse_chart_choice(choice: Option<&str>) -> Option<ChartKind> {
    match choice {
        None | Some("auto") | Some("") => None,
        Some(other) => ChartKind::from_str(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_and_garbage_defer_to_keyword_selection() {
        assert_eq!(parse_chart_choice(None), None);
        assert_eq!(parse_chart_choice(Some("auto")), None);
        assert_eq!(parse_chart_choice(Some("")), None);
        assert_eq!(parse_chart_choice(Some("treemap")), None);
    }

    #[test]
    fn explicit_kinds_parse() {
        assert_eq!(parse_chart_choice(Some("pie")), Some(ChartKind::Pie));
        assert_eq!(parse_chart_choice(Some("histogram")), Some(ChartKind::Histogram));
    }
}
