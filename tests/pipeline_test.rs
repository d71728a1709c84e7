use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::Connection;
use tempfile::TempDir;

use nl_viz::chart::ChartKind;
use nl_viz::config::AppConfig;
use nl_viz::llm::{LlmError, LlmManager, SqlGenerator};
use nl_viz::pipeline::{self, AskError};
use nl_viz::web::state::AppState;

struct FixedSql(&'static str);

#[async_trait]
impl SqlGenerator for FixedSql {
    async fn generate_sql(&self, _question: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

struct FailingGenerator;

#[async_trait]
impl SqlGenerator for FailingGenerator {
    async fn generate_sql(&self, _question: &str) -> Result<String, LlmError> {
        Err(LlmError::ConnectionError("model offline".to_string()))
    }
}

fn seed_database(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE retails_sales (
            Transaction_ID INT PRIMARY KEY,
            Date DATE,
            Customer_ID VARCHAR(10),
            Gender VARCHAR(10),
            Age INT,
            Product_Category VARCHAR(50),
            Quantity INT,
            Price_per_Unit DECIMAL(10, 2),
            Total_Amount DECIMAL(10, 2)
        );
        INSERT INTO retails_sales VALUES
            (1, '2023-01-01', 'CUST001', 'Male', 34, 'Electronics', 2, 50.0, 100.0),
            (2, '2023-01-02', 'CUST002', 'Female', 26, 'Clothing', 1, 30.0, 30.0),
            (3, '2023-01-03', 'CUST003', 'Male', 50, 'Electronics', 3, 25.0, 75.0);",
    )
    .unwrap();
}

fn test_state(dir: &TempDir, generator: Box<dyn SqlGenerator + Send + Sync>) -> Arc<AppState> {
    let db_path = dir.path().join("retails.db");
    seed_database(&db_path);

    let mut config = AppConfig::default();
    config.database.path = db_path.to_string_lossy().to_string();

    Arc::new(AppState::new(config, LlmManager::from_generator(generator)))
}

#[tokio::test]
async fn count_question_shows_table_but_no_chart() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        Box::new(FixedSql("```sql\nSELECT COUNT(*) FROM retails_sales;\n```")),
    );

    let outcome = pipeline::answer_question(&state, "How many records are in the table?", None)
        .await
        .unwrap();

    assert_eq!(outcome.sql, "SELECT COUNT(*) FROM retails_sales;");
    assert_eq!(outcome.result.row_count(), 1);
    assert_eq!(outcome.result.columns.len(), 1);
    assert_eq!(outcome.result.rows[0][0], serde_json::json!(3));
    // No keyword match, so the default kind applies; one column cannot be
    // drawn as a bar chart.
    assert_eq!(outcome.chart_kind, ChartKind::Bar);
    assert!(outcome.chart.is_none());
    assert!(!outcome.cache_hit);
}

#[tokio::test]
async fn trend_question_yields_a_line_chart() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        Box::new(FixedSql(
            "SELECT Date, Total_Amount FROM retails_sales ORDER BY Date;",
        )),
    );

    let outcome = pipeline::answer_question(&state, "Show sales trend over time", None)
        .await
        .unwrap();

    assert_eq!(outcome.chart_kind, ChartKind::Line);
    let figure = outcome.chart.unwrap();
    assert_eq!(figure["data"][0]["x"][0], serde_json::json!("2023-01-01"));
    assert_eq!(figure["data"][0]["y"][0], serde_json::json!(100.0));
    assert_eq!(figure["layout"]["xaxis"]["title"], serde_json::json!("Date"));
    assert_eq!(
        figure["layout"]["yaxis"]["title"],
        serde_json::json!("Total_Amount")
    );
}

#[tokio::test]
async fn second_ask_hits_the_cache() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        Box::new(FixedSql("SELECT COUNT(*) FROM retails_sales;")),
    );

    let first = pipeline::answer_question(&state, "How many records?", None)
        .await
        .unwrap();
    assert!(!first.cache_hit);

    let second = pipeline::answer_question(&state, "How many records?", None)
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.result.rows, second.result.rows);
}

#[tokio::test]
async fn cached_answer_can_be_redrawn_with_another_kind() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        Box::new(FixedSql(
            "SELECT Product_Category, SUM(Quantity) FROM retails_sales GROUP BY Product_Category;",
        )),
    );

    let auto = pipeline::answer_question(&state, "quantities sold by category", None)
        .await
        .unwrap();
    assert_eq!(auto.chart_kind, ChartKind::Bar);

    let pie = pipeline::answer_question(
        &state,
        "quantities sold by category",
        Some(ChartKind::Pie),
    )
    .await
    .unwrap();
    assert!(pie.cache_hit);
    assert_eq!(pie.chart_kind, ChartKind::Pie);
    assert_eq!(
        pie.chart.unwrap()["data"][0]["type"],
        serde_json::json!("pie")
    );
}

#[tokio::test]
async fn empty_result_still_returns_a_table() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        Box::new(FixedSql(
            "SELECT Date, Total_Amount FROM retails_sales WHERE Age > 99;",
        )),
    );

    let outcome = pipeline::answer_question(&state, "sales trend for centenarians", None)
        .await
        .unwrap();

    assert_eq!(outcome.result.columns, vec!["Date", "Total_Amount"]);
    assert!(outcome.result.is_empty());
    assert!(outcome.chart.is_none());
}

#[tokio::test]
async fn generation_failure_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, Box::new(FailingGenerator));

    let err = pipeline::answer_question(&state, "anything", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AskError::Generation(_)));
}

#[tokio::test]
async fn bad_sql_surfaces_as_execution_error() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, Box::new(FixedSql("SELECT nope FROM missing;")));

    let err = pipeline::answer_question(&state, "anything", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AskError::Execution(_)));

    // Failed questions are not cached; the next ask generates again.
    let err = pipeline::answer_question(&state, "anything", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AskError::Execution(_)));
}
