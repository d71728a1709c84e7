pub mod executor;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// DDL for the one table this service answers questions about.
pub const RETAIL_SALES_DDL: &str = "CREATE TABLE IF NOT EXISTS retails_sales (
    Transaction_ID INT PRIMARY KEY,
    Date DATE,
    Customer_ID VARCHAR(10),
    Gender VARCHAR(10),
    Age INT,
    Product_Category VARCHAR(50),
    Quantity INT,
    Price_per_Unit DECIMAL(10, 2),
    Total_Amount DECIMAL(10, 2)
);";

#[derive(Debug)]
pub enum DbError {
    Connection(String),
    Execution(String),
    RejectedStatement(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Connection(msg) => write!(f, "Database connection error: {}", msg),
            DbError::Execution(msg) => write!(f, "SQL error: {}", msg),
            DbError::RejectedStatement(keyword) => {
                write!(f, "Statement rejected in read-only mode: {}", keyword)
            }
        }
    }
}

impl Error for DbError {}

/// Rows plus their column names, in SQL projection order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, top to bottom. Missing cells become null.
    pub fn column_values(&self, idx: usize) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(serde_json::Value::Null))
            .collect()
    }
}
