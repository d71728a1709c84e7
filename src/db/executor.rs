use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::db::{DbError, ResultSet};

/// Runs SQL against the SQLite file, one fresh connection per call.
#[derive(Clone)]
pub struct QueryExecutor {
    db_path: PathBuf,
    read_only: bool,
}

impl QueryExecutor {
    pub fn new(db_path: impl Into<PathBuf>, read_only: bool) -> Self {
        Self {
            db_path: db_path.into(),
            read_only,
        }
    }

    /// Execute a statement as-is and fetch every row eagerly.
    ///
    /// Column names come from the statement metadata; a statement that
    /// projects no columns (DDL/DML) yields an empty ResultSet.
    pub fn execute(&self, sql: &str) -> Result<ResultSet, DbError> {
        if self.read_only && !is_read_statement(sql) {
            info!("Rejecting non-read statement: {}", first_keyword(sql));
            return Err(DbError::RejectedStatement(first_keyword(sql)));
        }

        debug!("Executing against {}: {}", self.db_path.display(), sql);

        let conn = Connection::open(&self.db_path)
            .map_err(|e| DbError::Connection(e.to_string()))?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::Execution(e.to_string()))?;

        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let column_count = columns.len();

        let mut out = Vec::new();
        let mut rows = stmt
            .query([])
            .map_err(|e| DbError::Execution(e.to_string()))?;

        while let Some(row) = rows
            .next()
            .map_err(|e| DbError::Execution(e.to_string()))?
        {
            let mut record = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row
                    .get_ref(i)
                    .map(value_to_json)
                    .unwrap_or(serde_json::Value::Null);
                record.push(value);
            }
            out.push(record);
        }

        Ok(ResultSet { columns, rows: out })
    }
}

fn is_read_statement(sql: &str) -> bool {
    let re = Regex::new(r"(?i)^\s*(select|with|explain|pragma)\b").unwrap();
    re.is_match(sql)
}

fn first_keyword(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase()
}

fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(text) => {
            serde_json::Value::String(String::from_utf8_lossy(text).into_owned())
        }
        ValueRef::Blob(blob) => serde_json::Value::String(format!("<{} byte blob>", blob.len())),
    }
}
