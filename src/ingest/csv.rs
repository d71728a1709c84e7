use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::RETAIL_SALES_DDL;
use crate::ingest::IngestError;

const INSERT_SQL: &str = "INSERT INTO retails_sales (
    Transaction_ID, Date, Customer_ID, Gender, Age, Product_Category, Quantity, Price_per_Unit, Total_Amount
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

/// One-shot loader: drops and recreates the table, then bulk-inserts the
/// retail CSV in fixed-size batches, one transaction per batch.
pub struct CsvLoader {
    db_path: PathBuf,
    batch_size: usize,
}

impl CsvLoader {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            batch_size: 1000,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Returns the number of rows loaded.
    pub fn load(&self, csv_path: &Path) -> Result<usize, IngestError> {
        let mut reader = csv::Reader::from_path(csv_path)
            .map_err(|e| IngestError::ParsingError(e.to_string()))?;

        let mut conn = Connection::open(&self.db_path)
            .map_err(|e| IngestError::DatabaseError(e.to_string()))?;

        conn.execute("DROP TABLE IF EXISTS retails_sales", [])
            .map_err(|e| IngestError::DatabaseError(e.to_string()))?;
        conn.execute(RETAIL_SALES_DDL, [])
            .map_err(|e| IngestError::DatabaseError(e.to_string()))?;

        let mut total = 0usize;
        let mut batch: Vec<csv::StringRecord> = Vec::with_capacity(self.batch_size);

        for record in reader.records() {
            let record = record.map_err(|e| IngestError::ParsingError(e.to_string()))?;
            batch.push(record);

            if batch.len() == self.batch_size {
                insert_batch(&mut conn, &batch)?;
                total += batch.len();
                info!("Inserted rows {} to {}", total - batch.len(), total);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            insert_batch(&mut conn, &batch)?;
            total += batch.len();
        }

        info!("Loaded {} rows into retails_sales", total);
        Ok(total)
    }
}

fn insert_batch(conn: &mut Connection, batch: &[csv::StringRecord]) -> Result<(), IngestError> {
    let tx = conn
        .transaction()
        .map_err(|e| IngestError::DatabaseError(e.to_string()))?;

    {
        let mut stmt = tx
            .prepare(INSERT_SQL)
            .map_err(|e| IngestError::DatabaseError(e.to_string()))?;

        for record in batch {
            if record.len() != 9 {
                return Err(IngestError::ParsingError(format!(
                    "Expected 9 fields, got {}",
                    record.len()
                )));
            }

            stmt.execute(params![
                field_i64(record, 0)?, // Transaction_ID
                record.get(1),         // Date
                record.get(2),         // Customer_ID
                record.get(3),         // Gender
                field_i64(record, 4)?, // Age
                record.get(5),         // Product_Category
                field_i64(record, 6)?, // Quantity
                field_f64(record, 7)?, // Price_per_Unit
                field_f64(record, 8)?, // Total_Amount
            ])
            .map_err(|e| IngestError::DatabaseError(e.to_string()))?;
        }
    }

    tx.commit()
        .map_err(|e| IngestError::DatabaseError(e.to_string()))?;
    Ok(())
}

fn field_i64(record: &csv::StringRecord, idx: usize) -> Result<i64, IngestError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.trim()
        .parse::<i64>()
        .map_err(|e| IngestError::ParsingError(format!("Column {}: '{}' ({})", idx, raw, e)))
}

fn field_f64(record: &csv::StringRecord, idx: usize) -> Result<f64, IngestError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.trim()
        .parse::<f64>()
        .map_err(|e| IngestError::ParsingError(format!("Column {}: '{}' ({})", idx, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "Transaction ID,Date,Customer ID,Gender,Age,Product Category,Quantity,Price per Unit,Total Amount\n";

    #[test]
    fn loads_rows_in_batches() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("sales.csv");
        let db_path = dir.path().join("retails.db");

        let mut content = HEADER.to_string();
        for i in 1..=5 {
            content.push_str(&format!(
                "{},2023-01-0{},CUST{:03},Male,30,Electronics,2,50.0,100.0\n",
                i, i, i
            ));
        }
        std::fs::write(&csv_path, content).unwrap();

        let loaded = CsvLoader::new(&db_path)
            .with_batch_size(2)
            .load(&csv_path)
            .unwrap();
        assert_eq!(loaded, 5);

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM retails_sales", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 5);

        let category: String = conn
            .query_row(
                "SELECT Product_Category FROM retails_sales WHERE Transaction_ID = 3",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(category, "Electronics");
    }

    #[test]
    fn reload_replaces_previous_data() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("sales.csv");
        let db_path = dir.path().join("retails.db");

        let row = "1,2023-01-01,CUST001,Female,25,Beauty,1,10.0,10.0\n";
        std::fs::write(&csv_path, format!("{}{}", HEADER, row)).unwrap();

        let loader = CsvLoader::new(&db_path);
        loader.load(&csv_path).unwrap();
        loader.load(&csv_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM retails_sales", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn short_record_is_a_parsing_error() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("sales.csv");
        let db_path = dir.path().join("retails.db");

        std::fs::write(&csv_path, "a,b\n1,2\n").unwrap();

        let err = CsvLoader::new(&db_path).load(&csv_path).unwrap_err();
        assert!(matches!(err, IngestError::ParsingError(_)));
    }
}
