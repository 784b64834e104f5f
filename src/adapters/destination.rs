use crate::domain::model::Record;
use crate::domain::ports::Destination;
use crate::utils::error::Result;
use duckdb::types::Value as SqlValue;
use duckdb::{params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

/// Embedded DuckDB destination. Tables are created on first write with the
/// merge key as `BIGINT PRIMARY KEY` and every other column as `VARCHAR`;
/// rows are upserted with `INSERT OR REPLACE`, so re-running an unchanged
/// extraction leaves row counts unchanged.
pub struct DuckDbDestination {
    conn: Mutex<Connection>,
}

impl DuckDbDestination {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn ensure_table(conn: &Connection, table: &str, columns: &[&str], key: &str) -> Result<()> {
        let column_defs: Vec<String> = columns
            .iter()
            .map(|column| {
                if *column == key {
                    format!("{} BIGINT PRIMARY KEY", column)
                } else {
                    format!("{} VARCHAR", column)
                }
            })
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table,
            column_defs.join(", ")
        );
        conn.execute(&sql, [])?;
        Ok(())
    }

    pub fn row_count(&self, table: &str) -> Result<i64> {
        let conn = self.conn.lock().expect("destination lock poisoned");
        let count =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }
}

impl Destination for DuckDbDestination {
    fn merge(
        &self,
        table: &str,
        columns: &[&str],
        key: &str,
        records: &[Record],
    ) -> Result<usize> {
        let conn = self.conn.lock().expect("destination lock poisoned");
        Self::ensure_table(&conn, table, columns, key)?;

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );
        let mut statement = conn.prepare(&sql)?;

        let mut written = 0;
        for record in records {
            let Some(id) = record
                .data
                .get(key)
                .and_then(|v| v.as_i64())
            else {
                tracing::warn!("Skipping {} record without usable '{}' key", table, key);
                continue;
            };

            let values: Vec<SqlValue> = columns
                .iter()
                .map(|column| {
                    if *column == key {
                        SqlValue::BigInt(id)
                    } else {
                        sql_text(record.data.get(*column))
                    }
                })
                .collect();
            statement.execute(params_from_iter(values))?;
            written += 1;
        }

        tracing::debug!("💾 {}: merged {} rows", table, written);
        Ok(written)
    }
}

/// Scalars become their text form, collections their JSON text, null stays NULL.
fn sql_text(value: Option<&Value>) -> SqlValue {
    match value {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::String(s)) => SqlValue::Text(s.clone()),
        Some(other) => SqlValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, Value)]) -> Record {
        let data: HashMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Record { data }
    }

    const COLUMNS: &[&str] = &["id", "title", "extracted_at"];

    #[test]
    fn test_merge_inserts_and_re_merge_is_idempotent() {
        let destination = DuckDbDestination::open_in_memory().unwrap();
        let records = vec![
            record(&[
                ("id", serde_json::json!(1)),
                ("title", serde_json::json!("Mug")),
                ("extracted_at", serde_json::json!("2024-01-01T00:00:00Z")),
            ]),
            record(&[
                ("id", serde_json::json!(2)),
                ("title", Value::Null),
                ("extracted_at", serde_json::json!("2024-01-01T00:00:00Z")),
            ]),
        ];

        let written = destination.merge("products", COLUMNS, "id", &records).unwrap();
        assert_eq!(written, 2);
        assert_eq!(destination.row_count("products").unwrap(), 2);

        let written = destination.merge("products", COLUMNS, "id", &records).unwrap();
        assert_eq!(written, 2);
        assert_eq!(destination.row_count("products").unwrap(), 2);
    }

    #[test]
    fn test_merge_updates_existing_row_by_key() {
        let destination = DuckDbDestination::open_in_memory().unwrap();
        let before = vec![record(&[
            ("id", serde_json::json!(1)),
            ("title", serde_json::json!("Mug")),
            ("extracted_at", serde_json::json!("2024-01-01T00:00:00Z")),
        ])];
        destination.merge("products", COLUMNS, "id", &before).unwrap();

        let after = vec![record(&[
            ("id", serde_json::json!(1)),
            ("title", serde_json::json!("Bigger Mug")),
            ("extracted_at", serde_json::json!("2024-02-01T00:00:00Z")),
        ])];
        destination.merge("products", COLUMNS, "id", &after).unwrap();

        assert_eq!(destination.row_count("products").unwrap(), 1);
        let conn = destination.conn.lock().unwrap();
        let title: String = conn
            .query_row("SELECT title FROM products WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(title, "Bigger Mug");
    }

    #[test]
    fn test_records_without_key_are_skipped() {
        let destination = DuckDbDestination::open_in_memory().unwrap();
        let records = vec![
            record(&[
                ("id", Value::Null),
                ("title", serde_json::json!("No id")),
                ("extracted_at", Value::Null),
            ]),
            record(&[
                ("id", serde_json::json!(7)),
                ("title", serde_json::json!("Kept")),
                ("extracted_at", Value::Null),
            ]),
        ];

        let written = destination.merge("products", COLUMNS, "id", &records).unwrap();
        assert_eq!(written, 1);
        assert_eq!(destination.row_count("products").unwrap(), 1);
    }

    #[test]
    fn test_numbers_and_collections_stored_as_text() {
        let destination = DuckDbDestination::open_in_memory().unwrap();
        let records = vec![record(&[
            ("id", serde_json::json!(3)),
            ("title", serde_json::json!(["a", "b"])),
            ("extracted_at", serde_json::json!(42)),
        ])];
        destination.merge("products", COLUMNS, "id", &records).unwrap();

        let conn = destination.conn.lock().unwrap();
        let (title, extracted_at): (String, String) = conn
            .query_row(
                "SELECT title, extracted_at FROM products WHERE id = 3",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(title, "[\"a\",\"b\"]");
        assert_eq!(extracted_at, "42");
    }
}
