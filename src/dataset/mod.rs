//! Record collection loading and table metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Conditions, SearchModel};

/// Errors that can occur when loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Records file not found at {0}")]
    RecordsNotFound(PathBuf),

    #[error("Failed to read records file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse records file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A stored record: a flat JSON object keyed by field name.
pub type Record = serde_json::Map<String, Value>;

/// Table metadata: the collection name, primary key, searchable fields,
/// and required equality conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    /// Record collection (table) name, e.g. "products".
    pub name: String,
    /// Primary-key field name, e.g. "id".
    pub primary_key: String,
    /// Fields whose text content is searched, in search priority order.
    pub search_fields: Vec<String>,
    /// Equality conditions narrowing the searchable subset.
    #[serde(default)]
    pub conditions: Conditions,
}

impl SearchModel for TableDef {
    fn table(&self) -> &str {
        &self.name
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

/// The records.json structure holding table metadata and rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsFile {
    pub version: String,
    pub table: TableDef,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// A loaded record collection with its root path, metadata, and rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub root: PathBuf,
    pub table: TableDef,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Load a dataset from a directory containing records.json.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::RecordsNotFound` if records.json doesn't exist.
    /// Returns `DatasetError::ReadError` if the file cannot be read.
    /// Returns `DatasetError::ParseError` if the JSON is invalid.
    pub fn load(root: &Path) -> Result<Self, DatasetError> {
        let records_path = root.join("records.json");

        if !records_path.exists() {
            return Err(DatasetError::RecordsNotFound(records_path));
        }

        let contents = fs::read_to_string(&records_path)?;
        let file: RecordsFile = serde_json::from_str(&contents)?;

        Ok(Self {
            root: root.to_path_buf(),
            table: file.table,
            records: file.records,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConditionValue;
    use tempfile::TempDir;

    const RECORDS_JSON: &str = r#"{
        "version": "1",
        "table": {
            "name": "products",
            "primary_key": "id",
            "search_fields": ["name", "description"],
            "conditions": {"active": 1}
        },
        "records": [
            {"id": 1, "name": "keyboard", "description": "mechanical", "active": 1},
            {"id": 2, "name": "mouse", "description": "wireless", "active": 0}
        ]
    }"#;

    #[test]
    fn load_valid_dataset() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("records.json"), RECORDS_JSON).unwrap();

        let dataset = Dataset::load(temp_dir.path()).unwrap();
        assert_eq!(dataset.table.name, "products");
        assert_eq!(dataset.table.primary_key, "id");
        assert_eq!(dataset.table.search_fields, ["name", "description"]);
        assert_eq!(
            dataset.table.conditions["active"],
            ConditionValue::Int(1)
        );
        assert_eq!(dataset.records().len(), 2);
    }

    #[test]
    fn load_missing_records_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Dataset::load(temp_dir.path());
        assert!(matches!(result, Err(DatasetError::RecordsNotFound(_))));
    }

    #[test]
    fn load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("records.json"), "not valid json").unwrap();

        let result = Dataset::load(temp_dir.path());
        assert!(matches!(result, Err(DatasetError::ParseError(_))));
    }

    #[test]
    fn conditions_default_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("records.json"),
            r#"{
                "version": "1",
                "table": {"name": "notes", "primary_key": "id", "search_fields": ["body"]},
                "records": []
            }"#,
        )
        .unwrap();

        let dataset = Dataset::load(temp_dir.path()).unwrap();
        assert!(dataset.table.conditions.is_empty());
        assert!(dataset.records().is_empty());
    }

    #[test]
    fn table_def_implements_search_model() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("records.json"), RECORDS_JSON).unwrap();

        let dataset = Dataset::load(temp_dir.path()).unwrap();
        let model: &dyn SearchModel = &dataset.table;
        assert_eq!(model.table(), "products");
        assert_eq!(model.primary_key(), "id");
        assert_eq!(model.search_fields(), ["name", "description"]);
    }
}
