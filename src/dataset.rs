use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One spreadsheet row: column name to scalar cell value.
///
/// Cells are kept as loosely typed JSON scalars (string, number, bool, null)
/// exactly as the parser produced them; numeric interpretation happens in
/// classification and adaptation, never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record(HashMap<String, Value>);

impl Record {
    pub fn new(cells: HashMap<String, Value>) -> Self {
        Self(cells)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    /// Cell rendered as display text, or None when absent, null, or an
    /// empty string.
    pub fn text(&self, column: &str) -> Option<String> {
        match self.0.get(column) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Strict numeric reading of a cell: finite JSON numbers pass, strings
    /// must parse in full to a finite f64. Everything else (absent, null,
    /// bool, empty or partial strings) is non-numeric.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match self.0.get(column)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

/// An uploaded table: ordered records plus the ordered column list captured
/// from the first record. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(file_name: impl Into<String>, columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            file_name: file_name.into(),
            uploaded_at: Utc::now(),
            columns,
            records,
        }
    }

    /// Build a dataset from a JSON array of objects, the shape the upload
    /// endpoint hands over. Column order follows the first object.
    pub fn from_json(file_name: &str, value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("input data must be a JSON array of objects"))?;

        let first = array
            .first()
            .and_then(|v| v.as_object())
            .ok_or_else(|| anyhow!("input data array is empty or not an array of objects"))?;

        let columns: Vec<String> = first.keys().cloned().collect();

        let mut records = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("items in array must be objects"))?;
            let mut record = Record::default();
            for (key, value) in obj {
                record.insert(key.clone(), value.clone());
            }
            records.push(record);
        }

        Ok(Self::new(file_name, columns, records))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Axis choice for a chart: x may be any column, y must be numeric-eligible
/// (enforced by the adapter, not here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x_column: String,
    pub y_column: String,
}

/// The axis-projected, renderer-neutral view of a dataset. Labels and values
/// always have equal length and preserve record order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableDataset {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl RenderableDataset {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_basic() {
        let value = json!([
            {"City": "A", "Sales": 10},
            {"City": "B", "Sales": 20}
        ]);
        let dataset = Dataset::from_json("sales.xlsx", &value).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.columns().contains(&"City".to_string()));
        assert!(dataset.columns().contains(&"Sales".to_string()));
    }

    #[test]
    fn test_from_json_column_order_follows_first_object() {
        // Keys are deliberately not in alphabetical order
        let value = json!([
            {"Zone": "N", "Amount": 5},
            {"Zone": "S", "Amount": 7}
        ]);
        let dataset = Dataset::from_json("zones.xlsx", &value).unwrap();
        assert_eq!(dataset.columns(), ["Zone", "Amount"]);
    }

    #[test]
    fn test_from_json_empty_array() {
        let result = Dataset::from_json("empty.xlsx", &json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_not_an_array() {
        let result = Dataset::from_json("bad.xlsx", &json!({"a": 1}));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("array"));
    }

    #[test]
    fn test_record_numeric_string() {
        let mut record = Record::default();
        record.insert("Sales", json!("12.5"));
        assert_eq!(record.numeric("Sales"), Some(12.5));
    }

    #[test]
    fn test_record_numeric_rejects_partial_parse() {
        // "10abc" must not coerce to 10
        let mut record = Record::default();
        record.insert("Sales", json!("10abc"));
        assert_eq!(record.numeric("Sales"), None);
    }

    #[test]
    fn test_record_numeric_rejects_bool_and_null() {
        let mut record = Record::default();
        record.insert("flag", json!(true));
        record.insert("gone", Value::Null);
        assert_eq!(record.numeric("flag"), None);
        assert_eq!(record.numeric("gone"), None);
        assert_eq!(record.numeric("absent"), None);
    }

    #[test]
    fn test_record_text_empty_string_is_none() {
        let mut record = Record::default();
        record.insert("City", json!(""));
        assert_eq!(record.text("City"), None);
    }

    #[test]
    fn test_record_text_number_renders() {
        let mut record = Record::default();
        record.insert("Year", json!(2024));
        assert_eq!(record.text("Year"), Some("2024".to_string()));
    }
}
