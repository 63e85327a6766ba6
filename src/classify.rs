use crate::dataset::Dataset;
use crate::error::PipelineError;

/// Column sets derived from a dataset: everything selectable for the x axis,
/// and the numeric-eligible subset selectable for the y axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub all_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
}

/// Derive the column report for a dataset.
///
/// A column is numeric-eligible only when every record's value reads as a
/// finite number; a single disqualifying row removes it dataset-wide. No
/// coercion beyond standard numeric parsing. Deterministic and idempotent,
/// O(rows x columns).
pub fn classify(dataset: &Dataset) -> Result<ColumnReport, PipelineError> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let all_columns: Vec<String> = dataset.columns().to_vec();
    let numeric_columns: Vec<String> = all_columns
        .iter()
        .filter(|column| {
            dataset
                .records()
                .iter()
                .all(|record| record.numeric(column).is_some())
        })
        .cloned()
        .collect();

    Ok(ColumnReport {
        all_columns,
        numeric_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Record};
    use serde_json::json;

    fn make_dataset(columns: Vec<&str>, rows: Vec<Vec<serde_json::Value>>) -> Dataset {
        let columns: Vec<String> = columns.into_iter().map(String::from).collect();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut record = Record::default();
                for (column, value) in columns.iter().zip(row) {
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect();
        Dataset::new("test.xlsx", columns, records)
    }

    #[test]
    fn test_classify_empty_dataset() {
        let dataset = Dataset::new("empty.xlsx", vec!["a".to_string()], vec![]);
        let result = classify(&dataset);
        assert!(matches!(result, Err(PipelineError::EmptyDataset)));
    }

    #[test]
    fn test_classify_numeric_subset_of_all() {
        let dataset = make_dataset(
            vec!["City", "Sales", "Year"],
            vec![
                vec![json!("A"), json!("10"), json!(2020)],
                vec![json!("B"), json!("20"), json!(2021)],
            ],
        );
        let report = classify(&dataset).unwrap();
        assert!(report
            .numeric_columns
            .iter()
            .all(|c| report.all_columns.contains(c)));
        assert_eq!(report.numeric_columns, vec!["Sales", "Year"]);
    }

    #[test]
    fn test_classify_one_bad_row_disqualifies_column() {
        // a single non-numeric cell removes the column
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![
                vec![json!("A"), json!("10")],
                vec![json!("B"), json!("bad")],
            ],
        );
        let report = classify(&dataset).unwrap();
        assert!(report.numeric_columns.is_empty());
    }

    #[test]
    fn test_classify_missing_cell_disqualifies() {
        let columns = vec!["City".to_string(), "Sales".to_string()];
        let mut first = Record::default();
        first.insert("City", json!("A"));
        first.insert("Sales", json!(10));
        let mut second = Record::default();
        second.insert("City", json!("B"));
        // Sales absent in the second row
        let dataset = Dataset::new("gap.xlsx", columns, vec![first, second]);
        let report = classify(&dataset).unwrap();
        assert!(!report.numeric_columns.contains(&"Sales".to_string()));
    }

    #[test]
    fn test_classify_idempotent() {
        let dataset = make_dataset(
            vec!["x", "y"],
            vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]],
        );
        let first = classify(&dataset).unwrap();
        let second = classify(&dataset).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_preserves_column_order() {
        let dataset = make_dataset(
            vec!["z", "a", "m"],
            vec![vec![json!(1), json!(2), json!(3)]],
        );
        let report = classify(&dataset).unwrap();
        assert_eq!(report.all_columns, vec!["z", "a", "m"]);
        assert_eq!(report.numeric_columns, vec!["z", "a", "m"]);
    }
}
