use crate::classify::classify;
use crate::dataset::{Dataset, RenderableDataset};
use crate::error::PipelineError;

/// Project a dataset and an axis choice into the renderer-neutral
/// (labels, values) pair.
///
/// Label of row i is the x cell's text when present and non-empty, otherwise
/// the synthesized `Row {i+1}` (1-based). Values are the parsed y cells.
/// Fails with InvalidAxis when y is not numeric-eligible, before extracting
/// anything. Duplicate labels are permitted; order is preserved; pure and
/// re-entrant.
pub fn adapt(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
) -> Result<RenderableDataset, PipelineError> {
    let report = classify(dataset)?;
    if !report.numeric_columns.iter().any(|c| c == y_column) {
        return Err(PipelineError::InvalidAxis(y_column.to_string()));
    }

    let mut labels = Vec::with_capacity(dataset.len());
    let mut values = Vec::with_capacity(dataset.len());
    for (index, record) in dataset.records().iter().enumerate() {
        labels.push(
            record
                .text(x_column)
                .unwrap_or_else(|| format!("Row {}", index + 1)),
        );
        // Eligibility above guarantees this parses
        values.push(record.numeric(y_column).unwrap_or(f64::NAN));
    }

    Ok(RenderableDataset { labels, values })
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
    fn test_adapt_basic_projection() {
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![vec![json!("A"), json!(10)], vec![json!("B"), json!(20)]],
        );
        let projected = adapt(&dataset, "City", "Sales").unwrap();
        assert_eq!(projected.labels, vec!["A", "B"]);
        assert_eq!(projected.values, vec![10.0, 20.0]);
    }

    #[test]
    fn test_adapt_missing_x_synthesizes_row_label() {
        // row 2's x value is empty
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![
                vec![json!("A"), json!(1)],
                vec![json!(""), json!(2)],
                vec![json!("C"), json!(3)],
            ],
        );
        let projected = adapt(&dataset, "City", "Sales").unwrap();
        assert_eq!(projected.labels[1], "Row 2");
        assert_eq!(projected.labels, vec!["A", "Row 2", "C"]);
    }

    #[test]
    fn test_adapt_non_numeric_y_fails() {
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![vec![json!("A"), json!("10")], vec![json!("B"), json!("bad")]],
        );
        let result = adapt(&dataset, "City", "Sales");
        assert!(matches!(result, Err(PipelineError::InvalidAxis(ref c)) if c == "Sales"));
    }

    #[test]
    fn test_adapt_unknown_y_fails() {
        let dataset = make_dataset(vec!["City", "Sales"], vec![vec![json!("A"), json!(10)]]);
        assert!(adapt(&dataset, "City", "Revenue").is_err());
    }

    #[test]
    fn test_adapt_unknown_x_synthesizes_all_labels() {
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![vec![json!("A"), json!(10)], vec![json!("B"), json!(20)]],
        );
        let projected = adapt(&dataset, "Region", "Sales").unwrap();
        assert_eq!(projected.labels, vec!["Row 1", "Row 2"]);
    }

    #[test]
    fn test_adapt_lengths_match_record_count() {
        let rows: Vec<Vec<serde_json::Value>> =
            (0..17).map(|i| vec![json!(format!("r{i}")), json!(i)]).collect();
        let dataset = make_dataset(vec!["name", "value"], rows);
        let projected = adapt(&dataset, "name", "value").unwrap();
        assert_eq!(projected.labels.len(), 17);
        assert_eq!(projected.values.len(), 17);
    }

    #[test]
    fn test_adapt_duplicate_labels_permitted() {
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![vec![json!("A"), json!(10)], vec![json!("A"), json!(20)]],
        );
        let projected = adapt(&dataset, "City", "Sales").unwrap();
        assert_eq!(projected.labels, vec!["A", "A"]);
        assert_eq!(projected.values, vec![10.0, 20.0]);
    }

    #[test]
    fn test_adapt_is_pure() {
        let dataset = make_dataset(
            vec!["City", "Sales"],
            vec![vec![json!("A"), json!(10)], vec![json!("B"), json!(20)]],
        );
        let first = adapt(&dataset, "City", "Sales").unwrap();
        let second = adapt(&dataset, "City", "Sales").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_adapt_empty_dataset_fails_first() {
        let dataset = Dataset::new("empty.xlsx", vec!["a".to_string()], vec![]);
        assert!(matches!(
            adapt(&dataset, "a", "a"),
            Err(PipelineError::EmptyDataset)
        ));
    }
}
