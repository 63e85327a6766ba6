use crate::dataset::{Dataset, Record};
use crate::error::PipelineError;
use serde_json::Value;

/// The spreadsheet parsing collaborator: raw file bytes in, a dataset with
/// header-derived column keys out.
pub trait SpreadsheetParser {
    fn parse(&self, bytes: &[u8], file_name: &str) -> Result<Dataset, PipelineError>;
}

fn unparsable(file_name: &str, reason: impl ToString) -> PipelineError {
    PipelineError::UnparsableFile {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    }
}

/// CSV-backed parser. Every cell stays a string; numeric interpretation is
/// the classifier's job.
#[derive(Debug, Default)]
pub struct CsvParser;

impl SpreadsheetParser for CsvParser {
    fn parse(&self, bytes: &[u8], file_name: &str) -> Result<Dataset, PipelineError> {
        let mut reader = csv::Reader::from_reader(bytes);
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| unparsable(file_name, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| unparsable(file_name, e))?;
            let mut record = Record::default();
            for (column, cell) in columns.iter().zip(row.iter()) {
                record.insert(column.clone(), Value::String(cell.to_string()));
            }
            records.push(record);
        }

        Ok(Dataset::new(file_name, columns, records))
    }
}

/// Parser for a JSON array of objects, the shape upload endpoints hand over.
#[derive(Debug, Default)]
pub struct JsonParser;

impl SpreadsheetParser for JsonParser {
    fn parse(&self, bytes: &[u8], file_name: &str) -> Result<Dataset, PipelineError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| unparsable(file_name, e))?;
        Dataset::from_json(file_name, &value).map_err(|e| unparsable(file_name, e))
    }
}
