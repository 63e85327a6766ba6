use crate::chart::ChartType;
use thiserror::Error;

/// Errors surfaced by the data-to-visual pipeline.
///
/// Classification and adaptation errors are raised before any rendering is
/// attempted; a capture or compose failure aborts the remaining chart-type
/// loop for that export.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("y-axis column '{0}' is not numeric across all rows")]
    InvalidAxis(String),

    #[error("unsupported chart type '{0}'")]
    UnsupportedChartType(String),

    #[error("chart spec selects no chart types")]
    EmptyChartSelection,

    #[error("{chart_type} capture produced an empty {width}x{height} bitmap")]
    EmptyRender {
        chart_type: ChartType,
        width: u32,
        height: u32,
    },

    #[error("could not parse spreadsheet '{file_name}': {reason}")]
    UnparsableFile { file_name: String, reason: String },
}
