// Library exports for chartdeck

pub mod adapt;
pub mod capture;
pub mod chart;
pub mod classify;
pub mod compose;
pub mod dataset;
pub mod error;
pub mod export;
pub mod parse;
pub mod registry;
pub mod render;
pub mod store;
pub mod surface;

pub use adapt::adapt;
pub use capture::{capture, capture_all, CaptureOptions, CapturedImage};
pub use chart::{ChartFamily, ChartSpec, ChartType};
pub use classify::{classify, ColumnReport};
pub use compose::{compose, document_name, plan_pages};
pub use dataset::{AxisSelection, Dataset, Record, RenderableDataset};
pub use error::PipelineError;
pub use export::{export, preview, ExportOutput};
pub use parse::{CsvParser, JsonParser, SpreadsheetParser};
pub use registry::{RenderConfig, RendererRegistry};
pub use render::{ChartBackend, PaintSignal, PlottersBackend};
