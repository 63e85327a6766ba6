use crate::adapt::adapt;
use crate::capture::{capture_all, CaptureOptions};
use crate::chart::{ChartSpec, ChartType};
use crate::compose::{compose, document_name};
use crate::dataset::{AxisSelection, Dataset};
use crate::error::PipelineError;
use crate::registry::RendererRegistry;
use crate::render::ChartBackend;
use crate::surface::{encode_png, RenderSurface};
use anyhow::Result;
use log::info;

/// A finished export: the derived download name and the document bytes.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Run a chart spec against a dataset and produce the paginated PDF.
///
/// Classification and adaptation failures surface before any rendering is
/// attempted; a capture or compose failure aborts the remaining chart types
/// and discards everything rendered so far. The export is all-or-nothing.
pub fn export(
    dataset: &Dataset,
    spec: &ChartSpec,
    registry: &RendererRegistry,
    backend: &dyn ChartBackend,
    options: &CaptureOptions,
) -> Result<ExportOutput> {
    if spec.chart_types.is_empty() {
        return Err(PipelineError::EmptyChartSelection.into());
    }

    let data = adapt(dataset, &spec.x_column, &spec.y_column)?;
    let axes = AxisSelection {
        x_column: spec.x_column.clone(),
        y_column: spec.y_column.clone(),
    };

    info!(
        "exporting {} chart(s) for '{}' ({} vs. {})",
        spec.chart_types.len(),
        spec.file_name,
        spec.y_column,
        spec.x_column
    );
    let images = capture_all(backend, registry, &spec.chart_types, &data, &axes, options)?;
    let bytes = compose(&images)?;

    let file_name = document_name(
        &spec.file_name,
        &spec.x_column,
        &spec.y_column,
        &spec.chart_types,
    );
    info!("export finished: {file_name} ({} bytes)", bytes.len());
    Ok(ExportOutput { file_name, bytes })
}

/// Live-preview path: render one chart at 1x density straight to PNG.
/// Shares no mutable state with exports.
pub fn preview(
    dataset: &Dataset,
    chart_type: ChartType,
    x_column: &str,
    y_column: &str,
    registry: &RendererRegistry,
    backend: &dyn ChartBackend,
) -> Result<Vec<u8>> {
    let data = adapt(dataset, x_column, y_column)?;
    let axes = AxisSelection {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
    };

    let entry = registry.entry(chart_type);
    let mut surface = RenderSurface::acquire(entry.logical_size, 1);
    backend.paint(chart_type, &entry.config(&data, &axes), &data, &mut surface)?;
    let (width, height) = (surface.width(), surface.height());
    encode_png(&surface.into_pixels(), width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Record, RenderableDataset};
    use crate::registry::RenderConfig;
    use crate::render::{PaintSignal, PlottersBackend};
    use serde_json::json;
    use std::cell::Cell;

    fn sales_dataset() -> Dataset {
        let columns = vec!["City".to_string(), "Sales".to_string()];
        let records = vec![("A", 10), ("B", 20), ("C", 15)]
            .into_iter()
            .map(|(city, sales)| {
                let mut record = Record::default();
                record.insert("City", json!(city));
                record.insert("Sales", json!(sales));
                record
            })
            .collect();
        Dataset::new("sales.xlsx", columns, records)
    }

    #[test]
    fn test_export_produces_named_pdf() {
        let spec = ChartSpec::new("sales.xlsx", "City", "Sales", vec![ChartType::Bar, ChartType::Pie]);
        let output = export(
            &sales_dataset(),
            &spec,
            &RendererRegistry::builtin(),
            &PlottersBackend,
            &CaptureOptions::default(),
        )
        .unwrap();
        assert!(output.bytes.starts_with(b"%PDF"));
        assert_eq!(output.file_name, "sales.xlsx_City_vs_Sales_Bar_Pie.pdf");
    }

    #[test]
    fn test_export_empty_selection_fails() {
        let spec = ChartSpec::new("sales.xlsx", "City", "Sales", vec![]);
        let result = export(
            &sales_dataset(),
            &spec,
            &RendererRegistry::builtin(),
            &PlottersBackend,
            &CaptureOptions::default(),
        );
        assert!(matches!(
            result.unwrap_err().downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptyChartSelection)
        ));
    }

    /// Backend that records whether paint was ever reached.
    struct CountingBackend {
        painted: Cell<usize>,
    }

    impl ChartBackend for CountingBackend {
        fn paint(
            &self,
            _chart_type: ChartType,
            _config: &RenderConfig,
            _data: &RenderableDataset,
            _surface: &mut RenderSurface,
        ) -> Result<()> {
            self.painted.set(self.painted.get() + 1);
            Ok(())
        }

        fn paint_signal(&self) -> PaintSignal {
            PaintSignal::Synchronous
        }
    }

    #[test]
    fn test_export_invalid_axis_attempts_no_capture() {
        let backend = CountingBackend {
            painted: Cell::new(0),
        };
        let spec = ChartSpec::new("sales.xlsx", "Sales", "City", vec![ChartType::Bar]);
        let result = export(
            &sales_dataset(),
            &spec,
            &RendererRegistry::builtin(),
            &backend,
            &CaptureOptions::default(),
        );
        assert!(matches!(
            result.unwrap_err().downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidAxis(ref c)) if c == "City"
        ));
        assert_eq!(backend.painted.get(), 0);
    }

    #[test]
    fn test_preview_is_png() {
        let png = preview(
            &sales_dataset(),
            ChartType::Line,
            "City",
            "Sales",
            &RendererRegistry::builtin(),
            &PlottersBackend,
        )
        .unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
