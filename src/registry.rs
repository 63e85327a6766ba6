use crate::chart::{ChartFamily, ChartType};
use crate::dataset::{AxisSelection, RenderableDataset};

/// Render configuration for the flat-canvas chart family.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Axis titles and tick labels; suppressed only for Pie.
    pub show_axes: bool,
    /// Per-slice labels, Pie only: `"{label}: {pct:.1}%"`.
    pub slice_labels: Option<Vec<String>>,
}

/// Scene layout for the 3D chart family. The z axis is synthesized as a
/// constant zero plane; the data itself stays two-dimensional.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub z_title: String,
    pub z_values: Vec<f64>,
}

/// The (renderConfig, dataBinding) contract produced for a chart type.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderConfig {
    Canvas2d(CanvasConfig),
    Scene3d(SceneLayout),
}

/// One registry row: family, logical surface size and config builder for a
/// chart type.
pub struct RendererEntry {
    pub chart_type: ChartType,
    pub family: ChartFamily,
    /// Logical pixels; captures rasterize at a pixel-density multiple.
    pub logical_size: (u32, u32),
    build: fn(ChartType, &RenderableDataset, &AxisSelection) -> RenderConfig,
}

impl RendererEntry {
    pub fn config(&self, data: &RenderableDataset, axes: &AxisSelection) -> RenderConfig {
        (self.build)(self.chart_type, data, axes)
    }
}

/// Read-only table mapping every chart type to its renderer entry.
/// Constructed once and passed into the pipeline.
pub struct RendererRegistry {
    entries: Vec<RendererEntry>,
}

impl RendererRegistry {
    pub fn builtin() -> Self {
        let entries = ChartType::ALL
            .iter()
            .map(|&chart_type| RendererEntry {
                chart_type,
                family: chart_type.family(),
                logical_size: logical_size(chart_type),
                build: match chart_type.family() {
                    ChartFamily::Canvas2d => build_canvas_config,
                    ChartFamily::Scene3d => build_scene_layout,
                },
            })
            .collect();
        Self { entries }
    }

    pub fn entry(&self, chart_type: ChartType) -> &RendererEntry {
        // ChartType is a closed enum and builtin() covers every variant
        self.entries
            .iter()
            .find(|e| e.chart_type == chart_type)
            .unwrap_or_else(|| unreachable!("registry covers all chart types"))
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Uniform chart title: `"{y} vs. {x} ({type})"`.
pub fn chart_title(chart_type: ChartType, axes: &AxisSelection) -> String {
    format!("{} vs. {} ({})", axes.y_column, axes.x_column, chart_type)
}

fn logical_size(chart_type: ChartType) -> (u32, u32) {
    match chart_type {
        ChartType::Pie => (300, 300),
        _ => (500, 400),
    }
}

fn build_canvas_config(
    chart_type: ChartType,
    data: &RenderableDataset,
    axes: &AxisSelection,
) -> RenderConfig {
    let is_pie = chart_type == ChartType::Pie;
    RenderConfig::Canvas2d(CanvasConfig {
        title: chart_title(chart_type, axes),
        x_title: axes.x_column.clone(),
        y_title: axes.y_column.clone(),
        show_axes: !is_pie,
        slice_labels: is_pie.then(|| slice_labels(data)),
    })
}

fn build_scene_layout(
    chart_type: ChartType,
    data: &RenderableDataset,
    axes: &AxisSelection,
) -> RenderConfig {
    RenderConfig::Scene3d(SceneLayout {
        title: chart_title(chart_type, axes),
        x_title: axes.x_column.clone(),
        y_title: axes.y_column.clone(),
        z_title: "Value".to_string(),
        z_values: vec![0.0; data.len()],
    })
}

/// Per-slice percentage labels, one decimal place.
fn slice_labels(data: &RenderableDataset) -> Vec<String> {
    let sum: f64 = data.values.iter().sum();
    data.labels
        .iter()
        .zip(&data.values)
        .map(|(label, value)| {
            let pct = if sum == 0.0 { 0.0 } else { value / sum * 100.0 };
            format!("{label}: {pct:.1}%")
        })
        .collect()
}
