use crate::chart::ChartType;
use crate::dataset::{AxisSelection, RenderableDataset};
use crate::error::PipelineError;
use crate::registry::RendererRegistry;
use crate::render::{ChartBackend, PaintSignal};
use crate::surface::RenderSurface;
use anyhow::Result;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

fn default_settle_delay_ms() -> u64 {
    1_000
}

fn default_pixel_density() -> u32 {
    2
}

/// Knobs of the offscreen capture sequence.
///
/// The settle delay is a heuristic stand-in for a paint-completion signal;
/// backends that complete synchronously skip it. It is configurable, not a
/// correctness guarantee: a render that never stabilizes within it proceeds
/// regardless and risks an empty or blank capture.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureOptions {
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_pixel_density")]
    pub pixel_density: u32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            pixel_density: default_pixel_density(),
        }
    }
}

impl CaptureOptions {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// One rasterized chart, produced and consumed within a single export.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub chart_type: ChartType,
    /// Raw RGB8 pixels, `width_px * height_px * 3` bytes.
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Capture pipeline states. TornDown is terminal and always reached; the
/// surface itself is released by scope, independent of the exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Mounting,
    Settling,
    Capturing,
    TornDown,
}

fn transition(chart_type: ChartType, from: &mut CaptureState, to: CaptureState) {
    debug!("capture[{chart_type}]: {from:?} -> {to:?}");
    *from = to;
}

/// Render one chart type into a detached surface and rasterize it.
///
/// Mounting -> Settling -> Capturing -> TornDown. The surface is released
/// unconditionally on every exit path.
pub fn capture(
    backend: &dyn ChartBackend,
    registry: &RendererRegistry,
    chart_type: ChartType,
    data: &RenderableDataset,
    axes: &AxisSelection,
    options: &CaptureOptions,
) -> Result<CapturedImage> {
    let entry = registry.entry(chart_type);
    let mut state = CaptureState::Mounting;

    let mut surface = RenderSurface::acquire(entry.logical_size, options.pixel_density);
    let config = entry.config(data, axes);
    // Drop of the surface is the teardown; an early return still runs it,
    // and the state trace ends at TornDown on every exit path.
    if let Err(error) = backend.paint(chart_type, &config, data, &mut surface) {
        transition(chart_type, &mut state, CaptureState::TornDown);
        return Err(error);
    }

    transition(chart_type, &mut state, CaptureState::Settling);
    match backend.paint_signal() {
        PaintSignal::Synchronous => {}
        PaintSignal::Heuristic => std::thread::sleep(options.settle_delay()),
    }

    transition(chart_type, &mut state, CaptureState::Capturing);
    let (width_px, height_px) = (surface.width(), surface.height());
    if width_px == 0 || height_px == 0 {
        transition(chart_type, &mut state, CaptureState::TornDown);
        return Err(PipelineError::EmptyRender {
            chart_type,
            width: width_px,
            height: height_px,
        }
        .into());
    }
    let pixels = surface.into_pixels();

    transition(chart_type, &mut state, CaptureState::TornDown);
    Ok(CapturedImage {
        chart_type,
        pixels,
        width_px,
        height_px,
    })
}

/// Capture every chart type of an export, strictly sequentially: one live
/// surface at a time bounds peak memory and avoids renderer
/// cross-interference. The first failure aborts the remaining loop.
///
/// The gap between iterations is the natural suspension point if a
/// cancellation token is ever added.
pub fn capture_all(
    backend: &dyn ChartBackend,
    registry: &RendererRegistry,
    chart_types: &[ChartType],
    data: &RenderableDataset,
    axes: &AxisSelection,
    options: &CaptureOptions,
) -> Result<Vec<CapturedImage>> {
    let mut images = Vec::with_capacity(chart_types.len());
    for &chart_type in chart_types {
        images.push(capture(backend, registry, chart_type, data, axes, options)?);
    }
    Ok(images)
}
