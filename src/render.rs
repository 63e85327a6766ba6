use crate::chart::ChartType;
use crate::dataset::RenderableDataset;
use crate::registry::{CanvasConfig, RenderConfig, SceneLayout};
use crate::surface::RenderSurface;
use anyhow::{Context, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::ops::Range;

/// Series fill, #68BBE3.
const FILL: RGBColor = RGBColor(104, 187, 227);
/// Series stroke, #0E86D4.
const STROKE: RGBColor = RGBColor(14, 134, 212);

/// How a backend reports paint completion. A synchronous backend is done
/// when `paint` returns; a heuristic backend needs the settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintSignal {
    Synchronous,
    Heuristic,
}

/// The chart drawing capability: given a registry config and a renderable
/// dataset, produce a visual on a render surface.
pub trait ChartBackend {
    fn paint(
        &self,
        chart_type: ChartType,
        config: &RenderConfig,
        data: &RenderableDataset,
        surface: &mut RenderSurface,
    ) -> Result<()>;

    /// No reliable paint-completion signal is assumed by default; backends
    /// that finish synchronously can say so and skip the settle delay.
    fn paint_signal(&self) -> PaintSignal {
        PaintSignal::Heuristic
    }
}

/// Built-in plotters bitmap backend for all six chart families.
#[derive(Debug, Default)]
pub struct PlottersBackend;

impl ChartBackend for PlottersBackend {
    fn paint(
        &self,
        chart_type: ChartType,
        config: &RenderConfig,
        data: &RenderableDataset,
        surface: &mut RenderSurface,
    ) -> Result<()> {
        if data.is_empty() {
            anyhow::bail!("cannot render chart with no data points");
        }
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            // Nothing to draw into; the capture pipeline flags this
            return Ok(());
        }

        let root = BitMapBackend::with_buffer(surface.buffer_mut(), (width, height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        match (chart_type, config) {
            (ChartType::Bar, RenderConfig::Canvas2d(c)) => draw_bar(&root, c, data)?,
            (ChartType::Line, RenderConfig::Canvas2d(c)) => draw_line(&root, c, data)?,
            (ChartType::Scatter, RenderConfig::Canvas2d(c)) => draw_scatter(&root, c, data)?,
            (ChartType::Pie, RenderConfig::Canvas2d(c)) => {
                draw_pie(&root, c, data, (width, height))?
            }
            (ChartType::Bar3d, RenderConfig::Scene3d(l)) => {
                draw_scene(&root, l, data, true)?
            }
            (ChartType::Line3d, RenderConfig::Scene3d(l)) => {
                draw_scene(&root, l, data, false)?
            }
            _ => anyhow::bail!("config family does not match chart type {chart_type}"),
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    fn paint_signal(&self) -> PaintSignal {
        PaintSignal::Synchronous
    }
}

/// Data range with 5% padding; a degenerate range widens by one unit each
/// side. Bars additionally anchor the range at zero.
fn padded_range(values: &[f64], include_zero: bool) -> Range<f64> {
    let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

fn draw_bar(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &CanvasConfig,
    data: &RenderableDataset,
) -> Result<()> {
    let n = data.len();
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&config.title, ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..(n as f64), padded_range(&data.values, true))
        .context("Failed to build chart")?;

    configure_category_mesh(&mut chart, config, &data.labels)?;

    for (index, &value) in data.values.iter().enumerate() {
        let x_center = index as f64 + 0.5;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x_center - 0.4, 0.0), (x_center + 0.4, value)],
                FILL.mix(0.5).filled(),
            )))
            .context("Failed to draw bar")?;
    }
    Ok(())
}

fn draw_line(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &CanvasConfig,
    data: &RenderableDataset,
) -> Result<()> {
    let n = data.len();
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&config.title, ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..(n as f64), padded_range(&data.values, false))
        .context("Failed to build chart")?;

    configure_category_mesh(&mut chart, config, &data.labels)?;

    let points: Vec<(f64, f64)> = data
        .values
        .iter()
        .enumerate()
        .map(|(index, &value)| (index as f64 + 0.5, value))
        .collect();
    chart
        .draw_series(LineSeries::new(points, STROKE.stroke_width(2)))
        .context("Failed to draw line series")?;
    Ok(())
}

fn draw_scatter(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &CanvasConfig,
    data: &RenderableDataset,
) -> Result<()> {
    let n = data.len();
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&config.title, ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..(n as f64), padded_range(&data.values, false))
        .context("Failed to build chart")?;

    configure_category_mesh(&mut chart, config, &data.labels)?;

    chart
        .draw_series(data.values.iter().enumerate().map(|(index, &value)| {
            Circle::new((index as f64 + 0.5, value), 5, STROKE.filled())
        }))
        .context("Failed to draw point series")?;
    Ok(())
}

/// Mesh with category labels on the x axis and the axis titles from the
/// config; the adapter guarantees one label per record.
fn configure_category_mesh(
    chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    config: &CanvasConfig,
    labels: &[String],
) -> Result<()> {
    let labels = labels.to_vec();
    let formatter = |x: &f64| {
        let index = *x as usize;
        if index < labels.len() {
            labels[index].clone()
        } else {
            String::new()
        }
    };
    let mut mesh = chart.configure_mesh();
    mesh.x_labels(labels.len()).x_label_formatter(&formatter);
    if config.show_axes {
        mesh.x_desc(config.x_title.as_str())
            .y_desc(config.y_title.as_str());
    }
    mesh.draw().context("Failed to draw mesh")?;
    Ok(())
}

fn draw_pie(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &CanvasConfig,
    data: &RenderableDataset,
    (width, height): (u32, u32),
) -> Result<()> {
    let total: f64 = data.values.iter().sum();
    if total <= 0.0 {
        anyhow::bail!("pie chart requires a positive value total");
    }

    let centered = |size: i32| {
        TextStyle::from(("sans-serif", size).into_font()).pos(Pos::new(HPos::Center, VPos::Top))
    };
    root.draw(&Text::new(
        config.title.clone(),
        ((width / 2) as i32, 10),
        centered(28),
    ))
    .context("Failed to draw title")?;

    let center = ((width / 2) as f64, (height / 2) as f64 + 14.0);
    let radius = (width.min(height) as f64) / 2.0 * 0.72;
    let slice_labels = config.slice_labels.as_deref().unwrap_or(&[]);

    let mut start_angle = -PI / 2.0;
    for (index, &value) in data.values.iter().enumerate() {
        let sweep = value / total * 2.0 * PI;
        let end_angle = start_angle + sweep;

        // Sector approximated as a fan of short arc segments
        let steps = ((sweep / (PI / 90.0)).ceil() as usize).max(2);
        let mut points = vec![(center.0 as i32, center.1 as i32)];
        for step in 0..=steps {
            let angle = start_angle + sweep * (step as f64 / steps as f64);
            points.push((
                (center.0 + radius * angle.cos()) as i32,
                (center.1 + radius * angle.sin()) as i32,
            ));
        }
        let color = Palette99::pick(index).to_rgba();
        root.draw(&Polygon::new(points, color.filled()))
            .context("Failed to draw pie slice")?;

        if let Some(label) = slice_labels.get(index) {
            let mid_angle = (start_angle + end_angle) / 2.0;
            let label_pos = (
                (center.0 + radius * 0.62 * mid_angle.cos()) as i32,
                (center.1 + radius * 0.62 * mid_angle.sin()) as i32,
            );
            root.draw(&Text::new(label.clone(), label_pos, centered(18)))
                .context("Failed to draw slice label")?;
        }

        start_angle = end_angle;
    }
    Ok(())
}

/// The 3D scenes plot the same (label, value) series on the z=0 plane; the
/// zero z values come from the scene layout.
fn draw_scene(
    root: &DrawingArea<BitMapBackend, Shift>,
    layout: &SceneLayout,
    data: &RenderableDataset,
    bars: bool,
) -> Result<()> {
    let n = data.len();
    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .caption(&layout.title, ("sans-serif", 28))
        .build_cartesian_3d(
            0.0..(n as f64),
            padded_range(&data.values, bars),
            -1.0..1.0,
        )
        .context("Failed to build 3D chart")?;

    chart.with_projection(|mut pb| {
        pb.pitch = 0.25;
        pb.yaw = 0.6;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    let labels = data.labels.clone();
    let formatter = |x: &f64| {
        let index = *x as usize;
        if index < labels.len() {
            labels[index].clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_axes()
        .x_labels(n.min(10))
        .x_formatter(&formatter)
        .draw()
        .context("Failed to draw 3D axes")?;

    if bars {
        chart
            .draw_series(data.values.iter().enumerate().map(|(index, &value)| {
                let z = layout.z_values.get(index).copied().unwrap_or(0.0);
                Cubiod::new(
                    [
                        (index as f64 + 0.15, 0.0, z - 0.35),
                        (index as f64 + 0.85, value, z + 0.35),
                    ],
                    FILL.mix(0.5),
                    STROKE,
                )
            }))
            .context("Failed to draw 3D bars")?;
    } else {
        let points: Vec<(f64, f64, f64)> = data
            .values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let z = layout.z_values.get(index).copied().unwrap_or(0.0);
                (index as f64 + 0.5, value, z)
            })
            .collect();
        chart
            .draw_series(LineSeries::new(points.clone(), STROKE.stroke_width(2)))
            .context("Failed to draw 3D line")?;
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 5, STROKE.filled())),
            )
            .context("Failed to draw 3D markers")?;
    }

    // Axis naming for the scene, rendered as a footer line
    let footer = format!(
        "x: {}   y: {}   z: {}",
        layout.x_title, layout.y_title, layout.z_title
    );
    root.draw(&Text::new(
        footer,
        (12, root.dim_in_pixel().1 as i32 - 24),
        ("sans-serif", 16),
    ))
    .context("Failed to draw scene footer")?;
    Ok(())
}
