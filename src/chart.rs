use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual family a chart type renders into: a flat 2D canvas or a 3D scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    Canvas2d,
    Scene3d,
}

/// The six supported chart variants.
///
/// The 3D variants lift genuinely 2D data onto a z=0 plane; they are not a
/// real third dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    #[serde(rename = "3D Bar")]
    Bar3d,
    #[serde(rename = "3D Line")]
    Line3d,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Bar3d,
        ChartType::Line3d,
    ];

    pub fn family(self) -> ChartFamily {
        match self {
            ChartType::Bar | ChartType::Line | ChartType::Pie | ChartType::Scatter => {
                ChartFamily::Canvas2d
            }
            ChartType::Bar3d | ChartType::Line3d => ChartFamily::Scene3d,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Pie => "Pie",
            ChartType::Scatter => "Scatter",
            ChartType::Bar3d => "3D Bar",
            ChartType::Line3d => "3D Line",
        };
        f.write_str(tag)
    }
}

impl FromStr for ChartType {
    type Err = PipelineError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "scatter" => Ok(ChartType::Scatter),
            "3d bar" | "bar3d" => Ok(ChartType::Bar3d),
            "3d line" | "line3d" => Ok(ChartType::Line3d),
            _ => Err(PipelineError::UnsupportedChartType(tag.to_string())),
        }
    }
}

/// A saved combination of dataset reference, axis choice and chart types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub file_name: String,
    pub x_column: String,
    pub y_column: String,
    pub chart_types: Vec<ChartType>,
    pub created_at: DateTime<Utc>,
}

impl ChartSpec {
    pub fn new(
        file_name: impl Into<String>,
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        chart_types: Vec<ChartType>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            x_column: x_column.into(),
            y_column: y_column.into(),
            chart_types,
            created_at: Utc::now(),
        }
    }
}
