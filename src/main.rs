use anyhow::{Context, Result};
use chartdeck::capture::CaptureOptions;
use chartdeck::chart::{ChartSpec, ChartType};
use chartdeck::classify::classify;
use chartdeck::export;
use chartdeck::parse::{CsvParser, JsonParser, SpreadsheetParser};
use chartdeck::registry::RendererRegistry;
use chartdeck::render::PlottersBackend;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chartdeck")]
#[command(about = "Generate chart PDFs from spreadsheet data", long_about = None)]
struct Args {
    /// Input table: .csv, or .json holding an array of objects
    input: PathBuf,

    /// X-axis column
    #[arg(long)]
    x: Option<String>,

    /// Y-axis column; must be numeric in every row
    #[arg(long)]
    y: Option<String>,

    /// Chart types, comma separated: Bar, Line, Pie, Scatter, "3D Bar", "3D Line"
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,

    /// Output path (defaults to the derived document name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the column classification and exit
    #[arg(long)]
    columns: bool,

    /// Render one chart type to PNG instead of exporting a PDF
    #[arg(long)]
    preview: Option<String>,

    /// Settle delay for chart backends without a paint-completion signal
    #[arg(long, default_value_t = 1000)]
    settle_delay_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let parser: Box<dyn SpreadsheetParser> =
        if args.input.extension().is_some_and(|e| e == "json") {
            Box::new(JsonParser)
        } else {
            Box::new(CsvParser)
        };
    let dataset = parser.parse(&bytes, &file_name)?;

    if args.columns {
        let report = classify(&dataset)?;
        println!("columns: {}", report.all_columns.join(", "));
        println!("numeric: {}", report.numeric_columns.join(", "));
        return Ok(());
    }

    let x = args.x.context("--x is required")?;
    let y = args.y.context("--y is required")?;
    let registry = RendererRegistry::builtin();
    let backend = PlottersBackend;

    if let Some(tag) = args.preview {
        let chart_type: ChartType = tag.parse()?;
        let png = export::preview(&dataset, chart_type, &x, &y, &registry, &backend)?;
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from("preview.png"));
        fs::write(&path, &png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {} ({} bytes)", path.display(), png.len());
        return Ok(());
    }

    let chart_types = args
        .types
        .iter()
        .map(|tag| tag.parse())
        .collect::<Result<Vec<ChartType>, _>>()?;
    let spec = ChartSpec::new(file_name, x, y, chart_types);
    let options = CaptureOptions {
        settle_delay_ms: args.settle_delay_ms,
        ..CaptureOptions::default()
    };

    let output = export::export(&dataset, &spec, &registry, &backend, &options)?;
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&output.file_name));
    fs::write(&path, &output.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} ({} bytes)", path.display(), output.bytes.len());

    Ok(())
}
