use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use fractal_farm::{
    CliController, EngineConfig, ImageFilePresenter, PixelSelection, Point, RenderParameters, Viewport,
};

/// Renders the Mandelbrot set column by column on a local worker pool.
#[derive(Parser, Debug)]
#[command(name = "fractal_farm")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Default view at 1024x768
    fractal_farm

    # 4x supersampled render of the seahorse valley
    fractal_farm --view=-0.8,0.05,0.1,0.075 --super-samples 4 -o seahorse.png

    # Zoom twice by pixel selection, then write a PPM
    fractal_farm --zoom 300,200,500,350 --zoom 40,40,120,100 -o zoomed.ppm
"#)]
struct Cli {
    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Iteration cap, clamped to 100..=5000
    #[arg(short = 'i', long, default_value_t = 1000)]
    max_iterations: u32,

    /// Samples per pixel, clamped to 1..=32
    #[arg(short = 's', long, default_value_t = 1)]
    super_samples: u32,

    /// Initial view as origin_x,origin_y,width,height
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_view)]
    view: Option<Viewport>,

    /// Pixel rectangle x1,y1,x2,y2 to zoom into after the initial render; repeatable
    #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_selection)]
    zoom: Vec<PixelSelection>,

    /// Worker threads, 0 for one per core
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Progress reporting interval in milliseconds
    #[arg(long, default_value_t = 50)]
    progress_ms: u64,

    /// Output file; .png or .ppm
    #[arg(short = 'o', long, default_value = "output/mandelbrot.png")]
    output: PathBuf,
}

fn parse_numbers<T: FromStr>(value: &str, expected: usize) -> Result<Vec<T>, String> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<T>().map_err(|_| format!("invalid number '{part}'")))
        .collect::<Result<Vec<T>, String>>()?;

    if numbers.len() != expected {
        return Err(format!("expected {expected} comma separated values, got {}", numbers.len()));
    }

    Ok(numbers)
}

fn parse_view(value: &str) -> Result<Viewport, String> {
    let v = parse_numbers::<f64>(value, 4)?;

    Viewport::new(v[0], v[1], v[2], v[3]).map_err(|err| err.to_string())
}

fn parse_selection(value: &str) -> Result<PixelSelection, String> {
    let v = parse_numbers::<i32>(value, 4)?;

    PixelSelection::from_corners(Point { x: v[0], y: v[1] }, Point { x: v[2], y: v[3] })
        .map_err(|err| err.to_string())
}

fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::new(cli.width, cli.height)
        .with_progress_interval(Duration::from_millis(cli.progress_ms));
    let params = RenderParameters::new(cli.max_iterations, cli.super_samples);

    let controller = CliController::new(ImageFilePresenter::new(), config, cli.threads)
        .context("failed to start render engine")?;

    let report = controller
        .render(cli.view.unwrap_or_default(), params)
        .context("initial render failed")?;
    if !report.is_clean() {
        warn!("columns {:?} failed to render", report.failed_columns());
    }

    for selection in cli.zoom {
        let report = controller.zoom(selection).context("zoom render failed")?;
        if !report.is_clean() {
            warn!("columns {:?} failed to render", report.failed_columns());
        }
    }

    controller
        .write(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(Cli::parse())
}
