//! edgeflow-bench: run the streaming edge pipeline on an image file.
//!
//! Decodes an image, grayscales it, streams it through the four-stage
//! pipeline, writes the binary edge map as PNG, and prints per-stage
//! diagnostics. Useful for:
//!
//! - Tuning the decision threshold against real images
//! - Exercising backpressure with synthetic consumer stall patterns
//! - Dumping every intermediate stage for visual inspection
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin edgeflow-bench -- [OPTIONS] <IMAGE_PATH> --output <PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use edgeflow_pipeline::{EdgeConfig, EdgePipeline, GrayImage, detect_edges_staged};

/// Run the streaming edge pipeline on an image and report diagnostics.
#[derive(Parser)]
#[command(name = "edgeflow-bench", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Output path for the binary edge map (PNG recommended).
    #[arg(short, long)]
    output: PathBuf,

    /// Edge decision threshold.
    #[arg(long, default_value_t = EdgeConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Stall the output consumer every Nth tick, exercising backpressure.
    ///
    /// The edge map is identical with or without stalls; only the tick
    /// counts in the diagnostics change.
    #[arg(long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(2..))]
    stall_every: Option<u64>,

    /// Directory to write every intermediate stage into (smoothed.png,
    /// magnitude.png, suppressed.png, edges.png).
    #[arg(long, value_name = "DIR")]
    stages_dir: Option<PathBuf>,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let gray = match load_grayscale(&cli.image_path) {
        Ok(img) => img,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "Image: {} ({}x{})",
        cli.image_path.display(),
        gray.width(),
        gray.height(),
    );

    let config = EdgeConfig::new(gray.width(), gray.height()).with_threshold(cli.threshold);
    let mut pipeline = match EdgePipeline::new(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let decisions = match cli.stall_every {
        Some(n) => pipeline.run_frame_with_stalls(gray.as_raw(), |tick| tick % n != 0),
        None => pipeline.run_frame(gray.as_raw()),
    };
    let decisions = match decisions {
        Ok(decisions) => decisions,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let edge_bytes: Vec<u8> = decisions
        .iter()
        .map(|&edge| if edge { 255 } else { 0 })
        .collect();
    let Some(edge_map) = GrayImage::from_raw(gray.width(), gray.height(), edge_bytes) else {
        eprintln!("Pipeline error: edge map does not match image dimensions");
        return ExitCode::FAILURE;
    };
    if let Err(e) = edge_map.save(&cli.output) {
        eprintln!("Error writing {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }
    let edge_count = decisions.iter().filter(|&&edge| edge).count();
    eprintln!(
        "Edge map written to {} ({edge_count} of {} pixels)",
        cli.output.display(),
        decisions.len(),
    );

    if let Some(ref dir) = cli.stages_dir
        && let Err(msg) = write_stage_dumps(&gray, cli.threshold, dir)
    {
        eprintln!("{msg}");
        return ExitCode::FAILURE;
    }

    let diagnostics = pipeline.diagnostics();
    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
    }

    ExitCode::SUCCESS
}

/// Decode the input image and convert it to 8-bit grayscale.
fn load_grayscale(path: &Path) -> Result<GrayImage, String> {
    let image = image::open(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    Ok(image.to_luma8())
}

/// Re-run the pipeline stage by stage and write every intermediate frame.
fn write_stage_dumps(gray: &GrayImage, threshold: u8, dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Error creating {}: {e}", dir.display()))?;

    let staged = detect_edges_staged(gray, threshold).map_err(|e| format!("Pipeline error: {e}"))?;

    // Magnitude is clamped to 255 upstream, so it fits a grayscale byte.
    let magnitude_bytes: Vec<u8> = staged
        .gradient
        .iter()
        .map(|g| u8::try_from(g.magnitude.min(255)).unwrap_or(u8::MAX))
        .collect();
    let magnitude = GrayImage::from_raw(gray.width(), gray.height(), magnitude_bytes)
        .ok_or_else(|| "Pipeline error: magnitude frame does not match image dimensions".to_owned())?;

    for (name, frame) in [
        ("smoothed.png", &staged.smoothed),
        ("magnitude.png", &magnitude),
        ("suppressed.png", &staged.suppressed),
        ("edges.png", &staged.edges),
    ] {
        let path = dir.join(name);
        frame
            .save(&path)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        eprintln!("Stage dump written to {}", path.display());
    }
    Ok(())
}
