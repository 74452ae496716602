use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use shapebake::config::{FileConfig, OutputFormat};
use shapebake::decompose::DecomposeOptions;
use shapebake::decompose::refine::DEFAULT_MAX_FLIPS;
use shapebake::document::parse_document;
use shapebake::level::pipeline::DEFAULT_REFINEMENT;
use shapebake::level::{PipelineOptions, process_level, write_json, write_lua};
use shapebake::logging::{init_logger, level_for_verbosity};

/// Bake authored vector shapes into convex polygon level data
///
/// Examples:
///   # Bake a level with default settings (writes path.lua)
///   shapebake level.json
///
///   # Coarser curves, JSON output
///   shapebake level.json --refinement 30 --format json -o level.out.json
///
///   # Outlines only, no convex decomposition
///   shapebake level.json --no-convex
///
///   # Use a config file
///   shapebake --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "shapebake")]
#[command(version, about, long_about = None)]
struct Args {
    /// Shape document (JSON)
    input: Option<PathBuf>,

    /// Path to config file (optional, auto-searches shapebake.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output level file path (defaults to path.lua or path.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, default_value = "lua")]
    format: OutputFormat,

    /// Distance between consecutive points on a curve, in canvas units
    #[arg(short = 'r', long, default_value = "18.0")]
    refinement: f64,

    /// Emit simplified outlines without convex parts
    #[arg(long)]
    no_convex: bool,

    /// Skip edge-flip refinement before merging
    #[arg(long)]
    no_refine: bool,

    /// Flip budget per shape before refinement gives up
    #[arg(long, default_value = "10000")]
    max_flips: usize,

    /// Fail on the first shape that cannot be baked
    #[arg(long)]
    strict: bool,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            Some(FileConfig::from_path(config_path)?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };
    let defaults = FileConfig::default();
    let file = file_config.as_ref().unwrap_or(&defaults);

    let verbose = if args.verbose > 0 {
        args.verbose
    } else {
        u8::from(file.verbose)
    };
    init_logger(level_for_verbosity(verbose));

    let input = args
        .input
        .clone()
        .or_else(|| file.input.clone())
        .context("No shape document given (pass a path or set `input` in the config file)")?;
    let format = if args.format != OutputFormat::Lua {
        args.format
    } else {
        file.format
    };
    let refinement = if (args.refinement - DEFAULT_REFINEMENT).abs() > 1e-9 {
        args.refinement
    } else {
        file.refinement
    };
    let max_flips = if args.max_flips != DEFAULT_MAX_FLIPS {
        args.max_flips
    } else {
        file.max_flips
    };
    let options = PipelineOptions {
        refinement,
        convex: !args.no_convex && file.convex,
        decompose: DecomposeOptions {
            refine_triangles: !args.no_refine && file.refine_triangles,
            max_flips,
        },
    };
    let strict = args.strict || file.strict;
    let output_path = args
        .output
        .clone()
        .or_else(|| file.output.clone())
        .unwrap_or_else(|| PathBuf::from(format!("path.{}", format.extension())));

    if !(options.refinement.is_finite() && options.refinement > 0.0) {
        bail!("--refinement must be positive, got {}", options.refinement);
    }

    println!("shapebake - Convex Level Baker");
    println!("==============================");
    println!();

    if verbose > 0 {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Refinement: {}", options.refinement);
        println!(
            "  Convex decomposition: {}",
            if options.convex { "enabled" } else { "disabled" }
        );
        println!(
            "  Edge-flip refinement: {}",
            if options.decompose.refine_triangles {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("  Max flips: {}", options.decompose.max_flips);
        println!("  Strict: {}", strict);
        println!("  Format: {:?}", format);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Reading shape document...");
    let start = Instant::now();
    let contents = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read shape document: {}", input.display()))?;
    let level = parse_document(&contents)
        .with_context(|| format!("Failed to load shape document: {}", input.display()))?;
    spinner.finish_with_message(format!(
        "Read {} shapes in {} layers ({}x{}) [{:.1}s]",
        level.shape_count(),
        level.layers.len(),
        level.width,
        level.height,
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Baking shapes...");
    let start = Instant::now();
    let report = process_level(&level, &options);
    spinner.finish_with_message(format!(
        "Baked {} objects, {} convex parts, {} flips [{:.1}s]",
        report.level.object_count(),
        report.level.part_count(),
        report.flips,
        start.elapsed().as_secs_f32()
    ));

    if !report.failures.is_empty() {
        if strict {
            let first = &report.failures[0];
            bail!(
                "{} shapes failed to bake (strict mode); first: {}",
                report.failures.len(),
                first
            );
        }
        println!("Skipped {} shapes:", report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
    if verbose > 0 {
        for layer in &report.level.layers {
            println!("  Layer '{}': {} objects", layer.name, layer.objects.len());
        }
        for warning in &report.warnings {
            println!("  Warning: {}", warning);
        }
    }

    let spinner = create_spinner("Writing level file...");
    let start = Instant::now();
    match format {
        OutputFormat::Lua => write_lua(&output_path, &report.level),
        OutputFormat::Json => write_json(&output_path, &report.level),
    }
    .context("Failed to write level file")?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        output_path.display(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
