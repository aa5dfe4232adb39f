//! SquarePad CLI - batch letterbox resizer
//!
//! Letterboxes every image in a folder into a square and writes the results
//! to a timestamped folder under the output root.

use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use squarepad::{init_with_config, BatchReport, Config, FilterType, ImageProcessor};

/// SquarePad - batch letterbox resizer
#[derive(Parser)]
#[command(
    name = "squarepad",
    version,
    about = "Fit every image in a folder into a gray-padded square",
    long_about = "SquarePad resizes each image in a folder so its longer side matches the \
                  target size, pads the shorter side with a neutral gray and writes the results \
                  into a new timestamped folder (YYYYMMDDHHMMSS) under the output root."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder of images to process
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Target square size in pixels
    #[arg(short, long, value_name = "PIXELS")]
    size: Option<u32>,

    /// Directory that receives the timestamped run folder
    #[arg(short, long, value_name = "PATH")]
    output_root: Option<PathBuf>,

    /// Padding gray level (0-255)
    #[arg(long, value_name = "LEVEL")]
    fill: Option<u8>,

    /// Resampling filter
    #[arg(long, value_enum, value_name = "FILTER")]
    filter: Option<CliFilter>,

    /// JPEG output quality (1-100)
    #[arg(short, long, value_name = "QUALITY")]
    quality: Option<u8>,

    /// Configuration file path (.toml or .yaml)
    #[arg(short, long, value_name = "FILE", env = "SQUAREPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Show what would be processed without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Config {
        /// Configuration file to validate
        file: PathBuf,
    },
    /// Generate example configuration file
    ExampleConfig {
        /// Output file path
        #[arg(short, long, default_value = "squarepad.toml")]
        output: PathBuf,
        /// Use YAML format instead of TOML
        #[arg(long)]
        yaml: bool,
    },
}

/// CLI-compatible filter enum
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<CliFilter> for FilterType {
    fn from(filter: CliFilter) -> Self {
        match filter {
            CliFilter::Nearest => FilterType::Nearest,
            CliFilter::Triangle => FilterType::Triangle,
            CliFilter::CatmullRom => FilterType::CatmullRom,
            CliFilter::Gaussian => FilterType::Gaussian,
            CliFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(command) = &cli.command {
        return handle_subcommand(command);
    }

    let config = build_config(&cli)?;
    init_with_config(&config)?;

    let Some(source) = cli.source.as_deref() else {
        bail!("A source folder is required. Run with --help for usage information");
    };

    let processor = ImageProcessor::from_config(source, &config.processing);

    if cli.dry_run {
        return dry_run(&processor, &config);
    }

    let start_time = Instant::now();
    let report = run_batch(&processor, &config, !cli.json && !cli.quiet)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report, start_time.elapsed());
    }

    Ok(())
}

/// Handle subcommands
fn handle_subcommand(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config { file } => validate_config_file(file),
        Commands::ExampleConfig { output, yaml } => generate_example_config(output, *yaml),
    }
}

/// Merge the configuration file (if any) with command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let processing = &mut config.processing;
    if let Some(size) = cli.size {
        processing.target_size = size;
    }
    if let Some(root) = &cli.output_root {
        processing.output_root = root.clone();
    }
    if let Some(fill) = cli.fill {
        processing.fill = fill;
    }
    if let Some(filter) = cli.filter {
        processing.filter = filter.into();
    }
    if let Some(quality) = cli.quality {
        processing.quality = quality;
    }

    if cli.quiet {
        config.logging.level = "error".to_string();
    } else if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Letterbox the source folder, drawing a progress bar when asked to
fn run_batch(
    processor: &ImageProcessor,
    config: &Config,
    show_progress: bool,
) -> anyhow::Result<BatchReport> {
    let target_size = config.processing.target_size;
    let scan = processor.scan()?;

    let progress = if show_progress {
        let pb = ProgressBar::new(scan.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-")
        );
        Some(pb)
    } else {
        None
    };

    info!("Source: {:?}", processor.source());
    info!("Target size: {}px", target_size);

    let result = processor.process_scan(&scan, target_size, Local::now().naive_local(), |processed| {
        if let Some(pb) = &progress {
            let name = processed.source.file_name().unwrap_or_default().to_string_lossy();
            pb.set_message(name.into_owned());
            pb.inc(1);
        }
    });

    if let Some(pb) = &progress {
        match &result {
            Ok(_) => pb.finish_with_message("done"),
            Err(_) => pb.abandon_with_message("failed"),
        }
    }

    Ok(result?)
}

/// List the files a run would process
fn dry_run(processor: &ImageProcessor, config: &Config) -> anyhow::Result<()> {
    let scan = processor.scan()?;

    println!(
        "{} files would be letterboxed to {}px under {}:",
        style(scan.files.len()).bold(),
        config.processing.target_size,
        config.processing.output_root.display()
    );
    for file in &scan.files {
        println!("  {}", file.display());
    }
    if scan.skipped > 0 {
        println!("{} non-file entries skipped", scan.skipped);
    }

    Ok(())
}

/// Validate configuration file
fn validate_config_file(file_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(file_path)?;
    config.validate()?;

    println!("{}: Configuration file is valid", style("Success").green().bold());
    println!("Target size: {}px", config.processing.target_size);
    println!("Output root: {}", config.processing.output_root.display());

    Ok(())
}

/// Generate example configuration file
fn generate_example_config(output_path: &Path, use_yaml: bool) -> anyhow::Result<()> {
    let output_path = if use_yaml {
        output_path.with_extension("yaml")
    } else {
        output_path.to_path_buf()
    };

    Config::default().to_file(&output_path)?;

    let format = if use_yaml { "YAML" } else { "TOML" };
    println!("{}: Generated example {} configuration: {}",
             style("Success").green().bold(),
             format,
             output_path.display());

    Ok(())
}

/// Print processing summary
fn print_summary(report: &BatchReport, duration: Duration) {
    println!();
    println!("{}", style("Processing Summary:").bold());
    println!("  {}: {}", style("Processed").green(), report.processed.len());
    if report.skipped > 0 {
        println!("  {}: {}", style("Skipped").yellow(), report.skipped);
    }
    println!("  {}: {}", style("Output").cyan(), report.output_dir.display());
    println!("  {}: {:.2}MB", style("Size").cyan(),
             report.output_bytes() as f64 / 1024.0 / 1024.0);
    println!("  {}: {:.2}s", style("Duration").blue(), duration.as_secs_f64());
}
