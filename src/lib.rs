//! SquarePad - batch letterbox resizer
//!
//! Takes every image in a folder, scales it so its longer side matches a
//! square target size, pads the shorter side with a flat gray and writes the
//! results into a fresh timestamped folder. All outputs share the same
//! dimensions, which is what dataset preparation for vision models expects.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use squarepad::ImageProcessor;
//!
//! let report = ImageProcessor::new("photos/")
//!     .output_root("datasets")
//!     .process_folder(640)?;
//!
//! println!("{} images written to {}",
//!          report.processed.len(), report.output_dir.display());
//! # Ok::<(), squarepad::SquarePadError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types
pub use config::{Config, LoggingConfig, ProcessingConfig};
pub use error::{Result, SquarePadError};
pub use processing::{
    BatchReport, FilterType, ImageProcessor, Letterbox, LetterboxPlan, Orientation,
    ProcessedImage, SourceImage, SourceScan,
};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from `RUST_LOG`, writing to stderr.
///
/// Safe to call more than once; only the first subscriber is installed.
pub fn init() -> Result<()> {
    if tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish()
    ).is_ok() {
        info!("SquarePad v{} initialized", VERSION);
    }

    log_codec_support();
    Ok(())
}

/// Initialize logging from the `[logging]` section of a configuration
pub fn init_with_config(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.logging.level)
        .map_err(|e| SquarePadError::config(
            format!("Invalid log level '{}': {}", config.logging.level, e)
        ))?;

    let installed = if config.logging.json_format {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    };

    if installed {
        info!("SquarePad v{} initialized with custom config", VERSION);
    }

    log_codec_support();
    Ok(())
}

fn log_codec_support() {
    debug!("Image format support:");
    debug!("  JPEG: {}", image::ImageFormat::Jpeg.can_write());
    debug!("  PNG: {}", image::ImageFormat::Png.can_write());
    debug!("  WebP: {}", image::ImageFormat::WebP.can_read());
}
