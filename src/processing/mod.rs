//! Folder walking and per-image letterbox processing

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::config::{ProcessingConfig, DEFAULT_OUTPUT_ROOT};
use crate::error::{ErrorContext, Result, SquarePadError};

pub mod formats;
pub mod letterbox;
pub mod resize;

pub use letterbox::{Letterbox, LetterboxPlan, Orientation};
pub use resize::FilterType;

/// Timestamp layout of run folder names
pub const RUN_FOLDER_FORMAT: &str = "%Y%m%d%H%M%S";

/// A decoded image together with the file it came from.
///
/// The pixel data is released when the handle goes out of scope, whether
/// processing finished or bailed out early.
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    /// Decode the image at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = formats::decode(path)?;
        debug!(
            "Loaded {:?}: {}x{} {:?}",
            path,
            image.width(),
            image.height(),
            image.color()
        );
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

impl Drop for SourceImage {
    fn drop(&mut self) {
        trace!("Released {:?}", self.path);
    }
}

/// Regular files found in a source directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceScan {
    /// Files in name order
    pub files: Vec<PathBuf>,
    /// Entries that are not regular files
    pub skipped: usize,
}

/// Outcome of letterboxing one file
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_width: u32,
    pub original_height: u32,
    pub plan: LetterboxPlan,
    pub file_size: u64,
}

/// Outcome of a whole folder run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub target_size: u32,
    pub processed: Vec<ProcessedImage>,
    pub skipped: usize,
}

impl BatchReport {
    /// Total bytes written
    pub fn output_bytes(&self) -> u64 {
        self.processed.iter().map(|p| p.file_size).sum()
    }
}

/// Letterboxes every file of a source directory into a timestamped folder
pub struct ImageProcessor {
    source: PathBuf,
    output_root: PathBuf,
    letterbox: Letterbox,
    quality: u8,
}

impl ImageProcessor {
    /// Create a processor for `source` with default settings
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self {
            source: source.into(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            letterbox: Letterbox::new(),
            quality: 75,
        }
    }

    /// Create a processor for `source` using configured settings
    pub fn from_config<P: Into<PathBuf>>(source: P, config: &ProcessingConfig) -> Self {
        Self::new(source)
            .output_root(&config.output_root)
            .fill(config.fill)
            .filter(config.filter)
            .quality(config.quality)
    }

    /// Set the directory run folders are created in
    pub fn output_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.output_root = root.into();
        self
    }

    /// Set the padding level
    pub fn fill(mut self, fill: u8) -> Self {
        self.letterbox = self.letterbox.fill(fill);
        self
    }

    /// Set the resampling filter
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.letterbox = self.letterbox.filter(filter);
        self
    }

    /// Set the JPEG output quality
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// List the regular files a run would process
    pub fn scan(&self) -> Result<SourceScan> {
        let metadata = std::fs::metadata(&self.source)
            .with_file_context(self.source.clone())?;
        if !metadata.is_dir() {
            return Err(SquarePadError::file(
                "Source is not a directory",
                Some(self.source.clone()),
            ));
        }

        let mut scan = SourceScan::default();
        for entry in WalkDir::new(&self.source)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            // Follows symlinks, so links to files count and dangling links do not.
            if entry.path().is_file() {
                scan.files.push(entry.into_path());
            } else {
                debug!("Skipping non-file entry {:?}", entry.path());
                scan.skipped += 1;
            }
        }

        Ok(scan)
    }

    /// Letterbox every file of the source directory into `<output_root>/<now>`
    pub fn process_folder(&self, target_size: u32) -> Result<BatchReport> {
        self.process_folder_with(target_size, Local::now().naive_local(), |_| {})
    }

    /// Like [`process_folder`](Self::process_folder) with an explicit run
    /// timestamp and a callback invoked after each file.
    ///
    /// Stops at the first failing file; outputs already written stay in place.
    pub fn process_folder_with<F>(
        &self,
        target_size: u32,
        started_at: NaiveDateTime,
        on_file: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(&ProcessedImage),
    {
        check_target_size(target_size)?;
        let scan = self.scan()?;
        self.process_scan(&scan, target_size, started_at, on_file)
    }

    /// Letterbox the files of an earlier [`scan`](Self::scan) without listing
    /// the source directory again.
    pub fn process_scan<F>(
        &self,
        scan: &SourceScan,
        target_size: u32,
        started_at: NaiveDateTime,
        mut on_file: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(&ProcessedImage),
    {
        check_target_size(target_size)?;
        let output_dir = create_run_folder(&self.output_root, started_at)?;

        info!(
            "Letterboxing {} files from {:?} into {:?} at {}px",
            scan.files.len(),
            self.source,
            output_dir,
            target_size
        );

        let mut processed = Vec::with_capacity(scan.files.len());
        for path in &scan.files {
            let result = self.process_image(path, &output_dir, target_size)?;
            on_file(&result);
            processed.push(result);
        }

        info!("Wrote {} images to {:?}", processed.len(), output_dir);

        Ok(BatchReport {
            source: self.source.clone(),
            output_dir,
            target_size,
            processed,
            skipped: scan.skipped,
        })
    }

    /// Letterbox one image into `output_dir`, keeping its file name
    pub fn process_image<P, Q>(
        &self,
        image_path: P,
        output_dir: Q,
        target_size: u32,
    ) -> Result<ProcessedImage>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let image_path = image_path.as_ref();
        let source = SourceImage::open(image_path)?;
        let (original_width, original_height) = source.dimensions();

        let (output, plan) = self.letterbox
            .apply(source.image(), target_size)
            .with_file_context(image_path.to_path_buf())?;

        let output_path = formats::output_path_for(source.path(), output_dir.as_ref())?;
        let file_size = formats::save(&output, &output_path, self.quality)?;

        Ok(ProcessedImage {
            source: image_path.to_path_buf(),
            output: output_path,
            original_width,
            original_height,
            plan,
            file_size,
        })
    }
}

fn check_target_size(target_size: u32) -> Result<()> {
    if target_size == 0 {
        return Err(SquarePadError::invalid_parameters(
            "Target size must be greater than 0"
        ));
    }
    Ok(())
}

/// Folder name for a run started at `started_at`
pub fn run_folder_name(started_at: NaiveDateTime) -> String {
    started_at.format(RUN_FOLDER_FORMAT).to_string()
}

/// Create `<root>/<timestamp>`, reusing it if a run in the same second made it
pub fn create_run_folder(root: &Path, started_at: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(root).with_file_context(root.to_path_buf())?;

    let dir = root.join(run_folder_name(started_at));
    match std::fs::create_dir(&dir) {
        Ok(()) => debug!("Created output folder {:?}", dir),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            warn!("Output folder {:?} already exists", dir);
        }
        Err(e) => return Err(e).with_file_context(dir),
    }

    Ok(dir)
}
