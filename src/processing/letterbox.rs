//! Letterbox resizing: fit an image inside a square and pad the remainder
//!
//! The longer side is scaled to the target size, the shorter side keeps the
//! original aspect ratio (rounded down) and the leftover rows or columns are
//! filled with a flat gray. Wide images are padded at the bottom, tall images
//! on the right, square images are resized directly.

use std::cmp::Ordering;

use image::{
    imageops, DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba,
};
use serde::Serialize;
use tracing::debug;

use crate::config::DEFAULT_FILL;
use crate::error::{Result, SquarePadError};
use crate::processing::resize::{resize_exact, FilterType};

/// Which side of the image drives the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Width greater than height, padded at the bottom
    Wide,
    /// Height greater than width, padded on the right
    Tall,
    /// Equal sides, no padding
    Square,
}

impl Orientation {
    /// Classify an image by comparing its sides
    pub fn of(width: u32, height: u32) -> Self {
        match width.cmp(&height) {
            Ordering::Greater => Self::Wide,
            Ordering::Less => Self::Tall,
            Ordering::Equal => Self::Square,
        }
    }
}

/// Geometry of a single letterbox operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterboxPlan {
    pub target_size: u32,
    pub orientation: Orientation,
    pub scaled_width: u32,
    pub scaled_height: u32,
}

impl LetterboxPlan {
    /// Compute the scaled size for a `width` x `height` source
    pub fn new(width: u32, height: u32, target_size: u32) -> Result<Self> {
        if target_size == 0 {
            return Err(SquarePadError::invalid_parameters(
                "Target size must be greater than 0"
            ));
        }
        if width == 0 || height == 0 {
            return Err(SquarePadError::invalid_parameters(
                format!("Cannot letterbox an empty image ({}x{})", width, height)
            ));
        }

        let ratio = f64::from(width) / f64::from(height);
        let target = f64::from(target_size);
        let orientation = Orientation::of(width, height);

        let (scaled_width, scaled_height) = match orientation {
            Orientation::Wide => (target_size, floor_dimension(target / ratio)),
            Orientation::Tall => (floor_dimension(target * ratio), target_size),
            Orientation::Square => (target_size, target_size),
        };

        Ok(Self {
            target_size,
            orientation,
            scaled_width,
            scaled_height,
        })
    }

    /// Rows added below a wide image
    pub fn bottom_padding(&self) -> u32 {
        self.target_size - self.scaled_height
    }

    /// Columns added right of a tall image
    pub fn right_padding(&self) -> u32 {
        self.target_size - self.scaled_width
    }

    /// Number of padded rows or columns, whichever applies
    pub fn padding(&self) -> u32 {
        match self.orientation {
            Orientation::Wide => self.bottom_padding(),
            Orientation::Tall => self.right_padding(),
            Orientation::Square => 0,
        }
    }
}

// Rounds down like an integer cast, but never below one pixel.
fn floor_dimension(value: f64) -> u32 {
    (value as u32).max(1)
}

/// Letterbox settings shared by every image in a batch
#[derive(Debug, Clone, Copy)]
pub struct Letterbox {
    fill: u8,
    filter: FilterType,
}

impl Letterbox {
    pub fn new() -> Self {
        Self {
            fill: DEFAULT_FILL,
            filter: FilterType::default(),
        }
    }

    /// Set the padding level (0-255, scaled for deeper channels)
    pub fn fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    /// Set the resampling filter
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn fill_level(&self) -> u8 {
        self.fill
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter
    }

    /// Resize and pad `image` into a `target_size` square
    pub fn apply(&self, image: &DynamicImage, target_size: u32) -> Result<(DynamicImage, LetterboxPlan)> {
        let plan = LetterboxPlan::new(image.width(), image.height(), target_size)?;

        debug!(
            "Letterbox {:?}: {}x{} -> {}x{} + {} padding",
            plan.orientation,
            image.width(),
            image.height(),
            plan.scaled_width,
            plan.scaled_height,
            plan.padding()
        );

        let scaled = resize_exact(image, plan.scaled_width, plan.scaled_height, self.filter);

        let output = match plan.orientation {
            Orientation::Square => scaled,
            Orientation::Wide | Orientation::Tall => {
                pad_dynamic(&scaled, plan.target_size, plan.target_size, self.fill)
            }
        };

        Ok((output, plan))
    }
}

impl Default for Letterbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Place `image` at the top-left of a `width` x `height` canvas filled with `level`.
///
/// Color channels take `level`, alpha channels are opaque. Deeper channel
/// types get `level` rescaled to their range.
pub fn pad_dynamic(image: &DynamicImage, width: u32, height: u32, level: u8) -> DynamicImage {
    let wide = u16::from(level) * 257;
    let float = f32::from(level) / 255.0;

    match image {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(pad_buffer(buf, width, height, Luma([level])))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(pad_buffer(buf, width, height, LumaA([level, u8::MAX])))
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(pad_buffer(buf, width, height, Rgb([level; 3])))
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(pad_buffer(buf, width, height, Rgba([level, level, level, u8::MAX])))
        }
        DynamicImage::ImageLuma16(buf) => {
            DynamicImage::ImageLuma16(pad_buffer(buf, width, height, Luma([wide])))
        }
        DynamicImage::ImageLumaA16(buf) => {
            DynamicImage::ImageLumaA16(pad_buffer(buf, width, height, LumaA([wide, u16::MAX])))
        }
        DynamicImage::ImageRgb16(buf) => {
            DynamicImage::ImageRgb16(pad_buffer(buf, width, height, Rgb([wide; 3])))
        }
        DynamicImage::ImageRgba16(buf) => {
            DynamicImage::ImageRgba16(pad_buffer(buf, width, height, Rgba([wide, wide, wide, u16::MAX])))
        }
        DynamicImage::ImageRgb32F(buf) => {
            DynamicImage::ImageRgb32F(pad_buffer(buf, width, height, Rgb([float; 3])))
        }
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(pad_buffer(buf, width, height, Rgba([float, float, float, 1.0])))
        }
        other => {
            let buf = other.to_rgba8();
            DynamicImage::ImageRgba8(pad_buffer(&buf, width, height, Rgba([level, level, level, u8::MAX])))
        }
    }
}

fn pad_buffer<P: Pixel>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    width: u32,
    height: u32,
    fill: P,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut canvas = ImageBuffer::from_pixel(width, height, fill);
    imageops::replace(&mut canvas, image, 0, 0);
    canvas
}
