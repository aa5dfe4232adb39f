//! Resampling filters

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Available resize filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    /// Nearest neighbor (fastest, lowest quality)
    Nearest,
    /// Triangle (linear interpolation)
    Triangle,
    /// Catmull-Rom cubic spline
    #[default]
    CatmullRom,
    /// Gaussian blur
    Gaussian,
    /// Lanczos with radius 3
    Lanczos3,
}

impl From<FilterType> for image::imageops::FilterType {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Triangle => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Gaussian => image::imageops::FilterType::Gaussian,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Scale `image` to exactly `width` x `height`, keeping its color type.
///
/// Returns a plain copy when the image already has the requested size.
pub fn resize_exact(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }

    trace!(
        "Resizing {}x{} -> {}x{} using {:?}",
        image.width(),
        image.height(),
        width,
        height,
        filter
    );

    image.resize_exact(width, height, filter.into())
}
