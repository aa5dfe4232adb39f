//! Decoding, output naming and encoding

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::{ErrorContext, Result, SquarePadError};

/// Output path for `input` inside `output_dir`, keeping the base name
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| SquarePadError::file(
        "Path has no file name",
        Some(input.to_path_buf()),
    ))?;
    Ok(output_dir.join(name))
}

/// Decode an image, detecting the format from its content
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let image = image::io::Reader::open(path)
        .with_file_context(path.to_path_buf())?
        .with_guessed_format()
        .with_file_context(path.to_path_buf())?
        .decode()
        .with_file_context(path.to_path_buf())?;
    Ok(image)
}

/// Encode `image` to `path`, choosing the format from the extension.
///
/// JPEG output is written with `quality`; other formats use their encoder defaults.
pub fn save(image: &DynamicImage, path: &Path, quality: u8) -> Result<u64> {
    let format = ImageFormat::from_path(path).with_file_context(path.to_path_buf())?;
    debug!("Saving {:?} as {:?}", path, format);

    match format {
        ImageFormat::Jpeg => {
            let mut output = BufWriter::new(
                File::create(path).with_file_context(path.to_path_buf())?
            );
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            image.write_with_encoder(encoder)
                .with_file_context(path.to_path_buf())?;
            output.flush().with_file_context(path.to_path_buf())?;
        }
        _ => {
            image.save_with_format(path, format)
                .with_file_context(path.to_path_buf())?;
        }
    }

    let metadata = std::fs::metadata(path).with_file_context(path.to_path_buf())?;
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use tempfile::TempDir;

    #[test]
    fn test_output_path_keeps_base_name() {
        let out = output_path_for(Path::new("/photos/holiday/IMG_01.JPG"), Path::new("datasets/20240101120000")).unwrap();
        assert_eq!(out, PathBuf::from("datasets/20240101120000/IMG_01.JPG"));

        assert!(output_path_for(Path::new("/"), Path::new("out")).is_err());
    }

    #[test]
    fn test_decode_ignores_misleading_extension() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("actually_png.jpg");
        let image = ImageBuffer::from_pixel(4, 3, Rgb([9u8, 9, 9]));
        image.save_with_format(&png, ImageFormat::Png).unwrap();

        let decoded = decode(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_decode_garbage_reports_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "definitely not an image").unwrap();

        let err = decode(&path).unwrap_err();
        assert_eq!(err.file_path(), Some(&path));
        assert!(err.user_message().contains("Could not decode or encode image"));
    }

    #[test]
    fn test_save_jpeg_drops_alpha() {
        let dir = TempDir::new().unwrap();
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 8, Rgba([114u8, 114, 114, 0])));

        let jpeg = dir.path().join("transparent.jpg");
        assert!(save(&image, &jpeg, 75).unwrap() > 0);

        let reopened = image::open(&jpeg).unwrap();
        assert!(!reopened.color().has_alpha());
        assert_eq!((reopened.width(), reopened.height()), (8, 8));
    }

    #[test]
    fn test_save_jpeg_and_png() {
        let dir = TempDir::new().unwrap();
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(16, 16, Rgb([114u8, 114, 114])));

        let jpeg = dir.path().join("out.jpeg");
        assert!(save(&image, &jpeg, 90).unwrap() > 0);
        assert_eq!(image::open(&jpeg).unwrap().width(), 16);

        let png = dir.path().join("out.png");
        assert!(save(&image, &png, 90).unwrap() > 0);
        assert_eq!(image::open(&png).unwrap().to_rgb8().get_pixel(3, 3), &Rgb([114, 114, 114]));
    }

    #[test]
    fn test_save_unknown_extension_fails() {
        let dir = TempDir::new().unwrap();
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2, 2, Rgb([0u8, 0, 0])));
        assert!(save(&image, &dir.path().join("out.unknown"), 75).is_err());
    }
}
