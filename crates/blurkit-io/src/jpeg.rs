use std::path::Path;

use blurkit_image::Image;
use jpeg_encoder::{ColorType, Encoder};

use crate::error::IoError;

/// Writes the given JPEG _(rgba8)_ data to the given file path.
///
/// JPEG has no alpha channel, the alpha samples are dropped.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data.
/// - `quality` - The quality of the JPEG encoding, range from 1 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: u8,
) -> Result<(), IoError> {
    let rgb = image
        .as_slice()
        .chunks_exact(4)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect::<Vec<_>>();
    let rgb = Image::<u8, 3>::new(image.size(), rgb)?;
    write_image_jpeg_rgb8(file_path, &rgb, quality)
}

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data.
/// - `quality` - The quality of the JPEG encoding, range from 1 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgb, quality)
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let (Ok(width), Ok(height)) = (u16::try_from(image.width()), u16::try_from(image.height()))
    else {
        return Err(IoError::JpegImageTooLarge(image.width(), image.height()));
    };

    let encoder = Encoder::new_file(file_path, quality)?;
    encoder.encode(image.as_slice(), width, height, color_type)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_jpeg_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgba8.jpeg");

        let image = Image::<u8, 4>::from_size_val([16, 8].into(), 90)?;
        write_image_jpeg_rgba8(&file_path, &image, 95)?;

        assert!(file_path.exists(), "File does not exist: {:?}", file_path);
        Ok(())
    }

    #[test]
    fn write_jpeg_too_large() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("wide.jpg");

        let image = Image::<u8, 3>::from_size_val([70_000, 1].into(), 0)?;
        let res = write_image_jpeg_rgb8(&file_path, &image, 90);
        assert!(matches!(res, Err(IoError::JpegImageTooLarge(70_000, 1))));
        Ok(())
    }
}
