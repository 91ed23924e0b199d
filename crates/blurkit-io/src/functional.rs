use std::path::Path;

use blurkit_image::{Image, ImageSize};

use crate::{error::IoError, jpeg, png};

/// The encodings an image can be written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG, without alpha.
    Jpeg,
}

impl ImageFormat {
    /// Guess the format from the extension of a path, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// use blurkit_io::functional::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_path("a/b.PNG").unwrap(), ImageFormat::Png);
    /// assert_eq!(ImageFormat::from_path("b.jpeg").unwrap(), ImageFormat::Jpeg);
    /// assert!(ImageFormat::from_path("b.gif").is_err());
    /// ```
    pub fn from_path(file_path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file_path = file_path.as_ref();
        let ext = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(ImageFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(ImageFormat::Jpeg),
            _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
        }
    }
}

/// A decoded image, widened to four channels.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedImage {
    /// 8-bit RGBA image.
    Rgba8(Image<u8, 4>),
    /// 16-bit RGBA image.
    Rgba16(Image<u16, 4>),
}

impl DecodedImage {
    /// The size of the image.
    pub fn size(&self) -> ImageSize {
        match self {
            DecodedImage::Rgba8(img) => img.size(),
            DecodedImage::Rgba16(img) => img.size(),
        }
    }

    /// Whether the samples were decoded with 16 bits.
    pub fn is_16bit(&self) -> bool {
        matches!(self, DecodedImage::Rgba16(_))
    }
}

fn decode_image(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {:?} as {:?} ({}x{})",
        file_path,
        img.color(),
        img.width(),
        img.height()
    );

    Ok(img)
}

fn image_size(img: &image::DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate. Grayscale and
/// RGB sources are widened to RGBA, samples deeper than 8 bits are kept as 16-bit.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DecodedImage, IoError> {
    let img = decode_image(file_path.as_ref())?;
    let size = image_size(&img);

    let image = match img.color() {
        image::ColorType::L16
        | image::ColorType::La16
        | image::ColorType::Rgb16
        | image::ColorType::Rgba16
        | image::ColorType::Rgb32F
        | image::ColorType::Rgba32F => {
            DecodedImage::Rgba16(Image::<u16, 4>::new(size, img.into_rgba16().into_raw())?)
        }
        _ => DecodedImage::Rgba8(Image::<u8, 4>::new(size, img.into_rgba8().into_raw())?),
    };

    Ok(image)
}

/// Reads an image from the given file path as 8-bit RGBA.
///
/// Deeper samples are reduced to 8 bits by the image crate.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let img = decode_image(file_path.as_ref())?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_rgba8().into_raw())?)
}

/// Writes an 8-bit RGBA image, picking the encoder from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path of the written image, ending with `.png`, `.jpg` or `.jpeg`.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality, from 1 to 100. Unused for PNG.
pub fn write_image_any_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match ImageFormat::from_path(file_path)? {
        ImageFormat::Png => png::write_image_png_rgba8(file_path, image),
        ImageFormat::Jpeg => jpeg::write_image_jpeg_rgba8(file_path, image, quality),
    }
}
