use blurkit_image::Image;
use blurkit_io::{
    functional::{read_image_any, read_image_any_rgba8, write_image_any_rgba8, DecodedImage},
    IoError,
};

fn gradient(cols: usize, rows: usize) -> Result<Image<u8, 4>, IoError> {
    let data = (0..rows)
        .flat_map(|r| (0..cols).flat_map(move |c| [(c * 16) as u8, (r * 16) as u8, 128, 255]))
        .collect();
    Ok(Image::new([cols, rows].into(), data)?)
}

#[test]
fn png_roundtrip_is_lossless() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("gradient.png");

    let image = gradient(12, 7)?;
    write_image_any_rgba8(&file_path, &image, 95)?;

    let read = read_image_any(&file_path)?;
    assert!(!read.is_16bit());
    assert_eq!(read, DecodedImage::Rgba8(image));
    Ok(())
}

#[test]
fn png_16bit_is_kept_and_scaled() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("deep.png");

    let data = [65535u16, 257 * 100, 0, 65535].repeat(3 * 2);
    let buffer = image::ImageBuffer::<image::Rgba<u16>, Vec<u16>>::from_raw(3, 2, data)
        .ok_or_else(|| IoError::PngEncodingError("buffer too small".to_string()))?;
    buffer.save(&file_path)?;

    let read = read_image_any(&file_path)?;
    assert!(read.is_16bit());
    assert_eq!(read.size(), [3, 2].into());

    let rgba8 = read_image_any_rgba8(&file_path)?;
    assert_eq!(&rgba8.as_slice()[..4], &[255, 100, 0, 255]);
    Ok(())
}

#[test]
fn jpeg_keeps_dimensions() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("gradient.JPG");

    let image = gradient(16, 9)?;
    write_image_any_rgba8(&file_path, &image, 90)?;

    let read = read_image_any_rgba8(&file_path)?;
    assert_eq!(read.size(), image.size());
    // jpeg drops the alpha channel, which is read back opaque
    assert!(read.as_slice().chunks_exact(4).all(|p| p[3] == 255));
    Ok(())
}

#[test]
fn grayscale_is_widened() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("gray.png");

    let gray = Image::<u8, 1>::new([2, 2].into(), vec![0, 50, 100, 150])?;
    blurkit_io::png::write_image_png_gray8(&file_path, &gray)?;

    let read = read_image_any_rgba8(&file_path)?;
    assert_eq!(&read.as_slice()[4..8], &[50, 50, 50, 255]);
    Ok(())
}

#[test]
fn missing_file() {
    let res = read_image_any_rgba8("missing/picture.png");
    assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
}
