use blurkit_image::{Image, ImageSize};

use super::BlurError;

/// A RGBA pixel with 8-bit channels.
///
/// Inside a [`PixelGrid`] the color channels are premultiplied by alpha, so a color channel
/// never exceeds the alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel(pub [u8; 4]);

impl Pixel {
    /// Create a pixel from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Create an opaque gray pixel.
    pub const fn gray(v: u8) -> Self {
        Self([v, v, v, u8::MAX])
    }

    /// The red channel.
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    /// The green channel.
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    /// The blue channel.
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// The alpha channel.
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    /// The channels as an array.
    pub fn channels(&self) -> [u8; 4] {
        self.0
    }
}

/// A dense grid of pixels addressed by `(row, col)`.
///
/// Rows run along the image y axis and columns along the x axis. The grid is never mutated
/// once built: a blur pass reads one grid and produces a new one.
///
/// The image constructors premultiply the color channels by alpha and [`PixelGrid::into_rgba8`]
/// reverses it, so transparent pixels carry no color into their neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    size: ImageSize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Create a grid from pixels stored in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::InvalidDimensions`] for an empty size and
    /// [`BlurError::Image`] if the number of pixels does not match the size.
    pub fn new(size: ImageSize, pixels: Vec<Pixel>) -> Result<Self, BlurError> {
        check_dimensions(size)?;
        if pixels.len() != size.area() {
            return Err(blurkit_image::ImageError::InvalidChannelShape(
                pixels.len() * 4,
                size.area() * 4,
            )
            .into());
        }
        Ok(Self { size, pixels })
    }

    /// Create a grid filled with a single pixel value.
    pub fn from_size_val(size: ImageSize, val: Pixel) -> Result<Self, BlurError> {
        Self::new(size, vec![val; size.area()])
    }

    /// Build a grid from a 8-bit RGBA image.
    ///
    /// # Example
    ///
    /// ```
    /// use blurkit_image::Image;
    /// use blurkit_imgproc::blur::{Pixel, PixelGrid};
    ///
    /// let image = Image::<u8, 4>::new([2, 1].into(), vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    /// let grid = PixelGrid::from_rgba8(&image).unwrap();
    ///
    /// assert_eq!(grid.get(0, 1), Some(&Pixel::new(5, 6, 7, 8)));
    /// ```
    pub fn from_rgba8(image: &Image<u8, 4>) -> Result<Self, BlurError> {
        let pixels = image
            .as_slice()
            .chunks_exact(4)
            .map(|p| premultiply([p[0], p[1], p[2], p[3]]))
            .collect();
        Self::new(image.size(), pixels)
    }

    /// Build a grid from a 16-bit RGBA image.
    ///
    /// The samples are premultiplied at 16 bits, then divided by 257, the exact inverse of
    /// widening an 8-bit sample to 16 bits (`v * 257`).
    pub fn from_rgba16(image: &Image<u16, 4>) -> Result<Self, BlurError> {
        let pixels = image
            .as_slice()
            .chunks_exact(4)
            .map(|p| {
                let a = p[3] as u32;
                let scale = |c: u16| {
                    let premultiplied = (c as u32 * a + u16::MAX as u32 / 2) / u16::MAX as u32;
                    (premultiplied / 257) as u8
                };
                Pixel([scale(p[0]), scale(p[1]), scale(p[2]), (a / 257) as u8])
            })
            .collect();
        Self::new(image.size(), pixels)
    }

    /// Build a grid from a 8-bit grayscale image, as opaque gray pixels.
    pub fn from_mono8(image: &Image<u8, 1>) -> Result<Self, BlurError> {
        let pixels = image.as_slice().iter().map(|&v| Pixel::gray(v)).collect();
        Self::new(image.size(), pixels)
    }

    /// Convert the grid back into a 8-bit RGBA image.
    pub fn into_rgba8(self) -> Result<Image<u8, 4>, BlurError> {
        let data = self
            .pixels
            .iter()
            .flat_map(|p| unpremultiply(p.channels()))
            .collect();
        Ok(Image::new(self.size, data)?)
    }

    /// The size of the grid.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The number of rows (image height).
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// The number of columns (image width).
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// The pixel at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Pixel> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.pixels.get(row * self.cols() + col)
    }

    /// The pixels in row-major order.
    pub fn as_slice(&self) -> &[Pixel] {
        &self.pixels
    }

    /// One row of pixels.
    ///
    /// PRECONDITION: `row < self.rows()`.
    pub(crate) fn row(&self, row: usize) -> &[Pixel] {
        let start = row * self.cols();
        &self.pixels[start..start + self.cols()]
    }
}

fn check_dimensions(size: ImageSize) -> Result<(), BlurError> {
    if size.is_empty() {
        return Err(BlurError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    Ok(())
}

// both conversions round to nearest, so unpremultiply then premultiply gives back the
// same pixel for any c <= a
fn premultiply([r, g, b, a]: [u8; 4]) -> Pixel {
    let alpha = a as u32;
    let scale = |c: u8| ((c as u32 * alpha + 127) / 255) as u8;
    Pixel([scale(r), scale(g), scale(b), a])
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0; 4];
    }
    let alpha = a as u32;
    let scale = |c: u8| ((2 * c as u32 * 255 + alpha) / (2 * alpha)).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_from_rgba8_opaque_roundtrip() -> Result<(), BlurError> {
        let data = (0..2 * 3)
            .flat_map(|v| [v as u8 * 40, 7, 250, 255])
            .collect::<Vec<_>>();
        let image = Image::<u8, 4>::new([3, 2].into(), data.clone())?;

        let grid = PixelGrid::from_rgba8(&image)?;
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        // row 1, col 2 is the last pixel
        assert_eq!(grid.get(1, 2), Some(&Pixel::new(200, 7, 250, 255)));
        assert_eq!(grid.get(2, 0), None);

        let back = grid.into_rgba8()?;
        assert_eq!(back.as_slice(), data.as_slice());
        Ok(())
    }

    #[test]
    fn grid_premultiplies_alpha() -> Result<(), BlurError> {
        let image = Image::<u8, 4>::new(
            [3, 1].into(),
            vec![200, 100, 50, 128, 255, 0, 0, 0, 10, 20, 30, 255],
        )?;
        let grid = PixelGrid::from_rgba8(&image)?;
        assert_eq!(grid.get(0, 0), Some(&Pixel::new(100, 50, 25, 128)));
        assert_eq!(grid.get(0, 1), Some(&Pixel::new(0, 0, 0, 0)));
        assert_eq!(grid.get(0, 2), Some(&Pixel::new(10, 20, 30, 255)));

        // the color of a fully transparent pixel is not recoverable
        let back = grid.into_rgba8()?;
        assert_eq!(
            back.as_slice(),
            &[199, 100, 50, 128, 0, 0, 0, 0, 10, 20, 30, 255]
        );
        Ok(())
    }

    #[test]
    fn grid_premultiplied_roundtrip_is_stable() -> Result<(), BlurError> {
        for a in 0..=255u8 {
            for c in 0..=a {
                let grid = PixelGrid::from_size_val([1, 1].into(), Pixel::new(c, c, 0, a))?;
                let again = PixelGrid::from_rgba8(&grid.clone().into_rgba8()?)?;
                assert_eq!(again, grid, "c={c} a={a}");
            }
        }
        Ok(())
    }

    #[test]
    fn grid_from_rgba16_scales_by_257() -> Result<(), BlurError> {
        let image = Image::<u16, 4>::new(
            [2, 1].into(),
            vec![0, 257, 128 * 257, 65535, 65535, 514, 1000, 32896],
        )?;
        let grid = PixelGrid::from_rgba16(&image)?;
        assert_eq!(grid.get(0, 0), Some(&Pixel::new(0, 1, 128, 255)));
        // half transparent, premultiplied before scaling
        assert_eq!(grid.get(0, 1), Some(&Pixel::new(128, 1, 1, 128)));
        Ok(())
    }

    #[test]
    fn grid_from_mono8() -> Result<(), BlurError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![7, 9])?;
        let grid = PixelGrid::from_mono8(&image)?;
        assert_eq!(grid.as_slice(), &[Pixel::gray(7), Pixel::gray(9)]);
        Ok(())
    }

    #[test]
    fn grid_rejects_empty_image() -> Result<(), BlurError> {
        let image = Image::<u8, 4>::new([0, 5].into(), vec![])?;
        assert_eq!(
            PixelGrid::from_rgba8(&image),
            Err(BlurError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        Ok(())
    }

    #[test]
    fn grid_rejects_mismatched_len() {
        let res = PixelGrid::new([2, 2].into(), vec![Pixel::default(); 3]);
        assert!(matches!(res, Err(BlurError::Image(_))));
    }
}
