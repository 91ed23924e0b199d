use blurkit_image::Image;

use super::{
    aggregate, Aggregation, BlurError, BlurKind, BlurRequest, GaussianKernel, Pixel, PixelGrid,
};
use crate::parallel;

/// A validated blur request with its kernel built once.
///
/// # Example
///
/// ```
/// use blurkit_imgproc::blur::{BlurKind, BlurPass, BlurRequest, Pixel, PixelGrid};
///
/// let grid = PixelGrid::from_size_val([8, 8].into(), Pixel::gray(42)).unwrap();
///
/// let pass = BlurPass::new(BlurRequest::new(BlurKind::Mean, 3).with_iterations(3)).unwrap();
/// let blurred = pass.run(grid.clone()).unwrap();
///
/// assert_eq!(blurred, grid);
/// ```
#[derive(Debug, Clone)]
pub struct BlurPass {
    request: BlurRequest,
    kernel: Option<GaussianKernel>,
}

impl BlurPass {
    /// Validate a request and build its kernel.
    ///
    /// Only the gaussian kind carries a kernel, the mean kind weighs every cell the same.
    pub fn new(request: BlurRequest) -> Result<Self, BlurError> {
        request.validate()?;

        let kernel = match request.kind {
            BlurKind::Mean => None,
            BlurKind::Gaussian { sigma } => Some(GaussianKernel::new(request.kernel_size, sigma)?),
        };

        Ok(Self { request, kernel })
    }

    /// The request the pass was built from.
    pub fn request(&self) -> &BlurRequest {
        &self.request
    }

    /// The gaussian kernel, if any.
    pub fn kernel(&self) -> Option<&GaussianKernel> {
        self.kernel.as_ref()
    }

    fn aggregation(&self) -> Aggregation<'_> {
        match &self.kernel {
            Some(kernel) => Aggregation::Gaussian(kernel),
            None => Aggregation::Mean,
        }
    }

    /// Run every pass of the request, each pass reading the grid the previous one produced.
    ///
    /// The kernel size is checked against the grid once, before any pixel is touched.
    ///
    /// # Arguments
    ///
    /// * `initial` - The grid of the first pass.
    ///
    /// # Returns
    ///
    /// The grid produced by the last pass.
    pub fn run(&self, initial: PixelGrid) -> Result<PixelGrid, BlurError> {
        self.request.validate_for(initial.size())?;

        let mut current = initial;
        for pass_index in 0..self.request.iterations {
            current = self.run_once(&current)?;
            log::debug!(
                "{} blur pass {}/{} done",
                self.request.kind,
                pass_index + 1,
                self.request.iterations
            );
        }

        Ok(current)
    }

    // the returned grid is complete: fill_indexed joins all the workers before returning
    fn run_once(&self, src: &PixelGrid) -> Result<PixelGrid, BlurError> {
        let kernel_size = self.request.kernel_size;
        let window = self.request.window;
        let aggregation = self.aggregation();

        let mut pixels = vec![Pixel::default(); src.size().area()];
        parallel::fill_indexed(
            self.request.execution,
            &mut pixels,
            src.cols(),
            |row, col| aggregate(src, row, col, kernel_size, aggregation, window),
        )?;

        PixelGrid::new(src.size(), pixels)
    }
}

/// Blur a 8-bit RGBA image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `request` - The blur parameters.
///
/// # Returns
///
/// A new image with the same shape as the source.
///
/// # Errors
///
/// Any validation error of the request. A kernel that does not fit in the image is reported as
/// [`BlurError::KernelTooLarge`] before its parity is checked.
pub fn blur_image(src: &Image<u8, 4>, request: &BlurRequest) -> Result<Image<u8, 4>, BlurError> {
    request.validate_for(src.size())?;
    let pass = BlurPass::new(*request)?;
    let grid = PixelGrid::from_rgba8(src)?;
    pass.run(grid)?.into_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blur::WindowMode;
    use crate::parallel::ExecutionStrategy;

    fn ramp(cols: usize, rows: usize) -> Result<PixelGrid, BlurError> {
        let pixels = (0..cols * rows)
            .map(|i| Pixel::new((i * 7 % 256) as u8, (i * 3 % 256) as u8, (i % 256) as u8, 255))
            .collect();
        PixelGrid::new([cols, rows].into(), pixels)
    }

    #[test]
    fn pass_kernel_only_for_gaussian() -> Result<(), BlurError> {
        let mean = BlurPass::new(BlurRequest::new(BlurKind::Mean, 5))?;
        assert!(mean.kernel().is_none());

        let gaussian = BlurPass::new(BlurRequest::new(BlurKind::Gaussian { sigma: 2.0 }, 5))?;
        assert_eq!(gaussian.kernel().map(GaussianKernel::size), Some(5));
        Ok(())
    }

    #[test]
    fn pass_rejects_invalid_request() {
        assert_eq!(
            BlurPass::new(BlurRequest::new(BlurKind::Gaussian { sigma: 1.0 }, 6)).err(),
            Some(BlurError::InvalidKernelSize(6))
        );
    }

    #[test]
    fn pass_kernel_too_large() -> Result<(), BlurError> {
        let pass = BlurPass::new(BlurRequest::new(BlurKind::Mean, 31))?;
        let grid = ramp(40, 30)?;
        assert_eq!(
            pass.run(grid),
            Err(BlurError::KernelTooLarge {
                kernel_size: 31,
                max: 30
            })
        );
        Ok(())
    }

    #[test]
    fn pass_strategies_agree() -> Result<(), BlurError> {
        let grid = ramp(13, 9)?;
        let request = BlurRequest::new(BlurKind::Gaussian { sigma: 1.2 }, 5).with_iterations(2);

        let expected = BlurPass::new(request.with_execution(ExecutionStrategy::Serial))?
            .run(grid.clone())?;

        for execution in [
            ExecutionStrategy::ParallelElements,
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::Fixed(3),
        ] {
            let out = BlurPass::new(request.with_execution(execution))?.run(grid.clone())?;
            assert_eq!(out, expected, "{execution:?}");
        }
        Ok(())
    }

    #[test]
    fn pass_output_is_aligned_with_input() -> Result<(), BlurError> {
        let grid = ramp(6, 4)?;
        for (kind, window) in [
            (BlurKind::Mean, WindowMode::Centered),
            (BlurKind::Mean, WindowMode::Legacy),
            (BlurKind::Gaussian { sigma: 0.8 }, WindowMode::Centered),
            (BlurKind::Gaussian { sigma: 0.8 }, WindowMode::Legacy),
        ] {
            let pass = BlurPass::new(BlurRequest::new(kind, 3).with_window(window))?;
            let out = pass.run(grid.clone())?;
            for row in 0..grid.rows() {
                for col in 0..grid.cols() {
                    let expected = aggregate(&grid, row, col, 3, pass.aggregation(), window);
                    assert_eq!(out.get(row, col), Some(&expected));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn pass_fixed_pool_error() -> Result<(), BlurError> {
        let pass = BlurPass::new(
            BlurRequest::new(BlurKind::Mean, 3).with_execution(ExecutionStrategy::Fixed(0)),
        )?;
        assert!(matches!(
            pass.run(ramp(4, 4)?),
            Err(BlurError::Parallel(_))
        ));
        Ok(())
    }

    #[test]
    fn blur_image_keeps_shape() -> Result<(), BlurError> {
        let src = Image::<u8, 4>::new(
            [9, 5].into(),
            [77, 12, 250, 255].repeat(9 * 5),
        )?;
        let dst = blur_image(&src, &BlurRequest::new(BlurKind::Mean, 5))?;
        assert_eq!(dst.size(), src.size());
        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }
}
