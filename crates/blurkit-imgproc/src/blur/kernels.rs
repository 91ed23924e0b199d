use super::BlurError;

/// Check that a kernel size has a well defined center.
pub fn validate_kernel_size(kernel_size: usize) -> Result<(), BlurError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(BlurError::InvalidKernelSize(kernel_size));
    }
    Ok(())
}

/// Check that a gaussian sigma is usable.
pub fn validate_sigma(sigma: f64) -> Result<(), BlurError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BlurError::InvalidSigma(sigma));
    }
    Ok(())
}

/// Create a centered range of coordinates.
///
/// The value at index `i` is `i - (kernel_size - 1) / 2`, so an odd sized range runs
/// symmetrically around zero.
///
/// # Arguments
///
/// * `kernel_size` - The length of the range.
pub fn centered_range(kernel_size: usize) -> Vec<f64> {
    let mean = (kernel_size as f64 - 1.0) / 2.0;
    (0..kernel_size).map(|i| i as f64 - mean).collect()
}

/// Create a gaussian blur kernel.
///
/// The weights are `exp(-x^2 / (2 * sigma^2))` sampled on [`centered_range`]. The kernel is not
/// normalized, the center weight is always `1.0`.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Result<Vec<f64>, BlurError> {
    validate_kernel_size(kernel_size)?;
    validate_sigma(sigma)?;

    // x / sigma first: sigma * sigma underflows to zero for tiny sigmas
    let kernel = centered_range(kernel_size)
        .into_iter()
        .map(|x| (-(x / sigma).powi(2) / 2.0).exp())
        .collect();

    Ok(kernel)
}

/// A square gaussian kernel built as the outer product of a 1D gaussian with itself.
///
/// # Example
///
/// ```
/// use blurkit_imgproc::blur::GaussianKernel;
///
/// let kernel = GaussianKernel::new(3, 1.0).unwrap();
///
/// assert_eq!(kernel.size(), 3);
/// assert_eq!(kernel.weight(1, 1), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build a `kernel_size x kernel_size` gaussian kernel.
    ///
    /// # Errors
    ///
    /// [`BlurError::InvalidKernelSize`] if the size is even or zero and
    /// [`BlurError::InvalidSigma`] if sigma is not a positive finite number.
    pub fn new(kernel_size: usize, sigma: f64) -> Result<Self, BlurError> {
        let kernel_1d = gaussian_kernel_1d(kernel_size, sigma)?;

        let weights = kernel_1d
            .iter()
            .flat_map(|&gi| kernel_1d.iter().map(move |&gj| gi * gj))
            .collect();

        Ok(Self {
            size: kernel_size,
            weights,
        })
    }

    /// The number of rows (and columns) of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The weight at `(row, col)`.
    ///
    /// PRECONDITION: `row` and `col` are smaller than [`GaussianKernel::size`].
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.size + col]
    }

    /// The weights in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// The sum of all the weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}
