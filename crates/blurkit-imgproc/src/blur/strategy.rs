use blurkit_image::ImageSize;

use super::{kernels, BlurError, WindowMode};
use crate::parallel::ExecutionStrategy;

/// The blur variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurKind {
    /// Arithmetic mean of the window.
    Mean,
    /// Gaussian weighted mean of the window.
    Gaussian {
        /// The spread of the gaussian.
        sigma: f64,
    },
}

impl BlurKind {
    /// Select a blur kind by name.
    ///
    /// `"mean"` (or its alias `"box"`) and `"gaussian"` are accepted, ignoring case. The sigma is
    /// only used, and validated, for the gaussian kind.
    ///
    /// # Example
    ///
    /// ```
    /// use blurkit_imgproc::blur::BlurKind;
    ///
    /// assert_eq!(BlurKind::from_name("Mean", 0.0).unwrap(), BlurKind::Mean);
    /// assert_eq!(
    ///     BlurKind::from_name("GAUSSIAN", 3.0).unwrap(),
    ///     BlurKind::Gaussian { sigma: 3.0 }
    /// );
    /// assert!(BlurKind::from_name("median", 1.0).is_err());
    /// ```
    pub fn from_name(name: &str, sigma: f64) -> Result<Self, BlurError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mean" | "box" => Ok(BlurKind::Mean),
            "gaussian" => {
                kernels::validate_sigma(sigma)?;
                Ok(BlurKind::Gaussian { sigma })
            }
            _ => Err(BlurError::UnsupportedBlurKind(name.to_string())),
        }
    }

    /// The canonical name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            BlurKind::Mean => "mean",
            BlurKind::Gaussian { .. } => "gaussian",
        }
    }
}

impl std::fmt::Display for BlurKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BlurKind::Mean => write!(f, "mean"),
            BlurKind::Gaussian { sigma } => write!(f, "gaussian(sigma={sigma})"),
        }
    }
}

/// The parameters of a blur.
///
/// # Example
///
/// ```
/// use blurkit_imgproc::blur::{BlurKind, BlurRequest};
/// use blurkit_imgproc::parallel::ExecutionStrategy;
///
/// let request = BlurRequest::new(BlurKind::Gaussian { sigma: 1.5 }, 5)
///     .with_iterations(2)
///     .with_execution(ExecutionStrategy::ParallelRows);
///
/// assert_eq!(request.iterations, 2);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurRequest {
    /// The blur variant.
    pub kind: BlurKind,
    /// The side of the square window, odd.
    pub kernel_size: usize,
    /// The number of passes.
    pub iterations: usize,
    /// The window placement.
    pub window: WindowMode,
    /// How the pixels of a pass are dispatched.
    pub execution: ExecutionStrategy,
}

impl BlurRequest {
    /// Create a single pass request with a centered window on the global thread pool.
    pub fn new(kind: BlurKind, kernel_size: usize) -> Self {
        Self {
            kind,
            kernel_size,
            iterations: 1,
            window: WindowMode::default(),
            execution: ExecutionStrategy::default(),
        }
    }

    /// Set the number of passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the window placement.
    pub fn with_window(mut self, window: WindowMode) -> Self {
        self.window = window;
        self
    }

    /// Set the execution strategy.
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Validate the parameters that do not depend on the image.
    pub fn validate(&self) -> Result<(), BlurError> {
        kernels::validate_kernel_size(self.kernel_size)?;

        if let BlurKind::Gaussian { sigma } = self.kind {
            kernels::validate_sigma(sigma)?;
        }

        if self.iterations == 0 {
            return Err(BlurError::InvalidIterations);
        }

        Ok(())
    }

    /// Validate that the kernel fits in an image of the given size.
    pub fn validate_for(&self, size: ImageSize) -> Result<(), BlurError> {
        if size.is_empty() {
            return Err(BlurError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }

        let max = size.width.min(size.height);
        if self.kernel_size > max {
            return Err(BlurError::KernelTooLarge {
                kernel_size: self.kernel_size,
                max,
            });
        }

        Ok(())
    }
}
