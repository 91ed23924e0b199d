use blurkit_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the blur module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BlurError {
    /// The kernel size is even or zero.
    #[error("kernel size must be odd and greater than zero, got {0}")]
    InvalidKernelSize(usize),

    /// The kernel does not fit inside the image.
    #[error("kernel size ({kernel_size}) cannot be greater than the smallest image side ({max})")]
    KernelTooLarge {
        /// The requested kernel size.
        kernel_size: usize,
        /// The smallest side of the image.
        max: usize,
    },

    /// The gaussian sigma is not a positive finite number.
    #[error("sigma must be a positive finite number, got {0}")]
    InvalidSigma(f64),

    /// The image has no pixels.
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions {
        /// The image width.
        width: usize,
        /// The image height.
        height: usize,
    },

    /// The iteration count is zero.
    #[error("iteration count must be greater than zero")]
    InvalidIterations,

    /// The requested blur kind is not known.
    #[error("unsupported blur kind: {0}")]
    UnsupportedBlurKind(String),

    /// Error creating or accessing an image.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error dispatching the pass work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
