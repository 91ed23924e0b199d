//! Blur operations
//!
//! This module provides the mean and gaussian blur engine: a pixel grid built once from the
//! decoded image, a kernel built once per request, and a pass executor that aggregates every
//! pixel neighborhood in parallel for a fixed number of iterations.

/// Blur error types
mod error;
pub use error::BlurError;

/// Pixel grid the passes read from and write to
mod grid;
pub use grid::{Pixel, PixelGrid};

/// Blur kernels
pub mod kernels;
pub use kernels::GaussianKernel;

/// Neighborhood aggregation
mod aggregate;
pub use aggregate::{aggregate, Aggregation, Window, WindowMode};

/// Blur kind selection and request configuration
mod strategy;
pub use strategy::{BlurKind, BlurRequest};

/// Blur pass execution
mod pass;
pub use pass::{blur_image, BlurPass};
