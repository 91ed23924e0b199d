use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The destination length is not a whole number of rows.
    #[error("destination length ({0}) is not a multiple of the row stride ({1})")]
    SizeMismatch(usize, usize),
}

/// Controls how parallel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process every element in parallel.
    ///
    /// The pool is bounded by the number of logical cores, work is split by
    /// work stealing instead of one task per element.
    #[default]
    ParallelElements,

    /// Use the global Rayon thread pool to process rows in parallel.
    ///
    /// This is often more cache-friendly than [`ExecutionStrategy::ParallelElements`].
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Fill every element of a row-major buffer with the value computed for its `(row, col)`.
///
/// The call returns only once every element has been written, which makes it the
/// join barrier of a blur pass.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, `rows * cols` elements long.
/// * `cols` - The number of elements per row.
/// * `op` - Computes the value for the element at `(row, col)`.
pub fn fill_indexed<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    cols: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    if cols == 0 {
        return Err(ParallelError::InvalidRowStride(cols));
    }

    if dst.len() % cols != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), cols));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_mut(cols).enumerate().for_each(|(r, row)| {
                row.iter_mut()
                    .enumerate()
                    .for_each(|(c, dst_val)| *dst_val = op(r, c));
            });
        }
        ExecutionStrategy::ParallelElements => {
            fill_elements(dst, cols, &op);
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_mut(cols).enumerate().for_each(|(r, row)| {
                row.iter_mut()
                    .enumerate()
                    .for_each(|(c, dst_val)| *dst_val = op(r, c));
            });
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| fill_elements(dst, cols, &op));
        }
    }

    Ok(())
}

fn fill_elements<T, F>(dst: &mut [T], cols: usize, op: &F)
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    dst.par_iter_mut()
        .enumerate()
        .for_each(|(i, dst_val)| *dst_val = op(i / cols, i % cols));
}
