use std::ops::Range;

use super::{GaussianKernel, Pixel, PixelGrid};

/// How the neighborhood window is placed around a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// `kernel_size` cells centered on the pixel, clipped to the grid.
    ///
    /// Kernel weights stay aligned with the unclipped window, so the pixel itself always takes
    /// the center weight. Gaussian sums are normalized by the visited weights.
    #[default]
    Centered,

    /// A window that starts one cell before the centered window and spans `kernel_size - 1`
    /// cells. The clipped start is also the kernel origin, weighted terms are truncated to
    /// integers and gaussian sums are divided by the visited cell count.
    ///
    /// Reproduces the window placement and normalization of the first releases of the `blur`
    /// tool. Their kernel scaling and 8-bit conversion are not reproduced.
    Legacy,
}

/// A window along one axis, clipped to `[0, extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First visited index.
    pub start: usize,
    /// One past the last visited index.
    pub end: usize,
    /// Kernel index of the cell at `start`.
    pub kernel_offset: usize,
}

impl Window {
    /// Compute the window around `coord` along an axis of length `extent`.
    ///
    /// # Example
    ///
    /// ```
    /// use blurkit_imgproc::blur::{Window, WindowMode};
    ///
    /// let window = Window::new(0, 5, 10, WindowMode::Centered);
    ///
    /// assert_eq!(window.range(), 0..3);
    /// assert_eq!(window.kernel_index(0), 2);
    /// ```
    pub fn new(coord: usize, kernel_size: usize, extent: usize, mode: WindowMode) -> Self {
        let half = kernel_size / 2;
        match mode {
            WindowMode::Centered => {
                let start = coord.saturating_sub(half);
                let end = (coord + half + 1).min(extent);
                Self {
                    start,
                    end: end.max(start),
                    kernel_offset: half - (coord - start),
                }
            }
            WindowMode::Legacy => {
                let start = (coord as isize - half as isize - 1).max(0) as usize;
                let end = (start + kernel_size.saturating_sub(1)).min(extent);
                Self {
                    start,
                    end: end.max(start),
                    kernel_offset: 0,
                }
            }
        }
    }

    /// The visited indices.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The number of visited cells.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the window visits no cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The kernel index used for the grid index `i`.
    ///
    /// PRECONDITION: `i` is inside [`Window::range`].
    #[inline]
    pub fn kernel_index(&self, i: usize) -> usize {
        i - self.start + self.kernel_offset
    }
}

/// The weighting applied to a neighborhood.
#[derive(Debug, Clone, Copy)]
pub enum Aggregation<'a> {
    /// Every visited cell weighs 1.
    Mean,
    /// Cells are weighted by a gaussian kernel.
    Gaussian(&'a GaussianKernel),
}

/// Aggregate the neighborhood of the pixel at `(row, col)`.
///
/// The window is clipped to the grid, and the number of visited cells is counted instead of
/// assumed to be `kernel_size^2`, so border pixels are not darkened.
///
/// # Arguments
///
/// * `grid` - The grid to read from.
/// * `row` - The row of the center pixel.
/// * `col` - The column of the center pixel.
/// * `kernel_size` - The size of the square window.
/// * `aggregation` - The weighting of the window cells.
/// * `mode` - The window placement.
///
/// # Panics
///
/// If `(row, col)` is outside the grid or a gaussian kernel has fewer than `kernel_size` rows.
pub fn aggregate(
    grid: &PixelGrid,
    row: usize,
    col: usize,
    kernel_size: usize,
    aggregation: Aggregation<'_>,
    mode: WindowMode,
) -> Pixel {
    assert!(
        row < grid.rows() && col < grid.cols(),
        "pixel ({row}, {col}) is outside the {} grid",
        grid.size()
    );
    if let Aggregation::Gaussian(kernel) = aggregation {
        assert!(
            kernel.size() >= kernel_size,
            "kernel of size {} cannot cover a window of size {kernel_size}",
            kernel.size()
        );
    }

    let rows = Window::new(row, kernel_size, grid.rows(), mode);
    let cols = Window::new(col, kernel_size, grid.cols(), mode);

    // a one cell legacy window spans nothing
    if rows.is_empty() || cols.is_empty() {
        return grid.row(row)[col];
    }

    match (aggregation, mode) {
        (Aggregation::Mean, _) => mean(grid, &rows, &cols),
        (Aggregation::Gaussian(kernel), WindowMode::Centered) => {
            gaussian_weighted(grid, &rows, &cols, kernel)
        }
        (Aggregation::Gaussian(kernel), WindowMode::Legacy) => {
            gaussian_counted(grid, &rows, &cols, kernel)
        }
    }
}

fn mean(grid: &PixelGrid, rows: &Window, cols: &Window) -> Pixel {
    let mut sum = [0u64; 4];
    let mut kernel_inner_size = 0u64;

    for r in rows.range() {
        for px in &grid.row(r)[cols.range()] {
            kernel_inner_size += 1;
            for (acc, &v) in sum.iter_mut().zip(px.0.iter()) {
                *acc += v as u64;
            }
        }
    }

    Pixel(sum.map(|s| (s / kernel_inner_size).min(u8::MAX as u64) as u8))
}

fn gaussian_weighted(
    grid: &PixelGrid,
    rows: &Window,
    cols: &Window,
    kernel: &GaussianKernel,
) -> Pixel {
    let mut sum = [0f64; 4];
    let mut weight_sum = 0f64;

    for r in rows.range() {
        let kr = rows.kernel_index(r);
        let row_px = grid.row(r);
        for c in cols.range() {
            let w = kernel.weight(kr, cols.kernel_index(c));
            weight_sum += w;
            for (acc, &v) in sum.iter_mut().zip(row_px[c].0.iter()) {
                *acc += v as f64 * w;
            }
        }
    }

    Pixel(sum.map(|s| (s / weight_sum).round().clamp(0.0, 255.0) as u8))
}

fn gaussian_counted(
    grid: &PixelGrid,
    rows: &Window,
    cols: &Window,
    kernel: &GaussianKernel,
) -> Pixel {
    let mut sum = [0i64; 4];
    let mut kernel_inner_size = 0i64;

    for r in rows.range() {
        let kr = rows.kernel_index(r);
        let row_px = grid.row(r);
        for c in cols.range() {
            kernel_inner_size += 1;
            let w = kernel.weight(kr, cols.kernel_index(c));
            for (acc, &v) in sum.iter_mut().zip(row_px[c].0.iter()) {
                *acc += (v as f64 * w) as i64;
            }
        }
    }

    Pixel(sum.map(|s| (s / kernel_inner_size).clamp(0, 255) as u8))
}
