use argh::FromArgs;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use blurkit::{
    imgproc::{
        blur::{BlurError, BlurKind, BlurPass, BlurRequest, PixelGrid, WindowMode},
        parallel::ExecutionStrategy,
    },
    io::{
        functional::{self as F, DecodedImage, ImageFormat},
        IoError,
    },
};

#[derive(FromArgs, Debug)]
/// Blur a PNG or JPEG image with a mean or gaussian filter
struct Args {
    /// path to the image to blur
    #[argh(option)]
    file: PathBuf,

    /// the blur to apply: mean or gaussian
    #[argh(option)]
    kind: String,

    /// the side of the square kernel, odd
    #[argh(option, default = "3")]
    kernel: usize,

    /// the sigma of the gaussian blur
    #[argh(option, default = "1.0")]
    sigma: f64,

    /// the number of blur passes
    #[argh(option, default = "1")]
    iterations: usize,

    /// run on a dedicated pool with this many threads
    #[argh(option)]
    threads: Option<usize>,

    /// use the window placement of the first releases
    #[argh(switch)]
    legacy_window: bool,

    /// the quality of the written JPEG, from 1 to 100
    #[argh(option, default = "95")]
    quality: u8,

    /// where to write the blurred image, defaults to <stem>-blur.<ext> next to the input
    #[argh(option)]
    output: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Cannot derive an output file name from {0}")]
    InvalidFileName(PathBuf),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Blur(#[from] BlurError),
}

impl Args {
    fn request(&self) -> Result<BlurRequest, CliError> {
        let kind = BlurKind::from_name(&self.kind, self.sigma)?;

        let window = if self.legacy_window {
            WindowMode::Legacy
        } else {
            WindowMode::Centered
        };

        let execution = match self.threads {
            Some(n) => ExecutionStrategy::Fixed(n),
            None => ExecutionStrategy::ParallelElements,
        };

        Ok(BlurRequest::new(kind, self.kernel)
            .with_iterations(self.iterations)
            .with_window(window)
            .with_execution(execution))
    }

    fn output_path(&self) -> Result<PathBuf, CliError> {
        match &self.output {
            Some(output) => Ok(output.clone()),
            None => blurred_path(&self.file),
        }
    }
}

/// `dir/photo.JPG` becomes `dir/photo-blur.JPG`.
fn blurred_path(file: &Path) -> Result<PathBuf, CliError> {
    let (Some(stem), Some(ext)) = (file.file_stem(), file.extension()) else {
        return Err(CliError::InvalidFileName(file.to_path_buf()));
    };

    let mut name = stem.to_os_string();
    name.push("-blur.");
    name.push(ext);

    Ok(file.with_file_name(name))
}

fn run(args: &Args) -> Result<PathBuf, CliError> {
    let start = Instant::now();

    if !args.file.exists() {
        return Err(IoError::FileDoesNotExist(args.file.clone()).into());
    }
    ImageFormat::from_path(&args.file)?;

    let output = args.output_path()?;
    ImageFormat::from_path(&output)?;

    if !(1..=100).contains(&args.quality) {
        return Err(CliError::InvalidQuality(args.quality));
    }

    let request = args.request()?;

    let grid = match F::read_image_any(&args.file)? {
        DecodedImage::Rgba8(img) => PixelGrid::from_rgba8(&img)?,
        DecodedImage::Rgba16(img) => PixelGrid::from_rgba16(&img)?,
    };

    // the size is checked first so an oversized even kernel reports its size
    request.validate_for(grid.size())?;
    let pass = BlurPass::new(request)?;

    log::info!(
        "blurring {:?} ({}) with {}, kernel {}, {} iteration(s)",
        args.file,
        grid.size(),
        request.kind,
        request.kernel_size,
        request.iterations
    );

    let blurred = pass.run(grid)?.into_rgba8()?;
    F::write_image_any_rgba8(&output, &blurred, args.quality)?;

    log::info!("wrote {:?} in {:?}", output, start.elapsed());

    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blur: {err}");
            ExitCode::FAILURE
        }
    }
}
