use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netpix::binarize::{
    BernsenOptions, BinarizeMethod, IterativeOptions, ManualOptions, NiblackOptions,
    PercentileOptions, binarize,
};
use netpix::filter::{
    GrayMethod, RgbOp, RgbOperation, SpatialFilter, apply_filter, apply_rgb_op,
    equalize_histogram, set_alpha, stretch_histogram, to_gray,
};
use netpix::io::{
    CommentList, DecodeQueue, ImageFormat, PnmFormat, decode_pnm, detect_format, encode_pnm,
    read_image, write_image,
};
use netpix::morph::{MorphOp, StructuringElement, morph};
use netpix::region::{HIGHLIGHT_RED, SegmentOptions, highlight, segment};
use netpix::{Histogram, Raster};

#[derive(Parser)]
#[command(name = "netpix")]
#[command(about = "Decode NetPBM images and run classic image analysis on them")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input and output paths shared by the transforming commands
#[derive(Args)]
struct Paths {
    /// Input image (NetPBM, PNG, JPEG or WebP)
    input: PathBuf,

    /// Output image
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print format, size, comments and luminance statistics
    Info {
        /// Input image
        input: PathBuf,
    },
    /// Re-encode an image, keeping NetPBM comments
    Convert {
        #[command(flatten)]
        paths: Paths,

        /// Extra comment line for NetPBM output (repeatable)
        #[arg(short, long)]
        comment: Vec<String>,
    },
    /// Binarize an image into a black-on-white mask
    Binarize {
        #[command(flatten)]
        paths: Paths,

        /// Thresholding strategy
        #[arg(short, long, value_enum, default_value_t = Method::Otsu)]
        method: Method,

        /// Global threshold for the manual method (0-255)
        #[arg(long, default_value_t = 127)]
        threshold: i32,

        /// Percentile for the percentile method (0-100)
        #[arg(long, default_value_t = 50.0)]
        percent: f64,

        /// Iteration cap for the iterative method (0-100)
        #[arg(long, default_value_t = 10)]
        max_iterations: u32,

        /// Odd window size for the Niblack and Bernsen methods
        #[arg(long, default_value_t = 15)]
        window: u32,

        /// Niblack weight on the local standard deviation
        #[arg(long, default_value_t = -0.2, allow_hyphen_values = true)]
        k: f64,

        /// Minimum local contrast for the Bernsen method (0-255)
        #[arg(long, default_value_t = 15)]
        contrast: i32,
    },
    /// Apply a 3x3 neighborhood filter
    Filter {
        #[command(flatten)]
        paths: Paths,

        /// Filter to apply
        #[arg(value_enum)]
        kind: FilterKind,
    },
    /// Apply a grayscale morphological operation
    Morph {
        #[command(flatten)]
        paths: Paths,

        /// Operation to apply
        #[arg(value_enum)]
        op: MorphKind,

        /// Use an odd square element of this size instead of the 3x3 cross
        #[arg(long)]
        square: Option<u32>,
    },
    /// Stretch or equalize the luminance histogram
    Histogram {
        #[command(flatten)]
        paths: Paths,

        /// Remapping to apply
        #[arg(value_enum)]
        mode: RemapMode,
    },
    /// Find the largest dark region and report green coverage
    Segment {
        #[command(flatten)]
        paths: Paths,

        /// Margin by which green must exceed red and blue (0-255)
        #[arg(long, default_value_t = 20)]
        green_threshold: i32,

        /// Also write the foreground mask to this path
        #[arg(long)]
        mask: Option<PathBuf>,
    },
    /// Apply a per-pixel transform
    Pointwise {
        #[command(subcommand)]
        op: PointwiseOp,
    },
    /// Decode many files through the sequential job queue
    Batch {
        /// Files to decode
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Seconds to wait for each result
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[derive(Subcommand)]
enum PointwiseOp {
    /// Convert to grayscale
    Gray {
        #[command(flatten)]
        paths: Paths,

        /// Conversion formula
        #[arg(short, long, value_enum, default_value_t = GrayKind::Weights)]
        method: GrayKind,
    },
    /// Replace the alpha channel with a constant
    Alpha {
        #[command(flatten)]
        paths: Paths,

        /// New alpha value
        #[arg(long)]
        value: u8,
    },
    /// Per-channel arithmetic with saturation
    Rgb {
        #[command(flatten)]
        paths: Paths,

        /// Operation
        #[arg(long, value_enum)]
        op: RgbKind,

        /// Red operand
        #[arg(short, long, default_value_t = 0)]
        r: u8,

        /// Green operand
        #[arg(short, long, default_value_t = 0)]
        g: u8,

        /// Blue operand
        #[arg(short, long, default_value_t = 0)]
        b: u8,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    Png,
    Jpeg,
    Webp,
}

impl From<OutputFormat> for ImageFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::P1 => ImageFormat::Pnm(PnmFormat::P1),
            OutputFormat::P2 => ImageFormat::Pnm(PnmFormat::P2),
            OutputFormat::P3 => ImageFormat::Pnm(PnmFormat::P3),
            OutputFormat::P4 => ImageFormat::Pnm(PnmFormat::P4),
            OutputFormat::P5 => ImageFormat::Pnm(PnmFormat::P5),
            OutputFormat::P6 => ImageFormat::Pnm(PnmFormat::P6),
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Webp => ImageFormat::WebP,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Manual,
    Percentile,
    Iterative,
    Otsu,
    Niblack,
    Bernsen,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterKind {
    Average,
    Median,
    Sobel,
    Gaussian,
}

impl From<FilterKind> for SpatialFilter {
    fn from(k: FilterKind) -> Self {
        match k {
            FilterKind::Average => SpatialFilter::Average,
            FilterKind::Median => SpatialFilter::Median,
            FilterKind::Sobel => SpatialFilter::Sobel,
            FilterKind::Gaussian => SpatialFilter::Gaussian,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MorphKind {
    Dilate,
    Erode,
    Open,
    Close,
    HitMiss,
}

impl From<MorphKind> for MorphOp {
    fn from(k: MorphKind) -> Self {
        match k {
            MorphKind::Dilate => MorphOp::Dilate,
            MorphKind::Erode => MorphOp::Erode,
            MorphKind::Open => MorphOp::Open,
            MorphKind::Close => MorphOp::Close,
            MorphKind::HitMiss => MorphOp::HitMiss,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RemapMode {
    Stretch,
    Equalize,
}

#[derive(Clone, Copy, ValueEnum)]
enum GrayKind {
    Average,
    Weights,
}

#[derive(Clone, Copy, ValueEnum)]
enum RgbKind {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl From<RgbKind> for RgbOperation {
    fn from(k: RgbKind) -> Self {
        match k {
            RgbKind::Add => RgbOperation::Add,
            RgbKind::Subtract => RgbOperation::Subtract,
            RgbKind::Multiply => RgbOperation::Multiply,
            RgbKind::Divide => RgbOperation::Divide,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => run_info(&input),
        Commands::Convert { paths, comment } => {
            let loaded = load(&paths.input)?;
            let mut comments = loaded.comments;
            comments.extend(comment);
            save(&loaded.raster, &paths, &comments)
        }
        Commands::Binarize {
            paths,
            method,
            threshold,
            percent,
            max_iterations,
            window,
            k,
            contrast,
        } => {
            let method = match method {
                Method::Manual => BinarizeMethod::Manual(ManualOptions { threshold }),
                Method::Percentile => BinarizeMethod::Percentile(PercentileOptions { percent }),
                Method::Iterative => {
                    BinarizeMethod::Iterative(IterativeOptions { max_iterations })
                }
                Method::Otsu => BinarizeMethod::Otsu,
                Method::Niblack => BinarizeMethod::Niblack(NiblackOptions {
                    window_size: window,
                    k,
                }),
                Method::Bernsen => BinarizeMethod::Bernsen(BernsenOptions {
                    window_size: window,
                    contrast_threshold: contrast,
                }),
            };
            method.validate()?;
            let loaded = load(&paths.input)?;
            let mask = binarize(&loaded.raster, &method)?;
            save(&mask.to_raster(), &paths, &[])
        }
        Commands::Filter { paths, kind } => {
            let loaded = load(&paths.input)?;
            let out = apply_filter(&loaded.raster, kind.into())?;
            save(&out, &paths, &loaded.comments)
        }
        Commands::Morph { paths, op, square } => {
            let sel = match square {
                Some(size) => StructuringElement::square(size)?,
                None => StructuringElement::cross(),
            };
            let loaded = load(&paths.input)?;
            let out = morph(&loaded.raster, op.into(), &sel)?;
            save(&out, &paths, &loaded.comments)
        }
        Commands::Histogram { paths, mode } => {
            let loaded = load(&paths.input)?;
            let out = match mode {
                RemapMode::Stretch => stretch_histogram(&loaded.raster)?,
                RemapMode::Equalize => equalize_histogram(&loaded.raster)?,
            };
            save(&out, &paths, &loaded.comments)
        }
        Commands::Segment {
            paths,
            green_threshold,
            mask,
        } => run_segment(&paths, green_threshold, mask.as_deref()),
        Commands::Pointwise { op } => run_pointwise(op),
        Commands::Batch {
            inputs,
            timeout_secs,
        } => run_batch(&inputs, Duration::from_secs(timeout_secs)),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "netpix=warn",
        1 => "netpix=info",
        _ => "netpix=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// A decoded input with its NetPBM comments
struct Loaded {
    raster: Raster,
    format: ImageFormat,
    comments: CommentList,
}

fn load(path: &Path) -> anyhow::Result<Loaded> {
    let format = detect_format(path)
        .with_context(|| format!("cannot identify {}", path.display()))?;
    match format {
        ImageFormat::Pnm(_) => {
            let data =
                std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
            let image =
                decode_pnm(&data).with_context(|| format!("cannot decode {}", path.display()))?;
            Ok(Loaded {
                raster: image.raster,
                format,
                comments: image.comments,
            })
        }
        _ => {
            let raster =
                read_image(path).with_context(|| format!("cannot decode {}", path.display()))?;
            Ok(Loaded {
                raster,
                format,
                comments: CommentList::new(),
            })
        }
    }
}

fn save(raster: &Raster, paths: &Paths, comments: &[String]) -> anyhow::Result<()> {
    let output = &paths.output;
    let format = match paths.format {
        Some(f) => f.into(),
        None => ImageFormat::from_path(output).with_context(|| {
            format!(
                "cannot infer a format from {}; pass --format",
                output.display()
            )
        })?,
    };
    match format {
        ImageFormat::Pnm(f) => {
            let bytes = encode_pnm(raster, f, comments)?;
            std::fs::write(output, bytes)
                .with_context(|| format!("cannot write {}", output.display()))?;
        }
        other => write_image(raster, output, other)
            .with_context(|| format!("cannot write {}", output.display()))?,
    }
    tracing::info!(path = %output.display(), ?format, "wrote image");
    Ok(())
}

fn run_info(input: &Path) -> anyhow::Result<()> {
    let loaded = load(input)?;
    let raster = &loaded.raster;
    let hist = Histogram::from_raster(raster);

    println!("file:      {}", input.display());
    match loaded.format {
        ImageFormat::Pnm(f) => println!("format:    {f}"),
        other => println!("format:    {other:?}"),
    }
    println!("size:      {}x{}", raster.width(), raster.height());
    println!("layout:    {:?}", raster.layout());
    if let (Some(min), Some(max), Some(mean)) = (hist.min_value(), hist.max_value(), hist.mean())
    {
        println!("luminance: min {min}, max {max}, mean {mean:.2}");
    }
    println!("otsu:      {}", hist.otsu_threshold());
    println!("comments:  {}", loaded.comments.len());
    for comment in &loaded.comments {
        println!("  #{comment}");
    }
    Ok(())
}

fn run_segment(paths: &Paths, green_threshold: i32, mask: Option<&Path>) -> anyhow::Result<()> {
    let options = SegmentOptions { green_threshold };
    options.validate()?;
    let loaded = load(&paths.input)?;
    let seg = segment(&loaded.raster, &options)?;

    println!("threshold:  {}", seg.threshold);
    println!("components: {}", seg.component_count);
    println!("largest:    {} pixels", seg.largest.len());
    println!("green:      {:.2}%", seg.green_percent);

    let shown = highlight(&loaded.raster, &seg.largest, HIGHLIGHT_RED)?;
    save(&shown, paths, &[])?;
    if let Some(mask_path) = mask {
        let mask_paths = Paths {
            input: paths.input.clone(),
            output: mask_path.to_path_buf(),
            format: None,
        };
        save(&seg.mask.to_raster(), &mask_paths, &[])?;
    }
    Ok(())
}

fn run_pointwise(op: PointwiseOp) -> anyhow::Result<()> {
    match op {
        PointwiseOp::Gray { paths, method } => {
            let method = match method {
                GrayKind::Average => GrayMethod::Average,
                GrayKind::Weights => GrayMethod::Weights,
            };
            let loaded = load(&paths.input)?;
            save(&to_gray(&loaded.raster, method)?, &paths, &loaded.comments)
        }
        PointwiseOp::Alpha { paths, value } => {
            let loaded = load(&paths.input)?;
            save(&set_alpha(&loaded.raster, value)?, &paths, &[])
        }
        PointwiseOp::Rgb { paths, op, r, g, b } => {
            let op = RgbOp::new(op.into(), r, g, b);
            op.validate()?;
            let loaded = load(&paths.input)?;
            save(&apply_rgb_op(&loaded.raster, &op)?, &paths, &loaded.comments)
        }
    }
}

fn run_batch(inputs: &[PathBuf], timeout: Duration) -> anyhow::Result<()> {
    let queue = DecodeQueue::new().context("cannot start the decode queue")?;
    let mut submitted = 0usize;
    for path in inputs {
        queue.submit_file(path)?;
        submitted += 1;
    }

    let mut failed = 0usize;
    for _ in 0..submitted {
        let Some(event) = queue.recv_event_timeout(timeout) else {
            bail!("timed out waiting for decode results");
        };
        match &event.result {
            Ok(image) => println!(
                "{}\t{}\t{}x{}\t{:?}\t{} comments",
                event.id,
                event.source,
                image.raster.width(),
                image.raster.height(),
                image.format,
                image.comments.len()
            ),
            Err(e) => {
                failed += 1;
                println!("{}\t{}\tfailed: {e}", event.id, event.source);
            }
        }
        queue.forget(event.id);
    }
    queue.shutdown();

    if failed > 0 {
        bail!("{failed} of {submitted} images failed to decode");
    }
    Ok(())
}
