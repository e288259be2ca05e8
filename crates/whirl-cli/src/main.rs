use std::{
    collections::HashSet,
    ffi::OsStr,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use whirl_core::{InterpolationFilter, PivotOverride, SourceFormat, SpinOptions};

#[derive(Parser, Debug)]
#[command(name = "whirl", version, about = "Spin a still image into a looping GIF")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rotate each image through a full turn and write it as a GIF.
    Spin(SpinArgs),
}

#[derive(Parser, Debug)]
struct SpinArgs {
    /// Source image (PNG). May be repeated.
    #[arg(short = 'i', long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Rotations per second.
    #[arg(long)]
    rps: Option<f64>,

    /// Playback frames per second.
    #[arg(long)]
    fps: Option<f64>,

    /// Pivot override, e.g. `x=10,y=20`. Missing axes use the image center.
    #[arg(long, value_parser = parse_center)]
    center: Option<PivotOverride>,

    /// Interpolation used when rotating.
    #[arg(long, value_enum)]
    filter: Option<FilterChoice>,

    /// Worker threads (defaults to all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Output GIF path. Only valid with a single image; defaults to `<stem>.gif`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with spin options; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Bilinear,
    Lanczos3,
}

impl From<FilterChoice> for InterpolationFilter {
    fn from(choice: FilterChoice) -> Self {
        match choice {
            FilterChoice::Bilinear => InterpolationFilter::Bilinear,
            FilterChoice::Lanczos3 => InterpolationFilter::Lanczos3,
        }
    }
}

fn parse_center(s: &str) -> Result<PivotOverride, String> {
    s.parse().map_err(|e: whirl_core::WhirlError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Spin(args) => cmd_spin(args),
    }
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_options(path: &Path) -> anyhow::Result<SpinOptions> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let options: SpinOptions =
        serde_json::from_reader(r).with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(options)
}

fn resolve_options(args: &SpinArgs) -> anyhow::Result<SpinOptions> {
    let mut options = match &args.config {
        Some(path) => read_options(path)?,
        None => SpinOptions::default(),
    };
    if let Some(rps) = args.rps {
        options.rotations_per_second = rps;
    }
    if let Some(fps) = args.fps {
        options.frame_rate = fps;
    }
    if let Some(center) = args.center {
        options.center = center;
    }
    if let Some(filter) = args.filter {
        options.filter = filter.into();
    }
    if args.threads.is_some() {
        options.threads = args.threads;
    }
    options.validate()?;
    Ok(options)
}

fn output_path(image: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let stem = image.file_stem().unwrap_or_else(|| OsStr::new("out"));
            Path::new(stem).with_extension("gif")
        }
    }
}

/// Output path for every image, failing if two images would write the same file.
fn plan_outputs(images: &[PathBuf], explicit: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    images
        .iter()
        .map(|image| -> anyhow::Result<PathBuf> {
            let out = output_path(image, explicit);
            if !seen.insert(out.clone()) {
                bail!(
                    "'{}' would overwrite the output of an earlier image: '{}'",
                    image.display(),
                    out.display()
                );
            }
            Ok(out)
        })
        .collect()
}

fn cmd_spin(args: SpinArgs) -> anyhow::Result<()> {
    init_logging(args.debug);

    if args.images.is_empty() {
        bail!("no images specified");
    }
    if args.output.is_some() && args.images.len() > 1 {
        bail!("--output can only be used with a single image");
    }

    let options = resolve_options(&args)?;

    // Reject unsupported inputs before doing any work
    let sources = args
        .images
        .iter()
        .map(|path| -> anyhow::Result<(&PathBuf, SourceFormat)> {
            let format = SourceFormat::from_path(path)?.ensure_supported()?;
            Ok((path, format))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outputs = plan_outputs(&args.images, args.output.as_deref())?;

    for ((path, format), out_path) in sources.into_iter().zip(outputs) {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let image = format
            .decode(&bytes)
            .with_context(|| format!("decode '{}'", path.display()))?;

        let record = whirl_core::spin(&image, &options)
            .with_context(|| format!("spin '{}'", path.display()))?;

        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let out = File::create(&out_path)
            .with_context(|| format!("create '{}'", out_path.display()))?;
        whirl_core::encode_gif(&record, BufWriter::new(out))
            .with_context(|| format!("write gif '{}'", out_path.display()))?;

        tracing::info!(
            source = %path.display(),
            frames = record.len(),
            "wrote {}",
            out_path.display()
        );
    }

    Ok(())
}
