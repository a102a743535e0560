use clap::{Parser, Subcommand};
use instafit::config::{self, AppConfig};
use instafit::imaging::Sampling;
use instafit::output::{self, ComposeReport};
use instafit::{Compositor, ExportFormat, FitMode, InputEvent, Rgb, Session};
use std::io::Read;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "instafit")]
#[command(about = "Fit a photo onto a 1080x1350 portrait canvas")]
#[command(long_about = "\
Fit a photo onto a 1080x1350 portrait canvas

The image starts centered in contain mode (fully visible, margins filled
with the background color). Adjust it with:

  --mode none|cover|contain   fit policy (cover fills the canvas and crops)
  --scale 0.1..3.0            zoom on top of the fit mode
  --offset DX,DY              move the image, in canvas pixels
  --bg #rrggbb | --auto-bg    margin color, picked or averaged from the
                              image's outer edge

The result is written as instagram-1080x1350.png (or .jpg with
--format jpeg) into the output directory.

Defaults come from instafit.toml in the --config directory.
Run 'instafit gen-config' to print a documented one.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing instafit.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Print debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct ComposeArgs {
    /// Image to place; "-" reads from stdin
    input: PathBuf,

    /// Fit mode: none, cover or contain
    #[arg(long)]
    mode: Option<FitMode>,

    /// Zoom factor (snapped to the configured zoom range)
    #[arg(long)]
    scale: Option<f64>,

    /// Background color as #rrggbb or #rgb
    #[arg(long, conflicts_with = "auto_bg")]
    bg: Option<Rgb>,

    /// Use the average color of the image's edge pixels as background
    #[arg(long)]
    auto_bg: bool,

    /// Move the image by DX,DY canvas pixels, e.g. --offset=-40,120
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    offset: Option<(f64, f64)>,

    /// Export format: png or jpeg
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Output directory (overrides export.output_dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Use nearest-neighbour sampling instead of bilinear
    #[arg(long)]
    nearest: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Place an image on the canvas and export it
    Compose(ComposeArgs),
    /// Print the average edge color of an image as #rrggbb
    Sample {
        /// Image to sample; "-" reads from stdin
        input: PathBuf,
    },
    /// Print a stock instafit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compose(args) => {
            let config = config::load_config(&cli.config)?;
            compose(&config, args)?;
        }
        Command::Sample { input } => {
            let bytes = read_input(&input)?;
            let mut compositor = Compositor::new();
            compositor.load_image(&bytes)?;
            if let Some(color) = compositor.sample_edge_background() {
                output::print_sample(color);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Run one compose: load, apply adjustments in UI order, export, report.
fn compose(config: &AppConfig, args: ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = config.compositor_settings();
    if args.nearest {
        settings.sampling = Sampling::Nearest;
    }
    let mut session = Session::new(Compositor::with_settings(settings));

    let bytes = read_input(&args.input)?;
    session.handle(InputEvent::FilePicked(Some(bytes)))?;

    if let Some(mode) = args.mode {
        session.handle(InputEvent::FitModeSelected(mode))?;
    }
    if let Some(scale) = args.scale {
        session.handle(InputEvent::ZoomInput(scale))?;
    }
    if let Some(color) = args.bg {
        session.handle(InputEvent::BackgroundPicked(color))?;
    }
    if args.auto_bg {
        session.handle(InputEvent::AutoBackground)?;
    }
    if let Some((dx, dy)) = args.offset {
        // Same path a mouse drag takes: grab the center, release it moved.
        let (cx, cy) = session.compositor().view().center();
        session.handle(InputEvent::PointerDown { x: cx, y: cy })?;
        session.handle(InputEvent::PointerMove {
            x: cx + dx,
            y: cy + dy,
        })?;
        session.handle(InputEvent::PointerUp)?;
    }

    let format = args.format.unwrap_or(config.export.format);
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.export.output_dir));

    let compositor = session.compositor();
    let path = compositor.export_to(&out_dir, format)?;
    let written = std::fs::metadata(&path)?.len();
    output::print_compose_report(&ComposeReport::from_compositor(compositor, path, written));
    Ok(())
}

/// Read image bytes from a file, or from stdin for `-`.
fn read_input(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().lock().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        std::fs::read(path)
    }
}

/// Parse `DX,DY` into a pair of canvas-pixel offsets.
fn parse_offset(s: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("invalid offset component '{v}'"))
    };
    Ok((parse(dx)?, parse(dy)?))
}
