use anyhow::{bail, Context, Result};
use clap::Parser;
use doom_fire_core::{render_rgb, FireConfig, FireSimulation, FireType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Characters used for the ASCII preview, coldest first.
const PREVIEW_RAMP: &[u8] = b" .:-=+*#%@";

/// Doom fire demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "doom-fire-demo")]
#[command(about = "Headless doom fire simulation demo", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 180)]
    height: usize,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Seed for reproducible runs (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fire type name, or "random" (overrides the config file)
    #[arg(short = 'f', long)]
    fire_type: Option<String>,

    /// Config file (default: ~/.config/doom-fire/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pixel upscale factor for the PNG output
    #[arg(long, default_value_t = 4)]
    scale: usize,

    /// Write the final frame as PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print an ASCII preview of the final grid
    #[arg(short, long)]
    preview: bool,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 100)]
    report_interval: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("doom_fire_core=info".parse()?))
        .init();

    let args = Args::parse();

    println!("=== Doom Fire Demo ===\n");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(name) = &args.fire_type {
        config.fire_type = parse_fire_type(name, config.seed)?;
    }

    let mut fire = FireSimulation::with_config(args.width, args.height, config)?;
    println!(
        "Created {}x{} fire ({}), {} ticks",
        fire.width(),
        fire.height(),
        fire.fire_type(),
        args.ticks
    );

    let interval = args.report_interval.max(1);
    for tick in 1..=args.ticks {
        fire.tick();
        if tick % interval == 0 {
            report(&fire);
        }
    }

    if args.preview {
        print_preview(&fire);
    }

    if let Some(path) = &args.output {
        write_png(&fire, args.scale, path)?;
        println!("Wrote final frame to {}", path.display());
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it doesn't exist.
fn load_config(explicit: Option<&Path>) -> Result<FireConfig> {
    let path = if let Some(path) = explicit {
        path.to_path_buf()
    } else {
        let Some(dir) = dirs::config_dir() else {
            warn!("No config directory found, using defaults");
            return Ok(FireConfig::default());
        };
        dir.join("doom-fire").join("config.toml")
    };

    if !path.exists() {
        if explicit.is_some() {
            bail!("Config file {} does not exist", path.display());
        }
        info!("No config at {}, using defaults", path.display());
        return Ok(FireConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: FireConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve a fire type name, picking one at random for `"random"`.
fn parse_fire_type(name: &str, seed: Option<u64>) -> Result<FireType> {
    if name.eq_ignore_ascii_case("random") {
        let picked = match seed {
            Some(seed) => FireType::random(&mut StdRng::seed_from_u64(seed)),
            None => FireType::random(&mut rand::rng()),
        };
        info!("Random fire type selected: {picked}");
        return Ok(picked);
    }
    Ok(name.parse::<FireType>()?)
}

/// Print mean intensity for a handful of rows, bottom to top.
fn report(fire: &FireSimulation) {
    let height = fire.height();
    let samples = 6.min(height);
    let mut line = format!(
        "tick {:>5} | t={:>6.2} wind={:>+2} sparks={:>3} | mean heat:",
        fire.tick_count(),
        fire.time(),
        fire.wind(),
        fire.sparks().len()
    );
    for i in 0..samples {
        let y = height - 1 - i * (height - 1) / samples.max(1);
        let Some(row) = fire.row(y) else {
            continue;
        };
        let mean = row.iter().map(|&v| f64::from(v)).sum::<f64>() / row.len() as f64;
        let _ = write!(line, " y{y}={mean:.1}");
    }
    println!("{line}");
}

/// Downsampled ASCII rendering of the grid.
fn print_preview(fire: &FireSimulation) {
    let max = f64::from(fire.palette().max_level());
    let step_x = (fire.width() / 80).max(1);
    let step_y = (fire.height() / 40).max(1);
    println!();
    for y in (0..fire.height()).step_by(step_y) {
        let line: String = (0..fire.width())
            .step_by(step_x)
            .map(|x| {
                let level = f64::from(fire.cell(x, y).unwrap_or(0));
                let idx = (level / max * (PREVIEW_RAMP.len() - 1) as f64).round() as usize;
                char::from(PREVIEW_RAMP[idx.min(PREVIEW_RAMP.len() - 1)])
            })
            .collect();
        println!("{line}");
    }
    println!();
}

fn write_png(fire: &FireSimulation, scale: usize, path: &Path) -> Result<()> {
    let scale = scale.max(1);
    let pixels = render_rgb(fire, scale);
    let width = u32::try_from(fire.width() * scale).context("frame too wide")?;
    let height = u32::try_from(fire.height() * scale).context("frame too tall")?;
    let frame = image::RgbImage::from_raw(width, height, pixels)
        .context("pixel buffer does not match frame size")?;
    frame
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
