use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use soupsim::{NoiseKind, SimConfig, SimulationState};

pub use view::View;
mod view;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with run settings, flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    cols: Option<usize>,

    /// Number of frames to simulate
    #[arg(short, long)]
    frames: Option<usize>,

    /// Frames per second
    #[arg(short, long)]
    speed: Option<f64>,

    /// One of uniform, gaussian, salt_and_pepper
    #[arg(short, long)]
    noise: Option<NoiseKind>,

    /// Alive probability
    #[arg(short)]
    p: Option<f64>,

    /// Standard deviation of gaussian noise
    #[arg(long)]
    std: Option<f64>,

    /// Share of pepper in salt and pepper noise
    #[arg(long)]
    salt_vs_pepper: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Print one `frame<TAB>changes` line per frame instead of drawing
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn into_config(self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(kind) = self.noise {
            config.noise.kind = kind;
        }
        if let Some(p) = self.p {
            config.noise.p = p;
        }
        if let Some(std) = self.std {
            config.noise.std = std;
        }
        if let Some(salt_vs_pepper) = self.salt_vs_pepper {
            config.noise.salt_vs_pepper = salt_vs_pepper;
        }
        if self.seed.is_some() {
            config.noise.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let headless = args.headless;
    let config = args.into_config()?;

    let state = SimulationState::from_noise(config.size()?, config.noise.clone(), config.frames)?;
    let frames = state.into_frames();

    if headless {
        for frame in frames {
            println!("{}\t{}", frame.index, frame.diagnostic);
        }
        return Ok(());
    }

    View::spawn(frames, config.frame_interval()).join()
}
