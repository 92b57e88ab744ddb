//! Headless host for the casualty timeline
//!
//! Loads a sheet export, drives the frame loop for a fixed number of frames
//! and optionally dumps the label overlay state as JSON.

use anyhow::Context;
use clap::Parser;
use std::fs;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use casualty_timeline::core::{OrbitControls, Viewport};
use casualty_timeline::ingest;
use casualty_timeline::timeline::MemoryLabelSurface;
use casualty_timeline::{Timeline, TimelineConfig};

#[derive(Parser, Debug)]
#[command(name = "casualty-timeline")]
#[command(about = "Animate incident records as stacked casualty discs")]
struct Args {
    /// Sheet values JSON (`{"values": [[timestamp, deaths, injuries], ...]}`)
    #[arg(short, long)]
    data: String,

    /// Configuration file, created with defaults if missing
    #[arg(short, long, default_value = "config/timeline.json")]
    config: String,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Print the label overlay as JSON after the last frame
    #[arg(long)]
    dump: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = log_filter(args.verbose, std::env::var("RUST_LOG").ok());
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = TimelineConfig::load_or_default(&args.config);
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let payload = fs::read_to_string(&args.data)
        .with_context(|| format!("reading {}", args.data))?;
    let records = ingest::parse_sheet_values(&payload)?;
    info!("Loaded {} records from {}", records.len(), args.data);

    let viewport = Viewport::new(args.width, args.height);
    let mut controls = OrbitControls::from_config(&config.camera, viewport.aspect());
    let mut surface = MemoryLabelSurface::new();
    let mut timeline = Timeline::new(&records, config, viewport, &mut surface);

    let mut collisions = 0;
    for _ in 0..args.frames {
        let stats = timeline.frame(&mut controls, &mut surface);
        collisions += stats.collisions;
        if stats.frame % 60 == 0 {
            tracing::debug!(
                "frame {} | distance={:.1} | description={:.2} | collisions={}",
                stats.frame,
                stats.camera_distance,
                stats.description_opacity,
                stats.collisions
            );
        }
    }

    let batch = timeline.render_batch(&controls);
    info!(
        "Simulated {} frames: {} collisions, {} instances ({} bytes) ready to draw",
        timeline.frame_count(),
        collisions,
        batch.len(),
        batch.as_bytes().len()
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&surface)?);
    }

    Ok(())
}

/// RUST_LOG directives win over --verbose when set and valid
fn log_filter(verbose: bool, directives: Option<String>) -> EnvFilter {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}
