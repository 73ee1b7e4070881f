//! Headless tour player: loads a route document and a boundary GeoJSON,
//! drives the engine on a fixed frame clock and prints status transitions.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use engine::{GlobeHost, Phase};
use runtime::frame::FrameClock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "player", about = "Replay a trade route tour without a renderer")]
struct Args {
    /// Route JSON document (array of stop records).
    route: PathBuf,

    /// Boundary GeoJSON FeatureCollection.
    boundaries: PathBuf,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Give up after this much simulated time.
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("player: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let boundaries = fs::read_to_string(&args.boundaries)?;
    let route = fs::read_to_string(&args.route)?;

    let mut host = GlobeHost::new();
    host.provide_boundaries(&boundaries)?;
    host.provide_route_json(&route);

    let mut clock = FrameClock::new(1.0 / args.fps);
    let max_frames = (args.max_seconds * args.fps).ceil() as u64;
    let mut last_status = String::new();

    for _ in 0..max_frames {
        let frame = clock.tick();
        host.tick(frame);

        if host.status() != last_status {
            let (index, count) = host.progress();
            println!(
                "[{:>7.2}s] {}  ({}/{})",
                frame.time.0,
                host.status(),
                index + 1,
                count.max(1)
            );
            last_status = host.status().to_string();
        }

        if host.phase() == Phase::Done {
            info!(frames = frame.index + 1, "tour finished");
            return Ok(());
        }
    }

    // A rejected route never leaves Loading; surface whatever the engine
    // last reported.
    Err(format!("tour incomplete after {:.0}s: {}", args.max_seconds, host.status()).into())
}
