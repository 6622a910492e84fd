//! floatwin - edge-snapping overlay engine
//!
//! Command-line front end for simulating overlay drags against an in-memory
//! window host.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use floatwin::config::{self, Config};
use floatwin::host::RecordingHost;
use floatwin::manager::OverlayManager;
use floatwin::overlay::{MoveDirection, OverlayContent, MOVE_THRESHOLD_DP, MOVE_TO_EDGE_DURATION, MOVE_TO_EDGE_OVERSHOOT_TENSION};
use floatwin::runtime::{OverlayRuntime, RuntimeEvent, DEFAULT_FRAME_INTERVAL};
use floatwin::PointerEvent;

/// floatwin - draggable overlays that snap to screen edges
#[derive(Parser)]
#[command(name = "floatwin")]
#[command(version = "0.1.0")]
#[command(about = "Simulate draggable always-on-top overlays", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drag one overlay across a simulated screen and report where it rests
    Simulate {
        /// Pointer press position, as x,y
        #[arg(long, value_parser = parse_point, default_value = "0,0")]
        from: (f32, f32),

        /// Pointer release position, as x,y
        #[arg(long, value_parser = parse_point)]
        to: (f32, f32),

        /// Number of move events between press and release
        #[arg(long, default_value_t = 10)]
        steps: u32,

        /// Override the configured snap direction (default, left, right, none)
        #[arg(short, long)]
        direction: Option<MoveDirection>,

        /// Print the host call log as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show engine constants
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            from,
            to,
            steps,
            direction,
            json,
        } => {
            run_simulation(config, from, to, steps, direction, json).await?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Info => {
            print_engine_info(&config);
        }
    }

    Ok(())
}

/// Content with a fixed size that logs taps
struct DemoBubble {
    size: (u32, u32),
}

impl OverlayContent for DemoBubble {
    fn preferred_size(&self) -> (u32, u32) {
        self.size
    }

    fn perform_click(&mut self) {
        info!("overlay tapped");
    }
}

async fn run_simulation(
    config: Config,
    from: (f32, f32),
    to: (f32, f32),
    steps: u32,
    direction: Option<MoveDirection>,
    json: bool,
) -> anyhow::Result<()> {
    let host = RecordingHost::new(config.screen.metrics(), config.screen.system_bars());
    let manager = OverlayManager::new(host).with_tuning(config.tuning());
    let mut runtime = OverlayRuntime::spawn(manager, config.frame_interval());
    let mut events = runtime
        .take_event_receiver()
        .context("runtime event receiver already taken")?;
    let handle = runtime.handle();

    let mut overlay = config.overlay.clone();
    if let Some(direction) = direction {
        overlay.move_direction = direction;
    }
    let id = handle
        .add_overlay(Box::new(DemoBubble { size: (200, 200) }), overlay)
        .await?;

    let settle = config.tuning().snap_duration + config.frame_interval() * 4;
    tokio::time::sleep(settle).await;

    info!(overlay = %id, ?from, ?to, steps, "replaying drag");
    handle
        .dispatch_pointer_event(id, PointerEvent::down(from.0, from.1, 0.0, 0.0))
        .await?;
    let steps = steps.max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        handle.dispatch_pointer_event(id, PointerEvent::moved(x, y)).await?;
        tokio::time::sleep(config.frame_interval()).await;
    }
    handle.dispatch_pointer_event(id, PointerEvent::up(to.0, to.1)).await?;
    tokio::time::sleep(settle).await;

    let manager = runtime.shutdown().await?;
    while let Ok(event) = events.try_recv() {
        match event {
            RuntimeEvent::Failure(e) => tracing::warn!("{}", e),
            RuntimeEvent::AllOverlaysRemoved => info!("all overlays removed"),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(manager.host().calls())?);
        return Ok(());
    }

    let engine = manager.overlay(id).context("overlay vanished during simulation")?;
    let position = engine.position();
    let limit = engine.bounds().position_limit;
    println!("Overlay {} resting at ({}, {})", id, position.x, position.y);
    println!(
        "Resting area: x {}..={}, y {}..={}",
        limit.left, limit.right, limit.top, limit.bottom
    );
    println!("Host updates: {}", manager.host().positions(id).len());
    Ok(())
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok((x, y))
}

fn print_engine_info(config: &Config) {
    println!("floatwin Engine Information");
    println!("===========================\n");

    println!("Move threshold: {} dp", MOVE_THRESHOLD_DP);
    println!("Snap duration: {} ms", MOVE_TO_EDGE_DURATION.as_millis());
    println!("Overshoot tension: {}", MOVE_TO_EDGE_OVERSHOOT_TENSION);
    println!("Frame interval: {} ms", DEFAULT_FRAME_INTERVAL.as_millis());

    let tuning = config.tuning();
    println!("\nConfigured:");
    println!("  Move threshold: {} dp", tuning.move_threshold_dp);
    println!("  Snap duration: {} ms", tuning.snap_duration.as_millis());
    println!("  Overshoot tension: {}", tuning.overshoot_tension);
    println!("  Frame interval: {} ms", config.frame_interval().as_millis());

    let metrics = config.screen.metrics();
    println!(
        "\nSimulated screen: {}x{} @ {}x ({})",
        metrics.width,
        metrics.height,
        metrics.density,
        if metrics.is_portrait() { "portrait" } else { "landscape" }
    );
    println!("Default move direction: {:?}", config.overlay.move_direction);
}
