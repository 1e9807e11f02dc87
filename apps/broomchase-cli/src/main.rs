use std::path::PathBuf;

use broomchase_input::{MotionDirection, Viewport};
use broomchase_kernel::{SimConfig, SimEvent, Simulation};
use broomchase_render::{DebugTextRenderer, RenderView, Renderer};
use broomchase_tools::{SimInspector, describe_event};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Viewport assumed for scripted pointer input.
const VIEWPORT: (u32, u32) = (1280, 720);

#[derive(Parser)]
#[command(name = "broomchase-cli", about = "Headless runner for the broom chase simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML simulation config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the config's RNG seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info,
    /// Step the simulation with scripted input and print the final frame
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Hold the forward key for the whole run
        #[arg(long)]
        forward: bool,
        /// Pointer position in pixels (x,y) on a 1280x720 viewport
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f32, f32)>,
        /// Print a summary line every N ticks (0 disables)
        #[arg(long, default_value = "0")]
        every: u64,
        /// Emit the final frame as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fly straight at the resting snitch and report the catch
    CatchDemo {
        /// Give up after this many ticks
        #[arg(long, default_value = "120")]
        max_ticks: u64,
    },
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<f32>().map_err(|e| e.to_string());
    Ok((parse(x)?, parse(y)?))
}

fn load_config(path: Option<&PathBuf>, seed: Option<u64>) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn viewport() -> Viewport {
    Viewport::new(VIEWPORT.0, VIEWPORT.1)
}

fn print_frame(sim: &Simulation) {
    let frame = sim.snapshot();
    let view = RenderView::from_camera(&frame.camera, VIEWPORT.0 as f32 / VIEWPORT.1 as f32);
    print!("{}", DebugTextRenderer::new().render(&frame, &view));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref(), cli.seed)?;

    match cli.command {
        Commands::Info => {
            println!("broomchase-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            ticks,
            forward,
            pointer,
            every,
            json,
        } => {
            let mut sim = Simulation::new(config, viewport());
            if forward {
                sim.press_motion(MotionDirection::Forward);
            }
            if let Some((x, y)) = pointer {
                sim.pointer_moved(x, y);
            }
            tracing::info!(ticks, seed = config.seed, "running simulation");

            for _ in 0..ticks {
                sim.step();
                for event in sim.drain_events() {
                    tracing::debug!("{}", describe_event(&event));
                }
                if every > 0 && sim.tick() % every == 0 {
                    println!("{}", SimInspector::summary(&sim));
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
            } else {
                print_frame(&sim);
                println!("state hash: {:#018x}", sim.state_hash());
            }
        }
        Commands::CatchDemo { max_ticks } => {
            let mut sim = Simulation::new(config, viewport());
            println!(
                "broom at {:?}, snitch at {:?}",
                sim.broom().position,
                sim.snitch().position
            );
            sim.press_motion(MotionDirection::Forward);

            let mut caught = false;
            for _ in 0..max_ticks {
                sim.step();
                for event in sim.drain_events() {
                    println!("{}", describe_event(&event));
                    if matches!(event, SimEvent::Caught { .. }) {
                        caught = true;
                    }
                }
                if caught {
                    break;
                }
            }
            sim.release_motion(MotionDirection::Forward);

            if caught {
                println!(
                    "caught after {} ticks; snitch resting for {:.1}s",
                    sim.tick(),
                    sim.wander().cooldown()
                );
            } else {
                println!("no catch within {max_ticks} ticks");
            }
            println!("{}", SimInspector::summary(&sim));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pointer_argument() {
        assert_eq!(parse_point("640, 360"), Ok((640.0, 360.0)));
        assert!(parse_point("640").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn seed_override_applies() {
        let config = load_config(None, Some(5)).unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.tick_rate_hz, 60.0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
