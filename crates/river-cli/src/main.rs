//! River CLI - headless driver for the river editor

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, sample, simulate};

#[derive(Parser)]
#[command(name = "river")]
#[command(about = "Interactive Bezier river editor, driven headlessly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the editor for a number of frames and report its state as JSON
    Simulate {
        /// Path to a river.toml config file
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Fixed frame time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,

        /// Window width in pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Window height in pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Control point to drag (index into the initial layout)
        #[arg(long)]
        drag: Option<usize>,

        /// Drag destination (comma-separated x,y,z in world units)
        #[arg(long, value_parser = parse_vec3, requires = "drag")]
        to: Option<[f32; 3]>,

        /// Flow-speed increase presses before the first frame
        #[arg(long, default_value = "0")]
        flow_up: u32,

        /// Flow-speed decrease presses before the first frame
        #[arg(long, default_value = "0")]
        flow_down: u32,

        /// Seconds to hold the width key (negative narrows)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        widen: f32,

        /// Post-process cycle presses before the first frame
        #[arg(long, default_value = "0")]
        cycle: u32,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Sample the river curve and print the samples as JSON
    Sample {
        /// Path to a river.toml config file
        #[arg(long)]
        config: Option<String>,

        /// Control point (repeatable, comma-separated x,y,z); defaults to the initial layout
        #[arg(long = "point", value_parser = parse_vec3)]
        points: Vec<[f32; 3]>,

        /// Number of samples from t = 0 to t = 1
        #[arg(long, default_value = "30")]
        count: usize,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to a river.toml config file
        #[arg(long)]
        config: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            dt,
            width,
            height,
            drag,
            to,
            flow_up,
            flow_down,
            widen,
            cycle,
            pretty,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            dt,
            width,
            height,
            drag,
            to,
            flow_up,
            flow_down,
            widen,
            cycle,
            pretty,
        }),
        Commands::Sample {
            config,
            points,
            count,
        } => sample::run(config.as_deref(), &points, count),
        Commands::Config { config, output } => config::run(config.as_deref(), output.as_deref()),
    }
}
