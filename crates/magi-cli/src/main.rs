//! MAGI CLI - drive the effects runtime from a terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, probe, rain, simulate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "magi")]
#[command(about = "Headless host for the MAGI terminal effects runtime", long_about = None)]
#[command(version)]
struct Cli {
    /// Read configuration from this file instead of the usual layers
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the performance tier and effect budget for a device
    Probe {
        /// Phone/tablet class device
        #[arg(long)]
        mobile: bool,

        /// Touch is the primary input
        #[arg(long)]
        touch: bool,

        /// Device memory in GB
        #[arg(long)]
        memory: Option<f32>,

        /// Logical core count
        #[arg(long)]
        cores: Option<u32>,

        /// Prefer reduced motion
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Run a stage against a simulated display and print its report
    Simulate {
        /// Simulated duration in seconds
        #[arg(long, default_value = "2")]
        seconds: f64,

        /// Display refresh rate in Hz
        #[arg(long, default_value = "60")]
        refresh_hz: f64,

        /// Hide the page at this many seconds
        #[arg(long)]
        hide_at: Option<f64>,

        /// Show the page again at this many seconds
        #[arg(long)]
        show_at: Option<f64>,

        /// Keep the matrix rain on the main thread
        #[arg(long)]
        no_worker: bool,
    },

    /// Print the resolved configuration as TOML
    Config,

    /// Render the matrix rain and print the last frame as text
    Rain {
        /// Canvas width in pixels
        #[arg(long, default_value = "640")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "320")]
        height: u32,

        /// Frames to draw
        #[arg(long, default_value = "60")]
        ticks: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,magi=info")).init();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Probe {
            mobile,
            touch,
            memory,
            cores,
            reduced_motion,
        } => probe::run(probe::ProbeArgs {
            mobile,
            touch,
            memory,
            cores,
            reduced_motion,
        }),
        Commands::Simulate {
            seconds,
            refresh_hz,
            hide_at,
            show_at,
            no_worker,
        } => simulate::run(
            config_path,
            simulate::SimulateArgs {
                seconds,
                refresh_hz,
                hide_at,
                show_at,
                no_worker,
            },
        ),
        Commands::Config => config::run(config_path),
        Commands::Rain { width, height, ticks } => rain::run(config_path, width, height, ticks),
    }
}
