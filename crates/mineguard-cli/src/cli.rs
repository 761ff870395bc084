//! CLI definition using clap

use clap::{Parser, Subcommand};
use mineguard_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mineguard")]
#[command(version)]
#[command(about = "Mine fleet simulator with predictive collision alerts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the simulation
    Run {
        /// Console output only, no network
        #[arg(long)]
        local: bool,

        /// Backend host. Uses config value if not specified.
        #[arg(long)]
        host: Option<String>,

        /// Backend port. Uses config value if not specified.
        #[arg(long)]
        port: Option<u16>,

        /// Stop after this many ticks (default: run until interrupted)
        #[arg(long, short = 'n')]
        ticks: Option<u64>,

        /// Ticks per second; 0 runs as fast as possible
        #[arg(long)]
        rate: Option<f64>,

        /// Scenario file (TOML). Uses config value, then the built-in pit.
        #[arg(long, short = 's')]
        scenario: Option<PathBuf>,
    },

    /// Evaluate a scenario's starting positions once and print the alerts
    Check {
        /// Scenario file (TOML). Uses config value, then the built-in pit.
        #[arg(long, short = 's')]
        scenario: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set backend host
        #[arg(long)]
        set_host: Option<String>,

        /// Set backend port
        #[arg(long)]
        set_port: Option<u16>,

        /// Set tick rate (Hz)
        #[arg(long)]
        set_rate: Option<f64>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default scenario file
        #[arg(long)]
        set_scenario: Option<PathBuf>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
