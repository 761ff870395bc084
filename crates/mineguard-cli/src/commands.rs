//! Command handlers

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use mineguard_app::config::Config;
use mineguard_app::repository::open_fleet;
use mineguard_app::simulation::Simulation;
use mineguard_app::sink::{ConsoleSink, OutputSink, TcpSink};
use mineguard_domain::service::ProximityEngine;
use mineguard_types::{OutputFormat, Result};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::output::output_check;
use crate::shutdown;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Run {
            local,
            host,
            port,
            ticks,
            rate,
            scenario,
        } => {
            let host = host.clone().unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let rate = rate.unwrap_or(config.tick_rate_hz);
            if *local {
                let sink = ConsoleSink::stdout(output_format);
                cmd_run(&config, scenario.as_deref(), sink, *ticks, rate)
            } else {
                let sink = TcpSink::connect(&host, port, config.reconnect_interval_ticks);
                cmd_run(&config, scenario.as_deref(), sink, *ticks, rate)
            }
        }

        Commands::Check { scenario } => cmd_check(&config, scenario.as_deref(), output_format),

        Commands::Config {
            show,
            set_host,
            set_port,
            set_rate,
            set_output,
            set_scenario,
            reset,
        } => cmd_config(
            *show,
            set_host.clone(),
            *set_port,
            *set_rate,
            *set_output,
            set_scenario.clone(),
            *reset,
        ),
    }
}

fn cmd_run<S: OutputSink>(
    config: &Config,
    scenario: Option<&Path>,
    sink: S,
    ticks: Option<u64>,
    rate: f64,
) -> Result<()> {
    let fleet = open_fleet(config, scenario)?;
    let mut simulation = Simulation::new(fleet, sink, config.delta_time);

    let stop = Arc::new(AtomicBool::new(false));
    shutdown::watch(Arc::clone(&stop))?;
    let ran = simulation.run(ticks, rate, &stop)?;

    info!("Shutting down after {} ticks", ran);
    Ok(())
}

fn cmd_check(config: &Config, scenario: Option<&Path>, output_format: OutputFormat) -> Result<()> {
    let fleet = open_fleet(config, scenario)?;
    let alerts = ProximityEngine::new().evaluate(fleet.vehicles());
    output_check(output_format, &fleet, &alerts)
}

fn cmd_config(
    show: bool,
    set_host: Option<String>,
    set_port: Option<u16>,
    set_rate: Option<f64>,
    set_output: Option<OutputFormat>,
    set_scenario: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(host) = set_host {
        config.host = host;
        modified = true;
    }

    if let Some(port) = set_port {
        config.port = port;
        modified = true;
    }

    if let Some(rate) = set_rate {
        config.tick_rate_hz = rate;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(path) = set_scenario {
        config.scenario_path = Some(path);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
