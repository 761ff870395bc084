//! Output formatting module

use std::io::{self, Write};

use mineguard_app::sink::{write_alerts, write_telemetry};
use mineguard_domain::service::Fleet;
use mineguard_types::{CollisionAlert, FixedClock, OutputFormat, Result};

/// Print the result of a one-shot proximity check
pub fn output_check(
    output_format: OutputFormat,
    fleet: &Fleet,
    alerts: &[CollisionAlert],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(alerts)?;
        println!("{}", content);
    } else {
        // Table format
        let mut out = io::stdout().lock();
        writeln!(out, "\nProximity Check")?;
        writeln!(out, "===============")?;
        writeln!(out, "Vehicles: {}", fleet.len())?;
        writeln!(out, "Alerts:   {}\n", alerts.len())?;

        // Timestamps are not shown in the table
        write_telemetry(&mut out, &fleet.collect_telemetry(&FixedClock(0)))?;
        write_alerts(&mut out, alerts)?;
    }

    Ok(())
}
