//! Where tick reports go: the console, a TCP backend, or memory

use std::io::{self, Stdout, Write};

use mineguard_infra::transport::{encode_batch, FrameSink};
use mineguard_types::{
    AlertSeverity, CollisionAlert, OutputFormat, Result, TelemetryPacket,
};
use tracing::{info, warn};

use crate::simulation::TickReport;

pub trait OutputSink {
    fn emit(&mut self, report: &TickReport) -> Result<()>;
}

/// Keeps every report, for tests and one-shot checks
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<TickReport>,
}

impl OutputSink for MemorySink {
    fn emit(&mut self, report: &TickReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Local mode: a refreshed table per tick, or one JSON batch per line
pub struct ConsoleSink<W = Stdout> {
    out: W,
    format: OutputFormat,
    clear_screen: bool,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self {
            out: io::stdout(),
            format,
            clear_screen: format == OutputFormat::Table,
        }
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Never clears the screen
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            clear_screen: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn emit(&mut self, report: &TickReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = encode_batch(&report.telemetry, &report.alerts)?;
                writeln!(self.out, "{}", line)?;
            }
            OutputFormat::Table => {
                if self.clear_screen {
                    write!(self.out, "\x1b[2J\x1b[H")?;
                }
                writeln!(self.out, "MineGuard - tick {}", report.tick)?;
                writeln!(self.out)?;
                write_telemetry(&mut self.out, &report.telemetry)?;
                write_alerts(&mut self.out, &report.alerts)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Two lines per vehicle: identity and position, then telemetry
pub fn write_telemetry<W: Write>(out: &mut W, packets: &[TelemetryPacket]) -> io::Result<()> {
    for p in packets {
        writeln!(
            out,
            "  {:<8} [{:<12}] {:<10} | Lat: {:10.6}  Lon: {:11.6}  Alt: {:6.1}m",
            p.vehicle_id,
            p.vehicle_type.label(),
            p.cycle_state.label(),
            p.position.latitude,
            p.position.longitude,
            p.position.altitude
        )?;
        writeln!(
            out,
            "  {:8} Speed: {:5.1} km/h  Heading: {:5.1}°  Fuel: {:5.1}%  Payload: {:5.1}t  RPM: {:.0}",
            "",
            p.telemetry.speed,
            p.telemetry.heading,
            p.telemetry.fuel_level,
            p.telemetry.payload,
            p.telemetry.engine_rpm
        )?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_alerts<W: Write>(out: &mut W, alerts: &[CollisionAlert]) -> io::Result<()> {
    if alerts.is_empty() {
        writeln!(out, "  [ALERTS] No active alerts")?;
        return Ok(());
    }

    writeln!(out, "  COLLISION ALERTS")?;
    writeln!(out, "  ----------------")?;
    for a in alerts {
        writeln!(
            out,
            "  {:<8} <-> {:<8}  {:<10}  {:<12}  TTI: {:4.1}s  Dist: {:5.1}m",
            a.vehicle_id_1,
            a.vehicle_id_2,
            a.severity.label(),
            a.class.label(),
            a.time_to_impact,
            a.distance
        )?;
    }
    Ok(())
}

/// Network mode: one length-prefixed batch frame per tick.
///
/// While disconnected, a reconnect is attempted every
/// `reconnect_interval` ticks. Send failures are logged, not fatal.
pub struct TcpSink {
    frames: FrameSink,
    reconnect_interval: u32,
    ticks_disconnected: u32,
}

impl TcpSink {
    /// Tries to connect once up front; failure only logs
    pub fn connect(host: &str, port: u16, reconnect_interval: u32) -> Self {
        let mut frames = FrameSink::new(host, port);
        info!(address = %frames.address(), "connecting to backend");
        if let Err(e) = frames.connect() {
            warn!(error = %e, "initial connection failed, will retry");
        }
        Self {
            frames,
            reconnect_interval: reconnect_interval.max(1),
            ticks_disconnected: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.frames.is_connected()
    }
}

impl OutputSink for TcpSink {
    fn emit(&mut self, report: &TickReport) -> Result<()> {
        if !self.frames.is_connected() {
            self.ticks_disconnected += 1;
            if self.ticks_disconnected >= self.reconnect_interval {
                self.ticks_disconnected = 0;
                info!(address = %self.frames.address(), "attempting reconnection");
                if let Err(e) = self.frames.reconnect() {
                    warn!(error = %e, "reconnection failed");
                }
            }
            return Ok(());
        }

        let json = encode_batch(&report.telemetry, &report.alerts)?;
        if let Err(e) = self.frames.send(json.as_bytes()) {
            warn!(tick = report.tick, error = %e, "send failed");
        }

        let critical = report
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count();
        if critical > 0 {
            warn!(tick = report.tick, critical, "critical proximity alerts");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mineguard_infra::transport::{decode_batch, read_frame};
    use mineguard_types::{AlertClass, CycleState, Position, Telemetry, VehicleCategory};
    use std::net::TcpListener;
    use std::thread;

    fn report() -> TickReport {
        TickReport {
            tick: 7,
            telemetry: vec![TelemetryPacket {
                vehicle_id: "HT-101".to_string(),
                timestamp: 1,
                vehicle_type: VehicleCategory::HaulTruck,
                cycle_state: CycleState::Hauling,
                position: Position::new(-20.122, -43.952, 820.0),
                telemetry: Telemetry::default(),
            }],
            alerts: vec![CollisionAlert {
                vehicle_id_1: "HT-101".to_string(),
                vehicle_id_2: "LV-301".to_string(),
                severity: AlertSeverity::High,
                class: AlertClass::Crossing,
                time_to_impact: 4.5,
                distance: 12.0,
                timestamp: 1,
            }],
        }
    }

    #[test]
    fn test_table_output() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Table);
        sink.emit(&report()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert!(text.contains("tick 7"));
        assert!(text.contains("HT-101   [HaulTruck   ] HAULING"));
        assert!(text.contains("HIGH"));
        assert!(text.contains("CROSSING"));
        assert!(text.contains("TTI:  4.5s"));
        assert!(!text.contains("\x1b[2J"));
    }

    #[test]
    fn test_table_without_alerts() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Table);
        let mut quiet = report();
        quiet.alerts.clear();
        sink.emit(&quiet).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("No active alerts"));
    }

    #[test]
    fn test_json_lines_output() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Json);
        sink.emit(&report()).unwrap();
        sink.emit(&report()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let batch = decode_batch(lines[0]).unwrap();
        assert_eq!(batch.telemetry, report().telemetry);
        assert_eq!(batch.alerts, report().alerts);
    }

    #[test]
    fn test_tcp_sink_sends_batches() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            read_frame(&mut conn).unwrap()
        });

        let mut sink = TcpSink::connect("127.0.0.1", port, 5);
        assert!(sink.is_connected());
        sink.emit(&report()).unwrap();

        let frame = server.join().unwrap();
        let batch = decode_batch(std::str::from_utf8(&frame).unwrap()).unwrap();
        assert_eq!(batch.alerts.len(), 1);
    }

    #[test]
    fn test_tcp_sink_tolerates_missing_backend() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut sink = TcpSink::connect("127.0.0.1", port, 2);
        assert!(!sink.is_connected());
        for _ in 0..4 {
            sink.emit(&report()).unwrap();
        }
        assert!(!sink.is_connected());
    }
}
