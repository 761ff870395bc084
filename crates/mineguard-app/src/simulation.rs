//! Tick driver
//!
//! One tick runs, in order: fleet update, telemetry collection, proximity
//! evaluation, sink output. [`Simulation::run`] is the only place that waits
//! on the wall clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use mineguard_domain::service::{Fleet, ProximityEngine};
use mineguard_types::{Clock, CollisionAlert, Result, SystemClock, TelemetryPacket};
use serde::Serialize;
use tracing::{debug, info};

use crate::sink::OutputSink;

/// Everything produced by one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// 1-based
    pub tick: u64,
    pub telemetry: Vec<TelemetryPacket>,
    pub alerts: Vec<CollisionAlert>,
}

pub struct Simulation<S, C = SystemClock> {
    fleet: Fleet,
    engine: ProximityEngine<C>,
    clock: C,
    sink: S,
    delta_time: f64,
    tick: u64,
}

impl<S: OutputSink> Simulation<S, SystemClock> {
    pub fn new(fleet: Fleet, sink: S, delta_time: f64) -> Self {
        Self::with_clock(fleet, sink, delta_time, SystemClock)
    }
}

impl<S: OutputSink, C: Clock + Clone> Simulation<S, C> {
    pub fn with_clock(fleet: Fleet, sink: S, delta_time: f64, clock: C) -> Self {
        Self {
            fleet,
            engine: ProximityEngine::with_clock(clock.clone()),
            clock,
            sink,
            delta_time,
            tick: 0,
        }
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Run a single tick and hand the result to the sink
    pub fn tick(&mut self) -> Result<TickReport> {
        self.fleet.update(self.delta_time);

        let telemetry = self.fleet.collect_telemetry(&self.clock);
        let alerts = self.engine.evaluate(self.fleet.vehicles());

        self.tick += 1;
        let report = TickReport {
            tick: self.tick,
            telemetry,
            alerts,
        };
        debug!(tick = report.tick, alerts = report.alerts.len(), "tick");

        self.sink.emit(&report)?;
        Ok(report)
    }

    /// Tick at `rate_hz` until `max_ticks` is reached or `stop` is set.
    ///
    /// A non-positive rate runs ticks back to back. Returns the number of
    /// ticks run by this call.
    pub fn run(&mut self, max_ticks: Option<u64>, rate_hz: f64, stop: &AtomicBool) -> Result<u64> {
        let period = if rate_hz > 0.0 && rate_hz.is_finite() {
            Duration::from_secs_f64(1.0 / rate_hz)
        } else {
            Duration::ZERO
        };

        info!(
            vehicles = self.fleet.len(),
            rate_hz,
            dt = self.delta_time,
            "simulation started"
        );

        let mut ran = 0;
        while !stop.load(Ordering::Relaxed) {
            if max_ticks.is_some_and(|max| ran >= max) {
                break;
            }

            let started = Instant::now();
            self.tick()?;
            ran += 1;

            let elapsed = started.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }

        info!(ticks = ran, "simulation stopped");
        Ok(ran)
    }
}
