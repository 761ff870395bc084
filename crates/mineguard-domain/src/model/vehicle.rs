//! Per-vehicle kinematic model
//!
//! A [`Vehicle`] owns its physical state and is advanced by a fixed time
//! delta every tick. Position prediction is a pure constant-velocity
//! extrapolation and never touches stored state.

use mineguard_types::{Clock, CycleState, Position, Telemetry, TelemetryPacket, VehicleCategory};

use crate::model::CategorySpec;
use crate::service::geo::{self, KMH_TO_MS, NEGLIGIBLE_SPEED_MS};

/// m/s²
pub const ACCEL_RATE: f64 = 2.0;
/// m/s²
pub const BRAKE_RATE: f64 = 4.0;
/// Speed differences below this (m/s) are left alone
const SPEED_DEAD_BAND: f64 = 0.01;
/// Up to 30% top-speed reduction at full rated payload
const PAYLOAD_DERATE: f64 = 0.3;
const IDLE_RPM: f64 = 800.0;
const RPM_SPAN: f64 = 1400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: String,
    category: VehicleCategory,
    spec: CategorySpec,
    cycle_state: CycleState,
    position: Position,
    telemetry: Telemetry,
    target_speed: f64,
    active: bool,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, category: VehicleCategory, start: Position) -> Self {
        Self::with_spec(id, category, CategorySpec::for_category(category), start)
    }

    /// Build with an explicit spec, e.g. [`CategorySpec::FALLBACK`]
    pub fn with_spec(
        id: impl Into<String>,
        category: VehicleCategory,
        spec: CategorySpec,
        start: Position,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            spec,
            cycle_state: CycleState::Idle,
            position: start,
            telemetry: Telemetry::default(),
            target_speed: 0.0,
            active: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn spec(&self) -> &CategorySpec {
        &self.spec
    }

    pub fn cycle_state(&self) -> CycleState {
        self.cycle_state
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn speed(&self) -> f64 {
        self.telemetry.speed
    }

    pub fn heading(&self) -> f64 {
        self.telemetry.heading
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    pub fn safety_radius(&self) -> f64 {
        self.spec.safety_radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the physical state by `dt` seconds.
    ///
    /// Inactive vehicles and non-positive (or non-finite) `dt` leave the
    /// state untouched.
    pub fn advance(&mut self, dt: f64) {
        if !self.active || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.update_speed(dt);
        self.apply_payload_effects();
        self.update_position(dt);
        self.update_fuel(dt);

        let speed_ratio = self.speed_ratio();
        self.telemetry.engine_rpm = IDLE_RPM + speed_ratio * RPM_SPAN;
    }

    /// Where this vehicle will be `seconds_ahead` from now at its current
    /// speed and heading. Stationary vehicles stay where they are.
    pub fn predict_position(&self, seconds_ahead: f64) -> Position {
        geo::project(
            &self.position,
            self.telemetry.speed,
            self.telemetry.heading,
            seconds_ahead,
        )
    }

    /// Clamped to `[0, max_speed]`
    pub fn set_target_speed(&mut self, speed: f64) {
        self.target_speed = self.clamp_speed(speed);
    }

    /// Overwrite the current speed (clamped to `[0, max_speed]`), used when
    /// a snapshot is injected rather than integrated
    pub fn set_speed(&mut self, speed: f64) {
        self.telemetry.speed = self.clamp_speed(speed);
    }

    /// Normalized into `[0, 360)`
    pub fn set_heading(&mut self, heading: f64) {
        self.telemetry.heading = geo::normalize_heading(heading);
    }

    /// Clamped to `[0, max_payload]`
    pub fn set_payload(&mut self, tonnes: f64) {
        self.telemetry.payload = if tonnes.is_nan() {
            0.0
        } else {
            tonnes.clamp(0.0, self.spec.max_payload)
        };
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_cycle_state(&mut self, state: CycleState) {
        self.cycle_state = state;
    }

    /// Build the outbound telemetry record stamped with `clock`
    pub fn telemetry_packet(&self, clock: &impl Clock) -> TelemetryPacket {
        TelemetryPacket {
            vehicle_id: self.id.clone(),
            timestamp: clock.now_millis(),
            vehicle_type: self.category,
            cycle_state: self.cycle_state,
            position: self.position,
            telemetry: self.telemetry,
        }
    }

    fn clamp_speed(&self, speed: f64) -> f64 {
        if speed.is_nan() {
            return 0.0;
        }
        speed.clamp(0.0, self.spec.max_speed)
    }

    fn speed_ratio(&self) -> f64 {
        if self.spec.max_speed > 0.0 {
            self.telemetry.speed / self.spec.max_speed
        } else {
            0.0
        }
    }

    fn update_speed(&mut self, dt: f64) {
        let mut current_ms = self.telemetry.speed * KMH_TO_MS;
        let target_ms = self.target_speed * KMH_TO_MS;
        let diff = target_ms - current_ms;

        if diff.abs() <= SPEED_DEAD_BAND {
            return;
        }

        if diff > 0.0 {
            current_ms = (current_ms + ACCEL_RATE * dt).min(target_ms);
        } else {
            current_ms = (current_ms - BRAKE_RATE * dt).max(target_ms);
        }

        self.telemetry.speed = current_ms.max(0.0) / KMH_TO_MS;
    }

    /// Loaded haulers lose top speed linearly with load
    fn apply_payload_effects(&mut self) {
        if self.spec.max_payload <= 0.0 || self.telemetry.payload <= 0.0 {
            return;
        }

        let load_ratio = self.telemetry.payload / self.spec.max_payload;
        let effective_max = self.spec.max_speed * (1.0 - PAYLOAD_DERATE * load_ratio);

        if self.target_speed > effective_max {
            self.target_speed = effective_max;
        }
    }

    fn update_position(&mut self, dt: f64) {
        let speed_ms = self.telemetry.speed * KMH_TO_MS;
        if speed_ms < NEGLIGIBLE_SPEED_MS {
            return;
        }
        self.position = geo::displace(&self.position, speed_ms * dt, self.telemetry.heading);
    }

    fn update_fuel(&mut self, dt: f64) {
        if self.telemetry.speed < 0.1 && self.cycle_state == CycleState::Idle {
            return;
        }
        if self.spec.fuel_capacity <= 0.0 {
            return;
        }

        let burn_per_sec = self.spec.fuel_burn_rate / 3600.0;

        let mut load_factor = 0.3;
        if self.telemetry.speed > 0.1 {
            load_factor = 0.6 + 0.4 * self.speed_ratio();
        }
        if self.telemetry.payload > 0.0 && self.spec.max_payload > 0.0 {
            load_factor += 0.3 * (self.telemetry.payload / self.spec.max_payload);
        }

        let consumed = burn_per_sec * load_factor * dt;
        let liters = (self.telemetry.fuel_level / 100.0) * self.spec.fuel_capacity - consumed;

        self.telemetry.fuel_level = (liters.max(0.0) / self.spec.fuel_capacity) * 100.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mineguard_types::FixedClock;

    fn start() -> Position {
        Position::new(-20.122, -43.952, 820.0)
    }

    fn hauler() -> Vehicle {
        Vehicle::new("HT-101", VehicleCategory::HaulTruck, start())
    }

    #[test]
    fn test_initial_state() {
        let v = hauler();
        assert_eq!(v.speed(), 0.0);
        assert_eq!(v.telemetry().fuel_level, 100.0);
        assert_eq!(v.telemetry().engine_rpm, 800.0);
        assert_eq!(v.cycle_state(), CycleState::Idle);
        assert!(v.is_active());
    }

    #[test]
    fn test_accelerates_at_fixed_rate() {
        let mut v = hauler();
        v.set_target_speed(36.0);
        v.advance(1.0);
        // 2 m/s² for 1 s = 7.2 km/h
        assert!((v.speed() - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_acceleration_does_not_overshoot() {
        let mut v = hauler();
        v.set_target_speed(5.0);
        v.advance(10.0);
        assert!((v.speed() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_brakes_harder_than_it_accelerates() {
        let mut v = hauler();
        v.set_speed(36.0);
        v.set_target_speed(0.0);
        v.advance(1.0);
        // 4 m/s² for 1 s = 14.4 km/h
        assert!((v.speed() - 21.6).abs() < 1e-9);
        v.advance(10.0);
        assert_eq!(v.speed(), 0.0);
    }

    #[test]
    fn test_target_speed_clamped() {
        let mut v = hauler();
        v.set_target_speed(100.0);
        assert_eq!(v.target_speed(), 45.0);
        v.set_target_speed(-5.0);
        assert_eq!(v.target_speed(), 0.0);
    }

    #[test]
    fn test_heading_normalized() {
        let mut v = hauler();
        v.set_heading(-90.0);
        assert_eq!(v.heading(), 270.0);
        v.set_heading(360.0);
        assert_eq!(v.heading(), 0.0);
        v.set_heading(1080.5);
        assert!((v.heading() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_payload_derates_target_by_30_percent() {
        let mut v = hauler();
        v.set_payload(220.0);
        v.set_target_speed(45.0);
        v.advance(1.0);
        assert!((v.target_speed() - 31.5).abs() < 1e-9);
    }

    #[test]
    fn test_payload_clamped_to_rating() {
        let mut v = hauler();
        v.set_payload(500.0);
        assert_eq!(v.telemetry().payload, 220.0);

        let mut lv = Vehicle::new("LV-1", VehicleCategory::LightVehicle, start());
        lv.set_payload(3.0);
        assert_eq!(lv.telemetry().payload, 0.0);
    }

    #[test]
    fn test_moves_along_heading() {
        let mut v = hauler();
        v.set_speed(36.0);
        v.set_target_speed(36.0);
        v.set_heading(90.0);
        v.advance(2.0);
        let moved = geo::distance_m(&start(), v.position());
        assert!((moved - 20.0).abs() < 1e-6);
        assert!(v.position().longitude > start().longitude);
        assert_eq!(v.position().altitude, 820.0);
    }

    #[test]
    fn test_fuel_burns_while_moving() {
        let mut v = hauler();
        v.set_speed(45.0);
        v.set_target_speed(45.0);
        v.advance(3600.0);
        // Load factor 1.0 for an hour: 180 of 3800 liters
        let expected = (3800.0 - 180.0) / 3800.0 * 100.0;
        assert!((v.telemetry().fuel_level - expected).abs() < 1e-6);
    }

    #[test]
    fn test_idle_parked_vehicle_does_not_burn_fuel() {
        let mut v = hauler();
        v.advance(60.0);
        assert_eq!(v.telemetry().fuel_level, 100.0);
    }

    #[test]
    fn test_fuel_never_negative() {
        let mut v = Vehicle::new("LV-1", VehicleCategory::LightVehicle, start());
        v.set_speed(60.0);
        v.set_target_speed(60.0);
        v.advance(1_000_000.0);
        assert_eq!(v.telemetry().fuel_level, 0.0);
    }

    #[test]
    fn test_rpm_tracks_speed_ratio() {
        let mut v = hauler();
        v.set_speed(45.0);
        v.set_target_speed(45.0);
        v.advance(1.0);
        assert!((v.telemetry().engine_rpm - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn test_inactive_vehicle_is_frozen() {
        let mut v = hauler();
        v.set_speed(30.0);
        v.set_target_speed(45.0);
        v.set_active(false);
        let before = v.clone();
        v.advance(5.0);
        assert_eq!(v, before);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut v = hauler();
        v.set_speed(30.0);
        v.set_target_speed(45.0);
        let before = v.clone();
        v.advance(0.0);
        v.advance(-1.0);
        v.advance(f64::NAN);
        assert_eq!(v, before);
    }

    #[test]
    fn test_prediction_is_pure() {
        let mut v = hauler();
        v.set_speed(30.0);
        v.set_heading(45.0);
        let before = v.clone();
        let first = v.predict_position(7.5);
        for _ in 0..10 {
            assert_eq!(v.predict_position(7.5), first);
        }
        assert_eq!(v, before);
    }

    #[test]
    fn test_prediction_of_stationary_vehicle() {
        let v = hauler();
        assert_eq!(v.predict_position(10.0), start());
    }

    #[test]
    fn test_fallback_spec_is_inert() {
        let mut v = Vehicle::with_spec(
            "XX-1",
            VehicleCategory::LightVehicle,
            CategorySpec::FALLBACK,
            start(),
        );
        v.set_target_speed(30.0);
        v.set_cycle_state(CycleState::Hauling);
        v.advance(1.0);
        assert_eq!(v.speed(), 0.0);
        assert_eq!(v.telemetry().fuel_level, 100.0);
        assert_eq!(v.telemetry().engine_rpm, 800.0);
        assert_eq!(v.safety_radius(), 0.0);
    }

    #[test]
    fn test_telemetry_packet_uses_clock() {
        let mut v = hauler();
        v.set_cycle_state(CycleState::Hauling);
        let packet = v.telemetry_packet(&FixedClock(1234));
        assert_eq!(packet.vehicle_id, "HT-101");
        assert_eq!(packet.timestamp, 1234);
        assert_eq!(packet.vehicle_type, VehicleCategory::HaulTruck);
        assert_eq!(packet.cycle_state, CycleState::Hauling);
    }
}
