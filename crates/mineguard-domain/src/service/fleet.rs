//! Fleet orchestration: waypoint following and the haul cycle
//!
//! Navigation state is keyed by vehicle id; vehicles never point back at it.
//! Each tick every non-excavator steers toward its current waypoint (or
//! counts down a loading/dumping timer), then every vehicle advances its
//! kinematics.

use std::collections::HashMap;

use mineguard_types::{
    Clock, CycleState, Position, ScenarioError, TelemetryPacket, VehicleCategory,
};
use tracing::debug;

use crate::model::{MineLayout, Route, Scenario, VehicleSetup, Vehicle};
use crate::service::geo;

/// km/h
pub const HAUL_SPEED: f64 = 35.0;
/// km/h
pub const RETURN_SPEED: f64 = 40.0;
/// km/h, used ahead of sharp turns
pub const APPROACH_SPEED: f64 = 10.0;
/// km/h
pub const LV_PATROL_SPEED: f64 = 45.0;
/// Seconds
pub const LOADING_TIME: f64 = 120.0;
/// Seconds
pub const DUMPING_TIME: f64 = 45.0;
/// Degrees of heading change that count as a sharp turn
pub const SHARP_TURN_DEG: f64 = 30.0;

/// Per-vehicle navigation state
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub route: Route,
    /// Loaded leg; the empty leg is its reverse
    pub haul_route: Route,
    pub waypoint_index: usize,
    /// Meters; closer than this counts as arrived
    pub arrival_threshold: f64,
    /// Seconds left of loading/dumping
    pub wait_timer: f64,
    pub waiting: bool,
}

impl NavigationState {
    /// Heading for `route[index]` right away
    pub fn following(route: Route, index: usize, arrival_threshold: f64) -> Self {
        Self {
            haul_route: route.clone(),
            route,
            waypoint_index: index,
            arrival_threshold,
            wait_timer: 0.0,
            waiting: false,
        }
    }

    /// Stationary for `seconds` before the cycle advances
    pub fn waiting(route: Route, seconds: f64, arrival_threshold: f64) -> Self {
        Self {
            haul_route: route.clone(),
            route,
            waypoint_index: 0,
            arrival_threshold,
            wait_timer: seconds,
            waiting: true,
        }
    }

    pub fn with_haul_route(mut self, haul_route: Route) -> Self {
        self.haul_route = haul_route;
        self
    }

    pub fn current_waypoint(&self) -> Option<&str> {
        self.route.get(self.waypoint_index)
    }
}

fn default_arrival_threshold(category: VehicleCategory) -> f64 {
    match category {
        VehicleCategory::HaulTruck => 20.0,
        VehicleCategory::Excavator => 5.0,
        VehicleCategory::LightVehicle => 15.0,
    }
}

/// Index-addressed vehicle collection plus navigation keyed by id
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    layout: MineLayout,
    vehicles: Vec<Vehicle>,
    navigation: HashMap<String, NavigationState>,
}

impl Fleet {
    pub fn new(layout: MineLayout) -> Self {
        Self {
            layout,
            vehicles: Vec::new(),
            navigation: HashMap::new(),
        }
    }

    /// Three haulers spread over the cycle, one excavator at the loading
    /// point and one light vehicle on patrol
    pub fn default_pit() -> Self {
        let layout = MineLayout::default_pit();
        let at = |name: &str| layout.get(name).copied().unwrap_or_default();

        let mut ht101 = Vehicle::new("HT-101", VehicleCategory::HaulTruck, at("PIT_LOAD_1"));
        ht101.set_cycle_state(CycleState::Loading);
        ht101.set_target_speed(0.0);
        let ht101_nav = NavigationState::waiting(Route::haul(), LOADING_TIME, 20.0);

        let mut ht102 = Vehicle::new("HT-102", VehicleCategory::HaulTruck, at("ROAD_1"));
        ht102.set_cycle_state(CycleState::Hauling);
        ht102.set_payload(ht102.spec().max_payload);
        ht102.set_target_speed(HAUL_SPEED);
        let ht102_nav = NavigationState::following(Route::haul(), 4, 20.0);

        let mut ht103 = Vehicle::new("HT-103", VehicleCategory::HaulTruck, at("DUMP_APPROACH"));
        ht103.set_cycle_state(CycleState::Hauling);
        ht103.set_payload(ht103.spec().max_payload);
        ht103.set_target_speed(HAUL_SPEED);
        let ht103_nav = NavigationState::following(Route::haul(), 6, 20.0);

        let ex201 = Vehicle::new("EX-201", VehicleCategory::Excavator, at("PIT_LOAD_1"));
        let ex201_nav = NavigationState::waiting(Route::new(["PIT_LOAD_1"]), 0.0, 5.0);

        // "In transit" while patrolling
        let mut lv301 = Vehicle::new("LV-301", VehicleCategory::LightVehicle, at("PATROL_1"));
        lv301.set_cycle_state(CycleState::Hauling);
        lv301.set_target_speed(LV_PATROL_SPEED);
        let lv301_nav = NavigationState::following(Route::patrol(), 1, 15.0);

        let mut fleet = Self::new(layout);
        for (mut vehicle, nav) in [
            (ht101, ht101_nav),
            (ht102, ht102_nav),
            (ht103, ht103_nav),
            (ex201, ex201_nav),
            (lv301, lv301_nav),
        ] {
            face_current_waypoint(&fleet.layout, &mut vehicle, &nav);
            fleet.insert(vehicle, nav);
        }
        fleet
    }

    /// Build and validate a fleet from a scenario description
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ScenarioError> {
        let layout = if scenario.waypoints.is_empty() {
            MineLayout::default_pit()
        } else {
            let mut layout = MineLayout::new();
            for wp in &scenario.waypoints {
                layout.insert(
                    wp.name.clone(),
                    Position::new(wp.latitude, wp.longitude, wp.altitude),
                );
            }
            layout
        };

        let mut fleet = Self::new(layout);
        for setup in &scenario.vehicles {
            let (mut vehicle, nav) = fleet.build_vehicle(setup)?;
            match setup.heading {
                Some(heading) => vehicle.set_heading(heading),
                None => face_current_waypoint(&fleet.layout, &mut vehicle, &nav),
            }
            fleet.add(vehicle, nav)?;
        }
        Ok(fleet)
    }

    fn build_vehicle(
        &self,
        setup: &VehicleSetup,
    ) -> Result<(Vehicle, NavigationState), ScenarioError> {
        let category: VehicleCategory = setup
            .category
            .parse()
            .map_err(ScenarioError::UnknownCategory)?;
        let cycle_state: CycleState = match &setup.cycle_state {
            Some(tag) => tag.parse().map_err(ScenarioError::UnknownCycleState)?,
            None => CycleState::Idle,
        };
        let start = self
            .layout
            .get(&setup.start)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownWaypoint(setup.start.clone()))?;

        let mut vehicle = Vehicle::new(setup.id.clone(), category, start);
        vehicle.set_cycle_state(cycle_state);
        vehicle.set_payload(setup.payload);
        vehicle.set_target_speed(setup.target_speed);
        vehicle.set_speed(setup.speed);
        vehicle.set_active(setup.active);

        let route = Route::new(setup.route.iter().cloned());
        let haul_route = if cycle_state == CycleState::Returning {
            route.reversed()
        } else {
            route.clone()
        };
        let threshold = setup
            .arrival_threshold
            .unwrap_or_else(|| default_arrival_threshold(category));

        let nav = if setup.wait_seconds > 0.0 {
            NavigationState {
                waypoint_index: setup.waypoint_index,
                ..NavigationState::waiting(route, setup.wait_seconds, threshold)
            }
        } else {
            NavigationState::following(route, setup.waypoint_index, threshold)
        };

        Ok((vehicle, nav.with_haul_route(haul_route)))
    }

    /// Add a vehicle after checking its id and route against the layout
    pub fn add(&mut self, vehicle: Vehicle, nav: NavigationState) -> Result<(), ScenarioError> {
        if self.navigation.contains_key(vehicle.id()) {
            return Err(ScenarioError::DuplicateVehicle(vehicle.id().to_string()));
        }
        for name in nav.route.waypoints.iter().chain(&nav.haul_route.waypoints) {
            if !self.layout.contains(name) {
                return Err(ScenarioError::UnknownWaypoint(name.clone()));
            }
        }
        if !nav.route.is_empty() && nav.waypoint_index >= nav.route.len() {
            return Err(ScenarioError::WaypointIndexOutOfRange {
                vehicle: vehicle.id().to_string(),
                index: nav.waypoint_index,
                len: nav.route.len(),
            });
        }

        self.insert(vehicle, nav);
        Ok(())
    }

    fn insert(&mut self, vehicle: Vehicle, nav: NavigationState) {
        self.navigation.insert(vehicle.id().to_string(), nav);
        self.vehicles.push(vehicle);
    }

    /// One tick: navigation for every active non-excavator, then kinematics
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for vehicle in &mut self.vehicles {
            if vehicle.is_active() && vehicle.category() != VehicleCategory::Excavator {
                if let Some(nav) = self.navigation.get_mut(vehicle.id()) {
                    navigate(&self.layout, vehicle, nav, dt);
                }
            }
            vehicle.advance(dt);
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn navigation(&self, id: &str) -> Option<&NavigationState> {
        self.navigation.get(id)
    }

    pub fn collect_telemetry(&self, clock: &impl Clock) -> Vec<TelemetryPacket> {
        self.vehicles
            .iter()
            .map(|v| v.telemetry_packet(clock))
            .collect()
    }
}

fn face_current_waypoint(layout: &MineLayout, vehicle: &mut Vehicle, nav: &NavigationState) {
    if nav.waiting {
        return;
    }
    if let Some(target) = nav.current_waypoint().and_then(|name| layout.get(name)) {
        let heading = geo::bearing_deg(vehicle.position(), target);
        vehicle.set_heading(heading);
    }
}

fn navigate(layout: &MineLayout, vehicle: &mut Vehicle, nav: &mut NavigationState, dt: f64) {
    if nav.waiting {
        nav.wait_timer -= dt;
        if nav.wait_timer <= 0.0 {
            nav.waiting = false;
            advance_cycle(vehicle, nav);
        }
        return;
    }

    let Some(target) = nav.current_waypoint().and_then(|name| layout.get(name)) else {
        return;
    };

    let dist = geo::distance_m(vehicle.position(), target);
    vehicle.set_heading(geo::bearing_deg(vehicle.position(), target));

    if dist >= nav.arrival_threshold {
        return;
    }

    nav.waypoint_index += 1;

    let Some(next_name) = nav.current_waypoint() else {
        complete_route(vehicle, nav);
        return;
    };

    if let Some(next) = layout.get(next_name) {
        let turn = geo::heading_difference(
            geo::bearing_deg(vehicle.position(), next),
            vehicle.heading(),
        );
        if turn > SHARP_TURN_DEG {
            vehicle.set_target_speed(APPROACH_SPEED);
        } else {
            vehicle.set_target_speed(cruise_speed(vehicle));
        }
    }
}

fn cruise_speed(vehicle: &Vehicle) -> f64 {
    match (vehicle.category(), vehicle.cycle_state()) {
        (VehicleCategory::LightVehicle, _) => LV_PATROL_SPEED,
        (_, CycleState::Hauling) => HAUL_SPEED,
        (_, CycleState::Returning) => RETURN_SPEED,
        _ => vehicle.target_speed(),
    }
}

/// Loading/dumping timer expired
fn advance_cycle(vehicle: &mut Vehicle, nav: &mut NavigationState) {
    let from = vehicle.cycle_state();
    match from {
        CycleState::Loading => {
            vehicle.set_cycle_state(CycleState::Hauling);
            vehicle.set_payload(vehicle.spec().max_payload);
            nav.route = nav.haul_route.clone();
            // Already at the first waypoint
            nav.waypoint_index = 1;
            vehicle.set_target_speed(HAUL_SPEED);
        }
        CycleState::Dumping => {
            vehicle.set_cycle_state(CycleState::Returning);
            vehicle.set_payload(0.0);
            nav.route = nav.haul_route.reversed();
            nav.waypoint_index = 1;
            vehicle.set_target_speed(RETURN_SPEED);
        }
        _ => return,
    }
    debug!(
        vehicle = vehicle.id(),
        from = %from,
        to = %vehicle.cycle_state(),
        "cycle advanced"
    );
}

/// Reached the last waypoint of the current route
fn complete_route(vehicle: &mut Vehicle, nav: &mut NavigationState) {
    vehicle.set_target_speed(0.0);

    if vehicle.category() == VehicleCategory::LightVehicle {
        nav.waypoint_index = 0;
        vehicle.set_target_speed(LV_PATROL_SPEED);
        return;
    }

    let (next_state, wait) = match vehicle.cycle_state() {
        CycleState::Hauling => (CycleState::Dumping, DUMPING_TIME),
        CycleState::Returning => (CycleState::Loading, LOADING_TIME),
        _ => return,
    };

    debug!(
        vehicle = vehicle.id(),
        from = %vehicle.cycle_state(),
        to = %next_state,
        wait_seconds = wait,
        "route complete"
    );
    vehicle.set_cycle_state(next_state);
    nav.waiting = true;
    nav.wait_timer = wait;
}
