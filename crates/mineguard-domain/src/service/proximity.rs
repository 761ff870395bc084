//! Pairwise collision prediction
//!
//! Every unordered pair of active vehicles is checked once per tick:
//!
//! 1. Parked pairs (both at or below [`MIN_SPEED_THRESHOLD`]) are never flagged.
//! 2. Pairs further apart than [`CUTOFF_DISTANCE_M`] are skipped.
//! 3. Pairs already inside the combined safety radius are Critical with TTI 0.
//! 4. Otherwise both trajectories are extrapolated at constant velocity and
//!    sampled every [`PREDICTION_STEP`] seconds up to [`MAX_PREDICTION_TIME`]
//!    to find the closest point of approach (CPA). The time of the CPA is the
//!    time-to-impact and drives the severity.
//!
//! The cutoff and the divergence early-exit are approximations kept for
//! behavioral fidelity: the early exit can stop before a later, deeper
//! minimum on unusual trajectories.

use mineguard_types::{AlertClass, AlertSeverity, Clock, CollisionAlert, SystemClock};

use crate::model::KinematicSnapshot;
use crate::service::geo;

/// Seconds
pub const MAX_PREDICTION_TIME: f64 = 15.0;
/// Seconds
pub const PREDICTION_STEP: f64 = 0.5;
/// km/h; at or below this a vehicle counts as parked
pub const MIN_SPEED_THRESHOLD: f64 = 1.0;
/// 60 km/h covers ~250 m in the horizon, so 500 m bounds any closing pair
pub const CUTOFF_DISTANCE_M: f64 = 500.0;
/// Divergence is only checked after this many seconds
pub const EARLY_EXIT_AFTER: f64 = 3.0;
pub const DIVERGENCE_FACTOR: f64 = 1.5;

const SAMPLE_COUNT: u32 = (MAX_PREDICTION_TIME / PREDICTION_STEP) as u32;

/// Risk found for a pair, before timestamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairAssessment {
    pub severity: AlertSeverity,
    pub class: AlertClass,
    /// Seconds
    pub time_to_impact: f64,
    /// Meters
    pub distance: f64,
}

/// Stateless evaluator; the clock only stamps emitted alerts
#[derive(Debug, Clone, Default)]
pub struct ProximityEngine<C = SystemClock> {
    clock: C,
}

impl ProximityEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> ProximityEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Evaluate all unordered pairs `(i, j)`, `i < j`.
    ///
    /// Alerts come out in pair enumeration order.
    pub fn evaluate<V: KinematicSnapshot>(&self, vehicles: &[V]) -> Vec<CollisionAlert> {
        let mut alerts = Vec::new();

        for (i, first) in vehicles.iter().enumerate() {
            for second in &vehicles[i + 1..] {
                if !first.is_active() || !second.is_active() {
                    continue;
                }
                if let Some(alert) = self.check_pair(first, second) {
                    alerts.push(alert);
                }
            }
        }

        alerts
    }

    /// Check a single pair, returning an alert when there is risk
    pub fn check_pair<V: KinematicSnapshot>(&self, first: &V, second: &V) -> Option<CollisionAlert> {
        let assessment = assess_pair(first, second)?;

        Some(CollisionAlert {
            vehicle_id_1: first.id().to_string(),
            vehicle_id_2: second.id().to_string(),
            severity: assessment.severity,
            class: assessment.class,
            time_to_impact: assessment.time_to_impact,
            distance: assessment.distance,
            timestamp: self.clock.now_millis(),
        })
    }
}

/// Deterministic pair check; `None` means no risk
pub fn assess_pair<V: KinematicSnapshot>(first: &V, second: &V) -> Option<PairAssessment> {
    let first_moving = first.speed() > MIN_SPEED_THRESHOLD;
    let second_moving = second.speed() > MIN_SPEED_THRESHOLD;
    if !first_moving && !second_moving {
        return None;
    }

    let safety_radius = combined_safety_radius(first, second);
    let current = geo::distance_m(&first.position(), &second.position());

    if current > CUTOFF_DISTANCE_M {
        return None;
    }

    if current < safety_radius {
        return Some(PairAssessment {
            severity: AlertSeverity::Critical,
            class: classify(first.heading(), second.heading()),
            time_to_impact: 0.0,
            distance: current,
        });
    }

    let mut min_distance = current;
    let mut tti = None;

    for step in 1..=SAMPLE_COUNT {
        let t = f64::from(step) * PREDICTION_STEP;
        let dist = geo::distance_m(&first.predict_position(t), &second.predict_position(t));

        if dist < min_distance {
            min_distance = dist;
            tti = Some(t);
        }

        if t > EARLY_EXIT_AFTER && dist > current * DIVERGENCE_FACTOR {
            break;
        }
    }

    let tti = tti?;
    if min_distance >= safety_radius {
        return None;
    }

    let severity = AlertSeverity::from_time_to_impact(tti);
    if severity == AlertSeverity::None {
        return None;
    }

    Some(PairAssessment {
        severity,
        class: classify(first.heading(), second.heading()),
        time_to_impact: tti,
        distance: min_distance,
    })
}

/// Sum of both safety radii, no extra margin
pub fn combined_safety_radius<V: KinematicSnapshot>(first: &V, second: &V) -> f64 {
    first.safety_radius() + second.safety_radius()
}

/// Encounter geometry from the folded heading difference
pub fn classify(h1: f64, h2: f64) -> AlertClass {
    let diff = geo::heading_difference(h1, h2);

    if diff < 30.0 {
        AlertClass::Tailgating
    } else if diff > 150.0 {
        AlertClass::Approach
    } else if diff > 60.0 && diff < 120.0 {
        AlertClass::Crossing
    } else {
        AlertClass::BlindSpot
    }
}
