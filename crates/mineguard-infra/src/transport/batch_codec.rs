//! JSON batch encoding
//!
//! One frame per tick:
//!
//! ```text
//! {"type":"batch",
//!  "telemetry":[{"type":"telemetry","vehicle_id":..., ...}, ...],
//!  "alerts":[{"type":"alert","vehicle_id_1":..., "priority":3, ...}, ...]}
//! ```
//!
//! Enumerations travel as their integer codes.

use mineguard_types::{BatchPacket, CollisionAlert, Error, Result, TelemetryPacket};
use serde::{Deserialize, Serialize};

/// A single tagged record inside a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Telemetry(TelemetryPacket),
    Alert(CollisionAlert),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Frame {
    Batch {
        telemetry: Vec<Record>,
        alerts: Vec<Record>,
    },
}

/// Encode one tick's telemetry and alerts as a batch document
pub fn encode_batch(telemetry: &[TelemetryPacket], alerts: &[CollisionAlert]) -> Result<String> {
    let frame = Frame::Batch {
        telemetry: telemetry.iter().cloned().map(Record::Telemetry).collect(),
        alerts: alerts.iter().cloned().map(Record::Alert).collect(),
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Decode a batch document produced by [`encode_batch`]
pub fn decode_batch(text: &str) -> Result<BatchPacket> {
    let Frame::Batch {
        telemetry,
        alerts: alert_records,
    } = serde_json::from_str(text)?;

    let mut batch = BatchPacket::default();
    for record in telemetry {
        match record {
            Record::Telemetry(packet) => batch.telemetry.push(packet),
            Record::Alert(_) => {
                return Err(Error::Transport("alert record in telemetry list".to_string()))
            }
        }
    }
    for record in alert_records {
        match record {
            Record::Alert(alert) => batch.alerts.push(alert),
            Record::Telemetry(_) => {
                return Err(Error::Transport("telemetry record in alert list".to_string()))
            }
        }
    }
    Ok(batch)
}
