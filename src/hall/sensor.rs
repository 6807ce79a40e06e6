//! Sensor node data model
//!
//! Sensors are mutated once per tick by the simulation engine and replaced
//! wholesale on reset; they are never destroyed individually.

use crate::core::types::Vec3;
use serde::{Deserialize, Serialize};

/// Where a sensor is mounted in the hall structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Pillar,
    Wall,
    Ceiling,
}

/// Telemetry link state of a sensor
///
/// Offline sensors keep their last reading but are excluded from all
/// aggregation and hazard statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Online,
    Offline,
}

impl LinkState {
    pub fn is_online(&self) -> bool {
        matches!(self, LinkState::Online)
    }
}

/// A single thermal sensor node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub position: Vec3,
    /// Current reading in degC, clamped to the configured envelope
    pub temperature: f32,
    /// Relative humidity reading; carried for display, unused by any rule
    pub humidity: f32,
    pub kind: SensorKind,
    pub link: LinkState,
    /// Delta applied on the most recent tick (degC per tick)
    pub drift: f32,
}

impl Sensor {
    pub fn new(id: String, position: Vec3, temperature: f32, humidity: f32, kind: SensorKind) -> Self {
        Self {
            id,
            position,
            temperature,
            humidity,
            kind,
            link: LinkState::Online,
            drift: 0.0,
        }
    }

    pub fn is_online(&self) -> bool {
        self.link.is_online()
    }

    /// Apply a drift delta, clamping the result to the temperature envelope
    pub fn apply_drift(&mut self, delta: f32, floor: f32, ceiling: f32) {
        self.temperature = (self.temperature + delta).clamp(floor, ceiling);
        self.drift = delta;
    }
}
