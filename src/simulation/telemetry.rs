//! Telemetry aggregation over the live sensor field
//!
//! Pure functions of the online sensor subset. An empty online set yields
//! fixed neutral defaults rather than an error; the hazard monitor and the
//! presentation layer both rely on always getting a summary back.

use crate::core::config::SimulationConfig;
use crate::hall::sensor::Sensor;

/// Aggregate thermal statistics for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalSummary {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
    /// Spread between the hottest and coldest online sensor
    pub delta_t: f32,
    /// Percentage of online sensors inside the ideal band (0-100)
    pub uniformity: f32,
}

impl ThermalSummary {
    /// Defaults reported when no sensor is online
    pub fn neutral() -> Self {
        Self { min: 20.0, max: 20.0, avg: 20.0, delta_t: 0.0, uniformity: 0.0 }
    }
}

/// Aggregate the online subset of the sensor field
pub fn summarize(sensors: &[Sensor], cfg: &SimulationConfig) -> ThermalSummary {
    let online: Vec<&Sensor> = sensors.iter().filter(|s| s.is_online()).collect();
    if online.is_empty() {
        return ThermalSummary::neutral();
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0;
    let mut nominal = 0usize;
    for s in &online {
        min = min.min(s.temperature);
        max = max.max(s.temperature);
        sum += s.temperature;
        if s.temperature >= cfg.ideal_temp_min && s.temperature <= cfg.ideal_temp_max {
            nominal += 1;
        }
    }

    ThermalSummary {
        min,
        max,
        avg: sum / online.len() as f32,
        delta_t: max - min,
        uniformity: (nominal as f32 / online.len() as f32) * 100.0,
    }
}
