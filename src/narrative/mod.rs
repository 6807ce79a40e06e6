//! Rule-based narrative status generator
//!
//! Maps the current sensor field and status snapshot to a human-readable
//! line. This is the default log content every tick and the fallback
//! whenever the remote analysis endpoint is unavailable. Hazard interrupts
//! outrank the selected focus.

pub mod remote;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::HallError;
use crate::hall::sensor::Sensor;
use crate::hall::state::SiteStatus;
use remote::RemoteAnalyzer;

/// Which report the narrative generator writes when nothing is on fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisFocus {
    Hse,
    Maintenance,
    Diagnostic,
}

impl std::fmt::Display for AnalysisFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnalysisFocus::Hse => "HSE",
            AnalysisFocus::Maintenance => "MAINTENANCE",
            AnalysisFocus::Diagnostic => "DIAGNOSTIC",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AnalysisFocus {
    type Err = HallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hse" => Ok(AnalysisFocus::Hse),
            "maintenance" | "maint" => Ok(AnalysisFocus::Maintenance),
            "diagnostic" | "diag" => Ok(AnalysisFocus::Diagnostic),
            other => Err(HallError::UnknownFocus(other.to_string())),
        }
    }
}

/// Compass-style sector name for a plan position
fn plan_sector(x: f32, z: f32) -> String {
    let z_dir = if z > 0.0 { "North" } else { "South" };
    let x_dir = if x > 0.0 { "East" } else { "West" };
    format!("{z_dir}-{x_dir}")
}

/// Generate the status line for the current tick
pub fn local_analysis(sensors: &[Sensor], status: &SiteStatus) -> String {
    let cfg = config();
    let offline: Vec<&Sensor> = sensors.iter().filter(|s| !s.is_online()).collect();
    let hot: Vec<&Sensor> = sensors
        .iter()
        .filter(|s| s.temperature > cfg.hot_node_temp)
        .collect();
    let cold: Vec<&Sensor> = sensors
        .iter()
        .filter(|s| s.temperature < cfg.cold_node_temp)
        .collect();

    // Hazard interrupts take priority regardless of focus. A single hot
    // node is downgraded to an advisory; rupture wording needs a quorum.
    if status.fire_alarm {
        return if hot.len() >= 2 {
            format!(
                "[HSE_CRITICAL] THERMAL RUPTURE DETECTED at {} nodes. \
                 Automatic suppression sequence initiated. Evacuate non-essential personnel.",
                hot.len()
            )
        } else {
            let id = hot.first().map(|s| s.id.as_str()).unwrap_or("unresolved");
            format!(
                "[HSE_ADVISORY] Elevated temperature detected at Node {id}. \
                 Verify sensor and local conditions before escalation."
            )
        };
    }

    if cold.len() > cfg.cryo_narrative_quorum {
        let lead = cold[0];
        return format!(
            "[HSE_CRITICAL] CRYOGENIC LEAK. Brittle fracture risk high at Node {} in Sector {}. \
             HVAC air-handlers forced to warming cycle.",
            lead.id,
            plan_sector(lead.position.x, lead.position.z)
        );
    }

    match status.analysis_focus {
        AnalysisFocus::Hse => {
            let lead = sensors
                .iter()
                .filter(|s| s.drift.abs() > cfg.unstable_drift)
                .max_by_key(|s| OrderedFloat(s.drift.abs()));
            if let Some(lead) = lead {
                format!(
                    "[HSE_ADVISORY] Rapid thermal delta at Node {} ({:+.2}°C/s). \
                     Checking for localized atmospheric imbalance or gas accumulation.",
                    lead.id, lead.drift
                )
            } else {
                format!(
                    "[HSE_NOMINAL] Perimeter integrity verified. Internal atmosphere stable \
                     at {:.1}°C. Stability Index: {:.0}%. All fire-suppression headers pressurized.",
                    status.average_temp, status.stability_index
                )
            }
        }
        AnalysisFocus::Maintenance => {
            if let Some(first) = offline.first() {
                format!(
                    "[MAINT_URGENT] {} telemetry nodes silent. Signal attenuation detected in \
                     {} cluster. Hardware replacement recommended for Node ID {}.",
                    offline.len(),
                    plan_sector(first.position.x, first.position.z),
                    first.id
                )
            } else {
                let noise = sensors.iter().map(|s| s.drift.abs()).sum::<f32>()
                    / sensors.len().max(1) as f32;
                format!(
                    "[MAINT_REPORT] Sensor noise floor: {:.2}%. No calibration drift detected. \
                     Structural resonance within spec. All structural pillars reporting zero stress.",
                    noise * 100.0
                )
            }
        }
        AnalysisFocus::Diagnostic => {
            let variance = status.peak_temp - status.min_temp;
            let label = if variance > 20.0 { "Asymmetric" } else { "Uniform" };
            format!(
                "[DIAG_CORE] Thermal distribution is {label} (ΔT: {variance:.1}°C). \
                 Peak: {:.1}°C. Floor: {:.1}°C. HVAC PID-controller response time: 42ms.",
                status.peak_temp, status.min_temp
            )
        }
    }
}

/// Remote analysis with local fallback
///
/// Any transport or decode failure degrades to the local generator; the
/// caller always gets a line back.
pub async fn analyze_with_fallback(
    remote: Option<&RemoteAnalyzer>,
    sensors: &[Sensor],
    status: &SiteStatus,
) -> String {
    if let Some(client) = remote {
        match client.analyze(sensors, status).await {
            Ok(text) => return text,
            Err(e) => tracing::warn!("remote analysis unavailable, using local generator: {e}"),
        }
    }
    local_analysis(sensors, status)
}
