//! Hazard monitor - categorized alerts over the aggregated telemetry
//!
//! Runs once per tick after aggregation. Fire detection is debounced
//! through a persistence counter; cryo trips immediately. Alert creation is
//! deduplicated per category and, for FIRE/CRYO, gated behind the
//! suppression lockout window. Alerts leave the active set only through
//! explicit acknowledgement or the suppression auto-revert.

use ordered_float::OrderedFloat;

use crate::core::config::{config, SimulationConfig};
use crate::core::types::{AlertId, Tick};
use crate::hall::sensor::Sensor;
use crate::hall::state::HallState;
use crate::narrative::local_analysis;
use crate::simulation::mode::SimulationMode;
use crate::simulation::telemetry::ThermalSummary;
use crate::simulation::tick::SimulationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCategory {
    Fire,
    Cryo,
    Maintenance,
    System,
}

impl AlertCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AlertCategory::Fire => "FIRE",
            AlertCategory::Cryo => "CRYO",
            AlertCategory::Maintenance => "MAINTENANCE",
            AlertCategory::System => "SYSTEM",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

/// A raised hazard
///
/// At most one unresolved alert per category exists at a time. Suppression
/// rewrites the unresolved FIRE alert in place instead of raising a new one.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: AlertId,
    pub category: AlertCategory,
    pub raised_tick: Tick,
    pub message: String,
    pub level: AlertLevel,
    /// Sensor singled out when the alert was raised, when one stands out
    pub sensor_id: Option<String>,
    pub resolved: bool,
}

/// Per-tick hazard evaluation, run against the fresh telemetry aggregate
pub(crate) fn evaluate_hazards(
    state: &mut HallState,
    summary: &ThermalSummary,
    cfg: &SimulationConfig,
    events: &mut Vec<SimulationEvent>,
) {
    // Fire persistence: count hot online sensors, walk the counter
    let hot_count = state
        .sensors
        .iter()
        .filter(|s| s.is_online() && s.temperature >= cfg.fire_threshold)
        .count();
    if hot_count >= cfg.fire_sensor_quorum {
        state.fire_persistence = (state.fire_persistence + 1).min(cfg.fire_persistence_max);
    } else {
        state.fire_persistence = state.fire_persistence.saturating_sub(1);
    }

    let is_fire =
        summary.max >= cfg.fire_threshold && state.fire_persistence >= cfg.fire_persistence_arm;
    let is_cryo = summary.min < cfg.cryo_threshold;
    let online = state.online_count();
    let first_offline = state
        .sensors
        .iter()
        .find(|s| !s.is_online())
        .map(|s| s.id.clone());

    // Derived status fields
    state.status.average_temp = summary.avg;
    state.status.peak_temp = summary.max;
    state.status.min_temp = summary.min;
    state.status.fire_alarm = is_fire;
    state.status.hvac_active = (summary.avg > cfg.ideal_temp_max
        || summary.avg < cfg.hvac_low_threshold
        || state.mode == SimulationMode::Suppression)
        && state.mode != SimulationMode::HvacFailure;
    state.status.stability_index = if is_fire { 10.0 } else { summary.uniformity.max(0.0) };
    state.status.estimated_kva = cfg.kva_base
        + match state.mode {
            SimulationMode::Suppression => cfg.kva_suppression,
            SimulationMode::HvacFailure => cfg.kva_hvac_failure,
            _ => cfg.kva_nominal,
        };

    let line = local_analysis(&state.sensors, &state.status);
    state.status.last_analysis = line.clone();
    state.push_log(line);

    // FIRE/CRYO raising is gated by the suppression lockout window
    let locked_out = state.mode == SimulationMode::Suppression
        || state.current_tick < state.suppression_lockout_until;
    if !locked_out {
        if is_fire {
            let message = if state.mode == SimulationMode::RealWorldDrill {
                "THERMAL RUPTURE DETECTED (DRILL ACTIVE)."
            } else {
                "THERMAL RUPTURE DETECTED."
            };
            let lead = hottest_online(&state.sensors);
            trigger_hazard(
                state,
                AlertCategory::Fire,
                AlertLevel::Critical,
                message.to_string(),
                lead,
                events,
            );
        }
        if is_cryo {
            let lead = coldest_online(&state.sensors);
            trigger_hazard(
                state,
                AlertCategory::Cryo,
                AlertLevel::Warning,
                "LOW TEMP ANOMALY DETECTED.".to_string(),
                lead,
                events,
            );
        }
    }

    // Link-health alerts follow the same dedup rules but ignore the lockout
    if online == 0 {
        trigger_hazard(
            state,
            AlertCategory::System,
            AlertLevel::Critical,
            "TELEMETRY LINK LOST. All sensor channels silent.".to_string(),
            None,
            events,
        );
    } else if let Some(id) = first_offline {
        trigger_hazard(
            state,
            AlertCategory::Maintenance,
            AlertLevel::Warning,
            format!("TELEMETRY NODE {id} SILENT. Hardware check recommended."),
            Some(id),
            events,
        );
    }

    state.status.active_incidents = state.unresolved_count();
}

/// Raise a hazard unless an unresolved alert of this category already exists
pub(crate) fn trigger_hazard(
    state: &mut HallState,
    category: AlertCategory,
    level: AlertLevel,
    message: String,
    sensor_id: Option<String>,
    events: &mut Vec<SimulationEvent>,
) {
    if state.has_unresolved(category) {
        return;
    }

    let alert = Alert {
        id: AlertId::new(),
        category,
        raised_tick: state.current_tick,
        message: message.clone(),
        level,
        sensor_id,
        resolved: false,
    };
    tracing::warn!("hazard raised [{category}] {message}");

    state.status.last_analysis = message.clone();
    state.push_log(format!("[{category}] {message}"));
    events.push(SimulationEvent::HazardRaised { category, level, message });
    state.alerts.insert(0, alert);
}

/// Operator intent: acknowledge an alert
///
/// Marks it resolved and leaves it in history; the underlying physical
/// condition is untouched and may re-raise once it trips again.
pub fn acknowledge_hazard(state: &mut HallState, id: AlertId) -> bool {
    let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id) else {
        return false;
    };
    if !alert.resolved {
        alert.resolved = true;
        tracing::info!("hazard {id} acknowledged");
        state.push_log(format!("Hazard {id} acknowledged."));
        state.status.active_incidents = state.unresolved_count();
    }
    true
}

/// Operator intent: actuate fire suppression against an unresolved alert
///
/// Rewrites the alert in place (same id, still unresolved), switches the
/// engine into Suppression mode and arms the lockout window. The alert
/// leaves the active set later, when the auto-revert sees the hall cooled.
pub fn actuate_suppression(state: &mut HallState, id: AlertId) -> bool {
    let lockout_ticks = config().suppression_lockout_ticks;
    let deadline = state.current_tick + lockout_ticks;

    let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id && !a.resolved) else {
        return false;
    };
    alert.message = format!(
        "HSE SUPPRESSION SYSTEM ENGAGED [{}]. Cooling in progress.",
        alert.category.label()
    );
    alert.level = AlertLevel::Warning;

    state.mode = SimulationMode::Suppression;
    state.suppression_lockout_until = deadline;
    tracing::info!("suppression actuated against {id}, lockout until tick {deadline}");
    state.push_log("Suppression sequence engaged.".to_string());
    true
}

fn hottest_online(sensors: &[Sensor]) -> Option<String> {
    sensors
        .iter()
        .filter(|s| s.is_online())
        .max_by_key(|s| OrderedFloat(s.temperature))
        .map(|s| s.id.clone())
}

fn coldest_online(sensors: &[Sensor]) -> Option<String> {
    sensors
        .iter()
        .filter(|s| s.is_online())
        .min_by_key(|s| OrderedFloat(s.temperature))
        .map(|s| s.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::hall::sensor::SensorKind;

    fn state() -> HallState {
        HallState::new(vec![
            Sensor::new("a".into(), Vec3::default(), 22.0, 45.0, SensorKind::Pillar),
            Sensor::new("b".into(), Vec3::default(), 95.0, 45.0, SensorKind::Wall),
        ])
    }

    #[test]
    fn test_trigger_deduplicates_per_category() {
        let mut s = state();
        let mut events = Vec::new();
        trigger_hazard(&mut s, AlertCategory::Fire, AlertLevel::Critical, "one".into(), None, &mut events);
        trigger_hazard(&mut s, AlertCategory::Fire, AlertLevel::Critical, "two".into(), None, &mut events);
        trigger_hazard(&mut s, AlertCategory::Cryo, AlertLevel::Warning, "three".into(), None, &mut events);

        assert_eq!(s.alerts.len(), 2);
        assert_eq!(events.len(), 2);
        // the surviving FIRE alert is the first one
        let fire: Vec<_> = s.alerts.iter().filter(|a| a.category == AlertCategory::Fire).collect();
        assert_eq!(fire.len(), 1);
        assert_eq!(fire[0].message, "one");
    }

    #[test]
    fn test_resolved_alert_no_longer_blocks() {
        let mut s = state();
        let mut events = Vec::new();
        trigger_hazard(&mut s, AlertCategory::Cryo, AlertLevel::Warning, "one".into(), None, &mut events);
        let id = s.alerts[0].id;
        assert!(acknowledge_hazard(&mut s, id));
        trigger_hazard(&mut s, AlertCategory::Cryo, AlertLevel::Warning, "two".into(), None, &mut events);

        assert_eq!(s.alerts.len(), 2);
        assert!(s.has_unresolved(AlertCategory::Cryo));
    }

    #[test]
    fn test_acknowledge_keeps_history() {
        let mut s = state();
        let mut events = Vec::new();
        trigger_hazard(&mut s, AlertCategory::Fire, AlertLevel::Critical, "one".into(), None, &mut events);
        let id = s.alerts[0].id;

        assert!(acknowledge_hazard(&mut s, id));
        assert_eq!(s.alerts.len(), 1);
        assert!(s.alerts[0].resolved);
        assert_eq!(s.unresolved_count(), 0);
        // unknown ids are reported, not silently ignored
        assert!(!acknowledge_hazard(&mut s, AlertId::new()));
    }

    #[test]
    fn test_actuate_transforms_in_place() {
        let mut s = state();
        let mut events = Vec::new();
        trigger_hazard(&mut s, AlertCategory::Fire, AlertLevel::Critical, "THERMAL RUPTURE DETECTED.".into(), Some("b".into()), &mut events);
        let id = s.alerts[0].id;

        assert!(actuate_suppression(&mut s, id));
        let alert = s.alert(id).unwrap();
        assert_eq!(alert.id, id);
        assert!(!alert.resolved);
        assert!(alert.message.contains("SUPPRESSION"));
        assert_eq!(alert.level, AlertLevel::Warning);
        assert_eq!(s.mode, SimulationMode::Suppression);
        assert_eq!(s.lockout_until(), s.current_tick + config().suppression_lockout_ticks);
    }

    #[test]
    fn test_actuate_rejects_resolved_or_unknown() {
        let mut s = state();
        let mut events = Vec::new();
        trigger_hazard(&mut s, AlertCategory::Fire, AlertLevel::Critical, "one".into(), None, &mut events);
        let id = s.alerts[0].id;
        acknowledge_hazard(&mut s, id);

        assert!(!actuate_suppression(&mut s, id));
        assert!(!actuate_suppression(&mut s, AlertId::new()));
        assert_eq!(s.mode, SimulationMode::Normal);
    }

    #[test]
    fn test_lead_sensor_selection() {
        let s = state();
        assert_eq!(hottest_online(&s.sensors).as_deref(), Some("b"));
        assert_eq!(coldest_online(&s.sensors).as_deref(), Some("a"));
        assert_eq!(hottest_online(&[]), None);
    }
}
