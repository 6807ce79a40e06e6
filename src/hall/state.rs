//! Hall state - owns the sensor field, engine mode, alerts, and status
//!
//! `HallState` is the single mutable root the per-tick systems operate on.
//! UI-facing intents (mode change, link toggle, focus change, reset) are
//! methods here; the hazard intents live with the hazard monitor.

use ahash::AHashMap;
use serde::Serialize;
use std::collections::VecDeque;

use crate::core::config::config;
use crate::core::types::{AlertId, Tick};
use crate::hall::sensor::{LinkState, Sensor};
use crate::narrative::AnalysisFocus;
use crate::simulation::drift::HeatSource;
use crate::simulation::hazard::{Alert, AlertCategory};
use crate::simulation::mode::SimulationMode;

/// Aggregate status snapshot, recomputed by the hazard pass each tick
#[derive(Debug, Clone, Serialize)]
pub struct SiteStatus {
    pub average_temp: f32,
    pub peak_temp: f32,
    pub min_temp: f32,
    pub hvac_active: bool,
    pub fire_alarm: bool,
    /// Most recent narrative line (local generator or remote analysis)
    pub last_analysis: String,
    /// Bounded log ring, most recent first
    pub logs: VecDeque<String>,
    /// Number of unresolved alerts
    pub active_incidents: usize,
    /// 0-100; pinned to 10 while the fire alarm is asserted
    pub stability_index: f32,
    /// Estimated power draw of the climate systems (kVA)
    pub estimated_kva: f32,
    pub analysis_focus: AnalysisFocus,
}

impl Default for SiteStatus {
    fn default() -> Self {
        let mut logs = VecDeque::new();
        logs.push_front("Boot successful. Simulation link active.".to_string());
        Self {
            average_temp: 22.0,
            peak_temp: 24.0,
            min_temp: 18.0,
            hvac_active: false,
            fire_alarm: false,
            last_analysis: "Initializing systems...".to_string(),
            logs,
            active_incidents: 0,
            stability_index: 100.0,
            estimated_kva: 12.5,
            analysis_focus: AnalysisFocus::Hse,
        }
    }
}

/// Root simulation state
pub struct HallState {
    pub current_tick: Tick,
    pub sensors: Vec<Sensor>,
    sensor_index: AHashMap<String, usize>,
    /// Active simulation mode; owned by the engine, which may rewrite it
    /// itself (suppression auto-revert)
    pub mode: SimulationMode,
    /// Alert history, most recent first; resolved alerts stay in place
    pub alerts: Vec<Alert>,
    pub status: SiteStatus,
    /// Virtual heat source driven along its path in drill mode
    pub heat_source: HeatSource,
    /// Fire debounce counter, clamped to [0, fire_persistence_max]
    pub(crate) fire_persistence: u8,
    /// Tick before which no new FIRE/CRYO hazard may be raised; 0 = unarmed
    pub(crate) suppression_lockout_until: Tick,
}

impl HallState {
    pub fn new(sensors: Vec<Sensor>) -> Self {
        let mut state = Self {
            current_tick: 0,
            sensors,
            sensor_index: AHashMap::new(),
            mode: SimulationMode::Normal,
            alerts: Vec::new(),
            status: SiteStatus::default(),
            heat_source: HeatSource::default(),
            fire_persistence: 0,
            suppression_lockout_until: 0,
        };
        state.rebuild_index();
        state
    }

    fn rebuild_index(&mut self) {
        self.sensor_index = self
            .sensors
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensor_index.get(id).map(|&i| &self.sensors[i])
    }

    pub fn sensor_mut(&mut self, id: &str) -> Option<&mut Sensor> {
        let idx = *self.sensor_index.get(id)?;
        Some(&mut self.sensors[idx])
    }

    pub fn online_count(&self) -> usize {
        self.sensors.iter().filter(|s| s.is_online()).count()
    }

    /// Advance the tick counter (the systems themselves run before this)
    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    /// Operator intent: select the active simulation mode
    pub fn set_mode(&mut self, mode: SimulationMode) {
        if self.mode == mode {
            return;
        }
        tracing::info!("engine mode {} -> {}", self.mode, mode);
        self.push_log(format!("Engine mode set to {mode}."));
        self.mode = mode;
    }

    /// Operator intent: select the narrative focus
    pub fn set_focus(&mut self, focus: AnalysisFocus) {
        self.status.analysis_focus = focus;
    }

    /// Operator intent: force a sensor's telemetry link state
    ///
    /// Returns false if no sensor with that id exists.
    pub fn set_link(&mut self, id: &str, link: LinkState) -> bool {
        let Some(idx) = self.sensor_index.get(id).copied() else {
            return false;
        };
        if self.sensors[idx].link != link {
            self.sensors[idx].link = link;
            self.push_log(format!("Sensor {id} link forced {link:?}."));
        }
        true
    }

    /// Operator intent: wholesale reset
    ///
    /// Replaces the sensor set, reverts the mode to Normal, clears all
    /// alerts and the debounce/lockout state. The log ring survives so the
    /// operator can still see what led up to the reset.
    pub fn reset(&mut self, sensors: Vec<Sensor>) {
        self.sensors = sensors;
        self.rebuild_index();
        self.mode = SimulationMode::Normal;
        self.alerts.clear();
        self.heat_source = HeatSource::default();
        self.fire_persistence = 0;
        self.suppression_lockout_until = 0;
        self.status.fire_alarm = false;
        self.status.active_incidents = 0;
        self.push_log("System reset. Sensor field re-seeded.".to_string());
        tracing::info!("hall state reset ({} sensors)", self.sensors.len());
    }

    /// Prepend a line to the bounded log ring
    pub fn push_log(&mut self, line: String) {
        self.status.logs.push_front(line);
        self.status.logs.truncate(config().log_capacity);
    }

    pub fn alert(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn has_unresolved(&self, category: AlertCategory) -> bool {
        self.alerts.iter().any(|a| a.category == category && !a.resolved)
    }

    pub fn unresolved_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.resolved).count()
    }

    /// Current fire debounce counter value
    pub fn fire_persistence(&self) -> u8 {
        self.fire_persistence
    }

    /// Tick at which the suppression lockout expires (0 = unarmed)
    pub fn lockout_until(&self) -> Tick {
        self.suppression_lockout_until
    }
}
