//! Tick system - orchestrates per-tick simulation updates
//!
//! Fixed order within one logical instant: the drill heat source advances,
//! every sensor receives its drift and is clamped, telemetry is aggregated
//! from the new readings, the suppression auto-revert is checked, and the
//! hazard monitor runs against the fresh aggregate. Operator intents run
//! to completion between ticks, so no pass ever observes a half-applied
//! transition.

use rand::Rng;

use crate::core::config::config;
use crate::hall::state::HallState;
use crate::simulation::drift::compute_drift;
use crate::simulation::hazard::{evaluate_hazards, AlertCategory, AlertLevel};
use crate::simulation::mode::SimulationMode;
use crate::simulation::telemetry::summarize;

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` for display in the operator's action
/// log; the state itself already reflects them.
#[derive(Debug, Clone)]
pub enum SimulationEvent {
    /// A new hazard entered the active set
    HazardRaised {
        category: AlertCategory,
        level: AlertLevel,
        message: String,
    },
    /// A suppression cycle cooled the hall below the revert threshold;
    /// the engine returned to Normal and dropped unresolved FIRE alerts
    SuppressionComplete {
        /// Aggregated maximum at the moment of reversion
        peak: f32,
    },
}

/// Run a single simulation tick
///
/// Returns the events that occurred during this tick.
pub fn run_simulation_tick(state: &mut HallState, rng: &mut impl Rng) -> Vec<SimulationEvent> {
    let cfg = config();
    let mut events = Vec::new();

    if state.mode == SimulationMode::RealWorldDrill {
        state.heat_source.advance(cfg);
    }

    // Advance every sensor under the active mode, clamping to the envelope
    let mode = state.mode;
    let source = state.heat_source;
    for sensor in state.sensors.iter_mut() {
        let delta = compute_drift(sensor, mode, &source, cfg, rng);
        sensor.apply_drift(delta, cfg.temp_floor, cfg.temp_ceiling);
    }

    let summary = summarize(&state.sensors, cfg);

    // Suppression auto-revert: once the hall is cool, return to Normal and
    // drop the unresolved FIRE alerts the cycle was fighting
    if state.mode == SimulationMode::Suppression && summary.max < cfg.suppression_revert_temp {
        state.mode = SimulationMode::Normal;
        state
            .alerts
            .retain(|a| a.category != AlertCategory::Fire || a.resolved);
        tracing::info!(
            "suppression complete at tick {}, peak {:.1}C",
            state.current_tick,
            summary.max
        );
        state.push_log("Suppression cycle complete. Hall temperature restored.".to_string());
        events.push(SimulationEvent::SuppressionComplete { peak: summary.max });
    }

    evaluate_hazards(state, &summary, cfg, &mut events);

    state.tick();
    events
}
