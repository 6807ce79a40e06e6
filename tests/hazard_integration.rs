//! Integration tests for the hazard monitor
//!
//! These tests verify the alerting state machine end-to-end:
//! - Fire debounce (persistence counter) and cryo immediacy
//! - Per-category deduplication
//! - Acknowledgement and the in-place suppression transform
//! - The suppression lockout window
//! - Auto-clear of FIRE alerts when suppression cools the hall
//! - Derived status fields (HVAC, stability, power model)

use hall_sentinel::core::types::Vec3;
use hall_sentinel::hall::{HallState, LinkState, Sensor, SensorKind};
use hall_sentinel::narrative::AnalysisFocus;
use hall_sentinel::simulation::{
    acknowledge_hazard, actuate_suppression, run_simulation_tick, AlertCategory, AlertLevel,
    SimulationMode,
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn sensor_at(id: &str, x: f32, z: f32, temp: f32) -> Sensor {
    Sensor::new(id.into(), Vec3::new(x, 5.0, z), temp, 45.0, SensorKind::Pillar)
}

/// Two sensors parked inside the fire region, hot enough to alarm
fn hot_field() -> HallState {
    HallState::new(vec![
        sensor_at("h1", -10.0, -1.0, 150.0),
        sensor_at("h2", -11.0, -2.0, 150.0),
        sensor_at("ok", 0.0, 5.0, 22.0),
    ])
}

fn unresolved(state: &HallState, category: AlertCategory) -> usize {
    state
        .alerts
        .iter()
        .filter(|a| a.category == category && !a.resolved)
        .count()
}

// ============================================================================
// Fire Debounce
// ============================================================================

#[test]
fn test_fire_alarm_never_asserts_on_first_tick() {
    let mut state = hot_field();
    let mut r = rng(1);

    run_simulation_tick(&mut state, &mut r);
    assert!(!state.status.fire_alarm, "alarm asserted on the first hot tick");
    assert_eq!(unresolved(&state, AlertCategory::Fire), 0);
    assert_eq!(state.fire_persistence(), 1);

    run_simulation_tick(&mut state, &mut r);
    assert!(state.status.fire_alarm);
    assert_eq!(unresolved(&state, AlertCategory::Fire), 1);
}

#[test]
fn test_single_hot_sensor_never_feeds_the_counter() {
    // One saturated node, the rest nominal: no quorum, no alarm, ever
    let mut state = HallState::new(vec![
        sensor_at("h1", -10.0, -1.0, 150.0),
        sensor_at("ok", 0.0, 5.0, 22.0),
    ]);
    let mut r = rng(2);
    for _ in 0..10 {
        run_simulation_tick(&mut state, &mut r);
    }
    assert_eq!(state.fire_persistence(), 0);
    assert!(!state.status.fire_alarm);
    assert_eq!(unresolved(&state, AlertCategory::Fire), 0);
}

#[test]
fn test_persistence_counter_decays_and_saturates() {
    let mut state = hot_field();
    let mut r = rng(3);
    for _ in 0..10 {
        run_simulation_tick(&mut state, &mut r);
    }
    // Counter clamps at its ceiling
    assert_eq!(state.fire_persistence(), 5);

    // Cool the quorum below threshold; counter walks back down
    state.sensor_mut("h1").unwrap().temperature = 22.0;
    state.sensor_mut("h2").unwrap().temperature = 22.0;
    for _ in 0..3 {
        run_simulation_tick(&mut state, &mut r);
    }
    assert_eq!(state.fire_persistence(), 2);
}

#[test]
fn test_fire_alert_carries_hottest_sensor() {
    let mut state = hot_field();
    state.sensor_mut("h2").unwrap().temperature = 180.0;
    let mut r = rng(4);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);

    let alert = state
        .alerts
        .iter()
        .find(|a| a.category == AlertCategory::Fire)
        .unwrap();
    assert_eq!(alert.level, AlertLevel::Critical);
    assert_eq!(alert.sensor_id.as_deref(), Some("h2"));
}

// ============================================================================
// Cryo Immediacy
// ============================================================================

#[test]
fn test_cryo_trips_on_first_cold_tick() {
    let mut state = HallState::new(vec![
        sensor_at("cold", 12.0, 8.0, -10.0),
        sensor_at("ok", 0.0, 0.0, 22.0),
    ]);
    let mut r = rng(5);
    run_simulation_tick(&mut state, &mut r);

    assert_eq!(unresolved(&state, AlertCategory::Cryo), 1);
    let alert = &state.alerts[0];
    assert_eq!(alert.level, AlertLevel::Warning);
    assert_eq!(alert.sensor_id.as_deref(), Some("cold"));
}

// ============================================================================
// Deduplication
// ============================================================================

#[test]
fn test_persistent_condition_raises_exactly_one_alert() {
    let mut state = hot_field();
    let mut r = rng(6);
    for _ in 0..15 {
        run_simulation_tick(&mut state, &mut r);
    }
    assert_eq!(unresolved(&state, AlertCategory::Fire), 1);
    assert_eq!(
        state.alerts.iter().filter(|a| a.category == AlertCategory::Fire).count(),
        1
    );
}

#[test]
fn test_acknowledged_alert_allows_a_new_raise() {
    let mut state = hot_field();
    let mut r = rng(7);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    let first = state.alerts[0].id;

    assert!(acknowledge_hazard(&mut state, first));
    assert_eq!(state.unresolved_count(), 0);

    // Condition still holds: the next tick raises a fresh alert
    run_simulation_tick(&mut state, &mut r);
    assert_eq!(unresolved(&state, AlertCategory::Fire), 1);
    assert_eq!(state.alerts.len(), 2);
    assert_ne!(state.alerts[0].id, first);
    // History keeps the acknowledged one
    assert!(state.alert(first).unwrap().resolved);
}

// ============================================================================
// Suppression Transform and Lockout
// ============================================================================

#[test]
fn test_actuation_transforms_the_alert_in_place() {
    let mut state = hot_field();
    let mut r = rng(8);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    let id = state.alerts[0].id;
    let original_message = state.alerts[0].message.clone();

    assert!(actuate_suppression(&mut state, id));

    assert_eq!(state.mode, SimulationMode::Suppression);
    assert_eq!(state.alerts.len(), 1, "transform must not create a new alert");
    let alert = state.alert(id).unwrap();
    assert!(!alert.resolved);
    assert_ne!(alert.message, original_message);
    assert!(alert.message.contains("SUPPRESSION"));
    assert_eq!(alert.level, AlertLevel::Warning);
}

#[test]
fn test_lockout_blocks_new_hazards_for_its_window() {
    let mut state = hot_field();
    let mut r = rng(9);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    let id = state.alerts[0].id;

    // Actuate at tick 2: lockout until tick 10
    assert!(actuate_suppression(&mut state, id));
    assert_eq!(state.lockout_until(), 10);

    // Clear the dedup path so only the lockout can block a re-raise, and
    // leave suppression so the hot condition keeps feeding the counter
    assert!(acknowledge_hazard(&mut state, id));
    state.set_mode(SimulationMode::LocalizedFire);

    for _ in 0..8 {
        run_simulation_tick(&mut state, &mut r);
        assert_eq!(
            unresolved(&state, AlertCategory::Fire),
            0,
            "alert raised inside the lockout window at tick {}",
            state.current_tick
        );
    }

    // Window elapsed, condition still hot: raise goes through
    run_simulation_tick(&mut state, &mut r);
    assert_eq!(unresolved(&state, AlertCategory::Fire), 1);
}

#[test]
fn test_no_raise_while_in_suppression_mode() {
    let mut state = HallState::new(vec![
        sensor_at("c1", 12.0, 8.0, -30.0),
        sensor_at("ok", 0.0, 0.0, 22.0),
    ]);
    state.set_mode(SimulationMode::Suppression);
    let mut r = rng(10);
    run_simulation_tick(&mut state, &mut r);

    // min is well under the cryo threshold, but suppression gates the raise
    assert!(state.status.min_temp < 5.0);
    assert_eq!(unresolved(&state, AlertCategory::Cryo), 0);
}

// ============================================================================
// Auto-Clear on Cooling
// ============================================================================

#[test]
fn test_auto_revert_drops_unresolved_fire_alerts() {
    let mut state = hot_field();
    let mut r = rng(11);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    let id = state.alerts[0].id;
    assert!(actuate_suppression(&mut state, id));

    // Relaxation toward 18 brings the 150C nodes under 35 within three ticks
    for _ in 0..3 {
        run_simulation_tick(&mut state, &mut r);
    }

    assert_eq!(state.mode, SimulationMode::Normal);
    assert!(state.alert(id).is_none(), "unresolved FIRE alert must leave the set");
    assert_eq!(unresolved(&state, AlertCategory::Fire), 0);
}

#[test]
fn test_auto_revert_keeps_acknowledged_fire_alerts() {
    let mut state = hot_field();
    let mut r = rng(12);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    let id = state.alerts[0].id;

    // Acknowledge first, then suppress the re-raised alert next tick
    assert!(acknowledge_hazard(&mut state, id));
    run_simulation_tick(&mut state, &mut r);
    let second = state.alerts[0].id;
    assert_ne!(second, id);
    assert!(actuate_suppression(&mut state, second));

    for _ in 0..3 {
        run_simulation_tick(&mut state, &mut r);
    }

    assert_eq!(state.mode, SimulationMode::Normal);
    assert!(state.alert(id).is_some(), "acknowledged alerts stay in history");
    assert!(state.alert(second).is_none());
}

// ============================================================================
// Derived Status Fields
// ============================================================================

#[test]
fn test_hvac_forced_idle_while_failed() {
    let mut state = HallState::new(vec![
        sensor_at("a", 0.0, 0.0, 40.0),
        sensor_at("b", 1.0, 0.0, 40.0),
    ]);
    state.set_mode(SimulationMode::HvacFailure);
    let mut r = rng(13);
    run_simulation_tick(&mut state, &mut r);

    // Average far above the band would demand cooling, but the unit is dead
    assert!(state.status.average_temp > 24.0);
    assert!(!state.status.hvac_active);
    assert_eq!(state.status.estimated_kva, 10.0);
}

#[test]
fn test_hvac_active_on_both_band_edges_and_suppression() {
    let mut warm = HallState::new(vec![sensor_at("a", 0.0, 0.0, 30.0)]);
    let mut r = rng(14);
    run_simulation_tick(&mut warm, &mut r);
    assert!(warm.status.hvac_active);
    assert_eq!(warm.status.estimated_kva, 20.0);

    let mut cold = HallState::new(vec![sensor_at("a", 0.0, 0.0, 10.0)]);
    run_simulation_tick(&mut cold, &mut r);
    assert!(cold.status.hvac_active);

    // Peak stays above the revert threshold so suppression keeps running,
    // while the average sits inside the band: only the mode clause applies
    let mut suppressing = HallState::new(vec![
        sensor_at("hot", 0.0, 0.0, 60.0),
        sensor_at("c1", 1.0, 0.0, 18.0),
        sensor_at("c2", 2.0, 0.0, 18.0),
        sensor_at("c3", 3.0, 0.0, 18.0),
    ]);
    suppressing.set_mode(SimulationMode::Suppression);
    run_simulation_tick(&mut suppressing, &mut r);
    assert_eq!(suppressing.mode, SimulationMode::Suppression);
    assert!(suppressing.status.average_temp > 15.0 && suppressing.status.average_temp < 24.0);
    assert!(suppressing.status.hvac_active);
    assert_eq!(suppressing.status.estimated_kva, 88.0);
}

#[test]
fn test_stability_index_pins_to_ten_under_fire() {
    let mut state = hot_field();
    let mut r = rng(15);
    run_simulation_tick(&mut state, &mut r);
    // One hot tick in: no alarm yet, stability still reflects uniformity
    assert!(state.status.stability_index > 10.0);

    run_simulation_tick(&mut state, &mut r);
    assert_eq!(state.status.stability_index, 10.0);
}

#[test]
fn test_active_incidents_counts_unresolved_only() {
    let mut state = hot_field();
    let mut r = rng(16);
    run_simulation_tick(&mut state, &mut r);
    run_simulation_tick(&mut state, &mut r);
    assert_eq!(state.status.active_incidents, 1);

    let id = state.alerts[0].id;
    acknowledge_hazard(&mut state, id);
    assert_eq!(state.status.active_incidents, 0);
}

// ============================================================================
// Link-Health Alerts
// ============================================================================

#[test]
fn test_offline_sensor_raises_one_maintenance_alert() {
    let mut state = HallState::new(vec![
        sensor_at("a", 0.0, 0.0, 22.0),
        sensor_at("b", 1.0, 0.0, 22.0),
    ]);
    state.set_link("a", LinkState::Offline);
    let mut r = rng(17);
    for _ in 0..5 {
        run_simulation_tick(&mut state, &mut r);
    }

    let maint: Vec<_> = state
        .alerts
        .iter()
        .filter(|a| a.category == AlertCategory::Maintenance)
        .collect();
    assert_eq!(maint.len(), 1);
    assert_eq!(maint[0].sensor_id.as_deref(), Some("a"));
    // No auto-clear: bringing the node back still leaves the alert standing
    state.set_link("a", LinkState::Online);
    run_simulation_tick(&mut state, &mut r);
    assert_eq!(unresolved(&state, AlertCategory::Maintenance), 1);
}

#[test]
fn test_full_blackout_raises_system_alert() {
    let mut state = HallState::new(vec![
        sensor_at("a", 0.0, 0.0, 22.0),
        sensor_at("b", 1.0, 0.0, 22.0),
    ]);
    state.set_link("a", LinkState::Offline);
    state.set_link("b", LinkState::Offline);
    let mut r = rng(18);
    run_simulation_tick(&mut state, &mut r);

    assert_eq!(unresolved(&state, AlertCategory::System), 1);
    let alert = state
        .alerts
        .iter()
        .find(|a| a.category == AlertCategory::System)
        .unwrap();
    assert_eq!(alert.level, AlertLevel::Critical);
}

// ============================================================================
// Narrative Wiring
// ============================================================================

#[test]
fn test_log_ring_stays_bounded() {
    let mut state = HallState::new(vec![sensor_at("a", 0.0, 0.0, 22.0)]);
    let mut r = rng(19);
    for _ in 0..100 {
        run_simulation_tick(&mut state, &mut r);
    }
    assert!(state.status.logs.len() <= 32);
    assert!(!state.status.last_analysis.is_empty());
}

#[test]
fn test_focus_steers_the_tick_narrative() {
    let mut state = HallState::new(vec![
        sensor_at("a", 0.0, 0.0, 22.0),
        sensor_at("b", 1.0, 0.0, 22.0),
    ]);
    state.set_focus(AnalysisFocus::Diagnostic);
    let mut r = rng(20);
    run_simulation_tick(&mut state, &mut r);
    assert!(state.status.last_analysis.starts_with("[DIAG_CORE]"));

    state.set_focus(AnalysisFocus::Maintenance);
    run_simulation_tick(&mut state, &mut r);
    assert!(state.status.last_analysis.starts_with("[MAINT_REPORT]"));
}
