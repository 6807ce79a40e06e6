//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Region bounds and thresholds are
//! facility data, not physics: a different hall ships a different config.

use crate::core::error::{HallError, Result};
use crate::core::types::{PlanRect, Tick};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the simulation and hazard-monitoring systems
///
/// Defaults reproduce the reference facility: a 50x40x15 m hall with the
/// fire drill region in its south-west quadrant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TICK ===
    /// Wall-clock interval of one simulation tick (milliseconds)
    ///
    /// All per-tick rates below are expressed against this period. The
    /// suppression lockout (`suppression_lockout_ticks`) relies on the
    /// default 1000ms to equal its nominal 8 seconds.
    pub tick_interval_ms: u64,

    // === TEMPERATURE ENVELOPE ===
    /// Hard lower clamp applied to every sensor after each tick (degC)
    pub temp_floor: f32,
    /// Hard upper clamp applied to every sensor after each tick (degC)
    pub temp_ceiling: f32,
    /// Ambient temperature sensors relax toward in drill mode (degC)
    pub ambient_temp: f32,
    /// Lower bound of the ideal band; uniformity counts sensors inside it
    pub ideal_temp_min: f32,
    /// Upper bound of the ideal band
    ///
    /// Above this the normal-mode controller cools at `normal_correction`
    /// per tick, and the HVAC is considered demanded.
    pub ideal_temp_max: f32,

    // === HAZARD THRESHOLDS ===
    /// Temperature at which a sensor counts toward the fire quorum (degC)
    pub fire_threshold: f32,
    /// Minimum temperature below which the cryo hazard trips (degC)
    pub cryo_threshold: f32,
    /// Average temperature below which the HVAC switches to warming (degC)
    pub hvac_low_threshold: f32,
    /// Aggregated max below which an active suppression cycle ends (degC)
    ///
    /// Must sit above `suppression_target`, otherwise the relaxation
    /// asymptote never crosses it and suppression runs forever.
    pub suppression_revert_temp: f32,

    // === DRIFT RATES (degC per tick) ===
    /// Half-width of the baseline noise band applied when no rule fires
    pub baseline_noise: f32,
    /// Correction step the normal-mode controller applies outside the band
    pub normal_correction: f32,
    /// Heating applied inside the fire region in LocalizedFire mode
    pub fire_drift: f32,
    /// Cooling applied inside the cryo region in SubZero mode (negative)
    pub cryo_drift: f32,
    /// Lower bound of the uniform warming drift in HvacFailure mode
    pub hvac_drift_min: f32,
    /// Upper bound of the uniform warming drift in HvacFailure mode
    pub hvac_drift_max: f32,
    /// Half-width of the uniform delta band in Chaos mode
    pub chaos_amplitude: f32,
    /// Temperature suppression pulls the hall toward (degC)
    pub suppression_target: f32,
    /// Relaxation rate toward `suppression_target` while suppressing
    ///
    /// At 0.5 the gap to the target halves every tick, so a 150 degC hot
    /// spot is back under the revert threshold within three ticks.
    pub suppression_rate: f32,
    /// Relaxation rate toward `ambient_temp` outside the drill source
    pub ambient_relax_rate: f32,

    // === HAZARD REGIONS (plan coordinates) ===
    /// Region heated in LocalizedFire mode
    pub fire_region: PlanRect,
    /// Region chilled in SubZero mode
    pub cryo_region: PlanRect,

    // === DRILL HEAT SOURCE ===
    /// Virtual time added to the drill path parameter each tick
    pub drill_time_step: f32,
    /// Plan-x amplitude of the drill path (x = amplitude * sin(rate * t))
    pub drill_x_amplitude: f32,
    pub drill_x_rate: f32,
    /// Plan-z amplitude of the drill path (z = amplitude * cos(rate * t))
    pub drill_z_amplitude: f32,
    pub drill_z_rate: f32,
    /// Squared plan distance inside which the source heats a sensor
    pub drill_radius_sq: f32,
    /// Numerator of the source heating curve: delta = gain / (d^2 + softening)
    pub drill_source_gain: f32,
    /// Softening term keeping the heating curve finite at zero distance
    pub drill_source_softening: f32,

    // === FIRE DEBOUNCE ===
    /// Number of simultaneously hot online sensors required to arm the
    /// persistence counter
    ///
    /// A single saturated or faulty node never feeds the counter.
    pub fire_sensor_quorum: usize,
    /// Upper clamp of the persistence counter
    pub fire_persistence_max: u8,
    /// Counter value at which the fire alarm asserts
    ///
    /// At 2, the alarm needs two consecutive qualifying ticks, so a
    /// one-tick spike decays back out of the counter without alarming.
    pub fire_persistence_arm: u8,
    /// Ticks after suppression actuation during which no new FIRE/CRYO
    /// hazard may be raised
    pub suppression_lockout_ticks: Tick,

    // === STATUS DERIVATION ===
    /// Capacity of the most-recent-first status log ring
    pub log_capacity: usize,
    /// Base load of the power model (kVA)
    pub kva_base: f32,
    /// Additional draw while suppression pumps run (kVA)
    pub kva_suppression: f32,
    /// Additional draw with the HVAC unit dead (kVA)
    pub kva_hvac_failure: f32,
    /// Additional draw under nominal HVAC operation (kVA)
    pub kva_nominal: f32,

    // === NARRATIVE THRESHOLDS ===
    /// Temperature above which the narrative calls a node "hot" (degC)
    pub hot_node_temp: f32,
    /// Temperature below which the narrative calls a node "cold" (degC)
    pub cold_node_temp: f32,
    /// Absolute drift above which a node is reported as unstable
    pub unstable_drift: f32,
    /// Cold-node count above which the cryogenic-leak wording is used
    pub cryo_narrative_quorum: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,

            // Envelope
            temp_floor: -40.0,
            temp_ceiling: 200.0,
            ambient_temp: 22.0,
            ideal_temp_min: 18.0,
            ideal_temp_max: 24.0,

            // Hazard thresholds
            fire_threshold: 85.0,
            cryo_threshold: 5.0,
            hvac_low_threshold: 15.0,
            suppression_revert_temp: 35.0,

            // Drift rates
            baseline_noise: 0.05,
            normal_correction: 0.3,
            fire_drift: 8.5,
            cryo_drift: -12.0,
            hvac_drift_min: 0.5,
            hvac_drift_max: 0.9,
            chaos_amplitude: 15.0,
            suppression_target: 18.0,
            suppression_rate: 0.5,
            ambient_relax_rate: 0.1,

            // Regions
            fire_region: PlanRect::new(-15.0, -5.0, f32::NEG_INFINITY, 0.0),
            cryo_region: PlanRect::new(10.0, f32::INFINITY, 5.0, f32::INFINITY),

            // Drill path
            drill_time_step: 0.1,
            drill_x_amplitude: 20.0,
            drill_x_rate: 0.5,
            drill_z_amplitude: 15.0,
            drill_z_rate: 0.3,
            drill_radius_sq: 50.0,
            drill_source_gain: 80.0,
            drill_source_softening: 2.0,

            // Fire debounce
            fire_sensor_quorum: 2,
            fire_persistence_max: 5,
            fire_persistence_arm: 2,
            suppression_lockout_ticks: 8,

            // Status
            log_capacity: 32,
            kva_base: 8.0,
            kva_suppression: 80.0,
            kva_hvac_failure: 2.0,
            kva_nominal: 12.0,

            // Narrative
            hot_node_temp: 55.0,
            cold_node_temp: 5.0,
            unstable_drift: 0.8,
            cryo_narrative_quorum: 5,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, validating it
    ///
    /// Missing fields fall back to defaults, so a facility config only
    /// states what differs from the reference hall.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = toml::from_str(&content)?;
        config.validate().map_err(HallError::ConfigError)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.temp_floor >= self.temp_ceiling {
            return Err(format!(
                "temp_floor ({}) must be below temp_ceiling ({})",
                self.temp_floor, self.temp_ceiling
            ));
        }

        if self.ideal_temp_min >= self.ideal_temp_max {
            return Err(format!(
                "ideal_temp_min ({}) must be below ideal_temp_max ({})",
                self.ideal_temp_min, self.ideal_temp_max
            ));
        }

        if self.fire_threshold <= self.ideal_temp_max {
            return Err(format!(
                "fire_threshold ({}) must be above ideal_temp_max ({})",
                self.fire_threshold, self.ideal_temp_max
            ));
        }

        if self.suppression_revert_temp <= self.suppression_target {
            return Err(format!(
                "suppression_revert_temp ({}) must be above suppression_target ({})",
                self.suppression_revert_temp, self.suppression_target
            ));
        }

        if self.fire_persistence_arm > self.fire_persistence_max {
            return Err(format!(
                "fire_persistence_arm ({}) must not exceed fire_persistence_max ({})",
                self.fire_persistence_arm, self.fire_persistence_max
            ));
        }

        if self.hvac_drift_min > self.hvac_drift_max {
            return Err(format!(
                "hvac_drift_min ({}) must not exceed hvac_drift_max ({})",
                self.hvac_drift_min, self.hvac_drift_max
            ));
        }

        if self.fire_region.x_min >= self.fire_region.x_max {
            return Err("fire_region x bounds are inverted".into());
        }

        if self.log_capacity == 0 {
            return Err("log_capacity must be at least 1".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimulationConfig {
    CONFIG.get_or_init(SimulationConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimulationConfig) -> std::result::Result<(), SimulationConfig> {
    CONFIG.set(config)
}
