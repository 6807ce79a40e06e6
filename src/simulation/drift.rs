//! Per-tick temperature drift rules
//!
//! One delta per sensor per tick, selected by the active mode. The rules
//! are pure given the sensor, the drill heat source and an RNG; the clamp
//! to the temperature envelope happens at the sensor when the delta is
//! applied.

use crate::core::config::SimulationConfig;
use crate::hall::sensor::Sensor;
use crate::simulation::mode::SimulationMode;
use rand::Rng;

/// Virtual heat source walked along a closed plan-view path during drills
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatSource {
    pub time: f32,
    pub x: f32,
    pub z: f32,
}

impl HeatSource {
    /// Advance one tick along the path
    pub fn advance(&mut self, cfg: &SimulationConfig) {
        self.time += cfg.drill_time_step;
        self.x = (self.time * cfg.drill_x_rate).sin() * cfg.drill_x_amplitude;
        self.z = (self.time * cfg.drill_z_rate).cos() * cfg.drill_z_amplitude;
    }
}

/// Compute the drift delta for one sensor under the active mode
pub fn compute_drift(
    sensor: &Sensor,
    mode: SimulationMode,
    source: &HeatSource,
    cfg: &SimulationConfig,
    rng: &mut impl Rng,
) -> f32 {
    match mode {
        SimulationMode::RealWorldDrill => {
            let dist_sq = sensor.position.plan_dist_sq(source.x, source.z);
            if dist_sq < cfg.drill_radius_sq {
                cfg.drill_source_gain / (dist_sq + cfg.drill_source_softening)
            } else {
                (cfg.ambient_temp - sensor.temperature) * cfg.ambient_relax_rate
            }
        }
        SimulationMode::LocalizedFire => {
            if cfg.fire_region.contains(sensor.position.x, sensor.position.z) {
                cfg.fire_drift
            } else {
                baseline_noise(cfg, rng)
            }
        }
        SimulationMode::SubZero => {
            if cfg.cryo_region.contains(sensor.position.x, sensor.position.z) {
                cfg.cryo_drift
            } else {
                baseline_noise(cfg, rng)
            }
        }
        SimulationMode::HvacFailure => rng.gen_range(cfg.hvac_drift_min..=cfg.hvac_drift_max),
        SimulationMode::Suppression => {
            (cfg.suppression_target - sensor.temperature) * cfg.suppression_rate
        }
        SimulationMode::Chaos => rng.gen_range(-cfg.chaos_amplitude..=cfg.chaos_amplitude),
        SimulationMode::Normal => {
            if sensor.temperature > cfg.ideal_temp_max {
                -cfg.normal_correction
            } else if sensor.temperature < cfg.ideal_temp_min {
                cfg.normal_correction
            } else {
                baseline_noise(cfg, rng)
            }
        }
    }
}

/// Small symmetric noise applied when no rule overrides it
fn baseline_noise(cfg: &SimulationConfig, rng: &mut impl Rng) -> f32 {
    rng.gen_range(-cfg.baseline_noise..=cfg.baseline_noise)
}
