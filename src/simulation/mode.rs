//! Simulation mode selection
//!
//! The mode tags which per-tick drift rule applies. It is owned by the
//! engine: the operator can set it, and the engine rewrites it itself when
//! a suppression cycle finishes cooling the hall.

use crate::core::error::HallError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Band-keeping controller plus baseline noise
    Normal,
    /// Constant heating inside the configured fire region
    LocalizedFire,
    /// Uniform warming drift across every sensor
    HvacFailure,
    /// Uniform random walk with a wide amplitude
    Chaos,
    /// Constant chilling inside the configured cryo region
    SubZero,
    /// Whole-hall relaxation toward the suppression target
    Suppression,
    /// Virtual heat source moving along a closed path
    RealWorldDrill,
}

impl SimulationMode {
    pub const ALL: [SimulationMode; 7] = [
        SimulationMode::Normal,
        SimulationMode::LocalizedFire,
        SimulationMode::HvacFailure,
        SimulationMode::Chaos,
        SimulationMode::SubZero,
        SimulationMode::Suppression,
        SimulationMode::RealWorldDrill,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SimulationMode::Normal => "Normal",
            SimulationMode::LocalizedFire => "LocalizedFire",
            SimulationMode::HvacFailure => "HvacFailure",
            SimulationMode::Chaos => "Chaos",
            SimulationMode::SubZero => "SubZero",
            SimulationMode::Suppression => "Suppression",
            SimulationMode::RealWorldDrill => "RealWorldDrill",
        }
    }
}

impl std::fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SimulationMode {
    type Err = HallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "nominal" => Ok(SimulationMode::Normal),
            "localizedfire" | "fire" => Ok(SimulationMode::LocalizedFire),
            "hvacfailure" | "hvac" => Ok(SimulationMode::HvacFailure),
            "chaos" => Ok(SimulationMode::Chaos),
            "subzero" | "leak" => Ok(SimulationMode::SubZero),
            "suppression" => Ok(SimulationMode::Suppression),
            "realworlddrill" | "drill" => Ok(SimulationMode::RealWorldDrill),
            other => Err(HallError::UnknownMode(other.to_string())),
        }
    }
}
