pub mod drift;
pub mod hazard;
pub mod mode;
pub mod telemetry;
pub mod tick;

pub use drift::{compute_drift, HeatSource};
pub use hazard::{acknowledge_hazard, actuate_suppression, Alert, AlertCategory, AlertLevel};
pub use mode::SimulationMode;
pub use telemetry::{summarize, ThermalSummary};
pub use tick::{run_simulation_tick, SimulationEvent};
