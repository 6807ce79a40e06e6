pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, SimulationConfig};
