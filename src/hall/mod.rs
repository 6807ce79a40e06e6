pub mod layout;
pub mod sensor;
pub mod state;

pub use layout::{generate_sensors, FacilityLayout};
pub use sensor::{LinkState, Sensor, SensorKind};
pub use state::{HallState, SiteStatus};
