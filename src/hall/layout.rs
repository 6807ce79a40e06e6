//! Sensor field layout - static spatial generator for the facility
//!
//! Produces the initial sensor set: four faces per structural pillar at
//! three mount heights, perimeter wall nodes at two heights, and a ceiling
//! grid. The layout is pure data; nothing here depends on simulation state.

use crate::core::types::Vec3;
use crate::hall::sensor::{Sensor, SensorKind};

/// Structural description of the hall the sensor field covers
#[derive(Debug, Clone)]
pub struct FacilityLayout {
    /// Interior span along x (metres)
    pub room_width: f32,
    /// Interior span along z (metres)
    pub room_depth: f32,
    /// Floor-to-ceiling height (metres)
    pub room_height: f32,
    /// Plan positions of the structural pillars
    pub pillar_positions: Vec<(f32, f32)>,
    /// Heights at which each pillar carries a sensor ring
    pub pillar_mount_heights: Vec<f32>,
    /// Distance from the pillar axis to a face-mounted sensor
    pub pillar_face_offset: f32,
    /// Heights at which the perimeter walls carry sensors
    pub wall_mount_heights: Vec<f32>,
}

impl Default for FacilityLayout {
    fn default() -> Self {
        Self {
            room_width: 50.0,
            room_depth: 40.0,
            room_height: 15.0,
            pillar_positions: vec![
                (-15.0, -10.0), (-5.0, -10.0), (5.0, -10.0), (15.0, -10.0),
                (-15.0, 10.0), (-5.0, 10.0), (5.0, 10.0), (15.0, 10.0),
            ],
            pillar_mount_heights: vec![3.0, 7.0, 11.0],
            pillar_face_offset: 0.76,
            wall_mount_heights: vec![4.0, 9.0],
        }
    }
}

/// Generate the full initial sensor set for a layout
///
/// Seed temperatures are mildly stratified by mount kind (pillars warmest,
/// ceiling coolest) so the first ticks start inside the ideal band.
pub fn generate_sensors(layout: &FacilityLayout) -> Vec<Sensor> {
    let mut sensors = Vec::new();

    // Four face-mounted sensors per pillar per mount height
    for (p_idx, &(px, pz)) in layout.pillar_positions.iter().enumerate() {
        for (h_idx, &h) in layout.pillar_mount_heights.iter().enumerate() {
            let off = layout.pillar_face_offset;
            let faces = [(off, 0.0), (-off, 0.0), (0.0, off), (0.0, -off)];
            for (f_idx, &(dx, dz)) in faces.iter().enumerate() {
                sensors.push(Sensor::new(
                    format!("p-{p_idx}-h{h_idx}-f{f_idx}"),
                    Vec3::new(px + dx, h, pz + dz),
                    22.0,
                    45.0,
                    SensorKind::Pillar,
                ));
            }
        }
    }

    // Back wall row, then the two side walls
    for x in (-20..=20).step_by(10) {
        for &h in &layout.wall_mount_heights {
            sensors.push(Sensor::new(
                format!("w-b-{x}-{h}"),
                Vec3::new(x as f32, h, -layout.room_depth / 2.0 + 0.2),
                21.0,
                45.0,
                SensorKind::Wall,
            ));
        }
    }
    for z in (-15..=15).step_by(10) {
        for &h in &layout.wall_mount_heights {
            sensors.push(Sensor::new(
                format!("w-l-{z}-{h}"),
                Vec3::new(-layout.room_width / 2.0 + 0.2, h, z as f32),
                21.0,
                45.0,
                SensorKind::Wall,
            ));
            sensors.push(Sensor::new(
                format!("w-r-{z}-{h}"),
                Vec3::new(layout.room_width / 2.0 - 0.2, h, z as f32),
                21.0,
                45.0,
                SensorKind::Wall,
            ));
        }
    }

    // Ceiling grid
    for x in (-15..=15).step_by(15) {
        for z in (-12..=12).step_by(12) {
            sensors.push(Sensor::new(
                format!("c-{x}-{z}"),
                Vec3::new(x as f32, layout.room_height - 0.2, z as f32),
                20.0,
                40.0,
                SensorKind::Ceiling,
            ));
        }
    }

    sensors
}
