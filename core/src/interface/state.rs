use crate::interface::geometry::CartesianPoint;
use serde::{Deserialize, Serialize};

/// Target state in the local simulation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    /// Turn rate in degrees per second. Sign gives the turn direction.
    pub yaw_rate_deg_s: f64,
}

impl KinematicState {
    pub fn new(position: [f64; 3], velocity: [f64; 3], yaw_rate_deg_s: f64) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            vx: velocity[0],
            vy: velocity[1],
            vz: velocity[2],
            yaw_rate_deg_s,
        }
    }

    pub fn position(&self) -> CartesianPoint {
        CartesianPoint::new(self.x, self.y, self.z)
    }

    pub fn horizontal_speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// One trajectory row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub state: KinematicState,
}
