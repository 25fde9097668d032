//! Per-epoch sensor picture handed to downstream consumers: every channel,
//! the servos and the vehicle pose, aligned on trajectory rows.

use crate::interface::geometry::GeodeticPoint;
use crate::interface::measurement::{RangeBearingElevation, ServoSample};
use serde::{Deserialize, Serialize};

/// Which physical sensor a channel stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Range, bearing and elevation.
    TrackRadar,
    /// Bearing and elevation only.
    ThermalCamera,
    /// Range only.
    Laser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    /// No channel is configured for the sensor.
    NotAvailable,
    /// The sensor reported nothing at this epoch.
    NoTrack,
    Track,
}

impl From<&RangeBearingElevation> for RangeBearingElevation {
    fn from(reading: &RangeBearingElevation) -> Self {
        *reading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleReading {
    pub bearing_deg: f64,
    pub elevation_deg: f64,
}

impl From<&RangeBearingElevation> for AngleReading {
    fn from(reading: &RangeBearingElevation) -> Self {
        Self {
            bearing_deg: reading.bearing_deg,
            elevation_deg: reading.elevation_deg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeReading {
    pub range: f64,
}

impl From<&RangeBearingElevation> for RangeReading {
    fn from(reading: &RangeBearingElevation) -> Self {
        Self {
            range: reading.range,
        }
    }
}

/// One sensor's contribution to an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReport<T> {
    /// Measurement time of the channel row; `None` when not available.
    pub time: Option<f64>,
    pub status: SensorStatus,
    pub reading: Option<T>,
}

impl<T> SensorReport<T> {
    pub fn not_available() -> Self {
        Self {
            time: None,
            status: SensorStatus::NotAvailable,
            reading: None,
        }
    }
}

/// Attitude of the carrying vehicle in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformAttitude {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub position: GeodeticPoint,
    pub attitude: PlatformAttitude,
}

/// Everything the sensor suite reports at one trajectory row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub system_time: f64,
    pub track_radar: SensorReport<RangeBearingElevation>,
    pub thermal_camera: SensorReport<AngleReading>,
    pub laser: SensorReport<RangeReading>,
    pub servo: ServoSample,
    pub vehicle: VehiclePose,
}
