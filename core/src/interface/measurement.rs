use serde::{Deserialize, Serialize};

/// Range in metres, bearing and elevation in degrees.
///
/// Degenerate geometry (zero range) yields NaN components rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBearingElevation {
    pub range: f64,
    pub bearing_deg: f64,
    pub elevation_deg: f64,
}

impl RangeBearingElevation {
    pub fn new(range: f64, bearing_deg: f64, elevation_deg: f64) -> Self {
        Self {
            range,
            bearing_deg,
            elevation_deg,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.range.is_finite() && self.bearing_deg.is_finite() && self.elevation_deg.is_finite()
    }
}

/// One row of a simulated sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Timestamp rounded to microseconds, including the channel delay.
    pub time: f64,
    /// `None` when the row was decimated out.
    pub reading: Option<RangeBearingElevation>,
}

impl Measurement {
    pub fn sampled(time: f64, reading: RangeBearingElevation) -> Self {
        Self {
            time,
            reading: Some(reading),
        }
    }

    pub fn unsampled(time: f64) -> Self {
        Self {
            time,
            reading: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.reading.is_some()
    }
}

/// Pointing of the sensor platform and turret at one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoSample {
    pub time: f64,
    pub platform_yaw_deg: f64,
    pub platform_pitch_deg: f64,
    pub turret_bearing_deg: f64,
}
