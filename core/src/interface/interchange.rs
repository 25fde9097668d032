//! Text interchange between trajectory synthesis and measurement simulation.
//!
//! The file is a comma separated table with the header
//! `time,posX,velX,accelX,posY,velY,accelY,posZ,velZ,accelZ,someValue`.
//! Numbers are written fixed-point with eight decimals; acceleration and the
//! trailing column are always the literal `0`. The final synthesized state is
//! not written.

use crate::interface::geometry::CartesianPoint;
use crate::interface::state::TrajectorySample;
use crate::prelude::{StageError, StageResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const INTERCHANGE_HEADER: [&str; 11] = [
    "time", "posX", "velX", "accelX", "posY", "velY", "accelY", "posZ", "velZ", "accelZ",
    "someValue",
];

/// One decoded interchange row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterchangeRecord {
    pub time: f64,
    #[serde(rename = "posX")]
    pub pos_x: f64,
    #[serde(rename = "velX")]
    pub vel_x: f64,
    #[serde(rename = "accelX")]
    pub accel_x: f64,
    #[serde(rename = "posY")]
    pub pos_y: f64,
    #[serde(rename = "velY")]
    pub vel_y: f64,
    #[serde(rename = "accelY")]
    pub accel_y: f64,
    #[serde(rename = "posZ")]
    pub pos_z: f64,
    #[serde(rename = "velZ")]
    pub vel_z: f64,
    #[serde(rename = "accelZ")]
    pub accel_z: f64,
    #[serde(rename = "someValue")]
    pub some_value: f64,
}

impl InterchangeRecord {
    pub fn from_sample(sample: &TrajectorySample) -> Self {
        let state = &sample.state;
        Self {
            time: sample.time,
            pos_x: state.x,
            vel_x: state.vx,
            accel_x: 0.0,
            pos_y: state.y,
            vel_y: state.vy,
            accel_y: 0.0,
            pos_z: state.z,
            vel_z: state.vz,
            accel_z: 0.0,
            some_value: 0.0,
        }
    }

    pub fn position(&self) -> CartesianPoint {
        CartesianPoint::new(self.pos_x, self.pos_y, self.pos_z)
    }

    fn fields(&self) -> [(&'static str, f64); 11] {
        [
            ("time", self.time),
            ("posX", self.pos_x),
            ("velX", self.vel_x),
            ("accelX", self.accel_x),
            ("posY", self.pos_y),
            ("velY", self.vel_y),
            ("accelY", self.accel_y),
            ("posZ", self.pos_z),
            ("velZ", self.vel_z),
            ("accelZ", self.accel_z),
            ("someValue", self.some_value),
        ]
    }
}

fn fixed(value: f64) -> String {
    format!("{:.8}", value)
}

fn interchange_error(path: &Path, message: impl Into<String>) -> StageError {
    StageError::Interchange {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Writes every sample except the last one. Returns the number of data rows.
pub fn write_interchange<P: AsRef<Path>>(
    path: P,
    samples: &[TrajectorySample],
) -> StageResult<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| interchange_error(path, format!("cannot create: {}", err)))?;
    writer.write_record(INTERCHANGE_HEADER)?;

    let rows = samples.len().saturating_sub(1);
    for sample in &samples[..rows] {
        let state = &sample.state;
        writer.write_record([
            fixed(sample.time),
            fixed(state.x),
            fixed(state.vx),
            "0".to_string(),
            fixed(state.y),
            fixed(state.vy),
            "0".to_string(),
            fixed(state.z),
            fixed(state.vz),
            "0".to_string(),
            "0".to_string(),
        ])?;
    }
    writer.flush()?;
    debug!("wrote {} interchange rows to {}", rows, path.display());
    Ok(rows)
}

/// Reads an interchange file. Missing, empty, or malformed files are errors.
pub fn read_interchange<P: AsRef<Path>>(path: P) -> StageResult<Vec<InterchangeRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| interchange_error(path, format!("cannot open: {}", err)))?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<InterchangeRecord>().enumerate() {
        let record = result.map_err(|err| {
            interchange_error(path, format!("malformed data row {}: {}", row + 1, err))
        })?;
        // serde accepts "nan" and "inf" as floats
        if let Some((field, value)) = record.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(interchange_error(
                path,
                format!("malformed data row {}: {} is {}", row + 1, field, value),
            ));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(StageError::EmptyInterchange(path.to_path_buf()));
    }
    debug!("read {} interchange rows from {}", records.len(), path.display());
    Ok(records)
}
