use crate::interface::epoch::SensorKind;
use crate::series::SeriesError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared configuration for the trajectory stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Integration step in seconds.
    pub dt: f64,
    /// Horizon in seconds; the sample at `t_final` is included.
    pub t_final: f64,
}

impl TrajectoryConfig {
    pub fn validate(&self) -> StageResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(StageError::InvalidInput(format!(
                "integration step must be positive, got {}",
                self.dt
            )));
        }
        if !self.t_final.is_finite() || self.t_final < 0.0 {
            return Err(StageError::InvalidInput(format!(
                "horizon must be non-negative, got {}",
                self.t_final
            )));
        }
        Ok(())
    }
}

/// Per-channel sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    /// Decimation period in trajectory rows.
    pub period: usize,
    pub sigma_range_m: f64,
    pub sigma_bearing_deg: f64,
    pub sigma_elevation_deg: f64,
    #[serde(default)]
    pub delay_s: f64,
    /// Slot this channel fills in the per-epoch record, if any.
    #[serde(default)]
    pub sensor: Option<SensorKind>,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>, period: usize) -> Self {
        Self {
            name: name.into(),
            period,
            sigma_range_m: 2.0,
            sigma_bearing_deg: 0.02,
            sigma_elevation_deg: 0.02,
            delay_s: 0.0,
            sensor: None,
        }
    }

    pub fn with_sensor(mut self, sensor: SensorKind) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.period == 0 {
            return Err(StageError::InvalidInput(format!(
                "channel '{}' has a zero decimation period",
                self.name
            )));
        }
        for (label, sigma) in [
            ("range", self.sigma_range_m),
            ("bearing", self.sigma_bearing_deg),
            ("elevation", self.sigma_elevation_deg),
        ] {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(StageError::InvalidInput(format!(
                    "channel '{}' has invalid {} sigma {}",
                    self.name, label, sigma
                )));
            }
        }
        if !self.delay_s.is_finite() {
            return Err(StageError::InvalidInput(format!(
                "channel '{}' has a non-finite delay",
                self.name
            )));
        }
        Ok(())
    }
}

/// Configuration for the measurement stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementConfig {
    pub channel: ChannelConfig,
    /// Forces every sigma to zero.
    pub disable_noise: bool,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("interchange file {path}: {message}")]
    Interchange { path: PathBuf, message: String },
    #[error("interchange file {0} contains no samples")]
    EmptyInterchange(PathBuf),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("series assembly failed: {0}")]
    Series(#[from] SeriesError),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the batch stages of the scenario pipeline.
pub trait ProcessingStage {
    type Config;
    type Input;
    type Output;

    fn initialize(&mut self, config: &Self::Config) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}
