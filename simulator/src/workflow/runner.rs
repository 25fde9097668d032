use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenariocore::interface::{
    read_interchange, write_interchange, CartesianPoint, EpochRecord, InterchangeRecord,
    ServoSample, VehiclePose,
};
use scenariocore::math::StatsHelper;
use scenariocore::prelude::{MeasurementConfig, ProcessingStage};
use scenariocore::processing::{
    assemble_epochs, local_range_bearing_elevation, servo_series, servo_track, ChannelOutput,
    MeasurementInput,
    MeasurementStage, ProjectionContext, TrajectoryOutput, TrajectoryStage,
};
use scenariocore::series::SearchableSeries;
use scenariocore::telemetry::{Metrics, MetricsRecorder};
use serde::Serialize;
use std::sync::Arc;

/// Residual statistics of one channel against the noiseless geometry.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub name: String,
    pub period: usize,
    pub rows: usize,
    pub valid: usize,
    pub range_residual_rms: f64,
    pub bearing_residual_rms: f64,
    pub elevation_residual_rms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub trajectory_samples: usize,
    pub interchange_rows: usize,
    pub seed: Option<u64>,
    pub disable_noise: bool,
    pub radar_relative: CartesianPoint,
    pub channels: Vec<ChannelSummary>,
    pub metrics: Metrics,
}

pub struct WorkflowResult {
    pub truth: TrajectoryOutput,
    pub channels: Vec<ChannelOutput>,
    pub servo: Vec<ServoSample>,
    /// One combined sensor record per trajectory row.
    pub epochs: Vec<EpochRecord>,
    /// Geocentric truth, one dataset per channel, then the servo dataset.
    pub datasets: Vec<SearchableSeries>,
    pub summary: RunSummary,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

fn channel_summary(
    channel: &ChannelOutput,
    records: &[InterchangeRecord],
    observer: &CartesianPoint,
) -> ChannelSummary {
    let mut range = Vec::new();
    let mut bearing = Vec::new();
    let mut elevation = Vec::new();
    for (measurement, record) in channel.measurements.iter().zip(records) {
        let Some(reading) = measurement.reading else {
            continue;
        };
        let truth = local_range_bearing_elevation(observer, &record.position());
        range.push(reading.range - truth.range);
        bearing.push(reading.bearing_deg - truth.bearing_deg);
        elevation.push(reading.elevation_deg - truth.elevation_deg);
    }
    ChannelSummary {
        name: channel.name.clone(),
        period: channel.period,
        rows: channel.measurements.len(),
        valid: range.len(),
        range_residual_rms: StatsHelper::rms(&range),
        bearing_residual_rms: StatsHelper::rms(&bearing),
        elevation_residual_rms: StatsHelper::rms(&elevation),
    }
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    fn channel_rng(&self, index: usize) -> StdRng {
        match self.config.measurement.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let scenario = &self.config.scenario;
        let measurement = &self.config.measurement;
        let metrics = Arc::new(MetricsRecorder::new());

        let initial = scenario
            .initial_state()
            .context("building initial kinematic state")?;
        let mut trajectory_stage = TrajectoryStage::new();
        trajectory_stage
            .initialize(&scenario.to_trajectory_config())
            .context("initializing trajectory stage")?;
        let truth = trajectory_stage
            .execute(initial)
            .context("executing trajectory stage")?;
        trajectory_stage.cleanup();

        let interchange_path = &self.config.interchange_path;
        let interchange_rows = write_interchange(interchange_path, &truth.samples)
            .with_context(|| format!("writing interchange {}", interchange_path.display()))?;
        let records = read_interchange(interchange_path)
            .with_context(|| format!("reading interchange {}", interchange_path.display()))?;

        let projection = ProjectionContext::new(self.config.origin, self.config.radar);
        let observer = projection.radar_local();
        let mut channels = Vec::with_capacity(measurement.channels.len());
        for (index, channel) in measurement.channels.iter().enumerate() {
            let mut stage =
                MeasurementStage::new(self.channel_rng(index)).with_metrics(metrics.clone());
            stage
                .initialize(&MeasurementConfig {
                    channel: channel.clone(),
                    disable_noise: measurement.disable_noise,
                })
                .with_context(|| format!("initializing channel '{}'", channel.name))?;
            let output = stage
                .execute(MeasurementInput {
                    records: records.clone(),
                    observer,
                })
                .with_context(|| format!("executing channel '{}'", channel.name))?;
            stage.cleanup();
            channels.push(output);
        }

        let servo = servo_track(&records, &observer);
        let vehicle = VehiclePose {
            position: self.config.radar,
            attitude: measurement.platform_attitude,
        };
        let epochs = assemble_epochs(&records, &channels, &servo, &vehicle)
            .context("assembling per-epoch sensor records")?;

        let mut datasets = Vec::with_capacity(channels.len() + 2);
        datasets.push(
            projection
                .project_truth(&truth.series)
                .context("projecting truth trajectory")?,
        );
        for channel in &channels {
            datasets.push(
                projection
                    .project_channel(channel)
                    .with_context(|| format!("projecting channel '{}'", channel.name))?,
            );
        }
        datasets.push(servo_series(&servo).context("assembling servo dataset")?);

        let summary = RunSummary {
            trajectory_samples: truth.samples.len(),
            interchange_rows,
            seed: measurement.seed,
            disable_noise: measurement.disable_noise,
            radar_relative: projection.radar_relative(),
            channels: channels
                .iter()
                .map(|channel| channel_summary(channel, &records, &observer))
                .collect(),
            metrics: metrics.snapshot(),
        };
        info!(
            "workflow complete: {} samples, {} datasets, metrics {:?}",
            summary.trajectory_samples,
            datasets.len(),
            summary.metrics
        );

        Ok(WorkflowResult {
            truth,
            channels,
            servo,
            epochs,
            datasets,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenariocore::interface::{GeodeticPoint, SensorStatus};
    use scenariocore::series::Column;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, disable_noise: bool) -> WorkflowConfig {
        let mut cfg = WorkflowConfig::from_args(0.01, 2.0, Some(21), disable_noise);
        cfg.interchange_path = dir.path().join("scenario.csv");
        cfg
    }

    #[test]
    fn runner_executes_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let result = Runner::new(config_in(&dir, false)).execute().unwrap();

        assert_eq!(result.summary.trajectory_samples, 201);
        assert_eq!(result.summary.interchange_rows, 200);
        assert_eq!(result.datasets.len(), 5);
        let valid: Vec<usize> = result.channels.iter().map(|c| c.valid_count()).collect();
        assert_eq!(valid, vec![200, 10, 2]);
        assert_eq!(result.datasets[2].len(), 10);
        assert_eq!(result.servo.len(), 200);
        assert_eq!(result.summary.metrics.processed_rows, 600);
        assert!(result.summary.channels[0].range_residual_rms > 0.0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let first = Runner::new(config_in(&dir, false)).execute().unwrap();
        let second = Runner::new(config_in(&dir, false)).execute().unwrap();
        assert_eq!(first.truth.samples, second.truth.samples);
        for (a, b) in first.channels.iter().zip(&second.channels) {
            assert_eq!(a.measurements, b.measurements);
        }
    }

    #[test]
    fn noiseless_run_has_zero_residuals() {
        let dir = tempfile::tempdir().unwrap();
        let result = Runner::new(config_in(&dir, true)).execute().unwrap();
        for channel in &result.summary.channels {
            assert_eq!(channel.range_residual_rms, 0.0);
            assert_eq!(channel.bearing_residual_rms, 0.0);
            assert_eq!(channel.elevation_residual_rms, 0.0);
        }

        let truth = &result.datasets[0];
        let radar = &result.datasets[1];
        let tx = truth.column(Column::X).unwrap();
        let rx = radar.column(Column::X).unwrap();
        for (a, b) in tx.iter().zip(rx) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn noiseless_channels_from_offset_radar_match_truth() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, true);
        cfg.radar = GeodeticPoint::new(39.91, 32.80, 1000.0);
        let result = Runner::new(cfg).execute().unwrap();

        let truth = &result.datasets[0];
        let radar = &result.datasets[1];
        assert_eq!(radar.len(), result.summary.interchange_rows);
        for (a, b) in truth.points().unwrap().iter().zip(radar.points().unwrap()) {
            assert!(a.sub(b).norm() < 1e-5, "{:?} vs {:?}", a, b);
        }
        let truth_range = truth.column(Column::Range).unwrap();
        let radar_range = radar.column(Column::Range).unwrap();
        for (a, b) in truth_range.iter().zip(radar_range) {
            assert!((a - b).abs() < 1e-5, "{} vs {}", a, b);
        }
        assert!(result.summary.radar_relative.norm() > 1000.0);
    }

    #[test]
    fn epochs_follow_interchange_rows() {
        let dir = tempfile::tempdir().unwrap();
        let result = Runner::new(config_in(&dir, false)).execute().unwrap();

        assert_eq!(result.epochs.len(), result.summary.interchange_rows);
        let laser_rows: Vec<usize> = result
            .epochs
            .iter()
            .enumerate()
            .filter(|(_, e)| e.laser.status == SensorStatus::Track)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(laser_rows, vec![0, 100]);
        assert_eq!(result.epochs[40].thermal_camera.status, SensorStatus::Track);
        assert_eq!(result.epochs[41].thermal_camera.status, SensorStatus::NoTrack);
        assert_eq!(result.epochs[7].servo, result.servo[7]);
        assert_eq!(result.epochs[7].vehicle.position.latitude_deg, 39.90);
    }

    #[test]
    fn unwritable_interchange_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, true);
        cfg.interchange_path = dir.path().join("missing").join("scenario.csv");
        let err = Runner::new(cfg).execute().err().unwrap();
        assert!(format!("{:#}", err).contains("writing interchange"));
    }
}
