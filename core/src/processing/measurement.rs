use crate::interface::epoch::SensorKind;
use crate::interface::geometry::CartesianPoint;
use crate::interface::interchange::InterchangeRecord;
use crate::interface::measurement::{Measurement, RangeBearingElevation};
use crate::prelude::{ChannelConfig, MeasurementConfig, ProcessingStage, StageError, StageResult};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use rand::Rng;
use rand_distr::StandardNormal;
use std::sync::Arc;

/// Measurement timestamps are rounded to this resolution (1 µs).
const TIME_RESOLUTION: f64 = 1e6;

pub(crate) fn round_time(time: f64) -> f64 {
    (time * TIME_RESOLUTION).round() / TIME_RESOLUTION
}

/// Range/bearing/elevation of `target` from `observer`, both in the local
/// simulation frame with z up. Bearing is `atan2(dy, dx)`.
pub fn local_range_bearing_elevation(
    observer: &CartesianPoint,
    target: &CartesianPoint,
) -> RangeBearingElevation {
    let delta = target.sub(observer);
    let horizontal = (delta.x * delta.x + delta.y * delta.y).sqrt();
    RangeBearingElevation::new(
        delta.norm(),
        delta.y.atan2(delta.x).to_degrees(),
        delta.z.atan2(horizontal).to_degrees(),
    )
}

/// Decimated, noisy readings for one channel.
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    pub name: String,
    pub period: usize,
    pub sensor: Option<SensorKind>,
    /// One entry per input row; decimated-out rows carry no reading.
    pub measurements: Vec<Measurement>,
}

impl ChannelOutput {
    pub fn valid_count(&self) -> usize {
        self.measurements.iter().filter(|m| m.is_valid()).count()
    }
}

/// Produces one channel from trajectory rows. Rows at indices divisible by
/// the channel period get a reading with zero-mean Gaussian noise drawn from
/// `rng` in range, bearing, elevation order; the others get none.
pub fn simulate_channel<R: Rng + ?Sized>(
    records: &[InterchangeRecord],
    observer: &CartesianPoint,
    channel: &ChannelConfig,
    disable_noise: bool,
    rng: &mut R,
) -> StageResult<ChannelOutput> {
    channel.validate()?;
    let (sigma_range, sigma_bearing, sigma_elevation) = if disable_noise {
        (0.0, 0.0, 0.0)
    } else {
        (
            channel.sigma_range_m,
            channel.sigma_bearing_deg,
            channel.sigma_elevation_deg,
        )
    };

    let measurements = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let time = round_time(record.time + channel.delay_s);
            if index % channel.period != 0 {
                return Measurement::unsampled(time);
            }
            let truth = local_range_bearing_elevation(observer, &record.position());
            let range = truth.range + rng.sample::<f64, _>(StandardNormal) * sigma_range;
            let bearing =
                truth.bearing_deg + rng.sample::<f64, _>(StandardNormal) * sigma_bearing;
            let elevation =
                truth.elevation_deg + rng.sample::<f64, _>(StandardNormal) * sigma_elevation;
            Measurement::sampled(time, RangeBearingElevation::new(range, bearing, elevation))
        })
        .collect();

    Ok(ChannelOutput {
        name: channel.name.clone(),
        period: channel.period,
        sensor: channel.sensor,
        measurements,
    })
}

/// Input to [`MeasurementStage`].
#[derive(Debug, Clone)]
pub struct MeasurementInput {
    pub records: Vec<InterchangeRecord>,
    /// Sensor position in the local simulation frame.
    pub observer: CartesianPoint,
}

/// Measurement simulation for one channel, drawing noise from an injected
/// generator.
pub struct MeasurementStage<R: Rng> {
    rng: R,
    config: Option<MeasurementConfig>,
    logger: LogManager,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl<R: Rng> MeasurementStage<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: None,
            logger: LogManager::new("measurement"),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn record_metrics(&self, output: &ChannelOutput) {
        let Some(metrics) = self.metrics.as_ref() else {
            return;
        };
        metrics.record_processed(output.measurements.len());
        for measurement in &output.measurements {
            match measurement.reading {
                Some(reading) => {
                    metrics.record_valid();
                    if !reading.is_finite() {
                        metrics.record_degenerate();
                    }
                }
                None => metrics.record_unsampled(),
            }
        }
    }
}

impl<R: Rng> ProcessingStage for MeasurementStage<R> {
    type Config = MeasurementConfig;
    type Input = MeasurementInput;
    type Output = ChannelOutput;

    fn initialize(&mut self, config: &MeasurementConfig) -> StageResult<()> {
        config.channel.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: MeasurementInput) -> StageResult<ChannelOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        if input.records.is_empty() {
            return Err(StageError::InvalidInput("no trajectory rows to measure".into()));
        }

        let output = simulate_channel(
            &input.records,
            &input.observer,
            &config.channel,
            config.disable_noise,
            &mut self.rng,
        )?;

        let degenerate = output
            .measurements
            .iter()
            .filter_map(|m| m.reading)
            .filter(|r| !r.is_finite())
            .count();
        if degenerate > 0 {
            self.logger.caution(&format!(
                "{}: {} readings are numerically degenerate",
                output.name, degenerate
            ));
        }
        self.logger.record(&format!(
            "{}: {} of {} rows sampled (period {})",
            output.name,
            output.valid_count(),
            output.measurements.len(),
            output.period
        ));
        self.record_metrics(&output);
        Ok(output)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
