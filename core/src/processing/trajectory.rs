use crate::interface::geometry::Frame;
use crate::interface::state::{KinematicState, TrajectorySample};
use crate::motion::coordinated_turn;
use crate::prelude::{ProcessingStage, StageError, StageResult, TrajectoryConfig};
use crate::series::{Column, SearchableSeries, SeriesBuilder};
use crate::telemetry::log::LogManager;

pub const TRUTH_SERIES_NAME: &str = "Truth Trajectory";

/// Absorbs rounding in `t_final / dt` so an exact multiple of the step
/// keeps its final sample and gains no extra one.
const STEP_RATIO_TOLERANCE: f64 = 1e-9;

/// Truth trajectory in the local simulation frame.
#[derive(Debug, Clone)]
pub struct TrajectoryOutput {
    pub samples: Vec<TrajectorySample>,
    pub series: SearchableSeries,
}

/// Number of samples for a horizon: `ceil(t_final / dt) + 1`.
pub fn sample_count(config: &TrajectoryConfig) -> usize {
    let steps = (config.t_final / config.dt - STEP_RATIO_TOLERANCE).ceil().max(0.0);
    steps as usize + 1
}

/// Runs the coordinated-turn propagator from `initial` over the horizon.
/// Sample `k` is taken at `k * dt` and recorded before the state advances.
pub fn synthesize(
    initial: &KinematicState,
    config: &TrajectoryConfig,
) -> StageResult<TrajectoryOutput> {
    config.validate()?;
    let count = sample_count(config);

    let mut builder = SeriesBuilder::new(TRUTH_SERIES_NAME, Frame::Local)
        .line_series(true)
        .columns(&Column::POSITION)
        .with_points()
        .with_capacity(count);
    let mut samples = Vec::with_capacity(count);

    let mut state = *initial;
    for k in 0..count {
        let time = k as f64 * config.dt;
        let position = state.position();
        builder.push(time, &[position.x, position.y, position.z], Some(position))?;
        samples.push(TrajectorySample { time, state });
        state = coordinated_turn(&state, config.dt);
    }

    Ok(TrajectoryOutput {
        samples,
        series: builder.build(),
    })
}

/// Trajectory synthesis wrapped as a pipeline stage.
pub struct TrajectoryStage {
    config: Option<TrajectoryConfig>,
    logger: LogManager,
}

impl TrajectoryStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("trajectory"),
        }
    }
}

impl Default for TrajectoryStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for TrajectoryStage {
    type Config = TrajectoryConfig;
    type Input = KinematicState;
    type Output = TrajectoryOutput;

    fn initialize(&mut self, config: &TrajectoryConfig) -> StageResult<()> {
        config.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: KinematicState) -> StageResult<TrajectoryOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let output = synthesize(&input, config)?;
        self.logger.record(&format!(
            "synthesized {} samples over {:.3} s (dt {})",
            output.samples.len(),
            config.t_final,
            config.dt
        ));
        Ok(output)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
