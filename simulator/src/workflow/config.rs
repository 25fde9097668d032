use anyhow::Context;
use scenariocore::interface::{GeodeticPoint, KinematicState, PlatformAttitude, SensorKind};
use scenariocore::motion::{yaw_rate_for_radius, TurnDirection};
use scenariocore::prelude::{ChannelConfig, TrajectoryConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the initial yaw rate is specified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnSpec {
    Straight,
    YawRate {
        deg_per_s: f64,
    },
    Radius {
        radius_m: f64,
        direction: TurnDirection,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSection {
    pub initial_position: [f64; 3],
    pub initial_velocity: [f64; 3],
    pub turn: TurnSpec,
    pub dt: f64,
    pub t_final: f64,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            initial_position: [1000.0, 0.0, 300.0],
            initial_velocity: [-50.0, -60.0, 70.0],
            turn: TurnSpec::Radius {
                radius_m: 170.0,
                direction: TurnDirection::Clockwise,
            },
            dt: 0.01,
            t_final: 25.0,
        }
    }
}

impl ScenarioSection {
    pub fn initial_state(&self) -> anyhow::Result<KinematicState> {
        let [vx, vy, _] = self.initial_velocity;
        let yaw_rate = match &self.turn {
            TurnSpec::Straight => 0.0,
            TurnSpec::YawRate { deg_per_s } => *deg_per_s,
            TurnSpec::Radius {
                radius_m,
                direction,
            } => {
                if !(radius_m.is_finite() && *radius_m > 0.0) {
                    anyhow::bail!("turn radius must be positive, got {}", radius_m);
                }
                yaw_rate_for_radius((vx * vx + vy * vy).sqrt(), *radius_m, *direction)
            }
        };
        Ok(KinematicState::new(
            self.initial_position,
            self.initial_velocity,
            yaw_rate,
        ))
    }

    pub fn to_trajectory_config(&self) -> TrajectoryConfig {
        TrajectoryConfig {
            dt: self.dt,
            t_final: self.t_final,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSection {
    /// Forces every channel sigma to zero.
    pub disable_noise: bool,
    /// Seed for the noise generator; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub channels: Vec<ChannelConfig>,
    /// Attitude reported for the vehicle carrying the radar.
    pub platform_attitude: PlatformAttitude,
}

impl Default for MeasurementSection {
    fn default() -> Self {
        Self {
            disable_noise: false,
            seed: None,
            channels: vec![
                ChannelConfig::new("Track Radar", 1).with_sensor(SensorKind::TrackRadar),
                ChannelConfig::new("Thermal Camera", 20).with_sensor(SensorKind::ThermalCamera),
                ChannelConfig::new("Laser", 100).with_sensor(SensorKind::Laser),
            ],
            platform_attitude: PlatformAttitude {
                yaw_deg: 0.01,
                pitch_deg: 0.005,
                roll_deg: 0.0,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Reference for the local-to-geocentric transform.
    pub origin: GeodeticPoint,
    /// Radar site. Every channel and the servo measure from here.
    pub radar: GeodeticPoint,
    pub scenario: ScenarioSection,
    pub measurement: MeasurementSection,
    pub interchange_path: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let site = GeodeticPoint::new(39.90, 32.80, 1000.0);
        Self {
            origin: site,
            radar: site,
            scenario: ScenarioSection::default(),
            measurement: MeasurementSection::default(),
            interchange_path: PathBuf::from("SimpleScenario.csv"),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(dt: f64, t_final: f64, seed: Option<u64>, disable_noise: bool) -> Self {
        let mut config = Self::default();
        config.scenario.dt = dt;
        config.scenario.t_final = t_final;
        config.measurement.seed = seed;
        config.measurement.disable_noise = disable_noise;
        config
    }
}
