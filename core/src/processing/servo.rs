use crate::interface::geometry::{CartesianPoint, Frame};
use crate::interface::interchange::InterchangeRecord;
use crate::interface::measurement::ServoSample;
use crate::prelude::StageResult;
use crate::processing::measurement::{local_range_bearing_elevation, round_time};
use crate::series::{Column, SearchableSeries, SeriesBuilder};

pub const SERVO_SERIES_NAME: &str = "Sensor Platform Servo";
pub const TURRET_BEARING_FIELD: &str = "Turret Bearing (deg)";

/// Platform pointing at every row: yaw and pitch follow the true bearing and
/// elevation of the target, the turret stays at zero bearing.
pub fn servo_track(records: &[InterchangeRecord], platform: &CartesianPoint) -> Vec<ServoSample> {
    records
        .iter()
        .map(|record| {
            let truth = local_range_bearing_elevation(platform, &record.position());
            ServoSample {
                time: round_time(record.time),
                platform_yaw_deg: truth.bearing_deg,
                platform_pitch_deg: truth.elevation_deg,
                turret_bearing_deg: 0.0,
            }
        })
        .collect()
}

/// Servo samples as a local-frame series: bearing holds yaw, elevation
/// holds pitch.
pub fn servo_series(samples: &[ServoSample]) -> StageResult<SearchableSeries> {
    let mut builder = SeriesBuilder::new(SERVO_SERIES_NAME, Frame::Local)
        .columns(&[Column::Bearing, Column::Elevation])
        .register_field(TURRET_BEARING_FIELD, |_, _| 0.0)
        .with_capacity(samples.len());
    for sample in samples {
        builder.push(
            sample.time,
            &[sample.platform_yaw_deg, sample.platform_pitch_deg],
            None,
        )?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::state::{KinematicState, TrajectorySample};

    fn record(time: f64, position: [f64; 3]) -> InterchangeRecord {
        InterchangeRecord::from_sample(&TrajectorySample {
            time,
            state: KinematicState::new(position, [0.0; 3], 0.0),
        })
    }

    #[test]
    fn servo_points_at_target_every_row() {
        let records = vec![
            record(0.0, [100.0, 0.0, 0.0]),
            record(0.01, [0.0, 100.0, 100.0]),
            record(0.02, [-100.0, 0.0, 0.0]),
        ];
        let track = servo_track(&records, &CartesianPoint::default());
        assert_eq!(track.len(), 3);
        assert_eq!(track[0].platform_yaw_deg, 0.0);
        assert!((track[1].platform_yaw_deg - 90.0).abs() < 1e-12);
        assert!((track[1].platform_pitch_deg - 45.0).abs() < 1e-12);
        assert!((track[2].platform_yaw_deg - 180.0).abs() < 1e-12);
        assert!(track.iter().all(|s| s.turret_bearing_deg == 0.0));
        assert_eq!(track[1].time, 0.01);
    }

    #[test]
    fn servo_series_exposes_turret_field() {
        let records = vec![record(0.0, [3.0, 4.0, 0.0]), record(0.5, [4.0, 3.0, 0.0])];
        let series = servo_series(&servo_track(&records, &CartesianPoint::default())).unwrap();
        assert_eq!(series.len(), 2);
        assert!(!series.has_rbe_capability());
        assert_eq!(series.value_at(TURRET_BEARING_FIELD, 1), Ok(0.0));
        assert_eq!(series.value_at("Elevation (deg)", 0), Ok(0.0));
    }
}
