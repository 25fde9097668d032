//! Assembles the geocentric datasets handed to presentation consumers.

use crate::interface::geometry::{CartesianPoint, Frame, GeodeticPoint};
use crate::interface::measurement::RangeBearingElevation;
use crate::math::geodetic::{
    geocentric_to_local_offset, local_offset_to_geocentric, local_offset_to_geocentric_from,
    range_bearing_elevation, to_geocentric,
};
use crate::prelude::{StageError, StageResult};
use crate::processing::measurement::ChannelOutput;
use crate::series::{Column, SearchableSeries, SeriesBuilder};

const PROJECTED_COLUMNS: [Column; 6] = [
    Column::X,
    Column::Y,
    Column::Z,
    Column::Range,
    Column::Bearing,
    Column::Elevation,
];

/// Converts a local reading back to a (north, east, down) offset.
pub fn reading_to_local_offset(reading: &RangeBearingElevation) -> CartesianPoint {
    let bearing = reading.bearing_deg.to_radians();
    let elevation = reading.elevation_deg.to_radians();
    let east = reading.range * elevation.cos() * bearing.sin();
    let north = reading.range * elevation.cos() * bearing.cos();
    let up = reading.range * elevation.sin();
    CartesianPoint::new(north, east, -up)
}

/// Scene origin and radar site, with their geocentric positions cached.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext {
    origin: GeodeticPoint,
    origin_ecef: CartesianPoint,
    radar_ecef: CartesianPoint,
}

impl ProjectionContext {
    pub fn new(origin: GeodeticPoint, radar: GeodeticPoint) -> Self {
        Self {
            origin,
            origin_ecef: to_geocentric(&origin),
            radar_ecef: to_geocentric(&radar),
        }
    }

    pub fn origin_ecef(&self) -> CartesianPoint {
        self.origin_ecef
    }

    pub fn radar_ecef(&self) -> CartesianPoint {
        self.radar_ecef
    }

    /// Radar position relative to the scene origin, geocentric axes.
    pub fn radar_relative(&self) -> CartesianPoint {
        self.radar_ecef.sub(&self.origin_ecef)
    }

    /// Radar site in the local simulation frame (x north, y east, z up).
    /// Measurements taken from here project back onto the truth.
    pub fn radar_local(&self) -> CartesianPoint {
        let ned = geocentric_to_local_offset(&self.origin, &self.radar_ecef);
        CartesianPoint::new(ned.x, ned.y, -ned.z)
    }

    /// Places a local-frame truth series (x north, y east, z up) in the
    /// geocentric frame and adds range/bearing/elevation from the radar.
    pub fn project_truth(&self, truth: &SearchableSeries) -> StageResult<SearchableSeries> {
        if truth.frame() != Frame::Local {
            return Err(StageError::InvalidInput(format!(
                "series '{}' is already geocentric",
                truth.name()
            )));
        }
        let (xs, ys, zs) = match (
            truth.column(Column::X),
            truth.column(Column::Y),
            truth.column(Column::Z),
        ) {
            (Some(xs), Some(ys), Some(zs)) => (xs, ys, zs),
            _ => {
                return Err(StageError::InvalidInput(format!(
                    "series '{}' has no local position columns",
                    truth.name()
                )))
            }
        };

        let mut builder = SeriesBuilder::new(truth.name(), Frame::Geocentric)
            .line_series(truth.is_line_series())
            .columns(&PROJECTED_COLUMNS)
            .with_points()
            .with_capacity(truth.len());

        for (index, &time) in truth.time().iter().enumerate() {
            let ned = CartesianPoint::new(xs[index], ys[index], -zs[index]);
            let target = local_offset_to_geocentric(&self.origin, &ned);
            let rbe = range_bearing_elevation(&self.radar_ecef, &target);
            builder.push(
                time,
                &[
                    target.x,
                    target.y,
                    target.z,
                    rbe.range,
                    rbe.bearing_deg,
                    rbe.elevation_deg,
                ],
                Some(target.sub(&self.origin_ecef)),
            )?;
        }
        Ok(builder.build())
    }

    /// Places every sampled reading of a channel in the geocentric frame,
    /// anchored at the radar. Unsampled rows are dropped.
    pub fn project_channel(&self, channel: &ChannelOutput) -> StageResult<SearchableSeries> {
        let mut builder = SeriesBuilder::new(channel.name.as_str(), Frame::Geocentric)
            .columns(&PROJECTED_COLUMNS)
            .with_points()
            .with_capacity(channel.valid_count());

        for measurement in &channel.measurements {
            let Some(reading) = measurement.reading else {
                continue;
            };
            let ned = reading_to_local_offset(&reading);
            let target = local_offset_to_geocentric_from(&self.origin, &self.radar_ecef, &ned);
            builder.push(
                measurement.time,
                &[
                    target.x,
                    target.y,
                    target.z,
                    reading.range,
                    reading.bearing_deg,
                    reading.elevation_deg,
                ],
                Some(target.sub(&self.origin_ecef)),
            )?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::interchange::InterchangeRecord;
    use crate::interface::state::KinematicState;
    use crate::motion::{yaw_rate_for_radius, TurnDirection};
    use crate::prelude::{ChannelConfig, TrajectoryConfig};
    use crate::processing::measurement::simulate_channel;
    use crate::processing::trajectory::synthesize;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn site() -> GeodeticPoint {
        GeodeticPoint::new(39.90, 32.80, 1000.0)
    }

    fn truth() -> crate::processing::trajectory::TrajectoryOutput {
        let yaw = yaw_rate_for_radius(78.1, 170.0, TurnDirection::Clockwise);
        let initial = KinematicState::new([1000.0, 0.0, 300.0], [-50.0, -60.0, 70.0], yaw);
        synthesize(
            &initial,
            &TrajectoryConfig {
                dt: 0.05,
                t_final: 5.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn reading_offset_inverts_local_geometry() {
        let ned = reading_to_local_offset(&RangeBearingElevation::new(100.0, 90.0, 0.0));
        assert!(ned.x.abs() < 1e-9);
        assert!((ned.y - 100.0).abs() < 1e-9);
        assert!(ned.z.abs() < 1e-9);

        let up = reading_to_local_offset(&RangeBearingElevation::new(50.0, 0.0, 90.0));
        assert!((up.z + 50.0).abs() < 1e-9);
    }

    #[test]
    fn truth_projection_is_geocentric_and_rbe_capable() {
        let context = ProjectionContext::new(site(), site());
        let output = truth();
        let projected = context.project_truth(&output.series).unwrap();

        assert_eq!(projected.frame(), Frame::Geocentric);
        assert_eq!(projected.len(), output.series.len());
        assert!(projected.has_rbe_capability());
        assert!(projected.is_line_series());

        let first = output.samples[0].state.position();
        let range = projected.column(Column::Range).unwrap()[0];
        assert!((range - first.norm()).abs() < 1e-6);
        let point = projected.points().unwrap()[0];
        assert!((point.norm() - first.norm()).abs() < 1e-6);
    }

    #[test]
    fn noiseless_channel_lands_on_truth() {
        let context = ProjectionContext::new(site(), site());
        let output = truth();
        let records: Vec<InterchangeRecord> =
            output.samples.iter().map(InterchangeRecord::from_sample).collect();
        let channel = simulate_channel(
            &records,
            &CartesianPoint::default(),
            &ChannelConfig::new("Track Radar", 1),
            true,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        let truth_series = context.project_truth(&output.series).unwrap();
        let channel_series = context.project_channel(&channel).unwrap();
        assert_eq!(channel_series.len(), truth_series.len());
        for column in [Column::X, Column::Y, Column::Z] {
            let a = truth_series.column(column).unwrap();
            let b = channel_series.column(column).unwrap();
            for (lhs, rhs) in a.iter().zip(b) {
                assert!((lhs - rhs).abs() < 1e-6, "{:?}: {} vs {}", column, lhs, rhs);
            }
        }
    }

    #[test]
    fn channel_projection_drops_unsampled_rows() {
        let context = ProjectionContext::new(site(), GeodeticPoint::new(39.91, 32.81, 950.0));
        let output = truth();
        let records: Vec<InterchangeRecord> =
            output.samples.iter().map(InterchangeRecord::from_sample).collect();
        let channel = simulate_channel(
            &records,
            &context.radar_local(),
            &ChannelConfig::new("Laser", 20),
            false,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        let series = context.project_channel(&channel).unwrap();
        assert_eq!(series.len(), records.len().div_ceil(20));
        assert_eq!(series.time()[1], 1.0);
        assert!(series.has_rbe_capability());
        assert!(context.radar_relative().norm() > 1000.0);
    }

    #[test]
    fn radar_local_round_trips_to_radar_site() {
        let radar = GeodeticPoint::new(39.91, 32.80, 1000.0);
        let context = ProjectionContext::new(site(), radar);
        let local = context.radar_local();
        assert!((local.x - 1110.0).abs() < 10.0, "north {}", local.x);
        assert!(local.y.abs() < 1.0);

        let ned = CartesianPoint::new(local.x, local.y, -local.z);
        let back = local_offset_to_geocentric(&site(), &ned);
        assert!(back.sub(&context.radar_ecef()).norm() < 1e-6);
        assert_eq!(
            ProjectionContext::new(site(), site()).radar_local(),
            CartesianPoint::default()
        );
    }

    #[test]
    fn noiseless_channel_from_offset_radar_lands_on_truth() {
        let context = ProjectionContext::new(site(), GeodeticPoint::new(39.91, 32.80, 1000.0));
        let output = truth();
        let records: Vec<InterchangeRecord> =
            output.samples.iter().map(InterchangeRecord::from_sample).collect();
        let channel = simulate_channel(
            &records,
            &context.radar_local(),
            &ChannelConfig::new("Track Radar", 1),
            true,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        let truth_series = context.project_truth(&output.series).unwrap();
        let channel_series = context.project_channel(&channel).unwrap();
        let truth_points = truth_series.points().unwrap();
        let channel_points = channel_series.points().unwrap();
        for (a, b) in truth_points.iter().zip(channel_points) {
            assert!(a.sub(b).norm() < 1e-6, "{:?} vs {:?}", a, b);
        }
        let truth_range = truth_series.column(Column::Range).unwrap();
        let channel_range = channel_series.column(Column::Range).unwrap();
        for (a, b) in truth_range.iter().zip(channel_range) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn geocentric_series_cannot_be_reprojected() {
        let context = ProjectionContext::new(site(), site());
        let projected = context.project_truth(&truth().series).unwrap();
        assert!(matches!(
            context.project_truth(&projected),
            Err(StageError::InvalidInput(_))
        ));
    }
}
