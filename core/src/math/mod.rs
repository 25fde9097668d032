pub mod geodetic;
pub mod matrix;
pub mod stats;

pub use geodetic::{
    geocentric_to_local_offset, local_offset_to_geocentric, local_offset_to_geocentric_from,
    range_bearing_elevation, to_geocentric, to_geodetic,
};
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
