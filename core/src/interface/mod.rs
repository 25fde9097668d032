pub mod epoch;
pub mod geometry;
pub mod interchange;
pub mod measurement;
pub mod state;

pub use epoch::{
    AngleReading, EpochRecord, PlatformAttitude, RangeReading, SensorKind, SensorReport,
    SensorStatus, VehiclePose,
};
pub use geometry::{CartesianPoint, Frame, GeodeticPoint};
pub use interchange::{read_interchange, write_interchange, InterchangeRecord};
pub use measurement::{Measurement, RangeBearingElevation, ServoSample};
pub use state::{KinematicState, TrajectorySample};
