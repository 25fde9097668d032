pub mod epoch;
pub mod measurement;
pub mod projection;
pub mod servo;
pub mod trajectory;

pub use epoch::assemble_epochs;
pub use measurement::{
    local_range_bearing_elevation, simulate_channel, ChannelOutput, MeasurementInput,
    MeasurementStage,
};
pub use projection::{reading_to_local_offset, ProjectionContext};
pub use servo::{servo_series, servo_track};
pub use trajectory::{sample_count, synthesize, TrajectoryOutput, TrajectoryStage};
