//! Core numerics for the coordinated-turn scenario simulator.
//!
//! The modules cover ellipsoidal coordinate transforms, the coordinated-turn
//! propagator, trajectory synthesis, decimated and noisy sensor measurements,
//! and the time-searchable series handed to presentation consumers.

pub mod interface;
pub mod math;
pub mod motion;
pub mod prelude;
pub mod processing;
pub mod series;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageError, StageResult};
pub use series::{SearchableSeries, SeriesBuilder, SeriesError};
