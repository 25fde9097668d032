pub mod coordinated_turn;

pub use coordinated_turn::{coordinated_turn, yaw_rate_for_radius, TurnDirection};
