//! Coordinated-turn propagator: circular arc in the horizontal plane at a
//! constant yaw rate, linear motion along the vertical axis.

use crate::interface::state::KinematicState;
use serde::{Deserialize, Serialize};

/// Below this yaw rate (deg/s) the turn radius is unbounded and the step
/// falls back to straight-line motion.
pub const STRAIGHT_LINE_YAW_RATE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Clockwise,
    CounterClockwise,
}

fn sind(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cosd(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Yaw rate in deg/s that flies a circle of `radius_m` at `horizontal_speed`.
/// Clockwise turns have a negative rate.
pub fn yaw_rate_for_radius(horizontal_speed: f64, radius_m: f64, direction: TurnDirection) -> f64 {
    let magnitude = (horizontal_speed / radius_m).to_degrees();
    match direction {
        TurnDirection::Clockwise => -magnitude,
        TurnDirection::CounterClockwise => magnitude,
    }
}

/// Advances `state` by `dt` seconds.
pub fn coordinated_turn(state: &KinematicState, dt: f64) -> KinematicState {
    let mut next = *state;

    if state.yaw_rate_deg_s.abs() < STRAIGHT_LINE_YAW_RATE {
        next.x = state.x + state.vx * dt;
        next.y = state.y + state.vy * dt;
        next.z = state.z + state.vz * dt;
        return next;
    }

    let radius = state.horizontal_speed() / state.yaw_rate_deg_s.to_radians();
    let initial_heading_deg = state.vy.atan2(state.vx).to_degrees();
    let heading_change_deg = state.yaw_rate_deg_s * dt;

    next.x = radius * sind(heading_change_deg + initial_heading_deg) + state.x
        - radius * sind(initial_heading_deg);
    next.y = -radius * cosd(heading_change_deg + initial_heading_deg)
        + state.y
        + radius * cosd(initial_heading_deg);
    next.z = state.z + state.vz * dt;

    let cos_change = cosd(heading_change_deg);
    let sin_change = sind(heading_change_deg);
    next.vx = cos_change * state.vx - sin_change * state.vy;
    next.vy = sin_change * state.vx + cos_change * state.vy;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{} vs {} (tol {})", a, b, tol);
    }

    #[test]
    fn zero_yaw_rate_extrapolates_linearly() {
        let state = KinematicState::new([1.0, 2.0, 3.0], [10.0, -5.0, 2.5], 0.0);
        let next = coordinated_turn(&state, 0.5);
        assert_eq!(next.x, 6.0);
        assert_eq!(next.y, -0.5);
        assert_eq!(next.z, 4.25);
        assert_eq!((next.vx, next.vy, next.vz), (10.0, -5.0, 2.5));
        assert_eq!(next.yaw_rate_deg_s, 0.0);
    }

    #[test]
    fn tiny_yaw_rate_is_treated_as_straight() {
        let state = KinematicState::new([0.0, 0.0, 0.0], [3.0, 4.0, 0.0], 5e-13);
        let next = coordinated_turn(&state, 2.0);
        assert_eq!((next.x, next.y), (6.0, 8.0));
        assert_eq!(next.yaw_rate_deg_s, 5e-13);
    }

    #[test]
    fn turning_preserves_horizontal_speed() {
        let mut state = KinematicState::new([1000.0, 0.0, 300.0], [-50.0, -60.0, 70.0], -25.0);
        let speed = state.horizontal_speed();
        for _ in 0..500 {
            state = coordinated_turn(&state, 0.01);
            assert_close(state.horizontal_speed(), speed, 1e-9);
        }
        assert_eq!(state.vz, 70.0);
        assert_eq!(state.yaw_rate_deg_s, -25.0);
    }

    #[test]
    fn quarter_turn_counter_clockwise_lands_on_circle() {
        // 10 m/s east, radius 100 m, centre at (0, 100).
        let yaw = yaw_rate_for_radius(10.0, 100.0, TurnDirection::CounterClockwise);
        let state = KinematicState::new([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], yaw);
        let quarter_period = 90.0 / yaw;
        let next = coordinated_turn(&state, quarter_period);
        assert_close(next.x, 100.0, 1e-9);
        assert_close(next.y, 100.0, 1e-9);
        assert_close(next.vx, 0.0, 1e-9);
        assert_close(next.vy, 10.0, 1e-9);
    }

    #[test]
    fn full_circle_returns_to_start() {
        let yaw = yaw_rate_for_radius(10.0, 170.0, TurnDirection::Clockwise);
        let state = KinematicState::new([5.0, -7.0, 0.0], [6.0, 8.0, 1.0], yaw);
        let period = 360.0 / yaw.abs();
        let next = coordinated_turn(&state, period);
        assert_close(next.x, 5.0, 1e-8);
        assert_close(next.y, -7.0, 1e-8);
        assert_close(next.z, period, 1e-9);
    }

    #[test]
    fn clockwise_radius_matches_reference_yaw_rate() {
        let speed = (50.0_f64 * 50.0 + 60.0 * 60.0).sqrt();
        let yaw = yaw_rate_for_radius(speed, 170.0, TurnDirection::Clockwise);
        assert_close(yaw, -(speed / 170.0) * 180.0 / std::f64::consts::PI, 1e-12);
    }

    #[test]
    fn nan_state_propagates() {
        let state = KinematicState::new([f64::NAN, 0.0, 0.0], [1.0, 0.0, 0.0], 10.0);
        let next = coordinated_turn(&state, 0.1);
        assert!(next.x.is_nan());
        assert!(next.y.is_finite());
    }
}
