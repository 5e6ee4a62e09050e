//! Trapezoidal motion profile

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Limits on the motion a profile may command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Units: position units/second
    pub max_velocity: f64,

    /// Units: position units/second^2
    pub max_acceleration: f64,
}

/// A point along a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub position: f64,
    pub velocity: f64,
}

/// A trapezoidal velocity profile between two states.
///
/// The profile accelerates at the maximum rate until it reaches the maximum
/// velocity, cruises, then decelerates into the goal. Short moves never reach
/// the cruise phase and form a triangle instead.
#[derive(Debug, Clone, Copy)]
pub struct TrapezoidProfile {
    constraints: Constraints,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

impl TrapezoidProfile {
    pub fn new(constraints: Constraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    /// State of the profile from `current` to `goal` after `t` seconds.
    ///
    /// Called every cycle with the previous output as `current` and the cycle
    /// period as `t`, which keeps the profile valid if the goal moves.
    pub fn calculate(&self, t: f64, current: ProfileState, goal: ProfileState) -> ProfileState {
        let max_v = self.constraints.max_velocity;
        let max_a = self.constraints.max_acceleration;

        // Work in a frame where the motion is always positive
        let direction = if current.position > goal.position {
            -1.0
        } else {
            1.0
        };
        let mut current = direct(current, direction);
        let goal = direct(goal, direction);

        if current.velocity > max_v {
            current.velocity = max_v;
        }

        // Extend the profile backwards/forwards to zero velocity at both ends,
        // so the remaining shape is a full trapezoid
        let cutoff_begin = current.velocity / max_a;
        let cutoff_dist_begin = cutoff_begin * cutoff_begin * max_a / 2.0;

        let cutoff_end = goal.velocity / max_a;
        let cutoff_dist_end = cutoff_end * cutoff_end * max_a / 2.0;

        let full_trapezoid_dist =
            cutoff_dist_begin + (goal.position - current.position) + cutoff_dist_end;
        let mut accel_time = max_v / max_a;

        let mut full_speed_dist = full_trapezoid_dist - accel_time * accel_time * max_a;

        // Triangular profile
        if full_speed_dist < 0.0 {
            accel_time = (full_trapezoid_dist / max_a).sqrt();
            full_speed_dist = 0.0;
        }

        let end_accel = accel_time - cutoff_begin;
        let end_full_speed = end_accel + full_speed_dist / max_v;
        let end_deccel = end_full_speed + accel_time - cutoff_end;

        let mut result = current;

        if t < end_accel {
            result.velocity += t * max_a;
            result.position += (current.velocity + t * max_a / 2.0) * t;
        } else if t < end_full_speed {
            result.velocity = max_v;
            result.position += (current.velocity + end_accel * max_a / 2.0) * end_accel
                + max_v * (t - end_accel);
        } else if t <= end_deccel {
            let time_left = end_deccel - t;
            result.velocity = goal.velocity + time_left * max_a;
            result.position = goal.position - (goal.velocity + time_left * max_a / 2.0) * time_left;
        } else {
            result = goal;
        }

        direct(result, direction)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn direct(state: ProfileState, direction: f64) -> ProfileState {
    ProfileState {
        position: state.position * direction,
        velocity: state.velocity * direction,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn run(profile: &TrapezoidProfile, start: ProfileState, goal: ProfileState) -> Vec<ProfileState> {
        let mut state = start;
        let mut states = vec![state];

        for _ in 0..10_000 {
            state = profile.calculate(DT, state, goal);
            states.push(state);
            if state == goal {
                break;
            }
        }

        states
    }

    #[test]
    fn test_respects_constraints() {
        let c = Constraints {
            max_velocity: 90.0,
            max_acceleration: 180.0,
        };
        let profile = TrapezoidProfile::new(c);

        for goal in &[120.0, -75.0, 2.0] {
            let states = run(
                &profile,
                ProfileState::default(),
                ProfileState::new(*goal, 0.0),
            );

            assert_eq!(*states.last().unwrap(), ProfileState::new(*goal, 0.0));

            for pair in states.windows(2) {
                assert!(pair[1].velocity.abs() <= c.max_velocity + 1e-9);
                assert!(
                    (pair[1].velocity - pair[0].velocity).abs() <= c.max_acceleration * DT + 1e-9
                );
            }
        }
    }

    #[test]
    fn test_reaches_cruise_on_long_moves() {
        let profile = TrapezoidProfile::new(Constraints {
            max_velocity: 10.0,
            max_acceleration: 20.0,
        });

        let states = run(
            &profile,
            ProfileState::default(),
            ProfileState::new(100.0, 0.0),
        );

        assert!(states.iter().any(|s| (s.velocity - 10.0).abs() < 1e-9));

        // Monotonic approach, never overshoots
        for pair in states.windows(2) {
            assert!(pair[1].position >= pair[0].position - 1e-9);
            assert!(pair[1].position <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_clamps_initial_velocity() {
        let profile = TrapezoidProfile::new(Constraints {
            max_velocity: 10.0,
            max_acceleration: 20.0,
        });

        let next = profile.calculate(
            DT,
            ProfileState::new(0.0, 50.0),
            ProfileState::new(100.0, 0.0),
        );

        assert!(next.velocity <= 10.0 + 1e-9);
    }
}
