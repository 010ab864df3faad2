//! Heading Reconciliation
//!
//! Angular bookkeeping on the circle: which way to turn towards a bearing,
//! how far, and how to keep a heading inside (-π, π].
//!
//! # Example
//!
//! ```rust
//! use pursuit_library::algorithms::heading::{shortest_angular_delta, wrap_to_pi};
//! use std::f64::consts::PI;
//!
//! // Heading 170°, bearing -170°: turn 20° counter-clockwise through ±180°
//! let delta = shortest_angular_delta(170f64.to_radians(), (-170f64).to_radians());
//! assert_eq!(delta.direction, 1.0);
//! assert!((delta.magnitude - 20f64.to_radians()).abs() < 1e-12);
//!
//! let heading = wrap_to_pi(170f64.to_radians() + delta.signed());
//! assert!(heading <= PI && heading > -PI);
//! ```

use std::f64::consts::{PI, TAU};

/// Signed turn between two headings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularDelta {
    /// +1 counter-clockwise, -1 clockwise, 0 when already aligned
    pub direction: f64,
    /// Turn size in radians, within [0, π]
    pub magnitude: f64,
}

impl AngularDelta {
    /// Direction times magnitude
    pub fn signed(&self) -> f64 {
        self.direction * self.magnitude
    }
}

/// Shortest turn from `current` to `target` (radians)
///
/// Both angles are moved into [0, 2π) and subtracted. A raw difference
/// larger than π is taken the other way round the circle. When the target
/// sits exactly π away the turn follows the sign of the raw difference, so
/// the result is always defined.
pub fn shortest_angular_delta(current: f64, target: f64) -> AngularDelta {
    let diff = target.rem_euclid(TAU) - current.rem_euclid(TAU);

    if diff.abs() > PI {
        AngularDelta {
            direction: -sign(diff),
            magnitude: TAU - diff.abs(),
        }
    } else {
        AngularDelta {
            direction: sign(diff),
            magnitude: diff.abs(),
        }
    }
}

/// Fold an angle into (-π, π] with a single reflection
///
/// Only one period of overflow is removed: inputs must lie within (-3π, 3π].
/// Headings only ever receive bounded per-tick corrections, so one
/// reflection is enough.
pub fn wrap_to_pi(angle: f64) -> f64 {
    if angle > PI {
        -PI + (angle - PI)
    } else if angle <= -PI {
        PI + (angle + PI)
    } else {
        angle
    }
}

/// Bearing from `from` to `to`
pub fn bearing(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.1 - from.1).atan2(to.0 - from.0)
}

// f64::signum maps 0.0 to 1.0; an aligned heading must not turn
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
