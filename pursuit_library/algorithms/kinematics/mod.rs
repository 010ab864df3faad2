//! Point Kinematics
//!
//! Discrete position/velocity transition for a point moving along its heading.
//!
//! # Features
//!
//! - Constant-velocity transition `x[k+1] = G x[k]` over `[x, y, vx, vy]`
//! - Closed-form advance along a heading
//! - One tick per step: the tick length is folded into the speed
//!
//! # Example
//!
//! ```rust
//! use pursuit_library::algorithms::kinematics::KinematicIntegrator;
//!
//! let integrator = KinematicIntegrator::new();
//!
//! // Move 0.25 units along +y
//! let (x, y) = integrator.step((1.0, 1.0), std::f64::consts::FRAC_PI_2, 0.25);
//! ```

use nalgebra::{Matrix4, Vector4};

/// Per-tick kinematic transition
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicIntegrator {
    transition: Matrix4<f64>, // G
}

impl KinematicIntegrator {
    /// Create the unit-tick transition
    ///
    /// ```text
    /// G = | 1 0 1 0 |
    ///     | 0 1 0 1 |
    ///     | 0 0 1 0 |
    ///     | 0 0 0 1 |
    /// ```
    pub fn new() -> Self {
        Self {
            transition: Matrix4::new(
                1.0, 0.0, 1.0, 0.0, //
                0.0, 1.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Advance a position one tick along `heading` at `speed` (units per tick)
    ///
    /// # Arguments
    /// * `position` - Current (x, y)
    /// * `heading` - Direction of travel (radians)
    /// * `speed` - Distance covered this tick
    ///
    /// # Returns
    /// New (x, y)
    pub fn step(&self, position: (f64, f64), heading: f64, speed: f64) -> (f64, f64) {
        let state = Vector4::new(
            position.0,
            position.1,
            heading.cos() * speed,
            heading.sin() * speed,
        );
        let next = self.transition * state;
        (next[0], next[1])
    }

    /// Closed-form equivalent of [`step`](Self::step)
    pub fn advance_direct(position: (f64, f64), heading: f64, speed: f64) -> (f64, f64) {
        (
            position.0 + heading.cos() * speed,
            position.1 + heading.sin() * speed,
        )
    }

    /// Get transition matrix
    pub fn transition(&self) -> &Matrix4<f64> {
        &self.transition
    }
}

impl Default for KinematicIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_forward_motion() {
        let integrator = KinematicIntegrator::new();
        let (x, y) = integrator.step((0.0, 0.0), 0.0, 1.0);
        assert_abs_diff_eq!(x, 1.0);
        assert_abs_diff_eq!(y, 0.0);
    }

    #[test]
    fn test_diagonal_motion() {
        let integrator = KinematicIntegrator::new();
        let (x, y) = integrator.step((-5.0, -5.0), FRAC_PI_4, 2.0_f64.sqrt());
        assert_abs_diff_eq!(x, -4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_speed_holds_position() {
        let integrator = KinematicIntegrator::new();
        assert_eq!(integrator.step((3.0, -2.0), 1.1, 0.0), (3.0, -2.0));
    }

    #[test]
    fn test_negative_speed_reverses() {
        let integrator = KinematicIntegrator::new();
        let (x, y) = integrator.step((0.0, 0.0), FRAC_PI_2, -0.5);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_and_direct_forms_agree() {
        let integrator = KinematicIntegrator::new();
        for i in 0..16 {
            let heading = -PI + i as f64 * PI / 8.0;
            let a = integrator.step((1.5, -0.5), heading, 0.7);
            let b = KinematicIntegrator::advance_direct((1.5, -0.5), heading, 0.7);
            assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-12);
            assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_velocity_rows_are_identity() {
        let integrator = KinematicIntegrator::new();
        let g = integrator.transition();
        let v = g * Vector4::new(0.0, 0.0, 0.3, -0.4);
        assert_eq!(v, Vector4::new(0.3, -0.4, 0.3, -0.4));
    }
}
