//! PID (Proportional-Integral-Derivative) Closed Loops
//!
//! Unity-feedback PID compensation around a linear plant.
//!
//! ```text
//!   r ──(+)── e ──[ Kp + Ki/s + Kd·s ]── u ──[ plant ]──┬── y
//!        -│                                             │
//!         └─────────────────────────────────────────────┘
//! ```
//!
//! The loop is reduced once to its transfer function `C·P / (1 + C·P)` and
//! realised as its own state-space system. Every response is simulated
//! from zero state with the reference held constant over the window, so a
//! loop carries nothing from one call to the next.
//!
//! # Example
//!
//! ```rust
//! use pursuit_library::algorithms::linear_system::LinearSystem;
//! use pursuit_library::algorithms::pid::{ClosedLoop, PidGains};
//!
//! let plant = LinearSystem::double_integrator();
//! let speed_loop = ClosedLoop::build(&plant, PidGains::new(10.0, 0.0, 1.0)).unwrap();
//!
//! // Output after holding a reference of 2.0 for one 1/8 s tick
//! let speed = speed_loop.respond(2.0, 0.125, 0.01).unwrap();
//! ```

use crate::algorithms::linear_system::{LinearSystem, Polynomial, SampleWindow};
use crate::error::{PursuitError, PursuitResult};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// PID gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64, // Proportional gain
    pub ki: f64, // Integral gain
    pub kd: f64, // Derivative gain
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Proportional-only gains
    pub fn proportional(kp: f64) -> Self {
        Self::new(kp, 0.0, 0.0)
    }

    /// Reject NaN or infinite gains. Negative gains are allowed.
    pub fn validate(&self, loop_name: &'static str) -> PursuitResult<()> {
        for (gain, value) in [("Kp", self.kp), ("Ki", self.ki), ("Kd", self.kd)] {
            if !value.is_finite() {
                return Err(PursuitError::InvalidGain {
                    loop_name,
                    gain,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Controller numerator `Kd s^2 + Kp s + Ki` (the controller is this over `s`)
    fn numerator(&self) -> Polynomial {
        Polynomial::new(vec![self.ki, self.kp, self.kd])
    }
}

/// Plant wrapped in unity-feedback PID compensation
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedLoop {
    gains: PidGains,
    system: LinearSystem,
}

impl ClosedLoop {
    /// Build the closed loop around `plant`
    pub fn build(plant: &LinearSystem, gains: PidGains) -> PursuitResult<Self> {
        Self::build_for("pid", plant, gains)
    }

    /// Build the closed loop, naming it in gain validation errors
    pub fn build_for(
        loop_name: &'static str,
        plant: &LinearSystem,
        gains: PidGains,
    ) -> PursuitResult<Self> {
        gains.validate(loop_name)?;

        let (plant_num, plant_den) = plant.transfer_function();

        // C·P = (Kd s^2 + Kp s + Ki) N / (s D)
        let open_num = gains.numerator().mul(&plant_num);
        let open_den = plant_den.shift(1);
        let closed_den = open_den.add(&open_num);

        let (num, den) = Polynomial::cancel_common_zero_roots(open_num, closed_den);
        trace!(
            loop_name,
            numerator = ?num.coeffs(),
            denominator = ?den.coeffs(),
            "closed loop transfer function"
        );

        let system = LinearSystem::from_transfer_function(&num, &den)?;
        Ok(Self { gains, system })
    }

    /// Output at the last point of `[0, duration)` with the reference held at `level`
    ///
    /// # Arguments
    /// * `level` - Reference value, held constant over the window
    /// * `duration` - Window length (seconds)
    /// * `step` - Grid resolution (seconds)
    pub fn respond(&self, level: f64, duration: f64, step: f64) -> PursuitResult<f64> {
        let (_, outputs) = self.trajectory(level, duration, step)?;
        outputs.last().copied().ok_or_else(|| {
            PursuitError::InvalidTimeGrid(format!(
                "window of {duration} s at step {step} s has no samples"
            ))
        })
    }

    /// Full response over the window as (times, outputs)
    pub fn trajectory(
        &self,
        level: f64,
        duration: f64,
        step: f64,
    ) -> PursuitResult<(Vec<f64>, Vec<f64>)> {
        let window = SampleWindow::new(duration, step)?;
        let times = window.times();
        let outputs = self.system.simulate(&window.held(level), &times)?;
        Ok((times, outputs))
    }

    /// Get gains
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Get the realised closed-loop system
    pub fn system(&self) -> &LinearSystem {
        &self.system
    }
}
