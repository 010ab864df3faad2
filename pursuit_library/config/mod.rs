//! Tracker configuration
//!
//! Read once when a [`Tracker`](crate::tracker::Tracker) is created and
//! never consulted again mid-run. Presets reproduce the classic tracker
//! variants, from teleportation to the PID-driven double integrator.
//!
//! ```rust
//! use pursuit_library::config::{MotionModel, TrackerConfig};
//! use pursuit_library::algorithms::pid::PidGains;
//!
//! let config = TrackerConfig::pid()
//!     .with_sample_period(0.1)
//!     .with_speed_gains(PidGains::new(8.0, 0.0, 1.0))
//!     .with_max_distance(10.0);
//! config.validate().unwrap();
//! ```

use crate::algorithms::linear_system::LinearSystem;
use crate::algorithms::pid::PidGains;
use crate::error::{PursuitError, PursuitResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default resolution of the per-tick closed-loop simulation (seconds)
pub const DEFAULT_SIM_STEP: f64 = 0.01;

/// How the tracker moves between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionModel {
    /// Jump onto the target every tick
    Teleport,
    /// Face the target instantly and move at a fixed speed (units/s)
    ConstantVelocity { speed: f64 },
    /// Turn towards the target at a fixed rate (rad/s) while moving at a fixed speed (units/s)
    ConstantTurnRate { speed: f64, turn_rate: f64 },
    /// Heading and speed each driven by a PID loop around the plant
    Pid {
        #[serde(default)]
        propagation: Propagation,
    },
}

/// Position update used by the PID model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// `[x, y, vx, vy]` through the unit-tick transition matrix
    #[default]
    TransitionMatrix,
    /// `position += speed * (cos θ, sin θ)`
    Direct,
}

impl fmt::Display for MotionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionModel::Teleport => write!(f, "teleport"),
            MotionModel::ConstantVelocity { .. } => write!(f, "constant-velocity"),
            MotionModel::ConstantTurnRate { .. } => write!(f, "constant-turn-rate"),
            MotionModel::Pid { .. } => write!(f, "pid"),
        }
    }
}

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Time between ticks (seconds)
    pub sample_period: f64,
    /// Grid step of the closed-loop simulation inside one tick (seconds)
    pub sim_step: f64,
    pub model: MotionModel,
    pub heading_gains: PidGains,
    pub speed_gains: PidGains,
    /// Plant wrapped by both PID loops
    pub plant: LinearSystem,
    /// Largest distance fed to the speed loop, 0 disables the clamp
    pub max_distance: f64,
    pub initial_position: (f64, f64),
    /// Starting heading (radians)
    pub initial_heading: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::pid()
    }
}

impl TrackerConfig {
    /// Double integrator under PID heading and speed control, sampled at 8 Hz
    pub fn pid() -> Self {
        Self {
            sample_period: 1.0 / 8.0,
            sim_step: DEFAULT_SIM_STEP,
            model: MotionModel::Pid {
                propagation: Propagation::TransitionMatrix,
            },
            heading_gains: PidGains::new(10.0, 0.0, 2.0),
            speed_gains: PidGains::new(10.0, 0.0, 1.0),
            plant: LinearSystem::double_integrator(),
            max_distance: 0.0,
            initial_position: (-5.0, -5.0),
            initial_heading: 0.0,
        }
    }

    /// Tracker that lands on the target every 1/4 s
    pub fn teleport() -> Self {
        Self {
            sample_period: 1.0 / 4.0,
            model: MotionModel::Teleport,
            ..Self::pid()
        }
    }

    /// Tracker at 10 Hz moving at 5 units/s straight at the target
    pub fn constant_velocity() -> Self {
        Self {
            sample_period: 1.0 / 10.0,
            model: MotionModel::ConstantVelocity { speed: 5.0 },
            ..Self::pid()
        }
    }

    /// Tracker at 8 Hz moving at 2 units/s and turning at a quarter turn per second
    pub fn constant_turn_rate() -> Self {
        Self {
            sample_period: 1.0 / 8.0,
            model: MotionModel::ConstantTurnRate {
                speed: 2.0,
                turn_rate: 0.5 * std::f64::consts::PI,
            },
            ..Self::pid()
        }
    }

    pub fn with_sample_period(mut self, seconds: f64) -> Self {
        self.sample_period = seconds;
        self
    }

    pub fn with_sim_step(mut self, seconds: f64) -> Self {
        self.sim_step = seconds;
        self
    }

    pub fn with_model(mut self, model: MotionModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_heading_gains(mut self, gains: PidGains) -> Self {
        self.heading_gains = gains;
        self
    }

    pub fn with_speed_gains(mut self, gains: PidGains) -> Self {
        self.speed_gains = gains;
        self
    }

    pub fn with_plant(mut self, plant: LinearSystem) -> Self {
        self.plant = plant;
        self
    }

    /// Clamp the speed-loop input; 0 disables the clamp
    pub fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn with_initial_position(mut self, x: f64, y: f64) -> Self {
        self.initial_position = (x, y);
        self
    }

    pub fn with_initial_heading(mut self, radians: f64) -> Self {
        self.initial_heading = radians;
        self
    }

    /// Check every setting before the first tick
    pub fn validate(&self) -> PursuitResult<()> {
        if !(self.sample_period.is_finite() && self.sample_period > 0.0) {
            return Err(PursuitError::InvalidSamplePeriod(self.sample_period));
        }
        if !(self.sim_step.is_finite() && self.sim_step > 0.0) {
            return Err(PursuitError::InvalidStep(self.sim_step));
        }
        if !(self.max_distance.is_finite() && self.max_distance >= 0.0) {
            return Err(PursuitError::InvalidMaxDistance(self.max_distance));
        }

        finite("initial x", self.initial_position.0)?;
        finite("initial y", self.initial_position.1)?;
        finite("initial heading", self.initial_heading)?;

        match self.model {
            MotionModel::Teleport => {}
            MotionModel::ConstantVelocity { speed } => finite("speed", speed)?,
            MotionModel::ConstantTurnRate { speed, turn_rate } => {
                finite("speed", speed)?;
                finite("turn rate", turn_rate)?;
            }
            MotionModel::Pid { .. } => {
                self.heading_gains.validate("heading")?;
                self.speed_gains.validate("speed")?;
            }
        }

        Ok(())
    }
}

pub(crate) fn finite(what: &'static str, value: f64) -> PursuitResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PursuitError::NonFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pid_preset() {
        let config = TrackerConfig::default();
        assert_eq!(config, TrackerConfig::pid());
        assert_eq!(config.sample_period, 0.125);
        assert_eq!(config.heading_gains, PidGains::new(10.0, 0.0, 2.0));
        assert_eq!(config.speed_gains, PidGains::new(10.0, 0.0, 1.0));
        assert_eq!(config.plant, LinearSystem::double_integrator());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for config in [
            TrackerConfig::teleport(),
            TrackerConfig::constant_velocity(),
            TrackerConfig::constant_turn_rate(),
            TrackerConfig::pid(),
        ] {
            assert!(config.validate().is_ok(), "{} preset invalid", config.model);
        }
    }

    #[test]
    fn test_invalid_sample_period() {
        for period in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = TrackerConfig::pid().with_sample_period(period).validate().unwrap_err();
            assert!(matches!(err, PursuitError::InvalidSamplePeriod(_)));
        }
    }

    #[test]
    fn test_invalid_sim_step_and_clamp() {
        let err = TrackerConfig::pid().with_sim_step(0.0).validate().unwrap_err();
        assert_eq!(err, PursuitError::InvalidStep(0.0));

        let err = TrackerConfig::pid().with_max_distance(-1.0).validate().unwrap_err();
        assert_eq!(err, PursuitError::InvalidMaxDistance(-1.0));
    }

    #[test]
    fn test_nan_gain_fails_fast() {
        let err = TrackerConfig::pid()
            .with_speed_gains(PidGains::new(1.0, 0.0, f64::NAN))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            PursuitError::InvalidGain {
                loop_name: "speed",
                gain: "Kd",
                ..
            }
        ));
    }

    #[test]
    fn test_gains_ignored_without_pid_model() {
        let config = TrackerConfig::teleport().with_heading_gains(PidGains::proportional(f64::NAN));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_speed() {
        let config = TrackerConfig::constant_velocity()
            .with_model(MotionModel::ConstantVelocity { speed: f64::INFINITY });
        assert!(matches!(
            config.validate(),
            Err(PursuitError::NonFinite { what: "speed", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{"sample_period": 0.25, "model": {"kind": "constant_velocity", "speed": 3.0}}"#,
        )
        .unwrap();
        assert_eq!(config.sample_period, 0.25);
        assert_eq!(config.model, MotionModel::ConstantVelocity { speed: 3.0 });
        assert_eq!(config.speed_gains, TrackerConfig::pid().speed_gains);
    }

    #[test]
    fn test_pid_propagation_defaults_to_matrix() {
        let model: MotionModel = serde_json::from_str(r#"{"kind": "pid"}"#).unwrap();
        assert_eq!(
            model,
            MotionModel::Pid {
                propagation: Propagation::TransitionMatrix
            }
        );
    }
}
