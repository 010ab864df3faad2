//! Tracker Stepping
//!
//! One tick of pursuit: observe the target, correct heading and speed,
//! move. The same stepper runs every motion model; the model is picked
//! once from [`TrackerConfig`] and the heavy parts (closed loops) are
//! built up front.
//!
//! # PID tick
//!
//! 1. Bearing to the target
//! 2. Shortest signed heading error
//! 3. Heading loop response to the error, added to the heading and wrapped
//! 4. Distance to the target, clamped if configured
//! 5. Speed loop response to the distance
//! 6. Position advanced along the new heading
//!
//! # Example
//!
//! ```rust
//! use pursuit_library::config::TrackerConfig;
//! use pursuit_library::tracker::Tracker;
//!
//! let mut tracker = Tracker::new(TrackerConfig::pid()).unwrap();
//! for _ in 0..10 {
//!     let (x, y) = tracker.tick((5.0, 5.0)).unwrap();
//! }
//! ```

mod state;

pub use state::{TargetSample, TickReport, TrackerState};

use crate::algorithms::heading::{bearing, shortest_angular_delta, wrap_to_pi};
use crate::algorithms::kinematics::KinematicIntegrator;
use crate::algorithms::pid::ClosedLoop;
use crate::config::{finite, MotionModel, Propagation, TrackerConfig};
use crate::error::PursuitResult;
use tracing::{debug, info};

/// Motion model with its per-tick constants resolved
#[derive(Debug, Clone)]
enum Motion {
    Teleport,
    ConstantVelocity {
        speed_per_tick: f64,
    },
    ConstantTurnRate {
        speed_per_tick: f64,
        turn_per_tick: f64,
    },
    Pid {
        heading_loop: ClosedLoop,
        speed_loop: ClosedLoop,
        propagation: Propagation,
    },
}

/// Pursuit tracker
pub struct Tracker {
    config: TrackerConfig,
    motion: Motion,
    integrator: KinematicIntegrator,
    state: TrackerState,
    ticks: u64,
}

impl Tracker {
    /// Validate the configuration and build the tracker
    pub fn new(config: TrackerConfig) -> PursuitResult<Self> {
        config.validate()?;

        let t_s = config.sample_period;
        let motion = match config.model {
            MotionModel::Teleport => Motion::Teleport,
            MotionModel::ConstantVelocity { speed } => Motion::ConstantVelocity {
                speed_per_tick: speed * t_s,
            },
            MotionModel::ConstantTurnRate { speed, turn_rate } => Motion::ConstantTurnRate {
                speed_per_tick: speed * t_s,
                turn_per_tick: turn_rate * t_s,
            },
            MotionModel::Pid { propagation } => Motion::Pid {
                heading_loop: ClosedLoop::build_for("heading", &config.plant, config.heading_gains)?,
                speed_loop: ClosedLoop::build_for("speed", &config.plant, config.speed_gains)?,
                propagation,
            },
        };

        let state = TrackerState {
            position: config.initial_position,
            heading: wrap_to_pi(config.initial_heading),
            speed: 0.0,
        };

        info!(
            model = %config.model,
            sample_period = t_s,
            x = state.position.0,
            y = state.position.1,
            heading = state.heading,
            "tracker configured"
        );

        Ok(Self {
            config,
            motion,
            integrator: KinematicIntegrator::new(),
            state,
            ticks: 0,
        })
    }

    /// Advance one tick towards `target` and return the new position
    pub fn tick(&mut self, target: impl Into<TargetSample>) -> PursuitResult<(f64, f64)> {
        Ok(self.step(target)?.position())
    }

    /// Advance one tick and report the intermediate quantities
    ///
    /// On error the tracker state is left exactly as it was.
    pub fn step(&mut self, target: impl Into<TargetSample>) -> PursuitResult<TickReport> {
        let target = target.into();
        finite("target x", target.x)?;
        finite("target y", target.y)?;

        let current = self.state;
        let t_s = self.config.sample_period;
        let goal = target.position();

        let bearing = bearing(current.position, goal);
        let delta = shortest_angular_delta(current.heading, bearing);
        let distance = euclidean_distance(current.position, goal);
        let speed_input = clamp_distance(distance, self.config.max_distance);

        let next = match &self.motion {
            Motion::Teleport => TrackerState {
                position: goal,
                heading: current.heading,
                speed: distance,
            },
            Motion::ConstantVelocity { speed_per_tick } => TrackerState {
                position: self.integrator.step(current.position, bearing, *speed_per_tick),
                heading: bearing,
                speed: *speed_per_tick,
            },
            Motion::ConstantTurnRate {
                speed_per_tick,
                turn_per_tick,
            } => {
                let heading = wrap_to_pi(current.heading + delta.direction * turn_per_tick);
                TrackerState {
                    position: self.integrator.step(current.position, heading, *speed_per_tick),
                    heading,
                    speed: *speed_per_tick,
                }
            }
            Motion::Pid {
                heading_loop,
                speed_loop,
                propagation,
            } => {
                let step = self.config.sim_step;
                let turn = heading_loop.respond(delta.signed(), t_s, step)?;
                let heading = wrap_to_pi(current.heading + turn);
                let speed = speed_loop.respond(speed_input, t_s, step)?;
                let position = match propagation {
                    Propagation::TransitionMatrix => {
                        self.integrator.step(current.position, heading, speed)
                    }
                    Propagation::Direct => {
                        KinematicIntegrator::advance_direct(current.position, heading, speed)
                    }
                };
                TrackerState {
                    position,
                    heading,
                    speed,
                }
            }
        };

        self.state = next;
        self.ticks += 1;

        debug!(
            tick = self.ticks,
            target_x = target.x,
            target_y = target.y,
            x = next.position.0,
            y = next.position.1,
            heading = next.heading,
            speed = next.speed,
            "tracker tick"
        );

        Ok(TickReport {
            tick: self.ticks,
            target,
            bearing,
            heading_error: delta.signed(),
            distance,
            speed_input,
            state: next,
        })
    }

    /// Get current state
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn position(&self) -> (f64, f64) {
        self.state.position
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Closed loops driving heading and speed, when the PID model is active
    pub fn loops(&self) -> Option<(&ClosedLoop, &ClosedLoop)> {
        match &self.motion {
            Motion::Pid {
                heading_loop,
                speed_loop,
                ..
            } => Some((heading_loop, speed_loop)),
            _ => None,
        }
    }
}

/// Distance fed to the speed loop: `distance` capped at `max_distance` when it is positive
pub fn clamp_distance(distance: f64, max_distance: f64) -> f64 {
    if max_distance > 0.0 {
        distance.min(max_distance)
    } else {
        distance
    }
}

fn euclidean_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}
