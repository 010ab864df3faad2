//! # Pursuit Library
//!
//! Closed-loop 2D pursuit: a tracker point follows a moving target under a
//! range of motion models, from teleportation to a double integrator whose
//! heading and speed are each driven by a PID loop.
//!
//! ## Structure
//!
//! ```text
//! pursuit_library/
//! ── algorithms/     # Plants, PID loops, heading math, kinematics
//! ── config/         # Tracker configuration and presets
//! ── tracker/        # Per-tick stepper and its state
//! ── feed/           # Latest-sample target channel
//! ── tools/          # Headless driver (pursuit_sim)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pursuit_library::prelude::*;
//!
//! let mut tracker = Tracker::new(TrackerConfig::pid()).unwrap();
//! let (sender, mut feed) = TargetFeed::channel(TargetSample::new(5.0, 5.0));
//!
//! // The input side sends samples whenever it sees the target move
//! sender.send(TargetSample::new(4.0, 6.0)).unwrap();
//!
//! // The tick loop consumes the newest one
//! let (x, y) = tracker.tick(feed.latest()).unwrap();
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod feed;
pub mod tracker;

pub use error::{PursuitError, PursuitResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::{
        heading::{shortest_angular_delta, wrap_to_pi, AngularDelta},
        kinematics::KinematicIntegrator,
        linear_system::{InputHold, LinearSystem, SampleWindow},
        pid::{ClosedLoop, PidGains},
    };
    pub use crate::config::{MotionModel, Propagation, TrackerConfig};
    pub use crate::error::{PursuitError, PursuitResult};
    pub use crate::feed::TargetFeed;
    pub use crate::tracker::{TargetSample, TickReport, Tracker, TrackerState};
}
