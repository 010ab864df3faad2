//! Pure computational algorithms for pursuit
//!
//! No I/O and no shared state: every function here is deterministic given
//! its arguments, and each module carries its own tests.
//!
//! # Available Algorithms
//!
//! ## Dynamics
//! - **linear_system**: Continuous-time state-space plants and forced response
//! - **kinematics**: Per-tick position/velocity transition
//!
//! ## Control
//! - **pid**: Unity-feedback PID closed loops around a plant
//! - **heading**: Shortest-turn heading error and angle wrapping

pub mod heading;
pub mod kinematics;
pub mod linear_system;
pub mod pid;
