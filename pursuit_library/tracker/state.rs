use serde::{Deserialize, Serialize};

/// Tracker pose and last commanded speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub position: (f64, f64),
    /// Heading in (-π, π]
    pub heading: f64,
    /// Distance covered during the last tick
    pub speed: f64,
}

/// Latest observed target position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetSample {
    pub x: f64,
    pub y: f64,
}

impl TargetSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<(f64, f64)> for TargetSample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Everything computed during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    pub target: TargetSample,
    /// Bearing from the previous position to the target
    pub bearing: f64,
    /// Signed heading correction requested before the tick
    pub heading_error: f64,
    /// Raw distance to the target before the tick
    pub distance: f64,
    /// Distance after the clamp, as fed to the speed loop
    pub speed_input: f64,
    pub state: TrackerState,
}

impl TickReport {
    pub fn position(&self) -> (f64, f64) {
        self.state.position
    }
}
