//! # pursuit_sim - Headless Pursuit Driver
//!
//! Drives a [`Tracker`] against a scripted target and writes one JSON
//! object per tick. The binary wraps this with a CLI; the library side is
//! usable from tests and other tools.
//!
//! ## Binary Usage
//! ```bash
//! pursuit_sim --model pid --ticks 200 --target 5,5
//! pursuit_sim --model constant-turn-rate --orbit 4 --duration 30
//! pursuit_sim --step-response
//! ```
//!
//! ## Library Usage
//! ```rust
//! use pursuit_library::config::TrackerConfig;
//! use pursuit_sim::{Scenario, TargetScript};
//!
//! let scenario = Scenario::new(TrackerConfig::pid(), TargetScript::Fixed { x: 5.0, y: 5.0 })
//!     .with_ticks(100);
//! let mut out = Vec::new();
//! let summary = scenario.run(&mut out).unwrap();
//! assert_eq!(summary.ticks, 100);
//! ```

use anyhow::{bail, Context, Result};
use pursuit_library::algorithms::linear_system::{LinearSystem, SampleWindow};
use pursuit_library::algorithms::pid::{ClosedLoop, PidGains};
use pursuit_library::config::TrackerConfig;
use pursuit_library::feed::TargetFeed;
use pursuit_library::tracker::{TargetSample, Tracker};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, warn};

/// Default tick budget when neither ticks nor duration is given
pub const DEFAULT_TICKS: u64 = 200;

/// Where the target is at a given time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetScript {
    /// Target parked at one point
    Fixed { x: f64, y: f64 },
    /// Target circling `center` counter-clockwise, starting on the +x side
    Orbit {
        radius: f64,
        /// rad/s
        angular_speed: f64,
        center: (f64, f64),
    },
}

impl TargetScript {
    /// Target position at `time` seconds into the run
    pub fn sample(&self, time: f64) -> TargetSample {
        match *self {
            TargetScript::Fixed { x, y } => TargetSample::new(x, y),
            TargetScript::Orbit {
                radius,
                angular_speed,
                center,
            } => {
                let angle = angular_speed * time;
                TargetSample::new(
                    center.0 + radius * angle.cos(),
                    center.1 + radius * angle.sin(),
                )
            }
        }
    }
}

/// Final figures of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_position: (f64, f64),
    pub final_target: (f64, f64),
    pub final_distance: f64,
}

/// Tracker configuration, target script and tick budget
#[derive(Debug, Clone)]
pub struct Scenario {
    config: TrackerConfig,
    script: TargetScript,
    ticks: u64,
}

impl Scenario {
    pub fn new(config: TrackerConfig, script: TargetScript) -> Self {
        Self {
            config,
            script,
            ticks: DEFAULT_TICKS,
        }
    }

    /// Stop after a fixed number of ticks
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Stop once `seconds` of simulated time have elapsed (rounded up to whole ticks)
    pub fn with_duration(mut self, seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("duration must be a non-negative number of seconds, got {seconds}");
        }
        let ticks = (seconds / self.config.sample_period).ceil();
        self.ticks = ticks as u64;
        Ok(self)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run every tick, writing one JSON report per line to `out`
    ///
    /// Target samples go through a [`TargetFeed`] exactly as a live input
    /// source would deliver them.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let period = self.config.sample_period;
        let mut tracker =
            Tracker::new(self.config.clone()).context("Failed to configure tracker")?;
        let (sender, mut feed) = TargetFeed::channel(self.script.sample(0.0));

        info!(ticks = self.ticks, script = ?self.script, "starting run");

        let mut target = feed.latest();
        for k in 0..self.ticks {
            if sender.send(self.script.sample(k as f64 * period)).is_err() {
                warn!("target feed closed early");
            }
            target = feed.latest();

            let report = tracker
                .step(target)
                .with_context(|| format!("Tick {} failed", k + 1))?;
            serde_json::to_writer(&mut *out, &report).context("Failed to encode tick report")?;
            writeln!(out).context("Failed to write tick report")?;
        }
        out.flush().context("Failed to flush output")?;

        let position = tracker.position();
        let final_distance = (target.x - position.0).hypot(target.y - position.1);
        let summary = RunSummary {
            ticks: tracker.ticks(),
            final_position: position,
            final_target: target.position(),
            final_distance,
        };
        info!(
            ticks = summary.ticks,
            x = position.0,
            y = position.1,
            distance = final_distance,
            "run finished"
        );
        Ok(summary)
    }
}

/// One input/output series from a response study
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSeries {
    pub label: String,
    pub times: Vec<f64>,
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

/// Open- and closed-loop responses of the configured plant
///
/// * plant under zero input and under `sin(t)` over 20 s
/// * heading and speed loops under a unit step over one sample period and
///   over 5 s
/// * a PID(10, 10, 10) loop around the plant under `sin(t)` over 20 s
pub fn response_study(config: &TrackerConfig) -> Result<Vec<ResponseSeries>> {
    let step = config.sim_step;
    let plant = &config.plant;
    let mut series = Vec::new();

    let long = SampleWindow::new(20.0, step)?;
    let times = long.times();
    let sine: Vec<f64> = times.iter().map(|t| t.sin()).collect();

    series.push(open_loop("plant_zero", plant, &times, long.held(0.0))?);
    series.push(open_loop("plant_sine", plant, &times, sine.clone())?);

    let heading = ClosedLoop::build_for("heading", plant, config.heading_gains)?;
    let speed = ClosedLoop::build_for("speed", plant, config.speed_gains)?;
    for (name, closed) in [("heading", &heading), ("speed", &speed)] {
        series.push(step_response(
            format!("{name}_tick_step"),
            closed,
            config.sample_period,
            step,
        )?);
        series.push(step_response(format!("{name}_step"), closed, 5.0, step)?);
    }

    let pid = ClosedLoop::build(plant, PidGains::new(10.0, 10.0, 10.0))?;
    series.push(open_loop("pid_sine", pid.system(), &times, sine)?);

    debug!(count = series.len(), "response study complete");
    Ok(series)
}

/// Write each series as one JSON line
pub fn write_series<W: Write>(series: &[ResponseSeries], out: &mut W) -> Result<()> {
    for s in series {
        serde_json::to_writer(&mut *out, s)
            .with_context(|| format!("Failed to encode series {}", s.label))?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn open_loop(
    label: &str,
    system: &LinearSystem,
    times: &[f64],
    inputs: Vec<f64>,
) -> Result<ResponseSeries> {
    let outputs = system
        .simulate(&inputs, times)
        .with_context(|| format!("Failed to simulate {label}"))?;
    Ok(ResponseSeries {
        label: label.to_string(),
        times: times.to_vec(),
        inputs,
        outputs,
    })
}

fn step_response(
    label: String,
    closed: &ClosedLoop,
    duration: f64,
    step: f64,
) -> Result<ResponseSeries> {
    let (times, outputs) = closed
        .trajectory(1.0, duration, step)
        .with_context(|| format!("Failed to simulate {label}"))?;
    let inputs = vec![1.0; times.len()];
    Ok(ResponseSeries {
        label,
        times,
        inputs,
        outputs,
    })
}

/// Parse `"x,y"`
pub fn parse_point(s: &str) -> Result<(f64, f64), String> {
    match parse_numbers(s)?.as_slice() {
        [x, y] => Ok((*x, *y)),
        other => Err(format!("expected x,y but got {} values", other.len())),
    }
}

/// Parse `"kp,ki,kd"`
pub fn parse_gains(s: &str) -> Result<PidGains, String> {
    match parse_numbers(s)?.as_slice() {
        [kp, ki, kd] => Ok(PidGains::new(*kp, *ki, *kd)),
        other => Err(format!("expected kp,ki,kd but got {} values", other.len())),
    }
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {e}", part.trim()))
        })
        .collect()
}
