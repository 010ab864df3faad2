//! # pursuit_sim - Headless Pursuit Driver
//!
//! Usage:
//!   pursuit_sim                                  # PID tracker chasing (5, 5)
//!   pursuit_sim --model teleport --orbit 4       # Circling target
//!   pursuit_sim --heading-gains 8,0,1 --max-distance 10
//!   pursuit_sim --step-response                  # Loop responses, no pursuit
//!
//! Tick reports go to stdout as JSON lines, logs to stderr
//! (`RUST_LOG=debug` for per-tick logging).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pursuit_library::algorithms::pid::PidGains;
use pursuit_library::config::{MotionModel, Propagation, TrackerConfig};
use pursuit_sim::{parse_gains, parse_point, response_study, write_series, Scenario, TargetScript};
use std::io::{self, BufWriter};
use tracing::info;

/// Tracker variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Model {
    Teleport,
    ConstantVelocity,
    ConstantTurnRate,
    Pid,
}

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "pursuit_sim")]
#[command(about = "Headless 2D pursuit simulator")]
struct Args {
    /// Tracker motion model
    #[arg(long, value_enum, default_value = "pid")]
    model: Model,

    /// Number of ticks to run
    #[arg(long, default_value_t = pursuit_sim::DEFAULT_TICKS)]
    ticks: u64,

    /// Simulated seconds to run (overrides --ticks)
    #[arg(long)]
    duration: Option<f64>,

    /// Fixed target position "x,y"
    #[arg(long, value_parser = parse_point, default_value = "5,5")]
    target: (f64, f64),

    /// Circle the origin at this radius instead of using --target
    #[arg(long)]
    orbit: Option<f64>,

    /// Angular speed of the circling target (rad/s)
    #[arg(long, default_value_t = 0.5)]
    orbit_speed: f64,

    /// Tracker start position "x,y"
    #[arg(long, value_parser = parse_point)]
    start: Option<(f64, f64)>,

    /// Tracker start heading (radians)
    #[arg(long)]
    heading: Option<f64>,

    /// Time between ticks (seconds), defaults to the model preset
    #[arg(long)]
    sample_period: Option<f64>,

    /// Heading loop gains "kp,ki,kd"
    #[arg(long, value_parser = parse_gains)]
    heading_gains: Option<PidGains>,

    /// Speed loop gains "kp,ki,kd"
    #[arg(long, value_parser = parse_gains)]
    speed_gains: Option<PidGains>,

    /// Largest distance fed to the speed loop (0 disables)
    #[arg(long, default_value_t = 0.0)]
    max_distance: f64,

    /// Advance position directly instead of through the transition matrix (pid model)
    #[arg(long)]
    direct: bool,

    /// Print plant and closed-loop responses instead of running a pursuit
    #[arg(long)]
    step_response: bool,
}

impl Args {
    fn tracker_config(&self) -> TrackerConfig {
        let mut config = match self.model {
            Model::Teleport => TrackerConfig::teleport(),
            Model::ConstantVelocity => TrackerConfig::constant_velocity(),
            Model::ConstantTurnRate => TrackerConfig::constant_turn_rate(),
            Model::Pid => TrackerConfig::pid(),
        };

        if self.model == Model::Pid && self.direct {
            config = config.with_model(MotionModel::Pid {
                propagation: Propagation::Direct,
            });
        }
        if let Some(period) = self.sample_period {
            config = config.with_sample_period(period);
        }
        if let Some(gains) = self.heading_gains {
            config = config.with_heading_gains(gains);
        }
        if let Some(gains) = self.speed_gains {
            config = config.with_speed_gains(gains);
        }
        if let Some((x, y)) = self.start {
            config = config.with_initial_position(x, y);
        }
        if let Some(heading) = self.heading {
            config = config.with_initial_heading(heading);
        }
        config.with_max_distance(self.max_distance)
    }

    fn script(&self) -> TargetScript {
        match self.orbit {
            Some(radius) => TargetScript::Orbit {
                radius,
                angular_speed: self.orbit_speed,
                center: (0.0, 0.0),
            },
            None => TargetScript::Fixed {
                x: self.target.0,
                y: self.target.1,
            },
        }
    }
}

fn main() -> Result<()> {
    // Logs on stderr keep stdout clean for JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.tracker_config();
    config.validate().context("Invalid tracker configuration")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.step_response {
        info!("Computing plant and closed-loop responses");
        let series = response_study(&config).context("Response study failed")?;
        return write_series(&series, &mut out).context("Failed to write responses");
    }

    let mut scenario = Scenario::new(config, args.script()).with_ticks(args.ticks);
    if let Some(seconds) = args.duration {
        scenario = scenario.with_duration(seconds)?;
    }

    info!(model = ?args.model, ticks = scenario.ticks(), "Starting pursuit_sim");
    let summary = scenario.run(&mut out)?;
    info!(
        "Finished after {} ticks, {:.3} from target",
        summary.ticks, summary.final_distance
    );

    Ok(())
}
