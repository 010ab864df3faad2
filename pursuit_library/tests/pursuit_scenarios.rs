//! End-to-end pursuit scenarios
//!
//! Each test drives a tracker for many ticks the way the simulation loop
//! does and checks where it ends up.

use approx::assert_abs_diff_eq;
use pursuit_library::prelude::*;

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn orbit(tick: usize) -> (f64, f64) {
    let angle = 0.5 * tick as f64 / 8.0;
    (4.0 * angle.cos(), 4.0 * angle.sin())
}

#[test]
fn pid_tracker_arrives_and_stays() {
    let config = TrackerConfig::pid()
        .with_sample_period(1.0 / 8.0)
        .with_initial_position(-5.0, -5.0)
        .with_initial_heading(0.0)
        .with_heading_gains(PidGains::new(10.0, 0.0, 2.0))
        .with_speed_gains(PidGains::new(10.0, 0.0, 1.0));
    let mut tracker = Tracker::new(config).unwrap();

    let target = (5.0, 5.0);
    let mut position = tracker.position();
    for _ in 0..100 {
        position = tracker.tick(target).unwrap();
    }
    assert!(
        distance(position, target) < 0.5,
        "tracker at {position:?} after 100 ticks"
    );

    let settled = position;
    for _ in 0..100 {
        let next = tracker.tick(target).unwrap();
        assert!(distance(next, settled) < 0.01, "drifted to {next:?}");
    }
    assert_eq!(tracker.ticks(), 200);
}

#[test]
fn pid_tracker_first_ticks_close_the_gap() {
    let mut tracker = Tracker::new(TrackerConfig::pid()).unwrap();
    let target = (5.0, 5.0);

    let mut last = distance(tracker.position(), target);
    for _ in 0..10 {
        let now = distance(tracker.tick(target).unwrap(), target);
        assert!(now < last, "distance grew from {last} to {now}");
        last = now;
    }
}

#[test]
fn distance_clamp_caps_speed() {
    let config = TrackerConfig::pid().with_max_distance(10.0);
    let mut tracker = Tracker::new(config).unwrap();
    let (_, speed_loop) = tracker.loops().unwrap();
    let capped = speed_loop.respond(10.0, 0.125, 0.01).unwrap();

    for _ in 0..3 {
        let report = tracker.step((45.0, 45.0)).unwrap();
        assert!(report.distance > 10.0);
        assert_eq!(report.speed_input, 10.0);
        assert_abs_diff_eq!(report.state.speed, capped, epsilon = 1e-12);
    }
}

#[test]
fn pid_tracker_follows_circling_target() {
    let mut tracker = Tracker::new(TrackerConfig::pid()).unwrap();

    for tick in 0..400 {
        let target = orbit(tick);
        let position = tracker.tick(target).unwrap();
        if tick >= 100 {
            // Steady chase: a constant lag behind the target
            assert!(distance(position, target) < 1.5, "lost target at tick {tick}");
        }
    }
}

#[test]
fn teleport_tracker_never_lags() {
    let mut tracker = Tracker::new(TrackerConfig::teleport()).unwrap();
    for tick in 0..50 {
        let target = orbit(tick);
        assert_eq!(tracker.tick(target).unwrap(), target);
    }
}

#[test]
fn constant_velocity_tracker_hovers_around_target() {
    let mut tracker = Tracker::new(TrackerConfig::constant_velocity()).unwrap();
    let target = (5.0, 5.0);

    for tick in 0..60 {
        let position = tracker.tick(target).unwrap();
        if tick >= 30 {
            // Fixed 0.5 unit steps overshoot back and forth across the target
            assert!(distance(position, target) <= 0.5 + 1e-9);
        }
    }
}

#[test]
fn constant_turn_rate_tracker_circles_in() {
    let mut tracker = Tracker::new(TrackerConfig::constant_turn_rate()).unwrap();
    let target = (5.0, 5.0);

    let mut closest = f64::INFINITY;
    for tick in 0..400 {
        let position = tracker.tick(target).unwrap();
        closest = closest.min(distance(position, target));
        if tick >= 100 {
            assert!(distance(position, target) < 3.0);
        }
        let heading = tracker.state().heading;
        assert!(heading > -std::f64::consts::PI && heading <= std::f64::consts::PI);
    }
    assert!(closest < 0.5);
}

#[test]
fn feed_driven_loop_uses_latest_sample() {
    let (sender, mut feed) = TargetFeed::channel(TargetSample::new(5.0, 5.0));
    let mut tracker = Tracker::new(TrackerConfig::teleport()).unwrap();

    assert_eq!(tracker.tick(feed.latest()).unwrap(), (5.0, 5.0));

    sender.send(TargetSample::new(1.0, 1.0)).unwrap();
    sender.send(TargetSample::new(-2.0, 3.0)).unwrap();
    assert_eq!(tracker.tick(feed.latest()).unwrap(), (-2.0, 3.0));

    drop(sender);
    assert_eq!(tracker.tick(feed.latest()).unwrap(), (-2.0, 3.0));
    assert!(feed.is_disconnected());
}

#[test]
fn custom_plant_drives_both_loops() {
    // First-order lag instead of the double integrator
    let plant = LinearSystem::new(vec![vec![-1.0]], vec![1.0], vec![1.0], 0.0).unwrap();
    let config = TrackerConfig::pid()
        .with_plant(plant)
        .with_heading_gains(PidGains::proportional(20.0))
        .with_speed_gains(PidGains::proportional(20.0));
    let mut tracker = Tracker::new(config).unwrap();

    let target = (5.0, 5.0);
    let start = distance(tracker.position(), target);
    for _ in 0..50 {
        tracker.tick(target).unwrap();
    }
    assert!(distance(tracker.position(), target) < start);
}

#[test]
fn tracker_config_survives_json() {
    let config = TrackerConfig::constant_turn_rate().with_max_distance(3.0);
    let json = serde_json::to_string(&config).unwrap();
    let back: TrackerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.max_distance, 3.0);
    assert_eq!(back.plant, config.plant);
    match back.model {
        MotionModel::ConstantTurnRate { speed, turn_rate } => {
            assert_eq!(speed, 2.0);
            assert_abs_diff_eq!(turn_rate, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        }
        other => panic!("unexpected model {other}"),
    }
    Tracker::new(back).unwrap();
}
