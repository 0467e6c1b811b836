//! Tests for EdgeIndicator interpolation
//!
//! Verifies the fixed-duration linear approach, rebasing from the current
//! width, and that ticks never overshoot.

use std::time::Duration;

use edgeline_types::Edge;

use super::EdgeIndicator;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const DURATION: Duration = Duration::from_millis(200);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 1e-3
}

fn left() -> EdgeIndicator {
    EdgeIndicator::new(Edge::Left, DURATION)
}

// ═══════════════════════════════════════════════════════════════════════════
// Rate and Duration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rate_is_distance_over_duration() {
    let mut indicator = left();
    assert!(indicator.set_target(40.0, ms(0)));
    assert!(approx(indicator.rate_per_ms(), 0.2));

    indicator.snap_to(100.0);
    indicator.set_target(20.0, ms(0));
    assert!(approx(indicator.rate_per_ms(), 0.4));
}

#[test]
fn test_halfway_then_complete() {
    let mut indicator = left();
    indicator.set_target(40.0, ms(0));

    assert!(indicator.tick(ms(100)));
    assert!(approx(indicator.current_width(), 20.0));
    assert!(indicator.is_animating());

    assert!(indicator.tick(ms(100)));
    assert_eq!(indicator.current_width(), 40.0);
    assert!(!indicator.is_animating(), "session should end at the target");
}

#[test]
fn test_completes_within_one_frame_of_duration() {
    for (from, to) in [(0.0, 40.0), (120.0, 3.0), (7.5, 300.0), (64.0, 0.0)] {
        let mut indicator = left();
        indicator.snap_to(from);
        indicator.set_target(to, ms(0));

        let frame = ms(16);
        let mut frames = 0u32;
        while indicator.is_animating() {
            indicator.tick(frame);
            frames += 1;
            assert!(frames < 100, "animation from {from} to {to} never finished");
        }

        let total = frame * frames;
        assert!(total >= DURATION, "{from}->{to} finished early after {total:?}");
        assert!(total < DURATION + frame, "{from}->{to} overran: {total:?}");
        assert_eq!(indicator.current_width(), to);
    }
}

#[test]
fn test_ticks_never_overshoot() {
    let mut indicator = left();
    indicator.snap_to(10.0);
    indicator.set_target(50.0, ms(0));

    let mut previous = indicator.current_width();
    for step in [3, 41, 17, 90, 1, 60, 60] {
        indicator.tick(ms(step));
        let width = indicator.current_width();
        assert!(width >= previous, "width moved away from target");
        assert!(width <= 50.0, "width overshot target: {width}");
        previous = width;
    }
    assert_eq!(previous, 50.0);
}

#[test]
fn test_shrinking_never_undershoots() {
    let mut indicator = left();
    indicator.snap_to(80.0);
    indicator.set_target(30.0, ms(0));

    indicator.tick(ms(150));
    assert!(approx(indicator.current_width(), 42.5));
    indicator.tick(ms(500));
    assert_eq!(indicator.current_width(), 30.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Target Changes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_new_target_rebases_from_current_width() {
    let mut indicator = left();
    indicator.set_target(40.0, ms(0));
    indicator.advance_to(ms(50));
    assert!(approx(indicator.current_width(), 10.0));

    indicator.set_target(0.0, ms(50));
    let session = *indicator.session().unwrap();
    assert!(approx(session.start_width, 10.0), "must start from the interpolated width");
    assert_eq!(session.end_width, 0.0);
    assert!(approx(indicator.rate_per_ms(), 0.05));

    indicator.advance_to(ms(150));
    assert!(approx(indicator.current_width(), 5.0));
    indicator.advance_to(ms(250));
    assert_eq!(indicator.current_width(), 0.0);
    assert!(!indicator.is_animating());
}

#[test]
fn test_same_target_is_noop() {
    let mut indicator = left();
    assert!(indicator.set_target(40.0, ms(0)));
    indicator.advance_to(ms(60));
    let session = *indicator.session().unwrap();
    let rate = indicator.rate_per_ms();

    assert!(!indicator.set_target(40.0, ms(60)));
    assert_eq!(*indicator.session().unwrap(), session);
    assert_eq!(indicator.rate_per_ms(), rate);

    indicator.advance_to(ms(200));
    assert_eq!(indicator.current_width(), 40.0);
}

#[test]
fn test_converges_to_last_target() {
    let mut indicator = left();
    let mut now = 0;
    for (target, wait) in [(10.0, 30), (80.0, 5), (35.0, 120), (0.0, 0), (120.0, 199), (60.0, 1)] {
        indicator.set_target(target, ms(now));
        now += wait;
        indicator.advance_to(ms(now));
    }

    now += 200;
    indicator.advance_to(ms(now));
    assert_eq!(indicator.current_width(), 60.0);
    assert_eq!(indicator.target_width(), 60.0);
    assert!(!indicator.is_animating());
}

#[test]
fn test_negative_and_nan_widths_clamp_to_zero() {
    let mut indicator = left();
    indicator.snap_to(25.0);

    indicator.set_target(-12.0, ms(0));
    assert_eq!(indicator.target_width(), 0.0);

    indicator.set_target(f32::NAN, ms(0));
    assert_eq!(indicator.target_width(), 0.0);
}

#[test]
fn test_idle_ticks_are_noops() {
    let mut indicator = left();
    assert!(!indicator.tick(ms(16)));
    assert!(!indicator.advance_to(ms(1_000)));

    indicator.set_target(12.0, ms(0));
    indicator.tick(ms(200));
    assert!(!indicator.tick(ms(16)));
    assert_eq!(indicator.current_width(), 12.0);
}

#[test]
fn test_zero_duration_snaps() {
    let mut indicator = EdgeIndicator::new(Edge::Right, Duration::ZERO);
    indicator.set_target(33.0, ms(0));
    assert_eq!(indicator.current_width(), 33.0);
    assert!(!indicator.is_animating());
    assert!(indicator.is_mirrored());
}
