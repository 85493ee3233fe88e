//! Stopwatch state machine: start, stop, reset, release.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tempus_engine::{CountingState, FakeClock, StopwatchBuilder, TimeUnit};

#[test]
fn counts_up_from_zero() {
    let clock = FakeClock::new();
    let (frames, listener) = frame_recorder();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("MM:SS")
        .on_tick(listener)
        .build()
        .unwrap();

    assert_eq!(stopwatch.state(), CountingState::Inactive);
    stopwatch.start();
    assert_eq!(stopwatch.state(), CountingState::Resumed);

    clock.advance(0);
    clock.advance(62_000);
    let expected: Vec<String> = (0u64..=62)
        .map(|s| format!("{:02}:{:02}", s / 60, s % 60))
        .collect();
    assert_eq!(distinct(&frames), expected);
    assert_eq!(stopwatch.elapsed_in(TimeUnit::Seconds), 62);
    assert_eq!(stopwatch.elapsed_in(TimeUnit::Minutes), 1);
}

#[test]
fn pause_freezes_the_counter() {
    let clock = FakeClock::new();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(2_500);
    stopwatch.stop();
    assert_eq!(stopwatch.state(), CountingState::Paused);

    clock.advance(3_600_000);
    assert_eq!(stopwatch.elapsed_millis(), 2_500);

    stopwatch.start();
    clock.advance(0);
    clock.advance(500);
    assert_eq!(stopwatch.elapsed_millis(), 3_000);
}

#[test]
fn reset_returns_to_inactive_and_zero() {
    let clock = FakeClock::new();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(5_000);
    stopwatch.reset();

    assert_eq!(stopwatch.state(), CountingState::Inactive);
    assert_eq!(stopwatch.elapsed_millis(), 0);
    assert_eq!(clock.pending_ticks(), 0);
}

#[test]
fn release_stops_ticking_for_good() {
    let clock = FakeClock::new();
    let (frames, listener) = frame_recorder();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .on_tick(listener)
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    stopwatch.release();

    stopwatch.start();
    clock.advance(60_000);
    assert_eq!(frames.lock().len(), 1);
    assert_eq!(clock.pending_ticks(), 0);
}

#[test]
fn formatted_start_time_before_first_start() {
    let stopwatch = StopwatchBuilder::new(FakeClock::new())
        .start_format("HH:MM:SS")
        .build()
        .unwrap();
    assert_eq!(stopwatch.formatted_start_time(), "00:00:00");
}
