//! Stopwatch schedules: format swaps and one-shot actions.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tempus_engine::{FakeClock, StopwatchBuilder, TimeUnit};

#[test]
fn format_swaps_at_threshold_and_never_reverts() {
    let clock = FakeClock::new();
    let (frames, listener) = frame_recorder();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS:LL")
        .on_tick(listener)
        .change_format_when(60, TimeUnit::Seconds, "MM:SS")
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(59_990);
    assert_eq!(frames.lock().last().map(String::as_str), Some("59:99"));

    clock.advance(10);
    assert_eq!(frames.lock().last().map(String::as_str), Some("01:00"));

    // Well past the threshold the swapped format is still active: the
    // subsecond run is gone, so frames change only once per second.
    frames.lock().clear();
    clock.advance(120_000);
    let tail = distinct(&frames);
    let expected: Vec<String> = (60u64..=180)
        .map(|s| format!("{:02}:{:02}", s / 60, s % 60))
        .collect();
    assert_eq!(tail, expected);
}

#[test]
fn chained_format_swaps_apply_in_threshold_order() {
    let clock = FakeClock::new();
    let (frames, listener) = frame_recorder();
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .on_tick(listener)
        .change_format_when(2, TimeUnit::Seconds, "MM:SS")
        .change_format_when(1, TimeUnit::Seconds, "SS.L")
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(3_000);
    let frames = distinct(&frames);
    assert!(frames.contains(&"01.0".to_string()), "swap at 1s: {frames:?}");
    assert!(frames.contains(&"00:02".to_string()), "swap at 2s: {frames:?}");
}

#[test]
fn actions_fire_once_in_threshold_order() {
    let clock = FakeClock::new();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let first = Arc::clone(&order);
    let second = Arc::clone(&order);
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .action_when(2, TimeUnit::Seconds, move || second.lock().push("at 2s"))
        .action_when(1, TimeUnit::Seconds, move || first.lock().push("at 1s"))
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(10_000);
    assert_eq!(*order.lock(), vec!["at 1s", "at 2s"]);
}

#[test]
fn equal_thresholds_honor_only_the_first_registered() {
    let clock = FakeClock::new();
    let fired = Arc::new(AtomicU32::new(0));
    let winner = Arc::clone(&fired);
    let loser = Arc::clone(&fired);
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .action_when(1, TimeUnit::Seconds, move || {
            winner.fetch_add(1, Ordering::SeqCst);
        })
        .action_when(1, TimeUnit::Seconds, move || {
            loser.fetch_add(100, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    stopwatch.start();
    clock.advance(0);
    clock.advance(5_000);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn reset_replays_the_whole_schedule() {
    let clock = FakeClock::new();
    let fired = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&fired);
    let stopwatch = StopwatchBuilder::new(clock.clone())
        .start_format("SS")
        .action_when(1, TimeUnit::Seconds, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    for _ in 0..3 {
        stopwatch.start();
        clock.advance(0);
        clock.advance(1_500);
        stopwatch.reset();
    }
    assert_eq!(fired.load(Ordering::SeqCst), 3);
}
