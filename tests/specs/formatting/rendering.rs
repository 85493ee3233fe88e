//! Rendering contract: padding, remainders, truncation, escapes.

use similar_asserts::assert_eq;
use std::sync::Arc;
use tempus_format::{analyze, TimeFormatter};

fn render(format: &str, millis: u64) -> String {
    TimeFormatter::new(Arc::new(analyze(format).unwrap())).format(millis)
}

#[test]
fn full_clock_rendering() {
    assert_eq!(render("HH:MM:SS", 0), "00:00:00");
    assert_eq!(render("HH:MM:SS", 3_725_000), "01:02:05");
}

#[test]
fn subseconds_truncate_never_round() {
    // 432 ms at two digits keeps "43"; rounding would give "44" at 435.
    assert_eq!(render("MM:SS.LL", 65_432), "01:05.43");
    assert_eq!(render("MM:SS.LL", 65_435), "01:05.43");
    assert_eq!(render("MM:SS.L", 65_999), "01:05.9");
}

#[test]
fn solo_subseconds_render_in_full() {
    assert_eq!(render("LLLL", 1_599), "1599");
    assert_eq!(render("LLLL", 42), "0042");
    assert_eq!(render("LL", 123_456), "123456");
}

#[test]
fn escaped_letters_are_never_substituted() {
    // 2 h 47 m: the escaped H renders literally next to the hours value.
    assert_eq!(render("H#H MM", 2 * 3_600_000 + 47 * 60_000), "2H 47");
    assert_eq!(render("HH#H MM#M SS#S LL#L#L", 14_869_219), "04H 07M 49S 21LL");
}

#[test]
fn values_wider_than_their_run_grow_the_text() {
    assert_eq!(render("SS:LL", 99_077), "99:07");
    assert_eq!(render("SS:LL", 101_049), "101:04");
    assert_eq!(render("M:SS", 59 * 60_000 + 59_000), "59:59");
    assert_eq!(render("M:SS", 61 * 60_000), "61:00");
}

#[test]
fn smaller_units_are_remainders_of_the_next_larger_configured_unit() {
    let millis = 3_600_000 + 5 * 60_000 + 7_000;
    // With hours configured, minutes render within the hour.
    assert_eq!(render("HH:MM", millis), "01:05");
    // Without hours, minutes render as the unbounded total.
    assert_eq!(render("MM:SS", millis), "65:07");
    // Without minutes, seconds render as the unbounded total.
    assert_eq!(render("SS", millis), "3907");
}

#[test]
fn rendering_is_stable_across_buffer_reuse() {
    let mut formatter = TimeFormatter::new(Arc::new(analyze("MM:SS.LL").unwrap()));
    let frames: Vec<String> = [0, 10, 990, 1_000, 61_000, 3_599_990]
        .into_iter()
        .map(|millis| formatter.format(millis))
        .collect();
    assert_eq!(
        frames.join("\n"),
        "00:00.00\n00:00.01\n00:00.99\n00:01.00\n01:01.00\n59:59.99"
    );
}
