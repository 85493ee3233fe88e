// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration rendering against an analyzed format.

use crate::position::Position;
use crate::semantic::Semantic;
use crate::unit::TimeUnitType;
use std::sync::Arc;

const MILLIS_IN_SECOND: u64 = 1_000;
const SECONDS_IN_MINUTE: u64 = 60;
const MINUTES_IN_HOUR: u64 = 60;

/// Renders millisecond durations as text using one [`Semantic`].
///
/// Holds a reusable char buffer that is re-seeded from the stripped format
/// on every call, so steady-state rendering performs no reallocation.
/// [`format`](TimeFormatter::format) returns an owned `String`; the buffer
/// itself is never exposed.
#[derive(Debug)]
pub struct TimeFormatter {
    semantic: Arc<Semantic>,
    buffer: Vec<char>,
}

impl TimeFormatter {
    pub fn new(semantic: Arc<Semantic>) -> Self {
        let buffer = Vec::with_capacity(semantic.stripped_format().len());
        Self { semantic, buffer }
    }

    /// The semantic this formatter renders with.
    pub fn semantic(&self) -> &Arc<Semantic> {
        &self.semantic
    }

    /// Delay between ticks that keeps the display fresh without wasted
    /// wakeups: 100 ms unless the format shows two or more subsecond
    /// digits (10 ms for two, 1 ms for three or more).
    pub fn optimal_tick_interval(&self) -> u64 {
        let mut interval = 100;
        if self.semantic.has(TimeUnitType::RemMillis) {
            let width = self.semantic.position_of(TimeUnitType::RemMillis).len();
            if width == 2 {
                interval = 10;
            } else if width > 2 {
                interval = 1;
            }
        }
        interval
    }

    /// Delay between ticks matching exactly one visible display change:
    /// the span of the smallest configured unit.
    pub fn exact_tick_interval(&self) -> u64 {
        match self.semantic.smallest_unit() {
            TimeUnitType::RemMillis => self.optimal_tick_interval(),
            unit => unit.span_millis(),
        }
    }

    /// Render `millis` according to the format.
    ///
    /// Each configured unit is left-padded with zeros to its declared
    /// width. Hours, minutes and seconds wider than their run render in
    /// full (the text grows, values are never truncated); the subsecond
    /// run keeps only its declared number of high-order digits unless it
    /// is the only configured unit.
    pub fn format(&mut self, millis: u64) -> String {
        self.buffer.clear();
        self.buffer.extend(self.semantic.stripped_format().chars());

        let seconds = millis / MILLIS_IN_SECOND;
        let minutes = seconds / SECONDS_IN_MINUTE;
        let hours = minutes / MINUTES_IN_HOUR;
        let rem_millis = millis % MILLIS_IN_SECOND;
        let rem_seconds = seconds - minutes * SECONDS_IN_MINUTE;
        let rem_minutes = minutes - hours * MINUTES_IN_HOUR;

        let mut pending = [(Position::EMPTY, 0u64); 4];
        let mut count = 0;
        let mut push = |position: Position, value: u64| {
            pending[count] = (position, value);
            count += 1;
        };
        let semantic = &self.semantic;
        if semantic.has(TimeUnitType::RemMillis) {
            let value = if semantic.has_only_rem_millis() {
                millis
            } else {
                truncate_rem_millis(
                    rem_millis,
                    semantic.position_of(TimeUnitType::RemMillis).len(),
                )
            };
            push(semantic.position_of(TimeUnitType::RemMillis), value);
        }
        if semantic.has(TimeUnitType::Seconds) {
            let value = if semantic.has(TimeUnitType::Minutes) {
                rem_seconds
            } else {
                seconds
            };
            push(semantic.position_of(TimeUnitType::Seconds), value);
        }
        if semantic.has(TimeUnitType::Minutes) {
            let value = if semantic.has(TimeUnitType::Hours) {
                rem_minutes
            } else {
                minutes
            };
            push(semantic.position_of(TimeUnitType::Minutes), value);
        }
        if semantic.has(TimeUnitType::Hours) {
            push(semantic.position_of(TimeUnitType::Hours), hours);
        }

        // Substitute right to left so a run growing past its width shifts
        // only text that is already in its final shape.
        let pending = &mut pending[..count];
        pending.sort_unstable_by_key(|(position, _)| std::cmp::Reverse(position.start()));
        for &mut (position, value) in pending {
            write_value(&mut self.buffer, position, value);
        }

        self.buffer.iter().collect()
    }
}

/// Keep the high-order `width` digits of a 3-digit millisecond remainder.
/// Truncation, never rounding.
fn truncate_rem_millis(rem_millis: u64, width: usize) -> u64 {
    if width >= 3 {
        return rem_millis;
    }
    let divisor = 10u64.pow((3 - width) as u32);
    rem_millis / divisor
}

/// Write `value` into `position`, zero-padded to the position width.
/// Digits beyond the width are inserted at the run start so the value is
/// never cut short.
fn write_value(buffer: &mut Vec<char>, position: Position, value: u64) {
    let width = position.len();
    let start = position.start() as usize;
    let end = position.end() as usize;
    let digits = decimal_length(value).max(width);
    let mut remaining = value;
    for offset in 0..digits {
        let digit = char::from(b'0' + (remaining % 10) as u8);
        remaining /= 10;
        if offset < width {
            buffer[end - offset] = digit;
        } else {
            buffer.insert(start, digit);
        }
    }
}

fn decimal_length(mut value: u64) -> usize {
    let mut length = 1;
    while value >= 10 {
        value /= 10;
        length += 1;
    }
    length
}

#[cfg(test)]
#[path = "formatter_tests.rs"]
mod tests;
