// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Format string analysis and validation.

use crate::error::FormatError;
use crate::position::Position;
use crate::semantic::Semantic;
use crate::unit::TimeUnitType;

/// The escape marker: a `#` directly before a unit symbol turns it into
/// literal text.
pub const ESCAPE_SYMBOL: char = '#';

/// Analyze a raw format string into a validated [`Semantic`].
///
/// Fails when no unit symbol is present, when a unit symbol occurs in more
/// than one unescaped run, or when the unit combination leaves an overflow
/// boundary undefined (see [`FormatError`]).
pub fn analyze(format: &str) -> Result<Semantic, FormatError> {
    let chars: Vec<char> = format.chars().collect();
    let hours = position_of(TimeUnitType::Hours, &chars, format)?;
    let minutes = position_of(TimeUnitType::Minutes, &chars, format)?;
    let seconds = position_of(TimeUnitType::Seconds, &chars, format)?;
    let rem_millis = position_of(TimeUnitType::RemMillis, &chars, format)?;

    if hours.is_empty() && minutes.is_empty() && seconds.is_empty() && rem_millis.is_empty() {
        return Err(FormatError::NoNecessarySymbols {
            format: format.to_string(),
        });
    }
    validate_combinations(format, hours, minutes, seconds, rem_millis)?;

    let smallest_unit = smallest_unit_of(minutes, seconds, rem_millis);
    let largest_unit = largest_unit_of(hours, minutes, seconds);
    let stripped_format = strip_format(&chars);
    Ok(Semantic::new(
        hours,
        minutes,
        seconds,
        rem_millis,
        format.to_string(),
        stripped_format,
        smallest_unit,
        largest_unit,
    ))
}

/// Locate the single unescaped run of `unit`, in stripped-format indices.
fn position_of(unit: TimeUnitType, chars: &[char], format: &str) -> Result<Position, FormatError> {
    let symbol = unit.symbol();
    let mut start: i32 = -1;
    let mut end: i32 = -1;
    for (i, &ch) in chars.iter().enumerate() {
        if ch != symbol {
            continue;
        }
        let escaped = i > 0 && chars[i - 1] == ESCAPE_SYMBOL;
        if escaped {
            continue;
        }
        if start == -1 {
            start = i as i32;
        } else if i as i32 != end + 1 {
            // A second unescaped run: formatting cannot know which to fill.
            return Err(FormatError::NonContiguousFormatSymbols {
                format: format.to_string(),
                symbol,
            });
        }
        end = i as i32;
    }
    if start == -1 {
        return Ok(Position::EMPTY);
    }
    let offset = escape_symbols_before(chars, start as usize) as i32;
    Ok(Position::new(start - offset, end - offset))
}

/// Count escape markers strictly before `index` in the raw chars. Only a
/// `#` directly followed by a unit symbol is a marker; any other `#` is
/// literal text.
fn escape_symbols_before(chars: &[char], index: usize) -> usize {
    chars[..index]
        .iter()
        .enumerate()
        .filter(|&(i, &ch)| {
            ch == ESCAPE_SYMBOL
                && chars
                    .get(i + 1)
                    .is_some_and(|&next| TimeUnitType::is_unit_symbol(next))
        })
        .count()
}

fn validate_combinations(
    format: &str,
    hours: Position,
    minutes: Position,
    seconds: Position,
    rem_millis: Position,
) -> Result<(), FormatError> {
    let has_hours = hours.is_not_empty();
    let has_minutes = minutes.is_not_empty();
    let has_seconds = seconds.is_not_empty();
    let has_rem_millis = rem_millis.is_not_empty();
    let illegal = |reason| {
        Err(FormatError::IllegalCombination {
            format: format.to_string(),
            reason,
        })
    };
    if has_hours {
        if (has_seconds || has_rem_millis) && !has_minutes {
            return illegal("hours with seconds or subseconds, but no minutes");
        }
        if has_minutes && has_rem_millis && !has_seconds {
            return illegal("hours, minutes and subseconds, but no seconds");
        }
    } else if has_minutes && has_rem_millis && !has_seconds {
        return illegal("minutes and subseconds, but no seconds");
    }
    Ok(())
}

fn smallest_unit_of(minutes: Position, seconds: Position, rem_millis: Position) -> TimeUnitType {
    let mut smallest = TimeUnitType::Hours;
    if minutes.is_not_empty() {
        smallest = TimeUnitType::Minutes;
    }
    if seconds.is_not_empty() {
        smallest = TimeUnitType::Seconds;
    }
    if rem_millis.is_not_empty() {
        smallest = TimeUnitType::RemMillis;
    }
    smallest
}

fn largest_unit_of(hours: Position, minutes: Position, seconds: Position) -> TimeUnitType {
    let mut largest = TimeUnitType::RemMillis;
    if seconds.is_not_empty() {
        largest = TimeUnitType::Seconds;
    }
    if minutes.is_not_empty() {
        largest = TimeUnitType::Minutes;
    }
    if hours.is_not_empty() {
        largest = TimeUnitType::Hours;
    }
    largest
}

/// Remove escape markers, keeping the letters they escaped.
fn strip_format(chars: &[char]) -> String {
    let mut stripped = String::with_capacity(chars.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == ESCAPE_SYMBOL
            && chars
                .get(i + 1)
                .is_some_and(|&next| TimeUnitType::is_unit_symbol(next))
        {
            continue;
        }
        stripped.push(ch);
    }
    stripped
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
