// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time units addressable by format placeholders.

use serde::{Deserialize, Serialize};

/// A time unit that a format placeholder can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnitType {
    Hours,
    Minutes,
    Seconds,
    /// Remainder milliseconds within the current second.
    RemMillis,
}

impl TimeUnitType {
    /// All unit types, largest first.
    pub const ALL: [TimeUnitType; 4] = [
        TimeUnitType::Hours,
        TimeUnitType::Minutes,
        TimeUnitType::Seconds,
        TimeUnitType::RemMillis,
    ];

    /// The placeholder char for this unit.
    pub fn symbol(&self) -> char {
        match self {
            TimeUnitType::Hours => 'H',
            TimeUnitType::Minutes => 'M',
            TimeUnitType::Seconds => 'S',
            TimeUnitType::RemMillis => 'L',
        }
    }

    /// Span of one unit, in milliseconds.
    pub fn span_millis(&self) -> u64 {
        match self {
            TimeUnitType::Hours => 3_600_000,
            TimeUnitType::Minutes => 60_000,
            TimeUnitType::Seconds => 1_000,
            TimeUnitType::RemMillis => 1,
        }
    }

    /// Whether `symbol` is one of the placeholder letters.
    pub fn is_unit_symbol(symbol: char) -> bool {
        TimeUnitType::ALL.iter().any(|unit| unit.symbol() == symbol)
    }
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
