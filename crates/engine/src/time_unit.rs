// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coarse time units for thresholds and elapsed/remaining queries.

use serde::{Deserialize, Serialize};

/// Units accepted by builder thresholds and conversion queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Milliseconds in one of this unit.
    pub fn millis_per_unit(&self) -> u64 {
        match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
        }
    }

    /// Convert an amount of this unit to milliseconds, saturating at the
    /// numeric ceiling.
    pub fn to_millis(&self, amount: u64) -> u64 {
        amount.saturating_mul(self.millis_per_unit())
    }

    /// Convert milliseconds to this unit, truncating.
    pub fn from_millis(&self, millis: u64) -> u64 {
        millis / self.millis_per_unit()
    }
}

#[cfg(test)]
#[path = "time_unit_tests.rs"]
mod tests;
