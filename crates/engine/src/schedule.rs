// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Threshold-ordered schedules of format swaps and actions.

use std::cmp::Reverse;
use std::sync::Arc;
use tempus_format::Semantic;

/// One-shot callback fired when a scheduled threshold is crossed.
pub type ActionFn = Box<dyn FnMut() + Send + 'static>;

/// Listener receiving `(millis, rendered_text)` on every tick.
pub type TickFn = Box<dyn FnMut(u64, &str) + Send + 'static>;

/// Callback fired when a countdown reaches zero.
pub type FinishFn = Box<dyn FnMut() + Send + 'static>;

/// A format that becomes active once the engine crosses its threshold.
pub(crate) struct ScheduledFormat {
    pub threshold_millis: u64,
    pub semantic: Arc<Semantic>,
}

/// An action that fires once the engine crosses its threshold.
pub(crate) struct ScheduledAction {
    pub threshold_millis: u64,
    pub action: ActionFn,
}

/// Sort order of a schedule: the direction thresholds are crossed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConsumeOrder {
    /// Countup: smallest threshold is crossed first.
    Ascending,
    /// Countdown: thresholds are time remaining, largest is crossed first.
    Descending,
}

/// Sort a schedule into consumption order and collapse entries sharing a
/// threshold down to the first registered one.
pub(crate) fn normalize<T>(
    mut entries: Vec<T>,
    threshold: impl Fn(&T) -> u64,
    order: ConsumeOrder,
) -> Vec<T> {
    // Stable sort keeps registration order among equal thresholds, so the
    // dedup below retains the first registered entry.
    match order {
        ConsumeOrder::Ascending => entries.sort_by_key(|entry| threshold(entry)),
        ConsumeOrder::Descending => entries.sort_by_key(|entry| Reverse(threshold(entry))),
    }
    entries.dedup_by_key(|entry| threshold(entry));
    entries
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
