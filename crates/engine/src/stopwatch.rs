// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Countup engine: a stopwatch with scheduled format swaps and actions.

use crate::clock::{Clock, TickHandle};
use crate::error::BuildError;
use crate::schedule::{
    normalize, ActionFn, ConsumeOrder, ScheduledAction, ScheduledFormat, TickFn,
};
use crate::state::CountingState;
use crate::time_unit::TimeUnit;
use parking_lot::Mutex;
use std::sync::Arc;
use tempus_format::{analyze, Semantic, TimeFormatter};

/// Builder for [`Stopwatch`].
///
/// ```no_run
/// use tempus_engine::{StopwatchBuilder, SystemClock, TimeUnit};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let stopwatch = StopwatchBuilder::new(SystemClock::new()?)
///     .start_format("SS:LL")
///     .on_tick(|_, text| println!("{text}"))
///     .change_format_when(1, TimeUnit::Minutes, "MM:SS")
///     .action_when(10, TimeUnit::Seconds, || println!("10s passed"))
///     .build()?;
/// stopwatch.start();
/// # Ok(())
/// # }
/// ```
pub struct StopwatchBuilder<C: Clock> {
    clock: C,
    start_format: Option<String>,
    tick_listener: Option<TickFn>,
    format_changes: Vec<(u64, String)>,
    actions: Vec<(u64, ActionFn)>,
    exact_interval: bool,
}

impl<C: Clock> StopwatchBuilder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            start_format: None,
            tick_listener: None,
            format_changes: Vec::new(),
            actions: Vec::new(),
            exact_interval: false,
        }
    }

    /// Set the format the stopwatch starts rendering with.
    pub fn start_format(mut self, format: impl Into<String>) -> Self {
        self.start_format = Some(format.into());
        self
    }

    /// Set the listener receiving `(elapsed_millis, rendered_text)` each
    /// tick. The listener runs inside the engine's exclusion region and
    /// must not call back into the engine.
    pub fn on_tick(mut self, listener: impl FnMut(u64, &str) + Send + 'static) -> Self {
        self.tick_listener = Some(Box::new(listener));
        self
    }

    /// Schedule a format change once the elapsed time reaches the given
    /// threshold. May be called repeatedly; entries sharing a threshold
    /// collapse to the first registered one.
    pub fn change_format_when(
        mut self,
        amount: u64,
        unit: TimeUnit,
        format: impl Into<String>,
    ) -> Self {
        self.format_changes.push((unit.to_millis(amount), format.into()));
        self
    }

    /// Schedule an action to run once the elapsed time reaches the given
    /// threshold. Entries sharing a threshold collapse to the first
    /// registered one. The action runs synchronously inside the tick; a
    /// slow action delays subsequent ticks.
    pub fn action_when(
        mut self,
        amount: u64,
        unit: TimeUnit,
        action: impl FnMut() + Send + 'static,
    ) -> Self {
        self.actions.push((unit.to_millis(amount), Box::new(action)));
        self
    }

    /// Tick once per visible display change instead of oversampling at the
    /// default interval.
    pub fn exact_interval(mut self, exact: bool) -> Self {
        self.exact_interval = exact;
        self
    }

    /// Validate every configured format and create the stopwatch.
    pub fn build(self) -> Result<Stopwatch<C>, BuildError> {
        let start_format = self.start_format.ok_or(BuildError::MissingStartFormat)?;
        let start_semantic = Arc::new(analyze_format(&start_format)?);
        let mut formats = Vec::with_capacity(self.format_changes.len());
        for (threshold_millis, format) in self.format_changes {
            formats.push(ScheduledFormat {
                threshold_millis,
                semantic: Arc::new(analyze_format(&format)?),
            });
        }
        let formats = normalize(
            formats,
            |entry| entry.threshold_millis,
            ConsumeOrder::Ascending,
        );
        let actions: Vec<ScheduledAction> = self
            .actions
            .into_iter()
            .map(|(threshold_millis, action)| ScheduledAction {
                threshold_millis,
                action,
            })
            .collect();
        let actions = normalize(
            actions,
            |entry| entry.threshold_millis,
            ConsumeOrder::Ascending,
        );

        let formatter = TimeFormatter::new(Arc::clone(&start_semantic));
        let interval = initial_interval(&formatter, self.exact_interval);
        Ok(Stopwatch {
            shared: Arc::new(Shared {
                clock: self.clock,
                state: Mutex::new(StopwatchState {
                    phase: CountingState::Inactive,
                    base_time: 0,
                    current_time: 0,
                    interval,
                    exact_interval: self.exact_interval,
                    formatter,
                    start_semantic,
                    formats,
                    format_cursor: 0,
                    actions,
                    action_cursor: 0,
                    tick_listener: self.tick_listener,
                    pending_tick: None,
                    released: false,
                }),
            }),
        })
    }
}

fn analyze_format(format: &str) -> Result<Semantic, BuildError> {
    analyze(format).map_err(|source| BuildError::InvalidFormat {
        format: format.to_string(),
        source,
    })
}

fn initial_interval(formatter: &TimeFormatter, exact: bool) -> u64 {
    if exact {
        formatter.exact_tick_interval()
    } else {
        formatter.optimal_tick_interval()
    }
}

/// Tick-driven countup engine.
///
/// All state mutation happens under one mutex spanning the whole tick
/// handler and each of start/stop/reset/release, so those may be called
/// from any thread. Dropping the stopwatch releases it.
pub struct Stopwatch<C: Clock> {
    shared: Arc<Shared<C>>,
}

struct Shared<C: Clock> {
    clock: C,
    state: Mutex<StopwatchState>,
}

struct StopwatchState {
    phase: CountingState,
    base_time: u64,
    current_time: u64,
    interval: u64,
    exact_interval: bool,
    formatter: TimeFormatter,
    start_semantic: Arc<Semantic>,
    formats: Vec<ScheduledFormat>,
    format_cursor: usize,
    actions: Vec<ScheduledAction>,
    action_cursor: usize,
    tick_listener: Option<TickFn>,
    pending_tick: Option<TickHandle>,
    released: bool,
}

impl<C: Clock> Stopwatch<C> {
    /// Start counting, or resume after a stop. A no-op while already
    /// counting or after release.
    pub fn start(&self) {
        let shared = &self.shared;
        let mut guard = shared.state.lock();
        let state = &mut *guard;
        if state.released || state.phase == CountingState::Resumed {
            return;
        }
        if state.phase == CountingState::Inactive {
            // A fresh run replays the full schedules.
            state.format_cursor = 0;
            state.action_cursor = 0;
            let start = Arc::clone(&state.start_semantic);
            state.apply_format(start);
            state.base_time = shared.clock.now();
        } else {
            state.base_time = shared.clock.now().saturating_sub(state.current_time);
        }
        state.phase = CountingState::Resumed;
        tracing::debug!(base_time = state.base_time, "stopwatch started");
        Self::schedule_tick(shared, state, 0);
    }

    /// Pause counting, retaining the elapsed time. A no-op unless the
    /// stopwatch is currently counting.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.phase != CountingState::Resumed {
            return;
        }
        state.phase = CountingState::Paused;
        Self::cancel_pending(&self.shared, &mut state);
        tracing::debug!(elapsed = state.current_time, "stopwatch stopped");
    }

    /// Return to the inactive state with the counter zeroed. The next
    /// start replays the full format and action schedules.
    pub fn reset(&self) {
        let mut state = self.shared.state.lock();
        state.phase = CountingState::Inactive;
        state.current_time = 0;
        state.base_time = 0;
        state.format_cursor = 0;
        state.action_cursor = 0;
        Self::cancel_pending(&self.shared, &mut state);
        tracing::debug!("stopwatch reset");
    }

    /// Elapsed time as of the last processed tick, converted to `unit`
    /// (truncating).
    pub fn elapsed_in(&self, unit: TimeUnit) -> u64 {
        unit.from_millis(self.shared.state.lock().current_time)
    }

    /// Elapsed milliseconds as of the last processed tick.
    pub fn elapsed_millis(&self) -> u64 {
        self.shared.state.lock().current_time
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CountingState {
        self.shared.state.lock().phase
    }

    /// The start format rendered at zero, for display before the first
    /// start.
    pub fn formatted_start_time(&self) -> String {
        let state = self.shared.state.lock();
        TimeFormatter::new(Arc::clone(&state.start_semantic)).format(0)
    }

    /// Cancel any pending tick and drop the listener and scheduled
    /// callbacks. The stopwatch cannot be started again afterwards.
    pub fn release(&self) {
        let mut state = self.shared.state.lock();
        if state.released {
            return;
        }
        state.released = true;
        state.phase = CountingState::Inactive;
        Self::cancel_pending(&self.shared, &mut state);
        state.tick_listener = None;
        state.formats.clear();
        state.actions.clear();
        tracing::debug!("stopwatch released");
    }

    fn schedule_tick(shared: &Arc<Shared<C>>, state: &mut StopwatchState, delay_millis: u64) {
        let weak = Arc::downgrade(shared);
        let handle = shared.clock.schedule_once(
            delay_millis,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::tick(&shared);
                }
            }),
        );
        state.pending_tick = Some(handle);
    }

    fn cancel_pending(shared: &Shared<C>, state: &mut StopwatchState) {
        if let Some(handle) = state.pending_tick.take() {
            shared.clock.cancel(handle);
        }
    }

    fn tick(shared: &Arc<Shared<C>>) {
        let mut guard = shared.state.lock();
        let state = &mut *guard;
        if state.phase != CountingState::Resumed {
            return;
        }
        let tick_started = shared.clock.now();
        state.current_time = tick_started.saturating_sub(state.base_time);
        state.swap_format_if_due();
        state.run_action_if_due();
        let current = state.current_time;
        let text = state.formatter.format(current);
        if let Some(listener) = state.tick_listener.as_mut() {
            listener(current, &text);
        }
        let processing = shared.clock.now().saturating_sub(tick_started);
        let delay = state.interval.saturating_sub(processing);
        Self::schedule_tick(shared, state, delay);
    }
}

impl StopwatchState {
    fn apply_format(&mut self, semantic: Arc<Semantic>) {
        self.formatter = TimeFormatter::new(semantic);
        self.interval = initial_interval(&self.formatter, self.exact_interval);
    }

    /// Swap to the next scheduled format once its threshold is reached.
    /// An entry whose stripped format equals the active one stays pending.
    fn swap_format_if_due(&mut self) {
        let due = match self.formats.get(self.format_cursor) {
            Some(entry)
                if entry.threshold_millis <= self.current_time
                    && entry.semantic.stripped_format()
                        != self.formatter.semantic().stripped_format() =>
            {
                Some(Arc::clone(&entry.semantic))
            }
            _ => None,
        };
        if let Some(semantic) = due {
            tracing::debug!(
                format = semantic.format(),
                at = self.current_time,
                "stopwatch format change"
            );
            self.apply_format(semantic);
            self.format_cursor += 1;
        }
    }

    fn run_action_if_due(&mut self) {
        if let Some(entry) = self.actions.get_mut(self.action_cursor) {
            if entry.threshold_millis <= self.current_time {
                tracing::debug!(
                    threshold = entry.threshold_millis,
                    at = self.current_time,
                    "stopwatch action"
                );
                (entry.action)();
                self.action_cursor += 1;
            }
        }
    }
}

impl<C: Clock> Drop for Stopwatch<C> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "stopwatch_tests.rs"]
mod tests;
