// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Countdown engine: a timer with scheduled format swaps and actions.

use crate::clock::{Clock, TickHandle};
use crate::error::BuildError;
use crate::schedule::{
    normalize, ActionFn, ConsumeOrder, FinishFn, ScheduledAction, ScheduledFormat, TickFn,
};
use crate::state::CountingState;
use crate::time_unit::TimeUnit;
use parking_lot::Mutex;
use std::sync::Arc;
use tempus_format::{analyze, Semantic, TimeFormatter};

/// Builder for [`Timer`].
///
/// ```no_run
/// use tempus_engine::{SystemClock, TimeUnit, TimerBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let timer = TimerBuilder::new(SystemClock::new()?)
///     .start_format("MM:SS")
///     .start_time(60, TimeUnit::Seconds)
///     .on_tick(|_, text| println!("{text}"))
///     .change_format_when(10, TimeUnit::Seconds, "SS.LL")
///     .action_when(20, TimeUnit::Seconds, || println!("20s left"))
///     .on_finish(|| println!("done"))
///     .build()?;
/// timer.start();
/// # Ok(())
/// # }
/// ```
pub struct TimerBuilder<C: Clock> {
    clock: C,
    start_format: Option<String>,
    start_time: Option<u64>,
    tick_listener: Option<TickFn>,
    finish_listener: Option<FinishFn>,
    format_changes: Vec<(u64, String)>,
    actions: Vec<(u64, ActionFn)>,
    exact_interval: bool,
}

impl<C: Clock> TimerBuilder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            start_format: None,
            start_time: None,
            tick_listener: None,
            finish_listener: None,
            format_changes: Vec::new(),
            actions: Vec::new(),
            exact_interval: false,
        }
    }

    /// Set the format the timer starts rendering with.
    pub fn start_format(mut self, format: impl Into<String>) -> Self {
        self.start_format = Some(format.into());
        self
    }

    /// Set the time the countdown starts from.
    pub fn start_time(mut self, amount: u64, unit: TimeUnit) -> Self {
        self.start_time = Some(unit.to_millis(amount));
        self
    }

    /// Set the listener receiving `(remaining_millis, rendered_text)` each
    /// tick. The listener runs inside the engine's exclusion region and
    /// must not call back into the engine.
    pub fn on_tick(mut self, listener: impl FnMut(u64, &str) + Send + 'static) -> Self {
        self.tick_listener = Some(Box::new(listener));
        self
    }

    /// Set the callback invoked exactly once when the countdown reaches
    /// zero.
    pub fn on_finish(mut self, listener: impl FnMut() + Send + 'static) -> Self {
        self.finish_listener = Some(Box::new(listener));
        self
    }

    /// Schedule a format change once the remaining time drops to the given
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

    /// Schedule an action to run once the remaining time drops to the
    /// given threshold. Entries sharing a threshold collapse to the first
    /// registered one. The action runs synchronously inside the tick.
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

    /// Validate every configured format and create the timer.
    pub fn build(self) -> Result<Timer<C>, BuildError> {
        let start_format = self.start_format.ok_or(BuildError::MissingStartFormat)?;
        let start_time = self.start_time.ok_or(BuildError::MissingStartTime)?;
        let start_semantic = Arc::new(analyze_format(&start_format)?);
        let mut formats = Vec::with_capacity(self.format_changes.len());
        for (threshold_millis, format) in self.format_changes {
            formats.push(ScheduledFormat {
                threshold_millis,
                semantic: Arc::new(analyze_format(&format)?),
            });
        }
        // Countdown thresholds are time remaining: the largest is crossed
        // first.
        let formats = normalize(
            formats,
            |entry| entry.threshold_millis,
            ConsumeOrder::Descending,
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
            ConsumeOrder::Descending,
        );

        let formatter = TimeFormatter::new(Arc::clone(&start_semantic));
        let interval = initial_interval(&formatter, self.exact_interval);
        Ok(Timer {
            shared: Arc::new(Shared {
                clock: self.clock,
                state: Mutex::new(TimerState {
                    phase: CountingState::Inactive,
                    start_time,
                    current_time: start_time,
                    millis_in_future: 0,
                    interval,
                    exact_interval: self.exact_interval,
                    formatter,
                    start_semantic,
                    formats,
                    format_cursor: 0,
                    actions,
                    action_cursor: 0,
                    tick_listener: self.tick_listener,
                    finish_listener: self.finish_listener,
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

/// Tick-driven countdown engine.
///
/// All state mutation happens under one mutex spanning the whole tick
/// handler and each of start/stop/reset/release, so those may be called
/// from any thread. Dropping the timer releases it.
pub struct Timer<C: Clock> {
    shared: Arc<Shared<C>>,
}

struct Shared<C: Clock> {
    clock: C,
    state: Mutex<TimerState>,
}

struct TimerState {
    phase: CountingState,
    /// Configured countdown length in milliseconds.
    start_time: u64,
    /// Remaining milliseconds as of the last processed tick.
    current_time: u64,
    /// Monotonic instant at which the countdown reaches zero.
    millis_in_future: u64,
    interval: u64,
    exact_interval: bool,
    formatter: TimeFormatter,
    start_semantic: Arc<Semantic>,
    formats: Vec<ScheduledFormat>,
    format_cursor: usize,
    actions: Vec<ScheduledAction>,
    action_cursor: usize,
    tick_listener: Option<TickFn>,
    finish_listener: Option<FinishFn>,
    pending_tick: Option<TickHandle>,
    released: bool,
}

impl<C: Clock> Timer<C> {
    /// Start the countdown, or resume after a stop. A no-op while already
    /// counting or after release. Starting from the inactive state (fresh,
    /// reset or finished) begins again from the configured start time.
    pub fn start(&self) {
        let shared = &self.shared;
        let mut guard = shared.state.lock();
        let state = &mut *guard;
        if state.released || state.phase == CountingState::Resumed {
            return;
        }
        let now = shared.clock.now();
        if state.phase == CountingState::Inactive {
            // A fresh run replays the full schedules.
            state.current_time = state.start_time;
            state.format_cursor = 0;
            state.action_cursor = 0;
            let start = Arc::clone(&state.start_semantic);
            state.apply_format(start);
            state.millis_in_future = now + state.start_time;
        } else {
            state.millis_in_future = now + state.current_time;
        }
        state.phase = CountingState::Resumed;
        tracing::debug!(remaining = state.current_time, "timer started");
        Self::schedule_tick(shared, state, 0);
    }

    /// Pause the countdown, retaining the remaining time. A no-op unless
    /// the timer is currently counting.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.phase != CountingState::Resumed {
            return;
        }
        state.phase = CountingState::Paused;
        Self::cancel_pending(&self.shared, &mut state);
        tracing::debug!(remaining = state.current_time, "timer stopped");
    }

    /// Return to the inactive state with the counter back at the
    /// configured start time. The next start replays the full format and
    /// action schedules.
    pub fn reset(&self) {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        state.phase = CountingState::Inactive;
        state.current_time = state.start_time;
        state.format_cursor = 0;
        state.action_cursor = 0;
        Self::cancel_pending(&self.shared, state);
        let start = Arc::clone(&state.start_semantic);
        state.apply_format(start);
        tracing::debug!("timer reset");
    }

    /// Remaining time converted to `unit`, truncating.
    ///
    /// Unless the countdown still sits at its configured start time, one
    /// smallest-configured-unit span is added before converting so a value
    /// about to roll over is not under-reported.
    pub fn remaining_in(&self, unit: TimeUnit) -> u64 {
        let state = self.shared.state.lock();
        let mut millis = state.current_time;
        if millis != state.start_time {
            let span = state.formatter.semantic().smallest_unit().span_millis();
            millis = millis.saturating_add(span);
        }
        unit.from_millis(millis)
    }

    /// Remaining milliseconds as of the last processed tick.
    pub fn remaining_millis(&self) -> u64 {
        self.shared.state.lock().current_time
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CountingState {
        self.shared.state.lock().phase
    }

    /// The start format rendered at the configured start time, for display
    /// before the first start.
    pub fn formatted_start_time(&self) -> String {
        let state = self.shared.state.lock();
        TimeFormatter::new(Arc::clone(&state.start_semantic)).format(state.start_time)
    }

    /// Cancel any pending tick and drop the listeners and scheduled
    /// callbacks. The timer cannot be started again afterwards.
    pub fn release(&self) {
        let mut state = self.shared.state.lock();
        if state.released {
            return;
        }
        state.released = true;
        state.phase = CountingState::Inactive;
        Self::cancel_pending(&self.shared, &mut state);
        state.tick_listener = None;
        state.finish_listener = None;
        state.formats.clear();
        state.actions.clear();
        tracing::debug!("timer released");
    }

    fn schedule_tick(shared: &Arc<Shared<C>>, state: &mut TimerState, delay_millis: u64) {
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

    fn cancel_pending(shared: &Shared<C>, state: &mut TimerState) {
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
        state.current_time = state.millis_in_future.saturating_sub(tick_started);
        state.swap_format_if_due();
        state.run_action_if_due();
        if state.current_time == 0 {
            state.finish();
            return;
        }
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

impl TimerState {
    fn apply_format(&mut self, semantic: Arc<Semantic>) {
        self.formatter = TimeFormatter::new(semantic);
        self.interval = initial_interval(&self.formatter, self.exact_interval);
    }

    /// Swap to the next scheduled format once the remaining time drops to
    /// its threshold. An entry whose stripped format equals the active one
    /// stays pending.
    fn swap_format_if_due(&mut self) {
        let due = match self.formats.get(self.format_cursor) {
            Some(entry)
                if self.current_time <= entry.threshold_millis
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
                remaining = self.current_time,
                "timer format change"
            );
            self.apply_format(semantic);
            self.format_cursor += 1;
        }
    }

    fn run_action_if_due(&mut self) {
        if let Some(entry) = self.actions.get_mut(self.action_cursor) {
            if self.current_time <= entry.threshold_millis {
                tracing::debug!(
                    threshold = entry.threshold_millis,
                    remaining = self.current_time,
                    "timer action"
                );
                (entry.action)();
                self.action_cursor += 1;
            }
        }
    }

    /// Deliver the final zero frame, fire the finish callback once, and
    /// return to the inactive state so a restart begins from the
    /// configured start time.
    fn finish(&mut self) {
        let text = self.formatter.format(0);
        if let Some(listener) = self.tick_listener.as_mut() {
            listener(0, &text);
        }
        if let Some(finish) = self.finish_listener.as_mut() {
            finish();
        }
        self.phase = CountingState::Inactive;
        self.current_time = self.start_time;
        self.format_cursor = 0;
        self.action_cursor = 0;
        let start = Arc::clone(&self.start_semantic);
        self.apply_format(start);
        self.pending_tick = None;
        tracing::debug!("timer finished");
    }
}

impl<C: Clock> Drop for Timer<C> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
