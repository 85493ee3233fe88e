// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock and tick scheduling abstractions.
//!
//! Engines never read the OS clock directly: they receive a [`Clock`] that
//! provides monotonic time and one-shot tick scheduling. Production code
//! uses the tokio-backed [`SystemClock`]; tests drive a manually advanced
//! [`FakeClock`].

use crate::error::ClockError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Callback invoked when a scheduled tick fires.
pub type TickCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled tick, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Monotonic time source and one-shot tick scheduler.
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic time in milliseconds.
    fn now(&self) -> u64;

    /// Schedule `callback` to run once after `delay_millis`.
    fn schedule_once(&self, delay_millis: u64, callback: TickCallback) -> TickHandle;

    /// Cancel a previously scheduled tick. Cancelling an already-fired or
    /// unknown handle is a no-op.
    fn cancel(&self, handle: TickHandle);
}

/// Tokio-backed clock: each scheduled tick is a spawned task that sleeps
/// for the delay and then runs the callback.
#[derive(Debug, Clone)]
pub struct SystemClock {
    inner: Arc<SystemClockInner>,
}

#[derive(Debug)]
struct SystemClockInner {
    origin: Instant,
    handle: tokio::runtime::Handle,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, tokio::task::AbortHandle>>,
}

impl SystemClock {
    /// Create a clock on the ambient tokio runtime.
    pub fn new() -> Result<Self, ClockError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ClockError::NoRuntime)?;
        Ok(Self::with_handle(handle))
    }

    /// Create a clock that spawns its ticks on an explicit runtime handle.
    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self {
            inner: Arc::new(SystemClockInner {
                origin: Instant::now(),
                handle,
                next_id: AtomicU64::new(1),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.inner.origin.elapsed().as_millis() as u64
    }

    fn schedule_once(&self, delay_millis: u64, callback: TickCallback) -> TickHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        // Hold the pending lock across the spawn so the task cannot clear
        // its slot before the abort handle is registered.
        let mut pending = self.inner.pending.lock();
        let task = self.inner.handle.spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_millis)).await;
            inner.pending.lock().remove(&id);
            callback();
        });
        pending.insert(id, task.abort_handle());
        TickHandle(id)
    }

    fn cancel(&self, handle: TickHandle) {
        if let Some(task) = self.inner.pending.lock().remove(&handle.0) {
            task.abort();
        }
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share one timeline: the engine under test holds one clone and
/// the test advances another.
#[derive(Clone, Default)]
pub struct FakeClock {
    inner: Arc<FakeClockInner>,
}

#[derive(Default)]
struct FakeClockInner {
    now: Mutex<u64>,
    next_id: AtomicU64,
    pending: Mutex<Vec<PendingTick>>,
}

struct PendingTick {
    id: u64,
    fires_at: u64,
    callback: TickCallback,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by `millis`, firing due ticks in fire-time order.
    ///
    /// `now()` observes each tick's fire time while its callback runs, and
    /// callbacks may schedule further ticks; those run too when due within
    /// the same advance.
    pub fn advance(&self, millis: u64) {
        let target = *self.inner.now.lock() + millis;
        loop {
            let next = {
                let mut pending = self.inner.pending.lock();
                let due = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, tick)| tick.fires_at <= target)
                    .min_by_key(|(_, tick)| (tick.fires_at, tick.id))
                    .map(|(index, _)| index);
                due.map(|index| pending.remove(index))
            };
            let Some(tick) = next else { break };
            {
                let mut now = self.inner.now.lock();
                *now = (*now).max(tick.fires_at);
            }
            (tick.callback)();
        }
        *self.inner.now.lock() = target;
    }

    /// Number of ticks currently scheduled.
    pub fn pending_ticks(&self) -> usize {
        self.inner.pending.lock().len()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> u64 {
        *self.inner.now.lock()
    }

    fn schedule_once(&self, delay_millis: u64, callback: TickCallback) -> TickHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let fires_at = self.now() + delay_millis;
        self.inner
            .pending
            .lock()
            .push(PendingTick { id, fires_at, callback });
        TickHandle(id)
    }

    fn cancel(&self, handle: TickHandle) {
        self.inner.pending.lock().retain(|tick| tick.id != handle.0);
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
