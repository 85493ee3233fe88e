// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tempus-engine: tick-driven countup and countdown engines.
//!
//! A [`Stopwatch`] counts up from zero, a [`Timer`] counts down to zero.
//! Both render their current time through a `tempus-format` formatter on
//! every tick, can swap the active format and fire one-shot actions when
//! configured thresholds are crossed, and schedule their own ticks through
//! an injected [`Clock`], so they are fully deterministic under a
//! [`FakeClock`].

pub mod clock;
pub mod error;
pub mod schedule;
pub mod state;
pub mod stopwatch;
pub mod time_unit;
pub mod timer;

pub use clock::{Clock, FakeClock, SystemClock, TickCallback, TickHandle};
pub use error::{BuildError, ClockError};
pub use schedule::{ActionFn, FinishFn, TickFn};
pub use state::CountingState;
pub use stopwatch::{Stopwatch, StopwatchBuilder};
pub use time_unit::TimeUnit;
pub use timer::{Timer, TimerBuilder};
