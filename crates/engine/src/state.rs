// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a counting engine.
///
/// Inactive → (start) → Resumed ⇄ (stop/start) Paused; reset returns to
/// Inactive from either active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountingState {
    /// Created, reset or finished; not counting.
    Inactive,
    /// Counting; ticks are being delivered.
    Resumed,
    /// Stopped with the counter retained; start resumes.
    Paused,
}
