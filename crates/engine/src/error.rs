// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine construction errors

use tempus_format::FormatError;
use thiserror::Error;

/// Errors that can occur while building an engine.
///
/// Construction either fully succeeds or the engine never exists; none of
/// these are retryable with the same configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No start format was provided.
    #[error("start format is not provided")]
    MissingStartFormat,
    /// No start time was provided to a timer.
    #[error("start time is not provided")]
    MissingStartTime,
    /// A configured format failed analysis.
    #[error("invalid format {format:?}: {source}")]
    InvalidFormat {
        format: String,
        #[source]
        source: FormatError,
    },
}

/// Errors from constructing a system clock.
#[derive(Debug, Error)]
pub enum ClockError {
    /// No ambient tokio runtime to schedule ticks on.
    #[error("no tokio runtime available")]
    NoRuntime,
}
