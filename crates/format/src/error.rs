// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Format analysis errors

use thiserror::Error;

/// Errors raised by format analysis.
///
/// All of these are permanent: the format string itself is invalid and
/// re-analyzing it can never succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The format contains no unescaped unit symbol at all.
    #[error("no unit symbols H, M, S or L found in format {format:?}")]
    NoNecessarySymbols { format: String },

    /// A unit symbol occurs in more than one unescaped run, so formatting
    /// cannot know which run to fill.
    #[error("unit symbol {symbol:?} occurs in more than one run in format {format:?}")]
    NonContiguousFormatSymbols { format: String, symbol: char },

    /// The configured units leave an overflow boundary undefined: every
    /// smaller unit renders as a remainder of the next larger configured
    /// unit, so intermediate units cannot be skipped.
    #[error("illegal unit combination in format {format:?}: {reason}")]
    IllegalCombination {
        format: String,
        reason: &'static str,
    },
}
