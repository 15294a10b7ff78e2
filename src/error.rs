// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Convenience type alias for usage within the tests.
#[cfg(test)]
pub(crate) type BoxDynError = Box<dyn std::error::Error + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The clock moved backwards by more than the configured tolerance.
    #[error("clock moved backwards by {0} ms, exceeding the tolerance")]
    ClockBackwardExceeded(i64),
    /// The offset from the epoch no longer fits in 41 bits.
    #[error("timestamp offset {0} ms exceeds the 41-bit range")]
    TimestampOverflow(i64),
    /// The time source reported a time earlier than the epoch.
    #[error("clock reading `{0}` ms is earlier than the epoch")]
    ClockBeforeEpoch(i64),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
}
