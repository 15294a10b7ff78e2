// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::Snowflake;
use crate::clock::{SystemClock, TimeSource};
use crate::error::Error;
use crate::snowflake::{DEFAULT_EPOCH_MS, DEFAULT_TOLERANCE_MS, Internals, SharedSnowflake};
use crate::stats::Counters;
use chrono::prelude::*;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder {
    start_time: Option<DateTime<Utc>>,
    tolerance_ms: i64,
    time: Option<Box<dyn TimeSource>>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            start_time: None,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            time: None,
        }
    }

    /// Set the start time (the epoch).
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set how far, in milliseconds, the clock may move backwards before
    /// `next_id` fails. Negative values are clamped to 0.
    pub fn clock_backward_tolerance(mut self, tolerance_ms: i64) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }

    /// Set the clock used to timestamp ids. Defaults to [`SystemClock`].
    pub fn time_source<T: TimeSource + 'static>(mut self, time: T) -> Self {
        self.time = Some(Box::new(time));
        self
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if the start time is ahead of the
    /// time source's current time.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        if let Some(start_time) = self.start_time {
            let now = match &self.time {
                Some(time) => time.current_millis(),
                None => SystemClock.current_millis(),
            };
            if start_time.timestamp_millis() > now {
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
        }
        Ok(self.build())
    }

    /// Build without validating the start time.
    pub(crate) fn build(self) -> Snowflake {
        let epoch_ms = self
            .start_time
            .map_or(DEFAULT_EPOCH_MS, |start_time| start_time.timestamp_millis());
        let tolerance_ms = self.tolerance_ms.clamp(0, i64::from(u32::MAX)) as u32;
        debug!(epoch_ms, tolerance_ms, "snowflake generator created");

        let shared = Arc::new(SharedSnowflake {
            epoch_ms,
            tolerance_ms,
            time: self.time.unwrap_or_else(|| Box::new(SystemClock)),
            internals: Mutex::new(Internals {
                last_timestamp: -1,
                sequence: 0,
            }),
            counters: Counters::default(),
        });
        Snowflake::new_inner(shared)
    }
}
