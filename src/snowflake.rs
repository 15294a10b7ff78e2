// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::Builder;
use crate::clock::{self, ClockReading, TimeSource};
use crate::codec::{self, BIT_LEN_SEQUENCE, BIT_LEN_TIME, MAX_SEQUENCE, TIME_LIMIT};
use crate::error::*;
use crate::info::IdInfo;
use crate::stats::{Counters, StatusSnapshot};
use chrono::{DateTime, Utc};
use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock},
};
use tracing::{debug, error, info, instrument, warn};

/// Default epoch: 2025-07-20T00:00:00Z in Unix milliseconds.
pub const DEFAULT_EPOCH_MS: i64 = 1_752_969_600_000;
/// Default clock backward tolerance in milliseconds.
pub const DEFAULT_TOLERANCE_MS: i64 = 5;

const MILLIS_PER_YEAR: f64 = 365.25 * 86_400_000.0;

/// Internals of Snowflake.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    /// Unix ms of the last minted ID, -1 before the first one.
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: u32,
}

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    pub(crate) epoch_ms: i64,
    pub(crate) tolerance_ms: u32,
    pub(crate) time: Box<dyn TimeSource>,
    pub(crate) internals: Mutex<Internals>,
    pub(crate) counters: Counters,
}

/// Snowflake is a time-ordered unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads; every
/// clone shares the same state.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

static GLOBAL: OnceLock<Snowflake> = OnceLock::new();

impl Snowflake {
    /// Create a new Snowflake with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new Snowflake with the default epoch and the given clock
    /// backward tolerance. Negative values are clamped to 0.
    pub fn with_tolerance(tolerance_ms: i64) -> Result<Self, Error> {
        Builder::new().clock_backward_tolerance(tolerance_ms).finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The process-wide generator with the default configuration.
    ///
    /// [`crate::next_id`] and [`crate::next_ids`] use this same instance.
    /// Generators created through [`Builder`] never share its state.
    pub fn global() -> &'static Snowflake {
        GLOBAL.get_or_init(|| Builder::new().build())
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// A clock that moved backwards by at most the tolerance is absorbed by
    /// continuing on the last timestamp. When the 22-bit sequence is used up
    /// within one millisecond the call blocks until the clock moves on; a
    /// frozen clock blocks it forever.
    #[instrument(level = "trace", skip(self))]
    pub fn next_id(&self) -> Result<i64, Error> {
        let shared = &*self.0;
        let mut internals = shared.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let last = internals.last_timestamp;
        let mut now = shared.time.current_millis();
        let mut clock_backward = false;
        let mut waited = false;

        let sequence = match clock::classify(now, last, shared.tolerance_ms) {
            ClockReading::Advanced => 0,
            ClockReading::BackwardExceeded(drift) => {
                error!(
                    drift_ms = drift,
                    last_timestamp_ms = last,
                    "clock moved backwards beyond tolerance"
                );
                return Err(Error::ClockBackwardExceeded(drift));
            }
            reading => {
                if let ClockReading::BackwardWithin(drift) = reading {
                    warn!(
                        drift_ms = drift,
                        last_timestamp_ms = last,
                        "clock moved backwards, reusing last timestamp"
                    );
                    clock_backward = true;
                    now = last;
                }
                let sequence = (internals.sequence + 1) & MAX_SEQUENCE;
                if sequence == 0 {
                    debug!(
                        last_timestamp_ms = last,
                        "sequence exhausted, waiting for next millisecond"
                    );
                    waited = true;
                    now = clock::wait_past(shared.time.as_ref(), last);
                }
                sequence
            }
        };

        let offset = now.saturating_sub(shared.epoch_ms);
        if offset < 0 {
            return Err(Error::ClockBeforeEpoch(now));
        }
        if !codec::offset_fits(offset) {
            error!(offset_ms = offset, "timestamp offset exceeds the 41-bit range");
            return Err(Error::TimestampOverflow(offset));
        }

        internals.last_timestamp = now;
        internals.sequence = sequence;
        if clock_backward {
            shared.counters.record_clock_backward();
        }
        if waited {
            shared.counters.record_wait();
        }
        shared.counters.record_generated();

        Ok(codec::encode(offset, sequence))
    }

    /// Generate `count` ids, one [`next_id`] call each.
    ///
    /// Other callers may interleave between the elements. On the first
    /// failure the ids produced so far are discarded and the error returned.
    ///
    /// [`next_id`]: struct.Snowflake.html#method.next_id
    pub fn next_ids(&self, count: usize) -> Result<Vec<i64>, Error> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "count must be greater than zero".to_string(),
            ));
        }
        (0..count).map(|_| self.next_id()).collect()
    }

    /// Break an id up into its parts.
    pub fn parse_id(&self, id: i64) -> IdInfo {
        IdInfo::decompose(id, self.0.epoch_ms)
    }

    /// Re-encode a mint time and sequence into an id. The sequence is masked
    /// to 22 bits.
    pub fn compose(&self, timestamp_ms: i64, sequence: u32) -> Result<i64, Error> {
        let offset = timestamp_ms.saturating_sub(self.0.epoch_ms);
        if offset < 0 {
            return Err(Error::ClockBeforeEpoch(timestamp_ms));
        }
        if !codec::offset_fits(offset) {
            return Err(Error::TimestampOverflow(offset));
        }
        Ok(codec::encode(offset, sequence))
    }

    /// Returns true if `id` is positive and was minted between the epoch and
    /// now, inclusive.
    pub fn is_valid_id(&self, id: i64) -> bool {
        if id <= 0 {
            return false;
        }
        let (offset, _) = codec::decode(id);
        let timestamp = self.0.epoch_ms.saturating_add(offset);
        (self.0.epoch_ms..=self.0.time.current_millis()).contains(&timestamp)
    }

    /// Snapshot of the generator state and statistics.
    pub fn status(&self) -> Result<StatusSnapshot, Error> {
        let shared = &*self.0;
        let internals = shared.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        Ok(StatusSnapshot {
            last_timestamp_ms: internals.last_timestamp,
            current_timestamp_ms: shared.time.current_millis(),
            sequence: internals.sequence,
            total_generated: shared.counters.total_generated(),
            clock_backward_count: shared.counters.clock_backward_count(),
            wait_count: shared.counters.wait_count(),
            tolerance_ms: shared.tolerance_ms,
        })
    }

    /// Zero the statistics. The last timestamp and sequence are kept.
    ///
    /// Holds the generator lock, so neither `next_id` nor `status` can observe
    /// a partially reset set of counters.
    pub fn reset_statistics(&self) -> Result<(), Error> {
        let _internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        self.0.counters.reset();
        info!("snowflake statistics reset");
        Ok(())
    }

    /// The epoch in Unix milliseconds.
    pub fn epoch_ms(&self) -> i64 {
        self.0.epoch_ms
    }

    /// The epoch as a UTC date time.
    pub fn epoch(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0.epoch_ms)
    }

    /// The effective clock backward tolerance in milliseconds.
    pub fn tolerance_ms(&self) -> u32 {
        self.0.tolerance_ms
    }

    /// Human readable description of the configuration.
    pub fn config_info(&self) -> String {
        let epoch = IdInfo::decompose(0, self.0.epoch_ms);
        format!(
            "epoch: {} ({} ms), clock backward tolerance: {} ms, layout: 1 sign bit | {} time bits | {} sequence bits, max sequence: {}",
            epoch.formatted_time_utc,
            self.0.epoch_ms,
            self.0.tolerance_ms,
            BIT_LEN_TIME,
            BIT_LEN_SEQUENCE,
            MAX_SEQUENCE,
        )
    }

    /// Human readable description of the theoretical limits.
    pub fn performance_info(&self) -> String {
        let per_ms = u64::from(MAX_SEQUENCE) + 1;
        let last = IdInfo::decompose(
            codec::encode(TIME_LIMIT - 1, MAX_SEQUENCE),
            self.0.epoch_ms,
        );
        format!(
            "max throughput: {} ids/ms ({} ids/s), time range: {:.1} years, ids exhausted after: {}",
            per_ms,
            per_ms * 1_000,
            TIME_LIMIT as f64 / MILLIS_PER_YEAR,
            last.formatted_time_utc,
        )
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("epoch_ms", &self.0.epoch_ms)
            .field("tolerance_ms", &self.0.tolerance_ms)
            .finish_non_exhaustive()
    }
}
