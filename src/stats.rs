// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation statistics. Written only while the generator lock is held, but
/// readable and resettable without it.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    total_generated: AtomicU64,
    clock_backward: AtomicU64,
    waits: AtomicU64,
}

impl Counters {
    pub(crate) fn record_generated(&self) {
        self.total_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clock_backward(&self) {
        self.clock_backward.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn total_generated(&self) -> u64 {
        self.total_generated.load(Ordering::Relaxed)
    }

    pub(crate) fn clock_backward_count(&self) -> u64 {
        self.clock_backward.load(Ordering::Relaxed)
    }

    pub(crate) fn wait_count(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.total_generated.store(0, Ordering::Relaxed);
        self.clock_backward.store(0, Ordering::Relaxed);
        self.waits.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time view of a generator's state and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    /// Unix ms of the most recently minted ID, or -1 before the first one.
    pub last_timestamp_ms: i64,
    /// Unix ms read from the time source when the snapshot was taken.
    pub current_timestamp_ms: i64,
    /// Sequence number of the most recently minted ID.
    pub sequence: u32,
    pub total_generated: u64,
    pub clock_backward_count: u64,
    pub wait_count: u64,
    pub tolerance_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_every_counter() {
        let counters = Counters::default();
        counters.record_generated();
        counters.record_generated();
        counters.record_clock_backward();
        counters.record_wait();
        assert_eq!(counters.total_generated(), 2);
        assert_eq!(counters.clock_backward_count(), 1);
        assert_eq!(counters.wait_count(), 1);

        counters.reset();
        assert_eq!(counters.total_generated(), 0);
        assert_eq!(counters.clock_backward_count(), 0);
        assert_eq!(counters.wait_count(), 0);
    }
}
