// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use std::{hint, sync::Arc, thread, time::Duration};

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// The generator reads the clock through this trait so the clock can be
/// swapped, e.g. for a scripted one in tests.
pub trait TimeSource: Send + Sync {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> i64;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// How the current reading relates to the last recorded timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClockReading {
    Advanced,
    Same,
    /// Behind by at most the tolerance; carries the drift in ms.
    BackwardWithin(i64),
    /// Behind by more than the tolerance; carries the drift in ms.
    BackwardExceeded(i64),
}

/// Classify `now` against `last`. A drift equal to the tolerance is still
/// within tolerance.
pub(crate) fn classify(now: i64, last: i64, tolerance_ms: u32) -> ClockReading {
    if now > last {
        ClockReading::Advanced
    } else if now == last {
        ClockReading::Same
    } else {
        let drift = last.saturating_sub(now);
        if drift > i64::from(tolerance_ms) {
            ClockReading::BackwardExceeded(drift)
        } else {
            ClockReading::BackwardWithin(drift)
        }
    }
}

const SPIN_LIMIT: u32 = 64;
const YIELD_LIMIT: u32 = 256;
const SLEEP_STEP: Duration = Duration::from_micros(100);

/// Poll `time` until it reports a value strictly greater than `last` and
/// return that value.
///
/// Spins briefly, then yields, then sleeps in short steps. There is no upper
/// bound: a clock that never advances keeps the caller here forever.
pub(crate) fn wait_past(time: &dyn TimeSource, last: i64) -> i64 {
    let mut attempts: u32 = 0;
    loop {
        let now = time.current_millis();
        if now > last {
            return now;
        }
        if attempts < SPIN_LIMIT {
            hint::spin_loop();
        } else if attempts < YIELD_LIMIT {
            thread::yield_now();
        } else {
            thread::sleep(SLEEP_STEP);
        }
        attempts = attempts.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(11, 10, 5), ClockReading::Advanced);
        assert_eq!(classify(10, 10, 5), ClockReading::Same);
        assert_eq!(classify(7, 10, 5), ClockReading::BackwardWithin(3));
        assert_eq!(classify(5, 10, 5), ClockReading::BackwardWithin(5));
        assert_eq!(classify(4, 10, 5), ClockReading::BackwardExceeded(6));
        assert_eq!(classify(9, 10, 0), ClockReading::BackwardExceeded(1));
    }

    #[test]
    fn classify_extreme_readings_saturate() {
        assert_eq!(
            classify(i64::MIN, 10, 5),
            ClockReading::BackwardExceeded(i64::MAX)
        );
        assert_eq!(classify(i64::MAX, -1, 5), ClockReading::Advanced);
    }

    struct Ticking(AtomicI64);

    impl TimeSource for Ticking {
        fn current_millis(&self) -> i64 {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn wait_past_returns_first_later_reading() {
        let clock = Ticking(AtomicI64::new(0));
        assert_eq!(wait_past(&clock, 500), 501);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.current_millis() > 1_577_836_800_000);
    }
}
