// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::codec;
use chrono::{DateTime, Utc};
use std::fmt;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f UTC";

/// IdInfo is the parts of an ID.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdInfo {
    pub id: i64,
    /// Milliseconds between the generator's epoch and the mint time.
    pub offset_ms: i64,
    /// Unix ms at which the ID was minted.
    pub timestamp_ms: i64,
    pub sequence: u32,
    /// `timestamp_ms` rendered as `yyyy-MM-dd HH:mm:ss.SSS UTC`.
    pub formatted_time_utc: String,
}

impl IdInfo {
    pub(crate) fn decompose(id: i64, epoch_ms: i64) -> Self {
        let (offset_ms, sequence) = codec::decode(id);
        let timestamp_ms = epoch_ms.saturating_add(offset_ms);
        let formatted_time_utc = match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
            Some(time) => time.format(TIME_FORMAT).to_string(),
            None => format!("<invalid timestamp {timestamp_ms}>"),
        };
        Self {
            id,
            offset_ms,
            timestamp_ms,
            sequence,
            formatted_time_utc,
        }
    }

    /// The mint time, if chrono can represent it.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms)
    }
}

impl fmt::Display for IdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (time: {}, sequence: {})",
            self.id, self.formatted_time_utc, self.sequence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH: i64 = 1_752_969_600_000;

    #[test]
    fn formats_millis_in_utc() {
        let info = IdInfo::decompose((1_500 << 22) | 9, EPOCH);
        assert_eq!(info.timestamp_ms, EPOCH + 1_500);
        assert_eq!(info.sequence, 9);
        assert_eq!(info.formatted_time_utc, "2025-07-20 00:00:01.500 UTC");
        assert_eq!(info.offset_ms, 1_500);
        assert_eq!(
            info.to_string(),
            format!("{} (time: 2025-07-20 00:00:01.500 UTC, sequence: 9)", info.id)
        );
    }

    #[test]
    fn epoch_itself_decodes_to_zero_offset() {
        let info = IdInfo::decompose(0, EPOCH);
        assert_eq!(info.timestamp_ms, EPOCH);
        assert_eq!(info.sequence, 0);
        assert!(info.datetime().is_some());
    }
}
