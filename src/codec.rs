// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bit layout of an ID, from most to least significant:
//!
//! ```text
//! | 1 bit: unused (0) | 41 bits: ms since epoch | 22 bits: sequence |
//! ```

/// bit length of time
pub const BIT_LEN_TIME: u32 = 41;
/// bit length of sequence number
pub const BIT_LEN_SEQUENCE: u32 = 22;
/// largest sequence number within one millisecond
pub const MAX_SEQUENCE: u32 = (1 << BIT_LEN_SEQUENCE) - 1;
/// exclusive upper bound of the time offset
pub(crate) const TIME_LIMIT: i64 = 1 << BIT_LEN_TIME;
/// mask for sequence number
const MASK_SEQUENCE: i64 = MAX_SEQUENCE as i64;

/// Returns true if `offset` can be stored in the time section.
pub(crate) fn offset_fits(offset: i64) -> bool {
    (0..TIME_LIMIT).contains(&offset)
}

/// Pack a time offset and a sequence number into an ID.
///
/// The caller guarantees that `offset` fits in 41 bits; the sequence is masked
/// to 22 bits.
pub(crate) fn encode(offset: i64, sequence: u32) -> i64 {
    debug_assert!(offset_fits(offset));
    (offset << BIT_LEN_SEQUENCE) | (i64::from(sequence) & MASK_SEQUENCE)
}

/// Split an ID into its time offset and sequence number.
pub(crate) fn decode(id: i64) -> (i64, u32) {
    (id >> BIT_LEN_SEQUENCE, (id & MASK_SEQUENCE) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_boundaries() {
        assert_eq!(encode(0, 0), 0);
        assert_eq!(encode(0, MAX_SEQUENCE), MAX_SEQUENCE as i64);
        assert_eq!(encode(1, 0), 1 << 22);

        let max = encode(TIME_LIMIT - 1, MAX_SEQUENCE);
        assert_eq!(max, i64::MAX);
        assert_eq!(decode(max), (TIME_LIMIT - 1, MAX_SEQUENCE));
    }

    #[test]
    fn sequence_is_masked() {
        assert_eq!(encode(7, MAX_SEQUENCE + 1), 7 << 22);
    }

    #[test]
    fn offset_range() {
        assert!(offset_fits(0));
        assert!(offset_fits(TIME_LIMIT - 1));
        assert!(!offset_fits(TIME_LIMIT));
        assert!(!offset_fits(-1));
    }
}
