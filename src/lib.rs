//! A time-ordered unique ID generator inspired by [Twitter's Snowflake].
//!
//! Each id is a positive `i64`:
//!
//! ```text
//! | 1 bit: 0 | 41 bits: ms since epoch | 22 bits: sequence |
//! ```
//!
//! There is no machine id: ids are unique per generator instance. Small
//! backward clock jumps (5 ms by default) are absorbed; larger ones fail.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! snowflake_drift = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use snowflake_drift::Snowflake;
//!
//! let sf = Snowflake::new().unwrap();
//! let next_id = sf.next_id().unwrap();
//! println!("{}", sf.parse_id(next_id));
//! ```
//!
//! Or use the process-wide generator:
//!
//! ```
//! let id = snowflake_drift::next_id().unwrap();
//! assert!(snowflake_drift::Snowflake::global().is_valid_id(id));
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is threadSafe. `clone` it before moving to another thread:
//! ```
//! use snowflake_drift::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod codec;
mod error;
mod info;
mod snowflake;
mod stats;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::{SystemClock, TimeSource};
pub use codec::{BIT_LEN_SEQUENCE, BIT_LEN_TIME, MAX_SEQUENCE};
pub use error::*;
pub use info::IdInfo;
pub use stats::StatusSnapshot;

/// Generate an id from the process-wide generator.
pub fn next_id() -> Result<i64, Error> {
    Snowflake::global().next_id()
}

/// Generate `count` ids from the process-wide generator.
pub fn next_ids(count: usize) -> Result<Vec<i64>, Error> {
    Snowflake::global().next_ids(count)
}
