//! # keyslot
//!
//! A fixed-capacity associative store for `DDLLDD` keys (two digits, two
//! uppercase letters, two digits), using open addressing with double hashing.
//!
//! Collisions do not claim a fresh slot: a key whose probe path reaches a live
//! slot joins that slot's key list and shares the value stored there. Removing
//! the last key of a slot leaves a tombstone, which lookups walk past and
//! inserts reuse.
//!
//! ## Example
//!
//! ```rust
//! use keyslot::SlotTable;
//!
//! let mut table = SlotTable::new();
//! table.insert("12AB34", "hello").unwrap();
//! table.insert("56CD78", "world").unwrap();
//!
//! assert_eq!(table.search("12AB34").unwrap(), Some("hello"));
//!
//! for (index, count) in table.occupancy() {
//!     println!("{index};{count}");
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod console;
pub mod error;
pub mod export;
pub mod generate;
pub mod key;
pub mod logger;
pub mod table;

pub use error::{Error, Result};
pub use key::{is_valid_key, Key};
pub use table::{Insertion, Probe, SlotTable, SlotView};

/// Number of slots in a default table.
pub const DEFAULT_CAPACITY: usize = 2500;

/// Configuration for a [`SlotTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of slots (`M`). Fixed for the life of the table; at least 2.
    pub capacity: usize,
    /// Upper bound on keys sharing one slot. A live slot at the bound is
    /// skipped by inserts like a tombstone. At least 1.
    pub max_keys_per_slot: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_keys_per_slot: usize::MAX,
        }
    }
}

#[cfg(test)]
mod proptests;
