//! # LZW code table
//!
//! This crate provides the [`CodeTable`] of an LZW encoder: the dictionary that learns byte
//! sequences from the input and assigns each new one a code, in exactly the order a decoder
//! replaying the emitted codes assigns them. Packing codes into bits and framing a stream are
//! left to the driver built on top of it.
//!
//! The table follows the common 8-bit convention:
//!
//!  * codes `0..=255` are the literal bytes,
//!  * `CLEAR_CODE == 256` and `END_CODE == 257` are reserved for the driver,
//!  * new sequences are assigned codes from `FIRST_CODE == 258` upwards,
//!  * the code size starts at 9 bits and grows up to 12 bits.
//!
//! Past 4096 entries a table keeps learning with the code size stuck at 12 bits, a driver
//! usually emits a clear code and starts over before that. A table created with
//! `CodeTable::with_max_entries` stops learning at its limit instead.
//!
//! Examplary use as the core of an encoder:
//!
//! ```
//! use lzw_codetable::{CodeTable, Step};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let mut codes = vec![];
//!
//! let mut table = CodeTable::new();
//! for &byte in data {
//!     if let Step::Resolved { prefix, .. } = table.consume(byte) {
//!         codes.push(prefix);
//!     }
//! }
//! codes.extend(table.pending_code());
//!
//! assert_eq!(table.lookup(258), Some(&b"TO"[..]));
//! assert_eq!(codes.len(), 16);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

/// Alias for a LZW code point
pub type Code = u32;

/// The code reserved for resetting the table.
pub const CLEAR_CODE: Code = 256;
/// The code reserved for marking the end of data.
pub const END_CODE: Code = CLEAR_CODE + 1;
/// The first code assigned to a learned sequence.
pub const FIRST_CODE: Code = END_CODE + 1;

/// The code size, in bits, of a fresh table.
pub const MIN_CODESIZE: u8 = 9;
/// The largest code size in bits.
pub const MAX_CODESIZE: u8 = 12;
/// The number of codes representable with `MAX_CODESIZE` bits.
pub const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;

#[cfg(feature = "alloc")]
pub mod table;
#[cfg(feature = "alloc")]
pub mod trie;

#[cfg(feature = "alloc")]
pub use crate::table::{CodeTable, Step};
#[cfg(feature = "alloc")]
pub use crate::trie::{NodeId, Trie};
