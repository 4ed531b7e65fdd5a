//! Hashed identifiers and string tables used by *Metro Exodus* style archives.
//!
//! # Identifiers
//!
//! Names inside archives are compared by a 32-bit hash of their text rather than by the text itself.
//! Two flavours exist:
//!
//! | Type            | Hash                          | Extra data                                   |
//! |-----------------|-------------------------------|----------------------------------------------|
//! | [`TypedString`] | CRC-32/ISO-HDLC               | [`StringKind`]: what the name refers to      |
//! | [`HashString`]  | XXHash32, seed `0`            |                                              |
//!
//! The empty string hashes to `0` for both and counts as invalid. Equality, ordering and `Hash` only look
//! at the hash; [`HashedIdentifier::text_eq`] also compares the text.
//!
//! # String Table Format
//!
//! Archives that carry a string table store it as chunk `2`, after the data chunk.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Count                  | 4 bytes: Number of strings that follow                     |
//! | 0x0004         | Strings                | Zero terminated strings, an empty string is a single `0`   |
//!
//! Strings are referred to by their position in the table. [`StringTableWriter`] hands out positions in
//! first-seen order and [`StringTableReader`] resolves them.
//!

pub mod error;
pub mod ident;
#[cfg(feature = "serde")]
mod serde;
pub mod table;

pub use ident::{HashString, HashedIdentifier, StringKind, TypedString};
pub use table::{StringTableReader, StringTableWriter, STRINGS_TABLE_CHUNK_ID};
