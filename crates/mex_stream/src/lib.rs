//! Bounds-checked byte streams and the chunked container format used by *Metro Exodus* style archives.
//!
//! # Chunk Format Documentation
//!
//! Model, level and configuration blobs are stored as a flat sequence of chunks. A chunk payload may itself
//! be a sequence of chunks, so the same reader is applied recursively to walk a tree. There is no overall
//! header, footer or chunk count; the sequence simply runs until the parent runs out of bytes.
//!
//! ## Chunk Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | ID                     | 4 bytes: Chunk identifier, little-endian `u32`             |
//! | 0x0004         | Length                 | 4 bytes: Payload length in bytes, excluding this header    |
//! | 0x0008         | Payload                | (Length) bytes: Chunk content                              |
//!
//! All multi-byte primitives inside payloads are little-endian with no alignment padding. Strings are zero
//! terminated.
//!
//! ## Damaged Input
//!
//! Readers never fail on malformed data. Instead:
//!
//!   - reads past the end of a [`ByteReadView`] return zeroed/default values and leave the cursor alone
//!   - a chunk whose length runs past the end of its parent is clamped to the available bytes
//!   - fewer than 8 trailing bytes end the scan without producing a chunk
//!
//! The last two set [`ChunkReader::is_truncated`]. Only the [`fs`] boundary returns errors.
//!
//! ## Writing
//!
//! [`ByteWriteBuffer`] appends little-endian data through [`ByteSink`]. [`ChunkWriter`] writes a chunk
//! header and fills in the payload length when it is dropped, so nesting writers produces nested chunks
//! with correct lengths.
//!

pub mod chunk;
pub mod error;
pub mod fs;
pub mod le;
pub mod read;
pub mod write;

pub use chunk::{ChunkInfo, ChunkReader, ChunkWriter, CHUNK_HEADER_SIZE};
pub use le::LeValue;
pub use read::{ByteReadView, Ownership};
pub use write::{ByteSink, ByteWriteBuffer, WriteBufferOptions};
