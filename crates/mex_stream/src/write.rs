//! Types for building byte buffers
//!

use std::io;

use bon::Builder;
use byteorder::{ByteOrder, LittleEndian};

use crate::{chunk::ChunkWriter, le::LeValue, read::ByteReadView};

/// Bytes reserved by a new [`ByteWriteBuffer`] unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 4096;

/// Options for a [`ByteWriteBuffer`]
#[derive(Debug, Clone, Copy, Builder)]
pub struct WriteBufferOptions {
    /// Number of bytes to reserve up front
    #[builder(default = DEFAULT_CAPACITY)]
    pub initial_capacity: usize,
}

impl Default for WriteBufferOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

macro_rules! impl_write_for_type {
    ($($name:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Append a little-endian `", stringify!($ty), "`")]
            #[inline]
            fn $name(&mut self, value: $ty) {
                self.write_typed(value);
            }
        )*
    };
}

/// Append-only little-endian output.
///
/// Implemented by [`ByteWriteBuffer`] and by [`ChunkWriter`]. A chunk writer only ever appends to its
/// payload, it cannot replace or rewrite the buffer underneath its open header.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: impl AsRef<[u8]>);

    fn write_typed<T: LeValue>(&mut self, value: T);

    /// Append `count` copies of `value`
    fn write_repeated_byte(&mut self, value: u8, count: usize);

    impl_write_for_type! {
        write_u8 => u8;
        write_i8 => i8;
        write_u16 => u16;
        write_i16 => i16;
        write_u32 => u32;
        write_i32 => i32;
        write_u64 => u64;
        write_i64 => i64;
        write_f32 => f32;
        write_f64 => f64;
        write_bool => bool;
    }

    /// Append the bytes followed by a single zero terminator.
    ///
    /// Interior zero bytes are written as-is and will cut the string short when read back.
    fn write_cstring_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.write_bytes(bytes);
        self.write_u8(0);
    }

    fn write_cstring(&mut self, text: impl AsRef<str>) {
        self.write_cstring_bytes(text.as_ref().as_bytes());
    }

    /// Append the whole window of `view`, ignoring its cursor
    fn append_view(&mut self, view: &ByteReadView<'_>) {
        self.write_bytes(view.data());
    }

    fn append_buffer(&mut self, other: &ByteWriteBuffer) {
        self.write_bytes(other.as_bytes());
    }
}

/// A growable little-endian output buffer.
///
/// Writes always append through [`ByteSink`]. Chunks are written through
/// [`ByteWriteBuffer::write_chunk`], which patches the chunk length once the payload is complete.
#[derive(Debug, Clone)]
pub struct ByteWriteBuffer {
    buffer: Vec<u8>,
}

impl ByteWriteBuffer {
    pub fn new() -> Self {
        Self::with_options(WriteBufferOptions::default())
    }

    pub fn with_options(options: WriteBufferOptions) -> Self {
        Self {
            buffer: Vec::with_capacity(options.initial_capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }

    /// Hand the written bytes over to an owning [`ByteReadView`]
    pub fn into_view(self) -> ByteReadView<'static> {
        ByteReadView::from_vec(self.buffer)
    }

    /// Exchange the contents of this buffer with `other`.
    ///
    /// An open [`ChunkWriter`] holds the buffer for its whole scope, so this never runs under a header
    /// that is still waiting for its length.
    pub fn swap_buffer(&mut self, other: &mut Vec<u8>) {
        std::mem::swap(&mut self.buffer, other);
    }

    /// Overwrite 4 already written bytes at `offset`.
    ///
    /// Returns `false` without touching the buffer when the range was never written.
    pub(crate) fn patch_u32(&mut self, offset: usize, value: u32) -> bool {
        let Some(target) = offset
            .checked_add(4)
            .and_then(|end| self.buffer.get_mut(offset..end))
        else {
            return false;
        };
        LittleEndian::write_u32(target, value);
        true
    }

    /// Write a chunk with `id` whose payload is produced by `body`.
    ///
    /// The header length is filled in after `body` returns, including when it returns early with an
    /// error.
    ///
    /// ```
    /// use mex_stream::{ByteSink, ByteWriteBuffer};
    ///
    /// let mut buffer = ByteWriteBuffer::new();
    /// buffer.write_chunk(7, |chunk| chunk.write_u16(0xBEEF));
    ///
    /// assert_eq!(buffer.as_bytes(), [7, 0, 0, 0, 2, 0, 0, 0, 0xEF, 0xBE]);
    /// ```
    pub fn write_chunk<R>(&mut self, id: u32, body: impl FnOnce(&mut ChunkWriter<'_>) -> R) -> R {
        let mut chunk = ChunkWriter::new(self, id);
        body(&mut chunk)
    }
}

impl Default for ByteWriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSink for ByteWriteBuffer {
    fn write_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.buffer.extend_from_slice(bytes.as_ref());
    }

    fn write_typed<T: LeValue>(&mut self, value: T) {
        value.encode_le(&mut self.buffer);
    }

    fn write_repeated_byte(&mut self, value: u8, count: usize) {
        self.buffer.resize(self.buffer.len() + count, value);
    }
}

impl From<ByteWriteBuffer> for Vec<u8> {
    fn from(value: ByteWriteBuffer) -> Self {
        value.buffer
    }
}

impl io::Write for ByteWriteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
