//! Reading and writing the chunked TLV container
//!

use tracing::{instrument, warn};
use winnow::{binary::le_u32, combinator::seq, prelude::*, PResult};

use crate::{
    le::LeValue,
    read::ByteReadView,
    write::{ByteSink, ByteWriteBuffer},
};

/// Size of the `id` + `length` header in front of every chunk payload
pub const CHUNK_HEADER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChunkHeader {
    id: u32,
    length: u32,
}

fn parse_header(input: &mut &[u8]) -> PResult<ChunkHeader> {
    seq!(ChunkHeader {
        id: le_u32,
        length: le_u32,
    })
    .parse_next(input)
}

/// Location of one chunk payload inside the scanned view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkInfo {
    pub id: u32,
    /// Start of the payload, relative to the start of the scanned view
    pub offset: usize,
    /// Payload length after clamping to the available bytes
    pub length: usize,
}

/// Index of the chunks found in a [`ByteReadView`].
///
/// The scan starts at the cursor of the view and runs to its end. The caller's view is never moved.
///
/// ```
/// use mex_stream::{ByteReadView, ChunkReader};
///
/// #[rustfmt::skip]
/// let data = [
///     0x01, 0x00, 0x00, 0x00,  0x02, 0x00, 0x00, 0x00,  0xAA, 0xBB,
///     0x05, 0x00, 0x00, 0x00,  0x00, 0x00, 0x00, 0x00,
/// ];
/// let reader = ChunkReader::new(ByteReadView::new(&data));
///
/// assert_eq!(reader.len(), 2);
/// assert_eq!(reader.by_id(1).unwrap().data(), [0xAA, 0xBB]);
/// assert!(reader.by_id(5).unwrap().is_empty());
/// assert!(reader.by_id(9).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChunkReader<'a> {
    view: ByteReadView<'a>,
    chunks: Vec<ChunkInfo>,
    truncated: bool,
}

impl<'a> ChunkReader<'a> {
    #[instrument(level = "debug", skip_all, fields(name = view.name(), cursor = view.cursor(), length = view.len()))]
    pub fn new(view: ByteReadView<'a>) -> ChunkReader<'a> {
        let data = view.remaining_data();
        let base = view.cursor();

        let mut input = data;
        let mut chunks = Vec::new();
        let mut truncated = false;

        while !input.is_empty() {
            if input.len() < CHUNK_HEADER_SIZE {
                warn!(
                    offset = base + data.len() - input.len(),
                    trailing = input.len(),
                    "partial chunk header, stopping scan"
                );
                truncated = true;
                break;
            }

            let Ok(header) = parse_header(&mut input) else {
                truncated = true;
                break;
            };

            let offset = base + data.len() - input.len();
            let declared = usize::try_from(header.length).unwrap_or(usize::MAX);
            let length = declared.min(input.len());
            if length < declared {
                warn!(
                    id = header.id,
                    offset,
                    declared,
                    available = length,
                    "chunk runs past the end of its parent, clamping"
                );
                truncated = true;
            }

            chunks.push(ChunkInfo {
                id: header.id,
                offset,
                length,
            });
            input = &input[length..];
        }

        ChunkReader {
            view,
            chunks,
            truncated,
        }
    }

    /// Number of chunks found
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// True when a header was cut off or a declared length had to be clamped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// All chunk records in the order they appear
    pub fn infos(&self) -> &[ChunkInfo] {
        &self.chunks
    }

    /// Index of the first chunk with `id`
    pub fn position(&self, id: u32) -> Option<usize> {
        self.chunks.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.position(id).is_some()
    }

    /// Payload of the first chunk with `id`.
    ///
    /// `None` when no chunk has that id. Use `unwrap_or_default()` to get an empty view instead.
    pub fn by_id(&self, id: u32) -> Option<ByteReadView<'_>> {
        self.position(id).and_then(|index| self.by_index(index))
    }

    /// Payload of the chunk at `index`, as a fresh view with its cursor at `0`
    pub fn by_index(&self, index: usize) -> Option<ByteReadView<'_>> {
        self.chunks
            .get(index)
            .map(|info| self.view.window(info.offset, info.length))
    }

    pub fn id_at(&self, index: usize) -> Option<u32> {
        self.chunks.get(index).map(|info| info.id)
    }

    pub fn length_at(&self, index: usize) -> Option<usize> {
        self.chunks.get(index).map(|info| info.length)
    }

    /// Iterate over `(id, payload)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (u32, ByteReadView<'_>)> + '_ {
        self.chunks
            .iter()
            .map(|info| (info.id, self.view.window(info.offset, info.length)))
    }

    /// The scanned view
    pub fn view(&self) -> &ByteReadView<'a> {
        &self.view
    }

    pub fn into_inner(self) -> ByteReadView<'a> {
        self.view
    }
}

/// Scope guard writing one chunk into a [`ByteWriteBuffer`].
///
/// Creating the writer emits the chunk id and a placeholder length. Everything written through the
/// writer's [`ByteSink`] methods becomes the payload. When the writer goes out of scope the
/// placeholder is replaced with the payload length, so nested chunks are counted in their parent.
///
/// ```
/// use mex_stream::{ByteSink, ByteWriteBuffer, ChunkWriter};
///
/// let mut buffer = ByteWriteBuffer::new();
/// {
///     let mut outer = ChunkWriter::new(&mut buffer, 1);
///     let mut inner = outer.nested(2);
///     inner.write_bytes([0xAA, 0xBB, 0xCC]);
/// }
///
/// #[rustfmt::skip]
/// let expected = [
///     0x01, 0x00, 0x00, 0x00,  0x0B, 0x00, 0x00, 0x00,
///     0x02, 0x00, 0x00, 0x00,  0x03, 0x00, 0x00, 0x00,
///     0xAA, 0xBB, 0xCC,
/// ];
/// assert_eq!(buffer.as_bytes(), expected);
/// ```
#[derive(Debug)]
pub struct ChunkWriter<'b> {
    buffer: &'b mut ByteWriteBuffer,
    id: u32,
    header_offset: usize,
}

impl<'b> ChunkWriter<'b> {
    pub fn new(buffer: &'b mut ByteWriteBuffer, id: u32) -> ChunkWriter<'b> {
        let header_offset = buffer.len();
        buffer.write_u32(id);
        buffer.write_u32(0);

        ChunkWriter {
            buffer,
            id,
            header_offset,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Bytes written since the header
    pub fn payload_len(&self) -> usize {
        self.buffer
            .len()
            .saturating_sub(self.header_offset + CHUNK_HEADER_SIZE)
    }

    /// Start a child chunk inside this one
    pub fn nested(&mut self, id: u32) -> ChunkWriter<'_> {
        ChunkWriter::new(&mut *self.buffer, id)
    }

    /// [`ByteWriteBuffer::write_chunk`] for a child of this chunk
    pub fn write_chunk<R>(&mut self, id: u32, body: impl FnOnce(&mut ChunkWriter<'_>) -> R) -> R {
        self.buffer.write_chunk(id, body)
    }

    /// Close the chunk now and return its payload length
    pub fn finish(self) -> usize {
        self.payload_len()
    }

    #[instrument(level = "trace", skip(self), fields(id = self.id, offset = self.header_offset))]
    fn patch_length(&mut self) {
        let payload = self.payload_len();
        let length = u32::try_from(payload).unwrap_or_else(|_| {
            warn!(payload, "chunk payload does not fit in a u32 length, saturating");
            u32::MAX
        });

        if !self.buffer.patch_u32(self.header_offset + 4, length) {
            warn!(
                buffer_len = self.buffer.len(),
                "chunk header is no longer in the buffer, length not written"
            );
        }
    }
}

impl ByteSink for ChunkWriter<'_> {
    fn write_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.buffer.write_bytes(bytes);
    }

    fn write_typed<T: LeValue>(&mut self, value: T) {
        self.buffer.write_typed(value);
    }

    fn write_repeated_byte(&mut self, value: u8, count: usize) {
        self.buffer.write_repeated_byte(value, count);
    }
}

impl Drop for ChunkWriter<'_> {
    fn drop(&mut self) {
        self.patch_length();
    }
}
