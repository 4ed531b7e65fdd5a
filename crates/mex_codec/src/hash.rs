//! CRC32 and XXHash32 digests with the "empty input hashes to zero" convention.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};
use xxhash_rust::xxh32::xxh32;

static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Seed used for every XXHash32 digest in archive data.
pub const XXHASH32_SEED: u32 = 0;

/// CRC32 of a byte span, `0` for empty input.
pub fn crc32(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    CRC32.checksum(data)
}

/// CRC32 of the UTF-8 bytes of `text`, `0` for the empty string.
pub fn crc32_str(text: &str) -> u32 {
    crc32(text.as_bytes())
}

/// XXHash32 (seed 0) of a byte span, `0` for empty input.
pub fn xxhash32(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    xxh32(data, XXHASH32_SEED)
}

/// XXHash32 (seed 0) of the UTF-8 bytes of `text`, `0` for the empty string.
pub fn xxhash32_str(text: &str) -> u32 {
    xxhash32(text.as_bytes())
}

/// Incremental CRC32 over data that arrives in pieces.
///
/// Feeding the same bytes through any number of [`Crc32Stream::update`] calls yields the same value as
/// [`crc32`] over the concatenation.
pub struct Crc32Stream {
    digest: Digest<'static, u32>,
}

impl Crc32Stream {
    pub fn new() -> Self {
        Crc32Stream {
            digest: CRC32.digest(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    pub fn finalize(self) -> u32 {
        self.digest.finalize()
    }
}

impl Default for Crc32Stream {
    fn default() -> Self {
        Self::new()
    }
}
