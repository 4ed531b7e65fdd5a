//! String tables
//!
//! Archives store repeated names once in a trailing string-table chunk and refer to them by index.
//! [`StringTableWriter`] collects names while an archive is being written, [`StringTableReader`]
//! resolves indices while one is being read.

use std::{borrow::Cow, path::Path};

use derive_more::derive::{Deref, IntoIterator};
use mex_stream::{fs, ByteReadView, ByteSink, ByteWriteBuffer, ChunkReader};
use tracing::{instrument, warn};
use winnow::{
    binary::le_u32,
    combinator::{opt, terminated},
    prelude::*,
    token::{any, take_till},
    PResult,
};

use crate::{
    error::Result,
    ident::{HashString, HashedIdentifier},
};

/// Chunk id the string table is stored under, after the data chunk
pub const STRINGS_TABLE_CHUNK_ID: u32 = 2;

fn parse_count(input: &mut &[u8]) -> PResult<u32> {
    le_u32.parse_next(input)
}

fn parse_string<'s>(input: &mut &'s [u8]) -> PResult<&'s [u8]> {
    terminated(take_till(0.., 0u8), opt(any)).parse_next(input)
}

/// Read side of a string table.
///
/// Strings borrow from the parsed bytes where they are valid UTF-8.
///
/// ```
/// use mex_strings::StringTableReader;
///
/// let blob = b"\x02\x00\x00\x00base\0detail\0";
/// let table = StringTableReader::parse(blob);
///
/// assert_eq!(table.resolve(1), Some("detail"));
/// assert_eq!(table.resolve(2), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTableReader<'a> {
    strings: Vec<Cow<'a, str>>,
}

impl<'a> StringTableReader<'a> {
    /// Parse a `u32` count followed by that many zero terminated strings.
    ///
    /// Parsing stops at the end of `data` if it holds fewer strings than announced.
    pub fn parse(data: &'a [u8]) -> StringTableReader<'a> {
        let mut input = data;
        let Ok(count) = parse_count(&mut input) else {
            warn!(length = data.len(), "string table is missing its count");
            return StringTableReader::default();
        };

        let expected = usize::try_from(count).unwrap_or(usize::MAX);
        let mut strings = Vec::with_capacity(expected.min(input.len()));
        while strings.len() < expected && !input.is_empty() {
            let Ok(bytes) = parse_string(&mut input) else {
                break;
            };
            strings.push(String::from_utf8_lossy(bytes));
        }

        if strings.len() < expected {
            warn!(
                expected,
                found = strings.len(),
                "string table ends before its announced count"
            );
        }

        StringTableReader { strings }
    }

    /// Parse the bytes of `view` from its cursor on
    pub fn from_view(view: &'a ByteReadView<'_>) -> StringTableReader<'a> {
        Self::parse(view.remaining_data())
    }

    /// Resolve the string for `index`, `None` when out of range
    pub fn resolve(&self, index: u32) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        self.strings.get(index).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_ref())
    }

    /// Detach the table from the parsed bytes
    pub fn into_owned(self) -> StringTableReader<'static> {
        StringTableReader {
            strings: self
                .strings
                .into_iter()
                .map(|s| Cow::Owned(s.into_owned()))
                .collect(),
        }
    }
}

impl StringTableReader<'static> {
    /// Parse the string-table chunk of an archive, if it has one
    pub fn from_chunks(chunks: &ChunkReader<'_>) -> Option<StringTableReader<'static>> {
        chunks
            .by_id(STRINGS_TABLE_CHUNK_ID)
            .map(|view| StringTableReader::from_view(&view).into_owned())
    }

    /// Load a file holding a bare string-table blob
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn read_file(path: impl AsRef<Path>) -> Result<StringTableReader<'static>> {
        let view = fs::read_file(path)?;
        Ok(StringTableReader::from_view(&view).into_owned())
    }
}

/// Write side of a string table.
///
/// Strings are identified by their [`HashString`] hash. Interning scans the table linearly, which
/// is fine for the few hundred names a single archive carries but does not scale beyond that.
///
/// ```
/// use mex_strings::StringTableWriter;
///
/// let mut table = StringTableWriter::default();
/// assert_eq!(table.intern("base"), 0);
/// assert_eq!(table.intern("detail"), 1);
/// assert_eq!(table.intern("base"), 0);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct StringTableWriter {
    strings: Vec<HashString>,
}

impl StringTableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name` in the table, adding it at the end when it is not there yet.
    pub fn intern(&mut self, name: impl Into<HashString>) -> u32 {
        let name = name.into();
        let index = match self.strings.iter().position(|s| *s == name) {
            Some(index) => index,
            None => {
                self.strings.push(name);
                self.strings.len() - 1
            }
        };

        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// Append the `u32` count and the zero terminated strings to `buffer`
    pub fn write(&self, buffer: &mut impl ByteSink) {
        buffer.write_u32(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        for s in &self.strings {
            buffer.write_cstring(s.text());
        }
    }

    /// [`StringTableWriter::write`] wrapped in a chunk with `id`
    #[instrument(skip(self, buffer), fields(strings = self.strings.len()))]
    pub fn write_chunk(&self, buffer: &mut ByteWriteBuffer, id: u32) {
        buffer.write_chunk(id, |chunk| self.write(chunk));
    }
}

impl<S: Into<HashString>> FromIterator<S> for StringTableWriter {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut table = StringTableWriter::new();
        for name in iter {
            table.intern(name);
        }
        table
    }
}
