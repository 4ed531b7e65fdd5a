//! Types for reading from byte buffers
//!

use std::{
    fmt::{self, Debug},
    io,
    sync::Arc,
};

use tracing::trace;

use crate::{chunk::ChunkReader, le::LeValue};

/// How a [`ByteReadView`] holds on to its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The bytes belong to someone else and outlive the view
    Borrowed,
    /// The view is the only owner, only on request through [`ByteReadView::from_boxed`].
    /// Cloning the view copies the bytes.
    Exclusive,
    /// Reference counted, released when the last view referencing it is dropped
    Shared,
}

#[derive(Clone)]
enum Storage<'a> {
    Borrowed(&'a [u8]),
    Exclusive(Box<[u8]>),
    Shared(Arc<[u8]>),
}

impl Storage<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Borrowed(b) => *b,
            Storage::Exclusive(b) => &b[..],
            Storage::Shared(b) => &b[..],
        }
    }
}

/// A bounds-checked read cursor over a window of bytes.
///
/// The view covers `[0, len)` of some backing storage and keeps a cursor in `[0, len]`. Reads either
/// consume exactly the requested number of bytes or leave the view untouched, and reading past the end
/// yields zeroed/default values instead of an error. Windows ([`ByteReadView::window`]) re-base the
/// bounds without copying.
///
/// ```
/// use mex_stream::ByteReadView;
///
/// let data = [0x2A, 0x00, 0x00, 0x00, b'h', b'i', 0x00];
/// let mut view = ByteReadView::new(&data);
///
/// assert_eq!(view.read_u32(), 42);
/// assert_eq!(view.read_cstring(), "hi");
/// assert!(!view.is_good());
///
/// // past the end: default value, cursor unchanged
/// assert_eq!(view.read_u32(), 0);
/// assert_eq!(view.cursor(), 7);
/// ```
#[derive(Clone)]
pub struct ByteReadView<'a> {
    storage: Storage<'a>,
    start: usize,
    length: usize,
    cursor: usize,
    name: Option<Arc<str>>,
}

macro_rules! impl_read_for_type {
    ($($name:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "`, `Default` when out of range.")]
            #[inline]
            pub fn $name(&mut self) -> $ty {
                self.read_typed::<$ty>()
            }
        )*
    };
}

impl<'a> ByteReadView<'a> {
    /// View over borrowed bytes
    pub fn new(data: &'a [u8]) -> ByteReadView<'a> {
        Self::with_storage(Storage::Borrowed(data), data.len())
    }

    /// View that owns `data` through shared storage, so clones do not copy
    pub fn from_vec(data: Vec<u8>) -> ByteReadView<'static> {
        Self::from_shared(Arc::from(data))
    }

    /// View that is the only owner of `data`. Clones and [`ByteReadView::clone_owned`] copy the bytes.
    pub fn from_boxed(data: Box<[u8]>) -> ByteReadView<'static> {
        let length = data.len();
        ByteReadView::with_storage(Storage::Exclusive(data), length)
    }

    /// View sharing reference counted `data`
    pub fn from_shared(data: Arc<[u8]>) -> ByteReadView<'static> {
        let length = data.len();
        ByteReadView::with_storage(Storage::Shared(data), length)
    }

    fn with_storage(storage: Storage<'a>, length: usize) -> ByteReadView<'a> {
        ByteReadView {
            storage,
            start: 0,
            length,
            cursor: 0,
            name: None,
        }
    }

    /// Attach a debug name to this view
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&mut self, name: impl AsRef<str>) {
        self.name = Some(Arc::from(name.as_ref()));
    }

    /// Debug name, empty when none was set
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn ownership(&self) -> Ownership {
        match self.storage {
            Storage::Borrowed(_) => Ownership::Borrowed,
            Storage::Exclusive(_) => Ownership::Exclusive,
            Storage::Shared(_) => Ownership::Shared,
        }
    }

    /// True when there is data left to read.
    ///
    /// An empty view (including the `Default` one) is never good, which makes it usable as the
    /// "invalid stream" sentinel.
    pub fn is_good(&self) -> bool {
        self.length > 0 && !self.is_ended()
    }

    pub fn is_ended(&self) -> bool {
        self.cursor >= self.length
    }

    /// Length of the window in bytes
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn remaining(&self) -> usize {
        self.length - self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the end of the window
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.length);
    }

    /// Advance the cursor, stopping at the end of the window
    pub fn skip(&mut self, count: usize) {
        self.cursor = self.cursor.saturating_add(count).min(self.length);
    }

    /// All bytes of the window, independent of the cursor
    pub fn data(&self) -> &[u8] {
        &self.storage.bytes()[self.start..self.start + self.length]
    }

    /// Bytes between the cursor and the end of the window
    pub fn remaining_data(&self) -> &[u8] {
        &self.data()[self.cursor..]
    }

    fn peek(&self, count: usize) -> Option<&[u8]> {
        let end = self
            .cursor
            .checked_add(count)
            .filter(|end| *end <= self.length)?;
        Some(&self.data()[self.cursor..end])
    }

    fn overrun(&self, requested: usize) {
        trace!(
            name = self.name(),
            cursor = self.cursor,
            length = self.length,
            requested,
            "read past end of view"
        );
    }

    /// Borrow the next `count` bytes without copying and advance past them.
    ///
    /// Returns `None` and leaves the cursor alone when fewer than `count` bytes remain.
    pub fn read_slice(&mut self, count: usize) -> Option<&[u8]> {
        let start = self.cursor;
        let Some(end) = start.checked_add(count).filter(|end| *end <= self.length) else {
            self.overrun(count);
            return None;
        };
        self.cursor = end;
        Some(&self.data()[start..end])
    }

    /// Fill `buffer` from the cursor.
    ///
    /// When the view holds fewer than `buffer.len()` remaining bytes nothing is copied, the cursor stays
    /// where it is and `false` is returned.
    pub fn read_to_buffer(&mut self, buffer: &mut [u8]) -> bool {
        let Some(source) = self.peek(buffer.len()) else {
            self.overrun(buffer.len());
            return false;
        };
        buffer.copy_from_slice(source);
        self.cursor += buffer.len();
        true
    }

    /// Copy out `count` bytes, or `count` zero bytes when the view is too short.
    pub fn read_exact(&mut self, count: usize) -> Vec<u8> {
        let mut result = vec![0u8; count];
        self.read_to_buffer(&mut result);
        result
    }

    /// Read a little-endian value, or `T::default()` when it does not fit.
    pub fn read_typed<T: LeValue>(&mut self) -> T {
        match self.peek(T::SIZE).and_then(T::decode_le) {
            Some(value) => {
                self.cursor += T::SIZE;
                value
            }
            None => {
                self.overrun(T::SIZE);
                T::default()
            }
        }
    }

    impl_read_for_type! {
        read_u8 => u8;
        read_i8 => i8;
        read_u16 => u16;
        read_i16 => i16;
        read_u32 => u32;
        read_i32 => i32;
        read_u64 => u64;
        read_i64 => i64;
        read_f32 => f32;
        read_f64 => f64;
        read_bool => bool;
    }

    /// Read bytes up to the next zero byte, or to the end of the window when there is none.
    ///
    /// The cursor ends up past the terminator, or at the end of the window.
    pub fn read_cstring_bytes(&mut self) -> &[u8] {
        let start = self.cursor;
        let rest = self.remaining_data();
        let (end, consumed) = match rest.iter().position(|b| *b == 0) {
            Some(terminator) => (start + terminator, terminator + 1),
            None => (self.length, rest.len()),
        };
        self.cursor += consumed;
        &self.data()[start..end]
    }

    /// [`ByteReadView::read_cstring_bytes`] decoded as (lossy) UTF-8
    pub fn read_cstring(&mut self) -> String {
        String::from_utf8_lossy(self.read_cstring_bytes()).into_owned()
    }

    /// Re-based sub-view of `[offset, offset + length)`, clamped to this window.
    ///
    /// The result starts with its cursor at `0` and never reaches outside of this view. Asking for a
    /// range past the end yields an empty window.
    pub fn window(&self, offset: usize, length: usize) -> ByteReadView<'_> {
        let offset = offset.min(self.length);
        let length = length.min(self.length - offset);

        let mut result = self.reborrow();
        result.start = self.start + offset;
        result.length = length;
        result.cursor = 0;
        result.name = None;
        result
    }

    /// [`ByteReadView::window`] starting at the cursor
    pub fn window_from_cursor(&self, length: usize) -> ByteReadView<'_> {
        self.window(self.cursor, length)
    }

    /// Same window and cursor, borrowing from this view.
    ///
    /// Shared storage stays shared, exclusively owned storage is borrowed.
    pub fn reborrow(&self) -> ByteReadView<'_> {
        let storage = match &self.storage {
            Storage::Borrowed(b) => Storage::Borrowed(*b),
            Storage::Exclusive(b) => Storage::Borrowed(&b[..]),
            Storage::Shared(b) => Storage::Shared(Arc::clone(b)),
        };

        ByteReadView {
            storage,
            start: self.start,
            length: self.length,
            cursor: self.cursor,
            name: self.name.clone(),
        }
    }

    /// An owning view that no longer depends on the lifetime of this one.
    ///
    /// Shared storage is shared (no copy). Borrowed or exclusively owned bytes of the window are copied
    /// into new shared storage. Cursor and name are kept.
    pub fn clone_owned(&self) -> ByteReadView<'static> {
        let (storage, start) = match &self.storage {
            Storage::Shared(b) => (b.clone(), self.start),
            _ => (Arc::from(self.data()), 0),
        };

        ByteReadView {
            storage: Storage::Shared(storage),
            start,
            length: self.length,
            cursor: self.cursor,
            name: self.name.clone(),
        }
    }

    /// Enumerate the chunks between the cursor and the end of this view
    pub fn chunks(&self) -> ChunkReader<'_> {
        ChunkReader::new(self.reborrow())
    }
}

impl Default for ByteReadView<'_> {
    fn default() -> Self {
        ByteReadView::new(&[])
    }
}

impl<'a> From<&'a [u8]> for ByteReadView<'a> {
    fn from(value: &'a [u8]) -> Self {
        ByteReadView::new(value)
    }
}

impl From<Vec<u8>> for ByteReadView<'static> {
    fn from(value: Vec<u8>) -> Self {
        ByteReadView::from_vec(value)
    }
}

impl From<Arc<[u8]>> for ByteReadView<'static> {
    fn from(value: Arc<[u8]>) -> Self {
        ByteReadView::from_shared(value)
    }
}

impl Debug for ByteReadView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ByteReadView")
            .field("name", &self.name())
            .field("ownership", &self.ownership())
            .field("length", &self.length)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Partial reads follow [`std::io::Read`] rules, unlike the all-or-nothing typed reads.
impl io::Read for ByteReadView<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.remaining_data()[..count]);
        self.cursor += count;
        Ok(count)
    }
}

#[cfg(test)]
mod test {
    use std::{io::Read, sync::Arc};

    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{ByteReadView, Ownership};

    #[rustfmt::skip]
    const SAMPLE: [u8; 16] = [
        0x01, 0x00, 0x00, 0x00,  // u32
        0xFF, 0xFF,              // i16
        b'a', b'b', 0x00,        // cstring
        0x01,                    // bool
        0x00, 0x00, 0x80, 0x3F,  // f32
        0xAA, 0xBB,              // trailing
    ];

    #[test]
    fn default_view_is_not_good() {
        let view = ByteReadView::default();
        assert!(!view.is_good());
        assert!(view.is_empty());
        assert_eq!(view.remaining(), 0);
    }

    #[test]
    fn read_sequence() {
        let mut view = ByteReadView::new(&SAMPLE);
        assert!(view.is_good());

        assert_eq!(view.read_u32(), 1);
        assert_eq!(view.read_i16(), -1);
        assert_eq!(view.read_cstring(), "ab");
        assert!(view.read_bool());
        assert_eq!(view.read_f32(), 1.0);
        assert_eq!(view.remaining(), 2);
        assert_eq!(view.remaining_data(), &[0xAA, 0xBB]);
    }

    #[traced_test]
    #[test]
    fn read_past_end_is_noop() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.set_cursor(14);

        assert_eq!(view.read_u32(), 0);
        assert_eq!(view.cursor(), 14);

        assert_eq!(view.read_exact(3), vec![0, 0, 0]);
        assert_eq!(view.cursor(), 14);

        let mut buffer = [0x55u8; 4];
        assert!(!view.read_to_buffer(&mut buffer));
        assert_eq!(buffer, [0x55; 4]);

        assert_eq!(view.read_u16(), 0xBBAA);
        assert!(view.is_ended());
        assert!(logs_contain("read past end of view"));
    }

    #[test]
    fn read_exact_copies() {
        let mut view = ByteReadView::new(&SAMPLE);
        assert_eq!(view.read_exact(4), vec![0x01, 0x00, 0x00, 0x00]);
        assert_eq!(view.cursor(), 4);
        assert_eq!(view.read_exact(0), Vec::<u8>::new());
        assert_eq!(view.cursor(), 4);
    }

    #[test]
    fn read_slice_borrows() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.skip(14);
        assert_eq!(view.read_slice(2), Some(&[0xAA, 0xBB][..]));
        assert_eq!(view.read_slice(1), None);
        assert_eq!(view.cursor(), 16);
    }

    #[test]
    fn cstring_without_terminator() {
        let data = *b"abc";
        let mut view = ByteReadView::new(&data);
        assert_eq!(view.read_cstring(), "abc");
        assert_eq!(view.cursor(), 3);
        assert_eq!(view.read_cstring(), "");
        assert_eq!(view.cursor(), 3);
    }

    #[test]
    fn cstring_empty() {
        let data = [0x00, b'x', 0x00];
        let mut view = ByteReadView::new(&data);
        assert_eq!(view.read_cstring(), "");
        assert_eq!(view.cursor(), 1);
        assert_eq!(view.read_cstring_bytes(), b"x");
        assert_eq!(view.cursor(), 3);
    }

    #[test]
    fn skip_and_set_cursor_clamp() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.skip(10);
        assert_eq!(view.cursor(), 10);
        view.skip(usize::MAX);
        assert_eq!(view.cursor(), 16);

        view.set_cursor(100);
        assert_eq!(view.cursor(), 16);
        view.set_cursor(3);
        assert_eq!(view.cursor(), 3);
    }

    #[test]
    fn window_rebases() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.skip(5);

        let mut window = view.window(6, 3);
        assert_eq!(window.len(), 3);
        assert_eq!(window.cursor(), 0);
        assert_eq!(window.read_cstring(), "ab");

        // parent untouched
        assert_eq!(view.cursor(), 5);
    }

    #[test]
    fn window_is_clamped() {
        let view = ByteReadView::new(&SAMPLE);

        assert_eq!(view.window(14, 100).data(), &[0xAA, 0xBB]);
        assert_eq!(view.window(16, 4).len(), 0);
        assert_eq!(view.window(1000, 4).len(), 0);
        assert_eq!(view.window(usize::MAX, usize::MAX).len(), 0);
        assert_eq!(view.window(0, usize::MAX).len(), 16);
    }

    #[test]
    fn nested_windows_stay_inside_parent() {
        let view = ByteReadView::new(&SAMPLE);
        let outer = view.window(4, 8);
        let inner = outer.window(6, 8);

        assert_eq!(inner.len(), 2);
        assert_eq!(inner.data(), &SAMPLE[10..12]);
    }

    #[test]
    fn window_from_cursor() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.skip(6);
        assert_eq!(view.window_from_cursor(2).data(), b"ab");
    }

    #[test]
    fn ownership_variants() {
        let borrowed = ByteReadView::new(&SAMPLE);
        assert_eq!(borrowed.ownership(), Ownership::Borrowed);

        let owned = ByteReadView::from_vec(SAMPLE.to_vec());
        assert_eq!(owned.ownership(), Ownership::Shared);
        assert_eq!(owned.window(0, 4).ownership(), Ownership::Shared);

        let exclusive = ByteReadView::from_boxed(Box::from(&SAMPLE[..]));
        assert_eq!(exclusive.ownership(), Ownership::Exclusive);
        assert_eq!(exclusive.window(0, 4).ownership(), Ownership::Borrowed);

        let shared = ByteReadView::from_shared(Arc::from(&SAMPLE[..]));
        assert_eq!(shared.ownership(), Ownership::Shared);
        assert_eq!(shared.window(0, 4).ownership(), Ownership::Shared);
    }

    #[test]
    fn clone_owned_copies_borrowed() {
        let data = SAMPLE.to_vec();
        let owned = {
            let mut view = ByteReadView::new(&data).with_name("sample");
            view.skip(2);
            view.window(4, 6).clone_owned()
        };
        drop(data);

        assert_eq!(owned.ownership(), Ownership::Shared);
        assert_eq!(owned.data(), &SAMPLE[4..10]);
        assert_eq!(owned.cursor(), 0);
    }

    #[test]
    fn clone_owned_shares_shared() {
        let storage: Arc<[u8]> = Arc::from(&SAMPLE[..]);
        let mut view = ByteReadView::from_shared(storage.clone()).with_name("shared");
        view.skip(3);

        let owned = view.clone_owned();
        assert_eq!(Arc::strong_count(&storage), 3);
        assert_eq!(owned.cursor(), 3);
        assert_eq!(owned.name(), "shared");

        drop(owned);
        drop(view);
        assert_eq!(Arc::strong_count(&storage), 1);
    }

    #[test]
    fn clone_owned_shares_owned_vec() {
        let mut view = ByteReadView::from_vec(SAMPLE.to_vec()).with_name("owned");
        view.skip(5);

        let owned = view.clone_owned();
        assert_eq!(owned.ownership(), Ownership::Shared);
        assert_eq!(owned.data().as_ptr(), view.data().as_ptr());
        assert_eq!(owned.cursor(), 5);
        assert_eq!(owned.name(), "owned");

        let window = view.window(2, 4).clone_owned();
        assert_eq!(window.data().as_ptr(), view.data()[2..].as_ptr());
        assert_eq!(window.data(), &SAMPLE[2..6]);

        let copy = view.clone();
        assert_eq!(copy.data().as_ptr(), view.data().as_ptr());
    }

    #[test]
    fn clone_owned_copies_exclusive() {
        let mut view = ByteReadView::from_boxed(Box::from(&SAMPLE[..])).with_name("boxed");
        view.skip(1);

        let owned = view.clone_owned();
        assert_eq!(owned.ownership(), Ownership::Shared);
        assert_ne!(owned.data().as_ptr(), view.data().as_ptr());
        assert_eq!(owned.data(), view.data());
        assert_eq!(owned.cursor(), 1);
        assert_eq!(owned.name(), "boxed");
    }

    #[test]
    fn clone_of_exclusive_is_independent() {
        let view = ByteReadView::from_boxed(Box::from([1u8, 2, 3]));
        let copy = view.clone();
        assert_eq!(copy.ownership(), Ownership::Exclusive);
        assert_ne!(view.data().as_ptr(), copy.data().as_ptr());
        assert_eq!(view.data(), copy.data());
    }

    #[test]
    fn names() {
        let mut view = ByteReadView::new(&SAMPLE);
        assert_eq!(view.name(), "");
        view.set_name("content/models/ak74.model");
        assert_eq!(view.name(), "content/models/ak74.model");
        assert_eq!(view.window(0, 1).name(), "");
    }

    #[test]
    fn io_read_is_partial() {
        let mut view = ByteReadView::new(&SAMPLE);
        view.skip(12);

        let mut buffer = Vec::new();
        assert_eq!(view.read_to_end(&mut buffer).unwrap(), 4);
        assert_eq!(buffer, [0x80, 0x3F, 0xAA, 0xBB]);
        assert!(view.is_ended());
    }
}
