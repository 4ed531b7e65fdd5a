//! File system boundary
//!
//! Loading files into [`ByteReadView`]s and writing buffers back out. This is the only part of the
//! crate that can fail: an unreadable file is an `Err`, an empty file is an empty view.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    read::ByteReadView,
};

/// Read a whole file into a shared, owning view named after its path
#[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
pub fn read_file(path: impl AsRef<Path>) -> Result<ByteReadView<'static>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!(length = data.len(), "read file");

    Ok(ByteReadView::from_vec(data).with_name(path.to_string_lossy()))
}

/// Read `length` bytes starting at `offset`.
///
/// The window is clamped to the end of the file. An `offset` at or past the end of the file is a
/// [`Error::WindowOutOfRange`].
#[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
pub fn read_file_window(
    path: impl AsRef<Path>,
    offset: u64,
    length: usize,
) -> Result<ByteReadView<'static>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    if offset >= size {
        return Err(Error::WindowOutOfRange {
            path: path.to_path_buf(),
            offset,
            size,
        });
    }

    let available = size - offset;
    let length = u64::try_from(length).unwrap_or(u64::MAX).min(available);

    file.seek(SeekFrom::Start(offset))?;
    let mut data = Vec::new();
    file.take(length).read_to_end(&mut data)?;
    debug!(length = data.len(), "read file window");

    Ok(ByteReadView::from_vec(data).with_name(format!("{}@{offset}", path.display())))
}

/// Create or truncate the file at `path` and write `data` into it.
///
/// Returns the number of bytes written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), length = data.as_ref().len()), err)]
pub fn write_file(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<usize> {
    let data = data.as_ref();
    std::fs::write(path, data)?;
    Ok(data.len())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
pub fn file_size(path: impl AsRef<Path>) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// `false` when the path does not exist or can not be checked
pub fn path_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().try_exists().unwrap_or(false)
}

pub fn path_is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

pub fn path_is_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}
