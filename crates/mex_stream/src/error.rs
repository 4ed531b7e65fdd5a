//! Error types that can be emitted from this library
//!
//! Only the file boundary in [`crate::fs`] can fail. In-memory reads clamp instead of erroring.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// requested window starts past the end of the file
    #[error("offset {offset} is past the end of {} ({size} bytes)", path.display())]
    WindowOutOfRange {
        path: PathBuf,
        offset: u64,
        size: u64,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
