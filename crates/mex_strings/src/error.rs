//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`mex_stream::error::Error`]
    #[error(transparent)]
    StreamError(#[from] mex_stream::error::Error),

    /// Numeric string kind outside of the known range
    #[error("Unknown string kind {0}")]
    UnknownStringKind(u32),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
