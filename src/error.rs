//! Crate-level error type for (de)serialization and file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading or saving pages and objects.
///
/// Precondition violations (adding an attached object to a page, removing a
/// non-member, rotating by a non-multiple of 90) are programmer errors and
/// panic instead of surfacing here.
#[derive(Debug, Error)]
pub enum SchemCoreError {
    /// A malformed header or object record. `offset` is the byte offset of
    /// the failing record within the input buffer.
    #[error("invalid {what} at offset {offset}")]
    Deserialization { what: &'static str, offset: usize },

    /// A file could not be read or written.
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parse failure wrapped with the file it came from.
    #[error("error loading page from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<SchemCoreError>,
    },
}
