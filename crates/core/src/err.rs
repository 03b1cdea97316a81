//! Error types and utilities.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
/// Represents an error that can occur while configuring or running the generator.
pub enum Error {
    /// An I/O error occurred.
    #[error("i/o error {0}")]
    Io(#[from] std::io::Error),

    /// The dictionary file could not be opened or read.
    #[error("unable to read dictionary file {}: {source}", path.display())]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary was readable but contained no words.
    #[error("dictionary contains no words")]
    EmptyDictionary,

    /// The line length argument was neither a positive integer nor a known keyword.
    #[error("bad length arg: {0}")]
    BadLength(String),

    #[error("line length {length} is too small for timestamps like {sample:?}")]
    LineTooShort { length: usize, sample: String },

    #[error("line length {length} exceeds the maximum of {max} bytes")]
    LineTooLong { length: usize, max: usize },

    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),

    #[error("frequency must be a positive number of hz, got {0}")]
    Frequency(f64),
}

/// A specialized [Result] type for this crate's operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
