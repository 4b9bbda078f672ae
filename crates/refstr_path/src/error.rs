use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// PathError

/// An error returned when reading or writing through a [`Path`](crate::Path).
///
/// An unknown key is not an error: [`Path::next`](crate::Path::next) returns
/// `None` instead. [`NoSuchPath`](PathError::NoSuchPath) is what callers get
/// when they ask for a whole key list at once.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PathError {
    #[error("no such path at key `{key}`")]
    NoSuchPath { key: String },

    #[error("node `{key}` is not readable")]
    NotReadable { key: String },

    #[error("node `{key}` is not writable")]
    NotWritable { key: String },

    #[error("node `{key}` read an invalid value")]
    InvalidResult { key: String },

    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    #[error("method `{name}` failed: {message}")]
    Method { name: String, message: String },

    #[error("failed to decode text: {0}")]
    Decode(#[source] Box<dyn core::error::Error + Send + Sync>),
}

impl PathError {
    pub(crate) fn not_readable(key: &str) -> Self {
        Self::NotReadable { key: key.into() }
    }

    pub(crate) fn not_writable(key: &str) -> Self {
        Self::NotWritable { key: key.into() }
    }

    pub(crate) fn invalid_result(key: &str) -> Self {
        Self::InvalidResult { key: key.into() }
    }
}
