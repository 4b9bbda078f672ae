use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// DecodeError

/// An error returned when text does not decode into the requested type.
///
/// Nested failures are wrapped in [`Element`](DecodeError::Element), so the
/// [`source`](core::error::Error::source) chain leads from the outermost
/// container down to the offending piece of text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("`{text}` is not enclosed in `{start}` and `{end}`")]
    Delimiters {
        text: String,
        start: String,
        end: String,
    },

    #[error("no key and value in `{entry}`")]
    KeyValue { entry: String },

    #[error("cannot parse `{text}` as `{ty}`: {message}")]
    Scalar {
        text: String,
        ty: String,
        message: String,
    },

    #[error("custom parsing of `{text}` as `{ty}` failed: {message}")]
    Custom {
        text: String,
        ty: String,
        message: String,
    },

    #[error("unknown field `{field}` of `{ty}`")]
    UnknownField { field: String, ty: String },

    #[error("decoding `{ty}` is not supported")]
    Unsupported { ty: String },

    #[error("invalid separator pattern")]
    Pattern(#[from] regex::Error),

    #[error("invalid `{ty}` in `{text}`")]
    Element {
        text: String,
        ty: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps `self` as the failure of `text` decoded as an element of type `ty`.
    pub(crate) fn within(self, text: &str, ty: &impl fmt::Display) -> Self {
        Self::Element {
            text: text.into(),
            ty: ty.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error of an [`Element`](DecodeError::Element) chain.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            Self::Element { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
