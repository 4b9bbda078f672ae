//! Text decoding into [`refstr_reflect`] values.
//!
//! ## Menu
//!
//! - [`Decoder`]: the configurable decoder, also a [`DecodeText`].
//! - [`Multi`]: the grammar of sequences, arrays, maps and records.
//! - [`DecodeError`]: why some text did not decode.
//! - [`decode_type`], [`decode_into`], [`parse`], [`convert`]: the same
//!   operations on a shared default decoder.
//!
//! # Examples
//!
//! ```
//! use refstr_reflect::info::Type;
//!
//! let ty = Type::map(Type::string(), Type::sequence(Type::i64()));
//! let value = refstr_decode::decode_type(&ty, "map[a:[1 2] b:[3]]").unwrap();
//!
//! assert_eq!(value.to_string(), "map[a:[1 2] b:[3]]");
//! ```
//!
//! [`DecodeText`]: refstr_reflect::text::DecodeText
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

use alloc::string::ToString;
use std::sync::LazyLock;

use refstr_reflect::info::Type;
use refstr_reflect::value::Value;

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod error;
mod multi;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::{Decoder, FloatFn, IntFn, ParseFn, UintFn};
pub use error::DecodeError;
pub use multi::{Multi, split_top_level};

// -----------------------------------------------------------------------------
// Default decoder

static DEFAULT: LazyLock<Result<Decoder, regex::Error>> = LazyLock::new(|| {
    Decoder::new().map_err(|err| match err {
        DecodeError::Pattern(err) => err,
        other => regex::Error::Syntax(other.to_string()),
    })
});

/// Returns the shared decoder used by the free functions of this crate.
///
/// It is never modified. To change the grammar, build a [`Decoder`] and
/// use its methods instead.
pub fn default_decoder() -> Result<&'static Decoder, DecodeError> {
    DEFAULT.as_ref().map_err(|err| DecodeError::Pattern(err.clone()))
}

/// Decodes `text` as a value of `ty` with the [default decoder](default_decoder).
pub fn decode_type(ty: &Type, text: &str) -> Result<Value, DecodeError> {
    default_decoder()?.parse(text, ty)
}

/// Decodes `text` into `target` with the [default decoder](default_decoder).
pub fn decode_into(target: &mut Value, text: &str) -> Result<(), DecodeError> {
    default_decoder()?.decode_into(target, text)
}

/// Parses `text` as a value of `ty` with the [default decoder](default_decoder).
pub fn parse(text: &str, ty: &Type) -> Result<Value, DecodeError> {
    default_decoder()?.parse(text, ty)
}

/// Converts `value` to `ty` with the [default decoder](default_decoder).
pub fn convert(value: &Value, ty: &Type) -> Result<Value, DecodeError> {
    default_decoder()?.convert(value, ty)
}
