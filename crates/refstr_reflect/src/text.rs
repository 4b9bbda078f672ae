//! The contract for turning text into a [`Value`] of a given [`Type`].
//!
//! Path writes from text go through this trait, so the parsing policy is
//! chosen by the caller and can be swapped without touching the path engine.

use crate::info::Type;
use crate::value::Value;

/// Decodes text into a value of a requested type.
///
/// # Examples
///
/// ```
/// use refstr_reflect::info::Type;
/// use refstr_reflect::text::DecodeText;
/// use refstr_reflect::value::Value;
///
/// struct Digits;
///
/// impl DecodeText for Digits {
///     type Error = core::num::ParseIntError;
///
///     fn decode_type(&self, _ty: &Type, text: &str) -> Result<Value, Self::Error> {
///         text.parse::<i64>().map(Value::I64)
///     }
/// }
///
/// assert_eq!(Digits.decode_type(&Type::i64(), "12"), Ok(Value::I64(12)));
/// assert!((&Digits).decode_type(&Type::i64(), "x").is_err());
/// ```
pub trait DecodeText {
    type Error: core::error::Error + Send + Sync + 'static;

    /// Returns a value of `ty` parsed from `text`.
    fn decode_type(&self, ty: &Type, text: &str) -> Result<Value, Self::Error>;
}

impl<T: DecodeText + ?Sized> DecodeText for &T {
    type Error = T::Error;

    #[inline]
    fn decode_type(&self, ty: &Type, text: &str) -> Result<Value, Self::Error> {
        (**self).decode_type(ty, text)
    }
}
