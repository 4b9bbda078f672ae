//! Leaf helpers over values and types.
//!
//! ## Menu
//!
//! - Dereferencing: [`concrete`], [`concrete_mut`], [`concrete_type`], [`pointer_maybe`].
//! - Nil handling: [`is_nil`], [`init_value`], [`init_type`].
//! - Indirection: [`pointer_to`].
//! - Text: [`key_string`], [`string_equal`].
//! - Signatures: [`is_getter`], [`is_setter`].

use alloc::string::{String, ToString};
use core::fmt::Display;

use crate::info::{Type, TypeInfo};
use crate::value::{PointerValue, Value};

/// Follows non-nil pointers down to the value they point at.
///
/// A nil pointer is returned as is.
pub fn concrete(value: &Value) -> &Value {
    match value {
        Value::Pointer(ptr) => match ptr.get() {
            Some(inner) => concrete(inner),
            None => value,
        },
        other => other,
    }
}

/// Mutable version of [`concrete`].
pub fn concrete_mut(value: &mut Value) -> &mut Value {
    match value {
        Value::Pointer(PointerValue { inner: Some(inner), .. }) => concrete_mut(inner),
        other => other,
    }
}

/// Returns the type behind any number of pointers.
#[inline]
pub fn concrete_type(ty: &Type) -> &Type {
    ty.concrete()
}

/// Returns the innermost pointer of a pointer chain, or the value itself.
///
/// `&&x` yields `&x`, while `&x` and `x` are returned unchanged.
pub fn pointer_maybe(value: &Value) -> &Value {
    match value {
        Value::Pointer(ptr) => match ptr.get() {
            Some(inner @ Value::Pointer(_)) => pointer_maybe(inner),
            _ => value,
        },
        other => other,
    }
}

/// Returns `true` if the value is nil, looking through pointers.
#[inline]
pub fn is_nil(value: &Value) -> bool {
    value.is_nil()
}

/// Initializes a nil sequence, map or pointer in place.
///
/// A nil pointer is pointed at a new zero value of its target type, itself
/// initialized. Returns `false` if the value cannot be made non-nil, as for
/// a nil function or error.
pub fn init_value(value: &mut Value) -> bool {
    match value {
        Value::Sequence(seq) => seq.init(),
        Value::Map(map) => map.init(),
        Value::Pointer(ptr) => match ptr.get_mut() {
            Some(inner) => return init_value(inner),
            None => {
                let mut inner = ptr.target().zero();
                let ok = init_value(&mut inner);
                ptr.set(inner);
                return ok;
            }
        },
        Value::Func(func) => return !func.is_nil(),
        _ => {}
    }
    true
}

/// Returns a new, initialized value of `ty`.
///
/// ```
/// use refstr_reflect::info::Type;
/// use refstr_reflect::utils::init_type;
///
/// let value = init_type(&Type::pointer(Type::map(Type::string(), Type::i64())));
/// assert_eq!(value.to_string(), "&map[]");
/// assert!(!value.is_nil());
/// ```
pub fn init_type(ty: &Type) -> Value {
    let mut value = ty.zero();
    init_value(&mut value);
    value
}

/// Returns a pointer to a copy of `value`.
#[inline]
pub fn pointer_to(value: &Value) -> Value {
    Value::Pointer(PointerValue::new(value.ty(), value.clone()))
}

/// Returns the canonical text of a key.
#[inline]
pub fn key_string(key: &(impl Display + ?Sized)) -> String {
    key.to_string()
}

/// Returns `true` if both display the same canonical text.
#[inline]
pub fn string_equal(a: &(impl Display + ?Sized), b: &(impl Display + ?Sized)) -> bool {
    key_string(a) == key_string(b)
}

/// Returns `true` for a function type taking nothing and returning one value.
pub fn is_getter(ty: &Type) -> bool {
    match ty.info() {
        TypeInfo::Function(info) => info.is_getter(),
        _ => false,
    }
}

/// Returns `true` for a function type taking one value and returning nothing or an `error`.
pub fn is_setter(ty: &Type) -> bool {
    match ty.info() {
        TypeInfo::Function(info) => info.is_setter(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::RecordInfo;
    use crate::value::SequenceValue;

    fn ptr(value: Value) -> Value {
        Value::Pointer(PointerValue::new(value.ty(), value))
    }

    #[test]
    fn dereference() {
        let value = ptr(ptr(Value::I64(4)));
        assert_eq!(concrete(&value), &Value::I64(4));
        assert_eq!(pointer_maybe(&value), &ptr(Value::I64(4)));
        assert_eq!(pointer_maybe(&Value::I64(4)), &Value::I64(4));

        let mut value = value;
        *concrete_mut(&mut value) = Value::I64(5);
        assert_eq!(value.to_string(), "&&5");

        let nil = Value::Pointer(PointerValue::nil(Type::i64()));
        assert_eq!(concrete(&nil), &nil);
    }

    #[test]
    fn init_in_place() {
        let mut seq = Value::Sequence(SequenceValue::nil(Type::i64()));
        assert!(is_nil(&seq));
        assert!(init_value(&mut seq));
        assert!(!is_nil(&seq));

        let point = RecordInfo::builder("InitPoint").field("X", Type::i64()).build();
        let mut value = Type::pointer(Type::pointer(point)).zero();
        assert!(init_value(&mut value));
        assert_eq!(value.to_string(), "&&{X:0}");

        let mut func = Type::getter(Type::i64()).zero();
        assert!(!init_value(&mut func));
    }

    #[test]
    fn text_helpers() {
        assert!(string_equal(&Value::I64(3), "3"));
        assert_eq!(key_string(&Value::from("k")), "k");
        assert_eq!(pointer_to(&Value::I64(1)).to_string(), "&1");
        assert!(is_getter(&Type::getter(Type::i64())));
        assert!(is_setter(&Type::function([Type::i64()], [Type::error()])));
        assert!(!is_setter(&Type::i64()));
    }
}
