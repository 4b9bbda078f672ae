//! Provide the dynamic [`Value`].
//!
//! ## Menu
//!
//! - [`Value`]: a value of any [`Type`], mirroring [`TypeInfo`].
//! - Containers held by composite values:
//!     - [`SequenceValue`]: a growable sequence, possibly nil.
//!     - [`ArrayValue`]: a fixed-size sequence.
//!     - [`MapValue`]: a map keyed by the canonical text of its keys, possibly nil.
//!     - [`PointerValue`]: a nullable indirection.
//!     - [`FuncValue`]: a callable, possibly nil.
//!     - [`RecordValue`]: the field values of a record.
//!
//! `Display` gives the canonical text of a value: `[1 2]`, `map[a:1 b:2]`,
//! `{X:1 Y:2}`, `&5` and `<nil>`. This text is what map keys and path key
//! strings are compared by, and what the decoder reads back.
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod coerce;
mod container;
mod display;

// -----------------------------------------------------------------------------
// Exports

pub use container::{
    ArrayValue, Callable, FuncValue, MapValue, PointerValue, RecordValue, SequenceValue,
};

// -----------------------------------------------------------------------------
// Value

use alloc::string::String;

use crate::info::{ScalarKind, Type, TypeKind};

/// A value of some [`Type`].
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    /// An error, `None` means no error.
    Error(Option<String>),
    Sequence(SequenceValue),
    Array(ArrayValue),
    Map(MapValue),
    Pointer(PointerValue),
    Func(FuncValue),
    Record(RecordValue),
}

impl Value {
    /// Returns the scalar kind of a scalar value.
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        Some(match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Char(_) => ScalarKind::Char,
            Self::String(_) => ScalarKind::String,
            Self::Error(_) => ScalarKind::Error,
            _ => return None,
        })
    }

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Sequence(_) => TypeKind::Sequence,
            Self::Array(_) => TypeKind::Array,
            Self::Map(_) => TypeKind::Map,
            Self::Pointer(_) => TypeKind::Pointer,
            Self::Func(_) => TypeKind::Function,
            Self::Record(_) => TypeKind::Record,
            _ => TypeKind::Scalar,
        }
    }

    /// Returns the type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Self::Sequence(seq) => Type::sequence(seq.elem().clone()),
            Self::Array(array) => Type::array(array.elem().clone(), array.len()),
            Self::Map(map) => Type::map(map.key_type().clone(), map.value_type().clone()),
            Self::Pointer(ptr) => Type::pointer(ptr.target().clone()),
            Self::Func(func) => func.ty().clone(),
            Self::Record(record) => record.ty().clone(),
            scalar => match scalar.scalar_kind() {
                Some(kind) => Type::scalar(kind),
                None => Type::error(),
            },
        }
    }

    /// Returns `true` for nil sequences, maps, pointers, functions and errors.
    ///
    /// A non-nil pointer is nil if what it points to is nil.
    pub fn is_nil(&self) -> bool {
        match self {
            Self::Error(err) => err.is_none(),
            Self::Sequence(seq) => seq.is_nil(),
            Self::Map(map) => map.is_nil(),
            Self::Func(func) => func.is_nil(),
            Self::Pointer(ptr) => match ptr.get() {
                Some(inner) => inner.is_nil(),
                None => true,
            },
            _ => false,
        }
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any integer value widened to `i128`.
    pub const fn as_int(&self) -> Option<i128> {
        Some(match *self {
            Self::I8(n) => n as i128,
            Self::I16(n) => n as i128,
            Self::I32(n) => n as i128,
            Self::I64(n) => n as i128,
            Self::U8(n) => n as i128,
            Self::U16(n) => n as i128,
            Self::U32(n) => n as i128,
            Self::U64(n) => n as i128,
            _ => return None,
        })
    }

    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns any float value widened to `f64`.
    pub const fn as_float(&self) -> Option<f64> {
        match *self {
            Self::F32(n) => Some(n as f64),
            Self::F64(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_sequence(&self) -> Option<&SequenceValue> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_sequence_mut(&mut self) -> Option<&mut SequenceValue> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map_mut(&mut self) -> Option<&mut MapValue> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_pointer(&self) -> Option<&PointerValue> {
        match self {
            Self::Pointer(ptr) => Some(ptr),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_pointer_mut(&mut self) -> Option<&mut PointerValue> {
        match self {
            Self::Pointer(ptr) => Some(ptr),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_func(&self) -> Option<&FuncValue> {
        match self {
            Self::Func(func) => Some(func),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_record_mut(&mut self) -> Option<&mut RecordValue> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// From

macro_rules! impl_from_scalar {
    ($($rust:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$rust> for Value {
                #[inline]
                fn from(value: $rust) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{MapValue, PointerValue, SequenceValue, Value};
    use crate::info::{Type, TypeKind};
    use alloc::boxed::Box;
    use alloc::vec;

    #[test]
    fn nil_equals_empty() {
        let nil = Value::Sequence(SequenceValue::nil(Type::i64()));
        let empty = Value::Sequence(SequenceValue::new(Type::i64(), vec![]));
        assert_eq!(nil, empty);

        let nil = Value::Map(MapValue::nil(Type::string(), Type::i64()));
        let mut empty = nil.clone();
        empty.as_map_mut().unwrap().init();
        assert_eq!(nil, empty);
    }

    #[test]
    fn nil_follows_pointers() {
        let nil_seq = Value::Sequence(SequenceValue::nil(Type::i64()));
        let ptr = Value::Pointer(PointerValue::new(Type::sequence(Type::i64()), nil_seq));
        assert!(ptr.is_nil());
        assert!(Value::Pointer(PointerValue::nil(Type::i64())).is_nil());
        assert!(!Value::Pointer(PointerValue::new(Type::i64(), Value::I64(0))).is_nil());
        assert!(Value::Error(None).is_nil());
        assert!(!Value::I64(0).is_nil());
    }

    #[test]
    fn value_types() {
        assert_eq!(Value::from(3_u16).ty(), Type::u16());
        assert_eq!(Value::from("a").kind(), TypeKind::Scalar);

        let ptr = Value::Pointer(PointerValue::new(Type::i64(), Value::I64(1)));
        assert_eq!(ptr.ty(), Type::pointer(Type::i64()));
        assert_eq!(ptr.as_pointer().and_then(|p| p.get()), Some(&Value::I64(1)));

        let boxed: Box<Value> = Box::new(Value::U8(1));
        assert_eq!(boxed.as_int(), Some(1));
    }
}
