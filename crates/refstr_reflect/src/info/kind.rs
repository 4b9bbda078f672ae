use core::fmt;

// -----------------------------------------------------------------------------
// TypeKind

/// An enumeration of the structural "kinds" of a [`Type`].
///
/// [`Type`]: crate::info::Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Sequence,
    Array,
    Map,
    Pointer,
    Function,
    Record,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("Scalar"),
            Self::Sequence => f.pad("Sequence"),
            Self::Array => f.pad("Array"),
            Self::Map => f.pad("Map"),
            Self::Pointer => f.pad("Pointer"),
            Self::Function => f.pad("Function"),
            Self::Record => f.pad("Record"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarKind

/// The kind of a scalar type.
///
/// `Error` is the error-shaped scalar: its values are either nil (no error)
/// or carry a message. It is what a fallible setter method returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Error,
}

impl ScalarKind {
    /// Returns the canonical type path of this scalar.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Error => "error",
        }
    }

    /// Returns the bit width of a numeric scalar, `0` otherwise.
    pub const fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 | Self::F32 => 32,
            Self::I64 | Self::U64 | Self::F64 => 64,
            _ => 0,
        }
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns `true` for signed and unsigned integers.
    #[inline]
    pub const fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }
}

impl fmt::Display for ScalarKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
