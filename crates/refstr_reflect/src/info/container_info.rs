use alloc::boxed::Box;

use crate::info::{ScalarKind, Type, TypeInfo};

// -----------------------------------------------------------------------------
// SequenceInfo

/// A container for growable sequence info, e.g. `Vec<i64>`.
#[derive(Clone, Debug)]
pub struct SequenceInfo {
    elem: Type,
}

impl SequenceInfo {
    #[inline]
    pub const fn new(elem: Type) -> Self {
        Self { elem }
    }

    /// Returns the element type.
    #[inline]
    pub const fn elem(&self) -> &Type {
        &self.elem
    }

    /// Returns `true` if this is a byte sequence, which decodes from raw text.
    #[inline]
    pub fn is_bytes(&self) -> bool {
        matches!(self.elem.info(), TypeInfo::Scalar(ScalarKind::U8))
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// A container for fixed-size sequence info, e.g. `[i64; 2]`.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    elem: Type,
    len: usize,
}

impl ArrayInfo {
    #[inline]
    pub const fn new(elem: Type, len: usize) -> Self {
        Self { elem, len }
    }

    /// Returns the element type.
    #[inline]
    pub const fn elem(&self) -> &Type {
        &self.elem
    }

    /// Returns the fixed length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// A container for map info, e.g. `HashMap<String, i64>`.
#[derive(Clone, Debug)]
pub struct MapInfo {
    key: Type,
    value: Type,
}

impl MapInfo {
    #[inline]
    pub const fn new(key: Type, value: Type) -> Self {
        Self { key, value }
    }

    /// Returns the key type.
    #[inline]
    pub const fn key(&self) -> &Type {
        &self.key
    }

    /// Returns the value type.
    #[inline]
    pub const fn value(&self) -> &Type {
        &self.value
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// A container for pointer info, a nullable indirection to `target`.
#[derive(Clone, Debug)]
pub struct PointerInfo {
    target: Type,
}

impl PointerInfo {
    #[inline]
    pub const fn new(target: Type) -> Self {
        Self { target }
    }

    /// Returns the pointed-to type.
    #[inline]
    pub const fn target(&self) -> &Type {
        &self.target
    }
}

// -----------------------------------------------------------------------------
// FunctionInfo

/// The signature of a function value or method (receiver excluded).
#[derive(Clone, Debug)]
pub struct FunctionInfo {
    params: Box<[Type]>,
    results: Box<[Type]>,
}

impl FunctionInfo {
    pub fn new(
        params: impl IntoIterator<Item = Type>,
        results: impl IntoIterator<Item = Type>,
    ) -> Self {
        Self {
            params: params.into_iter().collect(),
            results: results.into_iter().collect(),
        }
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[inline]
    pub fn results(&self) -> &[Type] {
        &self.results
    }

    /// Takes no argument and returns a single value.
    #[inline]
    pub fn is_getter(&self) -> bool {
        self.params.is_empty() && self.results.len() == 1
    }

    /// Takes one argument and returns nothing or a single `error`.
    pub fn is_setter(&self) -> bool {
        if self.params.len() != 1 {
            return false;
        }
        match &*self.results {
            [] => true,
            [result] => matches!(result.info(), TypeInfo::Scalar(ScalarKind::Error)),
            _ => false,
        }
    }
}
