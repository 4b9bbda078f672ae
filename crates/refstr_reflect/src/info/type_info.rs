use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{
    ArrayInfo, FunctionInfo, MapInfo, PointerInfo, RecordInfo, ScalarKind, SequenceInfo, TypeKind,
    Typed,
};
use crate::value::{ArrayValue, FuncValue, MapValue, PointerValue, RecordValue, SequenceValue, Value};

// -----------------------------------------------------------------------------
// TypeInfo

/// The structure of a [`Type`].
#[derive(Clone, Debug)]
pub enum TypeInfo {
    Scalar(ScalarKind),
    Sequence(SequenceInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Pointer(PointerInfo),
    Function(FunctionInfo),
    Record(RecordInfo),
}

impl TypeInfo {
    /// Returns the structural kind.
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Sequence(_) => TypeKind::Sequence,
            Self::Array(_) => TypeKind::Array,
            Self::Map(_) => TypeKind::Map,
            Self::Pointer(_) => TypeKind::Pointer,
            Self::Function(_) => TypeKind::Function,
            Self::Record(_) => TypeKind::Record,
        }
    }

    /// Renders the type path, or with `unique` set, the identity that also
    /// tells apart records sharing a name.
    fn type_path(&self, unique: bool) -> String {
        match self {
            Self::Scalar(kind) => String::from(kind.name()),
            Self::Sequence(info) => format!("Vec<{}>", info.elem().rendered(unique)),
            Self::Array(info) => format!("[{}; {}]", info.elem().rendered(unique), info.len()),
            Self::Map(info) => {
                let (key, value) = (info.key().rendered(unique), info.value().rendered(unique));
                format!("HashMap<{key}, {value}>")
            }
            Self::Pointer(info) => format!("Option<Box<{}>>", info.target().rendered(unique)),
            Self::Function(info) => {
                let params = join(info.params(), unique);
                match info.results() {
                    [] => format!("fn({params})"),
                    [single] => format!("fn({params}) -> {}", single.rendered(unique)),
                    many => format!("fn({params}) -> ({})", join(many, unique)),
                }
            }
            Self::Record(info) if unique => format!("{}#{}", info.name(), info.id()),
            Self::Record(info) => String::from(info.name()),
        }
    }
}

fn join(types: &[Type], unique: bool) -> String {
    let mut out = String::new();
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(ty.rendered(unique));
    }
    out
}

// -----------------------------------------------------------------------------
// Type

struct TypeCell {
    path: Box<str>,
    identity: Box<str>,
    info: TypeInfo,
}

/// A cheap, clonable handle to an immutable [`TypeInfo`].
///
/// A type built twice from the same parts is the same type. Records are
/// the exception: every [`RecordBuilder::build`] makes a new record, even
/// when it reuses a name, and types built from different records differ.
///
/// [`RecordBuilder::build`]: crate::info::RecordBuilder::build
///
/// # Examples
///
/// ```
/// use refstr_reflect::info::{Type, TypeKind};
///
/// let ty = Type::map(Type::string(), Type::sequence(Type::i64()));
/// assert_eq!(ty.path(), "HashMap<String, Vec<i64>>");
/// assert_eq!(ty.kind(), TypeKind::Map);
/// assert_eq!(ty, Type::map(Type::string(), Type::sequence(Type::i64())));
/// ```
#[derive(Clone)]
pub struct Type(Arc<TypeCell>);

impl Type {
    /// Creates a type from its structure.
    pub fn new(info: TypeInfo) -> Self {
        let path = info.type_path(false).into_boxed_str();
        let identity = info.type_path(true).into_boxed_str();
        Self(Arc::new(TypeCell { path, identity, info }))
    }

    #[inline]
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(TypeInfo::Scalar(kind))
    }

    #[inline]
    pub fn bool() -> Self {
        Self::scalar(ScalarKind::Bool)
    }

    #[inline]
    pub fn i8() -> Self {
        Self::scalar(ScalarKind::I8)
    }

    #[inline]
    pub fn i16() -> Self {
        Self::scalar(ScalarKind::I16)
    }

    #[inline]
    pub fn i32() -> Self {
        Self::scalar(ScalarKind::I32)
    }

    #[inline]
    pub fn i64() -> Self {
        Self::scalar(ScalarKind::I64)
    }

    #[inline]
    pub fn u8() -> Self {
        Self::scalar(ScalarKind::U8)
    }

    #[inline]
    pub fn u16() -> Self {
        Self::scalar(ScalarKind::U16)
    }

    #[inline]
    pub fn u32() -> Self {
        Self::scalar(ScalarKind::U32)
    }

    #[inline]
    pub fn u64() -> Self {
        Self::scalar(ScalarKind::U64)
    }

    #[inline]
    pub fn f32() -> Self {
        Self::scalar(ScalarKind::F32)
    }

    #[inline]
    pub fn f64() -> Self {
        Self::scalar(ScalarKind::F64)
    }

    #[inline]
    pub fn char() -> Self {
        Self::scalar(ScalarKind::Char)
    }

    #[inline]
    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    /// The error-shaped scalar returned by fallible setters.
    #[inline]
    pub fn error() -> Self {
        Self::scalar(ScalarKind::Error)
    }

    #[inline]
    pub fn sequence(elem: Type) -> Self {
        Self::new(TypeInfo::Sequence(SequenceInfo::new(elem)))
    }

    #[inline]
    pub fn array(elem: Type, len: usize) -> Self {
        Self::new(TypeInfo::Array(ArrayInfo::new(elem, len)))
    }

    #[inline]
    pub fn map(key: Type, value: Type) -> Self {
        Self::new(TypeInfo::Map(MapInfo::new(key, value)))
    }

    #[inline]
    pub fn pointer(target: Type) -> Self {
        Self::new(TypeInfo::Pointer(PointerInfo::new(target)))
    }

    /// A function type taking `params` and returning `results`.
    pub fn function(
        params: impl IntoIterator<Item = Type>,
        results: impl IntoIterator<Item = Type>,
    ) -> Self {
        Self::new(TypeInfo::Function(FunctionInfo::new(params, results)))
    }

    /// A function type taking nothing and returning one `result`.
    #[inline]
    pub fn getter(result: Type) -> Self {
        Self::function([], [result])
    }

    #[inline]
    pub fn record(info: RecordInfo) -> Self {
        Self::new(TypeInfo::Record(info))
    }

    /// Returns the [`Type`] of a Rust type.
    ///
    /// ```
    /// use refstr_reflect::info::Type;
    ///
    /// assert_eq!(Type::of::<Vec<[u8; 4]>>().path(), "Vec<[u8; 4]>");
    /// ```
    #[inline]
    pub fn of<T: Typed>() -> Self {
        T::ty()
    }

    #[inline]
    pub fn info(&self) -> &TypeInfo {
        &self.0.info
    }

    /// Returns the canonical type path.
    ///
    /// Records sharing a name share a path but are still different types.
    #[inline]
    pub fn path(&self) -> &str {
        &self.0.path
    }

    fn rendered(&self, unique: bool) -> &str {
        if unique { &self.0.identity } else { &self.0.path }
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.0.info.kind()
    }

    /// Returns the element type of a sequence, array, map or pointer.
    pub fn elem(&self) -> Option<&Type> {
        match self.info() {
            TypeInfo::Sequence(info) => Some(info.elem()),
            TypeInfo::Array(info) => Some(info.elem()),
            TypeInfo::Map(info) => Some(info.value()),
            TypeInfo::Pointer(info) => Some(info.target()),
            _ => None,
        }
    }

    /// Returns the key type of a map.
    pub fn key(&self) -> Option<&Type> {
        match self.info() {
            TypeInfo::Map(info) => Some(info.key()),
            _ => None,
        }
    }

    /// Returns the type behind any number of pointers.
    pub fn concrete(&self) -> &Type {
        match self.info() {
            TypeInfo::Pointer(info) => info.target().concrete(),
            _ => self,
        }
    }

    /// Returns the scalar kind if this is a scalar type.
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self.info() {
            TypeInfo::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordInfo> {
        match self.info() {
            TypeInfo::Record(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionInfo> {
        match self.info() {
            TypeInfo::Function(info) => Some(info),
            _ => None,
        }
    }

    /// Returns the zero value of this type.
    ///
    /// Sequences, maps, pointers and functions are nil, arrays and records
    /// hold the zero value of each element.
    pub fn zero(&self) -> Value {
        match self.info() {
            TypeInfo::Scalar(kind) => match kind {
                ScalarKind::Bool => Value::Bool(false),
                ScalarKind::I8 => Value::I8(0),
                ScalarKind::I16 => Value::I16(0),
                ScalarKind::I32 => Value::I32(0),
                ScalarKind::I64 => Value::I64(0),
                ScalarKind::U8 => Value::U8(0),
                ScalarKind::U16 => Value::U16(0),
                ScalarKind::U32 => Value::U32(0),
                ScalarKind::U64 => Value::U64(0),
                ScalarKind::F32 => Value::F32(0.0),
                ScalarKind::F64 => Value::F64(0.0),
                ScalarKind::Char => Value::Char('\0'),
                ScalarKind::String => Value::String(String::new()),
                ScalarKind::Error => Value::Error(None),
            },
            TypeInfo::Sequence(info) => Value::Sequence(SequenceValue::nil(info.elem().clone())),
            TypeInfo::Array(info) => {
                let items: Vec<Value> = (0..info.len()).map(|_| info.elem().zero()).collect();
                Value::Array(ArrayValue::new(info.elem().clone(), items))
            }
            TypeInfo::Map(info) => {
                Value::Map(MapValue::nil(info.key().clone(), info.value().clone()))
            }
            TypeInfo::Pointer(info) => Value::Pointer(PointerValue::nil(info.target().clone())),
            TypeInfo::Function(_) => Value::Func(FuncValue::nil(self.clone())),
            TypeInfo::Record(info) => {
                let fields = info.fields().iter().map(|field| field.ty().zero());
                Value::Record(RecordValue::new(self.clone(), fields.collect()))
            }
        }
    }

    /// Returns `true` if `value` is a value of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self.info(), value) {
            (TypeInfo::Scalar(kind), value) => value.scalar_kind() == Some(*kind),
            (TypeInfo::Sequence(info), Value::Sequence(seq)) => info.elem() == seq.elem(),
            (TypeInfo::Array(info), Value::Array(array)) => {
                info.elem() == array.elem() && info.len() == array.len()
            }
            (TypeInfo::Map(info), Value::Map(map)) => {
                info.key() == map.key_type() && info.value() == map.value_type()
            }
            (TypeInfo::Pointer(info), Value::Pointer(ptr)) => info.target() == ptr.target(),
            (TypeInfo::Function(_), Value::Func(func)) => self == func.ty(),
            (TypeInfo::Record(_), Value::Record(record)) => self == record.ty(),
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.identity == other.0.identity
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.identity.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.path()).finish()
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}
