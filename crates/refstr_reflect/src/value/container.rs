use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use refstr_utils::hash::HashMap;

use crate::info::{RecordInfo, Type};
use crate::value::Value;

// -----------------------------------------------------------------------------
// SequenceValue

/// A growable sequence. `None` items means a nil sequence.
#[derive(Clone, Debug)]
pub struct SequenceValue {
    elem: Type,
    items: Option<Vec<Value>>,
}

impl SequenceValue {
    #[inline]
    pub const fn nil(elem: Type) -> Self {
        Self { elem, items: None }
    }

    #[inline]
    pub const fn new(elem: Type, items: Vec<Value>) -> Self {
        Self {
            elem,
            items: Some(items),
        }
    }

    #[inline]
    pub const fn elem(&self) -> &Type {
        &self.elem
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.items.is_none()
    }

    /// Replaces a nil sequence with an empty one.
    #[inline]
    pub fn init(&mut self) {
        self.items.get_or_insert_with(Vec::new);
    }

    /// Returns the items, empty when nil.
    #[inline]
    pub fn items(&self) -> &[Value] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Returns the items for mutation, initializing a nil sequence.
    #[inline]
    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        self.items.get_or_insert_with(Vec::new)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.as_ref()?.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.as_mut()?.get_mut(index)
    }

    /// Appends zero elements until `index` exists, returning that slot.
    ///
    /// Growth is not bounded: a far index allocates every slot before it.
    pub fn grow_to(&mut self, index: usize) -> &mut Value {
        let elem = self.elem.clone();
        let items = self.items.get_or_insert_with(Vec::new);
        while items.len() <= index {
            items.push(elem.zero());
        }
        &mut items[index]
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.items_mut().push(value);
    }
}

impl PartialEq for SequenceValue {
    fn eq(&self, other: &Self) -> bool {
        self.elem == other.elem && self.items() == other.items()
    }
}

// -----------------------------------------------------------------------------
// ArrayValue

/// A fixed-size sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    elem: Type,
    items: Box<[Value]>,
}

impl ArrayValue {
    #[inline]
    pub fn new(elem: Type, items: Vec<Value>) -> Self {
        Self {
            elem,
            items: items.into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn elem(&self) -> &Type {
        &self.elem
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn items_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }
}

// -----------------------------------------------------------------------------
// MapValue

/// A map keyed by the canonical text of its keys. `None` entries means a nil map.
///
/// Reading an entry hands out a reference into the table, but the path
/// engine treats entries as copies: a modified entry must be inserted again.
#[derive(Clone, Debug)]
pub struct MapValue {
    key: Type,
    value: Type,
    entries: Option<HashMap<String, (Value, Value)>>,
}

impl MapValue {
    #[inline]
    pub const fn nil(key: Type, value: Type) -> Self {
        Self {
            key,
            value,
            entries: None,
        }
    }

    /// Creates an initialized map holding `entries`.
    pub fn new(key: Type, value: Type, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut map = Self::nil(key, value);
        map.init();
        for (k, v) in entries {
            map.insert(k, v);
        }
        map
    }

    #[inline]
    pub const fn key_type(&self) -> &Type {
        &self.key
    }

    #[inline]
    pub const fn value_type(&self) -> &Type {
        &self.value
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    /// Replaces a nil map with an empty one.
    #[inline]
    pub fn init(&mut self) {
        self.entries.get_or_insert_with(HashMap::default);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.get_by_text(&key.to_string())
    }

    /// Returns the entry whose key has the canonical text `key`.
    pub fn get_by_text(&self, key: &str) -> Option<&Value> {
        self.entries.as_ref()?.get(key).map(|(_, v)| v)
    }

    /// Inserts an entry, initializing a nil map.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let text = key.to_string();
        let entries = self.entries.get_or_insert_with(HashMap::default);
        entries.insert(text, (key, value)).map(|(_, old)| old)
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let entries = self.entries.as_mut()?;
        entries.remove(key.to_string().as_str()).map(|(_, v)| v)
    }

    /// Iterates entries in an unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries
            .iter()
            .flat_map(|entries| entries.values())
            .map(|(k, v)| (k, v))
    }

    /// Returns the keys in canonical order: numbers by value, others by text.
    pub fn sorted_keys(&self) -> Vec<&Value> {
        let mut keys: Vec<(&str, &Value)> = match &self.entries {
            Some(entries) => entries.iter().map(|(text, (k, _))| (text.as_str(), k)).collect(),
            None => Vec::new(),
        };
        keys.sort_by(|(ta, a), (tb, b)| {
            if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
                return x.cmp(&y);
            }
            if let (Some(x), Some(y)) = (a.as_float(), b.as_float()) {
                return x.total_cmp(&y);
            }
            ta.cmp(tb)
        });
        keys.into_iter().map(|(_, k)| k).collect()
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        if self.key != other.key || self.value != other.value || self.len() != other.len() {
            return false;
        }
        let (Some(a), Some(b)) = (&self.entries, &other.entries) else {
            return true;
        };
        a.iter()
            .all(|(text, (_, v))| b.get(text).is_some_and(|(_, w)| v == w))
    }
}

// -----------------------------------------------------------------------------
// PointerValue

/// A nullable indirection to a value of `target` type.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerValue {
    target: Type,
    pub(crate) inner: Option<Box<Value>>,
}

impl PointerValue {
    #[inline]
    pub const fn nil(target: Type) -> Self {
        Self {
            target,
            inner: None,
        }
    }

    #[inline]
    pub fn new(target: Type, value: Value) -> Self {
        Self {
            target,
            inner: Some(Box::new(value)),
        }
    }

    #[inline]
    pub const fn target(&self) -> &Type {
        &self.target
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.inner.is_none()
    }

    #[inline]
    pub fn get(&self) -> Option<&Value> {
        self.inner.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut Value> {
        self.inner.as_deref_mut()
    }

    /// Points at `value`, replacing any previous target.
    #[inline]
    pub fn set(&mut self, value: Value) {
        self.inner = Some(Box::new(value));
    }

    #[inline]
    pub fn take(&mut self) -> Option<Value> {
        self.inner.take().map(|inner| *inner)
    }
}

// -----------------------------------------------------------------------------
// FuncValue

/// The callable held by a [`FuncValue`].
pub type Callable = Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// A function value. `None` call means a nil function.
#[derive(Clone)]
pub struct FuncValue {
    ty: Type,
    call: Option<Callable>,
}

impl FuncValue {
    #[inline]
    pub const fn nil(ty: Type) -> Self {
        Self { ty, call: None }
    }

    #[inline]
    pub fn new(ty: Type, call: impl Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static) -> Self {
        Self {
            ty,
            call: Some(Arc::new(call)),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.call.is_none()
    }

    /// Calls the function, `None` if it is nil.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Option<Vec<Value>> {
        self.call.as_ref().map(|call| call(args))
    }
}

impl PartialEq for FuncValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && match (&self.call, &other.call) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncValue")
            .field("ty", &self.ty)
            .field("nil", &self.call.is_none())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RecordValue

/// The field values of a record, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    ty: Type,
    fields: Box<[Value]>,
}

impl RecordValue {
    /// Creates a record from its field values.
    ///
    /// Prefer [`Type::zero`] followed by field assignment, which always
    /// yields the right number of fields.
    #[inline]
    pub fn new(ty: Type, fields: Vec<Value>) -> Self {
        Self {
            ty,
            fields: fields.into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn info(&self) -> Option<&RecordInfo> {
        self.ty.as_record()
    }

    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    #[inline]
    pub fn fields_mut(&mut self) -> &mut [Value] {
        &mut self.fields
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    #[inline]
    pub fn field_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.fields.get_mut(index)
    }

    /// Returns a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let index = self.info()?.index_of(name)?;
        self.fields.get(index)
    }

    /// Returns a declared field by name for mutation.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.ty.as_record()?.index_of(name)?;
        self.fields.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{MapValue, SequenceValue};
    use crate::info::Type;
    use crate::value::Value;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn sequence_grows_with_zeros() {
        let mut seq = SequenceValue::nil(Type::string());
        *seq.grow_to(2) = Value::from("c");
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0), Some(&Value::from("")));
        assert_eq!(seq.get(2), Some(&Value::from("c")));
    }

    #[test]
    fn map_keyed_by_text() {
        let mut map = MapValue::nil(Type::i64(), Type::bool());
        assert!(map.insert(Value::I64(10), Value::Bool(true)).is_none());
        assert!(map.insert(Value::I64(9), Value::Bool(false)).is_none());
        assert!(!map.is_nil());
        assert_eq!(map.get_by_text("10"), Some(&Value::Bool(true)));
        assert_eq!(map.insert(Value::I64(9), Value::Bool(true)), Some(Value::Bool(false)));

        let keys: Vec<_> = map.sorted_keys().into_iter().cloned().collect();
        assert_eq!(keys, vec![Value::I64(9), Value::I64(10)]);

        assert_eq!(map.remove(&Value::I64(9)), Some(Value::Bool(true)));
        assert_eq!(map.len(), 1);
    }
}
