use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::borrow::{Borrow, BorrowMut};
use core::fmt;

use refstr_reflect::text::DecodeText;
use refstr_reflect::value::Value;

use crate::{NodeCache, Nodes, Path, PathError};

/// A [`Path`] paired with the root value it is replayed over.
///
/// `R` is anything that borrows a [`Value`]: an owned value, a shared
/// reference for reading, or a mutable reference for writing.
///
/// # Examples
///
/// ```
/// use refstr_path::Reference;
/// use refstr_reflect::info::Type;
/// use refstr_reflect::value::Value;
///
/// let mut root = Type::map(Type::string(), Type::i64()).zero();
///
/// let mut count = Reference::new(&mut root).next("count").unwrap();
/// count.set(Value::I64(2)).unwrap();
/// assert_eq!(count.get().unwrap().as_ref(), &Value::I64(2));
///
/// assert_eq!(root.to_string(), "map[count:2]");
/// ```
pub struct Reference<R> {
    root: R,
    path: Path,
}

impl<R: Borrow<Value>> Reference<R> {
    /// Creates a reference to `root` itself, typed after its current value.
    pub fn new(root: R) -> Self {
        let path = Path::new(root.borrow().ty());
        Self { root, path }
    }

    pub fn with_cache(root: R, cache: Arc<NodeCache>) -> Self {
        let path = Path::with_cache(root.borrow().ty(), cache);
        Self { root, path }
    }

    /// Pairs `root` with an existing path.
    ///
    /// Returns `None` if `root` is not of the path's root type.
    pub fn with_path(root: R, path: Path) -> Option<Self> {
        if !path.root_type().accepts(root.borrow()) {
            return None;
        }
        Some(Self { root, path })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn root(&self) -> &Value {
        self.root.borrow()
    }

    #[inline]
    pub fn into_root(self) -> R {
        self.root
    }

    /// Moves the reference one key further.
    pub fn next(self, key: impl Into<Value>) -> Option<Self> {
        let path = self.path.next(key)?;
        Some(Self { root: self.root, path })
    }

    pub fn nexts<K: Into<Value>>(self, keys: impl IntoIterator<Item = K>) -> Option<Self> {
        let path = self.path.nexts(keys)?;
        Some(Self { root: self.root, path })
    }

    /// Reads the referenced value. See [`Path::get`].
    #[inline]
    pub fn get(&self) -> Result<Cow<'_, Value>, PathError> {
        self.path.get(self.root.borrow())
    }

    /// Returns the nodes of the value currently referenced.
    ///
    /// Unlike [`Path::next_nodes`], maps and sequences list the keys they
    /// hold. `None` if the value cannot be read.
    pub fn next_nodes(&self) -> Option<Arc<Nodes>> {
        let value = self.get().ok()?;
        Some(self.path.cache().value_nodes(&value))
    }

    /// Borrows this reference for reading.
    pub fn by_ref(&self) -> Reference<&Value> {
        Reference {
            root: self.root.borrow(),
            path: self.path.clone(),
        }
    }
}

impl<R: BorrowMut<Value>> Reference<R> {
    /// Writes the referenced value. See [`Path::set`].
    #[inline]
    pub fn set(&mut self, value: Value) -> Result<(), PathError> {
        self.path.set(self.root.borrow_mut(), value)
    }

    /// Decodes and writes the referenced value. See [`Path::set_text`].
    #[inline]
    pub fn set_text<D: DecodeText>(&mut self, text: &str, decoder: &D) -> Result<(), PathError> {
        self.path.set_text(self.root.borrow_mut(), text, decoder)
    }

    /// Borrows this reference for writing.
    pub fn by_mut(&mut self) -> Reference<&mut Value> {
        Reference {
            root: self.root.borrow_mut(),
            path: self.path.clone(),
        }
    }
}

impl<R: Clone> Clone for Reference<R> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            path: self.path.clone(),
        }
    }
}

impl<R: Borrow<Value>> fmt::Debug for Reference<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("root", self.root.borrow())
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Reference;
    use crate::{NodeCache, Path};
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use refstr_reflect::info::{RecordInfo, Type};
    use refstr_reflect::value::{SequenceValue, Value};

    fn tagged() -> Type {
        RecordInfo::builder("RefTagged")
            .field("Name", Type::string())
            .field("Tags", Type::sequence(Type::string()))
            .build()
    }

    #[test]
    fn owned_roots() {
        let mut tags = Reference::new(tagged().zero()).next("Tags").unwrap();
        assert_eq!(tags.path().key_strings(), ["Tags"]);

        tags.by_mut().next("1").unwrap().set(Value::from("b")).unwrap();
        assert_eq!(tags.get().unwrap().to_string(), "[ b]");
        assert_eq!(tags.next_nodes().unwrap().key_strings(), ["0", "1"]);

        let root = tags.into_root();
        assert_eq!(root.to_string(), "{Name: Tags:[ b]}");
    }

    #[test]
    fn shared_roots_read() {
        let mut value = tagged().zero();
        let seq = SequenceValue::new(Type::string(), vec![Value::from("x")]);
        *value.as_record_mut().unwrap().field_mut("Tags").unwrap() = Value::Sequence(seq);

        let cache = Arc::new(NodeCache::new());
        let first = Reference::with_cache(&value, cache.clone()).nexts(["Tags", "0"]).unwrap();
        assert_eq!(first.get().unwrap().as_ref(), &Value::from("x"));
        assert!(Arc::ptr_eq(first.path().cache(), &cache));

        let borrowed = first.by_ref();
        assert_eq!(borrowed.path().len(), 2);

        // Nothing to list below a string.
        assert!(first.next_nodes().unwrap().is_empty());
    }

    #[test]
    fn reuses_paths() {
        let tagged = tagged();
        let name = Path::new(tagged.clone()).next("Name").unwrap();
        let mut value = tagged.zero();

        let mut named = Reference::with_path(&mut value, name.clone()).unwrap();
        named.set(Value::from("n")).unwrap();
        assert_eq!(name.get(&value).unwrap().as_ref(), &Value::from("n"));

        assert!(Reference::with_path(Value::I64(1), name).is_none());
    }
}
