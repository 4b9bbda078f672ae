use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use refstr_reflect::info::Type;
use refstr_reflect::text::DecodeText;
use refstr_reflect::utils::{init_type, init_value};
use refstr_reflect::value::Value;
use refstr_utils::vec::FastVec;

use crate::{Node, NodeCache, Nodes, PathError};

// -----------------------------------------------------------------------------
// Path

/// An immutable chain of bound [`Node`]s starting at a root type.
///
/// A path is resolved against types only, it can then be replayed over any
/// value of the root type. Extending a path returns a new one.
///
/// # Examples
///
/// ```
/// use refstr_path::Path;
/// use refstr_reflect::info::Type;
/// use refstr_reflect::value::Value;
///
/// let ty = Type::map(Type::string(), Type::sequence(Type::i64()));
/// let path = Path::new(ty.clone()).nexts(["a", "2"]).unwrap();
/// assert_eq!(path.ty(), &Type::i64());
///
/// let mut root = ty.zero();
/// path.set(&mut root, Value::I64(7)).unwrap();
///
/// assert_eq!(root.to_string(), "map[a:[0 0 7]]");
/// assert_eq!(path.get(&root).unwrap().as_ref(), &Value::I64(7));
/// ```
#[derive(Clone)]
pub struct Path {
    root: Type,
    nodes: Box<[Node]>,
    cache: Arc<NodeCache>,
}

impl Path {
    /// Creates an empty path using the [global](NodeCache::global) cache.
    #[inline]
    pub fn new(root: Type) -> Self {
        Self::with_cache(root, NodeCache::global())
    }

    /// Creates an empty path resolving nodes through `cache`.
    #[inline]
    pub fn with_cache(root: Type, cache: Arc<NodeCache>) -> Self {
        Self {
            root,
            nodes: Box::new([]),
            cache,
        }
    }

    /// Creates a path following `keys` from `root`.
    ///
    /// # Errors
    ///
    /// [`PathError::NoSuchPath`] naming the first key that does not resolve.
    pub fn from_keys<K: Into<Value>>(
        root: Type,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<Self, PathError> {
        let mut path = Self::new(root);
        for key in keys {
            let key = key.into();
            path = match path.next(key.clone()) {
                Some(next) => next,
                None => return Err(PathError::NoSuchPath { key: key.to_string() }),
            };
        }
        Ok(path)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the last node, `None` for an empty path.
    #[inline]
    pub fn end(&self) -> Option<&Node> {
        self.nodes.last()
    }

    #[inline]
    pub fn root_type(&self) -> &Type {
        &self.root
    }

    /// Returns the type found at the end of this path.
    pub fn ty(&self) -> &Type {
        match self.end() {
            Some(node) => node.value_type(),
            None => &self.root,
        }
    }

    #[inline]
    pub fn cache(&self) -> &Arc<NodeCache> {
        &self.cache
    }

    pub fn key_strings(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::key_string).collect()
    }

    pub fn keys(&self) -> Vec<&Value> {
        self.nodes.iter().filter_map(Node::key).collect()
    }

    /// Returns the nodes available after the end of this path.
    #[inline]
    pub fn next_nodes(&self) -> Arc<Nodes> {
        self.cache.nodes_for(self.ty())
    }

    /// Returns this path extended by `key`, or `None` if there is no such key.
    pub fn next(&self, key: impl Into<Value>) -> Option<Path> {
        let node = self.next_nodes().for_key(&key.into())?;

        let mut vec: FastVec<Node, 8> = FastVec::new();
        let data = vec.get();
        for prev in self.nodes.iter() {
            data.push(prev.clone());
        }
        data.push(node);

        Some(Self {
            root: self.root.clone(),
            nodes: vec.into_boxed_slice(),
            cache: self.cache.clone(),
        })
    }

    /// Folds [`next`](Self::next) over `keys`. No keys returns a copy of this path.
    pub fn nexts<K: Into<Value>>(&self, keys: impl IntoIterator<Item = K>) -> Option<Path> {
        let mut path = self.clone();
        for key in keys {
            path = path.next(key)?;
        }
        Some(path)
    }

    /// Reads the value at this path.
    ///
    /// An empty path returns `root` itself.
    ///
    /// # Errors
    ///
    /// - [`PathError::NotReadable`] if a node is write-only.
    /// - [`PathError::InvalidResult`] if a node finds nothing, like a missing map key.
    pub fn get<'a>(&self, root: &'a Value) -> Result<Cow<'a, Value>, PathError> {
        let mut current = Cow::Borrowed(root);
        for node in self.nodes.iter() {
            if !node.is_readable() {
                return Err(PathError::not_readable(node.key_string()));
            }
            let next = match current {
                Cow::Borrowed(value) => node.read(value),
                Cow::Owned(ref value) => node.read(value).map(|v| Cow::Owned(v.into_owned())),
            };
            current = next.ok_or_else(|| PathError::invalid_result(node.key_string()))?;
        }
        Ok(current)
    }

    /// Writes `value` at this path, creating whatever is missing on the way.
    ///
    /// Nil maps, sequences and pointers are initialized, missing map entries
    /// and sequence slots are created from zero values. The leading nodes
    /// that can be viewed in place are walked in place. From the first map
    /// entry, accessor or missing child onwards, children are copied out,
    /// modified, then written back into their parents from the end.
    ///
    /// # Errors
    ///
    /// Nothing is modified if a check fails up front:
    /// - [`PathError::NotWritable`] if a node is read-only.
    /// - [`PathError::NotReadable`] if a node before the last is write-only.
    /// - [`PathError::TypeMismatch`] if `value` is not of [`ty`](Self::ty).
    ///
    /// A node or setter method may still fail while writing.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        let expected = self.ty();
        if !expected.accepts(&value) {
            return Err(PathError::TypeMismatch {
                expected: expected.path().into(),
                found: value.ty().path().into(),
            });
        }

        let Some((last, parents)) = self.nodes.split_last() else {
            *root = value;
            return Ok(());
        };

        for (index, node) in self.nodes.iter().enumerate() {
            if !node.is_writable() {
                return Err(PathError::not_writable(node.key_string()));
            }
            if index < parents.len() && !node.is_readable() {
                return Err(PathError::not_readable(node.key_string()));
            }
        }

        init_value(root);

        // Walk in place while children can be borrowed mutably.
        let mut anchor: &mut Value = root;
        let mut start = 0;
        while let Some(node) = parents.get(start) {
            if node.is_copy_only() || node.view(anchor).is_none() {
                break;
            }
            anchor = match node.view(anchor) {
                Some(child) => child,
                None => return Err(PathError::invalid_result(node.key_string())),
            };
            init_value(anchor);
            start += 1;
        }

        // Copy out the rest, creating missing children.
        let mut staged: Vec<Value> = Vec::with_capacity(parents.len() - start);
        for node in &parents[start..] {
            let container = staged.last().unwrap_or(&*anchor);
            let mut child = match node.read(container) {
                Some(child) => child.into_owned(),
                None => {
                    log::debug!("creating missing `{}` of type `{}`", node.key_string(), node.value_type());
                    init_type(node.value_type())
                }
            };
            init_value(&mut child);
            staged.push(child);
        }

        match staged.last_mut() {
            Some(container) => last.write(container, value)?,
            None => last.write(anchor, value)?,
        }

        if !staged.is_empty() {
            log::debug!(
                "writing back {} values from `{}`",
                staged.len(),
                parents[start].key_string()
            );
        }
        while let Some(child) = staged.pop() {
            let node = &parents[start + staged.len()];
            let parent = match staged.last_mut() {
                Some(parent) => parent,
                None => &mut *anchor,
            };
            node.write(parent, child)?;
        }

        Ok(())
    }

    /// Decodes `text` as [`ty`](Self::ty) and writes it at this path.
    ///
    /// # Errors
    ///
    /// [`PathError::Decode`] wrapping the decoder's error, or any error of [`set`](Self::set).
    pub fn set_text<D: DecodeText>(
        &self,
        root: &mut Value,
        text: &str,
        decoder: &D,
    ) -> Result<(), PathError> {
        let value = decoder
            .decode_type(self.ty(), text)
            .map_err(|err| PathError::Decode(Box::new(err)))?;
        self.set(root, value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for node in self.nodes.iter() {
            write!(f, ".{}", node.key_string())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("root", &self.root)
            .field("keys", &self.key_strings())
            .finish()
    }
}
