use alloc::borrow::Cow;
use alloc::string::ToString;
use alloc::sync::Arc;
use core::fmt;

use refstr_reflect::info::Type;
use refstr_reflect::value::Value;

use crate::PathError;

/// Reads the child of a container, borrowing it when possible.
pub type ReadFn =
    Arc<dyn for<'a> Fn(&Node, &'a Value) -> Option<Cow<'a, Value>> + Send + Sync>;

/// Returns mutable access to the child of a container, in place.
pub type ViewFn =
    Arc<dyn for<'a> Fn(&Node, &'a mut Value) -> Option<&'a mut Value> + Send + Sync>;

/// Stores a child into a container.
pub type WriteFn = Arc<dyn Fn(&Node, &mut Value, Value) -> Result<(), PathError> + Send + Sync>;

// -----------------------------------------------------------------------------
// NodeKind

/// Where a [`Node`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A record field.
    Field,
    /// A map entry.
    Entry,
    /// A sequence or array slot.
    Slot,
    /// A getter method or the result of a getter function.
    Getter,
    /// A setter method.
    Setter,
    /// A getter and setter method sharing a name.
    Accessor,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.pad("Field"),
            Self::Entry => f.pad("Entry"),
            Self::Slot => f.pad("Slot"),
            Self::Getter => f.pad("Getter"),
            Self::Setter => f.pad("Setter"),
            Self::Accessor => f.pad("Accessor"),
        }
    }
}

// -----------------------------------------------------------------------------
// Node

/// One step of a [`Path`](crate::Path).
///
/// A node is *concrete* when bound to a key, like a record field or an array
/// slot, and *dynamic* otherwise, like "any key" of a map. A dynamic node is
/// bound with [`Node::for_key`].
///
/// Reads and writes receive the container holding the child and look
/// through pointers on their own.
#[derive(Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) key: Option<Value>,
    pub(crate) key_string: Option<Arc<str>>,
    pub(crate) key_type: Type,
    pub(crate) value_type: Type,
    pub(crate) copy_only: bool,
    pub(crate) read: Option<ReadFn>,
    pub(crate) view: Option<ViewFn>,
    pub(crate) write: Option<WriteFn>,
}

impl Node {
    /// Creates a dynamic node with no functions.
    pub fn new(kind: NodeKind, key_type: Type, value_type: Type) -> Self {
        Self {
            kind,
            key: None,
            key_string: None,
            key_type,
            value_type,
            copy_only: false,
            read: None,
            view: None,
            write: None,
        }
    }

    /// Binds the node to `key`.
    pub fn with_key(mut self, key: Value) -> Self {
        self.key_string = Some(key.to_string().into());
        self.key = Some(key);
        self
    }

    /// Marks reads as detached copies that must be written back.
    pub fn with_copy_only(mut self, copy_only: bool) -> Self {
        self.copy_only = copy_only;
        self
    }

    pub fn with_read(
        mut self,
        read: impl for<'a> Fn(&Node, &'a Value) -> Option<Cow<'a, Value>> + Send + Sync + 'static,
    ) -> Self {
        self.read = Some(Arc::new(read));
        self
    }

    pub fn with_view(
        mut self,
        view: impl for<'a> Fn(&Node, &'a mut Value) -> Option<&'a mut Value> + Send + Sync + 'static,
    ) -> Self {
        self.view = Some(Arc::new(view));
        self
    }

    pub fn with_write(
        mut self,
        write: impl Fn(&Node, &mut Value, Value) -> Result<(), PathError> + Send + Sync + 'static,
    ) -> Self {
        self.write = Some(Arc::new(write));
        self
    }

    #[inline]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub const fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Returns the canonical text of the key, `""` for a dynamic node.
    #[inline]
    pub fn key_string(&self) -> &str {
        self.key_string.as_deref().unwrap_or_default()
    }

    /// Returns the type a key for this node must have.
    #[inline]
    pub const fn key_type(&self) -> &Type {
        &self.key_type
    }

    /// Returns the type found at this step.
    #[inline]
    pub const fn value_type(&self) -> &Type {
        &self.value_type
    }

    #[inline]
    pub const fn is_copy_only(&self) -> bool {
        self.copy_only
    }

    #[inline]
    pub const fn is_dynamic(&self) -> bool {
        self.key.is_none()
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Returns `true` if the child can be modified in place.
    #[inline]
    pub const fn has_view(&self) -> bool {
        self.view.is_some()
    }

    /// Returns a copy bound to `key` if this node is dynamic, or a plain copy otherwise.
    pub fn for_key(&self, key: Value) -> Node {
        if self.is_dynamic() {
            self.clone().with_key(key)
        } else {
            self.clone()
        }
    }

    /// Reads the child out of `container`.
    ///
    /// `None` if the node is write-only or the child does not exist.
    #[inline]
    pub fn read<'a>(&self, container: &'a Value) -> Option<Cow<'a, Value>> {
        (self.read.as_ref()?)(self, container)
    }

    /// Returns the child of `container` for in-place mutation.
    #[inline]
    pub fn view<'a>(&self, container: &'a mut Value) -> Option<&'a mut Value> {
        (self.view.as_ref()?)(self, container)
    }

    /// Writes `value` as the child of `container`.
    ///
    /// # Errors
    ///
    /// - [`PathError::NotWritable`] if the node is read-only or the slot cannot be stored.
    /// - [`PathError::TypeMismatch`] if `value` is not of [`value_type`](Node::value_type).
    pub fn write(&self, container: &mut Value, value: Value) -> Result<(), PathError> {
        let Some(write) = self.write.as_ref() else {
            return Err(PathError::not_writable(self.key_string()));
        };
        if !self.value_type.accepts(&value) {
            return Err(PathError::TypeMismatch {
                expected: self.value_type.path().into(),
                found: value.ty().path().into(),
            });
        }
        write(self, container, value)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("key", &self.key_string)
            .field("key_type", &self.key_type)
            .field("value_type", &self.value_type)
            .field("copy_only", &self.copy_only)
            .field("read", &self.read.is_some())
            .field("view", &self.view.is_some())
            .field("write", &self.write.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeKind};
    use crate::PathError;
    use alloc::borrow::Cow;
    use refstr_reflect::info::Type;
    use refstr_reflect::value::Value;

    fn cell() -> Node {
        Node::new(NodeKind::Field, Type::string(), Type::i64())
            .with_read(|_, container| Some(Cow::Borrowed(container)))
            .with_write(|_, container, value| {
                *container = value;
                Ok(())
            })
    }

    #[test]
    fn binding() {
        let node = cell();
        assert!(node.is_dynamic());
        assert_eq!(node.key_string(), "");

        let bound = node.for_key(Value::I64(7));
        assert!(!bound.is_dynamic());
        assert_eq!(bound.key_string(), "7");

        // Binding a concrete node keeps its key.
        assert_eq!(bound.for_key(Value::I64(8)).key_string(), "7");
    }

    #[test]
    fn write_checks_type() {
        let node = cell().with_key(Value::from("N"));
        let mut target = Value::I64(0);

        node.write(&mut target, Value::I64(5)).unwrap();
        assert_eq!(node.read(&target).as_deref(), Some(&Value::I64(5)));

        let err = node.write(&mut target, Value::from("x")).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { .. }));

        let read_only = Node::new(NodeKind::Getter, Type::string(), Type::i64());
        let err = read_only.write(&mut target, Value::I64(1)).unwrap_err();
        assert!(matches!(err, PathError::NotWritable { .. }));
        assert!(read_only.read(&target).is_none());
        assert!(read_only.view(&mut target).is_none());
    }
}
