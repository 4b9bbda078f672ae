use alloc::string::{String, ToString};
use alloc::vec::Vec;

use refstr_reflect::value::Value;
use refstr_utils::hash::HashMap;

use crate::{Node, NodeKind};

/// The children reachable from a type or value.
///
/// Keeps nodes in discovery order and indexes the concrete ones by key
/// string. At most one node is dynamic, and a collection holding one
/// resolves every key through it.
///
/// # Examples
///
/// ```
/// use refstr_path::NodeCache;
/// use refstr_reflect::info::{RecordInfo, Type};
/// use refstr_reflect::value::Value;
///
/// let point = RecordInfo::builder("NodesPoint")
///     .field("X", Type::i64())
///     .field("Y", Type::i64())
///     .build();
///
/// let nodes = NodeCache::new().nodes_for(&point);
/// assert_eq!(nodes.key_strings(), ["X", "Y"]);
/// assert!(nodes.for_key(&Value::from("Y")).is_some());
/// assert!(nodes.for_key(&Value::from("Z")).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Nodes {
    in_order: Vec<Node>,
    by_key: HashMap<String, usize>,
    dynamic: Option<usize>,
}

impl Nodes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless one with the same key string is present.
    ///
    /// Returns `false` if the node was skipped.
    pub fn add(&mut self, node: Node) -> bool {
        if node.is_dynamic() {
            if self.dynamic.is_some() {
                return false;
            }
            self.dynamic = Some(self.in_order.len());
        } else {
            if self.by_key.contains_key(node.key_string()) {
                return false;
            }
            self.by_key.insert(node.key_string().to_string(), self.in_order.len());
        }
        self.in_order.push(node);
        true
    }

    /// Adds a node, combining it with a same-named node where possible.
    ///
    /// A getter and a setter sharing a name and a value type become one
    /// [`NodeKind::Accessor`] node. Any other collision keeps the first
    /// node and logs a warning.
    pub fn merge(&mut self, node: Node) {
        let existing = match node.is_dynamic() {
            true => None,
            false => self.by_key.get(node.key_string()).copied(),
        };
        let Some(existing) = existing else {
            if !self.add(node) {
                log::warn!("dropping a second dynamic node");
            }
            return;
        };

        let kind = node.kind;
        let first = &mut self.in_order[existing];
        let pair = match (first.kind, kind) {
            (NodeKind::Getter, NodeKind::Setter) => Some((first.clone(), node)),
            (NodeKind::Setter, NodeKind::Getter) => Some((node, first.clone())),
            _ => None,
        };

        match pair {
            Some((getter, setter)) if getter.value_type == setter.value_type => {
                *first = Node {
                    kind: NodeKind::Accessor,
                    write: setter.write,
                    view: None,
                    ..getter
                };
            }
            Some((getter, setter)) => {
                log::warn!(
                    "`{}` getter returns `{}` but its setter takes `{}`, keeping the first",
                    getter.key_string(),
                    getter.value_type,
                    setter.value_type,
                );
            }
            None => {
                log::warn!(
                    "`{}` is already a {} node, dropping the {} node",
                    first.key_string(),
                    first.kind,
                    kind,
                );
            }
        }
    }

    /// Resolves a key to a bound node.
    ///
    /// With a dynamic node, the key is converted to its key type first and
    /// `None` is returned if that fails. Otherwise the key's text is looked
    /// up among the concrete nodes.
    pub fn for_key(&self, key: &Value) -> Option<Node> {
        if let Some(dynamic) = self.dynamic() {
            let key = key.coerce_to(dynamic.key_type())?;
            return Some(dynamic.for_key(key));
        }
        self.get(&key.to_string()).cloned()
    }

    /// Returns the concrete node with the given key string.
    #[inline]
    pub fn get(&self, key_string: &str) -> Option<&Node> {
        let index = *self.by_key.get(key_string)?;
        self.in_order.get(index)
    }

    /// Returns the dynamic node, if any.
    #[inline]
    pub fn dynamic(&self) -> Option<&Node> {
        self.in_order.get(self.dynamic?)
    }

    /// Returns the key strings of the concrete nodes, in order.
    pub fn key_strings(&self) -> Vec<&str> {
        self.in_order
            .iter()
            .filter(|node| !node.is_dynamic())
            .map(Node::key_string)
            .collect()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Node> {
        self.in_order.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Node] {
        &self.in_order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.in_order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.in_order.is_empty()
    }
}

impl FromIterator<Node> for Nodes {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        let mut nodes = Self::new();
        iter.into_iter().for_each(|node| nodes.merge(node));
        nodes
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Node;
    type IntoIter = core::slice::Iter<'a, Node>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.in_order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Nodes;
    use crate::{Node, NodeKind};
    use alloc::borrow::Cow;
    use refstr_reflect::info::Type;
    use refstr_reflect::value::Value;

    fn getter(name: &str, ty: Type) -> Node {
        Node::new(NodeKind::Getter, Type::string(), ty)
            .with_key(Value::from(name))
            .with_read(|_, c| Some(Cow::Borrowed(c)))
    }

    fn setter(name: &str, ty: Type) -> Node {
        Node::new(NodeKind::Setter, Type::string(), ty)
            .with_key(Value::from(name))
            .with_write(|_, c, v| {
                *c = v;
                Ok(())
            })
    }

    #[test]
    fn add_skips_duplicates() {
        let mut nodes = Nodes::new();
        assert!(nodes.add(getter("A", Type::i64())));
        assert!(!nodes.add(setter("A", Type::i64())));
        assert_eq!(nodes.len(), 1);
        assert!(!nodes.get("A").unwrap().is_writable());
    }

    #[test]
    fn merge_getter_and_setter() {
        let mut nodes = Nodes::new();
        nodes.merge(setter("Name", Type::string()));
        nodes.merge(getter("Name", Type::string()));

        let node = nodes.get("Name").unwrap();
        assert_eq!(node.kind(), NodeKind::Accessor);
        assert!(node.is_readable());
        assert!(node.is_writable());
        assert!(!node.has_view());
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn merge_keeps_first_on_conflict() {
        let mut nodes = Nodes::new();
        nodes.merge(getter("Age", Type::i64()));
        nodes.merge(setter("Age", Type::string()));

        let node = nodes.get("Age").unwrap();
        assert_eq!(node.kind(), NodeKind::Getter);
        assert!(!node.is_writable());

        nodes.merge(getter("Age", Type::i64()));
        assert_eq!(nodes.get("Age").unwrap().kind(), NodeKind::Getter);
    }

    #[test]
    fn dynamic_resolution() {
        let slot = Node::new(NodeKind::Slot, Type::i64(), Type::string());
        let nodes: Nodes = [slot].into_iter().collect();

        assert!(nodes.key_strings().is_empty());
        let bound = nodes.for_key(&Value::from("3")).unwrap();
        assert_eq!(bound.key(), Some(&Value::I64(3)));
        assert!(nodes.for_key(&Value::from("x")).is_none());
    }
}
