use alloc::sync::Arc;
use std::sync::{LazyLock, PoisonError, RwLock};

use refstr_reflect::info::{Type, TypeInfo};
use refstr_reflect::utils::{concrete, is_getter, pointer_maybe};
use refstr_reflect::value::Value;
use refstr_utils::hash::HashMap;

use crate::discover::{
    array_nodes, getter_nodes, map_node, pointer_nodes, record_nodes, sequence_node,
};
use crate::{Node, Nodes};

static GLOBAL: LazyLock<Arc<NodeCache>> = LazyLock::new(|| Arc::new(NodeCache::new()));

/// The type descriptor cache: the [`Nodes`] reachable from each type.
///
/// Nodes are computed on first request and shared afterwards. Types are
/// immutable, so a cached entry never goes stale. Two threads computing the
/// same type at once produce equivalent nodes and the first insert wins.
///
/// Every [`Path`](crate::Path) holds the cache it was created with, so
/// independent caches can coexist, for example one per test.
///
/// # Examples
///
/// ```
/// use refstr_path::NodeCache;
/// use refstr_reflect::info::Type;
///
/// let cache = NodeCache::new();
/// let ty = Type::array(Type::string(), 3);
///
/// assert_eq!(cache.nodes_for(&ty).key_strings(), ["0", "1", "2"]);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Default)]
pub struct NodeCache {
    types: RwLock<HashMap<Type, Arc<Nodes>>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    pub fn global() -> Arc<NodeCache> {
        GLOBAL.clone()
    }

    /// Returns the nodes reachable from a value of type `ty`.
    pub fn nodes_for(&self, ty: &Type) -> Arc<Nodes> {
        if let Some(nodes) = self.get(ty) {
            return nodes;
        }

        let nodes = self.compute(ty);
        log::trace!("computed {} nodes for `{ty}`", nodes.len());

        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ty.clone())
            .or_insert(nodes)
            .clone()
    }

    /// Returns the nodes of what `value` currently holds.
    ///
    /// A map yields one node per existing key and a sequence one node per
    /// existing index. Other values yield the nodes of their type.
    pub fn value_nodes(&self, value: &Value) -> Arc<Nodes> {
        match concrete(value) {
            Value::Map(map) => {
                let entry = map_node(map.key_type(), map.value_type());
                let nodes = map.sorted_keys().into_iter().map(|key| entry.for_key(key.clone()));
                Arc::new(nodes.collect())
            }
            Value::Sequence(seq) => {
                let slot = sequence_node(seq.elem());
                let nodes = (0..seq.len()).map(|index| slot.for_key(Value::I64(index as i64)));
                Arc::new(nodes.collect())
            }
            _ => self.nodes_for(&pointer_maybe(value).ty()),
        }
    }

    /// Replaces the nodes of `ty`.
    pub fn set_nodes(&self, ty: Type, nodes: impl IntoIterator<Item = Node>) {
        let nodes: Nodes = nodes.into_iter().collect();
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty, Arc::new(nodes));
    }

    /// Returns the number of cached types.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every cached type, including nodes set with [`set_nodes`](Self::set_nodes).
    pub fn clear(&self) {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn get(&self, ty: &Type) -> Option<Arc<Nodes>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned()
    }

    fn compute(&self, ty: &Type) -> Arc<Nodes> {
        let nodes = match ty.info() {
            TypeInfo::Pointer(_) => {
                let target = ty.concrete();
                let base = self.nodes_for(target);
                let Some(info) = target.as_record() else {
                    return base;
                };
                let extra = pointer_nodes(info);
                if extra.is_empty() {
                    return base;
                }
                let mut nodes = Nodes::clone(&base);
                for node in &extra {
                    nodes.merge(node.clone());
                }
                nodes
            }
            TypeInfo::Map(info) => [map_node(info.key(), info.value())].into_iter().collect(),
            TypeInfo::Sequence(info) => [sequence_node(info.elem())].into_iter().collect(),
            TypeInfo::Array(info) => array_nodes(info).collect(),
            TypeInfo::Function(info) if is_getter(ty) => match info.results().first() {
                Some(result) => getter_nodes(&self.nodes_for(result)),
                None => Nodes::new(),
            },
            TypeInfo::Record(info) => record_nodes(self, info),
            TypeInfo::Scalar(_) | TypeInfo::Function(_) => Nodes::new(),
        };
        Arc::new(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeCache;
    use crate::{Node, NodeKind, Path};
    use alloc::borrow::Cow;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use refstr_reflect::info::{MethodInfo, RecordInfo, Type};
    use refstr_reflect::value::{FuncValue, MapValue, SequenceValue, Value};

    fn name_type() -> Type {
        RecordInfo::builder("CacheName")
            .field("First", Type::string())
            .field("Last", Type::string())
            .getter("Full", Type::string(), |this| {
                let record = this.as_record();
                let part = |name| {
                    let text = record.and_then(|r| r.field(name)).and_then(Value::as_str);
                    String::from(text.unwrap_or_default())
                };
                Value::String(part("Last") + ", " + &part("First"))
            })
            .build()
    }

    #[test]
    fn discovery_is_cached_and_ordered() {
        let cache = NodeCache::new();
        let ty = name_type();

        let a = cache.nodes_for(&ty);
        let b = cache.nodes_for(&ty);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.key_strings(), ["First", "Last", "Full"]);
        assert_eq!(a.get("Full").unwrap().kind(), NodeKind::Getter);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.nodes_for(&ty).key_strings(), a.key_strings());
    }

    #[test]
    fn embedded_nodes_are_promoted() {
        let cache = NodeCache::new();
        let person = RecordInfo::builder("CachePerson")
            .field("Age", Type::i64())
            .embed(name_type())
            .field("First", Type::i64())
            .build();

        let nodes = cache.nodes_for(&person);
        assert_eq!(nodes.key_strings(), ["Age", "Last", "Full", "First"]);
        assert_eq!(nodes.get("First").unwrap().value_type(), &Type::i64());

        let mut value = person.zero();
        let last = nodes.get("Last").unwrap();
        last.write(&mut value, Value::from("Doe")).unwrap();
        assert_eq!(value.to_string(), "{Age:0 CacheName:{First: Last:Doe} First:0}");

        let full = nodes.get("Full").unwrap().read(&value).unwrap();
        assert_eq!(full.as_ref(), &Value::from("Doe, "));
    }

    #[test]
    fn pointer_receiver_methods() {
        let cache = NodeCache::new();
        let counter = RecordInfo::builder("CacheCounter")
            .field("N", Type::i64())
            .getter("Count", Type::i64(), |this| {
                this.as_record().and_then(|r| r.field("N")).cloned().unwrap_or(Value::I64(0))
            })
            .method(MethodInfo::setter("Count", Type::i64(), |this, value| {
                if let Some(n) = this.as_record_mut().and_then(|r| r.field_mut("N")) {
                    *n = value;
                }
            }))
            .build();

        let by_value = cache.nodes_for(&counter);
        assert_eq!(by_value.get("Count").unwrap().kind(), NodeKind::Getter);

        let by_pointer = cache.nodes_for(&Type::pointer(counter.clone()));
        let count = by_pointer.get("Count").unwrap();
        assert_eq!(count.kind(), NodeKind::Accessor);

        let mut value = counter.zero();
        count.write(&mut value, Value::I64(4)).unwrap();
        assert_eq!(count.read(&value).as_deref(), Some(&Value::I64(4)));
    }

    #[test]
    fn embedded_pointer_methods_are_promoted() {
        let inner = RecordInfo::builder("CacheInner")
            .field("N", Type::i64())
            .setter("Total", Type::i64(), |this, value| {
                if let Some(n) = this.as_record_mut().and_then(|r| r.field_mut("N")) {
                    *n = value;
                }
            })
            .build();
        let middle = RecordInfo::builder("CacheMiddle").embed(inner).build();
        let outer = RecordInfo::builder("CacheOuter")
            .field("Label", Type::string())
            .embed(middle)
            .build();

        let cache = Arc::new(NodeCache::new());
        assert!(cache.nodes_for(&outer).get("Total").is_none());

        let pointer = Type::pointer(outer);
        let total = cache.nodes_for(&pointer);
        assert_eq!(total.key_strings(), ["Label", "N", "Total"]);
        assert_eq!(total.get("Total").unwrap().kind(), NodeKind::Setter);

        let mut root = pointer.zero();
        let path = Path::with_cache(pointer, cache).next("Total").unwrap();
        path.set(&mut root, Value::I64(4)).unwrap();
        assert_eq!(root.to_string(), "&{Label: CacheMiddle:{CacheInner:{N:4}}}");
    }

    #[test]
    fn same_named_records_keep_their_own_nodes() {
        let cache = Arc::new(NodeCache::new());
        let narrow = RecordInfo::builder("CacheTwin").field("X", Type::i64()).build();
        let wide = RecordInfo::builder("CacheTwin")
            .field("Name", Type::string())
            .field("X", Type::i64())
            .build();

        assert_eq!(cache.nodes_for(&narrow).key_strings(), ["X"]);
        assert_eq!(cache.nodes_for(&wide).key_strings(), ["Name", "X"]);
        assert_eq!(cache.len(), 2);

        let mut value = wide.zero();
        let x = Path::with_cache(wide, cache).next("X").unwrap();
        x.set(&mut value, Value::I64(7)).unwrap();
        assert_eq!(value.to_string(), "{Name: X:7}");

        // A path over one record does not take the other as its root.
        assert!(crate::Reference::with_path(narrow.zero(), x).is_none());
    }

    #[test]
    fn concurrent_population() {
        let ty = RecordInfo::builder("CacheShared")
            .field("Tags", Type::map(Type::string(), Type::sequence(Type::i64())))
            .embed(Type::pointer(name_type()))
            .build();

        let expected = NodeCache::new();
        let order: Vec<String> =
            expected.nodes_for(&ty).key_strings().into_iter().map(String::from).collect();

        let cache = Arc::new(NodeCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (cache, ty) = (cache.clone(), ty.clone());
                std::thread::spawn(move || cache.nodes_for(&ty))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let first = cache.nodes_for(&ty);
        for nodes in &results {
            assert!(Arc::ptr_eq(nodes, &first));
            assert_eq!(nodes.key_strings(), order);
        }
        assert_eq!(cache.len(), expected.len());
    }

    #[test]
    fn getter_function_nodes() {
        let cache = NodeCache::new();
        let list = Type::sequence(Type::i64());
        let getter = Type::getter(list.clone());

        let nodes = cache.nodes_for(&getter);
        let slot = nodes.for_key(&Value::from("1")).unwrap();
        assert_eq!(slot.kind(), NodeKind::Getter);
        assert!(!slot.is_writable());

        let func = FuncValue::new(getter, move |_| {
            let seq = SequenceValue::new(Type::i64(), vec![Value::I64(5), Value::I64(6)]);
            vec![Value::Sequence(seq)]
        });
        let read = slot.read(&Value::Func(func)).map(Cow::into_owned);
        assert_eq!(read, Some(Value::I64(6)));
    }

    #[test]
    fn value_nodes_list_existing_keys() {
        let cache = NodeCache::new();
        let map = MapValue::new(
            Type::string(),
            Type::i64(),
            [(Value::from("b"), Value::I64(1)), (Value::from("a"), Value::I64(2))],
        );
        let nodes = cache.value_nodes(&Value::Map(map));
        assert_eq!(nodes.key_strings(), ["a", "b"]);
        assert!(nodes.get("a").unwrap().is_copy_only());

        let seq = SequenceValue::new(Type::string(), vec![Value::from("x")]);
        assert_eq!(cache.value_nodes(&Value::Sequence(seq)).key_strings(), ["0"]);

        let nodes = cache.value_nodes(&name_type().zero());
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn set_nodes_overrides() {
        let cache = NodeCache::new();
        let only = Node::new(NodeKind::Getter, Type::string(), Type::i64())
            .with_key(Value::from("Len"))
            .with_read(|_, container| {
                let len = container.as_sequence().map_or(0, |s| s.len());
                Some(Cow::Owned(Value::I64(len as i64)))
            });
        let ty = Type::sequence(Type::string());
        cache.set_nodes(ty.clone(), [only]);

        let nodes = cache.nodes_for(&ty);
        let keys: Vec<&str> = nodes.key_strings();
        assert_eq!(keys, ["Len"]);
        assert!(nodes.for_key(&Value::from("0")).is_none());

        let seq = SequenceValue::new(Type::string(), vec![Value::from(String::new())]);
        let value = Value::Sequence(seq);
        let len = nodes.get("Len").unwrap().read(&value).map(Cow::into_owned);
        assert_eq!(len, Some(Value::I64(1)));
    }
}
