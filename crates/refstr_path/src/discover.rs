//! Node construction, one function per structural kind.

use alloc::borrow::Cow;

use refstr_reflect::info::{ArrayInfo, MethodInfo, RecordInfo, Receiver, Type};
use refstr_reflect::utils::{concrete, concrete_mut, init_value};
use refstr_reflect::value::Value;
use refstr_utils::hash::HashSet;

use crate::{Node, NodeCache, NodeKind, Nodes, PathError};

fn slot_index(node: &Node) -> Option<usize> {
    usize::try_from(node.key()?.as_int()?).ok()
}

/// The dynamic node of a map: entries are copies and writes insert.
pub(crate) fn map_node(key: &Type, value: &Type) -> Node {
    Node::new(NodeKind::Entry, key.clone(), value.clone())
        .with_copy_only(true)
        .with_read(|node, container| {
            let map = concrete(container).as_map()?;
            map.get(node.key()?).map(Cow::Borrowed)
        })
        .with_write(|node, container, value| {
            let key = node.key().cloned();
            match (key, concrete_mut(container).as_map_mut()) {
                (Some(key), Some(map)) => {
                    map.insert(key, value);
                    Ok(())
                }
                _ => Err(PathError::not_writable(node.key_string())),
            }
        })
}

/// The dynamic node of a growable sequence: writes past the end grow it.
///
/// Any non-negative index is accepted, so writing at a huge index fills
/// every slot up to it with zero values. Reads never grow.
pub(crate) fn sequence_node(elem: &Type) -> Node {
    Node::new(NodeKind::Slot, Type::i64(), elem.clone())
        .with_read(|node, container| {
            let seq = concrete(container).as_sequence()?;
            seq.get(slot_index(node)?).map(Cow::Borrowed)
        })
        .with_view(|node, container| {
            let index = slot_index(node)?;
            concrete_mut(container).as_sequence_mut()?.get_mut(index)
        })
        .with_write(|node, container, value| {
            let index = slot_index(node);
            match (index, concrete_mut(container).as_sequence_mut()) {
                (Some(index), Some(seq)) => {
                    *seq.grow_to(index) = value;
                    Ok(())
                }
                _ => Err(PathError::not_writable(node.key_string())),
            }
        })
}

/// One concrete node per slot of a fixed-size array.
pub(crate) fn array_nodes(info: &ArrayInfo) -> impl Iterator<Item = Node> + '_ {
    (0..info.len()).map(move |index| {
        Node::new(NodeKind::Slot, Type::i64(), info.elem().clone())
            .with_key(Value::I64(index as i64))
            .with_read(move |_, container| {
                let array = concrete(container).as_array()?;
                array.get(index).map(Cow::Borrowed)
            })
            .with_view(move |_, container| concrete_mut(container).as_array_mut()?.get_mut(index))
            .with_write(move |node, container, value| {
                match concrete_mut(container).as_array_mut().and_then(|a| a.get_mut(index)) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(PathError::not_writable(node.key_string())),
                }
            })
    })
}

fn call_getter(container: &Value) -> Option<Value> {
    let func = concrete(container).as_func()?;
    func.call(&[])?.into_iter().next()
}

/// The nodes of a getter function's result, read through a call.
///
/// Nothing behind a call is writable.
pub(crate) fn getter_nodes(result: &Nodes) -> Nodes {
    let mut nodes = Nodes::new();
    for inner in result {
        let mut node = Node {
            kind: NodeKind::Getter,
            read: None,
            view: None,
            write: None,
            ..inner.clone()
        };
        if let Some(read) = inner.read.clone() {
            node = node.with_read(move |node, container| {
                let result = call_getter(container)?;
                read(node, &result).map(|value| Cow::Owned(value.into_owned()))
            });
        }
        nodes.merge(node);
    }
    nodes
}

fn field_node(index: usize, name: &str, ty: &Type) -> Node {
    Node::new(NodeKind::Field, Type::string(), ty.clone())
        .with_key(Value::from(name))
        .with_read(move |_, container| {
            let record = concrete(container).as_record()?;
            record.field_at(index).map(Cow::Borrowed)
        })
        .with_view(move |_, container| concrete_mut(container).as_record_mut()?.field_at_mut(index))
        .with_write(move |node, container, value| {
            match concrete_mut(container).as_record_mut().and_then(|r| r.field_at_mut(index)) {
                Some(field) => {
                    *field = value;
                    Ok(())
                }
                None => Err(PathError::not_writable(node.key_string())),
            }
        })
}

/// Re-exposes a node of an embedded record through the embedding field.
fn promote(index: usize, inner: &Node) -> Node {
    let mut node = Node {
        read: None,
        view: None,
        write: None,
        ..inner.clone()
    };
    if let Some(read) = inner.read.clone() {
        node = node.with_read(move |node, container| {
            let embedded = concrete(container).as_record()?.field_at(index)?;
            read(node, embedded)
        });
    }
    if let Some(view) = inner.view.clone() {
        node = node.with_view(move |node, container| {
            let embedded = concrete_mut(container).as_record_mut()?.field_at_mut(index)?;
            view(node, embedded)
        });
    }
    if let Some(write) = inner.write.clone() {
        node = node.with_write(move |node, container, value| {
            let record = concrete_mut(container).as_record_mut();
            let Some(embedded) = record.and_then(|r| r.field_at_mut(index)) else {
                return Err(PathError::not_writable(node.key_string()));
            };
            init_value(embedded);
            write(node, embedded, value)
        });
    }
    node
}

/// A getter or setter node for a method of a matching shape.
pub(crate) fn method_node(method: &MethodInfo) -> Option<Node> {
    let key = Value::from(method.name());
    if method.is_getter() {
        let result = method.results().first()?.clone();
        let method = method.clone();
        let node = Node::new(NodeKind::Getter, Type::string(), result)
            .with_key(key)
            .with_read(move |_, container| {
                let results = method.call_ref(concrete(container), &[]);
                results.into_iter().next().map(Cow::Owned)
            });
        Some(node)
    } else if method.is_setter() {
        let param = method.params().first()?.clone();
        let method = method.clone();
        let node = Node::new(NodeKind::Setter, Type::string(), param)
            .with_key(key)
            .with_write(move |_, container, value| {
                let results = method.call(concrete_mut(container), &[value]);
                match results.into_iter().next() {
                    Some(Value::Error(Some(message))) => Err(PathError::Method {
                        name: method.name().into(),
                        message,
                    }),
                    _ => Ok(()),
                }
            });
        Some(node)
    } else {
        None
    }
}

/// Adds a node for every accessor-shaped method with the given receiver.
fn add_methods(nodes: &mut Nodes, info: &RecordInfo, receiver: Receiver) {
    info.methods()
        .iter()
        .filter(|method| method.receiver() == receiver)
        .filter_map(method_node)
        .for_each(|node| nodes.merge(node));
}

fn own_fields(info: &RecordInfo) -> HashSet<&str> {
    info.fields()
        .iter()
        .filter(|field| !field.is_embedded())
        .map(|field| field.name())
        .collect()
}

/// Fields in declaration order, embedded records promoted in place, then
/// value-receiver methods.
///
/// A field declared on the record itself shadows a promoted node with
/// the same name.
pub(crate) fn record_nodes(cache: &NodeCache, info: &RecordInfo) -> Nodes {
    let own = own_fields(info);

    let mut nodes = Nodes::new();
    for (index, field) in info.fields().iter().enumerate() {
        if !field.is_embedded() {
            nodes.merge(field_node(index, field.name(), field.ty()));
            continue;
        }
        for inner in cache.nodes_for(field.ty()).iter() {
            if !own.contains(inner.key_string()) {
                nodes.merge(promote(index, inner));
            }
        }
    }

    add_methods(&mut nodes, info, Receiver::Value);
    nodes
}

/// The nodes a pointer to the record has beyond those of the record:
/// its pointer-receiver methods, and those of records it embeds by value,
/// promoted at any depth.
///
/// Records embedded through a pointer already contribute theirs to
/// [`record_nodes`].
pub(crate) fn pointer_nodes(info: &RecordInfo) -> Nodes {
    let own = own_fields(info);

    let mut nodes = Nodes::new();
    for (index, field) in info.fields().iter().enumerate() {
        let Some(inner) = field.ty().as_record().filter(|_| field.is_embedded()) else {
            continue;
        };
        for node in pointer_nodes(inner).iter() {
            if !own.contains(node.key_string()) {
                nodes.merge(promote(index, node));
            }
        }
    }

    add_methods(&mut nodes, info, Receiver::Pointer);
    nodes
}
