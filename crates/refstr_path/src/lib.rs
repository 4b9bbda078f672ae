//! Reflective paths over [`refstr_reflect`] values.
//!
//! A [`Path`] is a chain of [`Node`]s resolved from a root [`Type`] and a
//! list of keys: record field names, map keys, sequence indices, or names of
//! getter and setter methods. It can then read or write any value of that
//! root type, initializing nil containers and missing entries on the way.
//!
//! ## Menu
//!
//! - [`Node`] / [`Nodes`]: one step, and the steps available from a type.
//! - [`NodeCache`]: discovers and caches [`Nodes`] per type.
//! - [`Path`]: resolved nodes with [`get`](Path::get) and [`set`](Path::set).
//! - [`Reference`]: a path bound to a root value.
//! - [`PathError`]: what can go wrong on the way.
//!
//! # Examples
//!
//! ```
//! use refstr_path::Path;
//! use refstr_reflect::info::{RecordInfo, Type};
//! use refstr_reflect::value::Value;
//!
//! let name = RecordInfo::builder("Name")
//!     .field("First", Type::string())
//!     .field("Last", Type::string())
//!     .build();
//! let people = Type::map(Type::string(), name);
//!
//! let mut root = people.zero();
//! let first = Path::from_keys(people, ["john", "First"]).unwrap();
//! first.set(&mut root, Value::from("John")).unwrap();
//!
//! assert_eq!(root.to_string(), "map[john:{First:John Last:}]");
//! ```
//!
//! [`Type`]: refstr_reflect::info::Type
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod discover;
mod error;
mod node;
mod nodes;
mod path;
mod reference;

// -----------------------------------------------------------------------------
// Exports

pub use cache::NodeCache;
pub use error::PathError;
pub use node::{Node, NodeKind, ReadFn, ViewFn, WriteFn};
pub use nodes::Nodes;
pub use path::Path;
pub use reference::Reference;
