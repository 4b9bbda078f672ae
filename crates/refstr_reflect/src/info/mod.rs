//! Provide runtime type infomation.
//!
//! ## Menu
//!
//! - [`Type`]: A cheap, clonable handle to an immutable [`TypeInfo`].
//!   Identity is the canonical type path, e.g. `Vec<i64>` or `Person`.
//!
//! - [`TypeInfo`]: A enum representing the structure of a type, one of:
//!     - `Scalar`: booleans, integers, floats, `char`, `String` and `error`, see [`ScalarKind`].
//!     - [`SequenceInfo`]: growable sequence, e.g. `Vec<i64>`.
//!     - [`ArrayInfo`]: fixed-size sequence, e.g. `[i64; 2]`.
//!     - [`MapInfo`]: key-value map, e.g. `HashMap<String, i64>`.
//!     - [`PointerInfo`]: nullable indirection, e.g. `Option<Box<Person>>`.
//!     - [`FunctionInfo`]: parameter and result types of a function value.
//!     - [`RecordInfo`]: named record with fields, embedded fields and methods.
//!
//! - [`FieldInfo`]: A record field, including name, type and whether it is embedded.
//!
//! - [`MethodInfo`]: A callable member of a record, including receiver kind and signature.
//!
//! - Kind:
//!     - [`TypeKind`]: the structural kind of a type.
//!     - [`ScalarKind`]: the scalar kind of a `Scalar` type.
//!
//! - [`Typed`]: A trait for obtaining the [`Type`] of Rust primitive types.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod kind;
mod method_info;
mod record_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ArrayInfo, FunctionInfo, MapInfo, PointerInfo, SequenceInfo};
pub use kind::{ScalarKind, TypeKind};
pub use method_info::{MethodFn, MethodInfo, Receiver};
pub use record_info::{FieldInfo, RecordBuilder, RecordInfo, UnmarshalFn};
pub use type_info::{Type, TypeInfo};
pub use typed::Typed;
