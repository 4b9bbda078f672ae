//! Runtime type model and dynamic values for reflective path access.
//!
//! Rust has no runtime reflection over arbitrary types, so this crate
//! provides an explicit one:
//!
//! - [`info`]: [`Type`](info::Type) handles and their [`TypeInfo`](info::TypeInfo),
//!   including records with fields, embedded fields and methods.
//! - [`value`]: the dynamic [`Value`](value::Value) that every type describes.
//! - [`utils`]: leaf helpers such as dereferencing and nil initialization.
//! - [`text`]: the [`DecodeText`](text::DecodeText) contract used to turn
//!   text into a value of a given type.
//!
//! # Examples
//!
//! ```
//! use refstr_reflect::info::{RecordInfo, Type};
//! use refstr_reflect::value::Value;
//!
//! let point = RecordInfo::builder("Point")
//!     .field("X", Type::i64())
//!     .field("Y", Type::i64())
//!     .build();
//!
//! let mut value = point.zero();
//! let record = value.as_record_mut().unwrap();
//! *record.field_mut("X").unwrap() = Value::I64(3);
//!
//! assert_eq!(value.to_string(), "{X:3 Y:0}");
//! assert!(point.accepts(&value));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod info;
pub mod text;
pub mod utils;
pub mod value;
