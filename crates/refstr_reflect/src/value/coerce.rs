use core::str::FromStr;

use crate::info::{ScalarKind, Type};
use crate::value::Value;

fn parse<T: FromStr>(text: &str) -> Option<T> {
    text.trim().parse().ok()
}

fn int_to(kind: ScalarKind, n: i128) -> Option<Value> {
    Some(match kind {
        ScalarKind::I8 => Value::I8(n.try_into().ok()?),
        ScalarKind::I16 => Value::I16(n.try_into().ok()?),
        ScalarKind::I32 => Value::I32(n.try_into().ok()?),
        ScalarKind::I64 => Value::I64(n.try_into().ok()?),
        ScalarKind::U8 => Value::U8(n.try_into().ok()?),
        ScalarKind::U16 => Value::U16(n.try_into().ok()?),
        ScalarKind::U32 => Value::U32(n.try_into().ok()?),
        ScalarKind::U64 => Value::U64(n.try_into().ok()?),
        _ => return None,
    })
}

impl Value {
    /// Converts this value into a key of type `ty`.
    ///
    /// A value the type already accepts is returned as is. Integers convert
    /// between widths when in range, and text is parsed into scalar types.
    /// Anything else yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use refstr_reflect::info::Type;
    /// use refstr_reflect::value::Value;
    ///
    /// assert_eq!(Value::from("3").coerce_to(&Type::i64()), Some(Value::I64(3)));
    /// assert_eq!(Value::I64(300).coerce_to(&Type::u8()), None);
    /// assert_eq!(Value::I32(7).coerce_to(&Type::u8()), Some(Value::U8(7)));
    /// ```
    pub fn coerce_to(&self, ty: &Type) -> Option<Value> {
        if ty.accepts(self) {
            return Some(self.clone());
        }
        let kind = ty.as_scalar()?;

        if let Some(n) = self.as_int() {
            return match kind {
                ScalarKind::F32 => Some(Value::F32(n as f32)),
                ScalarKind::F64 => Some(Value::F64(n as f64)),
                _ => int_to(kind, n),
            };
        }

        if let Some(x) = self.as_float() {
            return match kind {
                ScalarKind::F32 => Some(Value::F32(x as f32)),
                ScalarKind::F64 => Some(Value::F64(x)),
                _ => None,
            };
        }

        let text = self.as_str()?;
        match kind {
            ScalarKind::Bool => parse(text).map(Value::Bool),
            ScalarKind::F32 => parse(text).map(Value::F32),
            ScalarKind::F64 => parse(text).map(Value::F64),
            ScalarKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            _ if kind.is_integer() => int_to(kind, parse(text)?),
            _ => None,
        }
    }
}
