use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::num::{ParseFloatError, ParseIntError};

use refstr_reflect::info::{ArrayInfo, MapInfo, RecordInfo, ScalarKind, Type, TypeInfo};
use refstr_reflect::text::DecodeText;
use refstr_reflect::utils::{concrete_mut, init_value};
use refstr_reflect::value::{MapValue, PointerValue, SequenceValue, Value};
use refstr_utils::hash::{HashMap, HashSet};

use crate::{DecodeError, Multi};

/// A custom parser for one type.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Parses a signed integer of the given bit width.
pub type IntFn = fn(&str, u32) -> Result<i64, ParseIntError>;

/// Parses an unsigned integer of the given bit width.
pub type UintFn = fn(&str, u32) -> Result<u64, ParseIntError>;

/// Parses a float of the given bit width.
pub type FloatFn = fn(&str, u32) -> Result<f64, ParseFloatError>;

const VALUE_SEPARATOR: &str = r"\s*[\s,|]+\s*";
const KEY_SEPARATOR: &str = ":";

const TRUES: [&str; 8] = ["true", "t", "yes", "ya", "y", "si", "1", "x"];
const FALSES: [&str; 6] = ["false", "f", "no", "n", "0", ""];

fn parse_int(text: &str, bits: u32) -> Result<i64, ParseIntError> {
    match bits {
        8 => text.parse::<i8>().map(i64::from),
        16 => text.parse::<i16>().map(i64::from),
        32 => text.parse::<i32>().map(i64::from),
        _ => text.parse::<i64>(),
    }
}

fn parse_uint(text: &str, bits: u32) -> Result<u64, ParseIntError> {
    match bits {
        8 => text.parse::<u8>().map(u64::from),
        16 => text.parse::<u16>().map(u64::from),
        32 => text.parse::<u32>().map(u64::from),
        _ => text.parse::<u64>(),
    }
}

fn parse_float(text: &str, bits: u32) -> Result<f64, ParseFloatError> {
    match bits {
        32 => text.parse::<f32>().map(f64::from),
        _ => text.parse::<f64>(),
    }
}

fn keywords(words: &[&str]) -> HashSet<String> {
    words.iter().map(|word| word.to_string()).collect()
}

// -----------------------------------------------------------------------------
// Decoder

/// Converts text into values of a requested [`Type`].
///
/// All policy lives in public fields, so a decoder is configured by
/// building one with [`Decoder::new`] and changing what differs.
///
/// Types are handled in this order:
/// 1. Pointers decode their target, an `&` prefix is skipped and `<nil>`
///    is the nil pointer.
/// 2. Records with an [`unmarshal`](RecordInfo::unmarshal) hook use it.
/// 3. Types with an entry in [`parsers`](Decoder::parsers) use it.
/// 4. Everything else is decoded by kind. Byte sequences take the raw
///    bytes of the text.
///
/// There is no complex number scalar, so there is no complex parser
/// either. Register one in [`parsers`](Decoder::parsers) for a record
/// standing in for it.
///
/// # Examples
///
/// ```
/// use refstr_decode::Decoder;
/// use refstr_reflect::info::{RecordInfo, Type};
///
/// let point = RecordInfo::builder("Point")
///     .field("X", Type::f32())
///     .field("Y", Type::f32())
///     .build();
///
/// let decoder = Decoder::new().unwrap();
/// let braced = decoder.parse("{X:2 Y:5.4}", &point).unwrap();
/// let bare = decoder.parse("X:2, Y:5.4", &point).unwrap();
///
/// assert_eq!(braced, bare);
/// assert_eq!(braced.to_string(), "{X:2 Y:5.4}");
/// ```
#[derive(Clone)]
pub struct Decoder {
    pub sequence: Multi,
    pub array: Multi,
    pub map: Multi,
    pub record: Multi,
    pub parsers: HashMap<Type, ParseFn>,
    pub int: IntFn,
    pub uint: UintFn,
    pub float: FloatFn,
    /// Lowercase keywords decoding to `true`.
    pub trues: HashSet<String>,
    /// Lowercase keywords decoding to `false`.
    pub falses: HashSet<String>,
}

impl Decoder {
    /// Creates a decoder with the default grammar.
    ///
    /// - sequences and arrays: `[a b c]`, brackets optional, values split
    ///   by whitespace, `,` or `|`.
    /// - maps: `map[k:v k:v]`, prefix optional.
    /// - records: `{Name:v Name:v}`, braces optional.
    /// - booleans: `true t yes ya y si 1 x` and `false f no n 0` or empty,
    ///   case-insensitive.
    pub fn new() -> Result<Self, DecodeError> {
        Ok(Self {
            sequence: Multi::new("[", VALUE_SEPARATOR, "]")?,
            array: Multi::new("[", VALUE_SEPARATOR, "]")?,
            map: Multi::new("map[", VALUE_SEPARATOR, "]")?.with_key_separator(KEY_SEPARATOR)?,
            record: Multi::new("{", VALUE_SEPARATOR, "}")?.with_key_separator(KEY_SEPARATOR)?,
            parsers: HashMap::default(),
            int: parse_int,
            uint: parse_uint,
            float: parse_float,
            trues: keywords(&TRUES),
            falses: keywords(&FALSES),
        })
    }

    /// Registers a custom parser for `ty`, replacing any previous one.
    pub fn with_parser(
        mut self,
        ty: Type,
        parser: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.parsers.insert(ty, Arc::new(parser));
        self
    }

    /// Parses `text` as a value of `ty`.
    pub fn parse(&self, text: &str, ty: &Type) -> Result<Value, DecodeError> {
        if let TypeInfo::Pointer(info) = ty.info() {
            if text.trim() == "<nil>" {
                return Ok(ty.zero());
            }
            let text = text.trim_start().strip_prefix('&').unwrap_or(text);
            let target = self.parse(text, info.target())?;
            return Ok(Value::Pointer(PointerValue::new(info.target().clone(), target)));
        }

        if let Some(unmarshal) = ty.as_record().and_then(RecordInfo::unmarshal) {
            log::trace!("unmarshalling `{ty}` from text");
            let mut value = ty.zero();
            unmarshal(&mut value, text).map_err(|message| custom(text, ty, message))?;
            return checked(text, ty, value);
        }

        if let Some(parser) = self.parsers.get(ty) {
            log::trace!("parsing `{ty}` with a custom parser");
            let value = parser(text).map_err(|message| custom(text, ty, message))?;
            return checked(text, ty, value);
        }

        match ty.info() {
            TypeInfo::Scalar(kind) => self.scalar(text, ty, *kind),
            TypeInfo::Sequence(info) if info.is_bytes() => {
                let bytes = text.bytes().map(Value::U8).collect();
                Ok(Value::Sequence(SequenceValue::new(info.elem().clone(), bytes)))
            }
            TypeInfo::Sequence(info) => {
                if text.trim() == "<nil>" {
                    return Ok(ty.zero());
                }
                let elem = info.elem();
                let items = self
                    .sequence
                    .values(text, None)?
                    .into_iter()
                    .map(|item| self.parse(item, elem).map_err(|err| err.within(item, elem)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Sequence(SequenceValue::new(elem.clone(), items)))
            }
            TypeInfo::Array(info) => self.array(text, ty, info),
            TypeInfo::Map(info) => self.map(text, ty, info),
            TypeInfo::Record(info) => self.record(text, ty, info),
            TypeInfo::Pointer(_) | TypeInfo::Function(_) => {
                Err(DecodeError::Unsupported { ty: ty.to_string() })
            }
        }
    }

    /// Parses `text` as a value of `ty`. Same as [`parse`](Self::parse).
    #[inline]
    pub fn decode_type(&self, ty: &Type, text: &str) -> Result<Value, DecodeError> {
        self.parse(text, ty)
    }

    /// Parses `text` as the type of `target` and stores the result there.
    ///
    /// `target` is left untouched on error.
    pub fn decode_into(&self, target: &mut Value, text: &str) -> Result<(), DecodeError> {
        *target = self.parse(text, &target.ty())?;
        Ok(())
    }

    /// Converts `value` to `ty` by decoding its text.
    ///
    /// A value already of type `ty` is returned as is.
    pub fn convert(&self, value: &Value, ty: &Type) -> Result<Value, DecodeError> {
        if ty.accepts(value) {
            return Ok(value.clone());
        }
        self.parse(&value.to_string(), ty)
    }

    fn scalar(&self, text: &str, ty: &Type, kind: ScalarKind) -> Result<Value, DecodeError> {
        let invalid = |message: String| DecodeError::Scalar {
            text: text.to_string(),
            ty: ty.to_string(),
            message,
        };
        let trimmed = text.trim();

        let value = match kind {
            ScalarKind::String => Value::String(text.to_string()),
            ScalarKind::Bool => {
                let lower = trimmed.to_lowercase();
                if self.trues.contains(&lower) {
                    Value::Bool(true)
                } else if self.falses.contains(&lower) {
                    Value::Bool(false)
                } else {
                    return Err(invalid(String::from("not a boolean keyword")));
                }
            }
            ScalarKind::Char => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => return Err(invalid(String::from("expected a single character"))),
                }
            }
            ScalarKind::Error => match trimmed {
                "" | "<nil>" => Value::Error(None),
                _ => Value::Error(Some(text.to_string())),
            },
            ScalarKind::F32 | ScalarKind::F64 => {
                let x = (self.float)(trimmed, kind.bits()).map_err(|err| invalid(err.to_string()))?;
                match kind {
                    ScalarKind::F32 => Value::F32(x as f32),
                    _ => Value::F64(x),
                }
            }
            _ if kind.is_signed() => {
                let n = (self.int)(trimmed, kind.bits()).map_err(|err| invalid(err.to_string()))?;
                Value::I64(n)
                    .coerce_to(ty)
                    .ok_or_else(|| invalid(String::from("out of range")))?
            }
            _ => {
                let n = (self.uint)(trimmed, kind.bits()).map_err(|err| invalid(err.to_string()))?;
                Value::U64(n)
                    .coerce_to(ty)
                    .ok_or_else(|| invalid(String::from("out of range")))?
            }
        };
        Ok(value)
    }

    fn array(&self, text: &str, ty: &Type, info: &ArrayInfo) -> Result<Value, DecodeError> {
        let mut value = ty.zero();
        let elem = info.elem();
        let items = self.array.values(text, Some(info.len()))?;

        if let Some(array) = value.as_array_mut() {
            for (slot, item) in array.items_mut().iter_mut().zip(items) {
                *slot = self.parse(item, elem).map_err(|err| err.within(item, elem))?;
            }
        }
        Ok(value)
    }

    fn map(&self, text: &str, ty: &Type, info: &MapInfo) -> Result<Value, DecodeError> {
        if text.trim() == "<nil>" {
            return Ok(ty.zero());
        }
        let (key_type, value_type) = (info.key(), info.value());

        let mut entries = Vec::new();
        for (key, value) in self.map.key_values(text)? {
            let key = self.parse(key, key_type).map_err(|err| err.within(key, key_type))?;
            let value = self
                .parse(value, value_type)
                .map_err(|err| err.within(value, value_type))?;
            entries.push((key, value));
        }
        Ok(Value::Map(MapValue::new(key_type.clone(), value_type.clone(), entries)))
    }

    fn record(&self, text: &str, ty: &Type, info: &RecordInfo) -> Result<Value, DecodeError> {
        let mut value = ty.zero();

        for (name, field_text) in self.record.key_values(text)? {
            let unknown = || DecodeError::UnknownField {
                field: name.to_string(),
                ty: ty.to_string(),
            };
            let route = info.route(name).ok_or_else(unknown)?;
            let slot = field_slot(&mut value, &route).ok_or_else(unknown)?;

            let field_type = slot.ty();
            *slot = self
                .parse(field_text, &field_type)
                .map_err(|err| err.within(field_text, &field_type))?;
        }
        Ok(value)
    }
}

/// Follows `route` through embedded records, allocating nil embedded pointers.
fn field_slot<'a>(record: &'a mut Value, route: &[usize]) -> Option<&'a mut Value> {
    let mut current = record;
    for &index in route {
        init_value(current);
        current = concrete_mut(current).as_record_mut()?.field_at_mut(index)?;
    }
    Some(current)
}

fn custom(text: &str, ty: &Type, message: String) -> DecodeError {
    DecodeError::Custom {
        text: text.to_string(),
        ty: ty.to_string(),
        message,
    }
}

fn checked(text: &str, ty: &Type, value: Value) -> Result<Value, DecodeError> {
    if ty.accepts(&value) {
        return Ok(value);
    }
    let message = alloc::format!("produced a `{}`", value.ty());
    Err(custom(text, ty, message))
}

impl DecodeText for Decoder {
    type Error = DecodeError;

    #[inline]
    fn decode_type(&self, ty: &Type, text: &str) -> Result<Value, Self::Error> {
        self.parse(text, ty)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parsers: Vec<&str> = self.parsers.keys().map(Type::path).collect();
        parsers.sort_unstable();

        f.debug_struct("Decoder")
            .field("sequence", &self.sequence)
            .field("array", &self.array)
            .field("map", &self.map)
            .field("record", &self.record)
            .field("parsers", &parsers)
            .finish_non_exhaustive()
    }
}
