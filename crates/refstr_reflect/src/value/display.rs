use core::fmt::{self, Display, Formatter, Write};

use crate::value::{MapValue, Value};

fn write_items<'a>(
    f: &mut Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(']')
}

fn write_map(f: &mut Formatter<'_>, map: &MapValue) -> fmt::Result {
    f.write_str("map[")?;
    for (index, key) in map.sorted_keys().into_iter().enumerate() {
        if index > 0 {
            f.write_char(' ')?;
        }
        match map.get(key) {
            Some(value) => write!(f, "{key}:{value}")?,
            None => write!(f, "{key}:<nil>")?,
        }
    }
    f.write_char(']')
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => Display::fmt(b, f),
            Self::I8(n) => Display::fmt(n, f),
            Self::I16(n) => Display::fmt(n, f),
            Self::I32(n) => Display::fmt(n, f),
            Self::I64(n) => Display::fmt(n, f),
            Self::U8(n) => Display::fmt(n, f),
            Self::U16(n) => Display::fmt(n, f),
            Self::U32(n) => Display::fmt(n, f),
            Self::U64(n) => Display::fmt(n, f),
            Self::F32(n) => Display::fmt(n, f),
            Self::F64(n) => Display::fmt(n, f),
            Self::Char(c) => Display::fmt(c, f),
            Self::String(s) => f.pad(s),
            Self::Error(Some(message)) => f.pad(message),
            Self::Error(None) => f.pad("<nil>"),
            Self::Sequence(seq) => write_items(f, "[", seq.items()),
            Self::Array(array) => write_items(f, "[", array.items()),
            Self::Map(map) => write_map(f, map),
            Self::Pointer(ptr) => match ptr.get() {
                Some(inner) => write!(f, "&{inner}"),
                None => f.pad("<nil>"),
            },
            Self::Func(func) if func.is_nil() => f.pad("<nil>"),
            Self::Func(_) => f.pad("<func>"),
            Self::Record(record) => {
                f.write_char('{')?;
                let names = record.info().map(|info| info.fields()).unwrap_or_default();
                for (index, (field, value)) in names.iter().zip(record.fields()).enumerate() {
                    if index > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{}:{value}", field.name())?;
                }
                f.write_char('}')
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{RecordInfo, Type};
    use crate::value::{FuncValue, MapValue, PointerValue, SequenceValue, Value};
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn canonical_text() {
        assert_eq!(Value::F32(0.34).to_string(), "0.34");
        assert_eq!(Value::F64(5.0).to_string(), "5");
        assert_eq!(Value::Error(None).to_string(), "<nil>");

        let seq = SequenceValue::new(Type::bool(), vec![Value::Bool(true), Value::Bool(false)]);
        assert_eq!(Value::Sequence(seq).to_string(), "[true false]");
        assert_eq!(Value::Sequence(SequenceValue::nil(Type::bool())).to_string(), "[]");

        let map = MapValue::new(
            Type::string(),
            Type::i64(),
            [
                (Value::from("b"), Value::I64(5)),
                (Value::from("a"), Value::I64(2)),
            ],
        );
        assert_eq!(Value::Map(map).to_string(), "map[a:2 b:5]");

        let ptr = PointerValue::new(Type::i64(), Value::I64(34));
        assert_eq!(Value::Pointer(ptr).to_string(), "&34");
        assert_eq!(Value::Pointer(PointerValue::nil(Type::i64())).to_string(), "<nil>");

        let func = FuncValue::new(Type::getter(Type::i64()), |_| vec![Value::I64(1)]);
        assert_eq!(Value::Func(func).to_string(), "<func>");
    }

    #[test]
    fn nested_record_text() {
        let name = RecordInfo::builder("TextName")
            .field("First", Type::string())
            .build();
        let person = RecordInfo::builder("TextPerson")
            .embed(name)
            .field("Tags", Type::sequence(Type::string()))
            .build();

        let mut value = person.zero();
        let record = value.as_record_mut().unwrap();
        *record.field_mut("Tags").unwrap() = Value::Sequence(SequenceValue::new(
            Type::string(),
            vec![Value::from("a"), Value::from("b")],
        ));

        assert_eq!(value.to_string(), "{TextName:{First:} Tags:[a b]}");
    }
}
