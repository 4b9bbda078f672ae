#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use refstr_decode as decode;
pub use refstr_path as path;
pub use refstr_reflect as reflect;
pub use refstr_utils as utils;

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use crate::decode::{DecodeError, Decoder};
    use crate::path::{NodeCache, Path, PathError, Reference};
    use crate::reflect::info::{RecordInfo, Type};
    use crate::reflect::value::Value;

    fn text_field(this: &Value, name: &str) -> String {
        let field = this.as_record().and_then(|r| r.field(name));
        String::from(field.and_then(Value::as_str).unwrap_or_default())
    }

    /// `Root { ByName: HashMap<String, Person> }`, `Person { Name: Name, Age: u8 }`
    /// and `Name { First, Last }` with a derived `Full`.
    fn directory() -> Type {
        let name = RecordInfo::builder("Name")
            .field("First", Type::string())
            .field("Last", Type::string())
            .getter("Full", Type::string(), |this| {
                Value::String(text_field(this, "Last") + ", " + &text_field(this, "First"))
            })
            .build();
        let person = RecordInfo::builder("Person")
            .field("Name", name)
            .field("Age", Type::u8())
            .build();
        RecordInfo::builder("Root")
            .field("ByName", Type::map(Type::string(), person))
            .build()
    }

    #[test]
    fn vivify_then_derive() {
        let ty = directory();
        let cache = Arc::new(NodeCache::new());
        let base = Path::with_cache(ty.clone(), cache);
        let mut root = ty.zero();

        let first = base.nexts(["ByName", "John", "Name", "First"]).unwrap();
        first.set(&mut root, Value::from("John")).unwrap();
        let last = base.nexts(["ByName", "John", "Name", "Last"]).unwrap();
        last.set(&mut root, Value::from("Doe")).unwrap();

        let full = base.nexts(["ByName", "John", "Name", "Full"]).unwrap();
        assert_eq!(full.get(&root).unwrap().as_ref(), &Value::from("Doe, John"));
        assert_eq!(
            root.to_string(),
            "{ByName:map[John:{Name:{First:John Last:Doe} Age:0}]}"
        );

        // Derived values cannot be written.
        let err = full.set(&mut root, Value::from("x")).unwrap_err();
        assert!(matches!(err, PathError::NotWritable { .. }));
    }

    #[test]
    fn set_from_text() {
        let ty = directory();
        let decoder = Decoder::new().unwrap();
        let mut root = ty.zero();

        let mut jane = Reference::new(&mut root).nexts(["ByName", "Jane"]).unwrap();
        jane.set_text("{Name:{First:Jane Last:Roe} Age:41}", &decoder).unwrap();

        let mut age = jane.by_mut().next("Age").unwrap();
        age.set_text("42", &decoder).unwrap();

        let err = age.set_text("-1", &decoder).unwrap_err();
        let PathError::Decode(source) = err else {
            panic!("expected a decode error");
        };
        assert!(source.downcast_ref::<DecodeError>().is_some());

        assert_eq!(
            root.to_string(),
            "{ByName:map[Jane:{Name:{First:Jane Last:Roe} Age:42}]}"
        );
    }

    #[test]
    fn decoded_maps_and_records() {
        let counts = Type::map(Type::string(), Type::i64());
        let value = crate::decode::decode_type(&counts, "a:2, b:5, c:6").unwrap();
        assert_eq!(value.to_string(), "map[a:2 b:5 c:6]");

        let point = RecordInfo::builder("Point")
            .field("X", Type::f32())
            .field("Y", Type::f32())
            .build();
        let braced = crate::decode::parse("{X:2 Y:5.4}", &point).unwrap();
        let bare = crate::decode::parse("X:2, Y:5.4", &point).unwrap();
        assert_eq!(braced, bare);

        let x = Path::new(point).next("X").unwrap();
        assert_eq!(x.get(&braced).unwrap().as_ref(), &Value::F32(2.0));
    }

    #[test]
    fn listing_and_walking() {
        let ty = directory();
        let decoder = Decoder::new().unwrap();
        let text = "{ByName:map[b:{Age:2} a:{Age:1}]}";
        let root = decoder.parse(text, &ty).unwrap();

        let people = Reference::new(&root).next("ByName").unwrap();
        let nodes = people.next_nodes().unwrap();
        assert_eq!(nodes.key_strings(), ["a", "b"]);

        let ages: Vec<String> = nodes
            .iter()
            .filter_map(|node| {
                let age = people.by_ref().next(node.key()?.clone())?.next("Age")?;
                Some(age.get().ok()?.to_string())
            })
            .collect();
        assert_eq!(ages, ["1", "2"]);
    }
}
