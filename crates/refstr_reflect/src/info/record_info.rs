use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use refstr_utils::hash::HashMap;

use crate::info::{MethodInfo, Type};
use crate::value::Value;

/// Parses text into a zero record of its own type, tried before any
/// generic decoding.
pub type UnmarshalFn = Arc<dyn Fn(&mut Value, &str) -> Result<(), String> + Send + Sync>;

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(0);

// -----------------------------------------------------------------------------
// FieldInfo

/// A record field.
///
/// An embedded field is named after the record it embeds, and its own
/// fields and methods are promoted into the embedding record.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: Box<str>,
    ty: Type,
    embedded: bool,
}

impl FieldInfo {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }
}

// -----------------------------------------------------------------------------
// RecordInfo

/// A container for compile-time named record info.
#[derive(Clone)]
pub struct RecordInfo {
    id: u64,
    name: Box<str>,
    fields: Box<[FieldInfo]>,
    field_indices: HashMap<Box<str>, usize>,
    methods: Box<[MethodInfo]>,
    unmarshal: Option<UnmarshalFn>,
}

impl RecordInfo {
    /// Starts building a record named `name`.
    ///
    /// The name is the type path. Two records built with the same name
    /// still are different types.
    #[inline]
    pub fn builder(name: &str) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            unmarshal: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of this record among all records built so far.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the declared field with the given name, promoted fields excluded.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        let index = *self.field_indices.get(name)?;
        self.fields.get(index)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    /// Returns the methods in declaration order.
    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| method.name() == name)
    }

    #[inline]
    pub fn unmarshal(&self) -> Option<&UnmarshalFn> {
        self.unmarshal.as_ref()
    }

    /// Returns the field indices leading to the field `name`, looking
    /// through embedded records.
    ///
    /// The shallowest match wins. Two matches at the same depth are
    /// ambiguous and yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use refstr_reflect::info::{RecordInfo, Type};
    ///
    /// let name = RecordInfo::builder("RouteName").field("First", Type::string()).build();
    /// let person = RecordInfo::builder("RoutePerson")
    ///     .field("Age", Type::i64())
    ///     .embed(name)
    ///     .build();
    ///
    /// let info = person.as_record().unwrap();
    /// assert_eq!(info.route("Age"), Some(vec![0]));
    /// assert_eq!(info.route("First"), Some(vec![1, 0]));
    /// assert_eq!(info.route("Last"), None);
    /// ```
    pub fn route(&self, name: &str) -> Option<Vec<usize>> {
        let mut level: Vec<(Vec<usize>, &RecordInfo)> = vec![(Vec::new(), self)];

        while !level.is_empty() {
            let mut found: Option<Vec<usize>> = None;
            let mut ambiguous = false;
            let mut next = Vec::new();

            for (prefix, info) in &level {
                for (index, field) in info.fields.iter().enumerate() {
                    let mut route = prefix.clone();
                    route.push(index);

                    if field.name() == name {
                        ambiguous |= found.is_some();
                        found = Some(route.clone());
                    }
                    if field.is_embedded()
                        && let Some(inner) = field.ty().concrete().as_record()
                    {
                        next.push((route, inner));
                    }
                }
            }

            if ambiguous {
                return None;
            }
            if found.is_some() {
                return found;
            }
            level = next;
        }

        None
    }
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("unmarshal", &self.unmarshal.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RecordBuilder

/// Builds a record [`Type`], see [`RecordInfo::builder`].
pub struct RecordBuilder {
    name: Box<str>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    unmarshal: Option<UnmarshalFn>,
}

impl RecordBuilder {
    /// Adds a named field.
    pub fn field(mut self, name: &str, ty: Type) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            ty,
            embedded: false,
        });
        self
    }

    /// Embeds a record, or a pointer to one, named after the record.
    pub fn embed(mut self, ty: Type) -> Self {
        let name: Box<str> = match ty.concrete().as_record() {
            Some(info) => info.name().into(),
            None => ty.path().into(),
        };
        self.fields.push(FieldInfo {
            name,
            ty,
            embedded: true,
        });
        self
    }

    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Shorthand for [`MethodInfo::getter`].
    pub fn getter(
        self,
        name: &str,
        result: Type,
        func: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.method(MethodInfo::getter(name, result, func))
    }

    /// Shorthand for [`MethodInfo::setter`].
    pub fn setter(
        self,
        name: &str,
        param: Type,
        func: impl Fn(&mut Value, Value) + Send + Sync + 'static,
    ) -> Self {
        self.method(MethodInfo::setter(name, param, func))
    }

    /// Sets the hook that parses this record from text.
    ///
    /// The hook receives the zero value of the record to fill in.
    pub fn unmarshal_text(
        mut self,
        func: impl Fn(&mut Value, &str) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.unmarshal = Some(Arc::new(func));
        self
    }

    /// Finishes the record and returns its type.
    pub fn build(self) -> Type {
        let mut field_indices =
            HashMap::with_capacity_and_hasher(self.fields.len(), Default::default());
        for (index, field) in self.fields.iter().enumerate() {
            field_indices.entry(field.name.clone()).or_insert(index);
        }
        Type::record(RecordInfo {
            id: NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed),
            name: self.name,
            fields: self.fields.into_boxed_slice(),
            field_indices,
            methods: self.methods.into_boxed_slice(),
            unmarshal: self.unmarshal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RecordInfo;
    use crate::info::Type;
    use alloc::vec;

    #[test]
    fn fields_in_order() {
        let ty = RecordInfo::builder("OrderPoint")
            .field("Y", Type::i64())
            .field("X", Type::i64())
            .build();
        let info = ty.as_record().unwrap();

        let names: alloc::vec::Vec<&str> = info.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Y", "X"]);
        assert_eq!(info.index_of("X"), Some(1));
        assert!(info.field("Z").is_none());
        assert_eq!(ty.path(), "OrderPoint");
    }

    #[test]
    fn embed_pointer_named_after_record() {
        let base = RecordInfo::builder("EmbedBase").field("ID", Type::i64()).build();
        let ty = RecordInfo::builder("EmbedOuter")
            .embed(Type::pointer(base))
            .build();
        let info = ty.as_record().unwrap();

        let field = info.field("EmbedBase").unwrap();
        assert!(field.is_embedded());
        assert_eq!(info.route("ID"), Some(vec![0, 0]));
    }

    #[test]
    fn ambiguous_route() {
        let a = RecordInfo::builder("AmbA").field("N", Type::i64()).build();
        let b = RecordInfo::builder("AmbB").field("N", Type::i64()).build();
        let ty = RecordInfo::builder("AmbOuter").embed(a).embed(b).build();

        assert_eq!(ty.as_record().unwrap().route("N"), None);
        assert_eq!(ty.as_record().unwrap().route("AmbB"), Some(vec![1]));
    }
}
