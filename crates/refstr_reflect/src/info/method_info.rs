use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{FunctionInfo, Type};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Receiver

/// How a method receives the record it is called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// Called on a shared view of the record, available on `T` and `&T`.
    Value,
    /// Called on a mutable view of the record, available on pointers only.
    Pointer,
}

// -----------------------------------------------------------------------------
// MethodFn

/// The callable part of a [`MethodInfo`].
#[derive(Clone)]
pub enum MethodFn {
    Value(Arc<dyn Fn(&Value, &[Value]) -> Vec<Value> + Send + Sync>),
    Pointer(Arc<dyn Fn(&mut Value, &[Value]) -> Vec<Value> + Send + Sync>),
}

impl fmt::Debug for MethodFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.pad("MethodFn::Value"),
            Self::Pointer(_) => f.pad("MethodFn::Pointer"),
        }
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A callable member of a record.
///
/// The receiver is not part of [`signature`](MethodInfo::signature).
///
/// # Examples
///
/// ```
/// use refstr_reflect::info::{MethodInfo, Receiver, Type};
/// use refstr_reflect::value::Value;
///
/// let len = MethodInfo::getter("Len", Type::i64(), |_| Value::I64(2));
/// assert!(len.is_getter());
/// assert_eq!(len.receiver(), Receiver::Value);
/// assert_eq!(len.call_ref(&Value::Bool(true), &[]), vec![Value::I64(2)]);
/// ```
#[derive(Clone, Debug)]
pub struct MethodInfo {
    name: Box<str>,
    signature: FunctionInfo,
    func: MethodFn,
}

impl MethodInfo {
    pub fn new(
        name: &str,
        params: impl IntoIterator<Item = Type>,
        results: impl IntoIterator<Item = Type>,
        func: MethodFn,
    ) -> Self {
        Self {
            name: name.into(),
            signature: FunctionInfo::new(params, results),
            func,
        }
    }

    /// A value-receiver method taking nothing and returning `result`.
    pub fn getter(
        name: &str,
        result: Type,
        func: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        let func = MethodFn::Value(Arc::new(move |this, _| vec![func(this)]));
        Self::new(name, [], [result], func)
    }

    /// A pointer-receiver method taking one `param` and returning nothing.
    pub fn setter(
        name: &str,
        param: Type,
        func: impl Fn(&mut Value, Value) + Send + Sync + 'static,
    ) -> Self {
        let func = MethodFn::Pointer(Arc::new(move |this, args| {
            if let Some(arg) = args.first() {
                func(this, arg.clone());
            }
            Vec::new()
        }));
        Self::new(name, [param], [], func)
    }

    /// A pointer-receiver method taking one `param` and returning an `error`.
    pub fn fallible_setter(
        name: &str,
        param: Type,
        func: impl Fn(&mut Value, Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        let func = MethodFn::Pointer(Arc::new(move |this, args| {
            let result = match args.first() {
                Some(arg) => func(this, arg.clone()),
                None => Err(String::from("missing argument")),
            };
            vec![Value::Error(result.err())]
        }));
        Self::new(name, [param], [Type::error()], func)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn receiver(&self) -> Receiver {
        match self.func {
            MethodFn::Value(_) => Receiver::Value,
            MethodFn::Pointer(_) => Receiver::Pointer,
        }
    }

    #[inline]
    pub const fn signature(&self) -> &FunctionInfo {
        &self.signature
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        self.signature.params()
    }

    #[inline]
    pub fn results(&self) -> &[Type] {
        self.signature.results()
    }

    #[inline]
    pub fn is_getter(&self) -> bool {
        self.signature.is_getter()
    }

    #[inline]
    pub fn is_setter(&self) -> bool {
        self.signature.is_setter()
    }

    #[inline]
    pub const fn func(&self) -> &MethodFn {
        &self.func
    }

    /// Calls the method on a record that may be mutated.
    pub fn call(&self, this: &mut Value, args: &[Value]) -> Vec<Value> {
        match &self.func {
            MethodFn::Value(func) => func(this, args),
            MethodFn::Pointer(func) => func(this, args),
        }
    }

    /// Calls the method on a shared record.
    ///
    /// A pointer-receiver method is called on a copy of the record.
    pub fn call_ref(&self, this: &Value, args: &[Value]) -> Vec<Value> {
        match &self.func {
            MethodFn::Value(func) => func(this, args),
            MethodFn::Pointer(func) => {
                let mut copy = this.clone();
                func(&mut copy, args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MethodInfo, Receiver};
    use crate::info::Type;
    use crate::value::Value;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn setter_shapes() {
        let set = MethodInfo::setter("Set", Type::i64(), |this, arg| *this = arg);
        assert!(set.is_setter());
        assert_eq!(set.receiver(), Receiver::Pointer);

        let mut target = Value::I64(0);
        assert!(set.call(&mut target, &[Value::I64(4)]).is_empty());
        assert_eq!(target, Value::I64(4));

        // A shared call works on a copy.
        let shared = Value::I64(1);
        set.call_ref(&shared, &[Value::I64(9)]);
        assert_eq!(shared, Value::I64(1));
    }

    #[test]
    fn fallible_setter() {
        let set = MethodInfo::fallible_setter("Positive", Type::i64(), |this, arg| {
            match arg {
                Value::I64(n) if n > 0 => {
                    *this = Value::I64(n);
                    Ok(())
                }
                _ => Err(String::from("not positive")),
            }
        });
        assert!(set.is_setter());
        assert_eq!(set.results(), &[Type::error()]);

        let mut target = Value::I64(0);
        assert_eq!(set.call(&mut target, &[Value::I64(3)]), vec![Value::Error(None)]);
        assert_eq!(
            set.call(&mut target, &[Value::I64(-3)]),
            vec![Value::Error(Some(String::from("not positive")))]
        );
        assert_eq!(target, Value::I64(3));
    }
}
