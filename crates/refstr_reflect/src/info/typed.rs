use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use refstr_utils::hash::HashMap;

use crate::info::Type;

/// A Rust type with a known [`Type`].
///
/// Implemented for scalars, `String` and the standard containers the
/// type model describes, so `Type::of::<Vec<i64>>()` needs no builder.
/// Records have no Rust counterpart and are built with
/// [`RecordInfo::builder`](crate::info::RecordInfo::builder).
pub trait Typed {
    fn ty() -> Type;
}

macro_rules! impl_scalar_typed {
    ($($rust:ty => $ctor:ident),* $(,)?) => {
        $(
            impl Typed for $rust {
                #[inline]
                fn ty() -> Type {
                    Type::$ctor()
                }
            }
        )*
    };
}

impl_scalar_typed! {
    bool => bool,
    i8 => i8,
    i16 => i16,
    i32 => i32,
    i64 => i64,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    f32 => f32,
    f64 => f64,
    char => char,
    String => string,
}

impl<T: Typed> Typed for Vec<T> {
    fn ty() -> Type {
        Type::sequence(T::ty())
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn ty() -> Type {
        Type::array(T::ty(), N)
    }
}

impl<T: Typed> Typed for Option<Box<T>> {
    fn ty() -> Type {
        Type::pointer(T::ty())
    }
}

impl<K: Typed, V: Typed, S> Typed for HashMap<K, V, S> {
    fn ty() -> Type {
        Type::map(K::ty(), V::ty())
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Type;
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use refstr_utils::hash::HashMap;

    #[test]
    fn typed_paths() {
        assert_eq!(Type::of::<String>(), Type::string());
        assert_eq!(Type::of::<[i32; 2]>(), Type::array(Type::i32(), 2));
        assert_eq!(Type::of::<Option<Box<f32>>>().path(), "Option<Box<f32>>");
        assert_eq!(
            Type::of::<HashMap<String, Vec<bool>>>().path(),
            "HashMap<String, Vec<bool>>"
        );
    }
}
