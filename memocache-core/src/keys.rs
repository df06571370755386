use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use crate::CacheError;

/// One hashable, comparable component of a cache key.
///
/// Values are captured by value when a key is built, so mutating an argument
/// after the call never changes a stored key. Signed integers of every width
/// share `Int` and unsigned ones share `UInt`, so `1u8` and `1u64` produce the
/// same component while `1u8` and `1i8` do not. Floats are stored by their bit pattern with `-0.0` folded into
/// `0.0`; NaN has no stable equality and is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Unit,
    Bool(bool),
    Int(i128),
    UInt(u128),
    Float(u64),
    Char(char),
    Str(String),
    Option(Option<Box<KeyPart>>),
    Tuple(Vec<KeyPart>),
    Seq(Vec<KeyPart>),
    Set(Vec<KeyPart>),
    Map(Vec<(KeyPart, KeyPart)>),
    Debug {
        type_name: &'static str,
        repr: String,
    },
}

/// Trait for argument types that can become part of a cache key.
///
/// Implement this for your own argument types. For types where the `Debug`
/// output fully identifies the value, [`debug_cacheable_key!`](crate::debug_cacheable_key)
/// provides an implementation.
///
/// # Examples
///
/// ```
/// use memocache_core::{CacheableKey, CacheError, KeyPart};
///
/// struct UserId(u64);
///
/// impl CacheableKey for UserId {
///     fn to_key_part(&self) -> Result<KeyPart, CacheError> {
///         Ok(KeyPart::UInt(self.0 as u128))
///     }
/// }
///
/// assert_eq!(UserId(7).to_key_part(), 7u64.to_key_part());
/// ```
pub trait CacheableKey {
    fn to_key_part(&self) -> Result<KeyPart, CacheError>;
}

/// Implements [`CacheableKey`] for types by way of their `Debug` output.
///
/// The type name is part of the key component, so two types that happen to
/// print the same way do not collide.
///
/// # Examples
///
/// ```
/// use memocache_core::{debug_cacheable_key, CacheableKey};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// debug_cacheable_key!(Point);
///
/// let a = Point { x: 1, y: 2 }.to_key_part().unwrap();
/// let b = Point { x: 1, y: 2 }.to_key_part().unwrap();
/// assert_eq!(a, b);
/// ```
#[macro_export]
macro_rules! debug_cacheable_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::CacheableKey for $ty {
                fn to_key_part(&self) -> ::std::result::Result<$crate::KeyPart, $crate::CacheError> {
                    ::std::result::Result::Ok($crate::KeyPart::Debug {
                        type_name: ::std::any::type_name::<$ty>(),
                        repr: ::std::format!("{:?}", self),
                    })
                }
            }
        )+
    };
}

macro_rules! signed_key {
    ($($ty:ty),*) => {
        $(
            impl CacheableKey for $ty {
                fn to_key_part(&self) -> Result<KeyPart, CacheError> {
                    Ok(KeyPart::Int(*self as i128))
                }
            }
        )*
    };
}

macro_rules! unsigned_key {
    ($($ty:ty),*) => {
        $(
            impl CacheableKey for $ty {
                fn to_key_part(&self) -> Result<KeyPart, CacheError> {
                    Ok(KeyPart::UInt(*self as u128))
                }
            }
        )*
    };
}

signed_key!(i8, i16, i32, i64, i128, isize);
unsigned_key!(u8, u16, u32, u64, u128, usize);

fn float_part(value: f64) -> Result<KeyPart, CacheError> {
    if value.is_nan() {
        return Err(CacheError::unhashable("NaN has no stable equality"));
    }
    // -0.0 == 0.0, so both must produce the same component
    let value = if value == 0.0 { 0.0 } else { value };
    Ok(KeyPart::Float(value.to_bits()))
}

impl CacheableKey for f64 {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        float_part(*self)
    }
}

impl CacheableKey for f32 {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        float_part(*self as f64)
    }
}

impl CacheableKey for () {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        Ok(KeyPart::Unit)
    }
}

impl CacheableKey for bool {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        Ok(KeyPart::Bool(*self))
    }
}

impl CacheableKey for char {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        Ok(KeyPart::Char(*self))
    }
}

impl CacheableKey for str {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        Ok(KeyPart::Str(self.to_owned()))
    }
}

impl CacheableKey for String {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        self.as_str().to_key_part()
    }
}

impl<T: CacheableKey + ?Sized> CacheableKey for &T {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        (**self).to_key_part()
    }
}

impl<T: CacheableKey + ?Sized> CacheableKey for Box<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        (**self).to_key_part()
    }
}

impl<T: CacheableKey + ?Sized> CacheableKey for Rc<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        (**self).to_key_part()
    }
}

impl<T: CacheableKey + ?Sized> CacheableKey for Arc<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        (**self).to_key_part()
    }
}

impl<T: CacheableKey> CacheableKey for Option<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        match self {
            Some(value) => Ok(KeyPart::Option(Some(Box::new(value.to_key_part()?)))),
            None => Ok(KeyPart::Option(None)),
        }
    }
}

fn seq_parts<'a, T, I>(items: I) -> Result<Vec<KeyPart>, CacheError>
where
    T: CacheableKey + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(|item| item.to_key_part()).collect()
}

impl<T: CacheableKey> CacheableKey for [T] {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        Ok(KeyPart::Seq(seq_parts(self)?))
    }
}

impl<T: CacheableKey> CacheableKey for Vec<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        self.as_slice().to_key_part()
    }
}

impl<T: CacheableKey, const N: usize> CacheableKey for [T; N] {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        self.as_slice().to_key_part()
    }
}

// Unordered containers are canonicalized by sorting their components.

impl<T: CacheableKey, S> CacheableKey for HashSet<T, S> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        let mut parts = seq_parts(self)?;
        parts.sort();
        Ok(KeyPart::Set(parts))
    }
}

impl<T: CacheableKey> CacheableKey for BTreeSet<T> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        let mut parts = seq_parts(self)?;
        parts.sort();
        Ok(KeyPart::Set(parts))
    }
}

fn map_parts<'a, K, V, I>(entries: I) -> Result<KeyPart, CacheError>
where
    K: CacheableKey + 'a,
    V: CacheableKey + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut parts = entries
        .into_iter()
        .map(|(k, v)| Ok((k.to_key_part()?, v.to_key_part()?)))
        .collect::<Result<Vec<_>, CacheError>>()?;
    parts.sort();
    Ok(KeyPart::Map(parts))
}

impl<K: CacheableKey, V: CacheableKey, S> CacheableKey for HashMap<K, V, S> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        map_parts(self)
    }
}

impl<K: CacheableKey, V: CacheableKey> CacheableKey for BTreeMap<K, V> {
    fn to_key_part(&self) -> Result<KeyPart, CacheError> {
        map_parts(self)
    }
}

macro_rules! tuple_key {
    ($($name:ident),+) => {
        impl<$($name: CacheableKey),+> CacheableKey for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_key_part(&self) -> Result<KeyPart, CacheError> {
                let ($($name,)+) = self;
                Ok(KeyPart::Tuple(vec![$($name.to_key_part()?),+]))
            }
        }
    };
}

tuple_key!(A);
tuple_key!(A, B);
tuple_key!(A, B, C);
tuple_key!(A, B, C, D);
tuple_key!(A, B, C, D, E);
tuple_key!(A, B, C, D, E, F);
tuple_key!(A, B, C, D, E, F, G);
tuple_key!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Celsius(i32);

    #[derive(Debug)]
    struct Fahrenheit(i32);

    debug_cacheable_key!(Celsius, Fahrenheit);

    #[test]
    fn test_integer_widths_share_components() {
        assert_eq!(1u8.to_key_part(), 1u64.to_key_part());
        assert_eq!((-3i8).to_key_part(), (-3i64).to_key_part());
        assert_ne!(1i32.to_key_part(), 2i32.to_key_part());
    }

    #[test]
    fn test_nan_is_unhashable() {
        let err = f64::NAN.to_key_part().unwrap_err();
        assert!(matches!(err, CacheError::UnhashableArgument { .. }));
        assert!(f32::NAN.to_key_part().is_err());
    }

    #[test]
    fn test_signed_zero_is_one_component() {
        assert_eq!((-0.0f64).to_key_part(), 0.0f64.to_key_part());
        assert_ne!(1.5f64.to_key_part(), 2.5f64.to_key_part());
    }

    #[test]
    fn test_strings_and_slices() {
        assert_eq!("abc".to_key_part(), String::from("abc").to_key_part());
        assert_eq!(vec![1, 2, 3].to_key_part(), [1, 2, 3].to_key_part());
        assert_ne!(vec![1, 2].to_key_part(), (1, 2).to_key_part());
    }

    #[test]
    fn test_nested_nan_propagates() {
        let values = vec![Some(1.0), Some(f64::NAN)];
        assert!(values.to_key_part().is_err());
    }

    #[test]
    fn test_unordered_containers_are_canonical() {
        let a: HashSet<i32> = [3, 1, 2].into_iter().collect();
        let b: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(a.to_key_part(), b.to_key_part());

        let mut m1 = HashMap::new();
        m1.insert("x", 1);
        m1.insert("y", 2);
        let mut m2 = HashMap::new();
        m2.insert("y", 2);
        m2.insert("x", 1);
        assert_eq!(m1.to_key_part(), m2.to_key_part());
    }

    #[test]
    fn test_debug_keys_include_type_name() {
        assert_eq!(Celsius(10).to_key_part(), Celsius(10).to_key_part());
        assert_ne!(Celsius(10).to_key_part(), Fahrenheit(10).to_key_part());
    }

    #[test]
    fn test_option_distinguishes_none() {
        assert_ne!(Some(()).to_key_part(), None::<()>.to_key_part());
        assert_ne!(None::<i32>.to_key_part(), ().to_key_part());
    }
}
