use std::collections::BTreeMap;
use std::fmt;

use crate::{ArgumentSlot, CacheError, CacheableKey, KeyPart};

/// Identity of one call: its positional components in order plus its keyword
/// components as a set keyed by name.
///
/// Two keys are equal iff the positional sequences are element-wise equal and
/// the keyword sets are equal, regardless of the order keywords were supplied in.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    positional: Vec<KeyPart>,
    keyword: BTreeMap<String, KeyPart>,
}

impl CacheKey {
    pub fn positional(&self) -> &[KeyPart] {
        &self.positional
    }

    pub fn keyword(&self, name: &str) -> Option<&KeyPart> {
        self.keyword.get(name)
    }

    pub fn keyword_len(&self) -> usize {
        self.keyword.len()
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("CacheKey");
        for part in &self.positional {
            tuple.field(part);
        }
        if !self.keyword.is_empty() {
            tuple.field(&self.keyword);
        }
        tuple.finish()
    }
}

/// Builds the cache key for one invocation.
///
/// # Errors
///
/// * [`CacheError::UnhashableArgument`] naming the failing slot when an argument
///   cannot produce a key component
/// * [`CacheError::DuplicateKeyword`] when a keyword name appears twice
///
/// # Examples
///
/// ```
/// use memocache_core::build_key;
///
/// let a = build_key(&[&1, &"x"], &[("limit", &10), ("lang", &"en")]).unwrap();
/// let b = build_key(&[&1, &"x"], &[("lang", &"en"), ("limit", &10)]).unwrap();
/// assert_eq!(a, b);
///
/// let swapped = build_key(&[&"x", &1], &[("limit", &10), ("lang", &"en")]).unwrap();
/// assert_ne!(a, swapped);
/// ```
pub fn build_key(
    positional: &[&dyn CacheableKey],
    keyword: &[(&str, &dyn CacheableKey)],
) -> Result<CacheKey, CacheError> {
    let positional = positional
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.to_key_part()
                .map_err(|err| err.at(ArgumentSlot::Positional(index)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut keywords = BTreeMap::new();
    for (name, arg) in keyword {
        let part = arg
            .to_key_part()
            .map_err(|err| err.at(ArgumentSlot::Keyword((*name).to_string())))?;
        if keywords.insert((*name).to_string(), part).is_some() {
            return Err(CacheError::DuplicateKeyword((*name).to_string()));
        }
    }

    Ok(CacheKey {
        positional,
        keyword: keywords,
    })
}

/// The argument bundle a cached callable is invoked with.
///
/// Tuples of [`CacheableKey`] values are positional argument lists. Types
/// with named fields implement this directly to pass keyword arguments:
///
/// ```
/// use memocache_core::{build_key, CacheError, CacheKey, CallArgs};
///
/// struct Search {
///     query: String,
///     limit: usize,
///     lang: Option<String>,
/// }
///
/// impl CallArgs for Search {
///     fn cache_key(&self) -> Result<CacheKey, CacheError> {
///         build_key(&[&self.query], &[("limit", &self.limit), ("lang", &self.lang)])
///     }
/// }
/// ```
pub trait CallArgs {
    fn cache_key(&self) -> Result<CacheKey, CacheError>;
}

impl CallArgs for () {
    fn cache_key(&self) -> Result<CacheKey, CacheError> {
        build_key(&[], &[])
    }
}

impl CallArgs for CacheKey {
    fn cache_key(&self) -> Result<CacheKey, CacheError> {
        Ok(self.clone())
    }
}

macro_rules! tuple_args {
    ($($name:ident),+) => {
        impl<$($name: CacheableKey),+> CallArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn cache_key(&self) -> Result<CacheKey, CacheError> {
                let ($($name,)+) = self;
                build_key(&[$($name as &dyn CacheableKey),+], &[])
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A, B);
tuple_args!(A, B, C);
tuple_args!(A, B, C, D);
tuple_args!(A, B, C, D, E);
tuple_args!(A, B, C, D, E, F);
tuple_args!(A, B, C, D, E, F, G);
tuple_args!(A, B, C, D, E, F, G, H);
