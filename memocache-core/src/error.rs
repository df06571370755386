use std::fmt;

use thiserror::Error;

/// Which argument of a call produced a key error.
///
/// Key components report [`ArgumentSlot::Unknown`]; the key builder fills in
/// the real slot before the error reaches the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentSlot {
    Unknown,
    Positional(usize),
    Keyword(String),
}

impl fmt::Display for ArgumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentSlot::Unknown => f.write_str("<unknown>"),
            ArgumentSlot::Positional(index) => write!(f, "#{}", index),
            ArgumentSlot::Keyword(name) => write!(f, "`{}`", name),
        }
    }
}

/// Errors raised by the cache itself, as opposed to the wrapped computation.
///
/// # Examples
///
/// ```
/// use memocache_core::{CacheBuilder, CacheError};
///
/// let err = CacheBuilder::lru(0).build(|(x,): &(i32,)| x * 2).err();
/// assert!(matches!(err, Some(CacheError::InvalidConfiguration(_))));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// An argument cannot form a stable, comparable key component.
    #[error("unhashable argument {argument}: {reason}")]
    UnhashableArgument {
        argument: ArgumentSlot,
        reason: String,
    },

    /// The same keyword name was supplied more than once.
    #[error("duplicate keyword argument `{0}`")]
    DuplicateKeyword(String),

    /// The cache was configured with values it cannot honor.
    #[error("invalid cache configuration: {0}")]
    InvalidConfiguration(String),
}

impl CacheError {
    /// Builds an `UnhashableArgument` error whose slot is not known yet.
    pub fn unhashable(reason: impl Into<String>) -> Self {
        CacheError::UnhashableArgument {
            argument: ArgumentSlot::Unknown,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        CacheError::InvalidConfiguration(reason.into())
    }

    /// Attaches an argument slot to an `UnhashableArgument` error that has none.
    ///
    /// Errors that already carry a slot, and other variants, pass through unchanged.
    pub(crate) fn at(self, slot: ArgumentSlot) -> Self {
        match self {
            CacheError::UnhashableArgument {
                argument: ArgumentSlot::Unknown,
                reason,
            } => CacheError::UnhashableArgument {
                argument: slot,
                reason,
            },
            other => other,
        }
    }
}

/// Outcome of a fallible cached call.
///
/// `Cache` errors come from key building; `Call` carries the wrapped
/// computation's own error untouched.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum CallError<E> {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("wrapped call failed: {0}")]
    Call(E),
}

impl<E> CallError<E> {
    /// Returns the wrapped computation's error, if that is what failed.
    pub fn into_call_error(self) -> Option<E> {
        match self {
            CallError::Call(err) => Some(err),
            CallError::Cache(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
