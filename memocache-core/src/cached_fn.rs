use std::convert::Infallible;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    CacheConfig, CacheError, CacheKey, CallArgs, CallError, Clock, Concurrency, EvictionPolicy,
    SharedStore,
};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// Builder for a cached callable.
///
/// Pick the policy with one of the constructors, optionally adjust the clock,
/// the name or the concurrency mode, then wrap a function with
/// [`build`](Self::build) or [`try_build`](Self::try_build). The
/// configuration is validated when the wrapper is built, before any call.
///
/// # Examples
///
/// ```
/// use memocache_core::CacheBuilder;
///
/// let add = CacheBuilder::lru(2).build(|(a, b): &(i32, i32)| a + b).unwrap();
///
/// assert_eq!(add.call((1, 2)).unwrap(), 3);
/// assert_eq!(add.call((3, 4)).unwrap(), 7);
/// assert_eq!(add.call((5, 6)).unwrap(), 11);
/// assert_eq!(add.len(), 2);
/// assert!(!add.contains(&(1, 2)).unwrap());
/// ```
pub struct CacheBuilder {
    config: CacheConfig,
    clock: Option<Arc<dyn Clock>>,
    name: Option<String>,
}

impl CacheBuilder {
    /// Every distinct call is kept forever.
    pub fn unbounded() -> Self {
        Self::from_config(CacheConfig::unbounded())
    }

    /// Results are valid for `ttl` after they were computed.
    pub fn ttl(ttl: Duration) -> Self {
        Self::from_config(CacheConfig::ttl(ttl))
    }

    /// At most `maxsize` results, least recently used evicted first.
    pub fn lru(maxsize: usize) -> Self {
        Self::from_config(CacheConfig::lru(maxsize))
    }

    /// At most `maxsize` results, least frequently used evicted first.
    pub fn lfu(maxsize: usize) -> Self {
        Self::from_config(CacheConfig::lfu(maxsize))
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            clock: None,
            name: None,
        }
    }

    /// Reads time from `clock` instead of the system clock.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Names the cache in log events and in the stats registry.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn concurrency(mut self, concurrency: Concurrency) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Shorthand for `concurrency(Concurrency::Serialized)`.
    pub fn serialized(self) -> Self {
        self.concurrency(Concurrency::Serialized)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Builds the shared store alone, for callers that drive it themselves.
    pub fn build_store<R>(self) -> Result<SharedStore<R>, CacheError> {
        let mut store = SharedStore::from_config(&self.config)?;
        if let Some(clock) = self.clock {
            store = store.with_clock(clock);
        }
        if let Some(name) = self.name {
            store = store.with_name(name);
        }
        Ok(store)
    }

    /// Wraps an infallible function.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when the configuration is invalid.
    #[allow(clippy::type_complexity)]
    pub fn build<A, R, F>(
        self,
        func: F,
    ) -> Result<CachedFn<A, R, Infallible, impl Fn(&A) -> Result<R, Infallible>>, CacheError>
    where
        A: CallArgs,
        R: Clone,
        F: Fn(&A) -> R,
    {
        self.try_build(move |args: &A| Ok::<R, Infallible>(func(args)))
    }

    /// Wraps a fallible function. Only `Ok` results are cached; an `Err` is
    /// handed back to the caller and leaves the cache unchanged.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when the configuration is invalid.
    pub fn try_build<A, R, E, F>(self, func: F) -> Result<CachedFn<A, R, E, F>, CacheError>
    where
        A: CallArgs,
        R: Clone,
        F: Fn(&A) -> Result<R, E>,
    {
        Ok(CachedFn {
            store: self.build_store()?,
            func,
            _args: PhantomData,
        })
    }
}

/// A function bundled with its own result store.
///
/// Calls with equal argument keys share one stored result, subject to the
/// policy the wrapper was built with. The store lives exactly as long as the
/// wrapper.
///
/// `A` is the argument bundle: a tuple of [`CacheableKey`](crate::CacheableKey)
/// values for positional arguments, or any [`CallArgs`] type.
pub struct CachedFn<A, R, E, F> {
    store: SharedStore<R>,
    func: F,
    _args: PhantomData<fn(&A) -> Result<R, E>>,
}

impl<A, R, E, F> CachedFn<A, R, E, F>
where
    A: CallArgs,
    R: Clone,
    F: Fn(&A) -> Result<R, E>,
{
    /// Invokes the wrapped function through the cache.
    ///
    /// # Errors
    ///
    /// * [`CallError::Cache`] when the key cannot be built. The function is
    ///   not called and the cache is not touched.
    /// * [`CallError::Call`] with the function's own error. Nothing is stored
    ///   and nothing is evicted.
    pub fn try_call(&self, args: A) -> Result<R, CallError<E>> {
        let key = args.cache_key()?;
        self.store
            .get_or_try_insert_with(key, || (self.func)(&args))
            .map_err(CallError::Call)
    }

    /// Whether a call with `args` would currently be answered from the cache.
    pub fn contains(&self, args: &A) -> Result<bool, CacheError> {
        Ok(self.store.contains(&args.cache_key()?))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Keys currently stored, next victim first for bounded policies.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.store.keys()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.store.policy()
    }

    pub fn store(&self) -> &SharedStore<R> {
        &self.store
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &Arc<CacheStats> {
        self.store.stats()
    }
}

impl<A, R, F> CachedFn<A, R, Infallible, F>
where
    A: CallArgs,
    R: Clone,
    F: Fn(&A) -> Result<R, Infallible>,
{
    /// Invokes an infallible wrapped function through the cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::UnhashableArgument`] or [`CacheError::DuplicateKeyword`]
    /// when the key cannot be built.
    pub fn call(&self, args: A) -> Result<R, CacheError> {
        self.try_call(args).map_err(|err| match err {
            CallError::Cache(err) => err,
            CallError::Call(never) => match never {},
        })
    }
}

impl<A, R, E, F> std::fmt::Debug for CachedFn<A, R, E, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFn")
            .field("name", &self.store.name())
            .field("concurrency", &self.store.concurrency())
            .finish_non_exhaustive()
    }
}
