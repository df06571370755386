//! # Memocache Core
//!
//! Core types of the Memocache function-result caching library.
//!
//! This crate turns the arguments of a call into a [`CacheKey`], stores results
//! under those keys according to a retention policy, and wires a wrapped
//! function to its store.
//!
//! ## Features
//!
//! - **Key building**: Positional and keyword arguments become a hashable key;
//!   keyword order never matters, positional order always does
//! - **Policies**: Unbounded memoization, creation-time TTL, LRU and LFU
//! - **Failure safety**: A failed computation neither stores nor evicts anything
//! - **Thread safety**: Stores are guarded by `parking_lot` locks
//! - **Statistics**: Optional hit/miss/eviction counters (`stats` feature)
//!
//! ## Module Organization
//!
//! - [`keys`] - Key components and the [`CacheableKey`] trait
//! - [`key_builder`] - [`build_key`], [`CacheKey`] and [`CallArgs`]
//! - [`store`] - One store per policy plus the runtime-selected [`PolicyStore`]
//! - [`shared_store`] - Lock, clock, statistics and logging around a store
//! - [`cached_fn`] - [`CacheBuilder`] and the [`CachedFn`] wrapper
//! - [`config`] - [`CacheConfig`] and [`Concurrency`]
//! - [`clock`] - Time source used for TTL expiry
//!
//! ## Example
//!
//! ```
//! use memocache_core::CacheBuilder;
//!
//! let fib = CacheBuilder::unbounded()
//!     .build(|(n,): &(u64,)| (1..=*n).product::<u64>())
//!     .unwrap();
//!
//! assert_eq!(fib.call((5,)).unwrap(), 120);
//! assert_eq!(fib.len(), 1);
//! ```
pub mod cache_entry;
pub mod cached_fn;
pub mod clock;
pub mod config;
mod error;
pub mod eviction_policy;
pub mod key_builder;
pub mod keys;
pub mod shared_store;
pub mod store;
pub mod utils;

#[cfg(feature = "stats")]
mod stats;

#[cfg(feature = "stats")]
pub mod stats_registry;

pub use cache_entry::CacheEntry;
pub use cached_fn::{CacheBuilder, CachedFn};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{CacheConfig, Concurrency};
pub use error::{ArgumentSlot, CacheError, CallError, Result};
pub use eviction_policy::EvictionPolicy;
pub use key_builder::{build_key, CacheKey, CallArgs};
pub use keys::{CacheableKey, KeyPart};
pub use shared_store::SharedStore;
pub use store::{
    Admission, CacheStore, LfuStore, LruStore, PolicyStore, TtlStore, UnboundedStore,
};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
