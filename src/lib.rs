//! # Memocache
//!
//! Function-result caching for Rust: wrap a function once and repeated calls
//! with equal arguments are answered from a store instead of recomputing.
//!
//! ## Features
//!
//! - **Two surfaces**: the `#[cache]` attribute rewrites a function in place,
//!   [`CacheBuilder`] wraps a closure at runtime
//! - **Policies**: unbounded memoization, creation-time TTL, LRU and LFU
//! - **Failure safety**: errors are never cached and never trigger an eviction
//! - **Structured keys**: positional order matters, keyword order does not;
//!   NaN and other unhashable arguments are rejected instead of mis-keyed
//! - **Thread-safe**: one store per cached function, shared by all threads
//!
//! ## Quick Start
//!
//! ```rust
//! use memocache::cache;
//!
//! #[cache]
//! fn fibonacci(n: u64) -> u64 {
//!     if n <= 1 {
//!         return n;
//!     }
//!     fibonacci(n - 1) + fibonacci(n - 2)
//! }
//!
//! assert_eq!(fibonacci(80), 23416728348467685);
//! ```
//!
//! ## Bounded Caches
//!
//! ```rust
//! use memocache::cache;
//!
//! #[cache(policy = "lru", maxsize = 2)]
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! #[cache(policy = "lfu", maxsize = 128, name = "word_lengths")]
//! fn word_length(word: &str) -> usize {
//!     word.chars().count()
//! }
//!
//! assert_eq!(add(1, 2), 3);
//! assert_eq!(word_length("héllo"), 5);
//! ```
//!
//! ## Error Handling
//!
//! Functions returning `Result<T, E>` only cache successful results:
//!
//! ```rust
//! use memocache::cache;
//!
//! #[cache(ttl = 30)]
//! fn divide(a: i32, b: i32) -> Result<i32, String> {
//!     if b == 0 {
//!         Err("Division by zero".to_string())
//!     } else {
//!         Ok(a / b)
//!     }
//! }
//!
//! // Ok results are cached
//! assert_eq!(divide(10, 2), Ok(5));
//! // Err results are NOT cached
//! assert!(divide(10, 0).is_err());
//! ```
//!
//! ## Runtime Builder
//!
//! ```rust
//! use memocache::{CacheBuilder, MockClock};
//! use std::time::Duration;
//!
//! let clock = MockClock::new();
//! let lookup = CacheBuilder::ttl(Duration::from_secs(2))
//!     .clock(clock.clone())
//!     .build(|(id,): &(u32,)| format!("user-{}", id))
//!     .unwrap();
//!
//! assert_eq!(lookup.call((7,)).unwrap(), "user-7");
//! clock.advance(Duration::from_secs(1));
//! assert!(lookup.contains(&(7,)).unwrap());
//! clock.advance(Duration::from_secs(1));
//! assert!(!lookup.contains(&(7,)).unwrap());
//! ```
//!
//! ## Custom Key Types
//!
//! ```rust
//! use memocache::{cache, debug_cacheable_key};
//!
//! #[derive(Debug, Clone)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! debug_cacheable_key!(Point);
//!
//! #[cache(policy = "lru", maxsize = 16)]
//! fn manhattan(p: Point) -> i32 {
//!     p.x.abs() + p.y.abs()
//! }
//!
//! assert_eq!(manhattan(Point { x: -3, y: 4 }), 7);
//! ```

pub use memocache_core::*;
pub use memocache_macros::cache;

#[doc(hidden)]
pub mod __private {
    pub use once_cell;
}
