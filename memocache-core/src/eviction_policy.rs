use std::fmt;
use std::str::FromStr;

use crate::CacheError;

/// Retention policy of a cache.
///
/// # Variants
///
/// * `Unbounded` - **Pure memoization**
///   - Every distinct call is stored forever
///   - Suitable only for callables with a small, bounded domain
///
/// * `TTL` - **Time To Live**
///   - Entries are served until their age reaches the configured ttl
///   - Age is measured from creation; hits do not refresh it
///   - Stale entries are replaced lazily, on the next call with the same key
///
/// * `LRU` - **Least Recently Used**
///   - Holds at most `maxsize` entries
///   - A hit moves the entry to the most-recently-used end
///   - On overflow the least recently accessed entry is evicted
///
/// * `LFU` - **Least Frequently Used**
///   - Holds at most `maxsize` entries
///   - Each hit increments the entry's access count
///   - On overflow the entry with the lowest count is evicted; among equal
///     counts, the one inserted earliest goes first
///
/// # Examples
///
/// ```
/// use memocache_core::EvictionPolicy;
///
/// let policy: EvictionPolicy = "lru".parse().unwrap();
/// assert_eq!(policy, EvictionPolicy::LRU);
///
/// let policy: EvictionPolicy = "LFU".parse().unwrap();
/// assert_eq!(policy, EvictionPolicy::LFU);
///
/// assert!("random".parse::<EvictionPolicy>().is_err());
/// assert_eq!(EvictionPolicy::default(), EvictionPolicy::Unbounded);
/// ```
///
/// # Performance Characteristics
///
/// | Policy    | Hit  | Miss | Eviction |
/// |-----------|------|------|----------|
/// | Unbounded | O(1) | O(1) | never    |
/// | TTL       | O(1) | O(1) | lazy     |
/// | LRU       | O(n) | O(1) | O(1)     |
/// | LFU       | O(1) | O(1) | O(n)     |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EvictionPolicy {
    #[default]
    Unbounded,
    TTL,
    LRU,
    LFU,
}

impl EvictionPolicy {
    /// Whether the policy needs a `maxsize`.
    pub const fn is_bounded(self) -> bool {
        matches!(self, EvictionPolicy::LRU | EvictionPolicy::LFU)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EvictionPolicy::Unbounded => "unbounded",
            EvictionPolicy::TTL => "ttl",
            EvictionPolicy::LRU => "lru",
            EvictionPolicy::LFU => "lfu",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a policy name, case-insensitively.
///
/// `"memoize"` is accepted as an alias of `"unbounded"`. Unknown names are an
/// [`CacheError::InvalidConfiguration`].
impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unbounded" | "memoize" => Ok(EvictionPolicy::Unbounded),
            "ttl" => Ok(EvictionPolicy::TTL),
            "lru" => Ok(EvictionPolicy::LRU),
            "lfu" => Ok(EvictionPolicy::LFU),
            other => Err(CacheError::invalid_config(format!(
                "unknown eviction policy `{}`",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for policy in [
            EvictionPolicy::Unbounded,
            EvictionPolicy::TTL,
            EvictionPolicy::LRU,
            EvictionPolicy::LFU,
        ] {
            assert_eq!(policy.to_string().parse::<EvictionPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(" Memoize ".parse(), Ok(EvictionPolicy::Unbounded));
        assert_eq!("TtL".parse(), Ok(EvictionPolicy::TTL));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "fifo".parse::<EvictionPolicy>().unwrap_err();
        assert_eq!(
            err,
            CacheError::InvalidConfiguration("unknown eviction policy `fifo`".to_string())
        );
    }

    #[test]
    fn test_bounded() {
        assert!(EvictionPolicy::LRU.is_bounded());
        assert!(EvictionPolicy::LFU.is_bounded());
        assert!(!EvictionPolicy::TTL.is_bounded());
        assert!(!EvictionPolicy::Unbounded.is_bounded());
    }
}
