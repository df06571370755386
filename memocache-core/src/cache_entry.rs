use std::time::{Duration, Instant};

/// A stored result plus the bookkeeping every policy may need.
///
/// The value is never mutated once stored. `created_at` drives TTL expiry and
/// is not refreshed on hits; `frequency` is the LFU access count, starting at 1
/// when the entry is inserted.
///
/// # Examples
///
/// ```
/// use memocache_core::CacheEntry;
/// use std::time::{Duration, Instant};
///
/// let now = Instant::now();
/// let entry = CacheEntry::new(42, now);
/// assert_eq!(entry.value, 42);
/// assert_eq!(entry.frequency, 1);
///
/// assert!(!entry.is_expired(Duration::from_secs(60), now));
/// assert!(entry.is_expired(Duration::from_secs(60), now + Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug)]
pub struct CacheEntry<R> {
    pub value: R,
    pub created_at: Instant,
    pub frequency: u64,
}

impl<R> CacheEntry<R> {
    /// Creates an entry stamped with `now` and an access count of 1.
    pub fn new(value: R, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            frequency: 1,
        }
    }

    /// Returns the age of the entry as seen at `now`.
    ///
    /// A clock reading earlier than `created_at` counts as zero age.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Returns true once the entry's age has reached `ttl`.
    ///
    /// A zero `ttl` means every entry is already expired.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }

    /// Increments the access frequency counter.
    ///
    /// This method is used by the LFU (Least Frequently Used) store on every hit.
    ///
    /// # Examples
    ///
    /// ```
    /// use memocache_core::CacheEntry;
    /// use std::time::Instant;
    ///
    /// let mut entry = CacheEntry::new(42, Instant::now());
    /// entry.increment_frequency();
    /// assert_eq!(entry.frequency, 2);
    /// ```
    pub fn increment_frequency(&mut self) {
        self.frequency = self.frequency.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_not_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new(42, now);
        assert_eq!(entry.value, 42);
        assert!(!entry.is_expired(Duration::from_secs(10), now));
    }

    #[test]
    fn test_entry_expiration_boundary() {
        let now = Instant::now();
        let entry = CacheEntry::new("data", now);
        let ttl = Duration::from_secs(2);

        assert!(!entry.is_expired(ttl, now + Duration::from_secs(1)));
        assert!(!entry.is_expired(ttl, now + Duration::from_millis(1999)));
        assert!(entry.is_expired(ttl, now + Duration::from_secs(2)));
        assert!(entry.is_expired(ttl, now + Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_ttl_always_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, now);
        assert!(entry.is_expired(Duration::ZERO, now));
    }

    #[test]
    fn test_clock_going_backwards_is_zero_age() {
        let now = Instant::now() + Duration::from_secs(5);
        let entry = CacheEntry::new(1, now);
        assert_eq!(entry.age(now - Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_frequency_saturates() {
        let mut entry = CacheEntry::new((), Instant::now());
        entry.frequency = u64::MAX;
        entry.increment_frequency();
        assert_eq!(entry.frequency, u64::MAX);
    }
}
