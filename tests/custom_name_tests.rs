/// Integration tests for cache names and the stats registry

#[cfg(feature = "stats")]
#[cfg(test)]
mod tests {
    use memocache::{cache, stats_registry, CacheBuilder};
    use serial_test::serial;

    // Defined outside the tests so every test sees the same statics
    #[cache(name = "custom_test_cache")]
    fn test_function_with_custom_name(x: i32) -> i32 {
        x * 2
    }

    #[cache(policy = "lru", maxsize = 1)]
    fn test_function_default_name(x: i32) -> i32 {
        x * 3
    }

    #[test]
    #[serial]
    fn test_custom_name_registration() {
        // registration happens on first use
        test_function_with_custom_name(900100);
        test_function_default_name(900100);

        let registered = stats_registry::list();
        assert!(
            registered.contains(&"custom_test_cache".to_string()),
            "Custom name should be registered"
        );
        assert!(
            registered.contains(&"test_function_default_name".to_string()),
            "Default name should be registered"
        );
        assert!(!registered.contains(&"test_function_with_custom_name".to_string()));
    }

    #[test]
    #[serial]
    fn test_custom_name_statistics() {
        test_function_with_custom_name(0);
        stats_registry::reset("custom_test_cache");

        test_function_with_custom_name(1_000_001); // Miss
        test_function_with_custom_name(1_000_001); // Hit
        test_function_with_custom_name(1_000_002); // Miss
        test_function_with_custom_name(1_000_001); // Hit

        let stats = stats_registry::get("custom_test_cache")
            .expect("Stats should be available for custom_test_cache");
        assert_eq!(stats.hits(), 2, "Should have 2 hits");
        assert_eq!(stats.misses(), 2, "Should have 2 misses");
        assert_eq!(stats.total_accesses(), 4, "Should have 4 total accesses");
    }

    #[test]
    #[serial]
    fn test_default_name_counts_evictions() {
        test_function_default_name(0);
        stats_registry::reset("test_function_default_name");

        test_function_default_name(7); // Miss, evicts 0
        test_function_default_name(7); // Hit
        test_function_default_name(8); // Miss, evicts 7

        let stats = stats_registry::get("test_function_default_name")
            .expect("Stats should be available for test_function_default_name");
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 2);
        assert_eq!(stats.evictions(), 2);
    }

    #[test]
    #[serial]
    fn test_builder_name_registration() {
        let lengths = CacheBuilder::lfu(4)
            .name("builder_lengths")
            .build(|(s,): &(String,)| s.len())
            .unwrap();

        lengths.call(("abc".to_string(),)).unwrap();
        lengths.call(("abc".to_string(),)).unwrap();

        let live = stats_registry::get_ref("builder_lengths").expect("registered");
        assert_eq!(live.hits(), 1);
        assert_eq!(live.misses(), 1);
        drop(live);

        // the registry does not keep a dropped cache alive
        drop(lengths);
        assert!(stats_registry::get("builder_lengths").is_none());
    }
}
