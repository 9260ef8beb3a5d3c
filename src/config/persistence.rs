//! Local boundary cache configuration

/// Configuration for the boundary cache (a JSON key-value file)
pub struct BoundaryCacheConfig {
    /// Path of the key-value file
    pub path: &'static str,
    /// Key holding the JSON-encoded `{min_k_time, max_k_time}` pair
    pub boundary_key: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub cache: BoundaryCacheConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    cache: BoundaryCacheConfig {
        path: ".replay_cache.json",
        boundary_key: "kTimeInfo",
    },
};
