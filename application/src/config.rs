//! Application-level configuration.
//!
//! These types control how the engine behaves at runtime: the settings and
//! catalog new sessions start from, and the timings of the results cache and
//! its rate limiters.

use casino_domain::{OptionCatalog, SessionSettings};
use std::time::Duration;

pub const DEFAULT_RESULTS_TTL_MS: u64 = 2_000;
pub const DEFAULT_RECOMPUTE_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REFRESH_THROTTLE_MS: u64 = 1_000;

/// Timings for the read-through cache and its rate limiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a computed results view is served without recomputation.
    pub results_ttl: Duration,
    /// Quiet window before write-triggered recomputation runs.
    pub recompute_debounce: Duration,
    /// Minimum spacing between display-requested refreshes of one session.
    pub refresh_throttle: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_millis(
            DEFAULT_RESULTS_TTL_MS,
            DEFAULT_RECOMPUTE_DEBOUNCE_MS,
            DEFAULT_REFRESH_THROTTLE_MS,
        )
    }
}

impl CachePolicy {
    /// Creates a CachePolicy from millisecond values.
    pub fn from_millis(results_ttl: u64, recompute_debounce: u64, refresh_throttle: u64) -> Self {
        Self {
            results_ttl: Duration::from_millis(results_ttl),
            recompute_debounce: Duration::from_millis(recompute_debounce),
            refresh_throttle: Duration::from_millis(refresh_throttle),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Settings every new session starts from, before facilitator overrides.
    pub session_defaults: SessionSettings,
    /// Catalog copied into every new session.
    pub catalog: OptionCatalog,
    pub cache: CachePolicy,
}

impl EngineConfig {
    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_catalog(mut self, catalog: OptionCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_policy() {
        let policy = CachePolicy::default();
        assert_eq!(policy.results_ttl, Duration::from_secs(2));
        assert_eq!(policy.recompute_debounce, Duration::from_millis(500));
        assert_eq!(policy.refresh_throttle, Duration::from_secs(1));
    }

    #[test]
    fn test_default_engine_config_uses_default_catalog() {
        let config = EngineConfig::default();
        assert_eq!(config.catalog.round_one().len(), 4);
        assert_eq!(config.session_defaults.required_chips(), 12);
    }
}
