//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into an [`EngineConfig`]
//! once validation has passed.

use casino_application::config::{
    CachePolicy, DEFAULT_RECOMPUTE_DEBOUNCE_MS, DEFAULT_REFRESH_THROTTLE_MS,
    DEFAULT_RESULTS_TTL_MS, EngineConfig,
};
use casino_domain::{
    CatalogDefinition, CatalogError, ConfigIssue, ConfigIssueCode, GroupDefinition,
    OptionCatalog, SessionSettings, SettingsOverride,
};
use serde::{Deserialize, Serialize};

/// Default settings for new sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Chips of each type every participant places per round
    pub chips_per_type: u32,
    pub layer1_duration_secs: u32,
    pub layer2_duration_secs: u32,
    pub require_department: bool,
    pub allow_revotes: bool,
    /// Join URL prefix shown to participants
    pub participant_base_url: Option<String>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let settings = SessionSettings::default();
        Self {
            chips_per_type: settings.chips_per_type,
            layer1_duration_secs: settings.layer_durations.layer1,
            layer2_duration_secs: settings.layer_durations.layer2,
            require_department: settings.require_department,
            allow_revotes: settings.allow_revotes,
            participant_base_url: None,
        }
    }
}

impl FileSessionConfig {
    /// Normalized session settings (base URL trimmed, blank dropped)
    pub fn to_settings(&self) -> SessionSettings {
        SessionSettings::default().with_override(&SettingsOverride {
            chips_per_type: Some(self.chips_per_type),
            layer1_duration_secs: Some(self.layer1_duration_secs),
            layer2_duration_secs: Some(self.layer2_duration_secs),
            require_department: Some(self.require_department),
            allow_revotes: Some(self.allow_revotes),
            participant_base_url: self.participant_base_url.clone(),
        })
    }
}

/// Results cache and rate limiter timings, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    pub results_ttl_ms: u64,
    pub recompute_debounce_ms: u64,
    pub refresh_throttle_ms: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            results_ttl_ms: DEFAULT_RESULTS_TTL_MS,
            recompute_debounce_ms: DEFAULT_RECOMPUTE_DEBOUNCE_MS,
            refresh_throttle_ms: DEFAULT_REFRESH_THROTTLE_MS,
        }
    }
}

impl FileCacheConfig {
    pub fn to_policy(&self) -> CachePolicy {
        CachePolicy::from_millis(
            self.results_ttl_ms,
            self.recompute_debounce_ms,
            self.refresh_throttle_ms,
        )
    }
}

/// Routing tie-break configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    /// Fixed seed for reproducible tie-breaks; unset draws from the OS
    pub seed: Option<u64>,
}

/// Replacement option catalog
///
/// ```toml
/// [[catalog.groups]]
/// id = "pain-point-meetings"
/// title = "Too Many Meetings"
///
/// [[catalog.groups.options]]
/// id = "solution-meetings-no-meeting-day"
/// title = "No-Meeting Wednesdays"
/// boldness = "safe_bet"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Empty keeps the built-in catalog
    pub groups: Vec<GroupDefinition>,
}

impl FileCatalogConfig {
    pub fn is_default(&self) -> bool {
        self.groups.is_empty()
    }

    /// Validate the configured catalog, or fall back to the built-in one
    pub fn to_catalog(&self) -> Result<OptionCatalog, CatalogError> {
        if self.is_default() {
            return Ok(OptionCatalog::default_catalog());
        }
        OptionCatalog::from_definition(&CatalogDefinition {
            groups: self.groups.clone(),
        })
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub session: FileSessionConfig,
    pub cache: FileCacheConfig,
    pub routing: FileRoutingConfig,
    pub catalog: FileCatalogConfig,
}

impl FileConfig {
    /// Collect every configuration problem
    ///
    /// Any issue with [`Severity::Error`](casino_domain::Severity::Error)
    /// means [`FileConfig::to_engine_config`] must not be used.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.session.chips_per_type == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroChipsPerType,
                "session.chips_per_type is 0; no allocation could ever be valid",
            ));
        }

        for (key, secs) in [
            ("layer1_duration_secs", self.session.layer1_duration_secs),
            ("layer2_duration_secs", self.session.layer2_duration_secs),
        ] {
            if secs == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ZeroLayerDuration,
                    format!("session.{key} is 0; displays will show an expired timer"),
                ));
            }
        }

        if let Some(url) = &self.session.participant_base_url {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::SuspiciousBaseUrl,
                    format!("session.participant_base_url '{url}' is not an http(s) URL"),
                ));
            }
        }

        if self.cache.results_ttl_ms == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ResultsCacheDisabled,
                "cache.results_ttl_ms is 0; every results read recomputes",
            ));
        } else if self.cache.recompute_debounce_ms > self.cache.results_ttl_ms {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DebounceExceedsTtl,
                format!(
                    "cache.recompute_debounce_ms ({}) exceeds cache.results_ttl_ms ({})",
                    self.cache.recompute_debounce_ms, self.cache.results_ttl_ms
                ),
            ));
        }

        if let Err(e) = self.catalog.to_catalog() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidCatalog,
                format!("catalog: {e}"),
            ));
        }

        issues
    }

    /// Build the engine configuration
    pub fn to_engine_config(&self) -> Result<EngineConfig, CatalogError> {
        Ok(EngineConfig {
            session_defaults: self.session.to_settings(),
            catalog: self.catalog.to_catalog()?,
            cache: self.cache.to_policy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_domain::{BoldnessTier, OptionId};
    use std::time::Duration;

    fn codes(config: &FileConfig) -> Vec<ConfigIssueCode> {
        config.validate().iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[session]
chips_per_type = 5
layer1_duration_secs = 300
layer2_duration_secs = 240
require_department = false
allow_revotes = true
participant_base_url = " https://casino.example.com/ "

[cache]
results_ttl_ms = 3000
recompute_debounce_ms = 250
refresh_throttle_ms = 1500

[routing]
seed = 7

[[catalog.groups]]
id = "pain-point-meetings"
title = "Too Many Meetings"

[[catalog.groups.options]]
id = "solution-meetings-no-meeting-day"
title = "No-Meeting Wednesdays"
boldness = "safe_bet"

[[catalog.groups.options]]
id = "solution-meetings-async-standups"
title = "Async Standups"
boldness = "moonshot"
label = "Big Swing"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.chips_per_type, 5);
        assert!(!config.session.require_department);
        assert_eq!(config.cache.refresh_throttle_ms, 1500);
        assert_eq!(config.routing.seed, Some(7));
        assert_eq!(config.catalog.groups.len(), 1);
        assert!(config.validate().is_empty());

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.session_defaults.chips_per_type, 5);
        assert_eq!(engine.session_defaults.layer_durations.layer2, 240);
        assert_eq!(
            engine.session_defaults.participant_base_url.as_deref(),
            Some("https://casino.example.com")
        );
        assert_eq!(engine.cache.results_ttl, Duration::from_secs(3));

        let group = OptionId::new("pain-point-meetings");
        let solutions = engine.catalog.group(&group).unwrap();
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[1].boldness, BoldnessTier::Moonshot);
        assert_eq!(solutions[1].label, "Big Swing");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[session]
chips_per_type = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.chips_per_type, 3);
        // Defaults should apply
        assert!(config.session.require_department);
        assert_eq!(config.cache, FileCacheConfig::default());
        assert!(config.routing.seed.is_none());
        assert!(config.catalog.is_default());
    }

    #[test]
    fn test_default_config_converts_to_default_engine_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.session_defaults, SessionSettings::default());
        assert_eq!(engine.cache, CachePolicy::default());
        assert_eq!(engine.catalog, OptionCatalog::default_catalog());
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_zero_chips_is_error() {
        let mut config = FileConfig::default();
        config.session.chips_per_type = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroChipsPerType);
    }

    #[test]
    fn test_validate_timing_warnings() {
        let mut config = FileConfig::default();
        config.session.layer2_duration_secs = 0;
        config.cache.results_ttl_ms = 100;
        config.cache.recompute_debounce_ms = 500;

        assert_eq!(
            codes(&config),
            vec![
                ConfigIssueCode::ZeroLayerDuration,
                ConfigIssueCode::DebounceExceedsTtl
            ]
        );
        assert!(config.validate().iter().all(|i| !i.is_error()));

        config.cache.results_ttl_ms = 0;
        assert!(codes(&config).contains(&ConfigIssueCode::ResultsCacheDisabled));
        assert!(!codes(&config).contains(&ConfigIssueCode::DebounceExceedsTtl));
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = FileConfig::default();
        config.session.participant_base_url = Some("casino.local".into());
        assert_eq!(codes(&config), vec![ConfigIssueCode::SuspiciousBaseUrl]);

        config.session.participant_base_url = Some("   ".into());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_invalid_catalog() {
        let toml_str = r#"
[[catalog.groups]]
id = "pain-point-empty"
title = "Nothing Here"
options = []
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidCatalog);
        assert_eq!(
            config.to_engine_config().unwrap_err(),
            CatalogError::EmptyGroup("pain-point-empty".into())
        );
    }
}
