//! Structured configuration issues
//!
//! Config validation never fails fast. It collects every problem it finds as
//! a [`ConfigIssue`] so the CLI can print warnings and refuse to start only
//! when an [`Severity::Error`] is present.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the engine cannot run with this configuration.
    Error,
    /// Non-fatal: the engine runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `chips_per_type` is zero, so no allocation could ever be valid.
    ZeroChipsPerType,
    /// A round timer of zero seconds.
    ZeroLayerDuration,
    /// Results TTL of zero disables the read-through cache.
    ResultsCacheDisabled,
    /// Debounce window longer than the cache TTL; readers recompute first.
    DebounceExceedsTtl,
    /// The configured catalog failed validation.
    InvalidCatalog,
    /// Participant base URL is not an http(s) URL.
    SuspiciousBaseUrl,
}

impl ConfigIssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigIssueCode::ZeroChipsPerType => "zero_chips_per_type",
            ConfigIssueCode::ZeroLayerDuration => "zero_layer_duration",
            ConfigIssueCode::ResultsCacheDisabled => "results_cache_disabled",
            ConfigIssueCode::DebounceExceedsTtl => "debounce_exceeds_ttl",
            ConfigIssueCode::InvalidCatalog => "invalid_catalog",
            ConfigIssueCode::SuspiciousBaseUrl => "suspicious_base_url",
        }
    }
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", level, self.code.as_str(), self.message)
    }
}
