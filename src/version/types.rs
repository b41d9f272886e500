//! Common types for registry lookups

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used when the upstream payload carries no version
pub const UNKNOWN_VERSION: &str = "unknown";

/// Latest version of a package as reported by one registry
///
/// Every lookup builds a fresh record; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Package identifier as submitted (trimmed)
    pub name: String,
    /// Latest version, tag or commit id; `"unknown"` when the registry omits it
    pub version: String,
    /// Canonical registry name (never an alias)
    pub registry: String,
    /// Upstream URL that was queried
    pub registry_url: String,
    /// ISO-8601 UTC timestamp with a trailing `Z`
    pub query_time: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub license: Option<String>,
}

impl PackageVersion {
    /// Creates a record stamped with the current time.
    ///
    /// An absent or empty `version` is recorded as [`UNKNOWN_VERSION`].
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        registry: &str,
        registry_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            registry: registry.to_string(),
            registry_url: registry_url.into(),
            query_time: current_timestamp(),
            description: None,
            homepage: None,
            license: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_homepage(mut self, homepage: Option<String>) -> Self {
        self.homepage = homepage;
        self
    }

    pub fn with_license(mut self, license: Option<String>) -> Self {
        self.license = license;
        self
    }
}

/// Current UTC time, e.g. `2024-01-15T10:30:00.123456Z`
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
