//! Hex.pm registry adapter

use std::collections::HashMap;

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::{normalize_base_url, null_as_default};
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://hex.pm";

pub const REGISTRY_NAME: &str = "hex";
pub const ALIASES: &[&str] = &["elixir", "hex.pm"];

const LABEL: &str = "Hex.pm";

/// Response from `GET /api/packages/{name}`
#[derive(Debug, Deserialize)]
struct HexPackage {
    /// Newest first
    #[serde(default, deserialize_with = "null_as_default")]
    releases: Vec<HexRelease>,
    #[serde(default, deserialize_with = "null_as_default")]
    meta: HexMeta,
}

#[derive(Debug, Deserialize)]
struct HexRelease {
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HexMeta {
    description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    links: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    licenses: Vec<String>,
}

pub struct HexRegistry {
    client: HttpClient,
    base_url: String,
}

impl HexRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for HexRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/api/packages/{}", self.base_url, package_name);

        let package: HexPackage = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;

        // First release in array order, not the semantic maximum
        let latest = package.releases.into_iter().next().ok_or_else(|| {
            RegistryError::NotFound(format!(
                "No releases found for package '{}'",
                package_name
            ))
        })?;

        let meta = package.meta;
        let license = (!meta.licenses.is_empty()).then(|| meta.licenses.join(", "));

        Ok(
            PackageVersion::new(package_name, latest.version, REGISTRY_NAME, url)
                .with_description(meta.description)
                .with_homepage(meta.links.get("GitHub").cloned())
                .with_license(license),
        )
    }
}
