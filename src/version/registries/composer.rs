//! Composer (Packagist) adapter

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::{normalize_base_url, null_as_default};
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://packagist.org";

pub const REGISTRY_NAME: &str = "composer";
pub const ALIASES: &[&str] = &["php", "packagist"];

const LABEL: &str = "Packagist";

/// Response from `GET /packages/{vendor}/{name}.json`
#[derive(Debug, Deserialize)]
struct PackagistResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    package: PackagistPackage,
}

#[derive(Debug, Default, Deserialize)]
struct PackagistPackage {
    /// Keyed by version string, in upstream order
    #[serde(default, deserialize_with = "version_map")]
    versions: IndexMap<String, PackagistVersion>,
}

#[derive(Debug, Deserialize)]
struct PackagistVersion {
    description: Option<String>,
    homepage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    license: Vec<String>,
}

/// Packagist is PHP-backed: an empty versions map arrives as `[]` (or `null`)
fn version_map<'de, D>(deserializer: D) -> Result<IndexMap<String, PackagistVersion>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Versions {
        Map(IndexMap<String, PackagistVersion>),
        List(Vec<serde::de::IgnoredAny>),
    }

    match Option::<Versions>::deserialize(deserializer)? {
        Some(Versions::Map(versions)) => Ok(versions),
        Some(Versions::List(_)) | None => Ok(IndexMap::new()),
    }
}

/// Orders version keys for "latest" selection.
///
/// Plain string ordering, so `"10.0.0" < "2.0.0"`. Kept as its own function so a
/// semantic comparator can replace it without touching the selection logic.
pub fn compare_version_keys(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Picks the greatest key not ending in `-dev`, or the first key when every key is a dev branch
fn select_latest<'a, V>(versions: &'a IndexMap<String, V>) -> Option<&'a str> {
    versions
        .keys()
        .filter(|v| !v.ends_with("-dev"))
        .max_by(|a, b| compare_version_keys(a, b))
        .or_else(|| versions.keys().next())
        .map(String::as_str)
}

pub struct ComposerRegistry {
    client: HttpClient,
    base_url: String,
}

impl ComposerRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for ComposerRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/packages/{}.json", self.base_url, package_name);

        let response: PackagistResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;
        let mut versions = response.package.versions;

        let latest = select_latest(&versions)
            .map(str::to_string)
            .ok_or_else(|| {
                RegistryError::NotFound(format!(
                    "No versions found for package '{}'",
                    package_name
                ))
            })?;
        let details = versions.swap_remove(&latest);

        let record = PackageVersion::new(package_name, Some(latest), REGISTRY_NAME, url);
        Ok(match details {
            Some(details) => record
                .with_description(details.description)
                .with_homepage(details.homepage)
                .with_license(details.license.into_iter().next()),
            None => record,
        })
    }
}
