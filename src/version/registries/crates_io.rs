//! crates.io registry adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

/// Default base URL for crates.io
pub const DEFAULT_BASE_URL: &str = "https://crates.io";

pub const REGISTRY_NAME: &str = "crates";
pub const ALIASES: &[&str] = &["cargo", "rust"];

const LABEL: &str = "crates.io";

/// Response from `GET /api/v1/crates/{name}`
#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate", default)]
    krate: CrateInfo,
}

#[derive(Debug, Default, Deserialize)]
struct CrateInfo {
    newest_version: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
}

/// Registry implementation for crates.io API
pub struct CratesIoRegistry {
    client: HttpClient,
    base_url: String,
}

impl CratesIoRegistry {
    /// Creates a new CratesIoRegistry with a custom base URL
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for CratesIoRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, crate_name: &str) -> Result<PackageVersion, RegistryError> {
        let crate_name = validate_name(crate_name, "Crate")?;
        let url = format!("{}/api/v1/crates/{}", self.base_url, crate_name);

        let response: CrateResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, crate_name))
            .await?;
        let info = response.krate;

        // `newest_version` rather than the versions array, which includes yanked releases
        Ok(
            PackageVersion::new(crate_name, info.newest_version, REGISTRY_NAME, url)
                .with_description(info.description)
                .with_homepage(info.homepage),
        )
    }
}
