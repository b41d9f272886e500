//! CRAN adapter, backed by crandb

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://crandb.r-pkg.org";

pub const REGISTRY_NAME: &str = "cran";
pub const ALIASES: &[&str] = &["r"];

const LABEL: &str = "CRAN";

/// crandb mirrors the DESCRIPTION file, so keys keep its capitalization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CranDescription {
    version: Option<String>,
    description: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    license: Option<String>,
}

pub struct CranRegistry {
    client: HttpClient,
    base_url: String,
}

impl CranRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for CranRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/{}", self.base_url, package_name);

        let description: CranDescription = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;

        Ok(
            PackageVersion::new(package_name, description.version, REGISTRY_NAME, url)
                .with_description(description.description)
                .with_homepage(description.url)
                .with_license(description.license),
        )
    }
}
