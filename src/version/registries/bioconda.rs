//! Bioconda adapter, backed by the anaconda.org package metadata API

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://api.anaconda.org";

pub const REGISTRY_NAME: &str = "bioconda";
pub const ALIASES: &[&str] = &["conda"];

const LABEL: &str = "Bioconda";

#[derive(Debug, Deserialize)]
struct AnacondaPackage {
    latest_version: Option<String>,
    summary: Option<String>,
    home: Option<String>,
    license: Option<String>,
}

pub struct BiocondaRegistry {
    client: HttpClient,
    base_url: String,
}

impl BiocondaRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for BiocondaRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/package/bioconda/{}", self.base_url, package_name);

        let package: AnacondaPackage = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;

        Ok(
            PackageVersion::new(package_name, package.latest_version, REGISTRY_NAME, url)
                .with_description(package.summary)
                .with_homepage(package.home)
                .with_license(package.license),
        )
    }
}
