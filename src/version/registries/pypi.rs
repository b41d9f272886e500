//! PyPI registry adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::{non_empty, normalize_base_url};
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://pypi.org";

pub const REGISTRY_NAME: &str = "pypi";
pub const ALIASES: &[&str] = &["pip", "python"];

const LABEL: &str = "PyPI";

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    #[serde(default)]
    info: PypiInfo,
}

/// Package information from PyPI
#[derive(Debug, Default, Deserialize)]
struct PypiInfo {
    /// Latest version (according to PyPI)
    version: Option<String>,
    summary: Option<String>,
    home_page: Option<String>,
    project_url: Option<String>,
    license: Option<String>,
}

/// PyPI registry client
pub struct PypiRegistry {
    client: HttpClient,
    base_url: String,
}

impl PypiRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for PypiRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/pypi/{}/json", self.base_url, package_name);

        let response: PypiResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;
        let info = response.info;

        // PyPI reports missing metadata as empty strings rather than null
        let homepage = non_empty(info.home_page).or_else(|| non_empty(info.project_url));

        Ok(
            PackageVersion::new(package_name, info.version, REGISTRY_NAME, url)
                .with_description(info.summary)
                .with_homepage(homepage)
                .with_license(non_empty(info.license)),
        )
    }
}
