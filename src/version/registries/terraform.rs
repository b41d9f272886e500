//! Terraform Registry provider adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://registry.terraform.io";

pub const REGISTRY_NAME: &str = "terraform";
pub const ALIASES: &[&str] = &["tf"];

const LABEL: &str = "Terraform Registry";

/// Response from `GET /v1/providers/{namespace}/{type}`
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    version: Option<String>,
    description: Option<String>,
    source: Option<String>,
}

pub struct TerraformRegistry {
    client: HttpClient,
    base_url: String,
}

impl TerraformRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for TerraformRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    /// `provider_path` is `owner/name`, e.g. `hashicorp/aws`
    async fn get_latest_version(&self, provider_path: &str) -> Result<PackageVersion, RegistryError> {
        let provider_path = validate_name(provider_path, "Provider")?;
        let url = format!("{}/v1/providers/{}", self.base_url, provider_path);

        let provider: ProviderResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, provider_path))
            .await?;

        Ok(
            PackageVersion::new(provider_path, provider.version, REGISTRY_NAME, url)
                .with_description(provider.description)
                .with_homepage(provider.source),
        )
    }
}
