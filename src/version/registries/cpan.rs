//! CPAN adapter, backed by MetaCPAN

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, QUERY_USER_AGENT, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://fastapi.metacpan.org";

pub const REGISTRY_NAME: &str = "cpan";
pub const ALIASES: &[&str] = &["perl"];

const LABEL: &str = "CPAN";

const HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/json"),
    ("User-Agent", QUERY_USER_AGENT),
];

#[derive(Debug, Deserialize)]
struct ModuleResponse {
    version: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
}

pub struct CpanRegistry {
    client: HttpClient,
    base_url: String,
}

impl CpanRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for CpanRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, module_name: &str) -> Result<PackageVersion, RegistryError> {
        let module_name = validate_name(module_name, "Module")?;
        let url = format!("{}/v1/module/{}", self.base_url, module_name);

        let module: ModuleResponse = self
            .client
            .get_json(&url, HEADERS, &Target::package(LABEL, module_name))
            .await?;

        Ok(
            PackageVersion::new(module_name, module.version, REGISTRY_NAME, url)
                .with_description(module.summary)
                .with_homepage(Some(format!("https://metacpan.org/pod/{}", module_name))),
        )
    }
}
