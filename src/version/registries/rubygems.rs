//! RubyGems registry adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

/// Default base URL for RubyGems
pub const DEFAULT_BASE_URL: &str = "https://rubygems.org";

pub const REGISTRY_NAME: &str = "rubygems";
pub const ALIASES: &[&str] = &["gem", "ruby"];

const LABEL: &str = "RubyGems";

/// The latest-version endpoint carries nothing but the version
#[derive(Debug, Deserialize)]
struct LatestVersionResponse {
    version: Option<String>,
}

pub struct RubyGemsRegistry {
    client: HttpClient,
    base_url: String,
}

impl RubyGemsRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for RubyGemsRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, gem_name: &str) -> Result<PackageVersion, RegistryError> {
        let gem_name = validate_name(gem_name, "Package")?;
        let url = format!("{}/api/v1/versions/{}/latest.json", self.base_url, gem_name);

        let latest: LatestVersionResponse = self
            .client
            .get_json(&url, &[], &Target::new(LABEL, "Gem", gem_name))
            .await?;

        Ok(PackageVersion::new(
            gem_name,
            latest.version,
            REGISTRY_NAME,
            url,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::Server;

    fn registry(base_url: &str) -> RubyGemsRegistry {
        RubyGemsRegistry::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), base_url)
    }

    #[tokio::test]
    async fn get_latest_version_returns_version_without_metadata() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/versions/rails/latest.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version": "7.1.3"}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("rails")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.version, "7.1.3");
        assert_eq!(result.registry, "rubygems");
        assert_eq!(result.description, None);
        assert_eq!(result.homepage, None);
        assert_eq!(result.license, None);
    }

    #[tokio::test]
    async fn get_latest_version_names_gem_in_not_found_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/versions/nonexistent/latest.json")
            .with_status(404)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("nonexistent")
            .await;

        mock.assert_async().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Gem 'nonexistent' not found in RubyGems registry"
        );
    }
}
