//! NuGet adapter, backed by the v3 flat container API

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://api.nuget.org";

pub const REGISTRY_NAME: &str = "nuget";
pub const ALIASES: &[&str] = &["dotnet", ".net"];

const LABEL: &str = "NuGet";

#[derive(Debug, Deserialize)]
struct VersionIndex {
    /// Ascending, as served by the flat container
    #[serde(default)]
    versions: Vec<String>,
}

pub struct NuGetRegistry {
    client: HttpClient,
    base_url: String,
}

impl NuGetRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for NuGetRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        // The flat container only accepts lowercased ids
        let url = format!(
            "{}/v3-flatcontainer/{}/index.json",
            self.base_url,
            package_name.to_lowercase()
        );

        let index: VersionIndex = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;

        let latest = index.versions.into_iter().next_back().ok_or_else(|| {
            RegistryError::NotFound(format!(
                "No versions found for package '{}'",
                package_name
            ))
        })?;

        Ok(
            PackageVersion::new(package_name, Some(latest), REGISTRY_NAME, url)
                .with_description(Some(format!(".NET package {}", package_name)))
                .with_homepage(Some(format!(
                    "https://www.nuget.org/packages/{}",
                    package_name
                ))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::Server;

    fn registry(base_url: &str) -> NuGetRegistry {
        NuGetRegistry::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), base_url)
    }

    #[tokio::test]
    async fn get_latest_version_takes_last_version_of_lowercased_index() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3-flatcontainer/newtonsoft.json/index.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["12.0.3", "13.0.1", "13.0.3"]}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("Newtonsoft.Json")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "Newtonsoft.Json");
        assert_eq!(result.version, "13.0.3");
        assert_eq!(
            result.homepage.as_deref(),
            Some("https://www.nuget.org/packages/Newtonsoft.Json")
        );
    }

    #[tokio::test]
    async fn get_latest_version_fails_when_versions_are_empty() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3-flatcontainer/empty/index.json")
            .with_status(200)
            .with_body(r#"{"versions": []}"#)
            .create_async()
            .await;

        let result = registry(&server.url()).get_latest_version("Empty").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }
}
