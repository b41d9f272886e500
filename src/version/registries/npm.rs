//! npm registry adapter

use serde::Deserialize;
use serde_json::Value;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

/// Default base URL for npm registry
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

pub const REGISTRY_NAME: &str = "npm";
pub const ALIASES: &[&str] = &["node", "nodejs"];

const LABEL: &str = "npm";

/// Response from `GET /{package}/latest`
#[derive(Debug, Deserialize)]
struct NpmLatestResponse {
    version: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
    /// Usually an SPDX string; very old packages publish `{"type": "MIT", "url": ...}`
    license: Option<Value>,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

fn license_name(license: Option<Value>) -> Option<String> {
    match license? {
        Value::String(name) => Some(name),
        Value::Object(fields) => fields
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        let url = format!("{}/{}/latest", self.base_url, package_name);

        let latest: NpmLatestResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, package_name))
            .await?;

        Ok(
            PackageVersion::new(package_name, latest.version, REGISTRY_NAME, url)
                .with_description(latest.description)
                .with_homepage(latest.homepage)
                .with_license(license_name(latest.license)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::Server;

    fn registry(base_url: &str) -> NpmRegistry {
        NpmRegistry::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), base_url)
    }

    #[tokio::test]
    async fn get_latest_version_reads_fields_from_root_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/react/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "react",
                    "version": "18.2.0",
                    "description": "React is a JavaScript library for building user interfaces.",
                    "homepage": "https://react.dev/",
                    "license": "MIT"
                }"#,
            )
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("react")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "react");
        assert_eq!(result.version, "18.2.0");
        assert_eq!(result.registry, "npm");
        assert_eq!(result.registry_url, format!("{}/react/latest", server.url()));
        assert_eq!(result.homepage.as_deref(), Some("https://react.dev/"));
        assert_eq!(result.license.as_deref(), Some("MIT"));
    }

    #[tokio::test]
    async fn get_latest_version_trims_package_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lodash/latest")
            .with_status(200)
            .with_body(r#"{"version": "4.17.21"}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("  lodash  ")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "lodash");
        assert_eq!(result.description, None);
    }

    #[tokio::test]
    async fn get_latest_version_reads_legacy_license_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/old-package/latest")
            .with_status(200)
            .with_body(r#"{"version": "0.1.0", "license": {"type": "BSD", "url": "x"}}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("old-package")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.license.as_deref(), Some("BSD"));
    }

    #[tokio::test]
    async fn get_latest_version_uses_unknown_when_version_missing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/weird/latest")
            .with_status(200)
            .with_body(r#"{"name": "weird"}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("weird")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.version, "unknown");
    }

    #[tokio::test]
    async fn get_latest_version_returns_not_found_for_missing_package() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/nonexistent/latest")
            .with_status(404)
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("nonexistent")
            .await;

        mock.assert_async().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Package 'nonexistent' not found in npm registry"
        );
    }
}
