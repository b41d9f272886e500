//! Swift package adapter (GitHub releases of `owner/repo`)

use crate::version::error::RegistryError;
use crate::version::http::HttpClient;
use crate::version::registries::github::GitHubApi;
use crate::version::registries::non_empty;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const REGISTRY_NAME: &str = "swift";
pub const ALIASES: &[&str] = &["spm"];

pub struct SwiftRegistry {
    github: GitHubApi,
}

impl SwiftRegistry {
    pub fn new(client: HttpClient, github_base_url: &str) -> Self {
        Self {
            github: GitHubApi::new(client, github_base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for SwiftRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError> {
        let package_name = validate_name(package_name, "Package")?;
        if !package_name.contains('/') {
            return Err(RegistryError::InvalidArgument(
                "Swift package name must be in 'owner/repo' format".to_string(),
            ));
        }
        let url = self.github.latest_release_url(package_name);

        let release = self.github.latest_release(&url, package_name).await?;
        let tag_name = non_empty(release.tag_name).ok_or_else(|| {
            RegistryError::NotFound(format!(
                "No release found for package '{}'",
                package_name
            ))
        })?;
        let description =
            non_empty(release.body).unwrap_or_else(|| format!("Swift package {}", package_name));

        Ok(
            PackageVersion::new(package_name, Some(tag_name), REGISTRY_NAME, url)
                .with_description(Some(description))
                .with_homepage(Some(format!("https://github.com/{}", package_name))),
        )
    }
}
