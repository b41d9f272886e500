//! DockerHub image tag adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://hub.docker.com";

pub const REGISTRY_NAME: &str = "dockerhub";
pub const ALIASES: &[&str] = &["docker"];

const LABEL: &str = "DockerHub";

/// Namespace DockerHub uses for official images
const OFFICIAL_NAMESPACE: &str = "library";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: Option<String>,
}

/// Splits `image` into `(namespace, repository)`; bare names are official images
fn split_image_name(image: &str) -> (&str, &str) {
    image.split_once('/').unwrap_or((OFFICIAL_NAMESPACE, image))
}

fn image_homepage(namespace: &str, repository: &str) -> String {
    if namespace == OFFICIAL_NAMESPACE {
        format!("https://hub.docker.com/_/{}", repository)
    } else {
        format!("https://hub.docker.com/r/{}/{}", namespace, repository)
    }
}

pub struct DockerHubRegistry {
    client: HttpClient,
    base_url: String,
}

impl DockerHubRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for DockerHubRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, image_name: &str) -> Result<PackageVersion, RegistryError> {
        let image_name = validate_name(image_name, "Image")?;
        let (namespace, repository) = split_image_name(image_name);
        let url = format!(
            "{}/v2/repositories/{}/{}/tags",
            self.base_url, namespace, repository
        );

        let tags: TagsResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, image_name))
            .await?;

        // DockerHub lists the most recently pushed tag first
        let latest = tags.results.into_iter().next().ok_or_else(|| {
            RegistryError::NotFound(format!("No tags found for image '{}'", image_name))
        })?;

        Ok(
            PackageVersion::new(image_name, latest.name, REGISTRY_NAME, url)
                .with_description(Some(format!("Docker image {}", image_name)))
                .with_homepage(Some(image_homepage(namespace, repository))),
        )
    }
}
