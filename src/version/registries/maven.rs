//! Maven Central adapter, backed by the search.maven.org Solr endpoint

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://search.maven.org";

pub const REGISTRY_NAME: &str = "maven";
pub const ALIASES: &[&str] = &["mvn"];

const LABEL: &str = "Maven Central";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchDoc {
    latest_version: Option<String>,
}

/// Splits `groupId:artifactId`
fn parse_coordinates(artifact_name: &str) -> Result<(&str, &str), RegistryError> {
    match artifact_name.split_once(':') {
        Some((group_id, artifact_id)) if !group_id.is_empty() && !artifact_id.is_empty() => {
            Ok((group_id, artifact_id))
        }
        _ => Err(RegistryError::InvalidArgument(
            "Maven artifact name must be in 'groupId:artifactId' format".to_string(),
        )),
    }
}

pub struct MavenRegistry {
    client: HttpClient,
    base_url: String,
}

impl MavenRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for MavenRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, artifact_name: &str) -> Result<PackageVersion, RegistryError> {
        let artifact_name = validate_name(artifact_name, "Artifact")?;
        let (group_id, artifact_id) = parse_coordinates(artifact_name)?;
        let url = format!(
            "{}/solrsearch/select?q=g:{}+AND+a:{}&rows=1&wt=json",
            self.base_url, group_id, artifact_id
        );

        let search: SearchResponse = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, artifact_name))
            .await?;

        let doc = search.response.docs.into_iter().next().ok_or_else(|| {
            RegistryError::NotFound(format!("Artifact '{}' not found", artifact_name))
        })?;
        let latest = doc.latest_version.filter(|v| !v.is_empty()).ok_or_else(|| {
            RegistryError::NotFound(format!(
                "No version found for artifact '{}'",
                artifact_name
            ))
        })?;

        Ok(
            PackageVersion::new(artifact_name, Some(latest), REGISTRY_NAME, url)
                .with_description(Some(format!("Maven artifact {}", artifact_name)))
                .with_homepage(Some(format!(
                    "https://search.maven.org/artifact/{}/{}",
                    group_id, artifact_id
                ))),
        )
    }
}
