//! Nextflow pipeline adapter (nf-core pipelines, via GitHub releases)

use crate::version::error::RegistryError;
use crate::version::http::HttpClient;
use crate::version::registries::github::GitHubApi;
use crate::version::registries::non_empty;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const REGISTRY_NAME: &str = "nextflow";
pub const ALIASES: &[&str] = &["nf-core"];

const ORGANIZATION_PREFIX: &str = "nf-core/";

/// `rnaseq` becomes `nf-core/rnaseq`; qualified names are kept
fn repository_path(pipeline_name: &str) -> String {
    if pipeline_name.starts_with(ORGANIZATION_PREFIX) {
        pipeline_name.to_string()
    } else {
        format!("{}{}", ORGANIZATION_PREFIX, pipeline_name)
    }
}

pub struct NextflowRegistry {
    github: GitHubApi,
}

impl NextflowRegistry {
    pub fn new(client: HttpClient, github_base_url: &str) -> Self {
        Self {
            github: GitHubApi::new(client, github_base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for NextflowRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, pipeline_name: &str) -> Result<PackageVersion, RegistryError> {
        let pipeline_name = validate_name(pipeline_name, "Package")?;
        let repository = repository_path(pipeline_name);
        let url = self.github.latest_release_url(&repository);

        let release = self.github.latest_release(&url, pipeline_name).await?;
        let tag_name = non_empty(release.tag_name).ok_or_else(|| {
            RegistryError::NotFound(format!(
                "No release found for pipeline '{}'",
                pipeline_name
            ))
        })?;
        let description = non_empty(release.body)
            .unwrap_or_else(|| format!("Nextflow pipeline {}", pipeline_name));

        Ok(
            PackageVersion::new(pipeline_name, Some(tag_name), REGISTRY_NAME, url)
                .with_description(Some(description))
                .with_homepage(Some(format!("https://github.com/{}", repository))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::Server;
    use rstest::rstest;

    fn registry(base_url: &str) -> NextflowRegistry {
        NextflowRegistry::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), base_url)
    }

    #[rstest]
    #[case("rnaseq", "nf-core/rnaseq")]
    #[case("nf-core/sarek", "nf-core/sarek")]
    fn repository_path_prefixes_bare_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(repository_path(name), expected);
    }

    #[tokio::test]
    async fn get_latest_version_prefixes_bare_pipeline_names() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/nf-core/rnaseq/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "3.14.0", "body": ""}"#)
            .create_async()
            .await;

        let result = registry(&server.url())
            .get_latest_version("rnaseq")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "rnaseq");
        assert_eq!(result.version, "3.14.0");
        assert_eq!(result.registry, "nextflow");
        assert_eq!(
            result.description.as_deref(),
            Some("Nextflow pipeline rnaseq")
        );
        assert_eq!(
            result.homepage.as_deref(),
            Some("https://github.com/nf-core/rnaseq")
        );
    }

    #[tokio::test]
    async fn get_latest_version_fails_without_tag_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/nf-core/draft/releases/latest")
            .with_status(200)
            .with_body(r#"{"name": "draft"}"#)
            .create_async()
            .await;

        let result = registry(&server.url()).get_latest_version("draft").await;

        mock.assert_async().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No release found for pipeline 'draft'"
        );
    }
}
