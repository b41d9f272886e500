//! nf-core modules and subworkflows
//!
//! Neither has release tags, so the most recent commit touching the artifact's
//! directory in `nf-core/modules` stands in for its version: the short SHA is the
//! version and the commit summary becomes the description.

use crate::version::error::RegistryError;
use crate::version::http::HttpClient;
use crate::version::registries::github::GitHubApi;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

const MODULES_REPOSITORY: &str = "nf-core/modules";

/// Which tree of `nf-core/modules` an adapter looks in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Module,
    Subworkflow,
}

impl ArtifactKind {
    fn registry_name(self) -> &'static str {
        match self {
            ArtifactKind::Module => "nf-core-module",
            ArtifactKind::Subworkflow => "nf-core-subworkflow",
        }
    }

    fn directory(self) -> &'static str {
        match self {
            ArtifactKind::Module => "modules",
            ArtifactKind::Subworkflow => "subworkflows",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ArtifactKind::Module => "Module",
            ArtifactKind::Subworkflow => "Subworkflow",
        }
    }

    fn path(self, name: &str) -> String {
        format!("{}/nf-core/{}", self.directory(), name)
    }
}

/// Shared lookup for both artifact kinds
struct CommitLookup {
    github: GitHubApi,
    kind: ArtifactKind,
}

impl CommitLookup {
    async fn latest(&self, name: &str) -> Result<PackageVersion, RegistryError> {
        let name = validate_name(name, self.kind.noun())?;
        let path = self.kind.path(name);
        let url = self.github.latest_commit_url(MODULES_REPOSITORY, &path);

        let commit = self.github.latest_commit(&url, name).await?.ok_or_else(|| {
            RegistryError::NotFound(format!(
                "{} '{}' not found in {}",
                self.kind.noun(),
                name,
                MODULES_REPOSITORY
            ))
        })?;

        Ok(
            PackageVersion::new(name, Some(commit.short_sha()), self.kind.registry_name(), url)
                .with_description(Some(format!(
                    "nf-core {}: {}",
                    self.kind.noun().to_lowercase(),
                    commit.summary()
                )))
                .with_homepage(Some(format!(
                    "https://github.com/{}/tree/master/{}",
                    MODULES_REPOSITORY, path
                ))),
        )
    }
}

pub mod module {
    pub const REGISTRY_NAME: &str = "nf-core-module";
    pub const ALIASES: &[&str] = &["nfcore-module", "nf-module"];
}

pub mod subworkflow {
    pub const REGISTRY_NAME: &str = "nf-core-subworkflow";
    pub const ALIASES: &[&str] = &["nfcore-subworkflow", "nf-subworkflow"];
}

pub struct NfCoreModuleRegistry {
    lookup: CommitLookup,
}

impl NfCoreModuleRegistry {
    pub fn new(client: HttpClient, github_base_url: &str) -> Self {
        Self {
            lookup: CommitLookup {
                github: GitHubApi::new(client, github_base_url),
                kind: ArtifactKind::Module,
            },
        }
    }
}

#[async_trait::async_trait]
impl Registry for NfCoreModuleRegistry {
    fn registry_name(&self) -> &'static str {
        module::REGISTRY_NAME
    }

    async fn get_latest_version(&self, module_name: &str) -> Result<PackageVersion, RegistryError> {
        self.lookup.latest(module_name).await
    }
}

pub struct NfCoreSubworkflowRegistry {
    lookup: CommitLookup,
}

impl NfCoreSubworkflowRegistry {
    pub fn new(client: HttpClient, github_base_url: &str) -> Self {
        Self {
            lookup: CommitLookup {
                github: GitHubApi::new(client, github_base_url),
                kind: ArtifactKind::Subworkflow,
            },
        }
    }
}

#[async_trait::async_trait]
impl Registry for NfCoreSubworkflowRegistry {
    fn registry_name(&self) -> &'static str {
        subworkflow::REGISTRY_NAME
    }

    async fn get_latest_version(
        &self,
        subworkflow_name: &str,
    ) -> Result<PackageVersion, RegistryError> {
        self.lookup.latest(subworkflow_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::{Matcher, Server, ServerGuard};

    fn client() -> HttpClient {
        HttpClient::new(DEFAULT_TIMEOUT).unwrap()
    }

    async fn mock_commits(server: &mut ServerGuard, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/repos/nf-core/modules/commits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("path".into(), path.into()),
                Matcher::UrlEncoded("per_page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[test]
    fn registry_names_match_artifact_kinds() {
        assert_eq!(ArtifactKind::Module.registry_name(), module::REGISTRY_NAME);
        assert_eq!(
            ArtifactKind::Subworkflow.registry_name(),
            subworkflow::REGISTRY_NAME
        );
    }

    #[tokio::test]
    async fn module_version_is_short_sha_of_latest_commit() {
        let mut server = Server::new_async().await;
        let mock = mock_commits(
            &mut server,
            "modules/nf-core/fastqc",
            r#"[{
                "sha": "a1b2c3d4e5f6a7b8c9d0",
                "commit": {"message": "Update fastqc to 0.12.1\n\nCo-authored-by: someone"}
            }]"#,
        )
        .await;

        let result = NfCoreModuleRegistry::new(client(), &server.url())
            .get_latest_version("fastqc")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "fastqc");
        assert_eq!(result.version, "a1b2c3d");
        assert_eq!(result.registry, "nf-core-module");
        assert_eq!(
            result.description.as_deref(),
            Some("nf-core module: Update fastqc to 0.12.1")
        );
        assert_eq!(
            result.homepage.as_deref(),
            Some("https://github.com/nf-core/modules/tree/master/modules/nf-core/fastqc")
        );
    }

    #[tokio::test]
    async fn subworkflow_uses_subworkflows_tree() {
        let mut server = Server::new_async().await;
        let mock = mock_commits(
            &mut server,
            "subworkflows/nf-core/bam_sort_stats_samtools",
            r#"[{"sha": "0011223344", "commit": {"message": "Fix channel names"}}]"#,
        )
        .await;

        let result = NfCoreSubworkflowRegistry::new(client(), &server.url())
            .get_latest_version("bam_sort_stats_samtools")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.version, "0011223");
        assert_eq!(result.registry, "nf-core-subworkflow");
        assert_eq!(
            result.description.as_deref(),
            Some("nf-core subworkflow: Fix channel names")
        );
    }

    #[tokio::test]
    async fn empty_commit_history_is_not_found() {
        let mut server = Server::new_async().await;
        let mock = mock_commits(&mut server, "modules/nf-core/nonexistent", "[]").await;

        let result = NfCoreModuleRegistry::new(client(), &server.url())
            .get_latest_version("nonexistent")
            .await;

        mock.assert_async().await;
        let error = result.unwrap_err();
        assert!(matches!(error, RegistryError::NotFound(_)));
        assert_eq!(
            error.to_string(),
            "Module 'nonexistent' not found in nf-core/modules"
        );
    }

    #[tokio::test]
    async fn blank_name_uses_artifact_noun() {
        let result = NfCoreSubworkflowRegistry::new(client(), "http://127.0.0.1:1")
            .get_latest_version("  ")
            .await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Subworkflow name cannot be empty"
        );
    }
}
