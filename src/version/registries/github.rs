//! GitHub REST API helpers shared by the Go, Nextflow, Swift and nf-core adapters

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, QUERY_USER_AGENT, Target};
use crate::version::registries::normalize_base_url;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Registry label used in error messages for GitHub-backed lookups
pub const LABEL: &str = "GitHub";

const HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/vnd.github.v3+json"),
    ("User-Agent", QUERY_USER_AGENT),
];

/// Response from `GET /repos/{owner}/{repo}/releases/latest`
#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: Option<String>,
    pub body: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub message: String,
}

impl Commit {
    /// First seven characters of the SHA
    pub fn short_sha(&self) -> String {
        self.sha.chars().take(7).collect()
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }
}

/// Thin client for the two GitHub endpoints the adapters need
#[derive(Debug, Clone)]
pub struct GitHubApi {
    client: HttpClient,
    base_url: String,
}

impl GitHubApi {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn latest_release_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/releases/latest", self.base_url, repo)
    }

    /// Fetches the release at `url` (see [`Self::latest_release_url`])
    pub async fn latest_release(
        &self,
        url: &str,
        subject: &str,
    ) -> Result<Release, RegistryError> {
        self.client
            .get_json(url, HEADERS, &Target::package(LABEL, subject))
            .await
    }

    pub fn latest_commit_url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/commits?path={}&per_page=1",
            self.base_url, repo, path
        )
    }

    /// Fetches the most recent commit at `url` (see [`Self::latest_commit_url`])
    ///
    /// Returns `None` when no commit touches the path.
    pub async fn latest_commit(
        &self,
        url: &str,
        subject: &str,
    ) -> Result<Option<Commit>, RegistryError> {
        let commits: Vec<Commit> = self
            .client
            .get_json(url, HEADERS, &Target::package(LABEL, subject))
            .await?;
        Ok(commits.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::http::DEFAULT_TIMEOUT;
    use mockito::{Matcher, Server};

    fn api(base_url: &str) -> GitHubApi {
        GitHubApi::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), base_url)
    }

    #[tokio::test]
    async fn latest_release_sends_github_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/nf-core/rnaseq/releases/latest")
            .match_header("accept", "application/vnd.github.v3+json")
            .match_header("user-agent", QUERY_USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "3.14.0", "body": "Release notes"}"#)
            .create_async()
            .await;

        let api = api(&server.url());
        let url = api.latest_release_url("nf-core/rnaseq");
        let release = api.latest_release(&url, "rnaseq").await.unwrap();

        mock.assert_async().await;
        assert_eq!(release.tag_name.as_deref(), Some("3.14.0"));
        assert_eq!(release.body.as_deref(), Some("Release notes"));
    }

    #[tokio::test]
    async fn latest_commit_returns_none_for_empty_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/nf-core/modules/commits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("path".into(), "modules/nf-core/missing".into()),
                Matcher::UrlEncoded("per_page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = api(&server.url());
        let url = api.latest_commit_url("nf-core/modules", "modules/nf-core/missing");
        let commit = api.latest_commit(&url, "missing").await.unwrap();

        mock.assert_async().await;
        assert!(commit.is_none());
    }

    #[test]
    fn commit_exposes_short_sha_and_summary() {
        let commit = Commit {
            sha: "0123456789abcdef".to_string(),
            commit: CommitDetail {
                message: "Bump fastqc to 0.12.1\n\nDetails".to_string(),
            },
        };

        assert_eq!(commit.short_sha(), "0123456");
        assert_eq!(commit.summary(), "Bump fastqc to 0.12.1");
    }
}
