//! Go module adapter
//!
//! `github.com/<owner>/<repo>/...` paths resolve through the GitHub releases API.
//! Every other path only confirms the module exists on pkg.go.dev and reports the
//! placeholder version `"latest"`; the HTML page is not parsed.

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, QUERY_USER_AGENT, Target};
use crate::version::registries::github::GitHubApi;
use crate::version::registries::{non_empty, normalize_base_url};
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_PKG_GO_DEV_URL: &str = "https://pkg.go.dev";

pub const REGISTRY_NAME: &str = "go";
pub const ALIASES: &[&str] = &["golang"];

/// Version reported for modules resolved through pkg.go.dev
pub const PLACEHOLDER_VERSION: &str = "latest";

const FALLBACK_LABEL: &str = "Go module";

const HTML_HEADERS: &[(&str, &str)] =
    &[("Accept", "text/html"), ("User-Agent", QUERY_USER_AGENT)];

/// Returns `owner/repo` for GitHub-hosted module paths
fn github_repository(module_path: &str) -> Option<String> {
    let rest = module_path.strip_prefix("github.com/")?;
    let mut parts = rest.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Some(format!("{}/{}", owner, repo))
        }
        _ => None,
    }
}

pub struct GoRegistry {
    client: HttpClient,
    github: GitHubApi,
    pkg_go_dev_url: String,
}

impl GoRegistry {
    pub fn new(client: HttpClient, github_base_url: &str, pkg_go_dev_url: &str) -> Self {
        Self {
            github: GitHubApi::new(client.clone(), github_base_url),
            client,
            pkg_go_dev_url: normalize_base_url(pkg_go_dev_url),
        }
    }

    async fn from_github(
        &self,
        module_path: &str,
        repository: &str,
    ) -> Result<PackageVersion, RegistryError> {
        let url = self.github.latest_release_url(repository);
        let release = self.github.latest_release(&url, module_path).await?;
        let description =
            non_empty(release.body).unwrap_or_else(|| format!("Go module {}", module_path));

        Ok(
            PackageVersion::new(module_path, release.tag_name, REGISTRY_NAME, url)
                .with_description(Some(description))
                .with_homepage(Some(format!("https://pkg.go.dev/{}", module_path))),
        )
    }

    async fn from_pkg_go_dev(&self, module_path: &str) -> Result<PackageVersion, RegistryError> {
        let url = format!("{}/{}", self.pkg_go_dev_url, module_path);
        self.client
            .get_text(
                &url,
                HTML_HEADERS,
                &Target::new(FALLBACK_LABEL, "Module", module_path),
            )
            .await?;

        Ok(PackageVersion::new(
            module_path,
            Some(PLACEHOLDER_VERSION.to_string()),
            REGISTRY_NAME,
            url.clone(),
        )
        .with_description(Some(format!("Go module {}", module_path)))
        .with_homepage(Some(url)))
    }
}

#[async_trait::async_trait]
impl Registry for GoRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, module_path: &str) -> Result<PackageVersion, RegistryError> {
        let module_path = validate_name(module_path, "Module")?;

        match github_repository(module_path) {
            Some(repository) => self.from_github(module_path, &repository).await,
            None => self.from_pkg_go_dev(module_path).await,
        }
    }
}
