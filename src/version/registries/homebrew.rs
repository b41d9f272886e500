//! Homebrew formula adapter

use serde::Deserialize;

use crate::version::error::RegistryError;
use crate::version::http::{HttpClient, Target};
use crate::version::registries::normalize_base_url;
use crate::version::registry::{Registry, validate_name};
use crate::version::types::PackageVersion;

pub const DEFAULT_BASE_URL: &str = "https://formulae.brew.sh";

pub const REGISTRY_NAME: &str = "homebrew";
pub const ALIASES: &[&str] = &["brew"];

const LABEL: &str = "Homebrew";

#[derive(Debug, Deserialize)]
struct Formula {
    #[serde(default)]
    versions: FormulaVersions,
    desc: Option<String>,
    homepage: Option<String>,
    license: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FormulaVersions {
    stable: Option<String>,
}

pub struct HomebrewRegistry {
    client: HttpClient,
    base_url: String,
}

impl HomebrewRegistry {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait::async_trait]
impl Registry for HomebrewRegistry {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn get_latest_version(&self, formula_name: &str) -> Result<PackageVersion, RegistryError> {
        let formula_name = validate_name(formula_name, "Formula")?;
        let url = format!("{}/api/formula/{}.json", self.base_url, formula_name);

        let formula: Formula = self
            .client
            .get_json(&url, &[], &Target::package(LABEL, formula_name))
            .await?;

        let stable = formula
            .versions
            .stable
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                RegistryError::NotFound(format!(
                    "No stable version found for formula '{}'",
                    formula_name
                ))
            })?;

        Ok(
            PackageVersion::new(formula_name, Some(stable), REGISTRY_NAME, url)
                .with_description(formula.desc)
                .with_homepage(formula.homepage)
                .with_license(formula.license),
        )
    }
}
