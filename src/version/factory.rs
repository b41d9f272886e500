//! Registry factory: maps package-manager identifiers onto adapters
//!
//! The full adapter set is enumerated once by [`build_registry`]; nothing registers
//! itself implicitly. Identifiers are matched case-insensitively after trimming, and
//! aliases resolve to their canonical registry before lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::version::error::RegistryError;
use crate::version::http::HttpClient;
use crate::version::registries::{
    self, BiocondaRegistry, ComposerRegistry, CpanRegistry, CranRegistry, CratesIoRegistry,
    DockerHubRegistry, GoRegistry, HexRegistry, HomebrewRegistry, MavenRegistry,
    NextflowRegistry, NfCoreModuleRegistry, NfCoreSubworkflowRegistry, NpmRegistry,
    NuGetRegistry, PypiRegistry, RubyGemsRegistry, SwiftRegistry, TerraformRegistry,
};
use crate::version::registry::Registry;
use crate::version::types::PackageVersion;

/// Lookup table from canonical names and aliases to registry adapters
#[derive(Default)]
pub struct RegistryFactory {
    registries: HashMap<&'static str, Arc<dyn Registry>>,
    aliases: HashMap<String, &'static str>,
}

fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

impl RegistryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under its canonical name plus `aliases`
    ///
    /// Fails without modifying the table if the canonical name is already taken, or if
    /// any alias is already bound to (or is the canonical name of) another registry.
    pub fn register(
        &mut self,
        registry: Arc<dyn Registry>,
        aliases: &[&str],
    ) -> Result<(), RegistryError> {
        let name = registry.registry_name();

        if self.registries.contains_key(name) {
            return Err(RegistryError::DuplicateRegistry(name.to_string()));
        }
        if let Some(existing) = self.aliases.get(name) {
            return Err(RegistryError::DuplicateAlias {
                alias: name.to_string(),
                existing: existing.to_string(),
                registry: name.to_string(),
            });
        }

        let mut normalized = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let alias = normalize_identifier(alias);
            let existing = self
                .aliases
                .get(&alias)
                .copied()
                .or_else(|| self.registries.get_key_value(alias.as_str()).map(|(k, _)| *k));
            if let Some(existing) = existing {
                return Err(RegistryError::DuplicateAlias {
                    alias,
                    existing: existing.to_string(),
                    registry: name.to_string(),
                });
            }
            if alias != name {
                normalized.push(alias);
            }
        }

        for alias in normalized {
            self.aliases.insert(alias, name);
        }
        self.registries.insert(name, registry);
        Ok(())
    }

    /// Resolves a canonical name or alias to its adapter
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn Registry>, RegistryError> {
        let identifier = normalize_identifier(identifier);
        let name = self
            .aliases
            .get(&identifier)
            .copied()
            .unwrap_or(identifier.as_str());

        self.registries
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownRegistry {
                name: identifier.clone(),
                valid: self.available_registries().join(", "),
            })
    }

    /// Every accepted identifier, canonical names and aliases alike, sorted
    pub fn available_registries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registries
            .keys()
            .map(|name| name.to_string())
            .chain(self.aliases.keys().cloned())
            .collect();
        names.sort();
        names
    }

    /// Canonical registry names, sorted
    pub fn registry_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.registries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Aliases bound to the canonical registry `name`, sorted
    pub fn aliases_of(&self, name: &str) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| **canonical == name)
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();
        aliases
    }

    /// Resolves `manager` and fetches the latest version of `package_name` from it
    pub async fn get_latest_version(
        &self,
        manager: &str,
        package_name: &str,
    ) -> Result<PackageVersion, RegistryError> {
        self.resolve(manager)?
            .get_latest_version(package_name)
            .await
    }
}

/// Builds a factory with every supported registry at its public endpoint
pub fn build_registry(client: HttpClient) -> Result<RegistryFactory, RegistryError> {
    build_registry_with(client, |default_url| default_url.to_string())
}

/// Builds a factory with every supported registry, letting `endpoint` map each
/// adapter's default base URL to the one actually used (mirrors, test servers)
pub fn build_registry_with(
    client: HttpClient,
    endpoint: impl Fn(&str) -> String,
) -> Result<RegistryFactory, RegistryError> {
    use registries::{
        bioconda, composer, cpan, cran, crates_io, dockerhub, github, go, hex, homebrew, maven,
        nextflow, nfcore, npm, nuget, pypi, rubygems, swift, terraform,
    };

    let github_url = endpoint(github::DEFAULT_BASE_URL);
    let mut factory = RegistryFactory::new();

    factory.register(
        Arc::new(NpmRegistry::new(client.clone(), &endpoint(npm::DEFAULT_BASE_URL))),
        npm::ALIASES,
    )?;
    factory.register(
        Arc::new(RubyGemsRegistry::new(
            client.clone(),
            &endpoint(rubygems::DEFAULT_BASE_URL),
        )),
        rubygems::ALIASES,
    )?;
    factory.register(
        Arc::new(PypiRegistry::new(client.clone(), &endpoint(pypi::DEFAULT_BASE_URL))),
        pypi::ALIASES,
    )?;
    factory.register(
        Arc::new(HexRegistry::new(client.clone(), &endpoint(hex::DEFAULT_BASE_URL))),
        hex::ALIASES,
    )?;
    factory.register(
        Arc::new(CratesIoRegistry::new(
            client.clone(),
            &endpoint(crates_io::DEFAULT_BASE_URL),
        )),
        crates_io::ALIASES,
    )?;
    factory.register(
        Arc::new(BiocondaRegistry::new(
            client.clone(),
            &endpoint(bioconda::DEFAULT_BASE_URL),
        )),
        bioconda::ALIASES,
    )?;
    factory.register(
        Arc::new(CranRegistry::new(client.clone(), &endpoint(cran::DEFAULT_BASE_URL))),
        cran::ALIASES,
    )?;
    factory.register(
        Arc::new(TerraformRegistry::new(
            client.clone(),
            &endpoint(terraform::DEFAULT_BASE_URL),
        )),
        terraform::ALIASES,
    )?;
    factory.register(
        Arc::new(DockerHubRegistry::new(
            client.clone(),
            &endpoint(dockerhub::DEFAULT_BASE_URL),
        )),
        dockerhub::ALIASES,
    )?;
    factory.register(
        Arc::new(CpanRegistry::new(client.clone(), &endpoint(cpan::DEFAULT_BASE_URL))),
        cpan::ALIASES,
    )?;
    factory.register(
        Arc::new(GoRegistry::new(
            client.clone(),
            &github_url,
            &endpoint(go::DEFAULT_PKG_GO_DEV_URL),
        )),
        go::ALIASES,
    )?;
    factory.register(
        Arc::new(ComposerRegistry::new(
            client.clone(),
            &endpoint(composer::DEFAULT_BASE_URL),
        )),
        composer::ALIASES,
    )?;
    factory.register(
        Arc::new(NuGetRegistry::new(client.clone(), &endpoint(nuget::DEFAULT_BASE_URL))),
        nuget::ALIASES,
    )?;
    factory.register(
        Arc::new(HomebrewRegistry::new(
            client.clone(),
            &endpoint(homebrew::DEFAULT_BASE_URL),
        )),
        homebrew::ALIASES,
    )?;
    factory.register(
        Arc::new(NextflowRegistry::new(client.clone(), &github_url)),
        nextflow::ALIASES,
    )?;
    factory.register(
        Arc::new(NfCoreModuleRegistry::new(client.clone(), &github_url)),
        nfcore::module::ALIASES,
    )?;
    factory.register(
        Arc::new(NfCoreSubworkflowRegistry::new(client.clone(), &github_url)),
        nfcore::subworkflow::ALIASES,
    )?;
    factory.register(
        Arc::new(SwiftRegistry::new(client.clone(), &github_url)),
        swift::ALIASES,
    )?;
    factory.register(
        Arc::new(MavenRegistry::new(client, &endpoint(maven::DEFAULT_BASE_URL))),
        maven::ALIASES,
    )?;

    Ok(factory)
}
