//! Registry trait for fetching the latest version of a package

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::PackageVersion;

/// Trait implemented by every registry adapter
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Canonical name of the registry (e.g. "npm", "crates")
    fn registry_name(&self) -> &'static str;

    /// Fetches the latest published version of a package
    ///
    /// # Arguments
    /// * `package_name` - Registry-specific identifier (e.g. "serde", "hashicorp/aws",
    ///   "org.springframework:spring-core"); surrounding whitespace is ignored
    ///
    /// # Returns
    /// * `Ok(PackageVersion)` - The latest version with whatever metadata the registry exposes
    /// * `Err(RegistryError)` - If the name is invalid, the package is missing or the fetch fails
    async fn get_latest_version(&self, package_name: &str) -> Result<PackageVersion, RegistryError>;
}

/// Trims `name`, rejecting empty or all-whitespace input.
///
/// `noun` names the kind of identifier in the error ("Package", "Crate", ...).
pub fn validate_name<'a>(name: &'a str, noun: &str) -> Result<&'a str, RegistryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidArgument(format!(
            "{} name cannot be empty",
            noun
        )));
    }
    Ok(trimmed)
}
