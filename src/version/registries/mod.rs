//! Registry adapters, one per package ecosystem

pub mod bioconda;
pub mod composer;
pub mod cpan;
pub mod cran;
pub mod crates_io;
pub mod dockerhub;
pub mod github;
pub mod go;
pub mod hex;
pub mod homebrew;
pub mod maven;
pub mod nextflow;
pub mod nfcore;
pub mod npm;
pub mod nuget;
pub mod pypi;
pub mod rubygems;
pub mod swift;
pub mod terraform;

use serde::{Deserialize, Deserializer};

pub use bioconda::BiocondaRegistry;
pub use composer::ComposerRegistry;
pub use cpan::CpanRegistry;
pub use cran::CranRegistry;
pub use crates_io::CratesIoRegistry;
pub use dockerhub::DockerHubRegistry;
pub use go::GoRegistry;
pub use hex::HexRegistry;
pub use homebrew::HomebrewRegistry;
pub use maven::MavenRegistry;
pub use nextflow::NextflowRegistry;
pub use nfcore::{NfCoreModuleRegistry, NfCoreSubworkflowRegistry};
pub use npm::NpmRegistry;
pub use nuget::NuGetRegistry;
pub use pypi::PypiRegistry;
pub use rubygems::RubyGemsRegistry;
pub use swift::SwiftRegistry;
pub use terraform::TerraformRegistry;

/// Deserializes `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strips trailing slashes so paths can be appended with `format!`
fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Drops empty strings, which several registries use instead of null
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
