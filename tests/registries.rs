//! Every adapter driven through the public factory against a mock upstream

use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;

use versionator::version::error::{ErrorKind, RegistryError};
use versionator::version::factory::{RegistryFactory, build_registry_with};
use versionator::version::http::{DEFAULT_TIMEOUT, HttpClient};

/// Routes each registry to `<mock server>/<original host>` so recorded URLs keep
/// the upstream host name
fn factory_for(server: &ServerGuard) -> RegistryFactory {
    let base = server.url();
    build_registry_with(HttpClient::new(DEFAULT_TIMEOUT).unwrap(), move |default_url| {
        format!("{}/{}", base, default_url.trim_start_matches("https://"))
    })
    .unwrap()
}

#[tokio::test]
async fn crates_lookup_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/crates.io/api/v1/crates/serde")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "crate": {
                    "name": "serde",
                    "newest_version": "1.0.152",
                    "description": "A generic serialization/deserialization framework",
                    "homepage": "https://serde.rs"
                },
                "versions": [{"num": "9.9.9"}]
            }"#,
        )
        .create_async()
        .await;

    let record = factory_for(&server)
        .get_latest_version("cargo", "serde")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(record.name, "serde");
    assert_eq!(record.version, "1.0.152");
    assert_eq!(record.registry, "crates");
    assert!(record.registry_url.contains("crates.io"));
    assert!(record.query_time.ends_with('Z'));
    assert_eq!(record.license, None);
}

#[rstest]
#[case("npm", "nonexistent-pkg", "Package 'nonexistent-pkg' not found in npm registry")]
#[case("rubygems", "nonexistent-gem", "Gem 'nonexistent-gem' not found in RubyGems registry")]
#[case("pypi", "nonexistent-pkg", "Package 'nonexistent-pkg' not found in PyPI registry")]
#[case("hex", "nonexistent_pkg", "Package 'nonexistent_pkg' not found in Hex.pm registry")]
#[case("crates", "nonexistent-crate", "Package 'nonexistent-crate' not found in crates.io registry")]
#[case("bioconda", "nonexistent", "Package 'nonexistent' not found in Bioconda registry")]
#[case("cran", "nonexistent", "Package 'nonexistent' not found in CRAN registry")]
#[case(
    "terraform",
    "nobody/nothing",
    "Package 'nobody/nothing' not found in Terraform Registry registry"
)]
#[case("dockerhub", "nonexistent", "Package 'nonexistent' not found in DockerHub registry")]
#[case("cpan", "No::Such::Module", "Package 'No::Such::Module' not found in CPAN registry")]
#[case(
    "go",
    "github.com/nobody/nothing",
    "Package 'github.com/nobody/nothing' not found in GitHub registry"
)]
#[case("go", "example.com/nothing", "Module 'example.com/nothing' not found in Go module registry")]
#[case("composer", "nobody/nothing", "Package 'nobody/nothing' not found in Packagist registry")]
#[case("nuget", "No.Such.Package", "Package 'No.Such.Package' not found in NuGet registry")]
#[case("homebrew", "nonexistent", "Package 'nonexistent' not found in Homebrew registry")]
#[case("nextflow", "nonexistent", "Package 'nonexistent' not found in GitHub registry")]
#[case("nf-core-module", "nonexistent", "Package 'nonexistent' not found in GitHub registry")]
#[case("nf-core-subworkflow", "nonexistent", "Package 'nonexistent' not found in GitHub registry")]
#[case("swift", "nobody/nothing", "Package 'nobody/nothing' not found in GitHub registry")]
#[case("maven", "org.none:nothing", "Package 'org.none:nothing' not found in Maven Central registry")]
#[tokio::test]
async fn upstream_404_is_not_found_naming_package_and_registry(
    #[case] manager: &str,
    #[case] package: &str,
    #[case] expected: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error": "Not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let error = factory_for(&server)
        .get_latest_version(manager, package)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.to_string(), expected);
}

#[rstest]
#[case("npm", "react", "npm")]
#[case("rubygems", "rails", "RubyGems")]
#[case("pypi", "django", "PyPI")]
#[case("hex", "phoenix", "Hex.pm")]
#[case("crates", "serde", "crates.io")]
#[case("bioconda", "samtools", "Bioconda")]
#[case("cran", "ggplot2", "CRAN")]
#[case("terraform", "hashicorp/aws", "Terraform Registry")]
#[case("dockerhub", "nginx", "DockerHub")]
#[case("cpan", "JSON", "CPAN")]
#[case("go", "github.com/gin-gonic/gin", "GitHub")]
#[case("go", "golang.org/x/text", "Go module")]
#[case("composer", "symfony/console", "Packagist")]
#[case("nuget", "Newtonsoft.Json", "NuGet")]
#[case("homebrew", "git", "Homebrew")]
#[case("nextflow", "rnaseq", "GitHub")]
#[case("nf-core-module", "fastqc", "GitHub")]
#[case("nf-core-subworkflow", "bam_sort_stats_samtools", "GitHub")]
#[case("swift", "apple/swift-argument-parser", "GitHub")]
#[case("maven", "org.springframework:spring-core", "Maven Central")]
#[tokio::test]
async fn upstream_500_is_upstream_error_with_status_and_body(
    #[case] manager: &str,
    #[case] package: &str,
    #[case] label: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let error = factory_for(&server)
        .get_latest_version(manager, package)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(error, RegistryError::Upstream { status: 500, .. }));
    assert_eq!(error.kind(), ErrorKind::Upstream);
    assert_eq!(
        error.to_string(),
        format!("{} API error 500: upstream exploded", label)
    );
}

#[rstest]
#[case("npm", "Package")]
#[case("rubygems", "Package")]
#[case("pypi", "Package")]
#[case("hex", "Package")]
#[case("crates", "Crate")]
#[case("bioconda", "Package")]
#[case("cran", "Package")]
#[case("terraform", "Provider")]
#[case("dockerhub", "Image")]
#[case("cpan", "Module")]
#[case("go", "Module")]
#[case("composer", "Package")]
#[case("nuget", "Package")]
#[case("homebrew", "Formula")]
#[case("nextflow", "Package")]
#[case("nf-core-module", "Module")]
#[case("nf-core-subworkflow", "Subworkflow")]
#[case("swift", "Package")]
#[case("maven", "Artifact")]
#[tokio::test]
async fn blank_name_is_rejected_without_a_request(#[case] manager: &str, #[case] noun: &str) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let factory = factory_for(&server);

    for blank in ["", "   "] {
        let error = factory
            .get_latest_version(manager, blank)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.to_string(), format!("{} name cannot be empty", noun));
    }

    mock.assert_async().await;
}

#[rstest]
#[case("maven", "spring-core")]
#[case("maven", ":spring-core")]
#[case("swift", "alamofire")]
#[tokio::test]
async fn malformed_composite_identifier_is_rejected_without_a_request(
    #[case] manager: &str,
    #[case] package: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let error = factory_for(&server)
        .get_latest_version(manager, package)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(error, RegistryError::InvalidArgument(_)));
}

#[tokio::test]
async fn alias_and_canonical_name_hit_the_same_upstream() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/hub.docker.com/v2/repositories/library/nginx/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": [{"name": "1.25.3"}, {"name": "1.25.2"}]}"#)
        .expect(2)
        .create_async()
        .await;
    let factory = factory_for(&server);

    let canonical = factory.get_latest_version("dockerhub", "nginx").await.unwrap();
    let alias = factory.get_latest_version(" Docker ", "nginx").await.unwrap();

    mock.assert_async().await;
    assert_eq!(canonical.version, "1.25.3");
    assert_eq!(alias.version, canonical.version);
    assert_eq!(alias.registry, "dockerhub");
    assert_eq!(
        alias.homepage.as_deref(),
        Some("https://hub.docker.com/_/nginx")
    );
}
