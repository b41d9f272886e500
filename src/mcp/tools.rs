//! Tool catalogue and dispatch
//!
//! Every query tool resolves to one [`RegistryFactory`] call. The factory is rebuilt
//! whenever the request timeout changes, so in-flight calls keep the adapters they
//! started with.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::version::error::{ErrorKind, RegistryError};
use crate::version::factory::{RegistryFactory, build_registry_with};
use crate::version::http::HttpClient;
use crate::version::types::PackageVersion;

pub const SERVICE_NAME: &str = "versionator";

pub const GET_PACKAGE_VERSION: &str = "get_package_version";
pub const SET_REQUEST_TIMEOUT: &str = "set_request_timeout";
pub const HEALTH_CHECK: &str = "health_check";

/// A tool bound to exactly one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryTool {
    pub name: &'static str,
    pub registry: &'static str,
    pub param: &'static str,
    pub description: &'static str,
}

pub const REGISTRY_TOOLS: &[RegistryTool] = &[
    RegistryTool {
        name: "get_npm_package",
        registry: "npm",
        param: "package_name",
        description: "Get the latest version of an npm package.",
    },
    RegistryTool {
        name: "get_ruby_gem",
        registry: "rubygems",
        param: "gem_name",
        description: "Get the latest version of a Ruby gem.",
    },
    RegistryTool {
        name: "get_python_package",
        registry: "pypi",
        param: "package_name",
        description: "Get the latest version of a Python package from PyPI.",
    },
    RegistryTool {
        name: "get_elixir_package",
        registry: "hex",
        param: "package_name",
        description: "Get the latest version of an Elixir package from Hex.pm.",
    },
    RegistryTool {
        name: "get_rust_crate",
        registry: "crates",
        param: "crate_name",
        description: "Get the latest version of a Rust crate from crates.io.",
    },
    RegistryTool {
        name: "get_bioconda_package",
        registry: "bioconda",
        param: "package_name",
        description: "Get the latest version of a Bioconda package.",
    },
    RegistryTool {
        name: "get_r_package",
        registry: "cran",
        param: "package_name",
        description: "Get the latest version of an R package from CRAN.",
    },
    RegistryTool {
        name: "get_terraform_provider",
        registry: "terraform",
        param: "provider_path",
        description: "Get the latest version of a Terraform provider (e.g. 'hashicorp/aws').",
    },
    RegistryTool {
        name: "get_docker_image",
        registry: "dockerhub",
        param: "image_name",
        description: "Get the latest tag of a Docker Hub image.",
    },
    RegistryTool {
        name: "get_perl_module",
        registry: "cpan",
        param: "module_name",
        description: "Get the latest version of a Perl module from CPAN.",
    },
    RegistryTool {
        name: "get_go_module",
        registry: "go",
        param: "module_path",
        description: "Get the latest version of a Go module (e.g. 'github.com/gin-gonic/gin').",
    },
    RegistryTool {
        name: "get_php_package",
        registry: "composer",
        param: "package_name",
        description: "Get the latest version of a PHP package from Packagist.",
    },
    RegistryTool {
        name: "get_dotnet_package",
        registry: "nuget",
        param: "package_name",
        description: "Get the latest version of a .NET package from NuGet.",
    },
    RegistryTool {
        name: "get_homebrew_formula",
        registry: "homebrew",
        param: "formula_name",
        description: "Get the latest stable version of a Homebrew formula.",
    },
    RegistryTool {
        name: "get_nextflow_pipeline",
        registry: "nextflow",
        param: "pipeline_name",
        description: "Get the latest release of a Nextflow pipeline (bare names are looked up under nf-core).",
    },
    RegistryTool {
        name: "get_nfcore_module",
        registry: "nf-core-module",
        param: "module_name",
        description: "Get the latest commit of an nf-core module.",
    },
    RegistryTool {
        name: "get_nfcore_subworkflow",
        registry: "nf-core-subworkflow",
        param: "subworkflow_name",
        description: "Get the latest commit of an nf-core subworkflow.",
    },
    RegistryTool {
        name: "get_swift_package",
        registry: "swift",
        param: "package_name",
        description: "Get the latest release of a Swift package given as 'owner/repo'.",
    },
    RegistryTool {
        name: "get_maven_artifact",
        registry: "maven",
        param: "artifact_name",
        description: "Get the latest version of a Maven artifact given as 'groupId:artifactId'.",
    },
];

pub fn find_registry_tool(name: &str) -> Option<&'static RegistryTool> {
    REGISTRY_TOOLS.iter().find(|tool| tool.name == name)
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::UnknownTool(_)
            | ToolError::MissingArgument(_)
            | ToolError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ToolError::Registry(e) => e.kind(),
        }
    }
}

/// Tool metadata as advertised by `tools/list`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

fn string_schema(params: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

type Endpoint = Arc<dyn Fn(&str) -> String + Send + Sync>;

struct State {
    config: Config,
    factory: Arc<RegistryFactory>,
}

/// The set of callable tools, backed by one registry factory
pub struct ToolSet {
    client: HttpClient,
    endpoint: Endpoint,
    state: RwLock<State>,
}

impl ToolSet {
    /// Tools querying each registry's public endpoint
    pub fn new(config: Config) -> Result<Self, RegistryError> {
        Self::with_endpoint(config, |default_url| default_url.to_string())
    }

    /// Tools whose adapters reach `endpoint(default_url)` instead of the public registries
    pub fn with_endpoint(
        config: Config,
        endpoint: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Result<Self, RegistryError> {
        let client = HttpClient::new(config.request_timeout)?;
        let endpoint: Endpoint = Arc::new(endpoint);
        let factory = build_registry_with(client.clone(), |url| endpoint(url))?;

        Ok(Self {
            client,
            endpoint,
            state: RwLock::new(State {
                config,
                factory: Arc::new(factory),
            }),
        })
    }

    pub async fn config(&self) -> Config {
        self.state.read().await.config.clone()
    }

    pub async fn factory(&self) -> Arc<RegistryFactory> {
        Arc::clone(&self.state.read().await.factory)
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        let mut tools = vec![ToolDescriptor::new(
            GET_PACKAGE_VERSION,
            "Get the latest version of a package from the specified registry. \
             package_manager accepts a canonical registry name or any of its aliases \
             (e.g. npm, node, pypi, python, crates, rust, go, maven).",
            string_schema(&[
                ("package_manager", "Registry name or alias"),
                ("package_name", "Name of the package to query"),
            ]),
        )];

        tools.extend(REGISTRY_TOOLS.iter().map(|tool| {
            ToolDescriptor::new(
                tool.name,
                tool.description,
                string_schema(&[(tool.param, "Identifier to look up in this registry")]),
            )
        }));

        tools.push(ToolDescriptor::new(
            SET_REQUEST_TIMEOUT,
            "Set the timeout, in seconds, applied to every subsequent registry request.",
            json!({
                "type": "object",
                "properties": {
                    "seconds": { "type": "integer", "minimum": 1, "description": "Timeout in seconds" }
                },
                "required": ["seconds"],
            }),
        ));
        tools.push(ToolDescriptor::new(
            HEALTH_CHECK,
            "Report that the service is up.",
            json!({ "type": "object", "properties": {} }),
        ));

        tools
    }

    /// Dispatches a tool call by name
    pub async fn call(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        match name {
            GET_PACKAGE_VERSION => {
                let manager = string_argument(arguments, "package_manager")?;
                let package = string_argument(arguments, "package_name")?;
                let record = self.get_package_version(manager, package).await?;
                Ok(to_value(&record))
            }
            SET_REQUEST_TIMEOUT => {
                let seconds = integer_argument(arguments, "seconds")?;
                self.set_request_timeout(seconds).await
            }
            HEALTH_CHECK => Ok(health_check()),
            _ => {
                let tool =
                    find_registry_tool(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
                let value = string_argument(arguments, tool.param)?;
                let record = self.get_registry_package(tool, value).await?;
                Ok(to_value(&record))
            }
        }
    }

    /// Generic lookup: resolve `manager` (name or alias) and query it
    pub async fn get_package_version(
        &self,
        manager: &str,
        package_name: &str,
    ) -> Result<PackageVersion, RegistryError> {
        self.factory()
            .await
            .get_latest_version(manager, package_name)
            .await
    }

    /// Lookup through one registry-specific tool
    pub async fn get_registry_package(
        &self,
        tool: &RegistryTool,
        value: &str,
    ) -> Result<PackageVersion, RegistryError> {
        self.factory()
            .await
            .get_latest_version(tool.registry, value)
            .await
    }

    /// Replaces the request timeout and rebuilds every adapter with it
    pub async fn set_request_timeout(&self, seconds: u64) -> Result<Value, ToolError> {
        let config = self
            .config()
            .await
            .with_timeout_secs(seconds)
            .map_err(|e| ToolError::InvalidArgument(e.to_string()))?;

        let client = self.client.with_timeout(config.request_timeout);
        let endpoint = Arc::clone(&self.endpoint);
        let factory = build_registry_with(client, |url| endpoint(url))?;

        let mut state = self.state.write().await;
        state.config = config;
        state.factory = Arc::new(factory);
        info!("Request timeout set to {}s", seconds);

        Ok(json!({ "request_timeout": seconds }))
    }

    pub async fn request_timeout(&self) -> Duration {
        self.state.read().await.config.request_timeout
    }
}

pub fn health_check() -> Value {
    json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

fn to_value(record: &PackageVersion) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

fn string_argument<'a>(arguments: &'a Map<String, Value>, name: &str) -> Result<&'a str, ToolError> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(name.to_string())),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ToolError::InvalidArgument(format!(
            "Argument '{}' must be a string",
            name
        ))),
    }
}

fn integer_argument(arguments: &Map<String, Value>, name: &str) -> Result<u64, ToolError> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(name.to_string())),
        Some(value) => value.as_u64().ok_or_else(|| {
            ToolError::InvalidArgument(format!("Argument '{}' must be a positive integer", name))
        }),
    }
}
