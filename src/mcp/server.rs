//! Newline-delimited JSON-RPC 2.0 server speaking the MCP tool methods

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::mcp::tools::{SERVICE_NAME, ToolSet};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

const INSTRUCTIONS: &str = "Use these tools to look up the latest published version of a package.\n\
1) get_package_version(package_manager, package_name) works for every registry; \
package_manager accepts canonical names (npm, rubygems, pypi, hex, crates, bioconda, cran, \
terraform, dockerhub, cpan, go, composer, nuget, homebrew, nextflow, nf-core-module, \
nf-core-subworkflow, swift, maven) and their aliases.\n\
2) The get_<registry> tools query one registry directly.\n\
3) Pass the exact package identifier: 'owner/name' for Terraform and Swift, \
'groupId:artifactId' for Maven, the full module path for Go.\n\
4) Report the package name, version and registry from the result.";

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Handles one incoming line; notifications produce no response
pub async fn handle_message(line: &str, tools: &ToolSet) -> Option<Response> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse message: {}", e);
            return Some(Response::error(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };

    let request: Request = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            return Some(Response::error(
                Value::Null,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            ));
        }
    };

    let Some(id) = request.id else {
        debug!("Notification: {}", request.method);
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => Response::result(id, initialize_result()),
        "ping" => Response::result(id, json!({})),
        "tools/list" => Response::result(id, json!({ "tools": tools.list_tools() })),
        "tools/call" => match serde_json::from_value::<CallParams>(request.params) {
            Ok(params) => Response::result(id, call_tool(tools, params).await),
            Err(e) => Response::error(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
        },
        method => Response::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method)),
    };

    Some(response)
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "instructions": INSTRUCTIONS,
    })
}

async fn call_tool(tools: &ToolSet, params: CallParams) -> Value {
    debug!("Calling tool {}", params.name);

    match tools.call(&params.name, &params.arguments).await {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            json!({
                "content": [{ "type": "text", "text": text }],
                "structuredContent": value,
                "isError": false,
            })
        }
        Err(e) => {
            warn!("Tool {} failed: {}", params.name, e);
            json!({
                "content": [{ "type": "text", "text": e.to_string() }],
                "isError": true,
            })
        }
    }
}

/// Serves requests from `reader` until EOF, writing one response line per request
pub async fn serve<R, W>(reader: R, mut writer: W, tools: &ToolSet) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = handle_message(line, tools).await {
            let mut bytes = serde_json::to_vec(&response)?;
            bytes.push(b'\n');
            writer.write_all(&bytes).await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

/// Runs the server over stdin/stdout
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let tools = ToolSet::new(config)?;
    info!(
        "versionator starting (request timeout {}s, {} registries)",
        tools.request_timeout().await.as_secs(),
        tools.factory().await.registry_names().len()
    );

    serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), &tools).await?;

    info!("versionator shutdown complete");
    Ok(())
}
