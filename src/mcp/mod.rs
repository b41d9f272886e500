//! MCP surface: the tool catalogue and a stdio JSON-RPC server exposing it

pub mod server;
pub mod tools;

pub use server::{run_server, serve};
pub use tools::{ToolError, ToolSet};
