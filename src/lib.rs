pub mod config;
pub mod log;
pub mod mcp;
pub mod version;
