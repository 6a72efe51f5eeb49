//! MCP server for the portfolio matcher
//!
//! Exposes skill queries and index status to MCP clients over stdio.

mod server;

pub use server::run_mcp_server;
