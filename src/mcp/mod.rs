/// MCP host adapter: exposes the navigator to editors and agents over stdio.
pub mod server;
pub mod tools;
