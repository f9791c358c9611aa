//! # uisap-nav — Go-to-definition for uisap/core projects
//!
//! Resolves "go to definition" requests that plain JavaScript tooling cannot
//! answer because they depend on framework conventions: models obtained by
//! name injection (`this.resolve("User")` → `this.userModel`) and route
//! handlers registered as `[Controller, "method"]` arrays.
//!
//! ## Architecture
//!
//! - **[`config`]** — Framework conventions, loaded from JSON with defaults
//! - **[`document`]** — Source snapshots, positions, word extraction
//! - **[`syntax`]** — Tree-sitter parsing and AST pattern matchers
//! - **[`resolve`]** — Request classification, model and route resolvers
//! - **[`navigator`]** — The single `provide_definition` entry point
//! - **[`workspace`]** — uisap/core detection from `package.json`
//! - **[`mcp`]** — MCP host adapter (stdio transport via rmcp)

pub mod config;
pub mod document;
pub mod mcp;
pub mod navigator;
pub mod resolve;
pub mod syntax;
pub mod workspace;
