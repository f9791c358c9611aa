/// MCP Tool handlers for uisap-nav.
///
/// 1. goto_definition  – resolve an injected model or route handler at a position
/// 2. framework_status – report whether a workspace depends on uisap/core
use crate::document::{Position, SourceDocument};
use crate::mcp::server::McpContext;
use crate::resolve::paths::to_slash;
use crate::workspace;
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::service::RequestContext;
use rmcp::{
    ErrorData as McpError, RoleServer, handler::server::tool::ToolRouter, model::*, tool,
    tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::Path;

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct GotoDefinitionParams {
    /// Path of the file the request originates from
    file: String,
    /// Zero-based line of the cursor
    line: u32,
    /// Zero-based column of the cursor, in UTF-16 code units
    character: u32,
}

#[derive(Deserialize, JsonSchema)]
struct FrameworkStatusParams {
    /// Workspace root containing package.json
    root: String,
}

// ── Response helpers ─────────────────────────────────────────────────

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&value).unwrap_or_default(),
    )]))
}

fn error_result(msg: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.to_string())]))
}

// ── Tool implementations ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AppTools {
    pub ctx: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl ServerHandler for AppTools {}

#[tool_router]
impl AppTools {
    pub fn new(ctx: McpContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: goto_definition ─────────────────────────────────────

    #[tool(
        description = "Go to the definition of an injected model (this.<name>Model in a controller) or of a route handler ([Controller, \"method\"] in routes/api.js). Returns found=false when the position names neither."
    )]
    async fn goto_definition(
        &self,
        params: Parameters<GotoDefinitionParams>,
        request: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.file.is_empty() {
            return error_result("file is required");
        }

        let document = match SourceDocument::read(Path::new(&p.file)) {
            Ok(d) => d,
            Err(e) => return error_result(&format!("cannot read {}: {e}", p.file)),
        };

        let position = Position::new(p.line, p.character);
        let result = self
            .ctx
            .navigator
            .provide_definition(&document, position, &request.ct)
            .await;

        match result {
            Some(r) => json_result(serde_json::json!({
                "found": true,
                "origin": r.origin,
                "target_file": to_slash(&r.target_file),
                "target": r.target,
                "specificity": r.specificity,
                "priority": r.priority(),
            })),
            None => json_result(serde_json::json!({ "found": false })),
        }
    }

    // ── Tool 2: framework_status ────────────────────────────────────

    #[tool(description = "Report whether the workspace at root declares the uisap/core package as a dependency")]
    async fn framework_status(
        &self,
        params: Parameters<FrameworkStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let root = &params.0.root;
        if root.is_empty() {
            return error_result("root is required");
        }

        let package = &self.ctx.navigator.config().framework_package;
        let status = workspace::detect_framework(Path::new(root), package);
        let mut value = serde_json::to_value(&status)
            .map_err(|e| McpError::internal_error(format!("serialize failed: {e}"), None))?;
        value["package"] = serde_json::json!(package);
        json_result(value)
    }
}
