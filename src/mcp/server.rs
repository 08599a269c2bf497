//! MCP server implementation using rmcp over stdio transport.
//!
//! Provides 3 MergeLens tools that Claude (or any MCP client) can invoke to
//! review what a merge would bring in before running it.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::schema::MergeLensConfig;
use crate::error::{MergeLensError, Result};

use super::registry::{self, QUICK_MERGE_SUMMARY, SHOW_FILE_DIFF, SHOW_MERGE_DIFF};
use super::tools_git;

// ---------------------------------------------------------------------------
// Server struct
// ---------------------------------------------------------------------------

/// MergeLens MCP server.
///
/// Holds no per-session state: every call names its repository and
/// recomputes from git.
#[derive(Debug, Clone, Default)]
pub struct MergeLensServer {
    config: MergeLensConfig,
}

impl MergeLensServer {
    /// Create a server with default limits and git settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a server with an explicit config.
    pub fn with_config(config: MergeLensConfig) -> Self {
        Self { config }
    }
}

// ---------------------------------------------------------------------------
// Helper: serialize to JSON text
// ---------------------------------------------------------------------------

pub(crate) fn json_text<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

/// Wrap handler output in a single text content item, or convert the error
/// into its protocol form.
fn into_tool_result(
    tool: &str,
    result: Result<String>,
) -> std::result::Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => {
            tracing::warn!(tool, error = %e, "tool call failed");
            Err(e.into_mcp_error())
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<JsonObject>,
) -> std::result::Result<Parameters<T>, McpError> {
    let value = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value).map(Parameters).map_err(|e| {
        MergeLensError::InvalidInput {
            field: "arguments".to_string(),
            reason: format!("{tool}: {e}"),
        }
        .into_mcp_error()
    })
}

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeDiffParams {
    #[schemars(description = "Path to the git repository")]
    pub repo_path: String,
    #[schemars(
        description = "Branch to merge into (default: 'main' if it exists, otherwise 'master')"
    )]
    pub from_branch: Option<String>,
    #[schemars(description = "Branch holding the changes to review (default: current branch)")]
    pub to_branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummaryParams {
    #[schemars(description = "Path to the git repository")]
    pub repo_path: String,
    #[schemars(
        description = "Branch to compare against the default branch (default: current branch)"
    )]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffParams {
    #[schemars(description = "Path to the git repository")]
    pub repo_path: String,
    #[schemars(description = "File path relative to the repository root")]
    pub filename: String,
    #[schemars(
        description = "Branch to merge into (default: 'main' if it exists, otherwise 'master')"
    )]
    pub from_branch: Option<String>,
    #[schemars(description = "Branch holding the changes to review (default: current branch)")]
    pub to_branch: Option<String>,
    #[schemars(
        description = "Include the first 100 lines of the raw diff (default true). Without it, up to 20 added/removed lines are listed instead of 50."
    )]
    pub include_raw_diff: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tool implementations
// ---------------------------------------------------------------------------

#[tool_router]
impl MergeLensServer {
    // 1. show_merge_diff
    #[tool(
        name = "show_merge_diff",
        description = "Preview a merge: changed files, inserted/deleted line counts and commit count for the range fromBranch..toBranch. fromBranch defaults to the default branch (main, else master); toBranch defaults to the current branch."
    )]
    pub async fn show_merge_diff(
        &self,
        Parameters(p): Parameters<MergeDiffParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        into_tool_result(
            SHOW_MERGE_DIFF,
            tools_git::handle_show_merge_diff(
                &self.config,
                &p.repo_path,
                p.from_branch.as_deref(),
                p.to_branch.as_deref(),
            )
            .await,
        )
    }

    // 2. quick_merge_summary
    #[tool(
        name = "quick_merge_summary",
        description = "Quick status of a branch against the default branch: commits ahead/behind and whether a merge is needed. branch defaults to the current branch."
    )]
    pub async fn quick_merge_summary(
        &self,
        Parameters(p): Parameters<MergeSummaryParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        into_tool_result(
            QUICK_MERGE_SUMMARY,
            tools_git::handle_quick_merge_summary(
                &self.config,
                &p.repo_path,
                p.branch.as_deref(),
            )
            .await,
        )
    }

    // 3. show_file_diff
    #[tool(
        name = "show_file_diff",
        description = "Show added and removed lines for one file between fromBranch and toBranch, with a short summary and the start of the raw diff."
    )]
    pub async fn show_file_diff(
        &self,
        Parameters(p): Parameters<FileDiffParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        into_tool_result(
            SHOW_FILE_DIFF,
            tools_git::handle_show_file_diff(
                &self.config,
                &p.repo_path,
                &p.filename,
                p.from_branch.as_deref(),
                p.to_branch.as_deref(),
                p.include_raw_diff,
            )
            .await,
        )
    }
}

impl MergeLensServer {
    /// Tool descriptors in catalog order.
    pub fn tool_catalog() -> Vec<Tool> {
        let mut tools = Self::tool_router().list_all();
        tools.sort_by_key(|t| registry::tool_position(t.name.as_ref()));
        tools
    }

    /// Catalog as pretty JSON (name, description, inputSchema per tool).
    pub fn json_catalog() -> String {
        json_text(&Self::tool_catalog())
    }

    /// Route a tool call by exact name. Unknown names fail with
    /// `MethodNotFound`; every other failure surfaces as `InternalError`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        tracing::info!(tool = name, "tool call");
        match name {
            SHOW_MERGE_DIFF => self.show_merge_diff(parse_arguments(name, arguments)?).await,
            QUICK_MERGE_SUMMARY => {
                self.quick_merge_summary(parse_arguments(name, arguments)?)
                    .await
            }
            SHOW_FILE_DIFF => self.show_file_diff(parse_arguments(name, arguments)?).await,
            other => {
                tracing::warn!(tool = other, "unknown tool");
                Err(MergeLensError::UnknownTool(other.to_string()).into_mcp_error())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ServerHandler impl — ordered list_tools, manual call_tool dispatch
// ---------------------------------------------------------------------------

impl ServerHandler for MergeLensServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "MergeLens — pre-merge review tools. Use quick_merge_summary to see whether a \
                 branch is ahead of or behind the default branch, show_merge_diff for the files, \
                 line counts and commits a merge would bring in, and show_file_diff to inspect \
                 the changes to a single file. All tools are read-only."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "mergelens".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        std::future::ready(Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: Self::tool_catalog(),
        }))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(request.name.as_ref(), request.arguments).await
    }
}

// ---------------------------------------------------------------------------
// Public entry point: run the MCP server over stdio
// ---------------------------------------------------------------------------

/// Start the MCP server on stdin/stdout.
///
/// This blocks until the client disconnects or a shutdown signal is received.
pub async fn run_server(
    config: MergeLensConfig,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let server = MergeLensServer::with_config(config);
    let transport = rmcp::transport::io::stdio();
    let running = server.serve(transport).await.inspect_err(|e| {
        tracing::error!("MCP server error: {}", e);
    })?;
    let _ = running.waiting().await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::create_merge_repo;
    use rmcp::model::ErrorCode;

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn text_of(result: &CallToolResult) -> String {
        assert_eq!(result.content.len(), 1);
        result.content[0]
            .as_text()
            .expect("text content")
            .text
            .clone()
    }

    // -- catalog ---------------------------------------------------------------

    #[test]
    fn catalog_lists_three_tools_in_order() {
        let names: Vec<String> = MergeLensServer::tool_catalog()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["show_merge_diff", "quick_merge_summary", "show_file_diff"]);
    }

    #[test]
    fn catalog_schemas_mark_required_params() {
        for tool in MergeLensServer::tool_catalog() {
            let schema = serde_json::Value::Object((*tool.input_schema).clone());
            let required: Vec<&str> = schema["required"]
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();
            assert!(required.contains(&"repoPath"), "{} must require repoPath", tool.name);
            if tool.name == SHOW_FILE_DIFF {
                assert!(required.contains(&"filename"));
            }
            assert!(!required.contains(&"fromBranch"));
        }
    }

    #[test]
    fn catalog_tools_have_descriptions() {
        for tool in MergeLensServer::tool_catalog() {
            assert!(tool.description.as_deref().is_some_and(|d| !d.is_empty()));
        }
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = MergeLensServer::new().get_info();
        assert_eq!(info.server_info.name, "mergelens");
        assert!(info.capabilities.tools.is_some());
    }

    // -- dispatch --------------------------------------------------------------

    #[tokio::test]
    async fn dispatch_unknown_tool_is_method_not_found() {
        let err = MergeLensServer::new()
            .dispatch("does_not_exist", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("does_not_exist"));
    }

    #[tokio::test]
    async fn dispatch_missing_repo_is_internal_error() {
        let err = MergeLensServer::new()
            .dispatch(
                SHOW_MERGE_DIFF,
                args(serde_json::json!({ "repoPath": "/no/such/repo/xyz" })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("/no/such/repo/xyz"));
    }

    #[tokio::test]
    async fn dispatch_missing_required_argument() {
        let err = MergeLensServer::new()
            .dispatch(SHOW_FILE_DIFF, args(serde_json::json!({ "repoPath": "." })))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("filename"));
    }

    #[tokio::test]
    async fn dispatch_git_failure_is_internal_error() {
        let (_dir, path) = create_merge_repo();
        let err = MergeLensServer::new()
            .dispatch(
                SHOW_MERGE_DIFF,
                args(serde_json::json!({
                    "repoPath": path.to_str().unwrap(),
                    "fromBranch": "no-such-branch",
                })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn dispatch_show_merge_diff_returns_pretty_json() {
        let (_dir, path) = create_merge_repo();
        let result = MergeLensServer::new()
            .dispatch(
                SHOW_MERGE_DIFF,
                args(serde_json::json!({
                    "repoPath": path.to_str().unwrap(),
                    "fromBranch": "main",
                })),
            )
            .await
            .unwrap();
        let text = text_of(&result);
        assert!(text.contains("\n  \"sourceBranch\": \"main\""));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["summary"], "1 commits, 1 files, +2/-1 lines");
    }

    #[tokio::test]
    async fn dispatch_quick_merge_summary() {
        let (_dir, path) = create_merge_repo();
        let result = MergeLensServer::new()
            .dispatch(
                QUICK_MERGE_SUMMARY,
                args(serde_json::json!({ "repoPath": path.to_str().unwrap() })),
            )
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(json["needsMerge"], true);
        assert_eq!(json["aheadBy"], 1);
    }

    #[tokio::test]
    async fn dispatch_show_file_diff() {
        let (_dir, path) = create_merge_repo();
        let result = MergeLensServer::new()
            .dispatch(
                SHOW_FILE_DIFF,
                args(serde_json::json!({
                    "repoPath": path.to_str().unwrap(),
                    "filename": "a.txt",
                })),
            )
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(json["fromBranch"], "main");
        assert_eq!(json["toBranch"], "feature");
        assert_eq!(json["hasChanges"], true);
    }

    #[tokio::test]
    async fn tool_methods_can_be_called_directly() {
        let (_dir, path) = create_merge_repo();
        let result = MergeLensServer::new()
            .show_merge_diff(Parameters(MergeDiffParams {
                repo_path: path.to_str().unwrap().to_string(),
                from_branch: Some("feature".into()),
                to_branch: Some("feature".into()),
            }))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(json["commits"], 0);
        assert_eq!(json["summary"], crate::git::merge::NOTHING_TO_MERGE);
    }
}
