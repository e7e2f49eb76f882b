//! Noctisium MCP Server implementation
//!
//! Each tool forwards to the HTTP API and hands back the rendered text.
//! API failures come back as tool errors carrying the API message.

use crate::client::NoctisiumClient;
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Noctisium MCP Server
///
/// Exposes the weekly KPI ranking to agents.
#[derive(Clone)]
pub struct NoctisiumServer {
    client: NoctisiumClient,
    tool_router: ToolRouter<Self>,
}

impl NoctisiumServer {
    pub fn from_env() -> Result<Self> {
        let client = NoctisiumClient::from_env()?;
        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }
}

fn to_tool_result(result: Result<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(content) => Ok(CallToolResult::success(vec![Content::text(content)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AssessWeekParams {
    /// ISO week to assess, e.g. "2025-W07". Defaults to the last completed week.
    #[serde(default)]
    pub week_key: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeekParams {
    /// ISO week, e.g. "2025-W07"
    pub week_key: String,
}

#[tool_router]
impl NoctisiumServer {
    // === Rank ===

    #[tool(
        description = "Get the current rank, RR points, weeks completed and how much RR is needed for the next tier. Call this first."
    )]
    async fn rank_status(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.rank_status().await)
    }

    #[tool(description = "Show the rank tiers and the RR threshold of each.")]
    async fn rank_tiers(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.rank_tiers().await)
    }

    // === Assessment ===

    #[tool(
        description = "Assess a week's KPI completion and apply the RR change. Re-assessing a week replaces its earlier result."
    )]
    async fn assess_week(
        &self,
        params: Parameters<AssessWeekParams>,
    ) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.assess_week(params.0.week_key.as_deref()).await)
    }

    #[tool(description = "Check whether the last completed week still needs to be assessed.")]
    async fn needs_assessment(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.needs_assessment().await)
    }

    #[tool(
        description = "Preview a week's KPI completion and per-KPI progress without assessing it."
    )]
    async fn week_progress(
        &self,
        params: Parameters<WeekParams>,
    ) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.week_progress(&params.0.week_key).await)
    }

    // === History ===

    #[tool(description = "List every assessed week with its RR change, newest first.")]
    async fn rank_history(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.rank_history().await)
    }

    #[tool(
        description = "Rebuild the whole rank history from the weekly KPI records. Use after editing past weeks."
    )]
    async fn regenerate_history(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(self.client.regenerate_history().await)
    }
}

#[tool_handler]
impl ServerHandler for NoctisiumServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "noctisium".into(),
                title: Some("Noctisium MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Noctisium - Weekly KPI Ranking

WORKFLOW:
1. 'rank_status' - See your rank and RR
2. 'week_progress' - Check how the current week is going
3. 'needs_assessment' - See if last week is still unscored
4. 'assess_week' - Score a week and apply the RR change
5. 'rank_history' - Review past weeks
6. 'regenerate_history' - Rebuild history after correcting old weeks

HOW RR WORKS:
- Each week is scored by weighted KPI completion (capped at 100%)
- 50% completion is break-even
- Above it you gain RR, below it you lose RR
- Higher tiers gain less and lose more
- RR never drops below 0"#
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_week_params_with_week() {
        let json = r#"{"week_key": "2025-W07"}"#;
        let params: AssessWeekParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.week_key.as_deref(), Some("2025-W07"));
    }

    #[test]
    fn test_assess_week_params_without_week() {
        let params: AssessWeekParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.week_key, None);
    }

    #[test]
    fn test_week_params_requires_week_key() {
        let json = r#"{"week_key": "2025-W18"}"#;
        let params: WeekParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.week_key, "2025-W18");
        assert!(serde_json::from_str::<WeekParams>("{}").is_err());
    }

    #[test]
    fn test_error_becomes_tool_error() {
        let result = to_tool_result(Err(anyhow::anyhow!("API error (400): bad week"))).unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_success_becomes_text_content() {
        let result = to_tool_result(Ok("# Rank".to_string())).unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
