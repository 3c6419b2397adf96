use rmcp::{
    handler::server::router::tool::ToolRouter as RmcpToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tubescript_core::{LookupOrchestrator, LookupResult};

pub(crate) const TOOL_NAME: &str = "get_youtube_video_transcript";
pub(crate) const URL_REQUIRED: &str = "Error: URL parameter is required";

#[derive(Debug, Deserialize, JsonSchema, Default)]
pub(crate) struct TranscriptArgs {
    /// The URL of the YouTube video to retrieve the transcript/subtitles for. (e.g. https://www.youtube.com/watch?v=dQw4w9WgXcQ)
    ///
    /// Decoded loosely so a wrongly-typed value still gets a tool result.
    #[schemars(required, with = "String")]
    pub(crate) url: Option<serde_json::Value>,
}

/// What the handler does with the raw `url` argument.
#[derive(Debug, PartialEq)]
enum UrlArg {
    Missing,
    Url(String),
    WrongType(&'static str),
}

fn classify_url(v: Option<serde_json::Value>) -> UrlArg {
    use serde_json::Value;
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => UrlArg::Missing,
        Some(Value::String(s)) if s.is_empty() => UrlArg::Missing,
        Some(Value::String(s)) => UrlArg::Url(s),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => UrlArg::Missing,
        Some(Value::Array(a)) if a.is_empty() => UrlArg::Missing,
        Some(Value::Object(o)) if o.is_empty() => UrlArg::Missing,
        Some(Value::Bool(true)) => UrlArg::WrongType("boolean"),
        Some(Value::Number(_)) => UrlArg::WrongType("number"),
        Some(Value::Array(_)) => UrlArg::WrongType("array"),
        Some(Value::Object(_)) => UrlArg::WrongType("object"),
    }
}

fn pretty_result(result: &LookupResult) -> CallToolResult {
    match result.to_pretty_json() {
        Ok(body) => text_result(body),
        Err(e) => {
            tracing::error!(tool = TOOL_NAME, error = %e, "failed to serialize result");
            text_result(format!("Error: {e}"))
        }
    }
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

#[derive(Clone)]
pub(crate) struct TubescriptMcp {
    tool_router: RmcpToolRouter<Self>,
    lookup: Arc<LookupOrchestrator>,
}

#[tool_router]
impl TubescriptMcp {
    pub(crate) fn new(lookup: LookupOrchestrator) -> Self {
        Self {
            tool_router: Self::tool_router(),
            lookup: Arc::new(lookup),
        }
    }

    #[tool(
        description = "Retrieve the transcript or video details for a given YouTube video. The 'start' time in the transcript is formatted as MM:SS or HH:MM:SS."
    )]
    async fn get_youtube_video_transcript(
        &self,
        params: Parameters<TranscriptArgs>,
    ) -> Result<CallToolResult, McpError> {
        // Not Parameters<Option<_>>: the advertised schema must mark `url` required.
        let url = match classify_url(params.0.url) {
            UrlArg::Missing => return Ok(text_result(URL_REQUIRED)),
            UrlArg::WrongType(kind) => {
                tracing::warn!(tool = TOOL_NAME, kind, "url argument is not a string");
                let result = LookupResult::error(format!(
                    "Failed to process request: expected string url, got {kind}"
                ));
                return Ok(pretty_result(&result));
            }
            UrlArg::Url(url) => url,
        };

        let t0 = std::time::Instant::now();
        tracing::info!(tool = TOOL_NAME, "executing tool");
        let result = self.lookup.lookup(&url).await;
        tracing::info!(
            tool = TOOL_NAME,
            ok = !result.is_error(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "tool finished"
        );

        // Lookup failures are ordinary results; only serialization can fail here.
        Ok(pretty_result(&result))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for TubescriptMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "YouTube transcript lookup. Returns the transcript (start formatted as MM:SS or HH:MM:SS), or video details when no transcript is available. Output is pretty-printed JSON."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub(crate) async fn serve_stdio(lookup: LookupOrchestrator) -> Result<(), McpError> {
    let svc = TubescriptMcp::new(lookup);
    let running = svc
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    // Keep the stdio server alive until the client closes.
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}
