//! MCP Server implementation
//!
//! [`GtmMcpServer`] owns the tool registry and the client provider and turns
//! one JSON-RPC message into at most one response. Transports (stdio here,
//! HTTP in [`crate::http`]) only move bytes around it.

use std::sync::Arc;

use gtm_api::{ClientProvider, Credentials};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::handlers::{CallContext, handle_tool_call};
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolsCapability,
};
use crate::registry::ToolRegistry;
use crate::tools::ToolDefinition;
use crate::{Error, Result};

/// Name reported in `initialize`
pub const SERVER_NAME: &str = "google-tag-manager";

/// MCP server for the Google Tag Manager API
///
/// Cheap to clone; every clone shares the same registry and provider.
///
/// # Example
///
/// ```ignore
/// use gtm_api::{Credentials, GoogleClientProvider};
/// use gtm_mcp::{GtmMcpServer, ToolRegistry};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = ToolRegistry::with_all_tools()?;
///     let provider = Arc::new(GoogleClientProvider::production()?);
///     let server = GtmMcpServer::new(registry, provider, Credentials::ApplicationDefault);
///     server.run_stdio().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GtmMcpServer {
    registry: Arc<ToolRegistry>,
    provider: Arc<dyn ClientProvider>,
    /// Used when a message arrives without credentials of its own
    credentials: Credentials,
}

impl GtmMcpServer {
    pub fn new(
        registry: ToolRegistry,
        provider: Arc<dyn ClientProvider>,
        credentials: Credentials,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            provider,
            credentials,
        }
    }

    /// Registered tool definitions
    pub fn tools(&self) -> &[ToolDefinition] {
        self.registry.definitions()
    }

    pub fn default_credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        tracing::info!(tools = self.registry.len(), "MCP server ready, listening on stdio");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        tracing::info!("stdin closed, pending responses drained");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
    ///
    /// Each message is handled on its own task; responses go through a
    /// single writer so lines never interleave. A line that is not UTF-8
    /// gets a parse error instead of ending the session.
    pub async fn serve_lines<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim().to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "Message is not valid UTF-8");
                    let response =
                        JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                    send_line(&tx, serde_json::to_string(&response)?);
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            tracing::debug!(request = %line, "Received message");

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = match server.handle_message(&line).await {
                    Ok(response) => response,
                    Err(e) => internal_error(&e),
                };
                if !response.is_empty() {
                    send_line(&tx, response);
                }
            });
        }

        drop(tx);
        writer_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        Ok(())
    }

    /// Handle a single MCP message with the server's own credentials.
    ///
    /// Returns the serialized response, or an empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        self.handle_message_with(message, self.credentials.clone())
            .await
    }

    /// Handle a single MCP message on behalf of `credentials`.
    pub async fn handle_message_with(
        &self,
        message: &str,
        credentials: Credentials,
    ) -> Result<String> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => {
                let ctx = CallContext::new(self.provider.clone(), credentials);
                self.handle_tools_call(request.id, request.params, &ctx)
                    .await?
            }
            _ if request.is_notification() => return Ok(String::new()),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.registry.definitions() }))
    }

    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Value,
        ctx: &CallContext,
    ) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        let result = handle_tool_call(&self.registry, ctx, &params.name, params.arguments).await;
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }
}

fn send_line(tx: &mpsc::UnboundedSender<String>, line: String) {
    if tx.send(line).is_err() {
        tracing::warn!("Output writer closed; dropping response");
    }
}

fn internal_error(error: &Error) -> String {
    let response = JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {error}"));
    serde_json::to_string(&response).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtm_test_utils::StubUpstream;

    fn server() -> (GtmMcpServer, StubUpstream) {
        let upstream = StubUpstream::new();
        let server = GtmMcpServer::new(
            ToolRegistry::with_all_tools().unwrap(),
            upstream.provider(),
            Credentials::ApplicationDefault,
        );
        (server, upstream)
    }

    #[test]
    fn server_exposes_registered_tools() {
        let (server, _) = server();
        assert!(server.tools().iter().any(|t| t.name == "gtm_tag"));
        assert_eq!(server.default_credentials(), &Credentials::ApplicationDefault);
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let (server, _) = server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["result"]["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(value["result"]["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let (server, _) = server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn tool_call_uses_supplied_credentials() {
        let (server, upstream) = server();
        upstream.respond_json(json!({"account": []}));
        let message = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"tag_manager_list_accounts","arguments":{}}}"#;
        server
            .handle_message_with(message, Credentials::AccessToken("tok".into()))
            .await
            .unwrap();

        let requests = upstream.client_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, Credentials::AccessToken("tok".into()));
    }

    #[tokio::test]
    async fn invalid_utf8_line_gets_parse_error_and_session_continues() {
        let (server, _) = server();
        let input: &[u8] = b"\xff\xfe not utf8\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";
        let (out, mut out_reader) = tokio::io::duplex(64 * 1024);

        server.serve_lines(BufReader::new(input), out).await.unwrap();

        let mut output = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut out_reader, &mut output)
            .await
            .unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert!(
            responses
                .iter()
                .any(|r| r["error"]["code"] == PARSE_ERROR && r["id"].is_null())
        );
        assert!(
            responses
                .iter()
                .any(|r| r["id"] == 7 && r["result"] == json!({}))
        );
    }
}
