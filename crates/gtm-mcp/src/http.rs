//! Hosted HTTP transport
//!
//! `POST /mcp` carries one JSON-RPC message per request. A bearer token in
//! `Authorization` becomes the call's [`Credentials::AccessToken`]; requests
//! without one run on the server's configured credentials. `GET /health`
//! answers with a static status document.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use gtm_api::Credentials;
use serde_json::json;

use crate::protocol::{INTERNAL_ERROR, JsonRpcResponse, PARSE_ERROR};
use crate::server::{GtmMcpServer, SERVER_NAME};
use crate::{Error, Result};

struct HttpState {
    server: GtmMcpServer,
}

/// Build the router; split out so it can be served on any listener.
pub fn router(server: GtmMcpServer, max_body_bytes: usize) -> Router {
    let state = Arc::new(HttpState { server });
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(server: GtmMcpServer, addr: SocketAddr, max_body_bytes: usize) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "MCP server ready, listening on http");
    axum::serve(listener, router(server, max_body_bytes))
        .await
        .map_err(Error::Io)
}

/// Token from `Authorization: Bearer <token>`, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn handle_mcp(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let credentials = match bearer_token(&headers) {
        Some(token) => Credentials::AccessToken(token),
        None => state.server.default_credentials().clone(),
    };

    let Ok(message) = std::str::from_utf8(&bytes) else {
        let response = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error: body is not UTF-8".into());
        return (StatusCode::BAD_REQUEST, axum::Json(response)).into_response();
    };

    match state.server.handle_message_with(message, credentials).await {
        Ok(body) if body.is_empty() => StatusCode::ACCEPTED.into_response(),
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to handle http message");
            let response = JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {e}"));
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(response)).into_response()
        }
    }
}

async fn handle_health() -> impl IntoResponse {
    axum::Json(json!({
        "status": "ok",
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;
    use axum::http::HeaderValue;
    use gtm_test_utils::StubUpstream;
    use serde_json::Value;

    fn state() -> (Arc<HttpState>, StubUpstream) {
        let upstream = StubUpstream::new();
        let server = GtmMcpServer::new(
            ToolRegistry::with_all_tools().unwrap(),
            upstream.provider(),
            Credentials::ApplicationDefault,
        );
        (Arc::new(HttpState { server }), upstream)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers), Some("xyz".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_bearer_token_becomes_credentials() {
        let (state, upstream) = state();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer user-token"));
        let body = Bytes::from_static(
            br#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"tag_manager_list_accounts","arguments":{}}}"#,
        );

        let response = handle_mcp(State(state), headers, body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["id"], 1);

        let requests = upstream.client_requests();
        assert_eq!(requests[0].0, Credentials::AccessToken("user-token".into()));
    }

    #[tokio::test]
    async fn test_missing_token_falls_back_to_server_credentials() {
        let (state, upstream) = state();
        let body = Bytes::from_static(
            br#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"tag_manager_list_accounts","arguments":{}}}"#,
        );
        handle_mcp(State(state), HeaderMap::new(), body).await;
        assert_eq!(upstream.client_requests()[0].0, Credentials::ApplicationDefault);
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let (state, _) = state();
        let body = Bytes::from_static(br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        let response = handle_mcp(State(state), HeaderMap::new(), body).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_health() {
        let response = handle_health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], "ok");
        assert_eq!(value["name"], SERVER_NAME);
    }
}
