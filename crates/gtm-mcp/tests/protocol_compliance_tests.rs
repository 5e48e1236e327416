//! MCP Protocol Compliance Integration Tests
//!
//! Tests that the server implements JSON-RPC 2.0 and the MCP tool methods:
//! ID preservation, error codes, tool listing, and tool results that carry
//! failures as `isError` instead of protocol errors.

use gtm_api::Credentials;
use gtm_mcp::{GtmMcpServer, ToolRegistry};
use gtm_test_utils::StubUpstream;
use serde_json::{Value, json};

fn setup_server() -> (GtmMcpServer, StubUpstream) {
    let upstream = StubUpstream::new();
    let server = GtmMcpServer::new(
        ToolRegistry::with_all_tools().unwrap(),
        upstream.provider(),
        Credentials::ApplicationDefault,
    );
    (server, upstream)
}

async fn send(server: &GtmMcpServer, message: &str) -> Value {
    serde_json::from_str(&server.handle_message(message).await.unwrap()).unwrap()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[tokio::test]
async fn test_numeric_id_preserved_in_response() {
    let (server, _) = setup_server();

    let response = send(&server, r#"{"jsonrpc":"2.0","id":42,"method":"initialize","params":{}}"#).await;

    assert_eq!(response["id"], 42, "Numeric ID must be echoed back exactly");
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_string_id_preserved_in_response() {
    let (server, _) = setup_server();

    let response = send(
        &server,
        r#"{"jsonrpc":"2.0","id":"req-abc-123","method":"ping"}"#,
    )
    .await;

    assert_eq!(response["id"], "req-abc-123");
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_id_preserved_in_error_response() {
    let (server, _) = setup_server();

    let response = send(
        &server,
        r#"{"jsonrpc":"2.0","id":"err-test","method":"nonexistent/method","params":{}}"#,
    )
    .await;

    assert_eq!(response["id"], "err-test");
    assert!(response.get("error").is_some(), "Should be an error response");
}

// ==========================================================================
// Error Code Correctness
// ==========================================================================

#[tokio::test]
async fn test_method_not_found_returns_32601() {
    let (server, _) = setup_server();

    let response = send(&server, r#"{"jsonrpc":"2.0","id":1,"method":"completely/unknown"}"#).await;

    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_unparseable_message_returns_32700() {
    let (server, _) = setup_server();

    let response = send(&server, "{not json").await;

    assert_eq!(response["error"]["code"], -32700);
    assert_eq!(response["id"], Value::Null);
}

#[tokio::test]
async fn test_tools_call_without_name_returns_32602() {
    let (server, upstream) = setup_server();

    let response = send(
        &server,
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(upstream.call_count(), 0);
}

// ==========================================================================
// Tool Listing
// ==========================================================================

#[tokio::test]
async fn test_tools_list_contains_every_tool() {
    let (server, _) = setup_server();

    let response = send(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;
    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();

    for expected in [
        "tag_manager_list_accounts",
        "tag_manager_get_account",
        "tag_manager_update_account",
        "gtm_container",
        "gtm_workspace",
        "gtm_tag",
        "gtm_trigger",
        "gtm_variable",
        "gtm_template",
        "gtm_transformation",
        "gtm_client",
        "gtm_zone",
        "gtm_folder",
        "gtm_gtag_config",
        "gtm_built_in_variable",
        "gtm_destination",
        "gtm_environment",
        "gtm_version",
        "gtm_version_header",
        "gtm_user_permission",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
    assert_eq!(names.len(), 20);
}

#[tokio::test]
async fn test_tools_have_object_input_schemas() {
    let (server, _) = setup_server();

    let response = send(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;
    for tool in response["result"]["tools"].as_array().unwrap() {
        assert_eq!(tool["inputSchema"]["type"], "object", "tool {}", tool["name"]);
        assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
    }
}

// ==========================================================================
// Tool Results
// ==========================================================================

#[tokio::test]
async fn test_unknown_tool_is_tool_error() {
    let (server, upstream) = setup_server();

    let response = send(&server, &tool_call(9, "gtm_does_not_exist", json!({}))).await;

    assert!(response.get("error").is_none(), "unknown tool is not a protocol error");
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(
        response["result"]["content"][0]["text"],
        "Unknown tool: gtm_does_not_exist"
    );
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn test_validation_failure_is_tool_error() {
    let (server, upstream) = setup_server();

    let response = send(
        &server,
        &tool_call(
            10,
            "gtm_tag",
            json!({"action": "get", "accountId": "1", "containerId": "2", "workspaceId": "3"}),
        ),
    )
    .await;

    assert_eq!(response["result"]["isError"], true);
    assert_eq!(
        response["result"]["content"][0]["text"],
        "Error performing get on GTM tag: tagId is required for get action"
    );
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn test_success_result_has_text_content() {
    let (server, upstream) = setup_server();
    upstream.respond_json(json!({"account": [{"accountId": "1", "name": "Test"}]}));

    let response = send(&server, &tool_call(11, "tag_manager_list_accounts", json!({}))).await;

    assert!(response["result"].get("isError").is_none());
    assert_eq!(response["result"]["content"][0]["type"], "text");
}
