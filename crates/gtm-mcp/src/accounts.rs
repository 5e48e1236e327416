//! Standalone account tools
//!
//! Accounts sit above every dispatcher family and only support list, get
//! and update, so they keep dedicated tools instead of an `action` switch.

use gtm_api::{ApiRequest, Scope};
use serde_json::{Map, Value, json};

use crate::dispatch::args::path_safe_id;
use crate::envelope::{ToolFailure, error_response};
use crate::handlers::CallContext;
use crate::registry::{ToolHandler, ToolRegistry};
use crate::schemas::{self, object_schema};
use crate::tools::{ToolDefinition, ToolResult};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTool {
    List,
    Get,
    Update,
}

impl AccountTool {
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "tag_manager_list_accounts",
            Self::Get => "tag_manager_get_account",
            Self::Update => "tag_manager_update_account",
        }
    }

    fn definition(self) -> ToolDefinition {
        let (description, input_schema) = match self {
            Self::List => (
                "Lists all GTM accounts accessible by the authenticated user",
                json!({
                    "type": "object",
                    "properties": {
                        "pageToken": {"type": "string", "description": "A token for pagination."}
                    }
                }),
            ),
            Self::Get => (
                "Gets a GTM account",
                json!({
                    "type": "object",
                    "properties": {
                        "accountId": {"type": "string", "description": "The unique ID of the GTM account."}
                    },
                    "required": ["accountId"]
                }),
            ),
            Self::Update => {
                let mut schema = object_schema(schemas::ACCOUNT, &[], "Updates a GTM account");
                schema["required"] = json!(["accountId"]);
                ("Updates a GTM account", schema)
            }
        };
        ToolDefinition {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema,
        }
    }

    fn scopes(self) -> &'static [Scope] {
        match self {
            Self::List | Self::Get => &[Scope::Readonly],
            Self::Update => &[Scope::ManageAccounts],
        }
    }
}

/// Register the three account tools.
pub fn register(registry: &mut ToolRegistry) -> Result<()> {
    for tool in [AccountTool::List, AccountTool::Get, AccountTool::Update] {
        registry.register(tool.definition(), ToolHandler::Account(tool))?;
    }
    Ok(())
}

/// Run one account tool call.
pub async fn call(ctx: &CallContext, tool: AccountTool, arguments: &Value) -> ToolResult {
    let account_id = arguments
        .get("accountId")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    tracing::info!(tool = tool.name(), account_id, "Running tool");

    let prefix = match tool {
        AccountTool::List => "Error listing accounts".to_string(),
        AccountTool::Get => format!("Error getting account at account {account_id}"),
        AccountTool::Update => format!("Error updating account at account {account_id}"),
    };

    match run(ctx, tool, arguments).await {
        Ok(body) => ToolResult::json(&body),
        Err(failure) => error_response(&prefix, Some(&failure)),
    }
}

fn plan(tool: AccountTool, arguments: &Value) -> std::result::Result<ApiRequest, ToolFailure> {
    let empty = Map::new();
    let args = arguments.as_object().unwrap_or(&empty);
    let string = |key: &str| args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    let account_id = || {
        let id = string("accountId").ok_or_else(|| ToolFailure::generic("accountId is required"))?;
        path_safe_id("accountId", id.to_string())
    };

    Ok(match tool {
        AccountTool::List => ApiRequest::get("accounts").query_opt("pageToken", string("pageToken")),
        AccountTool::Get => ApiRequest::get(format!("accounts/{}", account_id()?)),
        AccountTool::Update => {
            let mut body = args.clone();
            body.remove("accountId");
            body.remove("fingerprint");
            ApiRequest::put(format!("accounts/{}", account_id()?))
                .query_opt("fingerprint", string("fingerprint"))
                .body(Value::Object(body))
        }
    })
}

async fn run(
    ctx: &CallContext,
    tool: AccountTool,
    arguments: &Value,
) -> std::result::Result<Value, ToolFailure> {
    let request = plan(tool, arguments)?;
    let client = ctx.client(tool.scopes()).await?;
    let response = client.execute(request).await?;
    Ok(response.unwrap_or_else(|| json!({})))
}
