//! Tool call routing
//!
//! A tool call is looked up in the registry and handed to the account tools
//! or to the dispatcher of its resource family. Whatever happens, the caller
//! gets a [`ToolResult`]; failures never escape as errors.

use std::sync::Arc;

use gtm_api::{ClientProvider, Credentials, Scope, TagManagerClient};
use serde_json::Value;

use crate::accounts;
use crate::dispatch;
use crate::envelope::ToolFailure;
use crate::registry::{ToolHandler, ToolRegistry};
use crate::tools::ToolResult;

/// Per-call view of how to reach the Tag Manager API
#[derive(Clone)]
pub struct CallContext {
    provider: Arc<dyn ClientProvider>,
    credentials: Credentials,
}

impl CallContext {
    pub fn new(provider: Arc<dyn ClientProvider>, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Fresh API client for this call; nothing is cached between calls.
    pub async fn client(&self, scopes: &[Scope]) -> Result<TagManagerClient, ToolFailure> {
        self.provider
            .client(&self.credentials, scopes)
            .await
            .map_err(ToolFailure::from)
    }
}

/// Handle a tool call by name.
pub async fn handle_tool_call(
    registry: &ToolRegistry,
    ctx: &CallContext,
    name: &str,
    arguments: Value,
) -> ToolResult {
    let Some(handler) = registry.handler(name) else {
        tracing::warn!(tool = name, "Unknown tool requested");
        return ToolResult::error(format!("Unknown tool: {name}"));
    };

    match handler {
        ToolHandler::Account(tool) => accounts::call(ctx, tool, &arguments).await,
        ToolHandler::Dispatcher(resource) => dispatch::dispatch(ctx, resource, &arguments).await,
    }
}
