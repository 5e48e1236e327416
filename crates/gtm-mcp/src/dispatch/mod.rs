//! Action dispatcher tools
//!
//! One tool per resource family (`gtm_tag`, `gtm_workspace`, ...). Each call
//! runs through the same pipeline:
//!
//! ```text
//! raw args ──parse──► DispatchRequest ──plan──► ApiRequest ──execute──► text
//!              │                                               │
//!              └─ missing field / unknown action               └─ ApiError
//!                 (no client, no network)                         │
//!                                  ToolFailure ◄──────────────────┘
//! ```

pub mod action;
pub mod args;
pub mod request;
pub mod resource;

use serde_json::{Map, Value, json};

pub use action::Action;
pub use request::{DispatchRequest, Operation, Outcome, Planned};
pub use resource::{Depth, Resource};

use crate::Result;
use crate::envelope::{ToolFailure, error_response};
use crate::handlers::CallContext;
use crate::registry::{ToolHandler, ToolRegistry};
use crate::schemas::object_schema;
use crate::tools::{ToolDefinition, ToolResult};

/// Register one dispatcher tool per resource family.
pub fn register(registry: &mut ToolRegistry) -> Result<()> {
    for &resource in Resource::ALL {
        let definition = ToolDefinition {
            name: resource.tool_name().to_string(),
            description: resource.description(),
            input_schema: input_schema(resource),
        };
        registry.register(definition, ToolHandler::Dispatcher(resource))?;
    }
    Ok(())
}

/// Run one dispatcher call end to end.
pub async fn dispatch(ctx: &CallContext, resource: Resource, arguments: &Value) -> ToolResult {
    let action_name = arguments
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    tracing::info!(tool = resource.tool_name(), action = %action_name, "Running tool");

    match execute(ctx, resource, arguments).await {
        Ok(result) => result,
        Err(failure) => error_response(
            &format!("Error performing {action_name} on {}", resource.noun()),
            Some(&failure),
        ),
    }
}

async fn execute(
    ctx: &CallContext,
    resource: Resource,
    arguments: &Value,
) -> std::result::Result<ToolResult, ToolFailure> {
    let parsed = DispatchRequest::parse(resource, arguments)?;
    let Planned { request, outcome } = parsed.plan();

    let client = ctx.client(resource.scopes(parsed.action)).await?;
    let response = client.execute(request).await?;

    Ok(match outcome {
        Outcome::Body => ToolResult::json(&response.unwrap_or_else(|| json!({}))),
        Outcome::Confirm(message) => ToolResult::json(&request::confirmation(&message)),
    })
}

/// JSON Schema for a dispatcher tool's arguments
pub fn input_schema(resource: Resource) -> Value {
    let mut properties = Map::new();
    let actions: Vec<&str> = resource.actions().iter().map(|a| a.as_str()).collect();
    properties.insert(
        "action".into(),
        json!({
            "type": "string",
            "enum": actions,
            "description": format!("The {} operation to perform.", resource.noun()),
        }),
    );

    let mut required = vec!["action", "accountId"];
    properties.insert("accountId".into(), id_schema("The unique ID of the GTM account."));
    if resource.depth() >= Depth::Container {
        properties.insert("containerId".into(), id_schema("The unique ID of the GTM container."));
        required.push("containerId");
    }
    if resource.depth() >= Depth::Workspace {
        properties.insert("workspaceId".into(), id_schema("The unique ID of the GTM workspace."));
        required.push("workspaceId");
    }
    if let Some(id) = resource.id_field() {
        properties.entry(id).or_insert_with(|| {
            id_schema(&format!(
                "The unique ID of the {}. Required for actions that address a single entity.",
                resource.noun()
            ))
        });
    }

    let actions = resource.actions();
    if let Some(fields) = resource.fields() {
        if actions.contains(&Action::Create) || actions.contains(&Action::Update) {
            properties.insert(
                "createOrUpdateConfig".into(),
                object_schema(
                    fields,
                    &resource.path_fields(),
                    "Configuration for 'create' and 'update' actions.",
                ),
            );
        }
    }
    if resource.fingerprinted() {
        properties.insert(
            "fingerprint".into(),
            id_schema("The fingerprint for optimistic concurrency control. Required for 'update'."),
        );
    }
    if actions.contains(&Action::List) || actions.contains(&Action::Entities) {
        properties.insert("pageToken".into(), id_schema("A token for pagination."));
    }

    extra_properties(resource, &mut properties);

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn id_schema(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn flag_schema(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn list_schema(description: &str) -> Value {
    json!({"type": "array", "items": {"type": "string"}, "description": description})
}

fn extra_properties(resource: Resource, properties: &mut Map<String, Value>) {
    let mut add = |name: &str, schema: Value| {
        properties.insert(name.to_string(), schema);
    };
    match resource {
        Resource::Container => {
            add("destinationId", id_schema("Destination ID linked to a container. Required for 'lookup'."));
            add(
                "combineConfig",
                json!({
                    "type": "object",
                    "description": "Configuration for 'combine'.",
                    "properties": {
                        "fromContainerId": id_schema("Container to merge from."),
                        "toContainerId": id_schema("Container to merge into."),
                        "allowUserPermissionFeatureUpdate": flag_schema(
                            "Allow features of the target container to be changed by user permissions."
                        ),
                        "settingSource": {
                            "type": "string",
                            "enum": ["current", "other"],
                            "description": "Which container's settings survive the combine."
                        }
                    },
                    "required": ["fromContainerId", "toContainerId"]
                }),
            );
            add(
                "moveTagIdConfig",
                json!({
                    "type": "object",
                    "description": "Configuration for 'moveTagId'.",
                    "properties": {
                        "tagId": id_schema("Tag ID to be removed from the current container."),
                        "tagName": id_schema("The name for the newly created tag."),
                        "allowUserPermissionFeatureUpdate": flag_schema(
                            "Allow features of the destination to be changed by user permissions."
                        ),
                        "copySettings": flag_schema("Copy tag settings to the new tag."),
                        "copyTermsOfService": flag_schema("Copy terms of service to the new tag."),
                        "copyUsers": flag_schema("Copy users from this tag to the new tag.")
                    }
                }),
            );
        }
        Resource::Workspace => {
            add(
                "createVersionConfig",
                json!({
                    "type": "object",
                    "description": "Options for 'createVersion'.",
                    "properties": {
                        "name": id_schema("Name of the container version to create."),
                        "notes": id_schema("Notes of the container version to create.")
                    }
                }),
            );
            add(
                "entity",
                json!({
                    "type": "object",
                    "description": format!(
                        "The resolved entity for 'resolveConflict'; exactly one of: {}.",
                        request::CONFLICT_ENTITY_KINDS.join(", ")
                    ),
                }),
            );
            add(
                "changeStatus",
                json!({
                    "type": "string",
                    "enum": ["none", "added", "deleted", "updated"],
                    "description": "How the entity was changed in the workspace."
                }),
            );
        }
        Resource::Folder => {
            add("tagId", list_schema("Tags to move into the folder."));
            add("triggerId", list_schema("Triggers to move into the folder."));
            add("variableId", list_schema("Variables to move into the folder."));
        }
        Resource::BuiltInVariable => {
            add("types", list_schema("Built-in variable types for 'create' and 'remove'."));
            add("type", id_schema("Built-in variable type for 'revert'."));
        }
        Resource::Destination => {
            add(
                "allowUserPermissionFeatureUpdate",
                flag_schema("Allow features of the container to be changed by user permissions."),
            );
        }
        Resource::VersionHeader => {
            add("includeDeleted", flag_schema("Also return deleted versions. Required for 'list'."));
        }
        _ => {}
    }
}
