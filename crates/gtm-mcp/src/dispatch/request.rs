//! Validated dispatcher requests
//!
//! [`DispatchRequest::parse`] is the single place where a raw argument object
//! becomes a typed [`Operation`]. Every required field is checked there, so
//! [`DispatchRequest::plan`] can map each variant straight onto one REST call
//! without further validation.

use gtm_api::ApiRequest;
use serde_json::{Map, Value, json};

use super::action::Action;
use super::args::{ArgResult, Args};
use super::resource::{Depth, Resource};
use crate::envelope::ToolFailure;
use crate::schemas::strip_path_fields;

/// Entity kinds accepted inside `resolveConflict`'s `entity` argument
pub const CONFLICT_ENTITY_KINDS: &[&str] = &[
    "tag",
    "trigger",
    "variable",
    "folder",
    "client",
    "transformation",
    "zone",
    "customTemplate",
    "builtInVariable",
    "gtagConfig",
];

/// Parent identifiers of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub account_id: String,
    pub container_id: Option<String>,
    pub workspace_id: Option<String>,
}

impl Location {
    fn account_path(&self) -> String {
        format!("accounts/{}", self.account_id)
    }

    /// Parent path of a family at `depth`; ids were validated by `parse`.
    fn parent(&self, depth: Depth) -> String {
        let mut path = self.account_path();
        if depth >= Depth::Container {
            if let Some(container) = &self.container_id {
                path.push_str("/containers/");
                path.push_str(container);
            }
        }
        if depth >= Depth::Workspace {
            if let Some(workspace) = &self.workspace_id {
                path.push_str("/workspaces/");
                path.push_str(workspace);
            }
        }
        path
    }
}

/// Options of `moveTagId`; all optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveTagIdOptions {
    pub tag_id: Option<String>,
    pub tag_name: Option<String>,
    pub allow_user_permission_feature_update: Option<bool>,
    pub copy_settings: Option<bool>,
    pub copy_terms_of_service: Option<bool>,
    pub copy_users: Option<bool>,
}

/// One validated action, carrying exactly what its REST call needs
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create {
        config: Map<String, Value>,
    },
    Get {
        id: String,
    },
    List {
        page_token: Option<String>,
    },
    Update {
        id: String,
        config: Map<String, Value>,
        fingerprint: Option<String>,
    },
    Remove {
        id: String,
    },
    Revert {
        id: String,
        fingerprint: Option<String>,
    },
    FolderEntities {
        id: String,
        page_token: Option<String>,
    },
    MoveEntitiesToFolder {
        id: String,
        tag_ids: Vec<String>,
        trigger_ids: Vec<String>,
        variable_ids: Vec<String>,
    },
    Reauthorize {
        id: String,
    },
    Link {
        destination_id: String,
        allow_user_permission_feature_update: Option<bool>,
    },
    Live,
    Publish {
        id: String,
        fingerprint: Option<String>,
    },
    SetLatest {
        id: String,
    },
    Undelete {
        id: String,
    },
    LatestHeader,
    ListHeaders {
        include_deleted: bool,
        page_token: Option<String>,
    },
    Combine {
        from_container_id: String,
        to_container_id: String,
        allow_user_permission_feature_update: Option<bool>,
        setting_source: Option<String>,
    },
    Lookup {
        destination_id: String,
    },
    MoveTagId {
        id: String,
        options: MoveTagIdOptions,
    },
    Snippet {
        id: String,
    },
    CreateVersion {
        id: String,
        options: Map<String, Value>,
    },
    GetStatus {
        id: String,
    },
    Sync {
        id: String,
    },
    QuickPreview {
        id: String,
    },
    ResolveConflict {
        id: String,
        fingerprint: String,
        entity_kind: String,
        entity: Value,
        change_status: Option<String>,
    },
    CreateBuiltIns {
        types: Vec<String>,
    },
    RemoveBuiltIns {
        types: Vec<String>,
    },
    RevertBuiltIn {
        kind: String,
    },
}

/// What a successful call renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pretty-printed response body
    Body,
    /// `{success: true, message}`; the response body is ignored
    Confirm(String),
}

/// The single REST call a request maps to
#[derive(Debug, Clone, PartialEq)]
pub struct Planned {
    pub request: ApiRequest,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub resource: Resource,
    pub action: Action,
    pub location: Location,
    pub operation: Operation,
}

impl DispatchRequest {
    /// Validate raw arguments for `resource`.
    ///
    /// Fails with `Unknown action: <x>` for actions outside the family and
    /// with `<field> is required for <action> action` for missing fields.
    pub fn parse(resource: Resource, raw: &Value) -> ArgResult<Self> {
        let empty = Map::new();
        let map = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ToolFailure::generic("arguments must be a JSON object")),
        };

        let action = match map.get("action") {
            None | Some(Value::Null) => return Err(ToolFailure::generic("action is required")),
            Some(Value::String(name)) => Action::parse(name)
                .filter(|action| resource.supports(*action))
                .ok_or_else(|| ToolFailure::generic(format!("Unknown action: {name}")))?,
            Some(other) => return Err(ToolFailure::generic(format!("Unknown action: {other}"))),
        };

        let args = Args::new(map, action);
        let location = Location {
            account_id: args.id("accountId")?,
            container_id: if resource.depth() >= Depth::Container {
                Some(args.id("containerId")?)
            } else {
                None
            },
            workspace_id: if resource.depth() >= Depth::Workspace {
                Some(args.id("workspaceId")?)
            } else {
                None
            },
        };

        let operation = parse_operation(resource, action, &args)?;
        Ok(Self {
            resource,
            action,
            location,
            operation,
        })
    }

    /// Map the validated operation onto its REST call.
    pub fn plan(&self) -> Planned {
        let resource = self.resource;
        let loc = &self.location;
        let parent = loc.parent(resource.depth());
        let collection = format!("{parent}/{}", resource.collection());
        let entity = |id: &str| format!("{collection}/{id}");
        let body = |request: ApiRequest| Planned {
            request,
            outcome: Outcome::Body,
        };
        let confirm = |request: ApiRequest, message: String| Planned {
            request,
            outcome: Outcome::Confirm(message),
        };

        match &self.operation {
            Operation::Create { config } => {
                body(ApiRequest::post(&collection).body(Value::Object(config.clone())))
            }
            Operation::Get { id } => body(ApiRequest::get(entity(id))),
            Operation::List { page_token } => {
                body(ApiRequest::get(&collection).query_opt("pageToken", page_token.as_deref()))
            }
            Operation::Update {
                id,
                config,
                fingerprint,
            } => body(
                ApiRequest::put(entity(id))
                    .query_opt("fingerprint", fingerprint.as_deref())
                    .body(Value::Object(config.clone())),
            ),
            Operation::Remove { id } => confirm(
                ApiRequest::delete(entity(id)),
                format!("{} {id} was successfully deleted", resource.label()),
            ),
            Operation::Revert { id, fingerprint } => body(
                ApiRequest::post(format!("{}:revert", entity(id)))
                    .query_opt("fingerprint", fingerprint.as_deref()),
            ),
            Operation::FolderEntities { id, page_token } => body(
                ApiRequest::post(format!("{}:entities", entity(id)))
                    .query_opt("pageToken", page_token.as_deref()),
            ),
            Operation::MoveEntitiesToFolder {
                id,
                tag_ids,
                trigger_ids,
                variable_ids,
            } => confirm(
                ApiRequest::post(format!("{}:move_entities_to_folder", entity(id)))
                    .query_all("tagId", tag_ids)
                    .query_all("triggerId", trigger_ids)
                    .query_all("variableId", variable_ids),
                format!(
                    "Entities moved to folder {id} in workspace {} for container {} in account {}",
                    loc.workspace_id.as_deref().unwrap_or_default(),
                    loc.container_id.as_deref().unwrap_or_default(),
                    loc.account_id
                ),
            ),
            Operation::Reauthorize { id } => {
                body(ApiRequest::post(format!("{}:reauthorize", entity(id))))
            }
            Operation::Link {
                destination_id,
                allow_user_permission_feature_update,
            } => body(
                ApiRequest::post(format!("{collection}:link"))
                    .query("destinationId", destination_id)
                    .query_opt(
                        "allowUserPermissionFeatureUpdate",
                        *allow_user_permission_feature_update,
                    ),
            ),
            Operation::Live => body(ApiRequest::get(format!("{collection}:live"))),
            Operation::Publish { id, fingerprint } => body(
                ApiRequest::post(format!("{}:publish", entity(id)))
                    .query_opt("fingerprint", fingerprint.as_deref()),
            ),
            Operation::SetLatest { id } => {
                body(ApiRequest::post(format!("{}:set_latest", entity(id))))
            }
            Operation::Undelete { id } => body(ApiRequest::post(format!("{}:undelete", entity(id)))),
            Operation::LatestHeader => body(ApiRequest::get(format!("{collection}:latest"))),
            Operation::ListHeaders {
                include_deleted,
                page_token,
            } => body(
                ApiRequest::get(&collection)
                    .query("includeDeleted", include_deleted)
                    .query_opt("pageToken", page_token.as_deref()),
            ),
            Operation::Combine {
                from_container_id,
                to_container_id,
                allow_user_permission_feature_update,
                setting_source,
            } => body(
                ApiRequest::post(format!("{}:combine", entity(from_container_id)))
                    .query("containerId", to_container_id)
                    .query_opt(
                        "allowUserPermissionFeatureUpdate",
                        *allow_user_permission_feature_update,
                    )
                    .query_opt("settingSource", setting_source.as_deref()),
            ),
            Operation::Lookup { destination_id } => body(
                ApiRequest::get("accounts/containers:lookup").query("destinationId", destination_id),
            ),
            Operation::MoveTagId { id, options } => body(
                ApiRequest::post(format!("{}:move_tag_id", entity(id)))
                    .query_opt("tagId", options.tag_id.as_deref())
                    .query_opt("tagName", options.tag_name.as_deref())
                    .query_opt(
                        "allowUserPermissionFeatureUpdate",
                        options.allow_user_permission_feature_update,
                    )
                    .query_opt("copySettings", options.copy_settings)
                    .query_opt("copyTermsOfService", options.copy_terms_of_service)
                    .query_opt("copyUsers", options.copy_users),
            ),
            Operation::Snippet { id } => body(ApiRequest::get(format!("{}:snippet", entity(id)))),
            Operation::CreateVersion { id, options } => body(
                ApiRequest::post(format!("{}:create_version", entity(id)))
                    .body(Value::Object(options.clone())),
            ),
            Operation::GetStatus { id } => body(ApiRequest::get(format!("{}/status", entity(id)))),
            Operation::Sync { id } => body(ApiRequest::post(format!("{}:sync", entity(id)))),
            Operation::QuickPreview { id } => {
                body(ApiRequest::post(format!("{}:quick_preview", entity(id))))
            }
            Operation::ResolveConflict {
                id,
                fingerprint,
                entity_kind,
                entity: resolved,
                change_status,
            } => {
                let mut payload = Map::new();
                if let Some(status) = change_status {
                    payload.insert("changeStatus".into(), Value::String(status.clone()));
                }
                payload.insert(entity_kind.clone(), resolved.clone());
                confirm(
                    ApiRequest::post(format!("{}:resolve_conflict", entity(id)))
                        .query("fingerprint", fingerprint)
                        .body(Value::Object(payload)),
                    format!(
                        "Conflict resolved in workspace {id} for account {}",
                        loc.account_id
                    ),
                )
            }
            Operation::CreateBuiltIns { types } => {
                body(ApiRequest::post(&collection).query_all("type", types))
            }
            Operation::RemoveBuiltIns { types } => confirm(
                ApiRequest::delete(&collection).query_all("type", types),
                format!(
                    "Built-in variables deleted in workspace {} for container {} in account {}",
                    loc.workspace_id.as_deref().unwrap_or_default(),
                    loc.container_id.as_deref().unwrap_or_default(),
                    loc.account_id
                ),
            ),
            Operation::RevertBuiltIn { kind } => {
                body(ApiRequest::post(format!("{collection}:revert")).query("type", kind))
            }
        }
    }
}

fn config(resource: Resource, args: &Args<'_>, key: &str) -> ArgResult<Map<String, Value>> {
    let raw = args.object(key)?.clone();
    Ok(strip_path_fields(raw, &resource.path_fields()))
}

fn entity_id(resource: Resource, args: &Args<'_>) -> ArgResult<String> {
    match resource.id_field() {
        Some(field) => args.id(field),
        None => Err(ToolFailure::generic(format!(
            "{} does not address single entities",
            resource.tool_name()
        ))),
    }
}

fn parse_operation(resource: Resource, action: Action, args: &Args<'_>) -> ArgResult<Operation> {
    let op = match (resource, action) {
        (Resource::BuiltInVariable, Action::Create) => Operation::CreateBuiltIns {
            types: args.str_list("types")?,
        },
        (Resource::BuiltInVariable, Action::Remove) => Operation::RemoveBuiltIns {
            types: args.str_list("types")?,
        },
        (Resource::BuiltInVariable, Action::Revert) => Operation::RevertBuiltIn {
            kind: args.str("type")?,
        },
        (Resource::VersionHeader, Action::List) => Operation::ListHeaders {
            include_deleted: args.bool("includeDeleted")?,
            page_token: args.opt_str("pageToken")?,
        },
        (_, Action::Create) => Operation::Create {
            config: config(resource, args, "createOrUpdateConfig")?,
        },
        (_, Action::Get) => Operation::Get {
            id: entity_id(resource, args)?,
        },
        (_, Action::List) => Operation::List {
            page_token: args.opt_str("pageToken")?,
        },
        (_, Action::Update) => {
            let id = entity_id(resource, args)?;
            let config = config(resource, args, "createOrUpdateConfig")?;
            let fingerprint = if resource.fingerprinted() {
                Some(args.str("fingerprint")?)
            } else {
                None
            };
            Operation::Update {
                id,
                config,
                fingerprint,
            }
        }
        (_, Action::Remove) => Operation::Remove {
            id: entity_id(resource, args)?,
        },
        (_, Action::Revert) => Operation::Revert {
            id: entity_id(resource, args)?,
            fingerprint: args.opt_str("fingerprint")?,
        },
        (_, Action::Entities) => Operation::FolderEntities {
            id: entity_id(resource, args)?,
            page_token: args.opt_str("pageToken")?,
        },
        (_, Action::MoveEntitiesToFolder) => {
            let id = entity_id(resource, args)?;
            let tag_ids = args.opt_str_list("tagId")?.unwrap_or_default();
            let trigger_ids = args.opt_str_list("triggerId")?.unwrap_or_default();
            let variable_ids = args.opt_str_list("variableId")?.unwrap_or_default();
            if tag_ids.is_empty() && trigger_ids.is_empty() && variable_ids.is_empty() {
                return Err(ToolFailure::generic(format!(
                    "At least one of tagId, triggerId, or variableId is required for {action} action"
                )));
            }
            Operation::MoveEntitiesToFolder {
                id,
                tag_ids,
                trigger_ids,
                variable_ids,
            }
        }
        (_, Action::Reauthorize) => Operation::Reauthorize {
            id: entity_id(resource, args)?,
        },
        (_, Action::Link) => Operation::Link {
            destination_id: args.str("destinationId")?,
            allow_user_permission_feature_update: args.opt_bool("allowUserPermissionFeatureUpdate")?,
        },
        (_, Action::Unlink) => {
            let destination_id = args.str("destinationId")?;
            tracing::warn!(
                destination_id = %destination_id,
                "Refusing destination unlink: no such Tag Manager API endpoint"
            );
            return Err(ToolFailure::generic(format!(
                "Destination unlinking is not supported by the Tag Manager API; unlink destinationId {destination_id} in the Tag Manager UI"
            )));
        }
        (_, Action::Live) => Operation::Live,
        (_, Action::Publish) => Operation::Publish {
            id: entity_id(resource, args)?,
            fingerprint: args.opt_str("fingerprint")?,
        },
        (_, Action::SetLatest) => Operation::SetLatest {
            id: entity_id(resource, args)?,
        },
        (_, Action::Undelete) => Operation::Undelete {
            id: entity_id(resource, args)?,
        },
        (_, Action::Latest) => Operation::LatestHeader,
        (_, Action::Combine) => {
            let combine = args.object("combineConfig")?;
            let combine = args.nested("combineConfig", combine);
            Operation::Combine {
                from_container_id: combine.id("fromContainerId")?,
                to_container_id: combine.id("toContainerId")?,
                allow_user_permission_feature_update: combine
                    .opt_bool("allowUserPermissionFeatureUpdate")?,
                setting_source: combine.opt_str("settingSource")?,
            }
        }
        (_, Action::Lookup) => Operation::Lookup {
            destination_id: args.str("destinationId")?,
        },
        (_, Action::MoveTagId) => {
            let id = entity_id(resource, args)?;
            let raw = args.object("moveTagIdConfig")?;
            let opts = args.nested("moveTagIdConfig", raw);
            Operation::MoveTagId {
                id,
                options: MoveTagIdOptions {
                    tag_id: opts.opt_str("tagId")?,
                    tag_name: opts.opt_str("tagName")?,
                    allow_user_permission_feature_update: opts
                        .opt_bool("allowUserPermissionFeatureUpdate")?,
                    copy_settings: opts.opt_bool("copySettings")?,
                    copy_terms_of_service: opts.opt_bool("copyTermsOfService")?,
                    copy_users: opts.opt_bool("copyUsers")?,
                },
            }
        }
        (_, Action::Snippet) => Operation::Snippet {
            id: entity_id(resource, args)?,
        },
        (_, Action::CreateVersion) => Operation::CreateVersion {
            id: entity_id(resource, args)?,
            options: args
                .opt_object("createVersionConfig")?
                .cloned()
                .unwrap_or_default(),
        },
        (_, Action::GetStatus) => Operation::GetStatus {
            id: entity_id(resource, args)?,
        },
        (_, Action::Sync) => Operation::Sync {
            id: entity_id(resource, args)?,
        },
        (_, Action::QuickPreview) => Operation::QuickPreview {
            id: entity_id(resource, args)?,
        },
        (_, Action::ResolveConflict) => {
            let id = entity_id(resource, args)?;
            let fingerprint = args.str("fingerprint")?;
            let entity = args.object("entity")?;
            let mut kinds = entity.iter().filter(|(k, _)| CONFLICT_ENTITY_KINDS.contains(&k.as_str()));
            let (kind, value) = match (kinds.next(), kinds.next(), entity.len()) {
                (Some(found), None, 1) => found,
                _ => {
                    return Err(ToolFailure::generic(format!(
                        "entity must contain exactly one of: {}",
                        CONFLICT_ENTITY_KINDS.join(", ")
                    )));
                }
            };
            Operation::ResolveConflict {
                id,
                fingerprint,
                entity_kind: kind.clone(),
                entity: value.clone(),
                change_status: args.opt_str("changeStatus")?,
            }
        }
    };
    Ok(op)
}

/// `{success: true, message}` body returned by destructive actions
pub fn confirmation(message: &str) -> Value {
    json!({ "success": true, "message": message })
}
