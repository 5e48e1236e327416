//! Resource families served by a dispatcher tool
//!
//! A [`Resource`] knows everything static about its family: tool name, the
//! nouns used in messages, where it sits in the account/container/workspace
//! tree, its REST collection, its id argument, and which actions it accepts.

use gtm_api::Scope;

use super::action::Action;
use crate::schemas::{self, Field};

/// How deep the parent of a family sits in the resource tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Depth {
    /// `accounts/{a}`
    Account,
    /// `accounts/{a}/containers/{c}`
    Container,
    /// `accounts/{a}/containers/{c}/workspaces/{w}`
    Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Container,
    Workspace,
    Tag,
    Trigger,
    Variable,
    Template,
    Transformation,
    Client,
    Zone,
    Folder,
    GtagConfig,
    BuiltInVariable,
    Destination,
    Environment,
    Version,
    VersionHeader,
    UserPermission,
}

const ENTITY_ACTIONS: &[Action] = &[
    Action::Create,
    Action::Get,
    Action::List,
    Action::Update,
    Action::Remove,
    Action::Revert,
];

const CRUD_ACTIONS: &[Action] = &[
    Action::Create,
    Action::Get,
    Action::List,
    Action::Update,
    Action::Remove,
];

impl Resource {
    pub const ALL: &'static [Resource] = &[
        Self::Container,
        Self::Workspace,
        Self::Tag,
        Self::Trigger,
        Self::Variable,
        Self::Template,
        Self::Transformation,
        Self::Client,
        Self::Zone,
        Self::Folder,
        Self::GtagConfig,
        Self::BuiltInVariable,
        Self::Destination,
        Self::Environment,
        Self::Version,
        Self::VersionHeader,
        Self::UserPermission,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Container => "gtm_container",
            Self::Workspace => "gtm_workspace",
            Self::Tag => "gtm_tag",
            Self::Trigger => "gtm_trigger",
            Self::Variable => "gtm_variable",
            Self::Template => "gtm_template",
            Self::Transformation => "gtm_transformation",
            Self::Client => "gtm_client",
            Self::Zone => "gtm_zone",
            Self::Folder => "gtm_folder",
            Self::GtagConfig => "gtm_gtag_config",
            Self::BuiltInVariable => "gtm_built_in_variable",
            Self::Destination => "gtm_destination",
            Self::Environment => "gtm_environment",
            Self::Version => "gtm_version",
            Self::VersionHeader => "gtm_version_header",
            Self::UserPermission => "gtm_user_permission",
        }
    }

    /// Noun used in `Error performing <action> on <noun>`
    pub fn noun(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Workspace => "workspace",
            Self::Tag => "GTM tag",
            Self::Trigger => "GTM trigger",
            Self::Variable => "variable",
            Self::Template => "GTM custom template",
            Self::Transformation => "GTM transformation",
            Self::Client => "client",
            Self::Zone => "zone",
            Self::Folder => "folder",
            Self::GtagConfig => "gtag config",
            Self::BuiltInVariable => "built-in variable",
            Self::Destination => "destination",
            Self::Environment => "environment",
            Self::Version => "container version",
            Self::VersionHeader => "container version header",
            Self::UserPermission => "user permission",
        }
    }

    /// Capitalised label used in `<Label> <id> was successfully deleted`
    pub fn label(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Workspace => "Workspace",
            Self::Tag => "Tag",
            Self::Trigger => "Trigger",
            Self::Variable => "Variable",
            Self::Template => "Template",
            Self::Transformation => "Transformation",
            Self::Client => "Client",
            Self::Zone => "Zone",
            Self::Folder => "Folder",
            Self::GtagConfig => "Google tag config",
            Self::BuiltInVariable => "Built-in variable",
            Self::Destination => "Destination",
            Self::Environment => "Environment",
            Self::Version => "Container version",
            Self::VersionHeader => "Container version header",
            Self::UserPermission => "User permission",
        }
    }

    pub fn depth(self) -> Depth {
        match self {
            Self::Container | Self::UserPermission => Depth::Account,
            Self::Workspace
            | Self::Destination
            | Self::Environment
            | Self::Version
            | Self::VersionHeader => Depth::Container,
            Self::Tag
            | Self::Trigger
            | Self::Variable
            | Self::Template
            | Self::Transformation
            | Self::Client
            | Self::Zone
            | Self::Folder
            | Self::GtagConfig
            | Self::BuiltInVariable => Depth::Workspace,
        }
    }

    /// REST collection segment under the parent path
    pub fn collection(self) -> &'static str {
        match self {
            Self::Container => "containers",
            Self::Workspace => "workspaces",
            Self::Tag => "tags",
            Self::Trigger => "triggers",
            Self::Variable => "variables",
            Self::Template => "templates",
            Self::Transformation => "transformations",
            Self::Client => "clients",
            Self::Zone => "zones",
            Self::Folder => "folders",
            Self::GtagConfig => "gtag_config",
            Self::BuiltInVariable => "built_in_variables",
            Self::Destination => "destinations",
            Self::Environment => "environments",
            Self::Version => "versions",
            Self::VersionHeader => "version_headers",
            Self::UserPermission => "user_permissions",
        }
    }

    /// Argument naming a single entity; `None` for collection-only families
    pub fn id_field(self) -> Option<&'static str> {
        match self {
            Self::Container => Some("containerId"),
            Self::Workspace => Some("workspaceId"),
            Self::Tag => Some("tagId"),
            Self::Trigger => Some("triggerId"),
            Self::Variable => Some("variableId"),
            Self::Template => Some("templateId"),
            Self::Transformation => Some("transformationId"),
            Self::Client => Some("clientId"),
            Self::Zone => Some("zoneId"),
            Self::Folder => Some("folderId"),
            Self::GtagConfig => Some("gtagConfigId"),
            Self::Destination => Some("destinationId"),
            Self::Environment => Some("environmentId"),
            Self::Version => Some("containerVersionId"),
            Self::UserPermission => Some("userPermissionId"),
            Self::BuiltInVariable | Self::VersionHeader => None,
        }
    }

    pub fn actions(self) -> &'static [Action] {
        match self {
            Self::Container => &[
                Action::Create,
                Action::Get,
                Action::List,
                Action::Update,
                Action::Remove,
                Action::Combine,
                Action::Lookup,
                Action::MoveTagId,
                Action::Snippet,
            ],
            Self::Workspace => &[
                Action::Create,
                Action::Get,
                Action::List,
                Action::Update,
                Action::Remove,
                Action::CreateVersion,
                Action::GetStatus,
                Action::Sync,
                Action::QuickPreview,
                Action::ResolveConflict,
            ],
            Self::Tag
            | Self::Trigger
            | Self::Variable
            | Self::Template
            | Self::Transformation
            | Self::Client
            | Self::Zone => ENTITY_ACTIONS,
            Self::Folder => &[
                Action::Create,
                Action::Get,
                Action::List,
                Action::Update,
                Action::Remove,
                Action::Revert,
                Action::Entities,
                Action::MoveEntitiesToFolder,
            ],
            Self::GtagConfig | Self::UserPermission => CRUD_ACTIONS,
            Self::Environment => &[
                Action::Create,
                Action::Get,
                Action::List,
                Action::Update,
                Action::Remove,
                Action::Reauthorize,
            ],
            Self::BuiltInVariable => &[Action::Create, Action::List, Action::Remove, Action::Revert],
            Self::Destination => &[Action::Get, Action::List, Action::Link, Action::Unlink],
            Self::Version => &[
                Action::Get,
                Action::Live,
                Action::Publish,
                Action::Remove,
                Action::SetLatest,
                Action::Undelete,
                Action::Update,
            ],
            Self::VersionHeader => &[Action::List, Action::Latest],
        }
    }

    pub fn supports(self, action: Action) -> bool {
        self.actions().contains(&action)
    }

    /// `update` refuses to run without a fingerprint
    pub fn fingerprinted(self) -> bool {
        !matches!(
            self,
            Self::UserPermission | Self::BuiltInVariable | Self::Destination | Self::VersionHeader
        )
    }

    /// Field table of the resource, when it accepts a config payload
    pub fn fields(self) -> Option<&'static [Field]> {
        match self {
            Self::Container => Some(schemas::CONTAINER),
            Self::Workspace => Some(schemas::WORKSPACE),
            Self::Tag => Some(schemas::TAG),
            Self::Trigger => Some(schemas::TRIGGER),
            Self::Variable => Some(schemas::VARIABLE),
            Self::Template => Some(schemas::TEMPLATE),
            Self::Transformation => Some(schemas::TRANSFORMATION),
            Self::Client => Some(schemas::CLIENT),
            Self::Zone => Some(schemas::ZONE),
            Self::Folder => Some(schemas::FOLDER),
            Self::GtagConfig => Some(schemas::GTAG_CONFIG),
            Self::Environment => Some(schemas::ENVIRONMENT),
            Self::Version => Some(schemas::CONTAINER_VERSION),
            Self::UserPermission => Some(schemas::USER_PERMISSION),
            Self::BuiltInVariable | Self::Destination | Self::VersionHeader => None,
        }
    }

    /// Arguments that locate the entity and so never belong in a body
    pub fn path_fields(self) -> Vec<&'static str> {
        let mut fields = vec!["accountId"];
        if self.depth() >= Depth::Container {
            fields.push("containerId");
        }
        if self.depth() >= Depth::Workspace {
            fields.push("workspaceId");
        }
        if let Some(id) = self.id_field() {
            if !fields.contains(&id) {
                fields.push(id);
            }
        }
        fields.push("fingerprint");
        fields
    }

    /// OAuth scopes an action needs on this family
    pub fn scopes(self, action: Action) -> &'static [Scope] {
        if self == Self::UserPermission {
            return &[Scope::ManageUsers];
        }
        if action.is_read() {
            return &[Scope::Readonly];
        }
        match (self, action) {
            (_, Action::Publish) => &[Scope::Publish],
            (Self::Workspace, Action::CreateVersion | Action::QuickPreview) => {
                &[Scope::EditContainerVersions]
            }
            (Self::Version, _) => &[Scope::EditContainerVersions],
            (Self::Container, Action::Remove) => &[Scope::DeleteContainers],
            _ => &[Scope::EditContainers],
        }
    }

    pub fn description(self) -> String {
        let actions: Vec<&str> = self.actions().iter().map(|a| a.as_str()).collect();
        format!(
            "Performs all {} operations: {}. Use the 'action' parameter to select the operation.",
            self.noun(),
            actions.join(", ")
        )
    }
}
