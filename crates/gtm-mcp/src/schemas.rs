//! Field tables for the Tag Manager resources
//!
//! Each table lists the fields of one API resource with a primitive kind and
//! a short description. The tables render to JSON Schema for tool input
//! declarations and drive the removal of path fields from submitted configs.

use serde_json::{Map, Value, json};

/// Primitive kind of a resource field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    StringArray,
    Object,
    ObjectArray,
}

impl FieldKind {
    pub fn schema(self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Integer => json!({"type": "integer"}),
            Self::StringArray => json!({"type": "array", "items": {"type": "string"}}),
            Self::Object => json!({"type": "object"}),
            Self::ObjectArray => json!({"type": "array", "items": {"type": "object"}}),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

const fn opt(name: &'static str, kind: FieldKind, description: &'static str) -> Field {
    Field {
        name,
        kind,
        required: false,
        description,
    }
}

const fn req(name: &'static str, kind: FieldKind, description: &'static str) -> Field {
    Field {
        name,
        kind,
        required: true,
        description,
    }
}

use FieldKind::{Boolean, Integer, Object, ObjectArray, String as Str, StringArray};

const ACCOUNT_ID: Field = opt("accountId", Str, "GTM account ID.");
const CONTAINER_ID: Field = opt("containerId", Str, "GTM container ID.");
const WORKSPACE_ID: Field = opt("workspaceId", Str, "GTM workspace ID.");
const FINGERPRINT: Field = opt(
    "fingerprint",
    Str,
    "Hash of the resource, computed by the API on every modification.",
);
const TAG_MANAGER_URL: Field = opt("tagManagerUrl", Str, "Auto-generated link to the Tag Manager UI.");
const NOTES: Field = opt("notes", Str, "User notes on how to apply this resource.");
const PARENT_FOLDER_ID: Field = opt("parentFolderId", Str, "Parent folder ID.");
const PARAMETERS: Field = opt("parameter", ObjectArray, "The resource's parameters.");

pub const ACCOUNT: &[Field] = &[
    ACCOUNT_ID,
    opt("name", Str, "Account display name."),
    opt("shareData", Boolean, "Whether the account shares data anonymously with Google and others."),
    FINGERPRINT,
    TAG_MANAGER_URL,
    opt("features", Object, "Read-only account feature set."),
];

pub const CONTAINER: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    req("name", Str, "Container display name."),
    opt("domainName", StringArray, "List of domain names associated with the container."),
    opt("publicId", Str, "Container public ID (GTM-XXXX)."),
    opt("tagIds", StringArray, "All tag IDs that refer to this container."),
    NOTES,
    opt(
        "usageContext",
        StringArray,
        "Usage contexts: web, android, ios, androidSdk5, iosSdk5, amp, server.",
    ),
    FINGERPRINT,
    TAG_MANAGER_URL,
    opt("features", Object, "Read-only container feature set."),
    opt("taggingServerUrls", StringArray, "List of server-side container URLs."),
];

pub const WORKSPACE: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    req("name", Str, "Workspace display name."),
    opt("description", Str, "Workspace description."),
    FINGERPRINT,
    TAG_MANAGER_URL,
];

pub const TAG: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("tagId", Str, "The Tag ID uniquely identifies the GTM Tag."),
    req("name", Str, "Tag display name."),
    req("type", Str, "GTM tag type."),
    opt("firingRuleId", StringArray, "Firing rule IDs. Legacy; prefer firingTriggerId."),
    opt("blockingRuleId", StringArray, "Blocking rule IDs. Legacy; prefer blockingTriggerId."),
    opt("liveOnly", Boolean, "If true, the tag only fires in the live environment."),
    opt("priority", Object, "User defined numeric priority of the tag."),
    NOTES,
    opt("scheduleStartMs", Str, "Start timestamp in milliseconds to schedule the tag."),
    opt("scheduleEndMs", Str, "End timestamp in milliseconds to schedule the tag."),
    PARAMETERS,
    FINGERPRINT,
    opt("firingTriggerId", StringArray, "Trigger IDs that fire the tag."),
    opt("blockingTriggerId", StringArray, "Trigger IDs that block the tag."),
    opt("setupTag", ObjectArray, "Tags that must fire before this tag."),
    opt("teardownTag", ObjectArray, "Tags that must fire after this tag."),
    PARENT_FOLDER_ID,
    opt("tagFiringOption", Str, "Firing option: oncePerEvent, oncePerLoad or unlimited."),
    TAG_MANAGER_URL,
    opt("paused", Boolean, "Whether the tag is paused."),
    opt("monitoringMetadata", Object, "Map of key-value pairs sent with monitoring beacons."),
    opt("monitoringMetadataTagNameKey", Str, "Key used to send the tag name as monitoring metadata."),
    opt("consentSettings", Object, "Consent settings of the tag."),
];

pub const TRIGGER: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("triggerId", Str, "The Trigger ID uniquely identifies the GTM Trigger."),
    req("name", Str, "Trigger display name."),
    req("type", Str, "Defines the data layer event that causes this trigger."),
    opt("customEventFilter", ObjectArray, "Conditions on the custom event name."),
    opt("filter", ObjectArray, "The trigger will only fire if all conditions are true."),
    opt("autoEventFilter", ObjectArray, "Conditions for auto-event triggers."),
    opt("waitForTags", Object, "Whether to delay form submits or link opens until tags fire."),
    opt("checkValidation", Object, "Whether to only fire when the event is not cancelled."),
    opt("waitForTagsTimeout", Object, "How long to wait for tags to fire, in milliseconds."),
    opt("uniqueTriggerId", Object, "Globally unique id of the trigger for auto-event filters."),
    opt("eventName", Object, "Name of the GTM event fired by a timer trigger."),
    opt("interval", Object, "Time between triggering recurring timer events, in milliseconds."),
    opt("limit", Object, "Limit on the number of timer events fired."),
    FINGERPRINT,
    PARENT_FOLDER_ID,
    opt("selector", Object, "CSS selector for element visibility triggers."),
    opt("intervalSeconds", Object, "Time between timer events, in seconds."),
    opt("maxTimerLengthSeconds", Object, "Maximum time to fire timer events, in seconds."),
    opt("verticalScrollPercentageList", Object, "Vertical scroll depth thresholds."),
    opt("horizontalScrollPercentageList", Object, "Horizontal scroll depth thresholds."),
    opt("visibilitySelector", Object, "Element visibility selection method."),
    opt("visiblePercentageMin", Object, "Minimum visible percentage of an element."),
    opt("visiblePercentageMax", Object, "Maximum visible percentage of an element."),
    opt("continuousTimeMinMilliseconds", Object, "Minimum continuous visible time."),
    opt("totalTimeMinMilliseconds", Object, "Minimum total visible time."),
    TAG_MANAGER_URL,
    NOTES,
    PARAMETERS,
];

pub const VARIABLE: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("variableId", Str, "The Variable ID uniquely identifies the GTM Variable."),
    req("name", Str, "Variable display name."),
    req("type", Str, "GTM variable type."),
    NOTES,
    opt("scheduleStartMs", Str, "Start timestamp in milliseconds to schedule the variable."),
    opt("scheduleEndMs", Str, "End timestamp in milliseconds to schedule the variable."),
    PARAMETERS,
    opt("enablingTriggerId", StringArray, "Trigger IDs that enable the variable."),
    opt("disablingTriggerId", StringArray, "Trigger IDs that disable the variable."),
    FINGERPRINT,
    PARENT_FOLDER_ID,
    TAG_MANAGER_URL,
    opt("formatValue", Object, "Option to convert the variable value to another value."),
];

pub const FOLDER: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("folderId", Str, "The Folder ID uniquely identifies the GTM Folder."),
    req("name", Str, "Folder display name."),
    FINGERPRINT,
    TAG_MANAGER_URL,
    NOTES,
];

pub const ZONE: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("zoneId", Str, "The Zone ID uniquely identifies the GTM Zone."),
    req("name", Str, "Zone display name."),
    FINGERPRINT,
    TAG_MANAGER_URL,
    NOTES,
    opt("childContainer", ObjectArray, "Containers that are children of this zone."),
    opt("boundary", Object, "This zone's boundary."),
    opt("typeRestriction", Object, "This zone's type restrictions."),
];

pub const TEMPLATE: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("templateId", Str, "The Custom Template ID uniquely identifies the GTM custom template."),
    req("name", Str, "Custom template display name."),
    FINGERPRINT,
    TAG_MANAGER_URL,
    opt("templateData", Str, "The custom template in text format."),
    opt("galleryReference", Object, "Gallery details, present when imported from the Community Template Gallery."),
];

pub const TRANSFORMATION: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("transformationId", Str, "The Transformation ID uniquely identifies the GTM transformation."),
    req("name", Str, "Transformation display name."),
    req("type", Str, "Transformation type."),
    PARAMETERS,
    FINGERPRINT,
    PARENT_FOLDER_ID,
    NOTES,
    TAG_MANAGER_URL,
];

pub const CLIENT: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("clientId", Str, "The Client ID uniquely identifies the GTM client."),
    req("name", Str, "Client display name."),
    req("type", Str, "Client type."),
    PARAMETERS,
    opt("priority", Integer, "Priority determines relative firing order."),
    FINGERPRINT,
    PARENT_FOLDER_ID,
    NOTES,
    TAG_MANAGER_URL,
];

pub const GTAG_CONFIG: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    WORKSPACE_ID,
    opt("gtagConfigId", Str, "The ID uniquely identifies the Google tag config."),
    req("type", Str, "Google tag config type."),
    PARAMETERS,
    FINGERPRINT,
    TAG_MANAGER_URL,
];

pub const ENVIRONMENT: &[Field] = &[
    ACCOUNT_ID,
    CONTAINER_ID,
    opt("environmentId", Str, "GTM environment ID."),
    opt("type", Str, "Environment type: user, live, latest or workspace."),
    FINGERPRINT,
    req("name", Str, "Environment display name."),
    opt("description", Str, "Environment description."),
    opt("enableDebug", Boolean, "Whether or not to enable debug by default."),
    opt("url", Str, "Default preview page URL for the environment."),
    opt("authorizationCode", Str, "The environment authorization code."),
    opt("authorizationTimestamp", Str, "Last time the authorization code was refreshed."),
    opt("containerVersionId", Str, "Container version this environment points to."),
    opt("workspaceId", Str, "Workspace this environment points to."),
    TAG_MANAGER_URL,
];

pub const USER_PERMISSION: &[Field] = &[
    opt("path", Str, "GTM user permission's API relative path."),
    ACCOUNT_ID,
    req("emailAddress", Str, "User's email address."),
    opt("accountAccess", Object, "GTM account access permissions."),
    opt("containerAccess", ObjectArray, "GTM container access permissions."),
];

pub const CONTAINER_VERSION: &[Field] = &[
    opt("path", Str, "GTM container version's API relative path."),
    ACCOUNT_ID,
    CONTAINER_ID,
    opt("containerVersionId", Str, "The Container Version ID uniquely identifies the version."),
    opt("name", Str, "Container version display name."),
    opt("deleted", Boolean, "Whether this version has been deleted."),
    opt("description", Str, "Container version description."),
    opt("container", Object, "The container this version was taken from."),
    opt("tag", ObjectArray, "Tags in the container this version was taken from."),
    opt("trigger", ObjectArray, "Triggers in the container this version was taken from."),
    opt("variable", ObjectArray, "Variables in the container this version was taken from."),
    opt("folder", ObjectArray, "Folders in the container this version was taken from."),
    opt("builtInVariable", ObjectArray, "Built-in variables in the container this version was taken from."),
    FINGERPRINT,
    TAG_MANAGER_URL,
    opt("zone", ObjectArray, "Zones in the container this version was taken from."),
    opt("customTemplate", ObjectArray, "Custom templates in the container this version was taken from."),
    opt("client", ObjectArray, "Clients in the container this version was taken from."),
    opt("gtagConfig", ObjectArray, "Google tag configs in the container this version was taken from."),
    opt("transformation", ObjectArray, "Transformations in the container this version was taken from."),
];

/// Render a field table as a JSON Schema object, skipping `omit`.
pub fn object_schema(fields: &[Field], omit: &[&str], description: &str) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields.iter().filter(|f| !omit.contains(&f.name)) {
        let mut schema = field.kind.schema();
        if let Value::Object(map) = &mut schema {
            map.insert("description".into(), Value::String(field.description.into()));
        }
        properties.insert(field.name.to_string(), schema);
        if field.required {
            required.push(Value::String(field.name.to_string()));
        }
    }

    let mut schema = json!({
        "type": "object",
        "description": description,
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Remove path fields from a submitted config before it becomes a body.
pub fn strip_path_fields(mut config: Map<String, Value>, path_fields: &[&str]) -> Map<String, Value> {
    for field in path_fields {
        config.remove(*field);
    }
    config
}
