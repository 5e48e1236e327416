//! The `action` discriminator shared by all dispatcher tools

use std::fmt;

/// Every action any dispatcher accepts. Each resource family accepts a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Get,
    List,
    Update,
    Remove,
    Revert,
    Entities,
    MoveEntitiesToFolder,
    Reauthorize,
    Link,
    Unlink,
    Live,
    Publish,
    SetLatest,
    Undelete,
    Latest,
    Combine,
    Lookup,
    MoveTagId,
    Snippet,
    CreateVersion,
    GetStatus,
    Sync,
    QuickPreview,
    ResolveConflict,
}

impl Action {
    pub const ALL: &'static [Action] = &[
        Self::Create,
        Self::Get,
        Self::List,
        Self::Update,
        Self::Remove,
        Self::Revert,
        Self::Entities,
        Self::MoveEntitiesToFolder,
        Self::Reauthorize,
        Self::Link,
        Self::Unlink,
        Self::Live,
        Self::Publish,
        Self::SetLatest,
        Self::Undelete,
        Self::Latest,
        Self::Combine,
        Self::Lookup,
        Self::MoveTagId,
        Self::Snippet,
        Self::CreateVersion,
        Self::GetStatus,
        Self::Sync,
        Self::QuickPreview,
        Self::ResolveConflict,
    ];

    /// Name as it appears in the `action` argument
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::List => "list",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Revert => "revert",
            Self::Entities => "entities",
            Self::MoveEntitiesToFolder => "moveEntitiesToFolder",
            Self::Reauthorize => "reauthorize",
            Self::Link => "link",
            Self::Unlink => "unlink",
            Self::Live => "live",
            Self::Publish => "publish",
            Self::SetLatest => "setLatest",
            Self::Undelete => "undelete",
            Self::Latest => "latest",
            Self::Combine => "combine",
            Self::Lookup => "lookup",
            Self::MoveTagId => "moveTagId",
            Self::Snippet => "snippet",
            Self::CreateVersion => "createVersion",
            Self::GetStatus => "getStatus",
            Self::Sync => "sync",
            Self::QuickPreview => "quickPreview",
            Self::ResolveConflict => "resolveConflict",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.as_str() == name)
    }

    /// Reads leave the remote state untouched
    pub fn is_read(self) -> bool {
        matches!(
            self,
            Self::Get
                | Self::List
                | Self::Entities
                | Self::Live
                | Self::Latest
                | Self::Lookup
                | Self::Snippet
                | Self::GetStatus
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
