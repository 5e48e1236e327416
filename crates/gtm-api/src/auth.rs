//! OAuth scopes and credential sources
//!
//! The server never runs an OAuth flow itself. It either holds a
//! service-account key / application-default credentials (stdio
//! deployments) or receives an already-issued bearer token per request
//! (hosted deployments).

use std::fmt;
use std::path::PathBuf;

/// Tag Manager OAuth scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Readonly,
    EditContainers,
    EditContainerVersions,
    DeleteContainers,
    ManageAccounts,
    ManageUsers,
    Publish,
}

impl Scope {
    /// Full scope URL as expected by Google's token endpoint
    pub fn url(self) -> &'static str {
        match self {
            Self::Readonly => "https://www.googleapis.com/auth/tagmanager.readonly",
            Self::EditContainers => "https://www.googleapis.com/auth/tagmanager.edit.containers",
            Self::EditContainerVersions => {
                "https://www.googleapis.com/auth/tagmanager.edit.containerversions"
            }
            Self::DeleteContainers => {
                "https://www.googleapis.com/auth/tagmanager.delete.containers"
            }
            Self::ManageAccounts => "https://www.googleapis.com/auth/tagmanager.manage.accounts",
            Self::ManageUsers => "https://www.googleapis.com/auth/tagmanager.manage.users",
            Self::Publish => "https://www.googleapis.com/auth/tagmanager.publish",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Where the access token for a call comes from
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Service-account JSON key file
    ServiceAccountKey(PathBuf),
    /// Google application-default credentials (env, gcloud, metadata server)
    ApplicationDefault,
    /// Bearer token issued elsewhere and handed to us per request
    AccessToken(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceAccountKey(path) => {
                f.debug_tuple("ServiceAccountKey").field(path).finish()
            }
            Self::ApplicationDefault => f.write_str("ApplicationDefault"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_urls_share_tagmanager_prefix() {
        let all = [
            Scope::Readonly,
            Scope::EditContainers,
            Scope::EditContainerVersions,
            Scope::DeleteContainers,
            Scope::ManageAccounts,
            Scope::ManageUsers,
            Scope::Publish,
        ];
        for scope in all {
            assert!(
                scope
                    .url()
                    .starts_with("https://www.googleapis.com/auth/tagmanager."),
                "{scope:?}"
            );
        }
    }

    #[test]
    fn access_token_is_not_printed() {
        let creds = Credentials::AccessToken("ya29.secret".to_string());
        assert_eq!(format!("{creds:?}"), "AccessToken(<redacted>)");
    }
}
