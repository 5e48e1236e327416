//! API client handle and the seams around it
//!
//! [`TagManagerClient`] is what a tool handler holds for the duration of one
//! call. It delegates the actual exchange to a [`Transport`], which keeps
//! handlers testable without a network. A [`ClientProvider`] produces a fresh
//! client for each invocation from a set of credentials and scopes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{Credentials, Scope};
use crate::error::Result;
use crate::request::ApiRequest;

/// Performs one HTTP exchange with the Tag Manager API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the decoded body, or `None` when the
    /// API answers with an empty body (deletes, some POST verbs).
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>>;
}

/// Produces ready-to-use API clients
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Build a client authorised for `scopes`.
    ///
    /// Credential failures are returned as-is; nothing is retried or cached.
    async fn client(&self, credentials: &Credentials, scopes: &[Scope])
        -> Result<TagManagerClient>;
}

/// Handle bound to the Tag Manager v2 API
#[derive(Clone)]
pub struct TagManagerClient {
    transport: Arc<dyn Transport>,
}

impl TagManagerClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute a single API call
    pub async fn execute(&self, request: ApiRequest) -> Result<Option<Value>> {
        tracing::debug!(method = %request.method, path = %request.path, "Tag Manager API call");
        self.transport.execute(request).await
    }
}

impl std::fmt::Debug for TagManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagManagerClient").finish_non_exhaustive()
    }
}
