//! Shared test utilities for the GTM MCP workspace.
//!
//! Dev-dependency only. Provides a stub upstream so dispatcher tests can
//! assert how many Tag Manager calls were attempted, and with what request,
//! without touching the network.
//!
//! # Example
//!
//! ```rust,no_run
//! use gtm_test_utils::StubUpstream;
//! use serde_json::json;
//!
//! let upstream = StubUpstream::new();
//! upstream.respond_json(json!({ "account": [] }));
//! let provider = upstream.provider();
//! // hand `provider` to the server, make a call, then:
//! assert_eq!(upstream.call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use gtm_api::{
    ApiError, ApiRequest, ClientProvider, Credentials, Scope, TagManagerClient, Transport,
};
use serde_json::Value;

type Reply = Result<Option<Value>, ApiError>;

#[derive(Default)]
struct State {
    replies: VecDeque<Reply>,
    calls: Vec<ApiRequest>,
    client_requests: Vec<(Credentials, Vec<Scope>)>,
    credentials_error: Option<String>,
}

/// Scripted stand-in for the Tag Manager API.
///
/// Replies are consumed in FIFO order; when the queue is empty every call
/// answers `{}`.
#[derive(Clone, Default)]
pub struct StubUpstream {
    state: Arc<Mutex<State>>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Queue a JSON body for the next call
    pub fn respond_json(&self, body: Value) -> &Self {
        self.lock().replies.push_back(Ok(Some(body)));
        self
    }

    /// Queue an empty body (e.g. a delete)
    pub fn respond_empty(&self) -> &Self {
        self.lock().replies.push_back(Ok(None));
        self
    }

    /// Queue a structured Google API error
    pub fn respond_remote_error(&self, code: u16, details: &str) -> &Self {
        self.lock().replies.push_back(Err(ApiError::Remote {
            code,
            details: details.to_string(),
        }));
        self
    }

    /// Queue an arbitrary error
    pub fn respond_error(&self, error: ApiError) -> &Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Make every subsequent client acquisition fail
    pub fn fail_credentials(&self, message: &str) -> &Self {
        self.lock().credentials_error = Some(message.to_string());
        self
    }

    /// Provider handing out clients bound to this stub
    pub fn provider(&self) -> Arc<dyn ClientProvider> {
        Arc::new(StubProvider {
            upstream: self.clone(),
        })
    }

    /// Every request the stub has received, in order
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// The single request received; panics unless exactly one was made
    pub fn only_call(&self) -> ApiRequest {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one upstream call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    /// Credentials and scopes of every client acquisition
    pub fn client_requests(&self) -> Vec<(Credentials, Vec<Scope>)> {
        self.lock().client_requests.clone()
    }
}

#[async_trait]
impl Transport for StubUpstream {
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let mut state = self.lock();
        state.calls.push(request);
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(Some(Value::Object(Default::default()))))
    }
}

struct StubProvider {
    upstream: StubUpstream,
}

#[async_trait]
impl ClientProvider for StubProvider {
    async fn client(
        &self,
        credentials: &Credentials,
        scopes: &[Scope],
    ) -> Result<TagManagerClient, ApiError> {
        let mut state = self.upstream.lock();
        state
            .client_requests
            .push((credentials.clone(), scopes.to_vec()));
        if let Some(message) = &state.credentials_error {
            return Err(ApiError::Credentials(message.clone()));
        }
        drop(state);
        Ok(TagManagerClient::new(Arc::new(self.upstream.clone())))
    }
}
