//! Error types for gtm-api

use serde::Deserialize;

/// Result type for gtm-api operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the Tag Manager API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Structured error returned by the Tag Manager API
    #[error("Google API Error {code} - {details}")]
    Remote { code: u16, details: String },

    /// Non-2xx response whose body is not the Google error envelope
    #[error("unexpected response {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// Credential material is missing or unusable
    #[error("credentials error: {0}")]
    Credentials(String),

    /// The API base URL or a request path could not be joined
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<gcp_auth::Error> for ApiError {
    fn from(err: gcp_auth::Error) -> Self {
        Self::Credentials(err.to_string())
    }
}

/// Google API error envelope: `{"error": {"code": 404, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl ApiError {
    /// Decode a failed HTTP response into an [`ApiError`].
    ///
    /// Bodies in the Google error envelope keep their code and message
    /// verbatim. Anything else is reported with the raw status and body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<GoogleErrorEnvelope>(body) {
            Ok(envelope) => {
                let details = if envelope.error.message.is_empty() {
                    envelope.error.status.unwrap_or_default()
                } else {
                    envelope.error.message
                };
                Self::Remote {
                    code: envelope.error.code,
                    details,
                }
            }
            Err(_) => Self::UnexpectedResponse {
                status,
                body: body.trim().to_string(),
            },
        }
    }
}
