//! Uniform failure results for tool calls
//!
//! Every per-call failure is classified into a [`ToolFailure`] at the point
//! where it happens and rendered as `"<prefix>: <detail>"` in an error
//! [`ToolResult`]. Nothing here is ever raised to the protocol layer.

use std::fmt;

use gtm_api::ApiError;

use crate::tools::ToolResult;

/// Why a single tool call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    /// Structured error returned by the Tag Manager API
    RemoteApi { code: u16, details: String },
    /// Local error with a readable message (validation, credentials, IO)
    Generic { message: String },
    /// Anything else, carried as its raw text
    Unknown { text: String },
}

impl ToolFailure {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// `"<field> is required for <action> action"`
    pub fn missing(field: &str, action: &str) -> Self {
        Self::generic(format!("{field} is required for {action} action"))
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteApi { code, details } => write!(f, "Google API Error {code} - {details}"),
            Self::Generic { message } => f.write_str(message),
            Self::Unknown { text } => f.write_str(text),
        }
    }
}

impl From<ApiError> for ToolFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Remote { code, details } => Self::RemoteApi { code, details },
            ApiError::UnexpectedResponse { status, body } if body.is_empty() => Self::Unknown {
                text: format!("HTTP {status}"),
            },
            ApiError::UnexpectedResponse { status, body } => Self::Unknown {
                text: format!("HTTP {status}: {body}"),
            },
            other => Self::Generic {
                message: other.to_string(),
            },
        }
    }
}

/// Build the error result for a failed tool call.
///
/// Without a failure the message is the bare prefix.
pub fn error_response(prefix: &str, failure: Option<&ToolFailure>) -> ToolResult {
    let message = match failure {
        Some(failure) => format!("{prefix}: {failure}"),
        None => prefix.to_string(),
    };
    tracing::warn!(message = %message, "Tool call failed");
    ToolResult::error(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_api_error_format() {
        let failure = ToolFailure::RemoteApi {
            code: 404,
            details: "Not Found".into(),
        };
        let result = error_response("Error performing get on GTM tag", Some(&failure));
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            Some("Error performing get on GTM tag: Google API Error 404 - Not Found")
        );
    }

    #[test]
    fn test_generic_error_format() {
        let result = error_response("Error listing accounts", Some(&ToolFailure::generic("boom")));
        assert_eq!(result.first_text(), Some("Error listing accounts: boom"));
    }

    #[test]
    fn test_unknown_error_format() {
        let failure = ToolFailure::Unknown { text: "x".into() };
        let result = error_response("Error listing accounts", Some(&failure));
        assert_eq!(result.first_text(), Some("Error listing accounts: x"));
    }

    #[test]
    fn test_missing_failure_uses_prefix() {
        let result = error_response("Error listing accounts", None);
        assert_eq!(result.first_text(), Some("Error listing accounts"));
    }

    #[test]
    fn test_api_error_classification() {
        let remote: ToolFailure = ApiError::Remote {
            code: 403,
            details: "Forbidden".into(),
        }
        .into();
        assert_eq!(
            remote,
            ToolFailure::RemoteApi {
                code: 403,
                details: "Forbidden".into()
            }
        );

        let unexpected: ToolFailure = ApiError::UnexpectedResponse {
            status: 502,
            body: "Bad Gateway".into(),
        }
        .into();
        assert_eq!(
            unexpected,
            ToolFailure::Unknown {
                text: "HTTP 502: Bad Gateway".into()
            }
        );

        let empty: ToolFailure = ApiError::from_response(503, "").into();
        assert_eq!(empty, ToolFailure::Unknown { text: "HTTP 503".into() });

        let creds: ToolFailure = ApiError::Credentials("no key".into()).into();
        assert!(matches!(creds, ToolFailure::Generic { .. }));
    }
}
