//! Google Tag Manager v2 REST client
//!
//! A deliberately small client: the MCP layer decides *which* call to make
//! and builds an [`ApiRequest`]; this crate authorises it and performs the
//! single HTTP exchange.
//!
//! ```text
//! [ gtm-mcp handler ] --ApiRequest--> [ TagManagerClient ] --> [ Transport ]
//!                                           ^                      |
//!                       ClientProvider -----+               HTTPS + bearer
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod request;

pub use auth::{Credentials, Scope};
pub use client::{ClientProvider, TagManagerClient, Transport};
pub use error::{ApiError, Result};
pub use http::{DEFAULT_BASE_URL, GoogleClientProvider, HttpTransport};
pub use request::{ApiRequest, Method};
