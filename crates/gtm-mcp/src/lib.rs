//! Google Tag Manager MCP Server
//!
//! Exposes the Tag Manager v2 API to MCP clients as tools: three account
//! tools plus one action-dispatcher tool per resource family.
//!
//! # Tool Categories
//!
//! ## Accounts
//! - `tag_manager_list_accounts`, `tag_manager_get_account`, `tag_manager_update_account`
//!
//! ## Dispatchers
//! - `gtm_container`, `gtm_workspace`, `gtm_destination`, `gtm_environment`,
//!   `gtm_version`, `gtm_version_header`, `gtm_user_permission`
//! - `gtm_tag`, `gtm_trigger`, `gtm_variable`, `gtm_template`,
//!   `gtm_transformation`, `gtm_client`, `gtm_zone`, `gtm_folder`,
//!   `gtm_gtag_config`, `gtm_built_in_variable`
//!
//! Every dispatcher takes an `action` argument and validates the fields that
//! action needs before it touches the network.

pub mod accounts;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod http;
pub mod protocol;
pub mod registry;
pub mod schemas;
pub mod server;
pub mod tools;

pub use config::{FileConfig, Overrides, ServerConfig, TransportKind};
pub use envelope::{ToolFailure, error_response};
pub use error::{Error, Result};
pub use handlers::{CallContext, handle_tool_call};
pub use registry::{ToolHandler, ToolRegistry};
pub use server::GtmMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult};
