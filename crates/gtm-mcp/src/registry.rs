//! Tool registry
//!
//! Built once at startup from a fixed list of registration functions and
//! read-only afterwards. A registration that fails (for example by reusing
//! a tool name) aborts startup.

use std::collections::HashMap;

use crate::accounts::{self, AccountTool};
use crate::dispatch::{self, Resource};
use crate::tools::ToolDefinition;
use crate::{Error, Result};

/// What runs when a registered tool is called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHandler {
    Account(AccountTool),
    Dispatcher(Resource),
}

pub type Registration = fn(&mut ToolRegistry) -> Result<()>;

/// Every tool the server exposes
pub const REGISTRATIONS: &[Registration] = &[accounts::register, dispatch::register];

#[derive(Debug, Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    handlers: HashMap<String, ToolHandler>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every registration in [`REGISTRATIONS`] once.
    pub fn with_all_tools() -> Result<Self> {
        Self::from_registrations(REGISTRATIONS)
    }

    pub fn from_registrations(registrations: &[Registration]) -> Result<Self> {
        let mut registry = Self::new();
        for register in registrations {
            register(&mut registry)?;
        }
        tracing::debug!(tools = registry.len(), "Tool registry built");
        Ok(registry)
    }

    pub fn register(&mut self, definition: ToolDefinition, handler: ToolHandler) -> Result<()> {
        if self.handlers.contains_key(&definition.name) {
            return Err(Error::Registry(format!(
                "duplicate tool name: {}",
                definition.name
            )));
        }
        self.handlers.insert(definition.name.clone(), handler);
        self.definitions.push(definition);
        Ok(())
    }

    pub fn handler(&self, name: &str) -> Option<ToolHandler> {
        self.handlers.get(name).copied()
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_tools_registered() {
        let registry = ToolRegistry::with_all_tools().unwrap();
        assert_eq!(registry.len(), 3 + Resource::ALL.len());
        assert_eq!(
            registry.handler("gtm_tag"),
            Some(ToolHandler::Dispatcher(Resource::Tag))
        );
        assert_eq!(
            registry.handler("tag_manager_list_accounts"),
            Some(ToolHandler::Account(AccountTool::List))
        );
        assert!(registry.handler("gtm_nope").is_none());
    }

    #[test]
    fn test_duplicate_name_is_fatal() {
        fn twice(registry: &mut ToolRegistry) -> Result<()> {
            dispatch::register(registry)
        }
        let err = ToolRegistry::from_registrations(&[dispatch::register, twice]).unwrap_err();
        assert!(matches!(err, Error::Registry(_)));
        assert!(err.to_string().contains("duplicate tool name: gtm_container"));
    }

    #[test]
    fn test_register_rejects_reused_name() {
        let mut registry = ToolRegistry::new();
        let def = ToolDefinition {
            name: "gtm_tag".into(),
            description: String::new(),
            input_schema: json!({"type": "object"}),
        };
        registry
            .register(def.clone(), ToolHandler::Dispatcher(Resource::Tag))
            .unwrap();
        assert!(
            registry
                .register(def, ToolHandler::Dispatcher(Resource::Trigger))
                .is_err()
        );
        assert_eq!(registry.len(), 1);
    }
}
