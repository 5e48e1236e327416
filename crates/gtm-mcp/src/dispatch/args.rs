//! Typed access to a raw tool argument object
//!
//! Empty strings and `null` count as absent, so a client sending
//! `"tagId": ""` gets the same `tagId is required for get action` error as
//! one that omits the key.

use serde_json::{Map, Value};

use super::action::Action;
use crate::envelope::ToolFailure;

pub type ArgResult<T> = std::result::Result<T, ToolFailure>;

/// Check an id before it is spliced into a REST path.
///
/// Tag Manager ids are numeric or short codes like `G-ABC123`, so anything
/// beyond letters, digits, `-` and `_` is rejected rather than letting `/`,
/// `..`, `?` or `#` reshape the request URL.
pub fn path_safe_id(name: &str, id: String) -> ArgResult<String> {
    if id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(id)
    } else {
        Err(ToolFailure::generic(format!(
            "{name} must contain only letters, digits, '-' or '_'"
        )))
    }
}

pub struct Args<'a> {
    map: &'a Map<String, Value>,
    action: Action,
    /// Dotted prefix for nested objects, e.g. `combineConfig.`
    prefix: String,
}

impl<'a> Args<'a> {
    pub fn new(map: &'a Map<String, Value>, action: Action) -> Self {
        Self {
            map,
            action,
            prefix: String::new(),
        }
    }

    /// Reader over a nested object; missing keys are reported as `outer.key`
    pub fn nested(&self, key: &str, map: &'a Map<String, Value>) -> Args<'a> {
        Args {
            map,
            action: self.action,
            prefix: format!("{}{key}.", self.prefix),
        }
    }

    fn name(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&self, key: &str) -> ToolFailure {
        ToolFailure::missing(&self.name(key), self.action.as_str())
    }

    fn wrong_type(&self, key: &str, expected: &str) -> ToolFailure {
        ToolFailure::generic(format!("{} must be {expected}", self.name(key)))
    }

    pub fn opt_str(&self, key: &str) -> ArgResult<Option<String>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            // Numeric ids are common in hand-written calls
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.wrong_type(key, "a string")),
        }
    }

    pub fn str(&self, key: &str) -> ArgResult<String> {
        self.opt_str(key)?.ok_or_else(|| self.missing(key))
    }

    /// Required id that becomes a REST path segment
    pub fn id(&self, key: &str) -> ArgResult<String> {
        path_safe_id(&self.name(key), self.str(key)?)
    }

    pub fn opt_bool(&self, key: &str) -> ArgResult<Option<bool>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.wrong_type(key, "a boolean")),
        }
    }

    pub fn bool(&self, key: &str) -> ArgResult<bool> {
        self.opt_bool(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_str_list(&self, key: &str) -> ArgResult<Option<Vec<String>>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(self.wrong_type(key, "an array of strings")),
                })
                .collect::<ArgResult<Vec<_>>>()
                .map(Some),
            Some(_) => Err(self.wrong_type(key, "an array of strings")),
        }
    }

    pub fn str_list(&self, key: &str) -> ArgResult<Vec<String>> {
        self.opt_str_list(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_object(&self, key: &str) -> ArgResult<Option<&'a Map<String, Value>>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(self.wrong_type(key, "an object")),
        }
    }

    pub fn object(&self, key: &str) -> ArgResult<&'a Map<String, Value>> {
        self.opt_object(key)?.ok_or_else(|| self.missing(key))
    }
}
