use super::SecretKind;
use crate::error::ServiceError;
use crate::question::{Question, SKIP, ask};
use crate::traits::{BackendClient, SecretItem, UserInput};
use std::collections::HashMap;
use tracing::debug;

/// Selectable secret names plus the lookup back to identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct SecretMenu {
    pub options: Vec<String>,
    pub default: Option<String>,
    ids: HashMap<String, String>,
}

impl SecretMenu {
    /// Build the menu from a backend listing.
    ///
    /// The default is the name of the first credential whose identifier equals
    /// `current`, falling back to "skip" when skipping is allowed. When two
    /// credentials share a name the last one listed wins the lookup.
    pub fn build(items: &[SecretItem], current: &str, allow_skip: bool) -> Self {
        let mut options = Vec::with_capacity(items.len() + 1);
        let mut ids = HashMap::with_capacity(items.len());
        let mut default = None;

        if allow_skip {
            options.push(SKIP.to_string());
        }
        for item in items {
            options.push(item.name.clone());
            ids.insert(item.name.clone(), item.id.clone());
            if default.is_none() && !current.is_empty() && item.id == current {
                default = Some(item.name.clone());
            }
        }
        if default.is_none() && allow_skip {
            default = Some(SKIP.to_string());
        }

        Self {
            options,
            default,
            ids,
        }
    }

    /// Identifier for a chosen name; "skip" maps to an empty identifier
    pub fn identifier(&self, name: &str) -> Option<String> {
        if name == SKIP && self.options.first().map(String::as_str) == Some(SKIP) {
            return Some(String::new());
        }
        self.ids.get(name).cloned()
    }
}

/// Lets the operator pick a stored credential by name
pub struct SecretResolver<'a> {
    backend: &'a dyn BackendClient,
    input: &'a dyn UserInput,
}

impl<'a> SecretResolver<'a> {
    pub fn new(backend: &'a dyn BackendClient, input: &'a dyn UserInput) -> Self {
        Self { backend, input }
    }

    /// Resolve a credential of `kind`, preselecting the one identified by `current`.
    ///
    /// Returns an empty identifier without prompting when no credential of the
    /// kind exists, or when the operator picks "skip".
    pub fn resolve(
        &self,
        kind: SecretKind,
        current: &str,
        allow_skip: bool,
    ) -> Result<String, ServiceError> {
        let items = self
            .backend
            .list_secrets(kind)
            .map_err(|e| ServiceError::SecretLookup {
                kind,
                message: format!("{:#}", e),
            })?;

        if items.is_empty() {
            debug!(kind = kind.as_str(), "no stored secrets of this kind");
            return Ok(String::new());
        }

        let menu = SecretMenu::build(&items, current, allow_skip);
        let mut chosen = String::new();
        ask(
            self.input,
            vec![Question::select(
                format!("Select {} secret:", kind.label()),
                menu.options.clone(),
                menu.default.clone().unwrap_or_default(),
                &mut chosen,
            )],
        )?;

        menu.identifier(&chosen)
            .ok_or_else(|| ServiceError::UnsupportedChoice {
                field: format!("{} secret", kind.label()),
                choice: chosen,
            })
    }
}
