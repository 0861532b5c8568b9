//! Lookup of service managers by kind identifier.

use super::ServiceManager;
use super::logging::LoggingManager;
use super::monitoring::MonitoringManager;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available integrated services.
pub struct ServiceRegistry {
    managers: HashMap<String, Arc<dyn ServiceManager>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            managers: HashMap::new(),
        }
    }

    /// Create a registry with all built-in services.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MonitoringManager::new()));
        registry.register(Arc::new(LoggingManager::new()));
        registry
    }

    /// Register a manager under its own kind identifier
    pub fn register(&mut self, manager: Arc<dyn ServiceManager>) {
        self.managers
            .insert(manager.service_name().to_string(), manager);
    }

    /// Get a manager by kind identifier.
    pub fn get(&self, service: &str) -> Result<Arc<dyn ServiceManager>> {
        match self.managers.get(service) {
            Some(manager) => Ok(Arc::clone(manager)),
            None => anyhow::bail!(
                "Unknown service: {}. Supported services: {}",
                service,
                self.supported_services().join(", ")
            ),
        }
    }

    /// Sorted list of supported kind identifiers.
    pub fn supported_services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.managers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
