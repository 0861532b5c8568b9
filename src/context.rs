use crate::config::Settings;
use crate::services::ServiceRegistry;
use crate::traits::{
    BackendClient, HttpBackendClient, InquireUserInput, Output, TerminalOutput, UserInput,
};
#[cfg(test)]
use crate::traits::{MockBackend, MockOutput, MockUserInput};
use anyhow::Result;
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub registry: Arc<ServiceRegistry>,
    settings: Settings,
    /// Injected backend; built from `settings` on first use when absent
    backend: Option<Arc<dyn BackendClient>>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new(settings: Settings) -> Self {
        Self {
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
            registry: Arc::new(ServiceRegistry::with_defaults()),
            settings,
            backend: None,
        }
    }

    /// Backend client for the configured organization and cluster.
    ///
    /// Fails when the connection settings are incomplete, so commands that
    /// never talk to the backend work without them.
    pub fn backend(&self) -> Result<Arc<dyn BackendClient>> {
        match &self.backend {
            Some(backend) => Ok(Arc::clone(backend)),
            None => Ok(Arc::new(HttpBackendClient::new(self.settings.backend()?))),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        input: Arc<MockUserInput>,
        output: Arc<MockOutput>,
        backend: Arc<MockBackend>,
    ) -> Self {
        Self {
            input,
            output,
            registry: Arc::new(ServiceRegistry::with_defaults()),
            settings: Settings::default(),
            backend: Some(backend as Arc<dyn BackendClient>),
        }
    }
}
