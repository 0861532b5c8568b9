//! Pluggable integrated services.
//!
//! Every service implements [`ServiceManager`]; commands look managers up in the
//! [`ServiceRegistry`] by kind and drive them without knowing the concrete service.

pub mod ingress;
pub mod logging;
pub mod monitoring;
mod output;
mod registry;
pub mod schema;

pub use output::{BaseOutput, ingress_secret};
pub use registry::ServiceRegistry;

use crate::codec::Document;
use crate::secrets::SecretResolver;
use crate::table::DisplayTable;
use crate::traits::{BackendClient, ServiceDetails, UserInput};
use anyhow::Result;

/// Everything an interactive build needs: the prompt primitive and credential lookup
pub struct Session<'a> {
    pub input: &'a dyn UserInput,
    pub secrets: SecretResolver<'a>,
}

impl<'a> Session<'a> {
    pub fn new(input: &'a dyn UserInput, backend: &'a dyn BackendClient) -> Self {
        Self {
            input,
            secrets: SecretResolver::new(backend, input),
        }
    }
}

/// Capability set shared by every integrated service
pub trait ServiceManager: Send + Sync {
    /// Name shown to the operator (e.g., "Monitoring")
    fn readable_name(&self) -> &'static str;

    /// Kind identifier used by the backend (e.g., "monitoring")
    fn service_name(&self) -> &'static str;

    /// Build a fresh specification, offering the service's baseline as defaults
    fn build_activate_request(&self, session: &Session<'_>) -> Result<Document>;

    /// Re-ask every question using the stored specification as defaults.
    ///
    /// Only the keys this service's schema declares are rewritten; any other key
    /// of `spec`, at any depth, is left untouched.
    fn build_update_request(&self, session: &Session<'_>, spec: &mut Document) -> Result<()>;

    /// Check a document before it is sent to the backend
    fn validate_spec(&self, spec: &Document) -> Result<()>;

    /// Summarize the live state of the service
    fn write_details_table(&self, details: &ServiceDetails) -> DisplayTable;
}
