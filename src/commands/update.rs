use super::{confirmed, load_spec_file};
use crate::context::Context;
use crate::services::Session;
use crate::traits::ServiceStatus;
use anyhow::{Context as AnyhowContext, Result, bail};
use std::path::Path;
use tracing::info;

/// Handles the 'update' command - re-configures an active service
pub struct UpdateCommand;

impl UpdateCommand {
    pub fn execute(ctx: &Context, service: &str, file: Option<&Path>, yes: bool) -> Result<()> {
        let manager = ctx.registry.get(service)?;
        let backend = ctx.backend()?;

        let details = backend
            .get_details(service)
            .with_context(|| format!("Failed to get {} details", manager.readable_name()))?;
        if details.status != ServiceStatus::Active {
            bail!(
                "{} is {}; only active services can be updated",
                manager.readable_name(),
                details.status
            );
        }

        ctx.output
            .section(&format!("Update {}", manager.readable_name()));

        let spec = match file {
            Some(path) => {
                ctx.output
                    .info(&format!("Reading specification from {}", path.display()));
                load_spec_file(path)?
            }
            None => {
                let mut spec = details.spec;
                let session = Session::new(&*ctx.input, &*backend);
                manager
                    .build_update_request(&session, &mut spec)
                    .with_context(|| {
                        format!("Failed to build {} specification", manager.readable_name())
                    })?;
                spec
            }
        };

        manager
            .validate_spec(&spec)
            .with_context(|| format!("Invalid {} specification", manager.readable_name()))?;

        let prompt = format!("Do you want to update {}?", manager.readable_name());
        if !confirmed(ctx, yes, &prompt)? {
            ctx.output.warning("Update cancelled");
            return Ok(());
        }

        info!(service, "updating integrated service");
        backend
            .update(service, &spec)
            .with_context(|| format!("Failed to update {}", manager.readable_name()))?;

        ctx.output
            .success(&format!("{} update requested", manager.readable_name()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, service_error};
    use crate::traits::{BackendCall, MockBackend, MockOutput, MockUserInput, ServiceDetails};
    use serde_json::json;
    use std::sync::Arc;

    fn active(spec: serde_json::Value) -> ServiceDetails {
        ServiceDetails {
            status: ServiceStatus::Active,
            spec: spec.as_object().cloned().unwrap_or_default(),
            output: Default::default(),
        }
    }

    fn context(input: MockUserInput, backend: Arc<MockBackend>) -> Context {
        Context::test_with(Arc::new(input), Arc::new(MockOutput::new()), backend)
    }

    #[test]
    fn test_update_keeps_unrelated_keys() {
        let stored = json!({
            "logging": {"metrics": true, "tls": false},
            "loki": {"enabled": false},
            "clusterOutput": {"enabled": false},
            "annotations": {"team": "platform"}
        });
        let backend = Arc::new(MockBackend::new().with_details("logging", active(stored.clone())));
        let ctx = context(MockUserInput::accepting_defaults(4), backend.clone());

        UpdateCommand::execute(&ctx, "logging", None, true).unwrap();

        assert_eq!(
            backend.calls(),
            vec![BackendCall::Update(
                "logging".to_string(),
                stored.as_object().cloned().unwrap()
            )]
        );
    }

    #[test]
    fn test_update_requires_active_service() {
        let backend = Arc::new(MockBackend::new());
        let ctx = context(MockUserInput::new(), backend.clone());

        let err = UpdateCommand::execute(&ctx, "monitoring", None, true).unwrap_err();

        assert!(err.to_string().contains("INACTIVE"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_update_with_malformed_stored_spec() {
        let backend = Arc::new(
            MockBackend::new().with_details("monitoring", active(json!({"grafana": {"enabled": 1}}))),
        );
        let ctx = context(MockUserInput::new(), backend.clone());

        let err = UpdateCommand::execute(&ctx, "monitoring", None, true).unwrap_err();

        assert!(matches!(
            service_error(&err),
            Some(ServiceError::SchemaMismatch { path, .. }) if path == "grafana.enabled"
        ));
        assert!(backend.calls().is_empty());
    }
}
