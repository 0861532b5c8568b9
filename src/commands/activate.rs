use super::{confirmed, load_spec_file};
use crate::context::Context;
use crate::services::Session;
use crate::traits::ServiceStatus;
use anyhow::{Context as AnyhowContext, Result, bail};
use std::path::Path;
use tracing::info;

/// Handles the 'activate' command - builds and sends a new service specification
pub struct ActivateCommand;

impl ActivateCommand {
    pub fn execute(ctx: &Context, service: &str, file: Option<&Path>, yes: bool) -> Result<()> {
        let manager = ctx.registry.get(service)?;
        let backend = ctx.backend()?;

        let details = backend
            .get_details(service)
            .with_context(|| format!("Failed to get {} details", manager.readable_name()))?;
        if matches!(details.status, ServiceStatus::Active | ServiceStatus::Pending) {
            bail!(
                "{} is already {}. Use 'update' to change its configuration",
                manager.readable_name(),
                details.status
            );
        }

        ctx.output
            .section(&format!("Activate {}", manager.readable_name()));

        let spec = match file {
            Some(path) => {
                ctx.output
                    .info(&format!("Reading specification from {}", path.display()));
                load_spec_file(path)?
            }
            None => {
                let session = Session::new(&*ctx.input, &*backend);
                manager.build_activate_request(&session).with_context(|| {
                    format!("Failed to build {} specification", manager.readable_name())
                })?
            }
        };

        manager
            .validate_spec(&spec)
            .with_context(|| format!("Invalid {} specification", manager.readable_name()))?;

        let prompt = format!("Do you want to activate {}?", manager.readable_name());
        if !confirmed(ctx, yes, &prompt)? {
            ctx.output.warning("Activation cancelled");
            return Ok(());
        }

        info!(service, "activating integrated service");
        backend
            .activate(service, &spec)
            .with_context(|| format!("Failed to activate {}", manager.readable_name()))?;

        ctx.output
            .success(&format!("{} activation requested", manager.readable_name()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{
        BackendCall, MockBackend, MockOutput, MockResponse, MockUserInput, OutputMessage,
        ServiceDetails,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn context(
        input: MockUserInput,
        backend: MockBackend,
    ) -> (Context, Arc<MockBackend>, Arc<MockOutput>) {
        let backend = Arc::new(backend);
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(Arc::new(input), output.clone(), backend.clone());
        (ctx, backend, output)
    }

    #[test]
    fn test_activate_interactively() {
        // 5 prompts for the logging service plus the final confirmation
        let (ctx, backend, output) =
            context(MockUserInput::accepting_defaults(6), MockBackend::new());

        ActivateCommand::execute(&ctx, "logging", None, false).unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let BackendCall::Activate(service, spec) = &calls[0] else {
            panic!("expected an activate call");
        };
        assert_eq!(service, "logging");
        assert_eq!(spec["logging"], json!({"metrics": true, "tls": true}));
        assert!(output.has_success());
    }

    #[test]
    fn test_activate_declined() {
        let mut responses = vec![MockResponse::Default; 5];
        responses.push(MockResponse::Confirm(false));
        let (ctx, backend, _output) =
            context(MockUserInput::with_responses(responses), MockBackend::new());

        ActivateCommand::execute(&ctx, "logging", None, false).unwrap();

        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_activate_refuses_active_service() {
        let details = ServiceDetails {
            status: ServiceStatus::Active,
            ..ServiceDetails::inactive()
        };
        let (ctx, backend, _output) = context(
            MockUserInput::new(),
            MockBackend::new().with_details("monitoring", details),
        );

        let err = ActivateCommand::execute(&ctx, "monitoring", None, true).unwrap_err();

        assert!(err.to_string().contains("already ACTIVE"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_activate_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"loki": {"enabled": true, "ingress": {"enabled": true, "path": "/loki"}}}"#,
        )
        .unwrap();
        let (ctx, backend, output) = context(MockUserInput::new(), MockBackend::new());

        let err = ActivateCommand::execute(&ctx, "logging", Some(file.path()), true).unwrap_err();

        assert!(err.to_string().contains("Invalid Logging specification"));
        assert!(output.contains_message(&OutputMessage::Info(format!(
            "Reading specification from {}",
            file.path().display()
        ))));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_activate_unknown_service() {
        let (ctx, _backend, _output) = context(MockUserInput::new(), MockBackend::new());
        let err = ActivateCommand::execute(&ctx, "backup", None, true).unwrap_err();
        assert!(err.to_string().contains("Supported services: logging, monitoring"));
    }
}
