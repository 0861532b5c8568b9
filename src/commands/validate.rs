use super::load_spec_file;
use crate::context::Context;
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;

/// Handles the 'validate' command - checks a specification file offline
pub struct ValidateCommand;

impl ValidateCommand {
    pub fn execute(ctx: &Context, service: &str, file: &Path) -> Result<()> {
        let manager = ctx.registry.get(service)?;
        let spec = load_spec_file(file)?;

        manager
            .validate_spec(&spec)
            .with_context(|| format!("Invalid {} specification", manager.readable_name()))?;

        ctx.output.success(&format!(
            "{} is a valid {} specification",
            file.display(),
            manager.readable_name()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, service_error};
    use crate::traits::{MockBackend, MockOutput, MockUserInput};
    use std::io::Write;
    use std::sync::Arc;

    fn context(output: Arc<MockOutput>) -> Context {
        Context::test_with(
            Arc::new(MockUserInput::new()),
            output,
            Arc::new(MockBackend::new()),
        )
    }

    fn spec_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_monitoring_file() {
        let file = spec_file(
            "grafana:\n  enabled: true\n  ingress:\n    enabled: true\n    path: /grafana\nprometheus:\n  enabled: false\n",
        );
        let output = Arc::new(MockOutput::new());

        ValidateCommand::execute(&context(output.clone()), "monitoring", file.path()).unwrap();

        assert!(output.has_success());
    }

    #[test]
    fn test_invalid_retention() {
        let file = spec_file(
            "prometheus:\n  enabled: true\n  storage:\n    size: 10\n    retention: soon\n",
        );
        let output = Arc::new(MockOutput::new());

        let err = ValidateCommand::execute(&context(output.clone()), "monitoring", file.path())
            .unwrap_err();

        assert!(matches!(
            service_error(&err),
            Some(ServiceError::Validation(_))
        ));
        assert!(!output.has_success());
    }

    #[test]
    fn test_type_mismatch_names_the_field() {
        let file = spec_file("loki:\n  enabled: maybe\n");
        let err = ValidateCommand::execute(
            &context(Arc::new(MockOutput::new())),
            "logging",
            file.path(),
        )
        .unwrap_err();

        assert_eq!(
            service_error(&err),
            Some(&ServiceError::SchemaMismatch {
                path: "loki.enabled".to_string(),
                expected: "boolean",
                found: "string".to_string(),
            })
        );
    }
}
