pub mod activate;
pub mod get;
pub mod list;
pub mod update;
pub mod validate;

pub use activate::ActivateCommand;
pub use get::GetCommand;
pub use list::ListCommand;
pub use update::UpdateCommand;
pub use validate::ValidateCommand;

use crate::codec::Document;
use crate::context::Context;
use crate::question::ask_confirm;
use anyhow::{Context as AnyhowContext, Result, bail};
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// Read a service specification from a JSON or YAML file.
///
/// A document of the form `{spec: {...}}` is unwrapped to its inner object.
pub fn load_spec_file(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read specification file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: Value = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))?
    };

    let Value::Object(mut document) = value else {
        bail!(
            "Specification in {} must be an object",
            path.display()
        );
    };

    if document.len() == 1 {
        if let Some(Value::Object(inner)) = document.remove("spec") {
            return Ok(inner);
        }
    }
    Ok(document)
}

/// Run `command`, showing a failure to the operator with its whole cause chain
pub fn report<F>(ctx: &Context, command: F) -> ExitCode
where
    F: FnOnce(&Context) -> Result<()>,
{
    match command(ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "command failed");
            ctx.output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Ask before sending unless `yes` was given
fn confirmed(ctx: &Context, yes: bool, message: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(ask_confirm(&*ctx.input, message, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockBackend, MockOutput, MockUserInput};
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;

    fn spec_file(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(extension)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_spec() {
        let file = spec_file(".yaml", "grafana:\n  enabled: true\n");
        let document = load_spec_file(file.path()).unwrap();
        assert_eq!(Value::Object(document), json!({"grafana": {"enabled": true}}));
    }

    #[test]
    fn test_load_json_spec_unwraps_request() {
        let file = spec_file(".json", r#"{"spec": {"loki": {"enabled": false}}}"#);
        let document = load_spec_file(file.path()).unwrap();
        assert_eq!(Value::Object(document), json!({"loki": {"enabled": false}}));
    }

    #[test]
    fn test_load_spec_rejects_non_object() {
        let file = spec_file(".yaml", "- one\n- two\n");
        assert!(load_spec_file(file.path()).is_err());
    }

    #[test]
    fn test_report_shows_failure_chain() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockUserInput::new()),
            output.clone(),
            Arc::new(MockBackend::new()),
        );

        let code = report(&ctx, |ctx| {
            ctx.registry.get("backup")?;
            Ok(())
        });

        assert_eq!(code, ExitCode::FAILURE);
        let errors = output.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unknown service: backup"));
    }

    #[test]
    fn test_report_success_is_silent() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockUserInput::new()),
            output.clone(),
            Arc::new(MockBackend::new()),
        );

        assert_eq!(report(&ctx, |_| Ok(())), ExitCode::SUCCESS);
        assert!(output.errors().is_empty());
    }

    #[test]
    fn test_load_missing_spec_file() {
        let err = load_spec_file(Path::new("/nonexistent/spec.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read specification file"));
    }
}
