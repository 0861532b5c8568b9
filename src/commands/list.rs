use crate::context::Context;
use anyhow::Result;

/// Handles the 'list' command - shows the registered integrated services
pub struct ListCommand;

impl ListCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        ctx.output.section("Integrated services");
        for name in ctx.registry.supported_services() {
            let manager = ctx.registry.get(name)?;
            ctx.output.key_value(name, manager.readable_name());
        }
        ctx.output.blank();
        ctx.output
            .dimmed("Use 'isvc get <service>' to show the state of a service");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockBackend, MockOutput, MockUserInput, OutputMessage};
    use std::sync::Arc;

    #[test]
    fn test_list_shows_every_service() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockUserInput::new()),
            output.clone(),
            Arc::new(MockBackend::new()),
        );

        ListCommand::execute(&ctx).unwrap();

        assert!(output.contains_message(&OutputMessage::KeyValue(
            "logging".to_string(),
            "Logging".to_string()
        )));
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "monitoring".to_string(),
            "Monitoring".to_string()
        )));
    }
}
