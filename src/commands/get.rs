use crate::context::Context;
use anyhow::{Context as AnyhowContext, Result};

/// Handles the 'get' command - shows the live state of a service
pub struct GetCommand;

impl GetCommand {
    pub fn execute(ctx: &Context, service: &str) -> Result<()> {
        let manager = ctx.registry.get(service)?;
        let details = ctx
            .backend()?
            .get_details(service)
            .with_context(|| format!("Failed to get {} details", manager.readable_name()))?;

        manager.write_details_table(&details).write_to(&*ctx.output);
        Ok(())
    }
}
