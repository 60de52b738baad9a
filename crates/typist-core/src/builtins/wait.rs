//! `wait` command

use crate::command::{duration_arg, ArgumentKind, Command, CommandDefinition, Context};
use crate::error::Result;
use serde_json::Value;
use tracing::trace;

/// Name of the wait command; the interpreter skips its own step delay
/// before it
pub const WAIT: &str = "wait";

/// Pause for the given number of milliseconds
pub struct WaitCommand {
    definition: CommandDefinition,
}

impl WaitCommand {
    /// Create the wait command
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: CommandDefinition::new(WAIT, "Pause for a number of milliseconds")
                .with_argument(ArgumentKind::Duration),
        }
    }
}

impl Default for WaitCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Command for WaitCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    async fn execute(&self, argument: &Value, ctx: &Context) -> Result<()> {
        let duration = duration_arg(WAIT, argument)?;
        trace!(ms = duration.as_millis() as u64, "Waiting");
        ctx.sleep(duration).await
    }
}
