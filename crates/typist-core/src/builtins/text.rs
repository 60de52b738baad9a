//! `text` and `from` commands

use crate::command::{text_arg, ArgumentKind, Command, CommandDefinition, Context};
use crate::error::Result;
use serde_json::Value;

/// Run state key holding the last `from` value
pub const FROM_KEY: &str = "from";

/// Replace the visible text
pub struct TextCommand {
    definition: CommandDefinition,
}

impl TextCommand {
    /// Create the text command
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: CommandDefinition::new("text", "Replace the visible text")
                .with_argument(ArgumentKind::Text),
        }
    }
}

impl Default for TextCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Command for TextCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    async fn execute(&self, argument: &Value, ctx: &Context) -> Result<()> {
        ctx.set_text(text_arg("text", argument)?)
    }
}

/// Replace the visible text and remember it as the start of the next `to`
pub struct FromCommand {
    definition: CommandDefinition,
}

impl FromCommand {
    /// Create the from command
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: CommandDefinition::new(
                "from",
                "Replace the visible text and mark it as the transition source",
            )
            .with_argument(ArgumentKind::Text),
        }
    }
}

impl Default for FromCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Command for FromCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    async fn execute(&self, argument: &Value, ctx: &Context) -> Result<()> {
        let text = text_arg("from", argument)?;
        ctx.set_text(text)?;
        ctx.state().set(FROM_KEY, text);
        Ok(())
    }
}
