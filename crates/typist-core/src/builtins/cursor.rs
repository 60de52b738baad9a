//! Cursor toggling commands

use crate::command::{Command, CommandDefinition, Context};
use crate::error::Result;
use crate::style::{ANIMATED_CURSOR_CLASS, CURSOR_CLASS};
use serde_json::Value;

/// Add or remove one cursor class on the visible content
pub struct CursorCommand {
    definition: CommandDefinition,
    class: &'static str,
    add: bool,
}

impl CursorCommand {
    fn new(name: &str, description: &str, class: &'static str, add: bool) -> Self {
        Self {
            definition: CommandDefinition::new(name, description),
            class,
            add,
        }
    }

    /// `addCursor`
    #[must_use]
    pub fn add_cursor() -> Self {
        Self::new("addCursor", "Show a static cursor", CURSOR_CLASS, true)
    }

    /// `removeCursor`
    #[must_use]
    pub fn remove_cursor() -> Self {
        Self::new("removeCursor", "Hide the static cursor", CURSOR_CLASS, false)
    }

    /// `addAnimatedCursor`
    #[must_use]
    pub fn add_animated_cursor() -> Self {
        Self::new(
            "addAnimatedCursor",
            "Make the cursor blink",
            ANIMATED_CURSOR_CLASS,
            true,
        )
    }

    /// `removeAnimatedCursor`
    #[must_use]
    pub fn remove_animated_cursor() -> Self {
        Self::new(
            "removeAnimatedCursor",
            "Stop the cursor blinking",
            ANIMATED_CURSOR_CLASS,
            false,
        )
    }
}

#[async_trait::async_trait]
impl Command for CursorCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    async fn execute(&self, _argument: &Value, ctx: &Context) -> Result<()> {
        if self.add {
            ctx.add_class(self.class)
        } else {
            ctx.remove_class(self.class)
        }
    }
}
