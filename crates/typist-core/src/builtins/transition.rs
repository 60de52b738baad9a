//! `to` command - character-by-character transition

use super::text::FROM_KEY;
use crate::command::{text_arg, ArgumentKind, Command, CommandDefinition, Context};
use crate::error::Result;
use serde_json::Value;
use tracing::{debug, warn};

/// Successive texts shown while moving from `from` to `to`.
///
/// - `from` a strict prefix of `to`: the tail is typed after the prefix.
/// - `from` a strict suffix of `to`: the head is typed backwards in front
///   of the suffix.
/// - otherwise (or no `from`): `to` is retyped from empty.
///
/// The last frame is always `to`. Equal strings and an empty `to` give a
/// single frame.
#[must_use]
pub fn plan_transition(from: Option<&str>, to: &str) -> Vec<String> {
    let from = from.unwrap_or("");
    if from == to || to.is_empty() {
        return vec![to.to_string()];
    }

    if !from.is_empty() && from.len() < to.len() {
        if let Some(tail) = to.strip_prefix(from) {
            let mut frame = from.to_string();
            return tail
                .chars()
                .map(|c| {
                    frame.push(c);
                    frame.clone()
                })
                .collect();
        }
        if let Some(head) = to.strip_suffix(from) {
            let head: Vec<char> = head.chars().collect();
            return (1..=head.len())
                .map(|n| {
                    let mut frame: String = head[head.len() - n..].iter().collect();
                    frame.push_str(from);
                    frame
                })
                .collect();
        }
    }

    let mut frame = String::with_capacity(to.len());
    to.chars()
        .map(|c| {
            frame.push(c);
            frame.clone()
        })
        .collect()
}

/// Animate from the last `from` value to the argument
pub struct ToCommand {
    definition: CommandDefinition,
}

impl ToCommand {
    /// Create the to command
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: CommandDefinition::new(
                "to",
                "Type from the last `from` value to this value",
            )
            .with_argument(ArgumentKind::Text),
        }
    }
}

impl Default for ToCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Command for ToCommand {
    fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    async fn execute(&self, argument: &Value, ctx: &Context) -> Result<()> {
        let to = text_arg("to", argument)?;
        let from = ctx.state().get(FROM_KEY);
        if from.is_none() {
            warn!(to = %to, "`to` without a preceding `from`, retyping from empty");
        }
        debug!(from = ?from, to = %to, "Transition");

        if from.as_deref() == Some(to) {
            return ctx.set_text(to);
        }

        let delay = ctx.options().step_delay();
        for frame in plan_transition(from.as_deref(), to) {
            ctx.set_text(&frame)?;
            ctx.sleep(delay).await?;
        }
        Ok(())
    }
}
