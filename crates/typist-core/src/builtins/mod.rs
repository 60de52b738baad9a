//! Builtins - the standard command set
//!
//! - `wait`: pause for a number of milliseconds
//! - `text`, `from`: replace the visible text
//! - `to`: type from the last `from` value to a new value
//! - `addCursor`, `removeCursor`, `addAnimatedCursor`, `removeAnimatedCursor`:
//!   toggle cursor presentation

mod cursor;
mod text;
mod transition;
mod wait;

pub use cursor::CursorCommand;
pub use text::{FromCommand, TextCommand, FROM_KEY};
pub use transition::{plan_transition, ToCommand};
pub use wait::{WaitCommand, WAIT};

use crate::command::CommandRegistry;
use std::sync::Arc;

/// Register all built-in commands with the registry
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Arc::new(WaitCommand::new()));

    registry.register(Arc::new(TextCommand::new()));
    registry.register(Arc::new(FromCommand::new()));
    registry.register(Arc::new(ToCommand::new()));

    registry.register(Arc::new(CursorCommand::add_cursor()));
    registry.register(Arc::new(CursorCommand::remove_cursor()));
    registry.register(Arc::new(CursorCommand::add_animated_cursor()));
    registry.register(Arc::new(CursorCommand::remove_animated_cursor()));
}
