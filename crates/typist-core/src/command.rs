//! Command - named behaviors that steps invoke
//!
//! Every step names a command. Commands are registered in a
//! [`CommandRegistry`] and receive the step argument plus a [`Context`]
//! giving access to the bound target, the options, the per-instance run
//! state and a cancellable sleep.

use crate::document::{self, SharedDocument};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shape of argument a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// Argument is ignored
    None,
    /// A string
    Text,
    /// A non-negative number of milliseconds
    Duration,
}

impl ArgumentKind {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text => "text",
            Self::Duration => "duration",
        }
    }

    /// Check `argument` against this kind
    pub fn check(&self, command: &str, argument: &Value) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Text => text_arg(command, argument).map(|_| ()),
            Self::Duration => duration_arg(command, argument).map(|_| ()),
        }
    }
}

impl std::fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Command metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Name steps refer to
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Accepted argument shape
    pub argument: ArgumentKind,
}

impl CommandDefinition {
    /// Create a definition taking no argument
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            argument: ArgumentKind::None,
        }
    }

    /// Set the argument shape
    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentKind) -> Self {
        self.argument = argument;
        self
    }
}

/// Read a string argument
pub fn text_arg<'a>(command: &str, argument: &'a Value) -> Result<&'a str> {
    argument.as_str().ok_or_else(|| {
        Error::invalid_argument(command, format!("expected a string, found {argument}"))
    })
}

/// Read a millisecond duration argument. A missing argument is zero.
pub fn duration_arg(command: &str, argument: &Value) -> Result<Duration> {
    if argument.is_null() {
        return Ok(Duration::ZERO);
    }
    if let Some(ms) = argument.as_u64() {
        return Ok(Duration::from_millis(ms));
    }
    match argument.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => {
            Ok(Duration::from_micros((ms * 1000.0).round() as u64))
        }
        _ => Err(Error::invalid_argument(
            command,
            format!("expected a non-negative number of milliseconds, found {argument}"),
        )),
    }
}

/// Per-instance key/value memory shared by commands
#[derive(Debug, Default)]
pub struct RunState {
    values: Mutex<HashMap<String, String>>,
}

impl RunState {
    /// Store a value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value.into());
    }

    /// Read a value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

/// What a command sees while it runs
pub struct Context {
    document: SharedDocument,
    target: Target,
    options: Options,
    state: RunState,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("target", &self.target)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Context {
    pub(crate) fn new(
        document: SharedDocument,
        target: Target,
        options: Options,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            document,
            target,
            options,
            state: RunState::default(),
            cancel,
        }
    }

    /// Effective options
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Run state
    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Bound target
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Document the target lives in
    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Cancellation token of the owning animator
    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Replace the visible text
    pub fn set_text(&self, text: &str) -> Result<()> {
        document::lock(&self.document).set_text_content(self.target.content, text)
    }

    /// Current visible text
    pub fn text(&self) -> Result<String> {
        document::lock(&self.document).text_content(self.target.content)
    }

    /// Add a presentation class to the visible content
    pub fn add_class(&self, class: &str) -> Result<()> {
        document::lock(&self.document).add_class(self.target.content, class)
    }

    /// Remove a presentation class from the visible content
    pub fn remove_class(&self, class: &str) -> Result<()> {
        document::lock(&self.document).remove_class(self.target.content, class)
    }

    /// Sleep for `duration`, returning [`Error::Cancelled`] if the
    /// animator is cancelled first
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// Trait for command implementations
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Command metadata
    fn definition(&self) -> &CommandDefinition;

    /// Perform the command
    async fn execute(&self, argument: &Value, ctx: &Context) -> Result<()>;

    /// Validate an argument before any run starts
    fn validate(&self, argument: &Value) -> Result<()> {
        let def = self.definition();
        def.argument.check(&def.name, argument)
    }
}

/// Registry of named commands
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.list_names())
            .finish()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in commands
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_builtins(&mut registry);
        registry
    }

    /// Register a command, replacing any command of the same name
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.definition().name.clone();
        debug!(command = %name, "Registering command");
        self.commands.insert(name, command);
    }

    /// Remove a command
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.remove(name)
    }

    /// Get a command by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Check if a command exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Sorted command names
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Command definitions, sorted by name
    #[must_use]
    pub fn list_definitions(&self) -> Vec<&CommandDefinition> {
        let mut defs: Vec<&CommandDefinition> =
            self.commands.values().map(|c| c.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Beep {
        definition: CommandDefinition,
    }

    #[async_trait::async_trait]
    impl Command for Beep {
        fn definition(&self) -> &CommandDefinition {
            &self.definition
        }

        async fn execute(&self, _argument: &Value, _ctx: &Context) -> Result<()> {
            Ok(())
        }
    }

    fn beep() -> Arc<dyn Command> {
        Arc::new(Beep {
            definition: CommandDefinition::new("beep", "Ring the bell"),
        })
    }

    #[test]
    fn test_registry() {
        let mut registry = CommandRegistry::new();
        assert!(registry.is_empty());

        registry.register(beep());
        assert!(registry.has("beep"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("boop").is_none());

        registry.register(beep());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("beep").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_builtins_are_listed_sorted() {
        let registry = CommandRegistry::with_builtins();
        assert_eq!(
            registry.list_names(),
            vec![
                "addAnimatedCursor",
                "addCursor",
                "from",
                "removeAnimatedCursor",
                "removeCursor",
                "text",
                "to",
                "wait",
            ]
        );
    }

    #[test]
    fn test_argument_kinds() {
        assert!(ArgumentKind::Text.check("text", &json!("hi")).is_ok());
        assert!(ArgumentKind::Text.check("text", &json!(3)).is_err());
        assert!(ArgumentKind::Duration.check("wait", &json!(250)).is_ok());
        assert!(ArgumentKind::Duration.check("wait", &json!(12.5)).is_ok());
        assert!(ArgumentKind::Duration.check("wait", &json!(-1)).is_err());
        assert!(ArgumentKind::Duration.check("wait", &json!("1s")).is_err());
        assert!(ArgumentKind::Duration.check("wait", &Value::Null).is_ok());
        assert!(ArgumentKind::None.check("addCursor", &Value::Null).is_ok());
    }

    #[test]
    fn test_duration_arg() {
        assert_eq!(
            duration_arg("wait", &json!(1500)).unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            duration_arg("wait", &json!(0.5)).unwrap(),
            Duration::from_micros(500)
        );
    }

    #[test]
    fn test_run_state() {
        let state = RunState::default();
        assert!(state.get("from").is_none());
        state.set("from", "Hello");
        assert_eq!(state.get("from").as_deref(), Some("Hello"));
    }
}
