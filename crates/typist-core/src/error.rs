//! Error types for typist-core
//!
//! Construction problems are reported as typed errors instead of leaving a
//! half-built animator behind. Unknown commands are not errors; the
//! interpreter logs and skips them.

use thiserror::Error;

/// Typist error type
#[derive(Debug, Error)]
pub enum Error {
    /// Options were missing or an empty object
    #[error("options must be a non-empty object")]
    EmptyOptions,

    /// Steps were not given as an ordered sequence
    #[error("steps must be an array")]
    StepsNotSequence,

    /// A step could not be interpreted
    #[error("invalid step at index {index}: {reason}")]
    InvalidStep {
        /// Position of the offending step
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// No target selector was configured
    #[error("please provide an existing target")]
    MissingTarget,

    /// The target selector matched nothing
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// The target selector matched more than one element
    #[error("target {selector} matched {count} elements, expected exactly one")]
    AmbiguousTarget {
        /// Selector that was looked up
        selector: String,
        /// Number of matching elements
        count: usize,
    },

    /// A command received an argument it cannot use
    #[error("invalid argument for {command}: {reason}")]
    InvalidArgument {
        /// Command name
        command: String,
        /// What was wrong with the argument
        reason: String,
    },

    /// `run` was called while a run was already in progress
    #[error("animation is already running")]
    AlreadyRunning,

    /// A suspension point observed cancellation
    #[error("animation cancelled")]
    Cancelled,

    /// A document node handle did not resolve
    #[error("document node not found: {0}")]
    NodeNotFound(usize),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an invalid step error
    #[must_use]
    pub fn invalid_step(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidStep {
            index,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is raised while building an animator
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyOptions
                | Self::StepsNotSequence
                | Self::InvalidStep { .. }
                | Self::MissingTarget
                | Self::TargetNotFound(_)
                | Self::AmbiguousTarget { .. }
                | Self::InvalidArgument { .. }
                | Self::Serialization(_)
        )
    }

    /// Stable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyOptions => "empty_options",
            Self::StepsNotSequence => "steps_not_sequence",
            Self::InvalidStep { .. } => "invalid_step",
            Self::MissingTarget => "missing_target",
            Self::TargetNotFound(_) => "target_not_found",
            Self::AmbiguousTarget { .. } => "ambiguous_target",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::AlreadyRunning => "already_running",
            Self::Cancelled => "cancelled",
            Self::NodeNotFound(_) => "node_not_found",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
