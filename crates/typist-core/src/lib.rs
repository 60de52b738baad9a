//! Typist Core - Step Interpreter for Typing Animations
//!
//! This crate provides the animation engine for Typist:
//! - Animator: walks a step list, dispatching each step to a command
//! - Command: registry of named commands and the built-in set
//! - EventHub: `animation:start` / `animation:loop` / `animation:end`
//! - Document: the DOM-like surface an animation draws on
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::{Arc, Mutex};
//! use typist_core::{MemoryDocument, Options, Step, TypingAnimator};
//!
//! let mut doc = MemoryDocument::new();
//! let el = doc.append_element(doc.body(), "h1")?;
//! doc.set_attribute(el, "id", "title")?;
//!
//! let animator = TypingAnimator::new(
//!     Options::new("#title").with_animated_cursor(true),
//!     vec![Step::with_arg("from", "Hello"), Step::with_arg("to", "Hello World")],
//!     Arc::new(Mutex::new(doc)),
//! )?;
//! animator.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod animator;
pub mod builtins;
pub mod command;
pub mod document;
pub mod error;
pub mod event_hub;
pub mod options;
pub mod step;
pub mod style;
pub mod target;

pub use animator::{RunOutcome, TypingAnimator};
pub use builtins::register_builtins;
pub use command::{ArgumentKind, Command, CommandDefinition, CommandRegistry, Context, RunState};
pub use document::{Document, MemoryDocument, Mutation, NodeId, SharedDocument};
pub use error::{Error, Result};
pub use event_hub::{AnimationEvent, Event, EventHub, Handler};
pub use options::Options;
pub use step::Step;
pub use target::Target;
