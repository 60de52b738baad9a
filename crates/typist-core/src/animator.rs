//! TypingAnimator - the step interpreter
//!
//! Walks the step list, dispatching each step to its registered command and
//! awaiting it. Between steps it sleeps for the configured step delay,
//! except before an explicit `wait` and after the last step of a pass.
//! With `loop` set, passes repeat until the animator is cancelled.
//!
//! ```ignore
//! let animator = TypingAnimator::new(options, steps, document)?;
//! animator.on(AnimationEvent::END, |_| println!("done"));
//! animator.run().await?;
//! ```

use crate::builtins::WAIT;
use crate::command::{CommandRegistry, Context};
use crate::document::{self, SharedDocument};
use crate::error::{Error, Result};
use crate::event_hub::{AnimationEvent, Event, EventHub, Handler};
use crate::options::Options;
use crate::step::{longest_text, mirrored, Step};
use crate::target::Target;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All passes finished and `animation:end` was emitted
    Completed {
        /// Completed passes over the step list
        passes: u64,
    },
    /// The animator was cancelled
    Cancelled {
        /// Passes completed before cancellation
        passes: u64,
    },
}

impl RunOutcome {
    /// Completed passes over the step list
    #[must_use]
    pub fn passes(&self) -> u64 {
        match self {
            Self::Completed { passes } | Self::Cancelled { passes } => *passes,
        }
    }

    /// Whether the run was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Clears the running flag when a run finishes or its future is dropped
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Step interpreter bound to one document element
pub struct TypingAnimator {
    steps: Vec<Step>,
    registry: Arc<CommandRegistry>,
    events: EventHub,
    context: Context,
    longest_text: String,
    running: AtomicBool,
}

impl std::fmt::Debug for TypingAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingAnimator")
            .field("steps", &self.steps.len())
            .field("context", &self.context)
            .field("running", &self.is_running())
            .finish()
    }
}

impl TypingAnimator {
    /// Build an animator using the built-in commands
    pub fn new(options: Options, steps: Vec<Step>, document: SharedDocument) -> Result<Self> {
        Self::with_registry(
            options,
            steps,
            document,
            Arc::new(CommandRegistry::with_builtins()),
        )
    }

    /// Build an animator from untyped values.
    ///
    /// `options` must be a non-empty object and `steps` an array.
    pub fn from_json(options: &Value, steps: &Value, document: SharedDocument) -> Result<Self> {
        let options = Options::from_json(options)?;
        let steps = Step::list_from_value(steps)?;
        Self::new(options, steps, document)
    }

    /// Build an animator using a caller-supplied command registry
    pub fn with_registry(
        options: Options,
        steps: Vec<Step>,
        document: SharedDocument,
        registry: Arc<CommandRegistry>,
    ) -> Result<Self> {
        for (index, step) in steps.iter().enumerate() {
            match registry.get(step.command()) {
                Some(command) => command
                    .validate(step.argument())
                    .map_err(|e| Error::invalid_step(index, e.to_string()))?,
                None => {
                    debug!(index, command = %step.command(), "Step names an unregistered command")
                }
            }
        }

        let longest = longest_text(&steps).to_string();
        let target = {
            let mut doc = document::lock(&document);
            Target::prepare(&mut *doc, &options, &longest)?
        };

        let steps = if options.revert {
            mirrored(steps)
        } else {
            steps
        };

        debug!(
            target = %options.target,
            steps = steps.len(),
            looping = options.looping,
            "Animator ready"
        );

        Ok(Self {
            steps,
            registry,
            events: EventHub::new(),
            context: Context::new(document, target, options, CancellationToken::new()),
            longest_text: longest,
            running: AtomicBool::new(false),
        })
    }

    /// Effective step list (mirrored when `revert` is set)
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Effective options
    #[must_use]
    pub fn options(&self) -> &Options {
        self.context.options()
    }

    /// Bound target
    #[must_use]
    pub fn target(&self) -> Target {
        self.context.target()
    }

    /// Longest literal text among the steps
    #[must_use]
    pub fn longest_text(&self) -> &str {
        &self.longest_text
    }

    /// Command registry in use
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Whether a run is in progress
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Token that stops the animation at its next suspension point
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.context.cancel_token().clone()
    }

    /// Stop the animation. A cancelled animator cannot run again.
    pub fn cancel(&self) {
        self.context.cancel_token().cancel();
    }

    /// Register an event handler
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> Handler
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.on(name, handler)
    }

    /// Remove an event handler
    pub fn off(&self, name: &str, handler: &Handler) -> bool {
        self.events.off(name, handler)
    }

    /// Dispatch an event to the animator's handlers
    pub fn emit(&self, event: &Event) -> bool {
        self.events.emit(event)
    }

    /// Play the animation.
    ///
    /// Resolves once a non-looping run finishes, or when the animator is
    /// cancelled. A looping run only ends through cancellation.
    #[instrument(skip(self), fields(target = %self.options().target, steps = self.steps.len()))]
    pub async fn run(&self) -> Result<RunOutcome> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        info!("Animation started");
        self.emit(&Event::new(AnimationEvent::START));

        let mut passes = 0;
        match self.drive(&mut passes).await {
            Ok(()) => {
                self.emit(&Event::new(AnimationEvent::END));
                info!(passes, "Animation finished");
                Ok(RunOutcome::Completed { passes })
            }
            Err(Error::Cancelled) => {
                info!(passes, "Animation cancelled");
                Ok(RunOutcome::Cancelled { passes })
            }
            Err(e) => Err(e),
        }
    }

    async fn drive(&self, passes: &mut u64) -> Result<()> {
        loop {
            self.run_pass().await?;
            *passes += 1;

            if !self.options().looping {
                return Ok(());
            }

            self.context.sleep(self.options().loop_delay()).await?;
            self.emit(&Event::new(AnimationEvent::LOOP));
            // A pass made only of instant steps never suspends.
            tokio::task::yield_now().await;
        }
    }

    async fn run_pass(&self) -> Result<()> {
        let step_delay = self.options().step_delay();

        for (index, step) in self.steps.iter().enumerate() {
            if self.context.cancel_token().is_cancelled() {
                return Err(Error::Cancelled);
            }

            let Some(command) = self.registry.get(step.command()) else {
                warn!(index, command = %step.command(), "Unknown command, skipping");
                continue;
            };

            debug!(index, command = %step.command(), "Executing step");
            command.execute(step.argument(), &self.context).await?;

            let pause = match self.steps.get(index + 1) {
                Some(next) => next.command() != WAIT,
                None => false,
            };
            if pause && !step_delay.is_zero() {
                self.context.sleep(step_delay).await?;
            }
        }
        Ok(())
    }
}
