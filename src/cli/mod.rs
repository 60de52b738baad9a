//! CLI module for Typist
//!
//! Provides commands:
//! - `play`: Run an animation script on the terminal
//! - `check`: Validate a script and show what would run
//! - `commands`: List the available step commands

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use typist_core::{Document, MemoryDocument};

pub mod check;
pub mod play;

/// Id of the element every script animates
pub const TARGET_ID: &str = "typist";

/// Selector matching [`TARGET_ID`]
pub const TARGET_SELECTOR: &str = "#typist";

/// Typist CLI
#[derive(Parser, Debug)]
#[command(name = "typist")]
#[command(about = "Scripted typewriter animations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an animation script
    Play(PlayArgs),
    /// Validate a script and print its effective steps
    Check {
        /// Script file (.json or .toml)
        script: PathBuf,
    },
    /// List available step commands
    Commands,
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Script file (.json or .toml)
    pub script: PathBuf,
    /// Repeat until interrupted
    #[arg(long = "loop")]
    pub looping: bool,
    /// Delay between steps in milliseconds
    #[arg(long)]
    pub step_delay: Option<u64>,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Play(args)) => play::run(args).await,
        Some(Commands::Check { script }) => check::run(&script),
        Some(Commands::Commands) => {
            list_commands();
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn list_commands() {
    let registry = typist_core::CommandRegistry::with_builtins();
    for def in registry.list_definitions() {
        println!(
            "{:<20} {:<10} {}",
            def.name,
            def.argument.as_str(),
            def.description
        );
    }
}

/// Document holding the single animated element
pub(crate) fn stage_document(char_width: u32) -> Result<MemoryDocument> {
    // Rendering is driven by the observer; a journal would grow every pass
    let mut doc = MemoryDocument::new()
        .with_char_width(char_width)
        .with_journal(false);
    let body = doc.body();
    let element = doc.append_element(body, "p")?;
    doc.set_attribute(element, "id", TARGET_ID)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use typist_core::{AnimationEvent, Options, SharedDocument, Step, Target, TypingAnimator};

    #[test]
    fn test_stage_document_has_single_target() {
        let doc = stage_document(8).unwrap();
        assert!(Target::resolve(&doc, TARGET_SELECTOR).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_document_stays_bounded_while_looping() {
        let document = Arc::new(Mutex::new(stage_document(8).unwrap()));
        let shared: SharedDocument = document.clone();
        let steps =
            Step::list_from_value(&json!([{"from": "cargo "}, {"to": "cargo build"}])).unwrap();
        let options = Options::new(TARGET_SELECTOR).with_loop(true);
        let animator = TypingAnimator::new(options, steps, shared).unwrap();

        let frames = Arc::new(AtomicUsize::new(0));
        let counter = frames.clone();
        document
            .lock()
            .unwrap()
            .set_observer(Arc::new(move |_: &typist_core::Mutation| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        let passes = Arc::new(AtomicUsize::new(0));
        let seen = passes.clone();
        let token = animator.cancel_token();
        animator.on(AnimationEvent::LOOP, move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) + 1 == 25 {
                token.cancel();
            }
        });

        let outcome = animator.run().await.unwrap();

        assert_eq!(outcome.passes(), 25);
        assert!(frames.load(Ordering::SeqCst) >= 25 * 6);
        assert!(document.lock().unwrap().journal().is_empty());
    }

    #[test]
    fn test_parse_play_args() {
        let cli = Cli::parse_from(["typist", "play", "intro.toml", "--loop", "--step-delay", "50"]);
        match cli.command {
            Some(Commands::Play(args)) => {
                assert_eq!(args.script, PathBuf::from("intro.toml"));
                assert!(args.looping);
                assert_eq!(args.step_delay, Some(50));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
