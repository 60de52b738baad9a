//! `typist check`

use super::{stage_document, TARGET_SELECTOR};
use crate::script::Script;
use crate::settings::load_config;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;
use typist_core::{SharedDocument, TypingAnimator};

/// Validate a script and print the steps it would run
pub fn run(path: &Path) -> Result<()> {
    let config = load_config()?;
    let script = Script::load(path)?;
    let options = script.options(config.animation.to_options(TARGET_SELECTOR))?;
    let steps = script.steps()?;

    let document: SharedDocument = Arc::new(Mutex::new(stage_document(
        config.terminal.char_width,
    )?));
    let animator = TypingAnimator::new(options, steps, document)
        .with_context(|| format!("Script {} does not validate", path.display()))?;

    for step in animator.steps() {
        if !animator.registry().has(step.command()) {
            warn!(command = %step.command(), "Unknown command will be skipped");
        }
    }

    let report = json!({
        "options": animator.options(),
        "steps": animator.steps(),
        "longestText": animator.longest_text(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
