//! `typist play`

use super::{stage_document, PlayArgs, TARGET_SELECTOR};
use crate::script::Script;
use crate::settings::load_config;
use crate::terminal::{parse_css_duration, TerminalLine};
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use typist_core::{SharedDocument, TypingAnimator};

const DEFAULT_BLINK: Duration = Duration::from_secs(1);

/// Play a script on the current terminal line
pub async fn run(args: PlayArgs) -> Result<()> {
    let config = load_config()?;
    let script = Script::load(&args.script)?;

    let mut options = script.options(config.animation.to_options(TARGET_SELECTOR))?;
    if args.looping {
        options.looping = true;
    }
    if let Some(ms) = args.step_delay {
        options.step_delay = ms;
    }
    let steps = script.steps()?;

    let document = Arc::new(Mutex::new(stage_document(config.terminal.char_width)?));
    let shared: SharedDocument = document.clone();
    let animator = TypingAnimator::new(options, steps, shared)?;

    let line = TerminalLine::new(config.terminal.cursor_glyph.clone());
    let content = animator.target().content;
    {
        let mut doc = document
            .lock()
            .map_err(|_| anyhow!("Document lock poisoned"))?;
        line.sync(&*doc, content);
        doc.set_observer(line.observer(content));
    }
    line.redraw()?;

    let blink_stop = CancellationToken::new();
    let blinker = animator.options().animated_cursor.then(|| {
        let period = parse_css_duration(&animator.options().blinking_delay).unwrap_or_else(|| {
            warn!(
                value = %animator.options().blinking_delay,
                "Unrecognized blinking delay, using 1s"
            );
            DEFAULT_BLINK
        });
        line.spawn_blinker(period, blink_stop.clone())
    });

    let interrupt = {
        let token = animator.cancel_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let result = animator.run().await;

    interrupt.abort();
    blink_stop.cancel();
    if let Some(blinker) = blinker {
        let _ = blinker.await;
    }
    line.finish()?;

    let outcome = result?;
    debug!(passes = outcome.passes(), cancelled = outcome.is_cancelled(), "Player done");
    Ok(())
}
