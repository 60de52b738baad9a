//! Terminal rendering
//!
//! Mirrors the animated element onto the current terminal line. The
//! document observer keeps a small line state up to date and redraws on
//! every text or cursor change; a blinker task toggles the cursor glyph
//! while the animated-cursor class is set.

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use typist_core::style::{ANIMATED_CURSOR_CLASS, CURSOR_CLASS};
use typist_core::{Document, Mutation, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LineState {
    text: String,
    cursor: bool,
    animated: bool,
    blink_hidden: bool,
}

impl LineState {
    fn apply(&mut self, mutation: &Mutation, content: NodeId) -> bool {
        match mutation {
            Mutation::Text { node, text } if *node == content => {
                self.text.clone_from(text);
                true
            }
            Mutation::ClassAdded { node, class } if *node == content => self.set_class(class, true),
            Mutation::ClassRemoved { node, class } if *node == content => {
                self.set_class(class, false)
            }
            _ => false,
        }
    }

    fn set_class(&mut self, class: &str, on: bool) -> bool {
        match class {
            CURSOR_CLASS => self.cursor = on,
            ANIMATED_CURSOR_CLASS => {
                self.animated = on;
                self.blink_hidden = false;
            }
            _ => return false,
        }
        true
    }

    fn render(&self, glyph: &str) -> String {
        let show_cursor = self.cursor && !(self.animated && self.blink_hidden);
        if show_cursor {
            format!("{}{}", self.text, glyph)
        } else {
            self.text.clone()
        }
    }
}

/// One terminal line showing the animated content
#[derive(Debug, Clone)]
pub struct TerminalLine {
    state: Arc<Mutex<LineState>>,
    glyph: String,
}

impl TerminalLine {
    /// Create a line drawing `glyph` as the cursor
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LineState::default())),
            glyph: glyph.into(),
        }
    }

    /// Load the current text and cursor classes of `content`
    pub fn sync(&self, doc: &dyn Document, content: NodeId) {
        let mut state = self.lock();
        state.text = doc.text_content(content).unwrap_or_default();
        state.cursor = doc.has_class(content, CURSOR_CLASS);
        state.animated = doc.has_class(content, ANIMATED_CURSOR_CLASS);
    }

    /// Document observer redrawing on changes to `content`
    pub fn observer(&self, content: NodeId) -> typist_core::document::Observer {
        let line = self.clone();
        Arc::new(move |mutation: &Mutation| {
            let rendered = {
                let mut state = line.lock();
                if !state.apply(mutation, content) {
                    return;
                }
                state.render(&line.glyph)
            };
            if let Err(e) = draw(&rendered) {
                debug!(error = %e, "Terminal redraw failed");
            }
        })
    }

    /// Blink the cursor every half `period` until `token` is cancelled
    pub fn spawn_blinker(&self, period: Duration, token: CancellationToken) -> JoinHandle<()> {
        let line = self.clone();
        let half = (period / 2).max(Duration::from_millis(50));
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(half);
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticks.tick() => {
                        let rendered = {
                            let mut state = line.lock();
                            if !state.animated {
                                continue;
                            }
                            state.blink_hidden = !state.blink_hidden;
                            state.render(&line.glyph)
                        };
                        if let Err(e) = draw(&rendered) {
                            debug!(error = %e, "Terminal redraw failed");
                        }
                    }
                }
            }
        })
    }

    /// Draw the current state
    pub fn redraw(&self) -> io::Result<()> {
        let rendered = self.lock().render(&self.glyph);
        draw(&rendered)
    }

    /// Draw the final state and move to the next line
    pub fn finish(&self) -> io::Result<()> {
        self.lock().blink_hidden = false;
        self.redraw()?;
        let mut out = io::stdout();
        writeln!(out)?;
        out.flush()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn draw(line: &str) -> io::Result<()> {
    let mut out = io::stdout();
    crossterm::execute!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(line)
    )
}

/// Parse a CSS time value (`"1s"`, `"500ms"`, `"0.5s"`)
pub fn parse_css_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 0.001)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1.0)
    } else {
        return None;
    };
    let number: f64 = number.trim().parse().ok()?;
    if !number.is_finite() || number <= 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(number * scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_duration() {
        assert_eq!(parse_css_duration("1s"), Some(Duration::from_secs(1)));
        assert_eq!(parse_css_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_css_duration(" 2s "), Some(Duration::from_secs(2)));
        assert_eq!(parse_css_duration("0s"), None);
        assert_eq!(parse_css_duration("fast"), None);
        assert_eq!(parse_css_duration("10"), None);
    }

    #[test]
    fn test_line_state_tracks_content_only() {
        let mut state = LineState::default();
        let content = 7;

        assert!(state.apply(
            &Mutation::Text {
                node: content,
                text: "Hello".to_string()
            },
            content
        ));
        assert!(!state.apply(
            &Mutation::Text {
                node: 3,
                text: "placeholder".to_string()
            },
            content
        ));
        assert!(state.apply(
            &Mutation::ClassAdded {
                node: content,
                class: CURSOR_CLASS.to_string()
            },
            content
        ));
        assert!(!state.apply(
            &Mutation::ClassAdded {
                node: content,
                class: "unrelated".to_string()
            },
            content
        ));

        assert_eq!(state.render("|"), "Hello|");
    }

    #[test]
    fn test_blink_hides_cursor() {
        let state = LineState {
            text: "Hi".to_string(),
            cursor: true,
            animated: true,
            blink_hidden: true,
        };
        assert_eq!(state.render("_"), "Hi");

        let state = LineState {
            animated: false,
            ..state
        };
        assert_eq!(state.render("_"), "Hi_");
    }
}
