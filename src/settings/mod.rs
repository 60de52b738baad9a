//! Application settings
//!
//! Defaults for every animation the CLI plays, plus terminal rendering
//! knobs. Script options are merged on top of these.

mod loader;

pub use loader::load_config;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use typist_core::Options;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

/// Animation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    #[serde(default)]
    pub loop_delay_ms: u64,
    #[serde(default = "default_blinking_delay")]
    pub blinking_delay: String,
    #[serde(default)]
    pub fixed_width: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            loop_delay_ms: 0,
            blinking_delay: default_blinking_delay(),
            fixed_width: false,
        }
    }
}

impl AnimationConfig {
    /// Base options for an animation bound to `target`
    pub fn to_options(&self, target: impl Into<String>) -> Options {
        Options::new(target)
            .with_step_delay(Duration::from_millis(self.step_delay_ms))
            .with_loop_delay(Duration::from_millis(self.loop_delay_ms))
            .with_blinking_delay(self.blinking_delay.clone())
            .with_fixed_width(self.fixed_width)
    }
}

fn default_step_delay_ms() -> u64 {
    120
}

fn default_blinking_delay() -> String {
    "1s".to_string()
}

/// Terminal rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default = "default_cursor_glyph")]
    pub cursor_glyph: String,
    #[serde(default = "default_char_width")]
    pub char_width: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cursor_glyph: default_cursor_glyph(),
            char_width: default_char_width(),
        }
    }
}

fn default_cursor_glyph() -> String {
    "|".to_string()
}

fn default_char_width() -> u32 {
    8
}
