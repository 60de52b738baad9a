//! Animator options
//!
//! Keys follow the camelCase names scripts are written with. Delays are
//! milliseconds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Options controlling a single animator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Selector of the element to animate
    pub target: String,
    /// Pin the target width to the longest text
    pub fixed_width: bool,
    /// Play the steps forward, then backward
    pub revert: bool,
    /// Show a static cursor from the start
    pub cursor: bool,
    /// Show a blinking cursor from the start
    pub animated_cursor: bool,
    /// Repeat forever
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Delay after each step and between characters of `to`, in ms
    pub step_delay: u64,
    /// Delay before starting the next pass, in ms
    pub loop_delay: u64,
    /// CSS duration of one cursor blink
    pub blinking_delay: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target: String::new(),
            fixed_width: false,
            revert: false,
            cursor: false,
            animated_cursor: false,
            looping: false,
            step_delay: 1000,
            loop_delay: 0,
            blinking_delay: "1s".to_string(),
        }
    }
}

impl Options {
    /// Default options targeting `selector`
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Parse caller options, merged over the defaults.
    ///
    /// The value must be a non-empty object.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::default().merge_json(value)
    }

    /// Merge the keys of `overrides` over `self`
    pub fn merge_json(&self, overrides: &Value) -> Result<Self> {
        let Value::Object(overrides) = overrides else {
            return Err(Error::EmptyOptions);
        };
        if overrides.is_empty() {
            return Err(Error::EmptyOptions);
        }

        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Set fixed width
    #[must_use]
    pub fn with_fixed_width(mut self, enabled: bool) -> Self {
        self.fixed_width = enabled;
        self
    }

    /// Set revert
    #[must_use]
    pub fn with_revert(mut self, enabled: bool) -> Self {
        self.revert = enabled;
        self
    }

    /// Set static cursor
    #[must_use]
    pub fn with_cursor(mut self, enabled: bool) -> Self {
        self.cursor = enabled;
        self
    }

    /// Set blinking cursor
    #[must_use]
    pub fn with_animated_cursor(mut self, enabled: bool) -> Self {
        self.animated_cursor = enabled;
        self
    }

    /// Set looping
    #[must_use]
    pub fn with_loop(mut self, enabled: bool) -> Self {
        self.looping = enabled;
        self
    }

    /// Set the step delay
    #[must_use]
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay.as_millis() as u64;
        self
    }

    /// Set the loop delay
    #[must_use]
    pub fn with_loop_delay(mut self, delay: Duration) -> Self {
        self.loop_delay = delay.as_millis() as u64;
        self
    }

    /// Set the blink period
    #[must_use]
    pub fn with_blinking_delay(mut self, delay: impl Into<String>) -> Self {
        self.blinking_delay = delay.into();
        self
    }

    /// Step delay as a duration
    #[must_use]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay)
    }

    /// Loop delay as a duration
    #[must_use]
    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.step_delay, 1000);
        assert_eq!(options.loop_delay, 0);
        assert_eq!(options.blinking_delay, "1s");
        assert!(!options.looping);
        assert!(options.target.is_empty());
    }

    #[test]
    fn test_from_json_merges_over_defaults() {
        let options = Options::from_json(&json!({
            "target": "#title",
            "loop": true,
            "stepDelay": 80,
            "animatedCursor": true
        }))
        .unwrap();

        assert_eq!(options.target, "#title");
        assert!(options.looping);
        assert!(options.animated_cursor);
        assert_eq!(options.step_delay(), Duration::from_millis(80));
        assert_eq!(options.blinking_delay, "1s");
    }

    #[test]
    fn test_merge_keeps_base_values() {
        let base = Options::new("#a").with_step_delay(Duration::from_millis(50));
        let merged = base.merge_json(&json!({"revert": true})).unwrap();
        assert_eq!(merged.target, "#a");
        assert_eq!(merged.step_delay, 50);
        assert!(merged.revert);
    }

    #[test]
    fn test_empty_options_rejected() {
        assert!(matches!(
            Options::from_json(&json!({})),
            Err(Error::EmptyOptions)
        ));
        assert!(matches!(
            Options::from_json(&json!(null)),
            Err(Error::EmptyOptions)
        ));
    }

    #[test]
    fn test_bad_types_rejected() {
        let err = Options::from_json(&json!({"stepDelay": "fast"})).unwrap_err();
        assert_eq!(err.code(), "serialization_error");
    }
}
