//! Cursor presentation

/// Class showing a static cursor after the text
pub const CURSOR_CLASS: &str = "w-cursor";

/// Class making the cursor blink
pub const ANIMATED_CURSOR_CLASS: &str = "w-animated-cursor";

const CURSOR_STYLE: &str = r#"
.w-cursor::after {
  content: "|";
  position:absolute;
}

.w-animated-cursor::after {
  -webkit-animation: blink {blinkingDelay} infinite step-start;
  animation: blink {blinkingDelay} infinite step-start;
}

@-webkit-keyframes blink {
  50% {
    opacity: 0;
  }
}

@keyframes blink {
  50% {
    opacity: 0;
  }
}"#;

/// Cursor stylesheet with the given blink period
#[must_use]
pub fn cursor_stylesheet(blinking_delay: &str) -> String {
    CURSOR_STYLE.replace("{blinkingDelay}", blinking_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_period_is_substituted() {
        let css = cursor_stylesheet("750ms");
        assert!(css.contains("animation: blink 750ms infinite step-start;"));
        assert!(!css.contains("{blinkingDelay}"));
        assert!(css.contains(&format!(".{CURSOR_CLASS}::after")));
        assert!(css.contains(&format!(".{ANIMATED_CURSOR_CLASS}::after")));
    }
}
