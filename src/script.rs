//! Animation scripts
//!
//! A script is a JSON or TOML document with an optional `options` table and
//! a `steps` array:
//!
//! ```toml
//! [options]
//! animatedCursor = true
//! loop = true
//!
//! steps = ["addCursor", { from = "Hello" }, { to = "Hello World" }, { wait = 800 }]
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use typist_core::{Options, Step};

/// Parsed script
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    options: Map<String, Value>,
    steps: Value,
}

impl Script {
    /// Read a script, choosing the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            other => bail!(
                "Unsupported script format {:?} for {} (expected .json or .toml)",
                other.unwrap_or(""),
                path.display()
            ),
        };
        parsed.with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Parse a JSON script
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON")
    }

    /// Parse a TOML script
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Script options merged over `base`
    pub fn options(&self, base: Options) -> Result<Options> {
        if self.options.is_empty() {
            return Ok(base);
        }
        Ok(base.merge_json(&Value::Object(self.options.clone()))?)
    }

    /// Ordered step list
    pub fn steps(&self) -> Result<Vec<Step>> {
        Ok(Step::list_from_value(&self.steps)?)
    }
}
