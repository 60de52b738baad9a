//! Step - one scripted instruction
//!
//! A step is either a bare command name (`"addCursor"`) or a single-key
//! map from command name to argument (`{ "text": "Hello" }`).

use crate::error::{Error, Result};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commands whose string argument ends up as visible text
const TEXT_COMMANDS: [&str; 3] = ["text", "from", "to"];

/// A single animation step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    command: String,
    argument: Value,
}

impl Step {
    /// Step with no argument
    #[must_use]
    pub fn bare(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            argument: Value::Null,
        }
    }

    /// Step with an argument
    #[must_use]
    pub fn with_arg(command: impl Into<String>, argument: impl Into<Value>) -> Self {
        Self {
            command: command.into(),
            argument: argument.into(),
        }
    }

    /// Command name
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Argument (`Null` for bare steps)
    #[must_use]
    pub fn argument(&self) -> &Value {
        &self.argument
    }

    /// Whether this step is a bare command name
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.argument.is_null()
    }

    /// Interpret a JSON value as a step
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        match value {
            Value::String(command) if !command.is_empty() => Ok(Self::bare(command.clone())),
            Value::String(_) => Err(Error::invalid_step(index, "empty command name")),
            Value::Object(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((command, argument)), None) => {
                        Ok(Self::with_arg(command.clone(), argument.clone()))
                    }
                    (None, _) => Err(Error::invalid_step(index, "empty mapping")),
                    (Some(_), Some(_)) => Err(Error::invalid_step(
                        index,
                        format!("expected a single key, found {}", map.len()),
                    )),
                }
            }
            other => Err(Error::invalid_step(
                index,
                format!("expected a string or a single-key mapping, found {other}"),
            )),
        }
    }

    /// Interpret a JSON array as an ordered step list
    pub fn list_from_value(value: &Value) -> Result<Vec<Self>> {
        let Value::Array(items) = value else {
            return Err(Error::StepsNotSequence);
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Self::from_value(index, item))
            .collect()
    }

    /// The literal text this step would display, if any
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        if TEXT_COMMANDS.contains(&self.command.as_str()) {
            self.argument.as_str()
        } else {
            None
        }
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_bare() {
            serializer.serialize_str(&self.command)
        } else {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(&self.command, &self.argument)?;
            map.end()
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(0, &value).map_err(|e| match e {
            Error::InvalidStep { reason, .. } => de::Error::custom(reason),
            other => de::Error::custom(other),
        })
    }
}

/// Longest literal among `text`/`from`/`to` steps, by character count
#[must_use]
pub fn longest_text(steps: &[Step]) -> &str {
    steps
        .iter()
        .filter_map(Step::display_text)
        .fold("", |longest, text| {
            if text.chars().count() > longest.chars().count() {
                text
            } else {
                longest
            }
        })
}

/// Append the mirror image of `steps` to itself
#[must_use]
pub fn mirrored(steps: Vec<Step>) -> Vec<Step> {
    let mut expanded = Vec::with_capacity(steps.len() * 2);
    expanded.extend(steps.iter().cloned());
    expanded.extend(steps.into_iter().rev());
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert_eq!(
            Step::from_value(0, &json!("addCursor")).unwrap(),
            Step::bare("addCursor")
        );
        assert_eq!(
            Step::from_value(0, &json!({"wait": 500})).unwrap(),
            Step::with_arg("wait", 500)
        );
    }

    #[test]
    fn test_from_value_rejects_bad_shapes() {
        let err = Step::from_value(3, &json!({"text": "a", "wait": 1})).unwrap_err();
        assert!(matches!(err, Error::InvalidStep { index: 3, .. }));
        assert!(Step::from_value(0, &json!({})).is_err());
        assert!(Step::from_value(0, &json!("")).is_err());
        assert!(Step::from_value(0, &json!(42)).is_err());
    }

    #[test]
    fn test_list_requires_array() {
        let err = Step::list_from_value(&json!({"text": "a"})).unwrap_err();
        assert!(matches!(err, Error::StepsNotSequence));

        let steps = Step::list_from_value(&json!(["addCursor", {"text": "hi"}])).unwrap();
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Script {
            steps: Vec<Step>,
        }

        let script: Script = toml::from_str(
            r#"
            steps = ["addCursor", { text = "Hello" }, { wait = 250 }]
            "#,
        )
        .unwrap();
        assert_eq!(
            script.steps,
            vec![
                Step::bare("addCursor"),
                Step::with_arg("text", "Hello"),
                Step::with_arg("wait", 250),
            ]
        );
    }

    #[test]
    fn test_serialize_shape() {
        let steps = vec![Step::bare("removeCursor"), Step::with_arg("to", "abc")];
        let json = serde_json::to_value(&steps).unwrap();
        assert_eq!(json, json!(["removeCursor", {"to": "abc"}]));
    }

    #[test]
    fn test_longest_text() {
        let steps = vec![
            Step::with_arg("text", "Hi"),
            Step::with_arg("wait", 123_456_789),
            Step::with_arg("from", "Hello"),
            Step::with_arg("to", "Hello World"),
            Step::with_arg("custom", "this one is ignored entirely"),
        ];
        assert_eq!(longest_text(&steps), "Hello World");
        assert_eq!(longest_text(&[]), "");
    }

    #[test]
    fn test_mirrored() {
        let steps = vec![
            Step::with_arg("text", "a"),
            Step::with_arg("text", "b"),
            Step::with_arg("text", "c"),
        ];
        let expanded = mirrored(steps.clone());
        assert_eq!(expanded.len(), 6);
        assert_eq!(&expanded[..3], &steps[..]);
        let tail: Vec<Step> = steps.into_iter().rev().collect();
        assert_eq!(&expanded[3..], &tail[..]);
    }
}
