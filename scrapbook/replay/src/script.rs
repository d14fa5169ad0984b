//! Replay scripts
//!
//! A script is a JSON document listing timed steps:
//!
//! ```json
//! {
//!   "elements": { ".book-wrapper": 6 },
//!   "steps": [
//!     { "at_ms": 0,    "action": "intro_wheel", "delta_y": 60 },
//!     { "at_ms": 1500, "action": "camera_click" },
//!     { "at_ms": 7000, "action": "input", "event": { "type": "key", "key": "ArrowRight" } }
//!   ]
//! }
//! ```
//!
//! `at_ms` is measured from the start of the replay and must not decrease.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scrapbook_core::{InnerScrollState, InputEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a script
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Failed to read the script file
    #[error("Failed to read script at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Invalid JSON
    #[error("Failed to parse script: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Steps not in time order
    #[error("Step {index} at {at_ms}ms is earlier than the step before it")]
    OutOfOrder {
        /// Index of the offending step
        index: usize,
        /// Its timestamp
        at_ms: u64,
    },
}

/// What a step does
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Wheel on the intro screen
    IntroWheel {
        /// Vertical wheel delta
        delta_y: f32,
    },
    /// Click the camera
    CameraClick,
    /// Deliver an event to the sequencer
    Input {
        /// The event
        event: InputEvent,
    },
    /// Flip the petal toggle
    BlossomToggle {
        /// New toggle state
        checked: bool,
    },
    /// Update a slide's inner scroll metrics
    InnerScroll {
        /// Slide owning the region
        slide: usize,
        /// Distance scrolled from the top
        scroll_top: f32,
        /// Full content height
        scroll_height: f32,
        /// Visible height
        client_height: f32,
    },
}

impl ScriptAction {
    /// Inner scroll metrics carried by an `inner_scroll` step
    pub fn inner_scroll(&self) -> Option<(usize, InnerScrollState)> {
        match *self {
            Self::InnerScroll {
                slide,
                scroll_top,
                scroll_height,
                client_height,
            } => Some((
                slide,
                InnerScrollState::new(scroll_top, scroll_height, client_height),
            )),
            _ => None,
        }
    }
}

/// One timed step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Offset from replay start, milliseconds
    pub at_ms: u64,
    /// What happens
    #[serde(flatten)]
    pub action: ScriptAction,
}

impl ScriptStep {
    /// Offset from replay start
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// A replay script
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Selector cardinalities for staggered tweens
    #[serde(default)]
    pub elements: HashMap<String, usize>,
    /// Steps in time order
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse a script from JSON text
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(text)?;
        script.check_order()?;
        Ok(script)
    }

    /// Load a script file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    /// Time of the last step
    pub fn duration(&self) -> Duration {
        self.steps.last().map(ScriptStep::at).unwrap_or_default()
    }

    fn check_order(&self) -> Result<(), ScriptError> {
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ScriptError::OutOfOrder {
                    index: index + 1,
                    at_ms: pair[1].at_ms,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrapbook_core::NavKey;
    use std::io::Write;

    #[test]
    fn test_parse_all_actions() {
        let script = Script::parse(
            r#"{
                "elements": { ".parallax-word": 3 },
                "steps": [
                    { "at_ms": 0, "action": "intro_wheel", "delta_y": 60 },
                    { "at_ms": 1500, "action": "camera_click" },
                    { "at_ms": 7000, "action": "input", "event": { "type": "key", "key": "ArrowRight" } },
                    { "at_ms": 7500, "action": "blossom_toggle", "checked": true },
                    { "at_ms": 9000, "action": "inner_scroll", "slide": 3,
                      "scroll_top": 0, "scroll_height": 2000, "client_height": 600 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.elements.get(".parallax-word"), Some(&3));
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[1].action, ScriptAction::CameraClick);
        assert_eq!(
            script.steps[2].action,
            ScriptAction::Input {
                event: InputEvent::Key {
                    key: NavKey::ArrowRight
                }
            }
        );
        assert_eq!(
            script.steps[4].action.inner_scroll(),
            Some((3, InnerScrollState::new(0.0, 2000.0, 600.0)))
        );
        assert_eq!(script.duration(), Duration::from_millis(9000));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = Script::parse(
            r#"{ "steps": [
                { "at_ms": 500, "action": "camera_click" },
                { "at_ms": 100, "action": "camera_click" }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::OutOfOrder { index: 1, at_ms: 100 }));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = Script::parse(r#"{ "steps": [ { "at_ms": 0, "action": "dance" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ScriptError::ParseError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Script::load(Path::new("/nonexistent/tour.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read script"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "steps": [] }"#).unwrap();
        let script = Script::load(file.path()).unwrap();
        assert!(script.steps.is_empty());
        assert_eq!(script.duration(), Duration::ZERO);
    }
}
