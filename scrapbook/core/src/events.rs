//! Input Events
//!
//! Raw user input forwarded by a surface (browser page, terminal, test
//! harness) to the sequencer. Surfaces don't interpret what input means -
//! they just report what happened. The sequencer decides how to respond.

use serde::{Deserialize, Serialize};

/// Events from the surface to the sequencer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse wheel or trackpad scroll
    Wheel {
        /// Vertical delta (positive = scrolling down)
        delta_y: f32,
    },

    /// Key pressed
    Key {
        /// The key
        key: NavKey,
    },

    /// Finger touched the screen
    TouchStart {
        /// Touch position
        point: Point,
    },

    /// Finger lifted from the screen
    TouchEnd {
        /// Release position
        point: Point,
    },

    /// Slide indicator dot clicked
    IndicatorClicked {
        /// Slide the dot represents
        index: usize,
    },
}

/// Keyboard keys relevant to navigation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKey {
    /// Right arrow
    ArrowRight,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Up arrow
    ArrowUp,
    /// Any other key, by name
    #[serde(untagged)]
    Other(String),
}

impl NavKey {
    /// Parse a DOM-style key name
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowUp" => Self::ArrowUp,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Screen position in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Navigation direction through the slides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the next slide
    Forward,
    /// Towards the previous slide
    Backward,
}

impl Direction {
    /// Direction of a signed quantity (zero counts as forward)
    #[must_use]
    pub fn of(value: f32) -> Self {
        if value < 0.0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    /// Sign applied to magnitudes travelling this way
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// Slide reached by stepping once from `current`
    ///
    /// Returns `None` when stepping backwards from the first slide. The
    /// upper bound is left to the sequencer's range check.
    #[must_use]
    pub fn step_from(self, current: usize) -> Option<usize> {
        match self {
            Self::Forward => current.checked_add(1),
            Self::Backward => current.checked_sub(1),
        }
    }
}
