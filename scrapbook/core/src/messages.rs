//! Sequencer Messages
//!
//! Messages sent from the sequencer to the surface. The surface renders what
//! it is told (indicator dots, track position) and never decides navigation
//! itself.

use serde::{Deserialize, Serialize};

/// Messages from sequencer to surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequencerMessage {
    /// Navigation became available (intro reveal finished)
    NavigationEnabled,

    /// Highlight a different indicator dot
    ///
    /// Sent synchronously when a transition starts, before the track moves.
    IndicatorChanged {
        /// Dot to highlight
        active: usize,
    },

    /// Slide track settled at a new offset
    TrackPositioned {
        /// Horizontal offset in viewport-width units
        offset_vw: f32,
        /// Whether the move was animated
        animated: bool,
    },

    /// A slide's entrance choreography finished
    SlideEntered {
        /// Slide now showing
        index: usize,
        /// Slide shown before
        previous: usize,
    },
}

/// Sequencer state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequencerState {
    /// Resting on a slide, accepting navigation
    Idle {
        /// Current slide
        index: usize,
    },
    /// Moving between slides; navigation is locked
    Transitioning {
        /// Slide being left
        from: usize,
        /// Slide being entered
        to: usize,
    },
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::Idle { index: 0 }
    }
}

impl SequencerState {
    /// Slide the sequencer considers current
    ///
    /// During a transition this is already the destination, matching the
    /// indicator which switches before the track moves.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self {
            Self::Idle { index } => *index,
            Self::Transitioning { to, .. } => *to,
        }
    }

    /// Whether a transition is in flight
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Idle { index } => format!("Resting on slide {index}"),
            Self::Transitioning { from, to } => format!("Moving from slide {from} to {to}"),
        }
    }
}
