//! Stage
//!
//! The page elements choreography shows and hides, plus the state of the
//! cherry-blossom toggle. A browser host backs this with class toggles on
//! real elements; [`MemoryStage`] keeps everything in memory for headless
//! playback and tests and also answers inner-scroll queries.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::scroll::{InnerScrollProbe, InnerScrollState};

/// Page elements whose visibility the choreography controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageElement {
    /// Full-screen intro backdrop
    IntroBackground,
    /// The camera the user clicks
    Camera,
    /// "Click the camera" hint
    ClickInstruction,
    /// Row of slide position dots
    SlideIndicator,
    /// Cherry-blossom toggle switch
    PetalToggle,
    /// Companion text next to the toggle
    FangirlText,
    /// Falling petals
    Petals,
}

/// Visibility and toggle state of the page
pub trait Stage: Send + Sync {
    /// Show or hide an element
    fn set_visible(&self, element: StageElement, visible: bool);

    /// Whether an element is currently shown
    fn is_visible(&self, element: StageElement) -> bool;

    /// Whether the blossom toggle is switched on
    fn toggle_checked(&self) -> bool;

    /// Switch the blossom toggle
    fn set_toggle_checked(&self, checked: bool);
}

#[derive(Debug, Default)]
struct StageState {
    visible: HashMap<StageElement, bool>,
    toggle_checked: bool,
    inner_scroll: HashMap<usize, InnerScrollState>,
}

/// In-memory stage
///
/// Every element starts hidden except the intro background.
#[derive(Clone, Debug)]
pub struct MemoryStage {
    state: Arc<Mutex<StageState>>,
}

impl Default for MemoryStage {
    fn default() -> Self {
        let stage = Self {
            state: Arc::new(Mutex::new(StageState::default())),
        };
        stage.set_visible(StageElement::IntroBackground, true);
        stage
    }
}

impl MemoryStage {
    /// Create a stage in its initial page-load state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scroll metrics of a slide's inner region
    pub fn set_inner_scroll(&self, slide: usize, state: InnerScrollState) {
        self.state.lock().inner_scroll.insert(slide, state);
    }

    /// Elements currently shown
    #[must_use]
    pub fn visible_elements(&self) -> Vec<StageElement> {
        let mut shown: Vec<_> = self
            .state
            .lock()
            .visible
            .iter()
            .filter_map(|(element, visible)| visible.then_some(*element))
            .collect();
        shown.sort_by_key(|e| format!("{e:?}"));
        shown
    }
}

impl Stage for MemoryStage {
    fn set_visible(&self, element: StageElement, visible: bool) {
        tracing::trace!(?element, visible, "Stage visibility");
        self.state.lock().visible.insert(element, visible);
    }

    fn is_visible(&self, element: StageElement) -> bool {
        self.state
            .lock()
            .visible
            .get(&element)
            .copied()
            .unwrap_or(false)
    }

    fn toggle_checked(&self) -> bool {
        self.state.lock().toggle_checked
    }

    fn set_toggle_checked(&self, checked: bool) {
        self.state.lock().toggle_checked = checked;
    }
}

impl InnerScrollProbe for MemoryStage {
    fn inner_scroll(&self, slide: usize) -> Option<InnerScrollState> {
        self.state.lock().inner_scroll.get(&slide).copied()
    }
}
