//! Inner Scroll Routing
//!
//! The gallery slide contains its own scrollable region. Wheel input on that
//! slide goes to the region first; only an upward scroll with the region
//! already at its top reaches the slide accumulator. Downward scroll never
//! triggers a forward slide step while the region is scrollable.

use serde::{Deserialize, Serialize};

/// Slack, in pixels, when deciding the region is scrolled to the bottom
pub const DEFAULT_BOTTOM_TOLERANCE: f32 = 5.0;

/// Scroll metrics of an inner region
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InnerScrollState {
    /// Distance scrolled from the top
    pub scroll_top: f32,
    /// Full content height
    pub scroll_height: f32,
    /// Visible height
    pub client_height: f32,
}

impl InnerScrollState {
    /// Create scroll metrics
    #[must_use]
    pub const fn new(scroll_top: f32, scroll_height: f32, client_height: f32) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Whether the content overflows the visible area
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.scroll_height > self.client_height
    }

    /// Whether the region is at its top edge
    #[must_use]
    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    /// Whether the region is at its bottom edge, within `tolerance`
    #[must_use]
    pub fn at_bottom(&self, tolerance: f32) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - tolerance
    }
}

/// Queries the scroll metrics of a slide's inner region
pub trait InnerScrollProbe: Send + Sync {
    /// Metrics for the region on `slide`, if it has one
    fn inner_scroll(&self, slide: usize) -> Option<InnerScrollState>;
}

/// Where a wheel event on a slide with an inner region goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelRoute {
    /// Feed the slide accumulator
    Accumulate,
    /// Leave to native scrolling; accumulator untouched
    PassThrough,
    /// Leave to native scrolling and clear the accumulator
    Absorb,
}

/// Decide where a wheel delta goes
#[must_use]
pub fn route_wheel(delta_y: f32, state: Option<InnerScrollState>, tolerance: f32) -> WheelRoute {
    let Some(state) = state.filter(InnerScrollState::is_scrollable) else {
        return WheelRoute::Accumulate;
    };

    if delta_y < 0.0 && state.at_top() {
        return WheelRoute::Accumulate;
    }
    if delta_y > 0.0 && state.at_bottom(tolerance) {
        return WheelRoute::PassThrough;
    }

    WheelRoute::Absorb
}
