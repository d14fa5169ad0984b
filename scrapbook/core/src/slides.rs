//! Slides and Entrance Choreography
//!
//! The scrapbook has four slides. Each one maps to exactly one
//! [`EnterBehavior`], and [`ScrapbookChoreography`] performs that behavior
//! when the sequencer lands on the slide.
//!
//! | Index | Slide           | On enter                                        |
//! |-------|-----------------|-------------------------------------------------|
//! | 0     | `Polaroid`      | nothing                                         |
//! | 1     | `CherryBlossom` | show toggle, show text unless toggle is on      |
//! | 2     | `Suitcase`      | hide toggle + text, wait 1s, suitcase timeline  |
//! | 3     | `Gallery`       | wait 200ms, gallery timeline                    |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::animation::{
    secs, Animator, EasingFunction, Position, Property, PropertyValue, Timeline, Tween,
};
use crate::stage::{Stage, StageElement};

/// Selector of the horizontal slide track
pub const SLIDE_TRACK: &str = "#slidesContainer";

const SUITCASE: &str = ".suitcase-container";
const TEXT_CONTAINER: &str = ".text-container";
const PARALLAX_WORD: &str = ".parallax-word";
const GALLERY_TITLE: &str = ".gallery-title";
const BOOK_WRAPPER: &str = ".book-wrapper";

/// The slides of the scrapbook, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slide {
    /// Developed polaroid with the title header
    Polaroid,
    /// Cherry-blossom slide with the petal toggle
    CherryBlossom,
    /// Suitcase and travel text
    Suitcase,
    /// Book gallery with its own scroll region
    Gallery,
}

impl Slide {
    /// Every slide in display order
    pub const ALL: [Slide; 4] = [
        Slide::Polaroid,
        Slide::CherryBlossom,
        Slide::Suitcase,
        Slide::Gallery,
    ];

    /// Slide at a position, if any
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of the slide
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Polaroid => 0,
            Self::CherryBlossom => 1,
            Self::Suitcase => 2,
            Self::Gallery => 3,
        }
    }

    /// What happens when the slide is entered
    #[must_use]
    pub fn enter_behavior(self) -> EnterBehavior {
        match self {
            Self::Polaroid => EnterBehavior::Still,
            Self::CherryBlossom => EnterBehavior::RevealBlossomToggle,
            Self::Suitcase => EnterBehavior::SuitcaseEntrance,
            Self::Gallery => EnterBehavior::GalleryEntrance,
        }
    }

    /// Whether the slide owns an independently scrollable region
    #[must_use]
    pub fn has_inner_scroll(self) -> bool {
        matches!(self, Self::Gallery)
    }
}

/// Entrance behavior of a slide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnterBehavior {
    /// Nothing to do
    Still,
    /// Show the blossom toggle and, if it is off, its companion text
    RevealBlossomToggle,
    /// Hide blossom controls, pause, then slide the suitcase in
    SuitcaseEntrance,
    /// Pause, then fade the gallery title and cards up
    GalleryEntrance,
}

impl EnterBehavior {
    /// Pause before the entrance timeline starts
    #[must_use]
    pub fn grace_delay(self, config: &ChoreographyConfig) -> Duration {
        match self {
            Self::Still | Self::RevealBlossomToggle => Duration::ZERO,
            Self::SuitcaseEntrance => config.suitcase_grace,
            Self::GalleryEntrance => config.gallery_grace,
        }
    }

    /// Entrance timeline, if the behavior animates
    #[must_use]
    pub fn timeline(self) -> Option<Timeline> {
        match self {
            Self::Still | Self::RevealBlossomToggle => None,
            Self::SuitcaseEntrance => Some(suitcase_timeline()),
            Self::GalleryEntrance => Some(gallery_timeline()),
        }
    }
}

/// Suitcase slides in, travel text rises, words fade in one by one
#[must_use]
pub fn suitcase_timeline() -> Timeline {
    Timeline::new("suitcase-entrance")
        .then(
            Tween::to(SUITCASE, secs(1.5))
                .starting(PropertyValue::vw(Property::X, -100.0))
                .starting(PropertyValue::scalar(Property::Opacity, 1.0))
                .prop(PropertyValue::vw(Property::X, 0.0))
                .eased(EasingFunction::back_out(1.4)),
        )
        .then_at(
            Tween::to(TEXT_CONTAINER, secs(0.8))
                .starting(PropertyValue::scalar(Property::Opacity, 0.0))
                .starting(PropertyValue::px(Property::Y, 30.0))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .prop(PropertyValue::px(Property::Y, 0.0))
                .eased(EasingFunction::Power2Out),
            Position::Overlap(secs(0.5)),
        )
        .then_at(
            Tween::to(PARALLAX_WORD, secs(0.3))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .staggered(secs(0.1))
                .eased(EasingFunction::Power2Out),
            Position::Overlap(secs(0.3)),
        )
}

/// Gallery title fades up, then the book cards bounce up in turn
#[must_use]
pub fn gallery_timeline() -> Timeline {
    Timeline::new("gallery-entrance")
        .then(
            Tween::to(GALLERY_TITLE, secs(0.6))
                .starting(PropertyValue::scalar(Property::Opacity, 0.0))
                .starting(PropertyValue::px(Property::Y, 40.0))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .prop(PropertyValue::px(Property::Y, 0.0))
                .eased(EasingFunction::Power2Out),
        )
        .then_at(
            Tween::to(BOOK_WRAPPER, secs(0.6))
                .starting(PropertyValue::scalar(Property::Opacity, 0.0))
                .starting(PropertyValue::px(Property::Y, 80.0))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .prop(PropertyValue::px(Property::Y, 0.0))
                .staggered(secs(0.15))
                .eased(EasingFunction::back_out(1.2)),
            Position::Overlap(secs(0.3)),
        )
}

/// Put every entrance element in its pre-entrance state
pub fn prime_slides<A: Animator + ?Sized>(animator: &A) {
    animator.set(
        &SUITCASE.into(),
        &[
            PropertyValue::vw(Property::X, -100.0),
            PropertyValue::scalar(Property::Opacity, 1.0),
        ],
    );
    animator.set(
        &TEXT_CONTAINER.into(),
        &[
            PropertyValue::scalar(Property::Opacity, 0.0),
            PropertyValue::px(Property::Y, 30.0),
        ],
    );
    animator.set(
        &PARALLAX_WORD.into(),
        &[PropertyValue::scalar(Property::Opacity, 0.0)],
    );
    animator.set(
        &GALLERY_TITLE.into(),
        &[
            PropertyValue::scalar(Property::Opacity, 0.0),
            PropertyValue::px(Property::Y, 40.0),
        ],
    );
    animator.set(
        &BOOK_WRAPPER.into(),
        &[
            PropertyValue::scalar(Property::Opacity, 0.0),
            PropertyValue::px(Property::Y, 80.0),
        ],
    );
}

/// Per-slide lifecycle hook awaited by the sequencer
#[async_trait]
pub trait EnterHook: Send + Sync {
    /// Called once the track settles on `slide`; the sequencer stays locked
    /// until this returns
    async fn on_enter(&self, slide: usize, previous: usize);
}

/// Hook that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEnterHook;

#[async_trait]
impl EnterHook for NoopEnterHook {
    async fn on_enter(&self, _slide: usize, _previous: usize) {}
}

/// Grace delays before entrance timelines
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoreographyConfig {
    /// Pause before the suitcase entrance
    pub suitcase_grace: Duration,
    /// Pause before the gallery entrance
    pub gallery_grace: Duration,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            suitcase_grace: Duration::from_millis(1000),
            gallery_grace: Duration::from_millis(200),
        }
    }
}

/// The scrapbook's entrance choreography
pub struct ScrapbookChoreography<A: Animator, S: Stage> {
    animator: Arc<A>,
    stage: Arc<S>,
    config: ChoreographyConfig,
}

impl<A: Animator, S: Stage> ScrapbookChoreography<A, S> {
    /// Create the choreography
    pub fn new(animator: Arc<A>, stage: Arc<S>, config: ChoreographyConfig) -> Self {
        Self {
            animator,
            stage,
            config,
        }
    }

    /// Run one behavior to completion
    pub async fn perform(&self, behavior: EnterBehavior) {
        match behavior {
            EnterBehavior::Still => {}
            EnterBehavior::RevealBlossomToggle => {
                self.stage.set_visible(StageElement::PetalToggle, true);
                if !self.stage.toggle_checked() {
                    self.stage.set_visible(StageElement::FangirlText, true);
                }
            }
            EnterBehavior::SuitcaseEntrance => {
                self.stage.set_visible(StageElement::PetalToggle, false);
                self.stage.set_visible(StageElement::FangirlText, false);
                self.play_after_grace(behavior).await;
            }
            EnterBehavior::GalleryEntrance => {
                self.play_after_grace(behavior).await;
            }
        }
    }

    async fn play_after_grace(&self, behavior: EnterBehavior) {
        let grace = behavior.grace_delay(&self.config);
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }
        if let Some(timeline) = behavior.timeline() {
            timeline.play(self.animator.as_ref()).await;
        }
    }
}

#[async_trait]
impl<A: Animator, S: Stage> EnterHook for ScrapbookChoreography<A, S> {
    async fn on_enter(&self, slide: usize, previous: usize) {
        let Some(slide) = Slide::from_index(slide) else {
            tracing::debug!(slide, "No choreography for slide");
            return;
        };

        let behavior = slide.enter_behavior();
        tracing::debug!(?slide, previous, ?behavior, "Entering slide");
        self.perform(behavior).await;
    }
}
