//! Intro Reveal
//!
//! The one-shot sequence that runs before slide navigation exists:
//!
//! ```text
//! CameraHidden ──wheel ≥ threshold──▶ CameraVisible ──first click──▶ Revealing ──▶ Complete
//!                                                                                  │
//!                                   navigation enabled, indicator shown, slides primed
//! ```
//!
//! Wheel travel here is summed as absolute distance, separate from the
//! slide accumulator.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::animation::{
    secs, Animator, EasingFunction, Position, Property, PropertyValue, Timeline, Tween,
};
use crate::messages::SequencerMessage;
use crate::sequencer::NavigationFlag;
use crate::slides::prime_slides;
use crate::stage::{Stage, StageElement};

const INTRO_BACKGROUND: &str = "#introBackground";
const CAMERA: &str = "#camera";
const CLICK_INSTRUCTION: &str = "#clickInstruction";
const POLAROID: &str = "#polaroid";
const POLAROID_IMAGE: &str = "#polaroidImg";
const DEVELOPING_OVERLAY: &str = "#developingOverlay";
const HEADER_WORD: &str = ".header-word";

/// Intro settings
#[derive(Clone, Debug, PartialEq)]
pub struct IntroConfig {
    /// Absolute wheel travel needed to bring in the camera
    pub camera_scroll_threshold: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            camera_scroll_threshold: 50.0,
        }
    }
}

/// Where the intro is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPhase {
    /// Waiting for the first scroll
    CameraHidden,
    /// Camera shown, waiting for a click
    CameraVisible,
    /// Polaroid reveal playing
    Revealing,
    /// Navigation enabled
    Complete,
}

#[derive(Debug)]
struct IntroInner {
    phase: IntroPhase,
    scrolled: f32,
}

/// Drives the intro and enables navigation when it ends
pub struct IntroReveal<A: Animator, S: Stage> {
    config: IntroConfig,
    animator: Arc<A>,
    stage: Arc<S>,
    navigation: NavigationFlag,
    tx: mpsc::Sender<SequencerMessage>,
    inner: Mutex<IntroInner>,
}

impl<A: Animator, S: Stage> IntroReveal<A, S> {
    /// Create the intro in its page-load state
    pub fn new(
        config: IntroConfig,
        animator: Arc<A>,
        stage: Arc<S>,
        navigation: NavigationFlag,
        tx: mpsc::Sender<SequencerMessage>,
    ) -> Self {
        Self {
            config,
            animator,
            stage,
            navigation,
            tx,
            inner: Mutex::new(IntroInner {
                phase: IntroPhase::CameraHidden,
                scrolled: 0.0,
            }),
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> IntroPhase {
        self.inner.lock().phase
    }

    /// Absolute wheel travel seen before the camera appeared
    #[must_use]
    pub fn scrolled(&self) -> f32 {
        self.inner.lock().scrolled
    }

    /// Feed a wheel delta; shows the camera once the threshold is met
    ///
    /// Returns `true` for the call that showed the camera.
    pub async fn on_wheel(&self, delta_y: f32) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.phase != IntroPhase::CameraHidden || !delta_y.is_finite() {
                return false;
            }
            inner.scrolled += delta_y.abs();
            if inner.scrolled < self.config.camera_scroll_threshold {
                return false;
            }
            inner.phase = IntroPhase::CameraVisible;
        }

        info!("Showing camera");
        self.show_camera().await;
        true
    }

    /// Handle a camera click; only the first one does anything
    ///
    /// Resolves after the reveal finishes and navigation is enabled.
    pub async fn on_camera_click(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.phase != IntroPhase::CameraVisible {
                debug!(phase = ?inner.phase, "Camera click ignored");
                return false;
            }
            inner.phase = IntroPhase::Revealing;
        }

        info!("Camera clicked, revealing polaroid");
        let fade_hint = async {
            self.animator
                .animate(
                    &Tween::to(CLICK_INSTRUCTION, secs(0.3))
                        .prop(PropertyValue::scalar(Property::Opacity, 0.0)),
                )
                .await;
            self.stage.set_visible(StageElement::ClickInstruction, false);
        };
        let pulse = Tween::to(CAMERA, secs(0.1))
            .prop(PropertyValue::scalar(Property::Scale, 0.95))
            .yoyo(1);
        let pulse = self.animator.animate(&pulse);
        let reveal = reveal_timeline();

        tokio::join!(fade_hint, pulse, reveal.play(self.animator.as_ref()));

        self.complete();
        true
    }

    async fn show_camera(&self) {
        let fade_background = Tween::to(INTRO_BACKGROUND, secs(0.8))
            .prop(PropertyValue::scalar(Property::Opacity, 0.0))
            .eased(EasingFunction::Power2Out);
        self.animator.animate(&fade_background).await;
        self.stage.set_visible(StageElement::IntroBackground, false);
        self.stage.set_visible(StageElement::Camera, true);

        let raise_camera = Tween::to(CAMERA, secs(1.2))
            .prop(PropertyValue::px(Property::Y, 0.0))
            .eased(EasingFunction::Power2Out);
        self.animator.animate(&raise_camera).await;

        // Hint only once the camera has settled
        self.stage.set_visible(StageElement::ClickInstruction, true);
    }

    fn complete(&self) {
        self.navigation.enable();
        self.stage.set_visible(StageElement::SlideIndicator, true);
        prime_slides(self.animator.as_ref());
        self.inner.lock().phase = IntroPhase::Complete;

        if let Err(e) = self.tx.try_send(SequencerMessage::NavigationEnabled) {
            warn!(error = %e, "Could not report navigation enabled");
        }
        info!("Intro complete, navigation enabled");
    }
}

/// The polaroid reveal
pub fn reveal_timeline() -> Timeline {
    Timeline::new("polaroid-reveal")
        .then(
            Tween::to(POLAROID, secs(2.0))
                .prop(PropertyValue::percent(Property::Top, -180.0))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .eased(EasingFunction::Power2Out),
        )
        .set_at(
            POLAROID,
            vec![PropertyValue::scalar(Property::ZIndex, 10.0)],
            Position::Overlap(secs(1.2)),
        )
        .then_at(
            Tween::to(DEVELOPING_OVERLAY, secs(0.3))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0)),
            Position::Overlap(secs(0.5)),
        )
        .then_at(
            Tween::to(POLAROID_IMAGE, secs(0.8))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0)),
            Position::Overlap(secs(0.2)),
        )
        .then_at(
            Tween::to(DEVELOPING_OVERLAY, secs(0.5))
                .prop(PropertyValue::scalar(Property::Opacity, 0.0)),
            Position::Overlap(secs(0.4)),
        )
        .then_at(
            Tween::to(HEADER_WORD, secs(0.4))
                .prop(PropertyValue::scalar(Property::Opacity, 1.0))
                .staggered(secs(0.15))
                .eased(EasingFunction::Power2Out),
            Position::Gap(secs(0.2)),
        )
        .then_at(
            Tween::to(POLAROID, secs(0.3))
                .prop(PropertyValue::px(Property::Y, -10.0))
                .yoyo(1)
                .eased(EasingFunction::Power1InOut),
            Position::Gap(secs(0.3)),
        )
}
