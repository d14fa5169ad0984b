//! Slide Sequencer
//!
//! Owns the current slide, the transition lock and the wheel accumulator.
//! Input goes in, discrete animated transitions come out, one at a time.
//!
//! # Design
//!
//! The sequencer is a two-state machine:
//!
//! ```text
//!            begin(target)                 run(): track tween + enter hook
//! Idle(i) ─────────────────▶ Transitioning(i, t) ─────────────────────────▶ Idle(t)
//!    ▲                              │
//!    └── ignored: out of range,     └── every request while here is dropped
//!        same slide                     (never queued)
//! ```
//!
//! Taking the lock ([`SlideSequencer::begin`]) is synchronous and separate
//! from running the transition ([`PendingTransition::run`]). Input handlers
//! decide immediately, so input that arrives while the transition plays is
//! dropped rather than buffered behind it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::accumulator::{ScrollAccumulator, DEFAULT_SCROLL_THRESHOLD};
use crate::animation::{Animator, EasingFunction, Property, PropertyValue, Target, Tween};
use crate::events::{Direction, InputEvent};
use crate::input::{key_intent, wheel_intent, SwipeTracker, MIN_SWIPE_DISTANCE};
use crate::messages::{SequencerMessage, SequencerState};
use crate::scroll::{route_wheel, InnerScrollProbe, WheelRoute, DEFAULT_BOTTOM_TOLERANCE};
use crate::slides::{EnterHook, Slide, SLIDE_TRACK};

/// Sequencer configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SequencerConfig {
    /// Number of slides
    pub total_slides: usize,
    /// Net wheel travel per slide step
    pub scroll_threshold: f32,
    /// Minimum horizontal swipe distance in pixels
    pub min_swipe_distance: f32,
    /// Width of one slide in viewport-width units
    pub slide_width_vw: f32,
    /// Length of the track animation
    pub transition_duration: Duration,
    /// Easing of the track animation
    pub transition_easing: EasingFunction,
    /// Whether the track animates (false = jump)
    pub animate: bool,
    /// Slack when deciding an inner region is scrolled to the bottom
    pub bottom_tolerance: f32,
    /// Capacity of the surface message channel
    pub message_buffer: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            total_slides: Slide::ALL.len(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            slide_width_vw: 100.0,
            transition_duration: Duration::from_millis(800),
            transition_easing: EasingFunction::Power2InOut,
            animate: true,
            bottom_tolerance: DEFAULT_BOTTOM_TOLERANCE,
            message_buffer: 64,
        }
    }
}

/// Shared "navigation enabled" switch
///
/// Starts disabled. Whoever owns the prerequisite reveal flips it; the
/// sequencer only reads it.
#[derive(Clone, Debug, Default)]
pub struct NavigationFlag(Arc<AtomicBool>);

impl NavigationFlag {
    /// Create a disabled flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow navigation
    pub fn enable(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Block navigation
    pub fn disable(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Whether navigation is allowed
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a navigation request was ignored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another transition is in flight
    Transitioning,
    /// Target outside `[0, total_slides)`
    OutOfRange,
    /// Target is the current slide
    AlreadyCurrent,
}

/// Result of a navigation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoToOutcome {
    /// The transition ran to completion
    Completed {
        /// Slide left
        from: usize,
        /// Slide entered
        to: usize,
    },
    /// Nothing happened
    Ignored(IgnoreReason),
}

/// What the sequencer did with an input event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputDisposition {
    /// Touch start recorded for a later swipe
    Tracked,
    /// Navigation disabled, a transition in flight, or the requested slide
    /// was rejected (out of range or already current)
    Dropped,
    /// Event carries no navigation meaning
    NoIntent,
    /// Wheel left to an inner region already at its edge
    PassedThrough,
    /// Wheel left to an inner region; accumulator cleared
    Absorbed,
    /// Wheel stored below the step threshold
    Accumulated,
    /// A discrete step was produced
    Stepped(Direction),
    /// An explicit slide was requested
    Jumped(usize),
}

/// Outcome of [`SlideSequencer::handle_input`]
#[must_use = "a pending transition holds the navigation lock until it is run"]
pub struct InputOutcome<A: Animator + 'static, H: EnterHook + 'static> {
    /// What happened to the event
    pub disposition: InputDisposition,
    /// Whether the host should suppress the event's native default
    pub prevent_default: bool,
    /// Transition to drive, if one started
    pub transition: Option<PendingTransition<A, H>>,
}

impl<A: Animator + 'static, H: EnterHook + 'static> std::fmt::Debug for InputOutcome<A, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputOutcome")
            .field("disposition", &self.disposition)
            .field("prevent_default", &self.prevent_default)
            .field(
                "transition",
                &self.transition.as_ref().map(|t| (t.from, t.to)),
            )
            .finish()
    }
}

#[derive(Debug, Default)]
struct SequencerInner {
    state: SequencerState,
    accumulator: ScrollAccumulator,
    swipe: SwipeTracker,
}

/// The slide sequencer
pub struct SlideSequencer<A: Animator + 'static, H: EnterHook + 'static> {
    config: Arc<SequencerConfig>,
    animator: Arc<A>,
    hooks: Arc<H>,
    probe: Option<Arc<dyn InnerScrollProbe>>,
    navigation: NavigationFlag,
    inner: Arc<Mutex<SequencerInner>>,
    tx: mpsc::Sender<SequencerMessage>,
}

impl<A: Animator + 'static, H: EnterHook + 'static> Clone for SlideSequencer<A, H> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            animator: Arc::clone(&self.animator),
            hooks: Arc::clone(&self.hooks),
            probe: self.probe.clone(),
            navigation: self.navigation.clone(),
            inner: Arc::clone(&self.inner),
            tx: self.tx.clone(),
        }
    }
}

impl<A: Animator + 'static, H: EnterHook + 'static> SlideSequencer<A, H> {
    /// Create a sequencer resting on slide 0 with navigation disabled
    pub fn new(
        config: SequencerConfig,
        animator: Arc<A>,
        hooks: Arc<H>,
        tx: mpsc::Sender<SequencerMessage>,
    ) -> Self {
        let inner = SequencerInner {
            accumulator: ScrollAccumulator::new(config.scroll_threshold),
            ..SequencerInner::default()
        };

        Self {
            config: Arc::new(config),
            animator,
            hooks,
            probe: None,
            navigation: NavigationFlag::new(),
            inner: Arc::new(Mutex::new(inner)),
            tx,
        }
    }

    /// Use `probe` to query inner scroll regions
    #[must_use]
    pub fn with_scroll_probe(mut self, probe: Arc<dyn InnerScrollProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Share an existing navigation flag
    #[must_use]
    pub fn with_navigation_flag(mut self, flag: NavigationFlag) -> Self {
        self.navigation = flag;
        self
    }

    /// The navigation flag this sequencer reads
    #[must_use]
    pub fn navigation_flag(&self) -> NavigationFlag {
        self.navigation.clone()
    }

    /// Allow navigation and tell the surface
    pub fn enable_navigation(&self) {
        self.navigation.enable();
        self.emit(SequencerMessage::NavigationEnabled);
        info!("Slide navigation enabled");
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.inner.lock().state
    }

    /// Current slide (the destination while transitioning)
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state().current_index()
    }

    /// Whether a transition is in flight
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.state().is_transitioning()
    }

    /// Unconsumed wheel travel
    #[must_use]
    pub fn pending_scroll(&self) -> f32 {
        self.inner.lock().accumulator.pending()
    }

    /// Take the transition lock for `target`
    ///
    /// Updates the indicator before returning. The returned transition must
    /// be run, or the sequencer stays locked.
    ///
    /// # Errors
    ///
    /// Returns the reason the request was ignored; the state is unchanged.
    pub fn begin(&self, target: usize, animate: bool) -> Result<PendingTransition<A, H>, IgnoreReason> {
        let from = {
            let mut inner = self.inner.lock();
            let current = match inner.state {
                SequencerState::Transitioning { .. } => {
                    debug!(target, "Navigation ignored: transition in flight");
                    return Err(IgnoreReason::Transitioning);
                }
                SequencerState::Idle { index } => index,
            };
            if target >= self.config.total_slides {
                debug!(target, total = self.config.total_slides, "Navigation ignored: out of range");
                return Err(IgnoreReason::OutOfRange);
            }
            if target == current {
                debug!(target, "Navigation ignored: already on slide");
                return Err(IgnoreReason::AlreadyCurrent);
            }
            inner.state = SequencerState::Transitioning {
                from: current,
                to: target,
            };
            current
        };

        info!(from, to = target, "Slide transition started");
        self.emit(SequencerMessage::IndicatorChanged { active: target });

        Ok(PendingTransition {
            sequencer: self.clone(),
            from,
            to: target,
            animate,
        })
    }

    /// Navigate to `target` using the configured animation setting
    pub async fn go_to(&self, target: usize) -> GoToOutcome {
        self.go_to_with(target, self.config.animate).await
    }

    /// Navigate to `target`, animating the track or jumping
    pub async fn go_to_with(&self, target: usize, animate: bool) -> GoToOutcome {
        match self.begin(target, animate) {
            Ok(pending) => pending.run().await,
            Err(reason) => GoToOutcome::Ignored(reason),
        }
    }

    /// Interpret one input event
    pub fn handle_input(&self, event: &InputEvent) -> InputOutcome<A, H> {
        if let InputEvent::TouchStart { point } = event {
            self.inner.lock().swipe.begin(*point);
            return self.outcome(InputDisposition::Tracked, false, None);
        }

        if !self.navigation.is_enabled() {
            return self.outcome(InputDisposition::Dropped, false, None);
        }

        if let InputEvent::IndicatorClicked { index } = event {
            return match self.begin(*index, self.config.animate) {
                Ok(transition) => {
                    self.outcome(InputDisposition::Jumped(*index), false, Some(transition))
                }
                Err(_) => self.outcome(InputDisposition::Dropped, false, None),
            };
        }

        let (current, step, disposition, prevent_default) = {
            let mut inner = self.inner.lock();
            let SequencerState::Idle { index: current } = inner.state else {
                return self.outcome(InputDisposition::Dropped, false, None);
            };

            match event {
                InputEvent::Wheel { delta_y } => {
                    let Some(intent) = wheel_intent(*delta_y) else {
                        return self.outcome(InputDisposition::NoIntent, false, None);
                    };
                    match self.wheel_route(current, *delta_y) {
                        WheelRoute::PassThrough => {
                            (current, None, InputDisposition::PassedThrough, false)
                        }
                        WheelRoute::Absorb => {
                            inner.accumulator.reset();
                            (current, None, InputDisposition::Absorbed, false)
                        }
                        WheelRoute::Accumulate => match inner.accumulator.accumulate(intent) {
                            Some(direction) => {
                                (current, Some(direction), InputDisposition::Stepped(direction), true)
                            }
                            None => (current, None, InputDisposition::Accumulated, true),
                        },
                    }
                }
                InputEvent::Key { key } => match key_intent(key) {
                    Some(intent) => (
                        current,
                        Some(intent.direction),
                        InputDisposition::Stepped(intent.direction),
                        false,
                    ),
                    None => (current, None, InputDisposition::NoIntent, false),
                },
                InputEvent::TouchEnd { point } => {
                    match inner.swipe.finish(*point, self.config.min_swipe_distance) {
                        Some(intent) => (
                            current,
                            Some(intent.direction),
                            InputDisposition::Stepped(intent.direction),
                            false,
                        ),
                        None => (current, None, InputDisposition::NoIntent, false),
                    }
                }
                InputEvent::TouchStart { .. } | InputEvent::IndicatorClicked { .. } => {
                    (current, None, InputDisposition::NoIntent, false)
                }
            }
        };

        let Some(direction) = step else {
            return self.outcome(disposition, prevent_default, None);
        };

        // Stepping past either end is rejected like any other request
        let transition = direction
            .step_from(current)
            .and_then(|target| self.begin(target, self.config.animate).ok());
        match transition {
            Some(transition) => self.outcome(disposition, prevent_default, Some(transition)),
            None => self.outcome(InputDisposition::Dropped, prevent_default, None),
        }
    }

    /// Process events until the channel closes
    ///
    /// Transitions run on their own tasks so events keep flowing (and are
    /// dropped) while a transition plays. Waits for outstanding transitions
    /// before returning.
    pub async fn run_input_loop(self, mut rx: mpsc::Receiver<InputEvent>) {
        let mut running: Vec<JoinHandle<GoToOutcome>> = Vec::new();

        while let Some(event) = rx.recv().await {
            let outcome = self.handle_input(&event);
            debug!(?event, disposition = ?outcome.disposition, "Input handled");
            if let Some(transition) = outcome.transition {
                running.push(tokio::spawn(transition.run()));
            }
            running.retain(|handle| !handle.is_finished());
        }

        for handle in running {
            if let Err(e) = handle.await {
                warn!(error = %e, "Transition task failed");
            }
        }
    }

    fn wheel_route(&self, current: usize, delta_y: f32) -> WheelRoute {
        let has_region = Slide::from_index(current).is_some_and(Slide::has_inner_scroll);
        if !has_region {
            return WheelRoute::Accumulate;
        }
        let state = self.probe.as_ref().and_then(|p| p.inner_scroll(current));
        route_wheel(delta_y, state, self.config.bottom_tolerance)
    }

    fn outcome(
        &self,
        disposition: InputDisposition,
        prevent_default: bool,
        transition: Option<PendingTransition<A, H>>,
    ) -> InputOutcome<A, H> {
        InputOutcome {
            disposition,
            prevent_default,
            transition,
        }
    }

    fn emit(&self, message: SequencerMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                warn!(?message, "Surface channel full, message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Surface channel closed");
            }
        }
    }
}

/// A transition that holds the lock and is waiting to be played
#[must_use = "the sequencer stays locked until the transition is run"]
pub struct PendingTransition<A: Animator + 'static, H: EnterHook + 'static> {
    sequencer: SlideSequencer<A, H>,
    from: usize,
    to: usize,
    animate: bool,
}

impl<A: Animator + 'static, H: EnterHook + 'static> PendingTransition<A, H> {
    /// Slide being left
    #[must_use]
    pub fn from(&self) -> usize {
        self.from
    }

    /// Slide being entered
    #[must_use]
    pub fn to(&self) -> usize {
        self.to
    }

    /// Move the track, run the enter hook, then release the lock
    #[allow(clippy::cast_precision_loss)]
    pub async fn run(self) -> GoToOutcome {
        let seq = &self.sequencer;
        let offset_vw = -(self.to as f32) * seq.config.slide_width_vw;
        let track = Target::new(SLIDE_TRACK);

        if self.animate {
            let tween = Tween::to(track, seq.config.transition_duration)
                .prop(PropertyValue::vw(Property::X, offset_vw))
                .eased(seq.config.transition_easing);
            seq.animator.animate(&tween).await;
        } else {
            seq.animator
                .set(&track, &[PropertyValue::vw(Property::X, offset_vw)]);
        }
        seq.emit(SequencerMessage::TrackPositioned {
            offset_vw,
            animated: self.animate,
        });

        seq.hooks.on_enter(self.to, self.from).await;
        seq.emit(SequencerMessage::SlideEntered {
            index: self.to,
            previous: self.from,
        });

        seq.inner.lock().state = SequencerState::Idle { index: self.to };
        info!(from = self.from, to = self.to, "Slide transition complete");

        GoToOutcome::Completed {
            from: self.from,
            to: self.to,
        }
    }
}
