//! Sequencer Behavior Tests
//!
//! End-to-end checks of the slide state machine through the public API:
//! transitions, dropped requests, accumulator thresholds, swipes and the
//! gallery's inner scroll gating.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio_test::{assert_pending, assert_ready_eq};

use scrapbook_core::{
    ClockAnimator, Direction, GoToOutcome, IgnoreReason, InnerScrollState, InputDisposition,
    InputEvent, Intent, MemoryStage, NavKey, NoopEnterHook, Point, ScrollAccumulator,
    SequencerConfig, SequencerMessage, SequencerState, SlideSequencer,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

type Sequencer = SlideSequencer<ClockAnimator, NoopEnterHook>;

struct Harness {
    sequencer: Sequencer,
    stage: Arc<MemoryStage>,
    messages: mpsc::Receiver<SequencerMessage>,
}

impl Harness {
    fn new() -> Self {
        let (tx, messages) = mpsc::channel(128);
        let stage = Arc::new(MemoryStage::new());
        let sequencer = SlideSequencer::new(
            SequencerConfig::default(),
            Arc::new(ClockAnimator::default()),
            Arc::new(NoopEnterHook),
            tx,
        )
        .with_scroll_probe(stage.clone());
        Self {
            sequencer,
            stage,
            messages,
        }
    }

    fn enabled() -> Self {
        let harness = Self::new();
        harness.sequencer.enable_navigation();
        harness
    }

    fn drain(&mut self) -> Vec<SequencerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.messages.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Feed an event and run whatever transition it started
    async fn feed(&self, event: InputEvent) -> InputDisposition {
        let outcome = self.sequencer.handle_input(&event);
        if let Some(transition) = outcome.transition {
            transition.run().await;
        }
        outcome.disposition
    }
}

fn wheel(delta_y: f32) -> InputEvent {
    InputEvent::Wheel { delta_y }
}

// =============================================================================
// Transition Properties
// =============================================================================

#[tokio::test(start_paused = true)]
async fn go_to_reaches_every_other_slide() {
    for from in 0..4 {
        for to in (0..4).filter(|&to| to != from) {
            let harness = Harness::new();
            harness.sequencer.go_to_with(from, false).await;

            let outcome = harness.sequencer.go_to(to).await;
            assert_eq!(outcome, GoToOutcome::Completed { from, to });
            assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: to });
        }
    }
}

#[tokio::test(start_paused = true)]
async fn go_to_ignores_invalid_targets() {
    let harness = Harness::new();
    harness.sequencer.go_to(2).await;

    for target in [2, 4, 17, usize::MAX] {
        let outcome = harness.sequencer.go_to(target).await;
        assert!(matches!(outcome, GoToOutcome::Ignored(_)), "target {target}");
        assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 2 });
    }
}

#[tokio::test(start_paused = true)]
async fn second_request_during_transition_is_dropped() {
    let mut harness = Harness::enabled();
    harness.drain();

    let (first, second) = tokio::join!(harness.sequencer.go_to(1), harness.sequencer.go_to(2));

    assert_eq!(first, GoToOutcome::Completed { from: 0, to: 1 });
    assert_eq!(second, GoToOutcome::Ignored(IgnoreReason::Transitioning));
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 1 });
    assert_eq!(
        harness.drain(),
        vec![
            SequencerMessage::IndicatorChanged { active: 1 },
            SequencerMessage::TrackPositioned {
                offset_vw: -100.0,
                animated: true
            },
            SequencerMessage::SlideEntered {
                index: 1,
                previous: 0
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn transition_stays_pending_until_track_settles() {
    let harness = Harness::new();
    let mut transition = tokio_test::task::spawn(harness.sequencer.go_to(3));

    assert_pending!(transition.poll());
    assert_eq!(
        harness.sequencer.state(),
        SequencerState::Transitioning { from: 0, to: 3 }
    );
    assert_eq!(harness.sequencer.current_index(), 3);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_ready_eq!(transition.poll(), GoToOutcome::Completed { from: 0, to: 3 });
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 3 });
}

// =============================================================================
// Accumulator Properties
// =============================================================================

#[test]
fn accumulator_emits_once_per_threshold() {
    let mut acc = ScrollAccumulator::default();
    let down = |m: f32| Intent {
        direction: Direction::Forward,
        magnitude: m,
    };

    assert_eq!(acc.accumulate(down(30.0)), None);
    assert_eq!(acc.accumulate(down(30.0)), Some(Direction::Forward));
    assert!(acc.pending().abs() < f32::EPSILON);

    assert_eq!(acc.accumulate(down(30.0)), None);
    assert_eq!(acc.accumulate(down(20.0)), Some(Direction::Forward));
}

#[test]
fn accumulator_nets_opposite_directions() {
    let mut acc = ScrollAccumulator::default();
    let intent = |direction, magnitude| Intent {
        direction,
        magnitude,
    };

    assert_eq!(acc.accumulate(intent(Direction::Forward, 30.0)), None);
    assert_eq!(acc.accumulate(intent(Direction::Backward, 10.0)), None);
    assert!((acc.pending() - 20.0).abs() < f32::EPSILON);

    let mut fresh = ScrollAccumulator::default();
    assert_eq!(
        fresh.accumulate(intent(Direction::Forward, 50.0)),
        Some(Direction::Forward)
    );
    assert!(fresh.pending().abs() < f32::EPSILON);
}

// =============================================================================
// Input Properties
// =============================================================================

#[tokio::test(start_paused = true)]
async fn wheel_input_steps_after_threshold() {
    let harness = Harness::enabled();

    assert_eq!(harness.feed(wheel(30.0)).await, InputDisposition::Accumulated);
    assert_eq!(harness.sequencer.current_index(), 0);
    assert_eq!(
        harness.feed(wheel(30.0)).await,
        InputDisposition::Stepped(Direction::Forward)
    );
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 1 });
    assert!(harness.sequencer.pending_scroll().abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn swipe_steps_without_touching_accumulator() {
    let harness = Harness::enabled();
    harness.sequencer.go_to(2).await;
    harness.feed(wheel(40.0)).await;

    harness
        .feed(InputEvent::TouchStart {
            point: Point::new(200.0, 400.0),
        })
        .await;
    // dx = start - end = -60, dy = 5
    let disposition = harness
        .feed(InputEvent::TouchEnd {
            point: Point::new(260.0, 395.0),
        })
        .await;

    assert_eq!(disposition, InputDisposition::Stepped(Direction::Backward));
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 1 });
    assert!((harness.sequencer.pending_scroll() - 40.0).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn short_or_vertical_swipes_are_ignored() {
    let harness = Harness::enabled();

    for end in [Point::new(160.0, 300.0), Point::new(20.0, 500.0)] {
        harness
            .feed(InputEvent::TouchStart {
                point: Point::new(200.0, 300.0),
            })
            .await;
        let disposition = harness.feed(InputEvent::TouchEnd { point: end }).await;
        assert_eq!(disposition, InputDisposition::NoIntent);
    }
    assert_eq!(harness.sequencer.current_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn keys_map_to_directions() {
    let harness = Harness::enabled();

    harness.feed(InputEvent::Key { key: NavKey::ArrowDown }).await;
    harness.feed(InputEvent::Key { key: NavKey::ArrowRight }).await;
    assert_eq!(harness.sequencer.current_index(), 2);

    harness.feed(InputEvent::Key { key: NavKey::ArrowLeft }).await;
    assert_eq!(harness.sequencer.current_index(), 1);

    let other = harness
        .feed(InputEvent::Key {
            key: NavKey::from_name("Enter"),
        })
        .await;
    assert_eq!(other, InputDisposition::NoIntent);
    assert_eq!(harness.sequencer.current_index(), 1);
}

// =============================================================================
// Gallery Gating
// =============================================================================

#[tokio::test(start_paused = true)]
async fn gallery_downward_scroll_leaves_state_alone() {
    let harness = Harness::enabled();
    harness.sequencer.go_to(3).await;
    harness
        .stage
        .set_inner_scroll(3, InnerScrollState::new(250.0, 1800.0, 700.0));

    for _ in 0..10 {
        harness.feed(wheel(120.0)).await;
        assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 3 });
        assert!(harness.sequencer.pending_scroll().abs() < f32::EPSILON);
    }

    // Bottomed out: no forward step either
    harness
        .stage
        .set_inner_scroll(3, InnerScrollState::new(1100.0, 1800.0, 700.0));
    assert_eq!(harness.feed(wheel(120.0)).await, InputDisposition::PassedThrough);
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 3 });
}

#[tokio::test(start_paused = true)]
async fn gallery_retreats_from_top() {
    let harness = Harness::enabled();
    harness.sequencer.go_to(3).await;
    harness
        .stage
        .set_inner_scroll(3, InnerScrollState::new(0.0, 1800.0, 700.0));

    assert_eq!(harness.feed(wheel(-25.0)).await, InputDisposition::Accumulated);
    assert_eq!(
        harness.feed(wheel(-25.0)).await,
        InputDisposition::Stepped(Direction::Backward)
    );
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 2 });
}

#[tokio::test(start_paused = true)]
async fn input_loop_serializes_transitions() {
    let harness = Harness::enabled();
    let (tx, rx) = mpsc::channel(16);
    let looping = tokio::spawn(harness.sequencer.clone().run_input_loop(rx));

    tx.send(InputEvent::IndicatorClicked { index: 2 }).await.unwrap();
    tx.send(wheel(80.0)).await.unwrap();
    tx.send(InputEvent::Key { key: NavKey::ArrowRight }).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    tx.send(InputEvent::Key { key: NavKey::ArrowRight }).await.unwrap();
    drop(tx);

    looping.await.unwrap();
    assert_eq!(harness.sequencer.state(), SequencerState::Idle { index: 3 });
    assert!(harness.sequencer.pending_scroll().abs() < f32::EPSILON);
}
