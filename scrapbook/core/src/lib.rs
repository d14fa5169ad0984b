//! Scrapbook Core - Headless Slide Sequencing for a Scroll-Driven Story Page
//!
//! This crate turns continuous wheel input, key presses, touch swipes and
//! indicator clicks into discrete, animated, non-overlapping slide
//! transitions, and runs each slide's entrance choreography before accepting
//! input again. It never touches a real page: a host supplies the
//! [`Animator`], [`Stage`] and [`InnerScrollProbe`] and renders the
//! [`SequencerMessage`]s it receives.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Host Surface                               │
//! │   browser page  ·  scrapbook-replay  ·  tests                     │
//! │        │ InputEvent (up)                ▲ SequencerMessage (down) │
//! └────────┼────────────────────────────────┼─────────────────────────┘
//!          │                                │
//! ┌────────┼────────────────────────────────┼─────────────────────────┐
//! │        ▼          SCRAPBOOK CORE        │                         │
//! │  ┌───────────┐   ┌─────────────┐   ┌────┴──────────┐              │
//! │  │  input    │──▶│ accumulator │──▶│ SlideSequencer│──▶ Animator  │
//! │  │ (intents) │   │ (threshold) │   │ (lock, index) │──▶ EnterHook │
//! │  └───────────┘   └─────────────┘   └───────────────┘              │
//! │        ▲ scroll (gallery gating)            ▲ NavigationFlag      │
//! │                                             │                     │
//! │                     IntroReveal ────────────┘   BlossomToggle     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use scrapbook_core::{
//!     ClockAnimator, ChoreographyConfig, InputEvent, MemoryStage, NavKey,
//!     ScrapbookChoreography, SequencerConfig, SlideSequencer,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(64);
//!     let animator = Arc::new(ClockAnimator::default());
//!     let stage = Arc::new(MemoryStage::new());
//!     let hooks = Arc::new(ScrapbookChoreography::new(
//!         Arc::clone(&animator),
//!         Arc::clone(&stage),
//!         ChoreographyConfig::default(),
//!     ));
//!
//!     let sequencer = SlideSequencer::new(SequencerConfig::default(), animator, hooks, tx)
//!         .with_scroll_probe(stage);
//!     sequencer.enable_navigation();
//!
//!     let outcome = sequencer.handle_input(&InputEvent::Key { key: NavKey::ArrowRight });
//!     if let Some(transition) = outcome.transition {
//!         transition.run().await;
//!     }
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Tweens, timelines, easing and the animate capability
//! - [`input`]: Wheel, key and touch normalisation into intents
//! - [`accumulator`]: Thresholded wheel integration
//! - [`scroll`]: Inner scroll region gating
//! - [`stage`]: Element visibility and the blossom toggle
//! - [`slides`]: Slide catalogue, enter behaviors and choreography
//! - [`sequencer`]: The slide state machine
//! - [`intro`]: Camera and polaroid reveal that unlocks navigation
//! - [`blossom`]: Petal field and toggle
//! - [`config`]: TOML, environment and CLI configuration
//! - [`events`]: Input events from the host
//! - [`messages`]: Messages to the host

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod accumulator;
pub mod animation;
pub mod blossom;
pub mod config;
pub mod events;
pub mod input;
pub mod intro;
pub mod messages;
pub mod scroll;
pub mod sequencer;
pub mod slides;
pub mod stage;

// Re-exports for convenience
pub use accumulator::ScrollAccumulator;
pub use events::{Direction, InputEvent, NavKey, Point};
pub use input::{Intent, SwipeTracker};
pub use messages::{SequencerMessage, SequencerState};
pub use scroll::{InnerScrollProbe, InnerScrollState, WheelRoute};
pub use sequencer::{
    GoToOutcome, IgnoreReason, InputDisposition, InputOutcome, NavigationFlag, PendingTransition,
    SequencerConfig, SlideSequencer,
};
pub use slides::{
    ChoreographyConfig, EnterBehavior, EnterHook, NoopEnterHook, ScrapbookChoreography, Slide,
};
pub use stage::{MemoryStage, Stage, StageElement};

// Animation exports
pub use animation::{
    Animator, ClockAnimator, EasingFunction, Position, Property, PropertyStore, PropertyValue,
    Target, Timeline, Tween,
};

// Intro and blossom exports
pub use blossom::{BlossomToggle, PetalField, PetalSpec};
pub use intro::{IntroConfig, IntroPhase, IntroReveal};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, ScrapbookConfigFile, ScrapbookToml,
};
