//! Animation System - Tween Descriptions and the Animate Capability
//!
//! This module describes animations semantically: which element, which
//! properties, how long and with which curve. It never renders anything.
//! A host supplies an [`Animator`] that knows how to drive real elements
//! (a browser tweening library, a terminal renderer, or the
//! [`ClockAnimator`] used for headless playback and tests).
//!
//! # Architecture
//!
//! ```text
//! SlideSequencer / Choreography (owns Tween + Timeline descriptions)
//!     │
//!     ├─→ Animator::animate(&Tween)   resolves once the tween settles
//!     ├─→ Animator::set(target, ..)   applies values immediately
//!     └─→ Timeline::play(&animator)   schedules overlapping tweens
//! ```

mod clock;
mod timeline;
mod timing;

pub use clock::{ClockAnimator, PropertyStore, DEFAULT_FRAME_INTERVAL};
pub use timeline::{Position, Timeline, TimelineAction, TimelineStep};
pub use timing::{EasingFunction, EasingParseError, Playhead};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Animatable property of a page element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Horizontal translation
    X,
    /// Vertical translation
    Y,
    /// Opacity (0.0 - 1.0)
    Opacity,
    /// Uniform scale
    Scale,
    /// Top offset
    Top,
    /// Stacking order
    ZIndex,
}

/// Unit attached to a property value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Unitless number
    #[default]
    None,
    /// CSS pixels
    Px,
    /// Percent of the containing block
    Percent,
    /// Percent of the viewport width
    Vw,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Px => write!(f, "px"),
            Self::Percent => write!(f, "%"),
            Self::Vw => write!(f, "vw"),
        }
    }
}

/// A single property assignment
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Which property
    pub property: Property,
    /// Numeric value
    pub value: f32,
    /// Unit of the value
    #[serde(default)]
    pub unit: Unit,
}

impl PropertyValue {
    /// Unitless value
    #[must_use]
    pub const fn scalar(property: Property, value: f32) -> Self {
        Self {
            property,
            value,
            unit: Unit::None,
        }
    }

    /// Pixel value
    #[must_use]
    pub const fn px(property: Property, value: f32) -> Self {
        Self {
            property,
            value,
            unit: Unit::Px,
        }
    }

    /// Percent value
    #[must_use]
    pub const fn percent(property: Property, value: f32) -> Self {
        Self {
            property,
            value,
            unit: Unit::Percent,
        }
    }

    /// Viewport-width value
    #[must_use]
    pub const fn vw(property: Property, value: f32) -> Self {
        Self {
            property,
            value,
            unit: Unit::Vw,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}={}{}", self.property, self.value, self.unit)
    }
}

/// Element selector a tween applies to
///
/// A selector may match several elements; staggered tweens offset each
/// match's start time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target(pub String);

impl Target {
    /// Create a target from a selector
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// Get the selector
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tween: move properties of a target towards end values over time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Element(s) to animate
    pub target: Target,

    /// Start values applied before playback (empty = current values)
    pub from: Vec<PropertyValue>,

    /// End values
    pub to: Vec<PropertyValue>,

    /// Length of one cycle
    pub duration: Duration,

    /// Easing curve
    pub easing: EasingFunction,

    /// Start offset between consecutive matched elements
    pub stagger: Duration,

    /// Extra cycles after the first
    pub repeat: u32,

    /// Whether odd cycles play backwards
    pub yoyo: bool,
}

impl Tween {
    /// Tween from current values to the given end values
    pub fn to(target: impl Into<Target>, duration: Duration) -> Self {
        Self {
            target: target.into(),
            from: Vec::new(),
            to: Vec::new(),
            duration,
            easing: EasingFunction::default(),
            stagger: Duration::ZERO,
            repeat: 0,
            yoyo: false,
        }
    }

    /// Add an end value
    #[must_use]
    pub fn prop(mut self, value: PropertyValue) -> Self {
        self.to.push(value);
        self
    }

    /// Add a start value
    #[must_use]
    pub fn starting(mut self, value: PropertyValue) -> Self {
        self.from.push(value);
        self
    }

    /// Set easing function
    #[must_use]
    pub fn eased(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Stagger matched elements
    #[must_use]
    pub fn staggered(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Play forwards then backwards `repeat` extra times
    #[must_use]
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self.yoyo = true;
        self
    }

    /// Time every cycle of one element takes
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        self.duration * (self.repeat + 1)
    }

    /// Time until the last of `element_count` elements settles
    #[must_use]
    pub fn total_duration(&self, element_count: usize) -> Duration {
        let extra = u32::try_from(element_count.saturating_sub(1)).unwrap_or(u32::MAX);
        self.cycle_duration() + self.stagger * extra
    }

    /// Start value of a property, if the tween specifies one
    #[must_use]
    pub fn start_value(&self, property: Property) -> Option<PropertyValue> {
        self.from.iter().find(|v| v.property == property).copied()
    }
}

/// Seconds as a `Duration`, rounded to the millisecond
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn secs(value: f32) -> Duration {
    Duration::from_millis((value.max(0.0) * 1000.0).round() as u64)
}

/// The animate capability
///
/// Implementations must resolve `animate` exactly once, after every matched
/// element (including staggered and repeated cycles) has settled.
#[async_trait]
pub trait Animator: Send + Sync {
    /// Play a tween and wait for it to settle
    async fn animate(&self, tween: &Tween);

    /// Apply values immediately without animating
    fn set(&self, target: &Target, values: &[PropertyValue]);

    /// Number of elements a selector matches
    fn element_count(&self, _target: &Target) -> usize {
        1
    }
}
