//! Tween Timing
//!
//! Easing curves and a playhead that turns elapsed time into eased progress.
//! Curve names follow the families used by browser tweening libraries
//! (`power2.inOut`, `back.out(1.4)`) so choreography can be described in the
//! same vocabulary designers use.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default overshoot for `back` easing when none is given
const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;

/// Easing functions for smooth animation
///
/// `Power1` is quadratic, `Power2` cubic and `Power3` quartic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum EasingFunction {
    /// No easing (constant speed)
    #[default]
    Linear,

    /// Quadratic ease in
    Power1In,

    /// Quadratic ease out
    Power1Out,

    /// Quadratic ease in and out
    Power1InOut,

    /// Cubic ease in
    Power2In,

    /// Cubic ease out
    Power2Out,

    /// Cubic ease in and out
    Power2InOut,

    /// Quartic ease out
    Power3Out,

    /// Overshoot past the target then settle
    BackOut {
        /// Overshoot strength (1.70158 is the classic value)
        overshoot: f32,
    },

    /// Bounce effect at end
    BounceOut,

    /// Elastic effect at end
    ElasticOut,
}

impl EasingFunction {
    /// `back.out` with the given overshoot
    #[must_use]
    pub const fn back_out(overshoot: f32) -> Self {
        Self::BackOut { overshoot }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Power1In => t * t,
            Self::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Power2In => t * t * t,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
            Self::BackOut { overshoot } => {
                let c3 = overshoot + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1.powi(3) + overshoot * t_minus_1.powi(2)
            }
            Self::BounceOut => {
                const N1: f32 = 7.5625;
                const D1: f32 = 2.75;

                if t < 1.0 / D1 {
                    N1 * t * t
                } else if t < 2.0 / D1 {
                    let t = t - 1.5 / D1;
                    N1 * t * t + 0.75
                } else if t < 2.5 / D1 {
                    let t = t - 2.25 / D1;
                    N1 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D1;
                    N1 * t * t + 0.984_375
                }
            }
            Self::ElasticOut => {
                if t == 0.0 {
                    0.0
                } else if (t - 1.0).abs() < f32::EPSILON {
                    1.0
                } else {
                    let c4 = (2.0 * std::f32::consts::PI) / 3.0;
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
        }
    }
}

/// Error returned when an easing name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing '{0}'")]
pub struct EasingParseError(pub String);

impl FromStr for EasingFunction {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        if let Some(rest) = name.strip_prefix("back.out") {
            if rest.is_empty() {
                return Ok(Self::back_out(DEFAULT_BACK_OVERSHOOT));
            }
            return rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .and_then(|v| v.trim().parse::<f32>().ok())
                .filter(|v| v.is_finite())
                .map(Self::back_out)
                .ok_or_else(|| EasingParseError(name.to_string()));
        }

        match name {
            "none" | "linear" => Ok(Self::Linear),
            "power1.in" => Ok(Self::Power1In),
            "power1.out" | "power1" => Ok(Self::Power1Out),
            "power1.inOut" => Ok(Self::Power1InOut),
            "power2.in" => Ok(Self::Power2In),
            "power2.out" | "power2" => Ok(Self::Power2Out),
            "power2.inOut" => Ok(Self::Power2InOut),
            "power3.out" | "power3" => Ok(Self::Power3Out),
            "bounce.out" | "bounce" => Ok(Self::BounceOut),
            "elastic.out" | "elastic" => Ok(Self::ElasticOut),
            _ => Err(EasingParseError(name.to_string())),
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Power1In => write!(f, "power1.in"),
            Self::Power1Out => write!(f, "power1.out"),
            Self::Power1InOut => write!(f, "power1.inOut"),
            Self::Power2In => write!(f, "power2.in"),
            Self::Power2Out => write!(f, "power2.out"),
            Self::Power2InOut => write!(f, "power2.inOut"),
            Self::Power3Out => write!(f, "power3.out"),
            Self::BackOut { overshoot } => write!(f, "back.out({overshoot})"),
            Self::BounceOut => write!(f, "bounce.out"),
            Self::ElasticOut => write!(f, "elastic.out"),
        }
    }
}

/// Playback position within a single tween
///
/// Tracks elapsed time across repeats and reports the raw (uneased) progress
/// of the current cycle, mirrored on odd cycles when `yoyo` is set.
#[derive(Clone, Debug)]
pub struct Playhead {
    /// Time since the tween started
    elapsed: Duration,

    /// Length of one cycle
    cycle: Duration,

    /// Additional cycles after the first
    repeat: u32,

    /// Whether odd cycles play backwards
    yoyo: bool,
}

impl Playhead {
    /// Create a playhead for one tween
    #[must_use]
    pub fn new(cycle: Duration, repeat: u32, yoyo: bool) -> Self {
        Self {
            elapsed: Duration::ZERO,
            cycle,
            repeat,
            yoyo,
        }
    }

    /// Total time covered by every cycle
    #[must_use]
    pub fn total(&self) -> Duration {
        self.cycle * (self.repeat + 1)
    }

    /// Move the playhead to an absolute elapsed time
    pub fn seek(&mut self, elapsed: Duration) {
        self.elapsed = elapsed.min(self.total());
    }

    /// Advance by delta time
    ///
    /// # Returns
    /// * `true` once the playhead has reached the end
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.seek(self.elapsed + delta);
        self.is_complete()
    }

    /// Whether every cycle has played
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total()
    }

    /// Raw progress of the current cycle (0.0 to 1.0)
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.cycle.is_zero() {
            return self.end_progress();
        }
        if self.is_complete() {
            return self.end_progress();
        }

        let cycles = self.elapsed.as_secs_f64() / self.cycle.as_secs_f64();
        let index = cycles.floor();
        let within = (cycles - index) as f32;

        if self.yoyo && (index as u64) % 2 == 1 {
            1.0 - within
        } else {
            within
        }
    }

    /// Progress at rest after the final cycle
    fn end_progress(&self) -> f32 {
        if self.yoyo && self.repeat % 2 == 1 {
            0.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_linear() {
        assert!((EasingFunction::Linear.apply(0.0)).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(0.5) - 0.5).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_easing_boundaries() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::Power1InOut,
            EasingFunction::Power2Out,
            EasingFunction::Power2InOut,
            EasingFunction::back_out(1.4),
            EasingFunction::BounceOut,
        ] {
            // All easings should map 0 -> 0 and 1 -> 1
            assert!(
                easing.apply(0.0).abs() < 0.001,
                "{easing:?} at 0.0 = {}",
                easing.apply(0.0)
            );
            assert!(
                (easing.apply(1.0) - 1.0).abs() < 0.001,
                "{easing:?} at 1.0 = {}",
                easing.apply(1.0)
            );
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| EasingFunction::back_out(1.4).apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_power2_in_out_is_symmetric() {
        let e = EasingFunction::Power2InOut;
        assert!((e.apply(0.5) - 0.5).abs() < 0.001);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_easing_names() {
        assert_eq!("power2.inOut".parse(), Ok(EasingFunction::Power2InOut));
        assert_eq!("power2.out".parse(), Ok(EasingFunction::Power2Out));
        assert_eq!("power1.inOut".parse(), Ok(EasingFunction::Power1InOut));
        assert_eq!("back.out(1.2)".parse(), Ok(EasingFunction::back_out(1.2)));
        assert_eq!(
            "back.out".parse(),
            Ok(EasingFunction::back_out(DEFAULT_BACK_OVERSHOOT))
        );
        assert!("back.out(x)".parse::<EasingFunction>().is_err());
        assert!("wobble".parse::<EasingFunction>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for easing in [
            EasingFunction::Power2InOut,
            EasingFunction::back_out(1.4),
            EasingFunction::ElasticOut,
        ] {
            assert_eq!(easing.to_string().parse(), Ok(easing));
        }
    }

    #[test]
    fn test_playhead_basic() {
        let mut playhead = Playhead::new(Duration::from_millis(100), 0, false);

        assert!(playhead.progress() < 0.01);
        assert!(!playhead.advance(Duration::from_millis(50)));
        assert!((playhead.progress() - 0.5).abs() < 0.01);

        assert!(playhead.advance(Duration::from_millis(60)));
        assert!((playhead.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_playhead_yoyo_returns_to_start() {
        let mut playhead = Playhead::new(Duration::from_millis(100), 1, true);
        assert_eq!(playhead.total(), Duration::from_millis(200));

        playhead.seek(Duration::from_millis(150));
        assert!((playhead.progress() - 0.5).abs() < 0.01);

        playhead.seek(Duration::from_millis(250));
        assert!(playhead.is_complete());
        assert!(playhead.progress().abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_length_playhead_completes() {
        let playhead = Playhead::new(Duration::ZERO, 0, false);
        assert!(playhead.is_complete());
        assert!((playhead.progress() - 1.0).abs() < f32::EPSILON);
    }
}
