//! Timelines
//!
//! A timeline is an ordered list of tweens and instant sets, each placed
//! relative to the end of everything scheduled before it. Positions follow
//! the usual tweening-library notation: sequential, `-=x` (overlap the
//! previous end by x) and `+=x` (leave a gap of x).

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{Animator, PropertyValue, Target, Tween};

/// Where a step starts relative to the timeline's current end
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Position {
    /// At the current end
    #[default]
    Sequential,
    /// Before the current end (`-=x`), clamped at zero
    Overlap(Duration),
    /// After the current end (`+=x`)
    Gap(Duration),
}

impl Position {
    fn resolve(self, end: Duration) -> Duration {
        match self {
            Self::Sequential => end,
            Self::Overlap(d) => end.saturating_sub(d),
            Self::Gap(d) => end + d,
        }
    }
}

/// What a timeline step does
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimelineAction {
    /// Play a tween
    Tween(Tween),
    /// Apply values instantly
    Set {
        /// Element(s) to update
        target: Target,
        /// Values to apply
        values: Vec<PropertyValue>,
    },
}

/// One entry in a timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineStep {
    /// The action
    pub action: TimelineAction,
    /// Start position
    pub position: Position,
}

/// An ordered, positioned group of animation steps
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Name used in logs
    pub name: String,
    /// Steps in insertion order
    pub steps: Vec<TimelineStep>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a tween at the current end
    #[must_use]
    pub fn then(self, tween: Tween) -> Self {
        self.then_at(tween, Position::Sequential)
    }

    /// Append a tween at a relative position
    #[must_use]
    pub fn then_at(mut self, tween: Tween, position: Position) -> Self {
        self.steps.push(TimelineStep {
            action: TimelineAction::Tween(tween),
            position,
        });
        self
    }

    /// Append an instant set at a relative position
    #[must_use]
    pub fn set_at(
        mut self,
        target: impl Into<Target>,
        values: Vec<PropertyValue>,
        position: Position,
    ) -> Self {
        self.steps.push(TimelineStep {
            action: TimelineAction::Set {
                target: target.into(),
                values,
            },
            position,
        });
        self
    }

    /// Start offset of every step
    ///
    /// `element_count` resolves how many elements each target matches so
    /// staggered tweens extend the timeline correctly.
    pub fn schedule(&self, element_count: impl Fn(&Target) -> usize) -> Vec<Duration> {
        let mut end = Duration::ZERO;
        let mut starts = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let start = step.position.resolve(end);
            let length = match &step.action {
                TimelineAction::Tween(tween) => {
                    tween.total_duration(element_count(&tween.target))
                }
                TimelineAction::Set { .. } => Duration::ZERO,
            };
            end = end.max(start + length);
            starts.push(start);
        }

        starts
    }

    /// Total length of the timeline
    pub fn duration(&self, element_count: impl Fn(&Target) -> usize) -> Duration {
        let starts = self.schedule(&element_count);
        self.steps
            .iter()
            .zip(starts)
            .map(|(step, start)| match &step.action {
                TimelineAction::Tween(tween) => {
                    start + tween.total_duration(element_count(&tween.target))
                }
                TimelineAction::Set { .. } => start,
            })
            .max()
            .unwrap_or_default()
    }

    /// Play every step and wait until the last one settles
    pub async fn play<A: Animator + ?Sized>(&self, animator: &A) {
        let starts = self.schedule(|target| animator.element_count(target));
        tracing::debug!(timeline = %self.name, steps = self.steps.len(), "Playing timeline");

        let runs = self.steps.iter().zip(starts).map(|(step, start)| async move {
            if !start.is_zero() {
                tokio::time::sleep(start).await;
            }
            match &step.action {
                TimelineAction::Tween(tween) => animator.animate(tween).await,
                TimelineAction::Set { target, values } => animator.set(target, values),
            }
        });
        join_all(runs).await;

        tracing::debug!(timeline = %self.name, "Timeline complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{secs, Property};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_sequential_and_overlap_positions() {
        let timeline = Timeline::new("suitcase")
            .then(Tween::to(".suitcase-container", ms(1500)))
            .then_at(Tween::to(".text-container", ms(800)), Position::Overlap(ms(500)))
            .then_at(
                Tween::to(".parallax-word", ms(300)).staggered(ms(100)),
                Position::Overlap(ms(300)),
            );

        let starts = timeline.schedule(|t| if t.as_str() == ".parallax-word" { 3 } else { 1 });
        assert_eq!(starts, vec![ms(0), ms(1000), ms(1500)]);
        assert_eq!(
            timeline.duration(|t| if t.as_str() == ".parallax-word" { 3 } else { 1 }),
            ms(2000)
        );
    }

    #[test]
    fn test_gap_and_set_positions() {
        let timeline = Timeline::new("reveal")
            .then(Tween::to("#polaroid", ms(2000)))
            .set_at(
                "#polaroid",
                vec![PropertyValue::scalar(Property::ZIndex, 10.0)],
                Position::Overlap(ms(1200)),
            )
            .then_at(Tween::to(".header-word", ms(400)), Position::Gap(ms(200)));

        let starts = timeline.schedule(|_| 1);
        assert_eq!(starts, vec![ms(0), ms(800), ms(2200)]);
    }

    #[test]
    fn test_overlap_clamps_at_zero() {
        let timeline = Timeline::new("clamp")
            .then(Tween::to("a", ms(100)))
            .then_at(Tween::to("b", ms(100)), Position::Overlap(ms(500)));
        assert_eq!(timeline.schedule(|_| 1), vec![ms(0), ms(0)]);
    }

    #[test]
    fn test_empty_timeline_has_zero_duration() {
        assert_eq!(Timeline::new("empty").duration(|_| 1), Duration::ZERO);
        assert_eq!(secs(0.0), Duration::ZERO);
    }
}
