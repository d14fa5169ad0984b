//! Input Normalizer
//!
//! Turns raw wheel deltas, key presses and touch swipes into a signed
//! navigation [`Intent`]. Nothing here holds state except the
//! [`SwipeTracker`], which remembers where the current touch began.
//! Malformed or irrelevant input simply yields no intent.

use crate::events::{Direction, NavKey, Point};

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe
pub const MIN_SWIPE_DISTANCE: f32 = 50.0;

/// A navigation intent: which way and how strongly
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intent {
    /// Direction of travel
    pub direction: Direction,
    /// Non-negative magnitude
    pub magnitude: f32,
}

impl Intent {
    /// A single discrete step
    #[must_use]
    pub const fn step(direction: Direction) -> Self {
        Self {
            direction,
            magnitude: 1.0,
        }
    }

    /// Magnitude carrying the direction's sign
    #[must_use]
    pub fn signed(&self) -> f32 {
        self.direction.sign() * self.magnitude
    }
}

/// Wheel delta: an intent signed by the delta
///
/// Non-finite deltas carry no intent.
#[must_use]
pub fn wheel_intent(delta_y: f32) -> Option<Intent> {
    if !delta_y.is_finite() {
        return None;
    }
    Some(Intent {
        direction: Direction::of(delta_y),
        magnitude: delta_y.abs(),
    })
}

/// Navigation keys: arrows right/down advance, left/up retreat
#[must_use]
pub fn key_intent(key: &NavKey) -> Option<Intent> {
    match key {
        NavKey::ArrowRight | NavKey::ArrowDown => Some(Intent::step(Direction::Forward)),
        NavKey::ArrowLeft | NavKey::ArrowUp => Some(Intent::step(Direction::Backward)),
        NavKey::Other(_) => None,
    }
}

/// Touch swipe between two points
///
/// Only a mostly-horizontal swipe longer than `min_distance` counts. A
/// leftward finger movement (start to the right of end) advances.
#[must_use]
pub fn swipe_intent(start: Point, end: Point, min_distance: f32) -> Option<Intent> {
    let dx = start.x - end.x;
    let dy = start.y - end.y;

    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    if dx.abs() <= dy.abs() || dx.abs() <= min_distance {
        return None;
    }

    let direction = if dx > 0.0 {
        Direction::Forward
    } else {
        Direction::Backward
    };
    Some(Intent::step(direction))
}

/// Remembers where the active touch started
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeTracker {
    start: Point,
}

impl SwipeTracker {
    /// Record a touch start
    pub fn begin(&mut self, point: Point) {
        self.start = point;
    }

    /// Position of the last touch start
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Evaluate a touch end against the recorded start
    #[must_use]
    pub fn finish(&self, end: Point, min_distance: f32) -> Option<Intent> {
        swipe_intent(self.start, end, min_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_produces_signed_intent() {
        assert_eq!(
            wheel_intent(30.0),
            Some(Intent {
                direction: Direction::Forward,
                magnitude: 30.0
            })
        );
        assert_eq!(
            wheel_intent(-12.5),
            Some(Intent {
                direction: Direction::Backward,
                magnitude: 12.5
            })
        );
        assert!((wheel_intent(-12.5).unwrap().signed() + 12.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_finite_wheel_has_no_intent() {
        assert_eq!(wheel_intent(f32::NAN), None);
        assert_eq!(wheel_intent(f32::INFINITY), None);
        assert_eq!(wheel_intent(f32::NEG_INFINITY), None);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            key_intent(&NavKey::ArrowRight),
            Some(Intent::step(Direction::Forward))
        );
        assert_eq!(
            key_intent(&NavKey::ArrowDown),
            Some(Intent::step(Direction::Forward))
        );
        assert_eq!(
            key_intent(&NavKey::ArrowLeft),
            Some(Intent::step(Direction::Backward))
        );
        assert_eq!(
            key_intent(&NavKey::ArrowUp),
            Some(Intent::step(Direction::Backward))
        );
        assert_eq!(key_intent(&NavKey::Other("Space".into())), None);
    }

    #[test]
    fn test_swipe_thresholds() {
        let origin = Point::new(200.0, 300.0);

        // Finger moved left by 60px: advance
        assert_eq!(
            swipe_intent(origin, Point::new(140.0, 295.0), MIN_SWIPE_DISTANCE),
            Some(Intent::step(Direction::Forward))
        );
        // Finger moved right by 60px (dx = -60): retreat
        assert_eq!(
            swipe_intent(origin, Point::new(260.0, 295.0), MIN_SWIPE_DISTANCE),
            Some(Intent::step(Direction::Backward))
        );
        // Exactly the minimum distance is not enough
        assert_eq!(
            swipe_intent(origin, Point::new(150.0, 300.0), MIN_SWIPE_DISTANCE),
            None
        );
        // Vertical dominant
        assert_eq!(
            swipe_intent(origin, Point::new(120.0, 200.0), MIN_SWIPE_DISTANCE),
            None
        );
        // Diagonal tie goes to vertical
        assert_eq!(
            swipe_intent(origin, Point::new(120.0, 220.0), MIN_SWIPE_DISTANCE),
            None
        );
    }

    #[test]
    fn test_malformed_swipe_is_ignored() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(
            swipe_intent(origin, Point::new(f32::NAN, 0.0), MIN_SWIPE_DISTANCE),
            None
        );
    }

    #[test]
    fn test_tracker_uses_latest_start() {
        let mut tracker = SwipeTracker::default();
        tracker.begin(Point::new(10.0, 10.0));
        tracker.begin(Point::new(300.0, 10.0));
        assert_eq!(tracker.start(), Point::new(300.0, 10.0));
        assert_eq!(
            tracker.finish(Point::new(200.0, 12.0), MIN_SWIPE_DISTANCE),
            Some(Intent::step(Direction::Forward))
        );
    }
}
