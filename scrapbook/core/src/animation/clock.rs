//! Clock-driven animator
//!
//! Samples tweens on a fixed frame interval using the tokio clock and writes
//! the eased values into a shared [`PropertyStore`]. Used for headless replay
//! and for tests, where a paused tokio clock makes playback deterministic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Animator, Playhead, Property, PropertyValue, Target, Tween, Unit};

/// Default frame interval (60 fps)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

type PropertyKey = (Target, usize, Property);

/// Current value of every animated property, per matched element
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    values: Arc<Mutex<HashMap<PropertyKey, PropertyValue>>>,
}

impl PropertyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a property on one matched element
    #[must_use]
    pub fn get(&self, target: &Target, element: usize, property: Property) -> Option<PropertyValue> {
        self.values
            .lock()
            .get(&(target.clone(), element, property))
            .copied()
    }

    /// Write a property on one matched element
    pub fn put(&self, target: &Target, element: usize, value: PropertyValue) {
        self.values
            .lock()
            .insert((target.clone(), element, value.property), value);
    }

    /// Number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Whether nothing has been written yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

/// Animator that plays tweens against the tokio clock
#[derive(Debug)]
pub struct ClockAnimator {
    store: PropertyStore,
    frame_interval: Duration,
    element_counts: Mutex<HashMap<Target, usize>>,
}

impl Default for ClockAnimator {
    fn default() -> Self {
        Self::new(PropertyStore::new())
    }
}

impl ClockAnimator {
    /// Create an animator writing into `store`
    #[must_use]
    pub fn new(store: PropertyStore) -> Self {
        Self {
            store,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            element_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Set the sampling interval
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Declare how many elements a selector matches
    #[must_use]
    pub fn with_elements(self, target: impl Into<Target>, count: usize) -> Self {
        self.element_counts.lock().insert(target.into(), count.max(1));
        self
    }

    /// The store values are written to
    #[must_use]
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Resolve start/end pairs for one element
    fn endpoints(&self, tween: &Tween, element: usize) -> Vec<(PropertyValue, PropertyValue)> {
        tween
            .to
            .iter()
            .map(|end| {
                let start = tween
                    .start_value(end.property)
                    .or_else(|| self.store.get(&tween.target, element, end.property))
                    .unwrap_or_else(|| resting_value(end.property, end.unit));
                (start, *end)
            })
            .collect()
    }

    /// Apply start values that have no matching end value
    fn apply_unmatched_starts(&self, tween: &Tween, count: usize) {
        let unmatched: Vec<_> = tween
            .from
            .iter()
            .filter(|start| tween.to.iter().all(|end| end.property != start.property))
            .copied()
            .collect();
        for element in 0..count {
            for value in &unmatched {
                self.store.put(&tween.target, element, *value);
            }
        }
    }

    fn write_frame(
        &self,
        tween: &Tween,
        element: usize,
        endpoints: &[(PropertyValue, PropertyValue)],
        progress: f32,
    ) {
        let eased = tween.easing.apply(progress);
        for (start, end) in endpoints {
            let value = start.value + (end.value - start.value) * eased;
            self.store.put(
                &tween.target,
                element,
                PropertyValue {
                    property: end.property,
                    value,
                    unit: end.unit,
                },
            );
        }
    }
}

/// Value a property has before anything animates it
fn resting_value(property: Property, unit: Unit) -> PropertyValue {
    let value = match property {
        Property::Opacity | Property::Scale => 1.0,
        Property::X | Property::Y | Property::Top | Property::ZIndex => 0.0,
    };
    PropertyValue {
        property,
        value,
        unit,
    }
}

#[async_trait]
impl Animator for ClockAnimator {
    async fn animate(&self, tween: &Tween) {
        let count = self.element_count(&tween.target);
        let total = tween.total_duration(count);

        self.apply_unmatched_starts(tween, count);
        let endpoints: Vec<_> = (0..count).map(|i| self.endpoints(tween, i)).collect();
        let mut playheads: Vec<_> = (0..count)
            .map(|_| Playhead::new(tween.duration, tween.repeat, tween.yoyo))
            .collect();

        tracing::trace!(
            target_selector = %tween.target,
            elements = count,
            total_ms = total.as_millis() as u64,
            "Tween started"
        );

        let started = tokio::time::Instant::now();
        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let elapsed = started.elapsed().min(total);

            for (i, playhead) in playheads.iter_mut().enumerate() {
                let offset = tween.stagger * u32::try_from(i).unwrap_or(u32::MAX);
                let local = elapsed.saturating_sub(offset);
                playhead.seek(local);
                // Staggered elements hold their start values until their turn
                if local.is_zero() && !playhead.is_complete() {
                    self.write_frame(tween, i, &endpoints[i], 0.0);
                    continue;
                }
                self.write_frame(tween, i, &endpoints[i], playhead.progress());
            }

            if elapsed >= total {
                break;
            }
        }
    }

    fn set(&self, target: &Target, values: &[PropertyValue]) {
        let count = self.element_count(target);
        for element in 0..count {
            for value in values {
                self.store.put(target, element, *value);
            }
        }
    }

    fn element_count(&self, target: &Target) -> usize {
        self.element_counts.lock().get(target).copied().unwrap_or(1)
    }
}
