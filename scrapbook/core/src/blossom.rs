//! Cherry Blossom Toggle
//!
//! The petal switch shown on the cherry-blossom slide. Switching it on
//! generates the petal field (once) and starts the fall; the companion text
//! hides while petals are active.

use std::fmt::Write as _;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::stage::{Stage, StageElement};

/// Number of petals in a field
pub const PETAL_COUNT: usize = 70;

/// Three-stop petal gradient
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PetalGradient {
    /// Stop at 0%
    pub start: &'static str,
    /// Stop at 50%
    pub mid: &'static str,
    /// Stop at 100%
    pub end: &'static str,
}

/// Gradient variants a petal can use
pub const PETAL_GRADIENTS: [PetalGradient; 3] = [
    PetalGradient {
        start: "#FFB7C5",
        mid: "#FFC0CB",
        end: "#FFE4E8",
    },
    PetalGradient {
        start: "#FFAABB",
        mid: "#FFB5C5",
        end: "#FFDDE5",
    },
    PetalGradient {
        start: "#FFC4D0",
        mid: "#FFD0DC",
        end: "#FFF0F3",
    },
];

/// Parameters of one falling petal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalSpec {
    /// Horizontal start, percent of the container
    pub left: f32,
    /// Fall duration in seconds
    pub fall_duration: f32,
    /// Delay before falling, seconds
    pub fall_delay: f32,
    /// Peak opacity
    pub opacity: f32,
    /// Width in pixels (height is 1.2x)
    pub size: f32,
    /// Horizontal sway in pixels
    pub sway: f32,
    /// Initial rotation in degrees
    pub rotation_start: f32,
    /// Index into [`PETAL_GRADIENTS`]
    pub variant: usize,
    /// Flutter cycle in seconds
    pub flutter_duration: f32,
}

impl PetalSpec {
    /// Draw a random petal
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left: rng.gen_range(0.0..100.0),
            fall_duration: rng.gen_range(6.0..11.0),
            fall_delay: rng.gen_range(0.0..5.0),
            opacity: rng.gen_range(0.6..1.0),
            size: rng.gen_range(8.0..20.0),
            sway: rng.gen_range(30.0..110.0),
            rotation_start: rng.gen_range(0.0..360.0),
            variant: rng.gen_range(0..PETAL_GRADIENTS.len()),
            flutter_duration: rng.gen_range(1.5..2.5),
        }
    }

    /// Gradient this petal uses
    #[must_use]
    pub fn gradient(&self) -> PetalGradient {
        PETAL_GRADIENTS[self.variant % PETAL_GRADIENTS.len()]
    }

    /// Inline style of the falling element
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "left: {}%; width: {}px; height: {}px; animation-duration: {}s; \
             animation-delay: {}s; --petal-opacity: {}; --sway-amount: {}px; \
             --rotation-start: {}deg",
            self.left,
            self.size,
            self.size * 1.2,
            self.fall_duration,
            self.fall_delay,
            self.opacity,
            self.sway,
            self.rotation_start,
        )
    }

    /// SVG markup for petal `id`
    #[must_use]
    pub fn svg(&self, id: usize) -> String {
        let colors = self.gradient();
        let mut svg = String::from(r#"<svg viewBox="0 0 20 24"><defs>"#);
        let _ = write!(
            svg,
            r#"<linearGradient id="petalGrad{id}" x1="0%" y1="0%" x2="100%" y2="100%">"#
        );
        let _ = write!(
            svg,
            r#"<stop offset="0%" stop-color="{}" /><stop offset="50%" stop-color="{}" /><stop offset="100%" stop-color="{}" />"#,
            colors.start, colors.mid, colors.end
        );
        svg.push_str("</linearGradient></defs>");
        let _ = write!(
            svg,
            r#"<path d="M10 0 Q20 8 15 16 Q12 22 10 24 Q8 22 5 16 Q0 8 10 0" fill="url(#petalGrad{id})"/>"#
        );
        let _ = write!(
            svg,
            r#"<path d="M10 2 Q10 12 10 22" stroke="{}" stroke-width="0.5" fill="none" opacity="0.4"/>"#,
            colors.start
        );
        svg.push_str("</svg>");
        svg
    }
}

/// A generated set of petals
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PetalField {
    /// Petals in document order
    pub petals: Vec<PetalSpec>,
}

impl PetalField {
    /// Generate `count` random petals
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        Self {
            petals: (0..count).map(|_| PetalSpec::random(rng)).collect(),
        }
    }

    /// Number of petals
    #[must_use]
    pub fn len(&self) -> usize {
        self.petals.len()
    }

    /// Whether the field has no petals
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.petals.is_empty()
    }
}

struct ToggleInner {
    field: Option<PetalField>,
    rng: StdRng,
}

/// The petal toggle
pub struct BlossomToggle<S: Stage> {
    stage: Arc<S>,
    inner: Mutex<ToggleInner>,
}

impl<S: Stage> BlossomToggle<S> {
    /// Create a toggle with entropy-seeded petals
    pub fn new(stage: Arc<S>) -> Self {
        Self::with_rng(stage, StdRng::from_entropy())
    }

    /// Create a toggle with reproducible petals
    pub fn seeded(stage: Arc<S>, seed: u64) -> Self {
        Self::with_rng(stage, StdRng::seed_from_u64(seed))
    }

    fn with_rng(stage: Arc<S>, rng: StdRng) -> Self {
        Self {
            stage,
            inner: Mutex::new(ToggleInner { field: None, rng }),
        }
    }

    /// Whether the toggle is on
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.stage.toggle_checked()
    }

    /// The petal field, once generated
    #[must_use]
    pub fn field(&self) -> Option<PetalField> {
        self.inner.lock().field.clone()
    }

    /// Switch petals on or off
    pub fn set_checked(&self, checked: bool) {
        self.stage.set_toggle_checked(checked);

        if checked {
            {
                let mut inner = self.inner.lock();
                if inner.field.is_none() {
                    let field = PetalField::generate(&mut inner.rng, PETAL_COUNT);
                    debug!(petals = field.len(), "Petal field generated");
                    inner.field = Some(field);
                }
            }
            self.stage.set_visible(StageElement::Petals, true);
            self.stage.set_visible(StageElement::FangirlText, false);
            info!("Petals on");
        } else {
            self.stage.set_visible(StageElement::Petals, false);
            self.stage.set_visible(StageElement::FangirlText, true);
            info!("Petals off");
        }
    }
}
