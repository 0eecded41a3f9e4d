//! Tunable constants for every coordinator.
//!
//! Defaults reproduce the shipped behavior: an 8-band, 1300 ms wipe eased by
//! `cubic-bezier(0.4, 0, 0.2, 1)` with the pixel ratio capped at 2, a 500 ms
//! hold and 500 ms fade between routes, and a 2.4 s selection cool-down.
//!
//! Validation uses stillwater's `Validation` so a bad configuration reports
//! every broken rule at once.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use themewipe::config::TransitionConfigBuilder;
//!
//! let config = TransitionConfigBuilder::new()
//!     .band_count(12)
//!     .wipe_duration(Duration::from_millis(900))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.wipe.band_count, 12);
//!
//! let err = TransitionConfigBuilder::new()
//!     .band_count(0)
//!     .dpr_cap(-1.0)
//!     .build()
//!     .unwrap_err();
//! assert!(err.to_string().contains("2 violation"));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Largest accepted band count.
pub const MAX_BAND_COUNT: usize = 64;
/// Largest accepted device-pixel-ratio cap.
pub const MAX_DPR_CAP: f64 = 4.0;

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Wipe animation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WipeConfig {
    pub duration_ms: u64,
    pub band_count: usize,
    /// Upper bound on the device pixel ratio used for the surfaces.
    pub dpr_cap: f64,
    /// Cubic Bézier control points `[x1, y1, x2, y2]`.
    pub easing: [f64; 4],
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1300,
            band_count: 8,
            dpr_cap: 2.0,
            easing: [0.4, 0.0, 0.2, 1.0],
        }
    }
}

impl WipeConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Copy with every field forced into its accepted range. Lets a
    /// renderer survive a struct literal that never went through
    /// [`TransitionConfig::checked`].
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let dpr_cap = if self.dpr_cap.is_finite() && self.dpr_cap > 0.0 {
            self.dpr_cap.min(MAX_DPR_CAP)
        } else {
            defaults.dpr_cap
        };
        let easing = if self.easing.iter().all(|v| v.is_finite()) {
            let [x1, y1, x2, y2] = self.easing;
            [x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2]
        } else {
            defaults.easing
        };
        Self {
            duration_ms: self.duration_ms.max(1),
            band_count: self.band_count.clamp(1, MAX_BAND_COUNT),
            dpr_cap,
            easing,
        }
    }
}

/// Route fade timings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteFadeConfig {
    /// How long the previous content stays on screen after navigation.
    pub hold_ms: u64,
    pub fade_in_ms: u64,
}

impl Default for RouteFadeConfig {
    fn default() -> Self {
        Self {
            hold_ms: 500,
            fade_in_ms: 500,
        }
    }
}

impl RouteFadeConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    /// Both durations are zero: every navigation swaps instantly.
    pub fn is_instant(&self) -> bool {
        self.hold_ms == 0 && self.fade_in_ms == 0
    }
}

/// Palette selector settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selections are ignored for this long after one fires.
    pub cooldown_ms: u64,
    /// Selections are ignored for this long after the selector opens.
    pub open_guard_ms: u64,
    /// Fraction of the viewport's smaller side the open board may use.
    pub open_visible_fraction: f64,
    /// Cap on the open board's visible radius in CSS pixels.
    pub open_visible_max_px: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 2400,
            open_guard_ms: 500,
            open_visible_fraction: 0.7,
            open_visible_max_px: 280.0,
        }
    }
}

impl SelectorConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn open_guard(&self) -> Duration {
        Duration::from_millis(self.open_guard_ms)
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub wipe: WipeConfig,
    pub route_fade: RouteFadeConfig,
    pub selector: SelectorConfig,
}

type Checked = Validation<(), NonEmptyVec<ConfigViolation>>;

fn require(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Checked {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

impl TransitionConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.checked()
    }

    /// Run every rule, accumulating all violations.
    pub fn validate(&self) -> Checked {
        let wipe = &self.wipe;
        let selector = &self.selector;
        // Only x must stay in [0, 1] for the curve to be a function of time;
        // y may overshoot.
        let [x1, _, x2, _] = wipe.easing;

        let checks = vec![
            require(
                (1..=MAX_BAND_COUNT).contains(&wipe.band_count),
                || ConfigViolation::BandCount {
                    count: wipe.band_count,
                    max: MAX_BAND_COUNT,
                },
            ),
            require(wipe.duration_ms > 0, || ConfigViolation::ZeroWipeDuration),
            require(wipe.dpr_cap > 0.0 && wipe.dpr_cap <= MAX_DPR_CAP, || {
                ConfigViolation::PixelRatioCap(wipe.dpr_cap)
            }),
            require(wipe.easing.iter().all(|v| v.is_finite()), || {
                ConfigViolation::NonFiniteEasing
            }),
            require(
                !(x1.is_finite() && x2.is_finite())
                    || ((0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2)),
                || ConfigViolation::EasingOutOfRange { x1, x2 },
            ),
            require(
                selector.open_visible_fraction > 0.0 && selector.open_visible_fraction <= 1.0,
                || ConfigViolation::VisibleFraction(selector.open_visible_fraction),
            ),
            require(selector.open_visible_max_px > 0.0, || {
                ConfigViolation::VisibleMax(selector.open_visible_max_px)
            }),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// `self` if valid, otherwise every violation.
    pub fn checked(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }
}

/// Fluent builder for [`TransitionConfig`].
#[derive(Clone, Debug, Default)]
pub struct TransitionConfigBuilder {
    config: TransitionConfig,
}

impl TransitionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wipe_duration(mut self, duration: Duration) -> Self {
        self.config.wipe.duration_ms = millis(duration);
        self
    }

    pub fn band_count(mut self, count: usize) -> Self {
        self.config.wipe.band_count = count;
        self
    }

    pub fn dpr_cap(mut self, cap: f64) -> Self {
        self.config.wipe.dpr_cap = cap;
        self
    }

    pub fn easing(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.config.wipe.easing = [x1, y1, x2, y2];
        self
    }

    pub fn hold(mut self, duration: Duration) -> Self {
        self.config.route_fade.hold_ms = millis(duration);
        self
    }

    pub fn fade_in(mut self, duration: Duration) -> Self {
        self.config.route_fade.fade_in_ms = millis(duration);
        self
    }

    pub fn cooldown(mut self, duration: Duration) -> Self {
        self.config.selector.cooldown_ms = millis(duration);
        self
    }

    pub fn open_guard(mut self, duration: Duration) -> Self {
        self.config.selector.open_guard_ms = millis(duration);
        self
    }

    pub fn open_visible(mut self, fraction: f64, max_px: f64) -> Self {
        self.config.selector.open_visible_fraction = fraction;
        self.config.selector.open_visible_max_px = max_px;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<TransitionConfig, ConfigError> {
        self.config.checked()
    }
}
