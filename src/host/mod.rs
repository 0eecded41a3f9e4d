//! Host-facing seams.
//!
//! The coordinator never owns a display loop or a timer facility. The host
//! hands out [`FrameHandle`]s and [`TimerHandle`]s, and later feeds the
//! matching [`HostEvent`]s back in. Components keep the handles they are
//! waiting on and ignore every event whose handle they no longer hold.
//!
//! [`ManualHost`] is a deterministic host for tests and headless embedders.

mod location;
mod manual;

pub use location::{Location, RouteKey};
pub use manual::ManualHost;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Visible viewport in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Viewport at a pixel ratio of 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// The smaller of width and height.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Pixel ratio clamped to `(0, cap]`; non-finite or non-positive ratios
    /// fall back to 1.
    pub fn capped_pixel_ratio(&self, cap: f64) -> f64 {
        let ratio = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        ratio.min(cap)
    }
}

/// Handle for one requested display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle for one scheduled timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Per-frame scheduling primitive.
pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Cancelling an unknown or already fired handle is
    /// a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Host timer facility.
pub trait TimerHost {
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Cancelling an unknown or already fired handle is a no-op.
    fn clear_timeout(&mut self, handle: TimerHandle);
}

/// Routing collaborator.
pub trait Router {
    /// Navigate to `href`. The host reports the resulting location change
    /// separately.
    fn navigate(&mut self, href: &str);
}

/// Everything the shell needs from its embedder.
pub trait Host: FrameScheduler + TimerHost + Router {}

impl<T: FrameScheduler + TimerHost + Router> Host for T {}

/// A callback delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A requested frame fired at host time `now`.
    Frame { handle: FrameHandle, now: Duration },
    /// A timeout fired at host time `now`.
    Timer { handle: TimerHandle, now: Duration },
}

impl HostEvent {
    pub fn now(&self) -> Duration {
        match self {
            Self::Frame { now, .. } | Self::Timer { now, .. } => *now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let vp = Viewport::new(800.0, 600.0).with_device_pixel_ratio(3.0);
        assert_eq!(vp.capped_pixel_ratio(2.0), 2.0);
        assert_eq!(vp.with_device_pixel_ratio(1.5).capped_pixel_ratio(2.0), 1.5);
    }

    #[test]
    fn bogus_pixel_ratio_falls_back_to_one() {
        let vp = Viewport::new(800.0, 600.0).with_device_pixel_ratio(f64::NAN);
        assert_eq!(vp.capped_pixel_ratio(2.0), 1.0);
        let vp = vp.with_device_pixel_ratio(-2.0);
        assert_eq!(vp.capped_pixel_ratio(2.0), 1.0);
    }

    #[test]
    fn min_side_picks_smaller_dimension() {
        assert_eq!(Viewport::new(390.0, 844.0).min_side(), 390.0);
        assert_eq!(Viewport::new(1440.0, 900.0).min_side(), 900.0);
    }
}
