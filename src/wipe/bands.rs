//! Band geometry for the herringbone sweep.
//!
//! The viewport is cut into `count` equal horizontal bands. Even bands sweep
//! left to right, odd bands right to left. Each band is drawn as one thick,
//! round-capped stroke, padded vertically so that a tilted band still covers
//! its whole strip, and tilted so the strokes read as brush marks.
//!
//! Everything here is a pure function of (index, count, progress, size).

use super::easing::CubicBezier;
use serde::{Deserialize, Serialize};

const OVERLAP_RATIO: f64 = 0.18;
const OVERLAP_MIN_PX: f64 = 4.0;
const OVERLAP_MAX_PX: f64 = 22.0;

const TILT_RATIO: f64 = 0.12;
const TILT_MIN_PX: f64 = 3.0;
const TILT_MAX_PX: f64 = 20.0;

/// A point in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepDirection {
    LeftToRight,
    RightToLeft,
}

impl SweepDirection {
    pub fn for_band(index: usize) -> Self {
        if index % 2 == 0 {
            Self::LeftToRight
        } else {
            Self::RightToLeft
        }
    }
}

/// Vertical placement of one band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandLayout {
    pub index: usize,
    /// Unpadded strip height, `height / count`.
    pub base_height: f64,
    /// Padding added above and below the strip.
    pub overlap: f64,
    /// Stroke thickness: `base_height + 2 * overlap`.
    pub thickness: f64,
    /// Top of the padded band at `x = 0` before tilt.
    pub top: f64,
    /// Signed vertical drop across the full width.
    pub slope: f64,
}

impl BandLayout {
    pub fn new(index: usize, count: usize, height: f64) -> Self {
        let base_height = height / count.max(1) as f64;
        let overlap = (base_height * OVERLAP_RATIO).clamp(OVERLAP_MIN_PX, OVERLAP_MAX_PX);
        let thickness = base_height + overlap * 2.0;
        let tilt = (thickness * TILT_RATIO).clamp(TILT_MIN_PX, TILT_MAX_PX);
        let slope = match SweepDirection::for_band(index) {
            SweepDirection::LeftToRight => tilt,
            SweepDirection::RightToLeft => -tilt,
        };

        Self {
            index,
            base_height,
            overlap,
            thickness,
            top: index as f64 * base_height - overlap,
            slope,
        }
    }

    pub fn tilt(&self) -> f64 {
        self.slope.abs()
    }

    pub fn cap_radius(&self) -> f64 {
        self.thickness / 2.0
    }

    /// Stroke centreline height at column `x`. Extrapolates beyond
    /// `[0, width]` so off-screen caps stay on the line.
    pub fn centerline_y(&self, x: f64, width: f64) -> f64 {
        let drift = if width > 0.0 { x / width * self.slope } else { 0.0 };
        self.top + drift + self.thickness / 2.0
    }

    /// Vertical span the stroke body covers at column `x`.
    ///
    /// Conservative: a tilted stroke is slightly taller than its thickness
    /// when cut vertically.
    pub fn vertical_extent(&self, x: f64, width: f64) -> (f64, f64) {
        let center = self.centerline_y(x, width);
        let half = self.thickness / 2.0;
        (center - half, center + half)
    }

    /// The unpadded strip `[i * h, (i + 1) * h]` this band must cover.
    pub fn strip(&self) -> (f64, f64) {
        let top = self.index as f64 * self.base_height;
        (top, top + self.base_height)
    }
}

/// A stroke to draw on the mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandStroke {
    pub start: Point,
    pub end: Point,
    pub thickness: f64,
}

impl BandStroke {
    pub fn radius(&self) -> f64 {
        self.thickness / 2.0
    }
}

/// Stroke for band `index` at band progress `progress`, or `None` when the
/// band has not started (no dot is left at the edge).
///
/// The sweep runs one cap radius past each edge so the round ends start and
/// finish off-screen.
pub fn band_stroke(
    index: usize,
    count: usize,
    progress: f64,
    width: f64,
    height: f64,
) -> Option<BandStroke> {
    let p = progress.clamp(0.0, 1.0);
    if p.is_nan() || p <= 0.0 {
        return None;
    }

    let layout = BandLayout::new(index, count, height);
    let cap = layout.cap_radius();
    let sweep = width + cap * 2.0;

    let (x_start, x_end) = match SweepDirection::for_band(index) {
        SweepDirection::LeftToRight => (-cap, -cap + p * sweep),
        SweepDirection::RightToLeft => (width + cap, width + cap - p * sweep),
    };

    Some(BandStroke {
        start: Point {
            x: x_start,
            y: layout.centerline_y(x_start, width),
        },
        end: Point {
            x: x_end,
            y: layout.centerline_y(x_end, width),
        },
        thickness: layout.thickness,
    })
}

/// Per-band progress for an eased global progress.
///
/// `eased * count` splits into a whole part (bands fully revealed) and a
/// fractional part (progress of the band currently sweeping).
///
/// ```rust
/// use themewipe::wipe::band_progress;
///
/// assert_eq!(band_progress(0.0, 4), vec![0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(band_progress(0.625, 4), vec![1.0, 1.0, 0.5, 0.0]);
/// assert_eq!(band_progress(1.0, 4), vec![1.0, 1.0, 1.0, 1.0]);
/// ```
pub fn band_progress(eased: f64, count: usize) -> Vec<f64> {
    let eased = if eased.is_nan() { 0.0 } else { eased.clamp(0.0, 1.0) };
    let position = eased * count as f64;
    let active = position.floor();
    let fraction = position - active;
    let active = active as usize;

    (0..count)
        .map(|i| match i.cmp(&active) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => fraction,
            std::cmp::Ordering::Greater => 0.0,
        })
        .collect()
}

/// Snapshot of one animation tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrameState {
    /// Linear progress in `[0, 1]`.
    pub t: f64,
    pub eased: f64,
    /// Progress of each band in `[0, 1]`.
    pub bands: Vec<f64>,
}

impl AnimationFrameState {
    pub fn at(t: f64, easing: &CubicBezier, count: usize) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let eased = easing.ease(t);
        Self {
            t,
            eased,
            bands: band_progress(eased, count),
        }
    }

    /// Every band fully revealed.
    pub fn complete(count: usize) -> Self {
        Self {
            t: 1.0,
            eased: 1.0,
            bands: vec![1.0; count],
        }
    }

    /// Bands at progress 1.
    pub fn revealed_bands(&self) -> usize {
        self.bands.iter().filter(|&&p| p >= 1.0).count()
    }

    /// Mean band progress in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        if self.bands.is_empty() {
            return 0.0;
        }
        self.bands.iter().sum::<f64>() / self.bands.len() as f64
    }
}
