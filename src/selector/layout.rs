//! Dot placement for the palette selector.
//!
//! Closed, the dots sit on a small ring inside a 72 px board. Open, the
//! current entry sits at the centre and the rest fan out on two arcs up and
//! to the left, scaled so the open board fills a fixed share of the
//! viewport's smaller side.

use crate::config::SelectorConfig;
use crate::host::Viewport;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

pub const RING_RADIUS: f64 = 18.0;
pub const DOT_SIZE_OPEN: f64 = 40.0;
pub const ARC_GAP: f64 = 8.0;
pub const ARC_INNER_RADIUS: f64 = ARC_GAP + DOT_SIZE_OPEN;
pub const ARC_OUTER_RADIUS: f64 = ARC_INNER_RADIUS + DOT_SIZE_OPEN + ARC_GAP;
pub const BOARD_CLOSED_SIZE: f64 = 72.0;
pub const BOARD_OPEN_PADDING: f64 = 12.0;
/// Diameter of the open board before viewport scaling.
pub const BOARD_OPEN_SIZE_UNSCALED: f64 = 256.0;
/// Closed-board dot diameter.
pub const SPECK_SIZE: f64 = 13.0;

const INNER_ARC: (f64, f64) = (-PI * 0.9, -PI * 0.6);
const OUTER_ARC: (f64, f64) = (-PI * 0.92, -PI * 0.58);
/// Entries `1..=INNER_ARC_LEN` sit on the inner arc, every later entry on
/// the outer arc. Entry 5 belongs to the outer arc, not the inner one.
const INNER_ARC_LEN: usize = 2;

const OPEN_STAGGER: Duration = Duration::from_millis(40);
const CLOSE_STAGGER: Duration = Duration::from_millis(10);

/// Offset from the board centre in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Position = Position { x: 0.0, y: 0.0 };

    fn polar(radius: f64, theta: f64) -> Self {
        Self {
            x: radius * theta.cos(),
            y: radius * theta.sin(),
        }
    }

    pub fn distance_from_center(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Which part of the open layout an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcGroup {
    Center,
    Inner,
    Outer,
}

impl ArcGroup {
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Center,
            i if i <= INNER_ARC_LEN => Self::Inner,
            _ => Self::Outer,
        }
    }

    /// Stagger level: the outer arc trails the inner one.
    fn level(&self) -> u32 {
        match self {
            Self::Center | Self::Inner => 0,
            Self::Outer => 1,
        }
    }
}

/// Closed-ring position: evenly spaced, rotated by π/6.
pub fn closed_ring_target(index: usize, count: usize) -> Position {
    let angle = 2.0 * PI * index as f64 / count.max(1) as f64 + PI / 6.0;
    Position::polar(RING_RADIUS, angle)
}

/// Place slot `j` of `group` slots along an arc; a lone slot takes the middle.
fn arc_target(j: usize, group: usize, radius: f64, (start, end): (f64, f64)) -> Position {
    let t = if group <= 1 {
        0.5
    } else {
        j as f64 / (group - 1) as f64
    };
    Position::polar(radius, start + t * (end - start))
}

/// Open-layout position of entry `index` out of `count`.
pub fn open_arc_target(index: usize, count: usize, sizing: &ScaledSizing) -> Position {
    match ArcGroup::for_index(index) {
        ArcGroup::Center => Position::CENTER,
        ArcGroup::Inner => {
            let group = count.saturating_sub(1).min(INNER_ARC_LEN);
            arc_target(index - 1, group, sizing.inner_radius, INNER_ARC)
        }
        ArcGroup::Outer => {
            let group = count.saturating_sub(INNER_ARC_LEN + 1);
            arc_target(index - INNER_ARC_LEN - 1, group, sizing.outer_radius, OUTER_ARC)
        }
    }
}

/// Open-board geometry scaled to the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaledSizing {
    pub open_scale: f64,
    pub dot_size: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub padding: f64,
    /// Open board diameter, rounded up to whole pixels.
    pub board_open_size: f64,
    /// How far the board's origin moves so the open board stays centred on
    /// the closed one.
    pub board_center_shift: f64,
    /// Dot scale on the closed board so open-size dots shrink to specks.
    pub speck_scale: f64,
}

impl ScaledSizing {
    pub fn for_viewport(viewport: &Viewport, config: &SelectorConfig) -> Self {
        let side = viewport.min_side().max(0.0);
        let visible = (side * config.open_visible_fraction).min(config.open_visible_max_px);
        let open_scale = 2.0 * visible / BOARD_OPEN_SIZE_UNSCALED;

        let dot_size = DOT_SIZE_OPEN * open_scale;
        let inner_radius = ARC_INNER_RADIUS * open_scale;
        let outer_radius = ARC_OUTER_RADIUS * open_scale;
        let padding = BOARD_OPEN_PADDING * open_scale;
        let board_open_size = ((outer_radius + dot_size / 2.0 + padding) * 2.0).ceil();

        Self {
            open_scale,
            dot_size,
            inner_radius,
            outer_radius,
            padding,
            board_open_size,
            board_center_shift: (board_open_size - BOARD_CLOSED_SIZE) / 2.0,
            // A degenerate viewport has no open dots to shrink.
            speck_scale: if dot_size > 0.0 { SPECK_SIZE / dot_size } else { 0.0 },
        }
    }
}

/// Animation delay for entry `index` when the board opens or closes.
pub fn stagger_delay(index: usize, opening: bool, reduced_motion: bool) -> Duration {
    if reduced_motion || index == 0 {
        return Duration::ZERO;
    }
    let step = if opening { OPEN_STAGGER } else { CLOSE_STAGGER };
    step * ArcGroup::for_index(index).level()
}

/// Where one dot should be, how big, and after what delay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotTarget {
    pub position: Position,
    /// 1 on the open board, [`ScaledSizing::speck_scale`] when closed.
    pub scale: f64,
    pub delay: Duration,
}

/// Targets for `count` dots in the given board state.
pub fn layout_targets(
    count: usize,
    open: bool,
    sizing: &ScaledSizing,
    reduced_motion: bool,
) -> Vec<DotTarget> {
    (0..count)
        .map(|i| DotTarget {
            position: if open {
                open_arc_target(i, count, sizing)
            } else {
                closed_ring_target(i, count)
            },
            scale: if open { 1.0 } else { sizing.speck_scale },
            delay: stagger_delay(i, open, reduced_motion),
        })
        .collect()
}
