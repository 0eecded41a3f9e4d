//! Software RGBA surfaces for the mask and the overlay.
//!
//! Drawing coordinates are CSS pixels; the backing store is sized in device
//! pixels (`css * scale`, floored). A pixel is painted when its centre falls
//! inside a shape, so masks are binary.

use super::bands::Point;
use crate::palette::Rgba;
use thiserror::Error;

/// Largest backing store accepted, in device pixels.
pub const MAX_SURFACE_PIXELS: usize = 32 * 1024 * 1024;

const MASK_INK: Rgba = Rgba::opaque(255, 255, 255);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface has no area ({width}x{height} device px)")]
    Empty { width: usize, height: usize },

    #[error("Surface of {width}x{height} device px exceeds the {max} pixel budget")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

fn device_extent(css: f64, scale: f64) -> usize {
    let px = css * scale;
    if px.is_finite() && px > 0.0 {
        px.floor() as usize
    } else {
        0
    }
}

/// A device-pixel RGBA buffer addressed in CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: usize,
    height: usize,
    scale: f64,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// A fully transparent surface for a `css_width` x `css_height` area at
    /// `scale` device pixels per CSS pixel.
    pub fn new(css_width: f64, css_height: f64, scale: f64) -> Result<Self, SurfaceError> {
        let width = device_extent(css_width, scale);
        let height = device_extent(css_height, scale);
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty { width, height });
        }
        match width.checked_mul(height) {
            Some(area) if area <= MAX_SURFACE_PIXELS => Ok(Self {
                width,
                height,
                scale,
                pixels: vec![Rgba::TRANSPARENT; area],
            }),
            _ => Err(SurfaceError::TooLarge {
                width,
                height,
                max: MAX_SURFACE_PIXELS,
            }),
        }
    }

    /// Width in device pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn clear(&mut self) {
        self.fill(Rgba::TRANSPARENT);
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Paint a round-capped line from `from` to `to` with total width
    /// `thickness`, all in CSS pixels.
    pub fn stroke_capsule(&mut self, from: Point, to: Point, thickness: f64) {
        let radius = thickness / 2.0;
        if radius.is_nan() || radius <= 0.0 {
            return;
        }

        let css_bounds = (
            from.x.min(to.x) - radius,
            from.y.min(to.y) - radius,
            from.x.max(to.x) + radius,
            from.y.max(to.y) + radius,
        );
        let Some((x0, y0, x1, y1)) = self.device_bounds(css_bounds) else {
            return;
        };

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length_sq = dx * dx + dy * dy;
        let radius_sq = radius * radius;

        for py in y0..y1 {
            let cy = (py as f64 + 0.5) / self.scale;
            let row = py * self.width;
            for px in x0..x1 {
                let cx = (px as f64 + 0.5) / self.scale;
                let along = if length_sq > 0.0 {
                    (((cx - from.x) * dx + (cy - from.y) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nx = from.x + along * dx - cx;
                let ny = from.y + along * dy - cy;
                if nx * nx + ny * ny <= radius_sq {
                    self.pixels[row + px] = MASK_INK;
                }
            }
        }
    }

    /// Clip a CSS-pixel box to the half-open device-pixel range it touches.
    fn device_bounds(
        &self,
        (left, top, right, bottom): (f64, f64, f64, f64),
    ) -> Option<(usize, usize, usize, usize)> {
        let clip = |v: f64, max: usize| -> usize {
            if v <= 0.0 {
                0
            } else {
                (v.min(max as f64)) as usize
            }
        };
        let x0 = clip((left * self.scale).floor(), self.width);
        let y0 = clip((top * self.scale).floor(), self.height);
        let x1 = clip((right * self.scale).ceil(), self.width);
        let y1 = clip((bottom * self.scale).ceil(), self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Destination-in: keep this surface's pixels only where `mask` is
    /// painted; everything else becomes transparent. Pixels outside the
    /// mask's bounds count as unpainted.
    pub fn keep_where(&mut self, mask: &Surface) {
        for y in 0..self.height {
            for x in 0..self.width {
                let covered = mask
                    .pixel(x, y)
                    .map(|p| !p.is_transparent())
                    .unwrap_or(false);
                if !covered {
                    self.pixels[y * self.width + x] = Rgba::TRANSPARENT;
                }
            }
        }
    }

    /// Pixel at device coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fraction of non-transparent pixels.
    pub fn coverage(&self) -> f64 {
        let painted = self.pixels.iter().filter(|p| !p.is_transparent()).count();
        painted as f64 / self.pixels.len() as f64
    }

    pub fn is_clear(&self) -> bool {
        self.pixels.iter().all(Rgba::is_transparent)
    }
}
