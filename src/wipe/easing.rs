//! Cubic Bézier timing curves.

/// Solver tolerance on the x axis.
const EPSILON: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 40;

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve anchored at
/// (0, 0) and (1, 1).
///
/// ```rust
/// use themewipe::wipe::CubicBezier;
///
/// let ease = CubicBezier::standard();
/// assert_eq!(ease.ease(0.0), 0.0);
/// assert!((ease.ease(1.0) - 1.0).abs() < 1e-9);
/// assert!(ease.ease(0.5) > 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicBezier {
    /// `cubic-bezier(0.4, 0, 0.2, 1)`.
    pub fn standard() -> Self {
        Self::new(0.4, 0.0, 0.2, 1.0)
    }

    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    pub fn from_points(points: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = points;
        Self::new(x1, y1, x2, y2)
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_x_derivative(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Curve parameter whose x equals `x`: Newton-Raphson first, bisection
    /// when the slope vanishes or Newton does not converge.
    fn solve_x(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = self.sample_x(t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = self.sample_x_derivative(t);
            if slope.abs() < EPSILON {
                break;
            }
            t -= error / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let estimate = self.sample_x(t);
            if (estimate - x).abs() < EPSILON {
                return t;
            }
            if estimate < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased value for progress `x`, clamped to `[0, 1]` first.
    pub fn ease(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        if x == 0.0 || x == 1.0 {
            return x;
        }
        self.sample_y(self.solve_x(x))
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        let ease = CubicBezier::standard();
        assert_eq!(ease.ease(0.0), 0.0);
        assert!((ease.ease(1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn input_is_clamped() {
        let ease = CubicBezier::standard();
        assert_eq!(ease.ease(-3.0), 0.0);
        assert!((ease.ease(7.0) - 1.0).abs() < 1e-9);
        assert_eq!(ease.ease(f64::NAN), 0.0);
    }

    #[test]
    fn linear_curve_is_identity() {
        let linear = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert!((linear.ease(x) - x).abs() < 1e-5, "x = {x}");
        }
    }

    #[test]
    fn standard_curve_is_monotonic() {
        let ease = CubicBezier::standard();
        let mut previous = 0.0;
        for i in 1..=200 {
            let y = ease.ease(i as f64 / 200.0);
            assert!(y + 1e-9 >= previous);
            previous = y;
        }
    }

    #[test]
    fn solver_hits_tolerance() {
        let ease = CubicBezier::standard();
        for i in 1..100 {
            let x = i as f64 / 100.0;
            let t = ease.solve_x(x);
            assert!((ease.sample_x(t) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn near_flat_start_still_converges() {
        // x'(0) == 0 for this curve.
        let steep = CubicBezier::new(0.0, 1.0, 1.0, 0.0);
        let t = steep.solve_x(1e-4);
        assert!((steep.sample_x(t) - 1e-4).abs() < 1e-5);
    }
}
