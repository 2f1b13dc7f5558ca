//! Point and moving-average sampling of a [`Curve`].
//!
//! Point sampling blends neighbouring control points with a smoothstep so the
//! actuator never sees a slope discontinuity. Windowed sampling integrates
//! the literal piecewise-linear curve in closed form, one trapezoid per
//! control-point pair, and divides by the window width.

use super::{
    Curve, Point,
    math::{integrate_linear, map_linear, smoothstep},
};

impl Curve {
    /// Amplitude at `position`, held flat before the first and after the last point.
    pub fn sample_at(&self, position: f64) -> f64 {
        debug_assert!(position.is_finite(), "curve position must be finite");

        let index = self.locate(position);
        let point = self.points[index];
        let Some(&next) = self.points.get(index + 1) else {
            return point.y;
        };

        let span = next.x - point.x;
        if span <= 0.0 {
            // Vertical step: the later point wins once the position reaches it.
            return if position >= next.x { next.y } else { point.y };
        }

        let t = ((position - point.x) / span).clamp(0.0, 1.0);
        point.y + smoothstep(t) * (next.y - point.y)
    }

    /// Average amplitude over a window of `window_size` seconds centred on
    /// `position`. A zero window falls back to [`Curve::sample_at`].
    ///
    /// The result is not clamped.
    pub fn sample_windowed(&self, position: f64, window_size: f64) -> f64 {
        debug_assert!(position.is_finite(), "curve position must be finite");
        debug_assert!(
            window_size.is_finite() && window_size >= 0.0,
            "window size must be finite and non-negative"
        );

        if window_size == 0.0 {
            return self.sample_at(position);
        }

        let half = window_size / 2.0;
        self.area_between(position - half, position + half) / window_size
    }

    /// Exact area under the piecewise-linear curve from `start` to `end`.
    /// Outside its points the curve continues flat at the nearest endpoint.
    pub fn area_between(&self, start: f64, end: f64) -> f64 {
        debug_assert!(start <= end, "area bounds are reversed");

        let head = self.first();
        let mut area = 0.0;
        let mut start = start;
        if start < head.x {
            let lead_end = end.min(head.x);
            area += head.y * (lead_end - start);
            start = lead_end;
            if start >= end {
                return area;
            }
        }

        let first = self.locate(start);
        let last = self.locate(end);
        if first == last {
            return area + self.partial_area(first, start, end);
        }

        area += self.partial_area(first, start, self.points[first + 1].x);
        for i in first + 1..last {
            area += integrate_linear(self.points[i], self.points[i + 1]);
        }
        area + self.partial_area(last, self.points[last].x, end)
    }

    /// Area of the interval starting at `index` between `from` and `to`,
    /// both of which lie inside that interval.
    fn partial_area(&self, index: usize, from: f64, to: f64) -> f64 {
        let p1 = self.points[index];
        let Some(&p2) = self.points.get(index + 1) else {
            return p1.y * (to - from);
        };

        let a = Point::new(from, line_at(p1, p2, from));
        let b = Point::new(to, line_at(p1, p2, to));
        integrate_linear(a, b)
    }
}

fn line_at(p1: Point, p2: Point, x: f64) -> f64 {
    if p2.x <= p1.x {
        return p2.y;
    }
    map_linear(x, p1.x, p2.x, p1.y, p2.y)
}
