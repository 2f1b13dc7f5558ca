//! Piecewise-linear amplitude curves and the sampling engine that turns them
//! into a smooth actuation intensity.

pub mod math;
pub mod sampler;

use serde::{Deserialize, Serialize};

use crate::analysis::{Beat, Segment};
use crate::common::errors::CurveError;

pub use math::{decibels_to_amplitude, integrate_linear, map_linear, smoothstep};

/// Relative overshoot absorbed when flattening analysis entries into points.
const ROUNDING_SLACK: f64 = 1e-9;

/// A control point: `x` is a time in seconds, `y` an amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A non-empty sequence of points sorted by `x`. Equal neighbouring `x`
/// values are allowed and read as a vertical step.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if index > 0 && point.x < points[index - 1].x {
                return Err(CurveError::Unordered { index });
            }
        }
        Ok(Self { points })
    }

    /// Loudness envelope: one point at each segment's onset and one at its
    /// loudness peak, both converted from decibels.
    pub fn from_segments(segments: &[Segment]) -> Result<Self, CurveError> {
        Self::from_envelope(segments.iter().flat_map(|s| {
            [
                Point::new(s.start, decibels_to_amplitude(s.loudness_start)),
                Point::new(
                    s.start + s.loudness_max_time,
                    decibels_to_amplitude(s.loudness_max),
                ),
            ]
        }))
    }

    /// Beat envelope: a plateau at the beat's confidence for its whole
    /// duration, ramping linearly into the next beat.
    pub fn from_beats(beats: &[Beat]) -> Result<Self, CurveError> {
        Self::from_envelope(beats.iter().flat_map(|b| {
            [
                Point::new(b.start, b.confidence),
                Point::new(b.start + b.duration, b.confidence),
            ]
        }))
    }

    /// `start + offset` can round past the next entry's `start` even when the
    /// analysis is in order. Such an overshoot becomes a tie. Anything that
    /// still goes backwards is rejected by [`Curve::new`].
    fn from_envelope(points: impl Iterator<Item = Point>) -> Result<Self, CurveError> {
        let mut out: Vec<Point> = Vec::new();
        for mut point in points {
            if let Some(prev) = out.last()
                && point.x < prev.x
                && prev.x - point.x <= ROUNDING_SLACK * prev.x.abs().max(1.0)
            {
                point.x = prev.x;
            }
            out.push(point);
        }
        Self::new(out)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A constructed curve always holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Index of the last point whose `x` is `<= position`. Positions before
    /// the first point map to `0`, positions past the end to the last index.
    pub fn locate(&self, position: f64) -> usize {
        debug_assert!(!position.is_nan(), "curve position must not be NaN");
        self.points
            .partition_point(|p| p.x <= position)
            .saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Curve {
        Curve::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_points() {
        assert_eq!(Curve::new(Vec::new()), Err(CurveError::Empty));
        assert_eq!(
            Curve::new(vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)]),
            Err(CurveError::NonFinite { index: 1 })
        );
        assert_eq!(
            Curve::new(vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 1.0),
                Point::new(1.0, 1.0)
            ]),
            Err(CurveError::Unordered { index: 2 })
        );
    }

    #[test]
    fn test_new_accepts_ties() {
        let c = curve(&[(0.0, 0.0), (1.0, 0.5), (1.0, 1.0)]);
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
    }

    #[test]
    fn test_locate_lower_bound() {
        let c = curve(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (4.0, 1.0)]);
        assert_eq!(c.locate(-3.0), 0);
        assert_eq!(c.locate(0.0), 0);
        assert_eq!(c.locate(0.999), 0);
        assert_eq!(c.locate(1.0), 1);
        assert_eq!(c.locate(3.5), 2);
        assert_eq!(c.locate(4.0), 3);
        assert_eq!(c.locate(100.0), 3);
    }

    #[test]
    fn test_locate_picks_last_of_ties() {
        let c = curve(&[(0.0, 0.0), (1.0, 0.2), (1.0, 0.8), (2.0, 0.0)]);
        assert_eq!(c.locate(1.0), 2);
        assert_eq!(c.locate(0.5), 0);
    }

    #[test]
    fn test_locate_is_monotone() {
        let c = curve(&[(0.0, 0.0), (0.5, 1.0), (0.5, 0.3), (1.25, 0.7), (3.0, 0.1)]);
        let mut previous = 0;
        for step in -10..50 {
            let index = c.locate(step as f64 * 0.1);
            assert!(index >= previous, "locate went backwards at step {}", step);
            previous = index;
        }
    }

    #[test]
    fn test_from_segments_builds_two_points_each() {
        let segments = vec![
            Segment {
                start: 0.0,
                duration: 0.5,
                loudness_start: -20.0,
                loudness_max_time: 0.1,
                loudness_max: 0.0,
            },
            Segment {
                start: 0.5,
                duration: 0.4,
                loudness_start: -40.0,
                loudness_max_time: 0.25,
                loudness_max: -20.0,
            },
        ];
        let c = Curve::from_segments(&segments).unwrap();
        let xs: Vec<f64> = c.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.1, 0.5, 0.75]);
        assert!((c.points()[0].y - 0.1).abs() < 1e-12);
        assert!((c.points()[1].y - 1.0).abs() < 1e-12);
        assert!((c.points()[2].y - 0.01).abs() < 1e-12);
        assert!((c.points()[3].y - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_from_segments_rejects_empty_analysis() {
        assert_eq!(Curve::from_segments(&[]), Err(CurveError::Empty));
    }

    #[test]
    fn test_rounding_overshoot_becomes_tie() {
        // 0.1 + 0.2 rounds to 0.30000000000000004, just past the next start.
        let segments = vec![
            Segment {
                start: 0.1,
                duration: 0.2,
                loudness_start: -20.0,
                loudness_max_time: 0.2,
                loudness_max: 0.0,
            },
            Segment {
                start: 0.3,
                duration: 0.2,
                loudness_start: -40.0,
                loudness_max_time: 0.1,
                loudness_max: -20.0,
            },
        ];
        let c = Curve::from_segments(&segments).unwrap();
        let xs: Vec<f64> = c.points().iter().map(|p| p.x).collect();
        assert_eq!(xs[1], xs[2]);
        assert_eq!(xs[2], 0.1 + 0.2);

        let beats = vec![
            Beat {
                start: 0.1,
                duration: 0.2,
                confidence: 0.8,
            },
            Beat {
                start: 0.3,
                duration: 0.2,
                confidence: 0.4,
            },
        ];
        let c = Curve::from_beats(&beats).unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(c.sample_at(0.2), 0.8);
        assert_eq!(c.sample_at(0.4), 0.4);
    }

    #[test]
    fn test_builders_still_reject_real_disorder() {
        let beats = vec![
            Beat {
                start: 1.0,
                duration: 0.5,
                confidence: 0.8,
            },
            Beat {
                start: 0.5,
                duration: 0.5,
                confidence: 0.4,
            },
        ];
        assert_eq!(
            Curve::from_beats(&beats),
            Err(CurveError::Unordered { index: 2 })
        );
    }

    #[test]
    fn test_from_beats_builds_plateaus() {
        let beats = vec![
            Beat {
                start: 0.0,
                duration: 0.5,
                confidence: 0.8,
            },
            Beat {
                start: 0.5,
                duration: 0.5,
                confidence: 0.2,
            },
        ];
        let c = Curve::from_beats(&beats).unwrap();
        assert_eq!(
            c.points(),
            &[
                Point::new(0.0, 0.8),
                Point::new(0.5, 0.8),
                Point::new(0.5, 0.2),
                Point::new(1.0, 0.2)
            ]
        );
        assert_eq!(c.sample_at(0.25), 0.8);
        assert_eq!(c.sample_at(0.75), 0.2);
    }
}
