//! Parameterized line segments.
//!
//! A [`Segment3`] runs from `p0` (parameter `t = 0`) to `p1` (`t = 1`).
//! Distance queries clamp to the segment; `point_at` and the infinite-line
//! queries treat it as the line through both endpoints.
//!
//! Zero-length segments are legal. Queries on them fall back to `p0` instead
//! of dividing by zero and report [`GeomDiagnostic::DegenerateSegment`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::core::{Tolerance, Vector3};
use super::diagnostics::{DiagnosticSink, GeomDiagnostic, LogSink, NoopSink};
use super::error::{GeomError, check_epsilon};
use super::record::SegmentRecord;

/// Closest pair of points between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoints {
    /// Point on the segment the query was made on.
    pub on_self: Vector3,
    /// Point on the other segment.
    pub on_other: Vector3,
    /// Parameter of `on_self` along its segment, in `[0, 1]`.
    pub s: f64,
    /// Parameter of `on_other` along its segment, in `[0, 1]`.
    pub t: f64,
}

impl ClosestPoints {
    /// Distance between the two points.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.on_self.distance_to(self.on_other)
    }
}

impl fmt::Display for ClosestPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClosestPoints{{{} ; {}}}", self.on_self, self.on_other)
    }
}

/// An immutable line segment between two finite points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SegmentRecord", into = "SegmentRecord")]
pub struct Segment3 {
    p0: Vector3,
    p1: Vector3,
}

fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

impl Segment3 {
    /// Create a segment. Coincident endpoints are allowed.
    #[must_use]
    pub fn new(p0: Vector3, p1: Vector3) -> Self {
        Self::new_with_sink(p0, p1, &mut LogSink)
    }

    /// [`Segment3::new`] reporting a degenerate segment to `sink`.
    #[must_use]
    pub fn new_with_sink(p0: Vector3, p1: Vector3, sink: &mut dyn DiagnosticSink) -> Self {
        let segment = Self { p0, p1 };
        if segment.is_degenerate() {
            sink.report(GeomDiagnostic::DegenerateSegment { op: "Segment3::new" });
        }
        segment
    }

    /// Segment used internally where the endpoints are known to differ.
    pub(crate) const fn from_endpoints(p0: Vector3, p1: Vector3) -> Self {
        Self { p0, p1 }
    }

    /// Segment of `length` starting at `p` along `direction`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `length` is negative or NaN, if
    /// `direction` is the zero vector, or if the end point overflows.
    pub fn from_point_and_direction(
        p: Vector3,
        direction: Vector3,
        length: f64,
    ) -> Result<Self, GeomError> {
        const OP: &str = "Segment3::from_point_and_direction";
        if !(length.is_finite() && length >= 0.0) {
            return Err(GeomError::invalid_value(OP, "length", "must be >= 0 and finite"));
        }
        if direction.magnitude() == 0.0 {
            return Err(GeomError::invalid_value(OP, "direction", "must be non-zero"));
        }
        let end = p.add(direction.normalize().scale(length)?)?;
        Ok(Self::new(p, end))
    }

    #[must_use]
    pub const fn p0(self) -> Vector3 {
        self.p0
    }

    #[must_use]
    pub const fn p1(self) -> Vector3 {
        self.p1
    }

    /// Raw direction `p1 - p0`, possibly zero.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the endpoints are too far apart to
    /// represent the difference.
    pub fn direction(self) -> Result<Vector3, GeomError> {
        self.p1.sub(self.p0)
    }

    /// Unit direction, or the zero vector for a zero-length segment.
    ///
    /// # Errors
    /// See [`Segment3::direction`].
    pub fn unit_direction(self) -> Result<Vector3, GeomError> {
        let d = self.direction()?;
        if d.magnitude() == 0.0 {
            return Ok(d);
        }
        Ok(d.normalize())
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.p0.distance_to(self.p1)
    }

    /// Returns `true` if the squared length is below
    /// [`Tolerance::ZERO_LENGTH`].
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        let dx = self.p1.x() - self.p0.x();
        let dy = self.p1.y() - self.p0.y();
        let dz = self.p1.z() - self.p0.z();
        dx * dx + dy * dy + dz * dz < Tolerance::ZERO_LENGTH.eps
    }

    fn eval(self, t: f64) -> Result<Vector3, GeomError> {
        // t == 0 is the normal case here, not a collapsing scale.
        self.p0.add(self.direction()?.scale_with_sink(t, &mut NoopSink)?)
    }

    /// Point `p0 + t * (p1 - p0)`. Values of `t` outside `[0, 1]` extrapolate
    /// along the infinite line.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `t` is non-finite or the point overflows.
    pub fn point_at(self, t: f64) -> Result<Vector3, GeomError> {
        self.point_at_with_sink(t, &mut LogSink)
    }

    /// [`Segment3::point_at`] reporting extrapolation to `sink`.
    ///
    /// # Errors
    /// See [`Segment3::point_at`].
    pub fn point_at_with_sink(
        self,
        t: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vector3, GeomError> {
        const OP: &str = "Segment3::point_at";
        if !t.is_finite() {
            return Err(GeomError::invalid_value(OP, "t", "must be finite"));
        }
        if !(0.0..=1.0).contains(&t) {
            sink.report(GeomDiagnostic::Extrapolated { op: OP, t });
        }
        self.eval(t)
    }

    // ── Point queries ───────────────────────────────────────────────────────

    /// Point on the segment nearest to `p`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if intermediate vectors overflow.
    pub fn closest_point_to_point(self, p: Vector3) -> Result<Vector3, GeomError> {
        self.closest_point_to_point_with_sink(p, &mut LogSink)
    }

    /// [`Segment3::closest_point_to_point`] reporting a degenerate segment to
    /// `sink`.
    ///
    /// # Errors
    /// See [`Segment3::closest_point_to_point`].
    pub fn closest_point_to_point_with_sink(
        self,
        p: Vector3,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vector3, GeomError> {
        if self.is_degenerate() {
            sink.report(GeomDiagnostic::DegenerateSegment {
                op: "Segment3::closest_point_to_point",
            });
            return Ok(self.p0);
        }
        self.eval(self.project_param(p)?)
    }

    /// Clamped parameter of the point nearest to `p`; `0` for a degenerate
    /// segment.
    fn project_param(self, p: Vector3) -> Result<f64, GeomError> {
        let v = self.direction()?;
        let vv = v.dot(v);
        if vv < Tolerance::ZERO_LENGTH.eps {
            return Ok(0.0);
        }
        Ok(clamp01(p.sub(self.p0)?.dot(v) / vv))
    }

    /// Distance from `p` to the nearest point of the segment.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if intermediate vectors overflow.
    pub fn distance_to_point(self, p: Vector3) -> Result<f64, GeomError> {
        self.distance_to_point_with_sink(p, &mut LogSink)
    }

    /// [`Segment3::distance_to_point`] reporting a degenerate segment to
    /// `sink`.
    ///
    /// # Errors
    /// See [`Segment3::distance_to_point`].
    pub fn distance_to_point_with_sink(
        self,
        p: Vector3,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<f64, GeomError> {
        Ok(self.closest_point_to_point_with_sink(p, sink)?.distance_to(p))
    }

    // ── Line/line queries ───────────────────────────────────────────────────

    /// Distance between the infinite lines through `self` and `other`.
    ///
    /// Parallel lines (`|u × v| < 1e-12`) reduce to the distance from
    /// `other.p0` to the line through `self`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if intermediate vectors overflow.
    pub fn distance_to_infinite_line(self, other: Self) -> Result<f64, GeomError> {
        self.distance_to_infinite_line_with_sink(other, &mut LogSink)
    }

    /// [`Segment3::distance_to_infinite_line`] reporting degenerate and
    /// parallel inputs to `sink`.
    ///
    /// # Errors
    /// See [`Segment3::distance_to_infinite_line`].
    pub fn distance_to_infinite_line_with_sink(
        self,
        other: Self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<f64, GeomError> {
        const OP: &str = "Segment3::distance_to_infinite_line";
        let eps = Tolerance::ZERO_LENGTH.eps;
        let u = self.direction()?;
        let v = other.direction()?;
        if u.is_near_zero(Tolerance::ZERO_LENGTH) || v.is_near_zero(Tolerance::ZERO_LENGTH) {
            sink.report(GeomDiagnostic::DegenerateSegment { op: OP });
        }

        let w0 = other.p0.sub(self.p0)?;
        let uxv = u.cross(v)?;
        let n = uxv.magnitude();

        if n < eps {
            sink.report(GeomDiagnostic::ParallelLines { op: OP });
            let un = u.magnitude();
            if un < eps {
                return Ok(w0.magnitude());
            }
            return Ok(w0.cross(u)?.magnitude() / un);
        }
        Ok(w0.dot(uxv).abs() / n)
    }

    /// Returns `true` if the infinite lines come within `eps` of each other.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN.
    pub fn infinite_lines_intersect(self, other: Self, eps: f64) -> Result<bool, GeomError> {
        let eps = check_epsilon("Segment3::infinite_lines_intersect", eps)?;
        Ok(self.distance_to_infinite_line(other)? <= eps)
    }

    // ── Segment/segment queries ─────────────────────────────────────────────

    /// Closest pair of points between `self` and `other`.
    ///
    /// Minimizes `|P(s) - Q(t)|²` over `(s, t) ∈ [0, 1]²` with
    /// `P(s) = p0 + s·d1`, `Q(t) = q0 + t·d2`. With `r = p0 - q0` the normal
    /// equations use `a = d1·d1`, `b = d1·d2`, `c = d1·r`, `e = d2·d2`,
    /// `f = d2·r`. The unconstrained `s` is clamped, `t` is solved from it and
    /// clamped, and when `t` had to be clamped `s` is solved again from the
    /// clamped `t`. Parallel segments start from `s = 0`. When the two
    /// directions are so close to parallel that the solve is unreliable, the
    /// endpoint projections are compared as well.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if intermediate vectors overflow.
    pub fn closest_points_on_segments(self, other: Self) -> Result<ClosestPoints, GeomError> {
        self.closest_points_on_segments_with_sink(other, &mut LogSink)
    }

    /// [`Segment3::closest_points_on_segments`] reporting degenerate and
    /// parallel inputs to `sink`.
    ///
    /// # Errors
    /// See [`Segment3::closest_points_on_segments`].
    pub fn closest_points_on_segments_with_sink(
        self,
        other: Self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ClosestPoints, GeomError> {
        const OP: &str = "Segment3::closest_points_on_segments";
        let eps = Tolerance::ZERO_LENGTH.eps;

        let d1 = self.direction()?;
        let d2 = other.direction()?;
        let r = self.p0.sub(other.p0)?;

        let a = d1.dot(d1);
        let e = d2.dot(d2);
        let f = d2.dot(r);

        if a < eps && e < eps {
            sink.report(GeomDiagnostic::DegenerateSegment { op: OP });
            return Ok(ClosestPoints {
                on_self: self.p0,
                on_other: other.p0,
                s: 0.0,
                t: 0.0,
            });
        }

        let (s, t) = if a < eps {
            sink.report(GeomDiagnostic::DegenerateSegment { op: OP });
            (0.0, clamp01(f / e))
        } else {
            let c = d1.dot(r);
            if e < eps {
                sink.report(GeomDiagnostic::DegenerateSegment { op: OP });
                (clamp01(-c / a), 0.0)
            } else {
                let b = d1.dot(d2);
                let denom = a * e - b * b;

                let s = if denom == 0.0 {
                    sink.report(GeomDiagnostic::ParallelLines { op: OP });
                    0.0
                } else {
                    clamp01((b * f - c * e) / denom)
                };

                let t = (b * s + f) / e;
                let (s, t) = if t < 0.0 {
                    (clamp01(-c / a), 0.0)
                } else if t > 1.0 {
                    (clamp01((b - c) / a), 1.0)
                } else {
                    (s, t)
                };

                // denom = a·e·sin²θ. Below this bound it is dominated by
                // rounding, so the solved pair may miss the minimum; the
                // minimum then lies on an endpoint of one of the segments.
                if denom <= eps * a * e {
                    self.best_with_endpoints(other, s, t)?
                } else {
                    (s, t)
                }
            }
        };

        Ok(ClosestPoints {
            on_self: self.eval(s)?,
            on_other: other.eval(t)?,
            s,
            t,
        })
    }

    /// Compare the pair `(s, t)` with the four endpoint-to-segment
    /// projections and return the closest.
    fn best_with_endpoints(self, other: Self, s: f64, t: f64) -> Result<(f64, f64), GeomError> {
        let candidates = [
            (s, t),
            (0.0, other.project_param(self.p0)?),
            (1.0, other.project_param(self.p1)?),
            (self.project_param(other.p0)?, 0.0),
            (self.project_param(other.p1)?, 1.0),
        ];
        let mut best = candidates[0];
        let mut best_distance = f64::INFINITY;
        for (s, t) in candidates {
            let distance = self.eval(s)?.distance_to(other.eval(t)?);
            if distance < best_distance {
                best = (s, t);
                best_distance = distance;
            }
        }
        Ok(best)
    }

    /// Shortest distance between any point of `self` and any point of
    /// `other`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if intermediate vectors overflow.
    pub fn shortest_distance_segment(self, other: Self) -> Result<f64, GeomError> {
        Ok(self.closest_points_on_segments(other)?.distance())
    }

    /// Returns `true` if the closest points of the two segments agree within
    /// `eps` on every axis.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN.
    pub fn segments_intersect(self, other: Self, eps: f64) -> Result<bool, GeomError> {
        let eps = check_epsilon("Segment3::segments_intersect", eps)?;
        let cp = self.closest_points_on_segments(other)?;
        cp.on_self.epsilon_equals(cp.on_other, eps)
    }

    // ── Relations ───────────────────────────────────────────────────────────

    /// Parallel iff `|u × v| <= eps` for the raw directions.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN.
    pub fn is_parallel_to(self, other: Self, eps: f64) -> Result<bool, GeomError> {
        let eps = check_epsilon("Segment3::is_parallel_to", eps)?;
        let u = self.direction()?;
        let v = other.direction()?;
        Ok(u.cross(v)?.magnitude() <= eps)
    }

    /// Parallel, and `other.p0` lies on the line through `self`
    /// (`|w × u| <= eps` with `w = other.p0 - self.p0`).
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN.
    pub fn is_colinear_with(self, other: Self, eps: f64) -> Result<bool, GeomError> {
        if !self.is_parallel_to(other, eps)? {
            return Ok(false);
        }
        let u = self.direction()?;
        let w = other.p0.sub(self.p0)?;
        Ok(w.cross(u)?.magnitude() <= eps)
    }
}

impl fmt::Display for Segment3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment3[{} -> {}]", self.p0, self.p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CollectingSink;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment3 {
        Segment3::new(Vector3::from_array(a).unwrap(), Vector3::from_array(b).unwrap())
    }

    #[test]
    fn test_degenerate_segment_is_reported() {
        let mut sink = CollectingSink::new();
        let s = Segment3::new_with_sink(v(1.0, 1.0, 1.0), v(1.0, 1.0, 1.0), &mut sink);
        assert!(s.is_degenerate());
        assert_eq!(s.length(), 0.0);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(s.unit_direction().unwrap(), Vector3::ZERO);
    }

    #[test]
    fn test_direction_and_length() {
        let s = seg([1.0, 2.0, 3.0], [4.0, 6.0, 3.0]);
        assert_eq!(s.direction().unwrap(), v(3.0, 4.0, 0.0));
        assert!((s.length() - 5.0).abs() < 1e-12);
        let u = s.unit_direction().unwrap();
        assert!(u.epsilon_equals(v(0.6, 0.8, 0.0), 1e-12).unwrap());
    }

    #[test]
    fn test_from_point_and_direction() {
        let s = Segment3::from_point_and_direction(Vector3::ZERO, v(0.0, 0.0, 2.0), 3.0).unwrap();
        assert_eq!(s.p1(), v(0.0, 0.0, 3.0));

        assert!(Segment3::from_point_and_direction(Vector3::ZERO, Vector3::ZERO, 1.0).is_err());
        assert!(Segment3::from_point_and_direction(Vector3::ZERO, Vector3::X, -1.0).is_err());
        assert!(Segment3::from_point_and_direction(Vector3::ZERO, Vector3::X, f64::NAN).is_err());
    }

    #[test]
    fn test_point_at_extrapolates() {
        let s = seg([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(s.point_at(0.5).unwrap(), v(1.0, 0.0, 0.0));

        let mut sink = CollectingSink::new();
        assert_eq!(s.point_at_with_sink(-1.0, &mut sink).unwrap(), v(-2.0, 0.0, 0.0));
        assert!(matches!(
            sink.diagnostics.as_slice(),
            [GeomDiagnostic::Extrapolated { t, .. }] if *t == -1.0
        ));
        assert!(s.point_at(f64::INFINITY).is_err());
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let s = seg([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]);
        assert_eq!(s.closest_point_to_point(v(5.0, 3.0, 0.0)).unwrap(), v(5.0, 0.0, 0.0));
        assert_eq!(s.closest_point_to_point(v(-4.0, 3.0, 0.0)).unwrap(), v(0.0, 0.0, 0.0));
        assert_eq!(s.closest_point_to_point(v(14.0, 3.0, 0.0)).unwrap(), v(10.0, 0.0, 0.0));
        assert!((s.distance_to_point(v(14.0, 3.0, 0.0)).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_point_query_uses_p0() {
        let s = seg([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let mut sink = CollectingSink::new();
        let d = s.distance_to_point_with_sink(v(1.0, 3.0, 4.0), &mut sink).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
        assert_eq!(sink.diagnostics.len(), 1);
    }

    #[test]
    fn test_infinite_line_distance_skew() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([5.0, -1.0, 2.0], [5.0, 1.0, 2.0]);
        assert!((a.distance_to_infinite_line(b).unwrap() - 2.0).abs() < 1e-12);
        assert!(a.infinite_lines_intersect(b, 2.0 + 1e-9).unwrap());
        assert!(!a.infinite_lines_intersect(b, 1.0).unwrap());
        assert!(a.infinite_lines_intersect(b, -1.0).is_err());
    }

    #[test]
    fn test_infinite_line_distance_parallel() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([7.0, 3.0, 4.0], [9.0, 3.0, 4.0]);
        let mut sink = CollectingSink::new();
        let d = a.distance_to_infinite_line_with_sink(b, &mut sink).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
        assert!(sink.diagnostics.contains(&GeomDiagnostic::ParallelLines {
            op: "Segment3::distance_to_infinite_line"
        }));
    }

    #[test]
    fn test_closest_points_crossing() {
        let a = seg([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([0.0, -1.0, 0.0], [0.0, 1.0, 0.0]);
        let cp = a.closest_points_on_segments(b).unwrap();
        assert!(cp.on_self.epsilon_equals(Vector3::ZERO, 1e-12).unwrap());
        assert!(cp.on_other.epsilon_equals(Vector3::ZERO, 1e-12).unwrap());
        assert!((cp.s - 0.5).abs() < 1e-12);
        assert!((cp.t - 0.5).abs() < 1e-12);
        assert!(a.segments_intersect(b, 1e-9).unwrap());
    }

    #[test]
    fn test_closest_points_with_clamped_t_reprojects_s() {
        // Unconstrained minimum has t < 0; s must be re-solved against q0.
        let a = seg([0.0, 0.0, 0.0], [4.0, 0.0, 0.0]);
        let b = seg([1.0, 1.0, 0.0], [1.0, 3.0, 0.0]);
        let cp = a.closest_points_on_segments(b).unwrap();
        assert_eq!(cp.t, 0.0);
        assert!(cp.on_self.epsilon_equals(v(1.0, 0.0, 0.0), 1e-12).unwrap());
        assert!((a.shortest_distance_segment(b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_points_endpoint_to_endpoint() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([2.0, 1.0, 0.0], [3.0, 5.0, 0.0]);
        let cp = a.closest_points_on_segments(b).unwrap();
        assert_eq!(cp.s, 1.0);
        assert_eq!(cp.t, 0.0);
        assert!((cp.distance() - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_closest_points_parallel() {
        let a = seg([0.0, 0.0, 0.0], [4.0, 0.0, 0.0]);
        let b = seg([1.0, 2.0, 0.0], [3.0, 2.0, 0.0]);
        let mut sink = CollectingSink::new();
        let cp = a.closest_points_on_segments_with_sink(b, &mut sink).unwrap();
        assert!((cp.distance() - 2.0).abs() < 1e-12);
        assert_eq!(
            sink.diagnostics,
            vec![GeomDiagnostic::ParallelLines {
                op: "Segment3::closest_points_on_segments"
            }]
        );
    }

    #[test]
    fn test_closest_points_nearly_parallel() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([0.0, 1.0, 0.0], [1.0, 1.0 - 1e-7, 0.0]);
        let mut sink = CollectingSink::new();
        let cp = a.closest_points_on_segments_with_sink(b, &mut sink).unwrap();
        assert!((cp.distance() - (1.0 - 1e-7)).abs() < 1e-12);
        assert!(cp.distance() <= a.distance_to_point(b.p1()).unwrap() + 1e-15);
        assert_eq!(cp.s, 1.0);
        assert_eq!(cp.t, 1.0);
        assert!(!sink.diagnostics.iter().any(|d| matches!(d, GeomDiagnostic::ParallelLines { .. })));

        let a = seg([0.0, 0.0, 0.0], [1000.0, 0.0, 0.0]);
        let b = seg([0.0, 1.0, 0.0], [1000.0, 1.0 - 1e-4, 0.0]);
        let cp = a.closest_points_on_segments(b).unwrap();
        assert!((cp.distance() - 0.9999).abs() < 1e-9);
        assert!((b.closest_points_on_segments(a).unwrap().distance() - 0.9999).abs() < 1e-9);
    }

    #[test]
    fn test_closest_points_degenerate_cases() {
        let point = seg([2.0, 2.0, 0.0], [2.0, 2.0, 0.0]);
        let line = seg([0.0, 0.0, 0.0], [4.0, 0.0, 0.0]);

        let cp = point.closest_points_on_segments(line).unwrap();
        assert_eq!(cp.on_self, v(2.0, 2.0, 0.0));
        assert_eq!(cp.on_other, v(2.0, 0.0, 0.0));

        let cp = line.closest_points_on_segments(point).unwrap();
        assert_eq!(cp.on_self, v(2.0, 0.0, 0.0));
        assert_eq!(cp.on_other, v(2.0, 2.0, 0.0));

        let other_point = seg([5.0, 5.0, 5.0], [5.0, 5.0, 5.0]);
        let cp = point.closest_points_on_segments(other_point).unwrap();
        assert_eq!(cp.on_self, point.p0());
        assert_eq!(cp.on_other, other_point.p0());
    }

    #[test]
    fn test_segments_intersect_rejects_bad_epsilon() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(a.segments_intersect(a, -1.0).is_err());
        assert!(a.segments_intersect(a, f64::NAN).is_err());
    }

    #[test]
    fn test_parallel_and_colinear() {
        let a = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = seg([5.0, 0.0, 0.0], [7.0, 0.0, 0.0]);
        let c = seg([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        let d = seg([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        assert!(a.is_parallel_to(b, 1e-12).unwrap());
        assert!(a.is_colinear_with(b, 1e-12).unwrap());
        assert!(a.is_parallel_to(c, 1e-12).unwrap());
        assert!(!a.is_colinear_with(c, 1e-12).unwrap());
        assert!(!a.is_parallel_to(d, 1e-12).unwrap());
        assert!(!a.is_colinear_with(d, 1e-12).unwrap());
    }

    #[test]
    fn test_display() {
        let s = seg([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        assert_eq!(
            s.to_string(),
            "Segment3[Vector3(0.000000, 0.000000, 0.000000) -> Vector3(1.000000, 2.000000, 3.000000)]"
        );
    }
}
