//! Oriented cubes.
//!
//! An [`OrientedBox3`] is a cube given by its center, edge length and a local
//! frame `(ux, uy, uz)`. The frame is kept orthonormal and right-handed
//! (`uz = ux × uy`) at all times: every factory and every transform passes the
//! axes through [`orthonormalize_basis`] before the box is returned.
//!
//! Vertices, edges and face centers are derived on demand and never stored.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::core::{Aabb3, Axis, Tolerance, Vector3};
use super::diagnostics::{BasisRepair, DiagnosticSink, GeomDiagnostic, LogSink, NoopSink};
use super::error::{GeomError, check_epsilon};
use super::record::OrientedBoxRecord;
use super::segment::Segment3;

/// Local sign pattern of each vertex, in output order.
const VERTEX_SIGNS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Vertex index pairs of the 12 edges: bottom ring, top ring, verticals.
const EDGE_INDICES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

// ─────────────────────────────────────────────────────────────────────────────
// Basis repair
// ─────────────────────────────────────────────────────────────────────────────

/// Unit vector along `v`, or `None` if `v` is the zero vector.
///
/// Scales by the largest component first so vectors whose magnitude would
/// overflow still normalize.
fn unit_or_none(v: Vector3) -> Option<Vector3> {
    let m = v.x().abs().max(v.y().abs()).max(v.z().abs());
    if m == 0.0 {
        return None;
    }
    let scaled = Vector3::raw(v.x() / m, v.y() / m, v.z() / m);
    Some(scaled.normalize_with_sink(&mut NoopSink))
}

/// Deterministic unit vector orthogonal to the unit vector `v`.
///
/// Crosses with the world X axis unless `v` is close to it, in which case the
/// world Y axis is used; the world Z axis is the last resort.
fn orthogonal_fallback(v: Vector3) -> Result<Vector3, GeomError> {
    let k = if v.x().abs() < 0.9 { Vector3::X } else { Vector3::Y };
    let mut u = v.cross(k)?;
    if u.is_near_zero(Tolerance::ZERO_LENGTH) {
        u = v.cross(Vector3::Z)?;
    }
    Ok(u.normalize_with_sink(&mut NoopSink))
}

/// `v` minus its component along the unit vector `x`. Both inputs have
/// components in `[-1, 1]`, so the result is finite.
fn reject(v: Vector3, x: Vector3) -> Vector3 {
    let along = v.dot(x);
    Vector3::raw(
        v.x() - along * x.x(),
        v.y() - along * x.y(),
        v.z() - along * x.z(),
    )
}

fn is_unit(length: f64) -> bool {
    (length - 1.0).abs() <= Tolerance::ZERO_LENGTH.eps
}

/// Turn a candidate frame into an orthonormal right-handed one.
///
/// 1. `ux` is normalized.
/// 2. `uy` loses its component along `ux` and is normalized. If nothing is
///    left (`uy` zero or colinear with `ux`) a deterministic vector
///    orthogonal to `ux` is used instead.
/// 3. `uz` is always recomputed as `ux × uy`. The supplied `uz` is only
///    compared against it: a supplied axis that deviates by more than
///    [`Tolerance::BASIS_ALIGNMENT`] is discarded and flagged.
///
/// Returns the repaired axes together with the corrections that were applied.
///
/// # Errors
/// [`GeomError::InvalidValue`] if `ux` is the zero vector.
pub fn orthonormalize_basis(
    ux: Vector3,
    uy: Vector3,
    uz: Vector3,
) -> Result<([Vector3; 3], BasisRepair), GeomError> {
    const OP: &str = "orthonormalize_basis";
    let mut repair = BasisRepair::default();

    let x = unit_or_none(ux).ok_or(GeomError::invalid_value(OP, "ux", "must be non-zero"))?;
    repair.ux_normalized = !is_unit(ux.magnitude());

    let mut residual = Vector3::ZERO;
    if let Some(y_unit) = unit_or_none(uy) {
        let along = y_unit.dot(x);
        residual = reject(y_unit, x);
        // Second pass restores orthogonality lost to cancellation when uy is
        // nearly colinear with ux.
        residual = reject(residual, x);
        repair.uy_adjusted = !is_unit(uy.magnitude()) || along.abs() > Tolerance::ZERO_LENGTH.eps;
    }
    let mut y = match unit_or_none(residual) {
        Some(y) if !residual.is_near_zero(Tolerance::ZERO_LENGTH) => y,
        _ => {
            repair.uy_fallback = true;
            orthogonal_fallback(x)?
        }
    };

    let mut z = x.cross(y)?;
    if z.is_near_zero(Tolerance::ZERO_LENGTH) {
        repair.uz_rebuilt = true;
        y = orthogonal_fallback(x)?;
        z = x.cross(y)?;
    }
    let z = z.normalize_with_sink(&mut NoopSink);

    // The supplied uz must point the same way as the computed one.
    repair.uz_replaced = match unit_or_none(uz) {
        Some(supplied) => {
            supplied.cross(z)?.magnitude() > Tolerance::BASIS_ALIGNMENT.eps
                || supplied.dot(z) < 0.0
        }
        None => true,
    };

    Ok(([x, y, z], repair))
}

// ─────────────────────────────────────────────────────────────────────────────
// OrientedBox3
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable cube with an arbitrary orientation.
///
/// Equality is exact, like [`Vector3`]: all components and the edge length
/// must match bit for bit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "OrientedBoxRecord", into = "OrientedBoxRecord")]
pub struct OrientedBox3 {
    center: Vector3,
    edge: f64,
    ux: Vector3,
    uy: Vector3,
    uz: Vector3,
}

fn check_edge(op: &'static str, edge: f64) -> Result<f64, GeomError> {
    if edge > 0.0 && edge.is_finite() {
        Ok(edge)
    } else {
        Err(GeomError::invalid_value(op, "edge", "must be > 0 and finite"))
    }
}

impl OrientedBox3 {
    /// Axis-aligned cube.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `edge` is not a positive finite number.
    pub fn new(center: Vector3, edge: f64) -> Result<Self, GeomError> {
        let edge = check_edge("OrientedBox3::new", edge)?;
        Ok(Self {
            center,
            edge,
            ux: Vector3::X,
            uy: Vector3::Y,
            uz: Vector3::Z,
        })
    }

    /// Cube with a caller-supplied frame. The frame is repaired as described
    /// in [`orthonormalize_basis`]; repairs are logged, never rejected.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `edge` is not a positive finite number
    /// or `ux` is the zero vector.
    pub fn from_basis(
        center: Vector3,
        edge: f64,
        ux: Vector3,
        uy: Vector3,
        uz: Vector3,
    ) -> Result<Self, GeomError> {
        Self::from_basis_with_sink(center, edge, ux, uy, uz, &mut LogSink)
    }

    /// [`OrientedBox3::from_basis`] reporting basis repairs to `sink`.
    ///
    /// # Errors
    /// See [`OrientedBox3::from_basis`].
    pub fn from_basis_with_sink(
        center: Vector3,
        edge: f64,
        ux: Vector3,
        uy: Vector3,
        uz: Vector3,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        let edge = check_edge("OrientedBox3::from_basis", edge)?;
        let ([ux, uy, uz], repair) = orthonormalize_basis(ux, uy, uz)?;
        if !repair.is_clean() {
            sink.report(GeomDiagnostic::BasisRepaired(repair));
        }
        Ok(Self {
            center,
            edge,
            ux,
            uy,
            uz,
        })
    }

    #[must_use]
    pub const fn center(&self) -> Vector3 {
        self.center
    }

    #[must_use]
    pub const fn edge(&self) -> f64 {
        self.edge
    }

    #[must_use]
    pub const fn axis_x(&self) -> Vector3 {
        self.ux
    }

    #[must_use]
    pub const fn axis_y(&self) -> Vector3 {
        self.uy
    }

    #[must_use]
    pub const fn axis_z(&self) -> Vector3 {
        self.uz
    }

    /// Local frame as `[ux, uy, uz]`.
    #[must_use]
    pub const fn basis(&self) -> [Vector3; 3] {
        [self.ux, self.uy, self.uz]
    }

    fn half_edge(&self) -> f64 {
        self.edge * 0.5
    }

    /// `center + a·ux + b·uy + c·uz`.
    fn local_point(&self, op: &'static str, a: f64, b: f64, c: f64) -> Result<Vector3, GeomError> {
        let component = |o: f64, x: f64, y: f64, z: f64| o + a * x + b * y + c * z;
        let (o, ux, uy, uz) = (self.center, self.ux, self.uy, self.uz);
        Vector3::new(
            component(o.x(), ux.x(), uy.x(), uz.x()),
            component(o.y(), ux.y(), uy.y(), uz.y()),
            component(o.z(), ux.z(), uy.z(), uz.z()),
        )
        .map_err(|_| GeomError::invalid_value(op, "edge", "derived point is not finite"))
    }

    // ── Topology ────────────────────────────────────────────────────────────

    /// The 8 corners, ordered `(−,−,−) (+,−,−) (+,+,−) (−,+,−)` then the same
    /// four with `+` along the local Z axis.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if a corner lies beyond the `f64` range.
    pub fn vertices(&self) -> Result<[Vector3; 8], GeomError> {
        let h = self.half_edge();
        let mut out = [self.center; 8];
        for (slot, [sx, sy, sz]) in out.iter_mut().zip(VERTEX_SIGNS) {
            *slot = self.local_point("OrientedBox3::vertices", sx * h, sy * h, sz * h)?;
        }
        Ok(out)
    }

    /// The 12 edges as segments between [`OrientedBox3::vertices`].
    ///
    /// # Errors
    /// See [`OrientedBox3::vertices`].
    pub fn edges(&self) -> Result<[Segment3; 12], GeomError> {
        let v = self.vertices()?;
        Ok(EDGE_INDICES.map(|[a, b]| Segment3::from_endpoints(v[a], v[b])))
    }

    /// Centers of the six faces in the order `+ux, −ux, +uy, −uy, +uz, −uz`.
    ///
    /// # Errors
    /// See [`OrientedBox3::vertices`].
    pub fn face_centers(&self) -> Result<[Vector3; 6], GeomError> {
        const OP: &str = "OrientedBox3::face_centers";
        let h = self.half_edge();
        Ok([
            self.local_point(OP, h, 0.0, 0.0)?,
            self.local_point(OP, -h, 0.0, 0.0)?,
            self.local_point(OP, 0.0, h, 0.0)?,
            self.local_point(OP, 0.0, -h, 0.0)?,
            self.local_point(OP, 0.0, 0.0, h)?,
            self.local_point(OP, 0.0, 0.0, -h)?,
        ])
    }

    // ── Measures ────────────────────────────────────────────────────────────

    /// Total length of all 12 edges.
    #[must_use]
    pub fn perimeter_length(&self) -> f64 {
        12.0 * self.edge
    }

    #[must_use]
    pub fn surface_area(&self) -> f64 {
        6.0 * self.edge * self.edge
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.edge * self.edge * self.edge
    }

    #[must_use]
    pub fn face_diagonal(&self) -> f64 {
        self.edge * std::f64::consts::SQRT_2
    }

    #[must_use]
    pub fn space_diagonal(&self) -> f64 {
        self.edge * 3.0_f64.sqrt()
    }

    // ── Transforms ──────────────────────────────────────────────────────────

    /// Move the center by `offset`; the frame is unchanged.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the new center overflows.
    pub fn translate(&self, offset: Vector3) -> Result<Self, GeomError> {
        Ok(Self {
            center: self.center.add(offset)?,
            ..*self
        })
    }

    /// Scale the edge about the center.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `factor` is not a positive finite number
    /// or the scaled edge leaves the positive finite range.
    pub fn scale(&self, factor: f64) -> Result<Self, GeomError> {
        const OP: &str = "OrientedBox3::scale";
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(GeomError::invalid_value(OP, "factor", "must be > 0 and finite"));
        }
        Ok(Self {
            edge: check_edge(OP, self.edge * factor)?,
            ..*self
        })
    }

    fn rotated_basis(
        &self,
        axis: Vector3,
        radians: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<[Vector3; 3], GeomError> {
        // Axis renormalization is reported once, not per basis vector.
        let ux = self.ux.rotate_around_axis_with_sink(axis, radians, sink)?;
        let uy = self.uy.rotate_around_axis_with_sink(axis, radians, &mut NoopSink)?;
        let uz = self.uz.rotate_around_axis_with_sink(axis, radians, &mut NoopSink)?;
        Ok([ux.normalize(), uy.normalize(), uz.normalize()])
    }

    /// Rotate the frame about an axis through the center.
    ///
    /// # Errors
    /// [`GeomError::InvalidAxis`] for a zero or non-finite axis,
    /// [`GeomError::InvalidValue`] for non-finite `radians`.
    pub fn rotate_around_center(&self, axis: Vector3, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_center_with_sink(axis, radians, &mut LogSink)
    }

    /// [`OrientedBox3::rotate_around_center`] reporting to `sink`.
    ///
    /// # Errors
    /// See [`OrientedBox3::rotate_around_center`].
    pub fn rotate_around_center_with_sink(
        &self,
        axis: Vector3,
        radians: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        let [ux, uy, uz] = self.rotated_basis(axis, radians, sink)?;
        Self::from_basis_with_sink(self.center, self.edge, ux, uy, uz, sink)
    }

    /// Rotate the whole box, center included, about an axis through the
    /// world origin.
    ///
    /// # Errors
    /// See [`OrientedBox3::rotate_around_center`].
    pub fn rotate_around_origin(&self, axis: Vector3, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_origin_with_sink(axis, radians, &mut LogSink)
    }

    /// [`OrientedBox3::rotate_around_origin`] reporting to `sink`.
    ///
    /// # Errors
    /// See [`OrientedBox3::rotate_around_center`].
    pub fn rotate_around_origin_with_sink(
        &self,
        axis: Vector3,
        radians: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        let [ux, uy, uz] = self.rotated_basis(axis, radians, sink)?;
        let center = self
            .center
            .rotate_around_axis_with_sink(axis, radians, &mut NoopSink)?;
        Self::from_basis_with_sink(center, self.edge, ux, uy, uz, sink)
    }

    /// Rotate about the world X axis through the center.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] for non-finite `radians`.
    pub fn rotate_x(&self, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_center(Axis::X.unit(), radians)
    }

    /// Rotate about the world Y axis through the center.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] for non-finite `radians`.
    pub fn rotate_y(&self, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_center(Axis::Y.unit(), radians)
    }

    /// Rotate about the world Z axis through the center.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] for non-finite `radians`.
    pub fn rotate_z(&self, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_center(Axis::Z.unit(), radians)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Returns `true` if `point` lies inside the cube grown by `eps` on every
    /// side. Faces count as inside.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN, or `point` is
    /// too far from the center to measure.
    pub fn contains(&self, point: Vector3, eps: f64) -> Result<bool, GeomError> {
        let eps = check_epsilon("OrientedBox3::contains", eps)?;
        let d = point.sub(self.center)?;
        let h = self.half_edge() + eps;
        Ok(self.basis().iter().all(|axis| d.dot(*axis).abs() <= h))
    }

    /// World-space bounding box of the eight corners.
    ///
    /// # Errors
    /// See [`OrientedBox3::vertices`].
    pub fn axis_aligned_bounding_box(&self) -> Result<Aabb3, GeomError> {
        let [first, rest @ ..] = self.vertices()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Ok(Aabb3 { min, max })
    }
}

impl PartialEq for OrientedBox3 {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && self.edge.to_bits() == other.edge.to_bits()
            && self.basis() == other.basis()
    }
}

impl Eq for OrientedBox3 {}

impl Hash for OrientedBox3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.center.hash(state);
        self.edge.to_bits().hash(state);
        self.basis().hash(state);
    }
}

impl fmt::Display for OrientedBox3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrientedBox3(center={}, edge={:.6})", self.center, self.edge)
    }
}
