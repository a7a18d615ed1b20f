use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::diagnostics::{DiagnosticSink, GeomDiagnostic, LogSink};
use super::error::{GeomError, check_epsilon};

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// One of the three world coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    #[must_use]
    pub const fn unit(self) -> Vector3 {
        match self {
            Self::X => Vector3::X,
            Self::Y => Vector3::Y,
            Self::Z => Vector3::Z,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vector3
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable point or direction in 3D space.
///
/// All three components are finite. Every constructor and every operation
/// that produces a new vector checks this, so a `Vector3` holding NaN or an
/// infinity cannot be observed. Arithmetic that overflows fails with
/// [`GeomError::InvalidValue`].
///
/// Equality is exact: two vectors are equal only if their components are
/// bit-for-bit identical (so `0.0` and `-0.0` differ). Use
/// [`Vector3::epsilon_equals`] for numerical comparisons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    /// Zero vector.
    pub const ZERO: Self = Self::raw(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::raw(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::raw(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::raw(0.0, 0.0, 1.0);

    /// Only for values already known to be finite.
    pub(crate) const fn raw(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn checked(op: &'static str, param: &'static str, x: f64, y: f64, z: f64) -> Result<Self, GeomError> {
        if x.is_finite() && y.is_finite() && z.is_finite() {
            Ok(Self::raw(x, y, z))
        } else {
            Err(GeomError::invalid_value(op, param, "coordinates must be finite numbers"))
        }
    }

    /// Create a vector from its components.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, GeomError> {
        Self::checked("Vector3::new", "xyz", x, y, z)
    }

    /// Create a vector from an array.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if any component is NaN or infinite.
    pub fn from_array(arr: [f64; 3]) -> Result<Self, GeomError> {
        Self::checked("Vector3::from_array", "xyz", arr[0], arr[1], arr[2])
    }

    /// Create a vector from an optional slice, as handed over by loosely
    /// typed callers.
    ///
    /// # Errors
    /// [`GeomError::NullInput`] for `None`, [`GeomError::InvalidValue`] if the
    /// slice does not hold exactly three finite numbers.
    pub fn from_slice(xyz: Option<&[f64]>) -> Result<Self, GeomError> {
        const OP: &str = "Vector3::from_slice";
        let xyz = xyz.ok_or(GeomError::null_input(OP, "xyz"))?;
        match *xyz {
            [x, y, z] => Self::checked(OP, "xyz", x, y, z),
            _ => Err(GeomError::invalid_value(OP, "xyz", "must have length 3")),
        }
    }

    /// Convert to an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn x(self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> f64 {
        self.y
    }

    #[must_use]
    pub const fn z(self) -> f64 {
        self.z
    }

    // ── Metrics ─────────────────────────────────────────────────────────────

    /// Euclidean norm. Always `>= 0`; may be `+inf` for huge components.
    /// Computed without intermediate underflow, so subnormal vectors keep a
    /// non-zero length.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    #[must_use]
    pub const fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    /// Same as [`Vector3::magnitude`], named for point contexts.
    #[must_use]
    pub fn distance_to_origin(self) -> f64 {
        self.magnitude()
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx.hypot(dy).hypot(dz)
    }

    // ── Arithmetic ──────────────────────────────────────────────────────────

    /// # Errors
    /// [`GeomError::InvalidValue`] if the sum overflows.
    pub fn add(self, rhs: Self) -> Result<Self, GeomError> {
        Self::checked("Vector3::add", "rhs", self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    /// # Errors
    /// [`GeomError::InvalidValue`] if the difference overflows.
    pub fn sub(self, rhs: Self) -> Result<Self, GeomError> {
        Self::checked("Vector3::sub", "rhs", self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub const fn neg(self) -> Self {
        Self::raw(-self.x, -self.y, -self.z)
    }

    /// Shift by `(dx, dy, dz)`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if an offset is non-finite or the result
    /// overflows.
    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Result<Self, GeomError> {
        Self::checked("Vector3::translate", "offset", self.x + dx, self.y + dy, self.z + dz)
    }

    /// Uniform scale about the origin. A factor of zero is legal.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `factor` is non-finite or the result
    /// overflows.
    pub fn scale(self, factor: f64) -> Result<Self, GeomError> {
        self.scale_with_sink(factor, &mut LogSink)
    }

    /// [`Vector3::scale`] reporting a zero factor to `sink`.
    ///
    /// # Errors
    /// See [`Vector3::scale`].
    pub fn scale_with_sink(
        self,
        factor: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        const OP: &str = "Vector3::scale";
        if !factor.is_finite() {
            return Err(GeomError::invalid_value(OP, "factor", "must be finite"));
        }
        if factor == 0.0 {
            sink.report(GeomDiagnostic::ZeroScale);
        }
        Self::checked(OP, "factor", self.x * factor, self.y * factor, self.z * factor)
    }

    /// Dot product. May be `±inf` for huge components.
    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product, right-hand rule.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the result overflows.
    pub fn cross(self, rhs: Self) -> Result<Self, GeomError> {
        Self::checked(
            "Vector3::cross",
            "rhs",
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self::raw(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self::raw(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Returns `true` if every component is strictly below `tol` in magnitude.
    #[must_use]
    pub fn is_near_zero(self, tol: Tolerance) -> bool {
        self.x.abs() < tol.eps && self.y.abs() < tol.eps && self.z.abs() < tol.eps
    }

    // ── Normalization ───────────────────────────────────────────────────────

    /// Unit vector in the same direction.
    ///
    /// The zero vector, and a vector whose magnitude overflows, are returned
    /// unchanged: normalization is undefined there and the result stays
    /// finite instead of turning into NaN.
    #[must_use]
    pub fn normalize(self) -> Self {
        self.normalize_with_sink(&mut LogSink)
    }

    /// [`Vector3::normalize`] reporting the unchanged-return cases to `sink`.
    #[must_use]
    pub fn normalize_with_sink(self, sink: &mut dyn DiagnosticSink) -> Self {
        let m = self.magnitude();
        if m == 0.0 {
            sink.report(GeomDiagnostic::ZeroLengthNormalize);
            return self;
        }
        if !m.is_finite() {
            sink.report(GeomDiagnostic::NonFiniteNormalize);
            return self;
        }
        // Each |component| / m is at most 1, so the result is finite.
        Self::raw(self.x / m, self.y / m, self.z / m)
    }

    // ── Rotation ────────────────────────────────────────────────────────────

    /// Rotate about a world axis through the origin, right-handed.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `radians` is non-finite.
    pub fn rotate_axis(self, axis: Axis, radians: f64) -> Result<Self, GeomError> {
        const OP: &str = "Vector3::rotate_axis";
        let (sin, cos) = radians.sin_cos();
        let Self { x, y, z } = self;
        match axis {
            Axis::X => Self::checked(OP, "radians", x, y * cos - z * sin, y * sin + z * cos),
            Axis::Y => Self::checked(OP, "radians", x * cos + z * sin, y, -x * sin + z * cos),
            Axis::Z => Self::checked(OP, "radians", x * cos - y * sin, x * sin + y * cos, z),
        }
    }

    /// Rotate about an arbitrary axis through the origin (Rodrigues' formula).
    ///
    /// A non-unit `axis` is normalized first.
    ///
    /// # Errors
    /// [`GeomError::InvalidAxis`] if `axis` has zero or non-finite length,
    /// [`GeomError::InvalidValue`] if `radians` is non-finite.
    pub fn rotate_around_axis(self, axis: Self, radians: f64) -> Result<Self, GeomError> {
        self.rotate_around_axis_with_sink(axis, radians, &mut LogSink)
    }

    /// [`Vector3::rotate_around_axis`] reporting axis normalization to `sink`.
    ///
    /// # Errors
    /// See [`Vector3::rotate_around_axis`].
    pub fn rotate_around_axis_with_sink(
        self,
        axis: Self,
        radians: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        const OP: &str = "Vector3::rotate_around_axis";
        let len = axis.magnitude();
        if len == 0.0 || !len.is_finite() {
            return Err(GeomError::InvalidAxis { op: OP });
        }
        let k = if (len - 1.0).abs() > Tolerance::ZERO_LENGTH.eps {
            sink.report(GeomDiagnostic::AxisRenormalized { length: len });
            Self::raw(axis.x / len, axis.y / len, axis.z / len)
        } else {
            axis
        };

        let (sin, cos) = radians.sin_cos();
        let one_minus_cos = 1.0 - cos;
        let dot = k.dot(self);
        let Self { x, y, z } = self;

        Self::checked(
            OP,
            "radians",
            x * cos + (k.y * z - k.z * y) * sin + k.x * dot * one_minus_cos,
            y * cos + (k.z * x - k.x * z) * sin + k.y * dot * one_minus_cos,
            z * cos + (k.x * y - k.y * x) * sin + k.z * dot * one_minus_cos,
        )
    }

    // ── Interpolation ───────────────────────────────────────────────────────

    /// Linear interpolation `self + t * (rhs - self)`.
    ///
    /// `t` outside `[0, 1]` extrapolates along the line.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `t` is non-finite or the result
    /// overflows.
    pub fn lerp(self, rhs: Self, t: f64) -> Result<Self, GeomError> {
        self.lerp_with_sink(rhs, t, &mut LogSink)
    }

    /// [`Vector3::lerp`] reporting extrapolation to `sink`.
    ///
    /// # Errors
    /// See [`Vector3::lerp`].
    pub fn lerp_with_sink(
        self,
        rhs: Self,
        t: f64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GeomError> {
        const OP: &str = "Vector3::lerp";
        if !t.is_finite() {
            return Err(GeomError::invalid_value(OP, "t", "must be finite"));
        }
        if !(0.0..=1.0).contains(&t) {
            sink.report(GeomDiagnostic::Extrapolated { op: OP, t });
        }
        Self::checked(
            OP,
            "t",
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    /// Point halfway between `self` and `rhs`.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the result overflows.
    pub fn midpoint(self, rhs: Self) -> Result<Self, GeomError> {
        self.lerp(rhs, 0.5)
    }

    // ── Comparison ──────────────────────────────────────────────────────────

    /// Component-wise comparison: `|Δ| <= eps` on all three axes.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if `eps` is negative or NaN.
    pub fn epsilon_equals(self, other: Self, eps: f64) -> Result<bool, GeomError> {
        let eps = check_epsilon("Vector3::epsilon_equals", eps)?;
        Ok((self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for Vector3 {}

impl Hash for Vector3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.z.to_bits().hash(state);
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

impl TryFrom<[f64; 3]> for Vector3 {
    type Error = GeomError;

    fn try_from(arr: [f64; 3]) -> Result<Self, Self::Error> {
        Self::from_array(arr)
    }
}

impl TryFrom<&[f64]> for Vector3 {
    type Error = GeomError;

    fn try_from(xyz: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(Some(xyz))
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<Axis> for Vector3 {
    fn from(axis: Axis) -> Self {
        axis.unit()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aabb3
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box with `min <= max` component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb3 {
    /// Smallest box containing every point. `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vector3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Center point of the bounding box.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the box spans more than `f64` can hold.
    pub fn center(self) -> Result<Vector3, GeomError> {
        self.min.midpoint(self.max)
    }

    /// Dimensions of the bounding box.
    ///
    /// # Errors
    /// [`GeomError::InvalidValue`] if the box spans more than `f64` can hold.
    pub fn size(self) -> Result<Vector3, GeomError> {
        self.max.sub(self.min)
    }

    /// Check if a point is inside the bounding box (inclusive).
    #[must_use]
    pub fn contains_point(self, p: Vector3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric operations.
///
/// Use the named constants to avoid epsilon scatter:
/// - `Tolerance::ZERO_LENGTH` - Degenerate vectors and segments (1e-12)
/// - `Tolerance::BASIS_ALIGNMENT` - Supplied vs. computed basis axis (1e-6)
/// - `Tolerance::DEFAULT` - General geometry comparisons (1e-9)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting zero-length/degenerate vectors and segments
    /// (1e-12). Compared against squared lengths for segment directions.
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Largest `|supplied_uz × computed_uz|` accepted when validating a
    /// caller-supplied basis (1e-6).
    pub const BASIS_ALIGNMENT: Self = Self { eps: 1e-6 };

    /// Tight tolerance for precise comparisons (1e-12).
    pub const TIGHT: Self = Self { eps: 1e-12 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_zero_f64(self, a: f64) -> bool {
        a.abs() <= self.eps
    }

    /// Euclidean comparison: `|a - b| <= eps`.
    #[must_use]
    pub fn approx_eq_vec3(self, a: Vector3, b: Vector3) -> bool {
        a.distance_to(b) <= self.eps
    }

    /// Check if a vector is approximately zero (degenerate).
    #[must_use]
    pub fn is_zero_vec3(self, v: Vector3) -> bool {
        v.magnitude_squared() <= self.eps_squared()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
