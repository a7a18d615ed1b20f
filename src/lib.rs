#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Immutable 3D primitives for spatial math: finite vectors, line segments
//! and oriented cubes.
//!
//! Every value is validated at construction and never changes afterwards.
//! Invalid input fails with a [`GeomError`]; numerically degenerate input that
//! has a well-defined answer (normalizing the zero vector, a zero-length
//! segment, a skewed cube frame) takes a documented fallback and is reported
//! through a [`DiagnosticSink`].
//!
//! ```
//! use ghx_prims::{OrientedBox3, Segment3, Vector3};
//!
//! # fn main() -> Result<(), ghx_prims::GeomError> {
//! let cube = OrientedBox3::new(Vector3::ZERO, 2.0)?.rotate_z(std::f64::consts::FRAC_PI_4)?;
//! assert!(cube.contains(Vector3::new(1.2, 0.0, 0.0)?, 0.0)?);
//!
//! let a = Segment3::new(Vector3::new(-1.0, 0.0, 0.0)?, Vector3::new(1.0, 0.0, 0.0)?);
//! let b = Segment3::new(Vector3::new(0.0, -1.0, 1.0)?, Vector3::new(0.0, 1.0, 1.0)?);
//! assert!((a.shortest_distance_segment(b)? - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod geom;

pub use geom::{
    Aabb3, Axis, ClosestPoints, DiagnosticSink, GeomDiagnostic, GeomError, GeomErrorKind,
    OrientedBox3, Segment3, Tolerance, Vector3,
};
