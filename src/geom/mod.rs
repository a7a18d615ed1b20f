//! Immutable 3D geometric primitives.
//!
//! Three layered value types: [`Vector3`] at the bottom, [`Segment3`] built on
//! it, and [`OrientedBox3`] built on both. Supporting modules carry the error
//! taxonomy, the tolerance constants, the advisory diagnostics and the
//! serialization records.

mod core;
mod diagnostics;
mod error;
mod oriented_box;
mod record;
mod segment;

pub use self::core::{Aabb3, Axis, Tolerance, Vector3};
pub use diagnostics::{
    BasisRepair, CollectingSink, DiagnosticSink, GeomDiagnostic, LogSink, NoopSink, Severity,
};
pub use error::{GeomError, GeomErrorKind};
pub use oriented_box::{OrientedBox3, orthonormalize_basis};
pub use record::{OrientedBoxRecord, SegmentRecord};
pub use segment::{ClosestPoints, Segment3};
