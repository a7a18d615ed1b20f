//! Advisory diagnostics for the geometry primitives.
//!
//! Several operations have a well-defined fallback for numerically degenerate
//! input instead of an error: normalizing the zero vector returns it
//! unchanged, a zero-length segment answers distance queries relative to its
//! start point, and an oriented box silently repairs a non-orthonormal basis.
//! Those events are reported to a [`DiagnosticSink`] so callers can observe
//! them without the result changing.
//!
//! Operations that can report come in pairs, e.g. [`Vector3::normalize`] and
//! [`Vector3::normalize_with_sink`]. The plain form forwards to [`LogSink`].
//!
//! # Example
//!
//! ```
//! use ghx_prims::geom::{CollectingSink, GeomDiagnostic, Vector3};
//!
//! let mut sink = CollectingSink::default();
//! let zero = Vector3::ZERO.normalize_with_sink(&mut sink);
//!
//! assert_eq!(zero, Vector3::ZERO);
//! assert_eq!(sink.diagnostics, vec![GeomDiagnostic::ZeroLengthNormalize]);
//! ```
//!
//! [`Vector3::normalize`]: super::Vector3::normalize
//! [`Vector3::normalize_with_sink`]: super::Vector3::normalize_with_sink

use std::fmt;

/// Record of the corrections applied while orthonormalizing a candidate basis.
///
/// All flags `false` means the supplied axes were already an orthonormal,
/// right-handed frame (within tolerance) and were used as given.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasisRepair {
    /// `ux` was not unit length and has been normalized.
    pub ux_normalized: bool,

    /// `uy` had a component along `ux` or was not unit length.
    pub uy_adjusted: bool,

    /// `uy` was colinear with `ux`; a deterministic orthogonal vector was
    /// substituted.
    pub uy_fallback: bool,

    /// `ux × uy` collapsed to zero and the whole frame was rebuilt from `ux`.
    pub uz_rebuilt: bool,

    /// The supplied `uz` did not match `ux × uy` and was discarded.
    pub uz_replaced: bool,
}

impl BasisRepair {
    /// Returns `true` if the supplied basis was used unchanged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.repair_count() == 0
    }

    /// Number of individual corrections applied.
    #[must_use]
    pub fn repair_count(&self) -> usize {
        [
            self.ux_normalized,
            self.uy_adjusted,
            self.uy_fallback,
            self.uz_rebuilt,
            self.uz_replaced,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }
}

impl fmt::Display for BasisRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "basis clean");
        }
        let mut parts = Vec::new();
        if self.ux_normalized {
            parts.push("ux normalized");
        }
        if self.uy_adjusted {
            parts.push("uy orthogonalized");
        }
        if self.uy_fallback {
            parts.push("uy colinear with ux, fallback used");
        }
        if self.uz_rebuilt {
            parts.push("frame rebuilt from ux");
        }
        if self.uz_replaced {
            parts.push("supplied uz replaced by ux x uy");
        }
        write!(f, "basis repaired: {}", parts.join(", "))
    }
}

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Expected use, e.g. extrapolating past a segment end.
    Info,
    /// Degenerate input that was handled by a fallback.
    Warning,
}

/// A single advisory event. Never changes the result of the operation that
/// reported it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeomDiagnostic {
    /// `normalize` was called on the zero vector and returned it unchanged.
    ZeroLengthNormalize,
    /// `normalize` was called on a vector whose magnitude overflows.
    NonFiniteNormalize,
    /// A vector was scaled by zero and collapsed to the origin.
    ZeroScale,
    /// A non-unit rotation axis was normalized before use.
    AxisRenormalized { length: f64 },
    /// An interpolation parameter outside `[0, 1]` was used.
    Extrapolated { op: &'static str, t: f64 },
    /// A segment with (near) zero length was created or queried.
    DegenerateSegment { op: &'static str },
    /// Two directions were found parallel and a parallel fallback was taken.
    ParallelLines { op: &'static str },
    /// A candidate basis needed corrections.
    BasisRepaired(BasisRepair),
}

impl GeomDiagnostic {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Extrapolated { .. } | Self::ParallelLines { .. } => Severity::Info,
            Self::ZeroLengthNormalize
            | Self::NonFiniteNormalize
            | Self::ZeroScale
            | Self::AxisRenormalized { .. }
            | Self::DegenerateSegment { .. }
            | Self::BasisRepaired(_) => Severity::Warning,
        }
    }
}

impl fmt::Display for GeomDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthNormalize => write!(f, "normalize on zero vector; returned unchanged"),
            Self::NonFiniteNormalize => {
                write!(f, "normalize with non-finite magnitude; returned unchanged")
            }
            Self::ZeroScale => write!(f, "scaling by 0 collapses vector to origin"),
            Self::AxisRenormalized { length } => {
                write!(f, "rotation axis of length {length:.6} normalized")
            }
            Self::Extrapolated { op, t } => {
                write!(f, "{op}: t={t:.6} outside [0,1] (extrapolation)")
            }
            Self::DegenerateSegment { op } => write!(f, "{op}: zero-length segment"),
            Self::ParallelLines { op } => write!(f, "{op}: directions are parallel"),
            Self::BasisRepaired(repair) => write!(f, "{repair}"),
        }
    }
}

/// Receiver for advisory diagnostics.
///
/// Implementations must not panic; they observe results, they never alter
/// them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: GeomDiagnostic);
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _diagnostic: GeomDiagnostic) {}
}

/// Forwards diagnostics to the `log` facade: warnings at `warn`, the rest at
/// `debug`. Nothing is printed unless the application installs a logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: GeomDiagnostic) {
        match diagnostic.severity() {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Info => log::debug!("{diagnostic}"),
        }
    }
}

/// Keeps every diagnostic in order of arrival.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectingSink {
    pub diagnostics: Vec<GeomDiagnostic>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of reported diagnostics at [`Severity::Warning`].
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    /// The basis repairs that were reported, in order.
    pub fn basis_repairs(&self) -> impl Iterator<Item = BasisRepair> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            GeomDiagnostic::BasisRepaired(repair) => Some(*repair),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"diagnostics:{n} warnings:{w}"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "diagnostics:{} warnings:{}",
            self.diagnostics.len(),
            self.warning_count()
        )
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: GeomDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl fmt::Display for CollectingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Geometry Diagnostics:")?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "  - {diagnostic}")?;
        }
        let status = if self.is_clean() { "CLEAN" } else { "FALLBACKS USED" };
        writeln!(f, "  Status: {status}")
    }
}
