/// Broad classification of a [`GeomError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomErrorKind {
    /// A required argument was absent.
    NullInput,
    /// A scalar or vector argument was outside its domain.
    InvalidValue,
}

/// Errors raised at the API boundary of the geometry primitives.
///
/// Every variant names the failing operation (`op`) so callers can report
/// which call rejected its input. Numerically degenerate but well-defined
/// situations (zero-length normalization, degenerate segments, parallel lines)
/// are not errors; they are reported through a
/// [`DiagnosticSink`](super::DiagnosticSink) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeomError {
    #[error("{op}: required argument `{param}` is missing")]
    NullInput {
        op: &'static str,
        param: &'static str,
    },
    #[error("{op}: invalid `{param}`: {reason}")]
    InvalidValue {
        op: &'static str,
        param: &'static str,
        reason: &'static str,
    },
    #[error("{op}: rotation axis must be finite and non-zero")]
    InvalidAxis { op: &'static str },
}

impl GeomError {
    pub(crate) const fn null_input(op: &'static str, param: &'static str) -> Self {
        Self::NullInput { op, param }
    }

    pub(crate) const fn invalid_value(
        op: &'static str,
        param: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::InvalidValue { op, param, reason }
    }

    /// The taxonomy bucket of this error. An invalid rotation axis is an
    /// out-of-domain value.
    #[must_use]
    pub const fn kind(&self) -> GeomErrorKind {
        match self {
            Self::NullInput { .. } => GeomErrorKind::NullInput,
            Self::InvalidValue { .. } | Self::InvalidAxis { .. } => GeomErrorKind::InvalidValue,
        }
    }

    /// Name of the operation that rejected its input.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::NullInput { op, .. } | Self::InvalidValue { op, .. } | Self::InvalidAxis { op } => {
                *op
            }
        }
    }
}

/// Rejects negative and NaN tolerances; `+inf` is accepted.
pub(crate) fn check_epsilon(op: &'static str, eps: f64) -> Result<f64, GeomError> {
    if eps >= 0.0 {
        Ok(eps)
    } else {
        Err(GeomError::invalid_value(op, "epsilon", "must be >= 0"))
    }
}
