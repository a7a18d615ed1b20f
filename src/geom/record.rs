//! Loosely typed records for the serialization boundary.
//!
//! Records mirror the primitives with plain arrays and `Option` for required
//! parts, so documents coming from outside can be parsed first and validated
//! second. Converting a record into a primitive goes through the same
//! factories as the typed API; a missing required part yields
//! [`GeomError::NullInput`].
//!
//! The primitives serialize to these shapes and deserialize through them:
//!
//! ```
//! use ghx_prims::geom::{Segment3, Vector3};
//!
//! let json = r#"{"p0":[0.0,0.0,0.0],"p1":[1.0,2.0,3.0]}"#;
//! let segment: Segment3 = serde_json::from_str(json).unwrap();
//! assert_eq!(segment.p1(), Vector3::new(1.0, 2.0, 3.0).unwrap());
//!
//! assert!(serde_json::from_str::<Segment3>(r#"{"p0":[0.0,0.0,0.0]}"#).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::core::Vector3;
use super::error::GeomError;
use super::oriented_box::OrientedBox3;
use super::segment::Segment3;

/// Serialized form of a [`Segment3`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(default)]
    pub p0: Option<[f64; 3]>,
    #[serde(default)]
    pub p1: Option<[f64; 3]>,
}

/// Serialized form of an [`OrientedBox3`]. `basis` holds `[ux, uy, uz]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBoxRecord {
    #[serde(default)]
    pub center: Option<[f64; 3]>,
    pub edge: f64,
    #[serde(default)]
    pub basis: Option<[[f64; 3]; 3]>,
}

fn required<T>(op: &'static str, param: &'static str, value: Option<T>) -> Result<T, GeomError> {
    value.ok_or(GeomError::null_input(op, param))
}

impl TryFrom<SegmentRecord> for Segment3 {
    type Error = GeomError;

    fn try_from(record: SegmentRecord) -> Result<Self, Self::Error> {
        const OP: &str = "Segment3::try_from";
        let p0 = Vector3::from_array(required(OP, "p0", record.p0)?)?;
        let p1 = Vector3::from_array(required(OP, "p1", record.p1)?)?;
        Ok(Self::new(p0, p1))
    }
}

impl From<Segment3> for SegmentRecord {
    fn from(segment: Segment3) -> Self {
        Self {
            p0: Some(segment.p0().to_array()),
            p1: Some(segment.p1().to_array()),
        }
    }
}

impl TryFrom<OrientedBoxRecord> for OrientedBox3 {
    type Error = GeomError;

    fn try_from(record: OrientedBoxRecord) -> Result<Self, Self::Error> {
        const OP: &str = "OrientedBox3::try_from";
        let center = Vector3::from_array(required(OP, "center", record.center)?)?;
        let [ux, uy, uz] = required(OP, "basis", record.basis)?;
        Self::from_basis(
            center,
            record.edge,
            Vector3::from_array(ux)?,
            Vector3::from_array(uy)?,
            Vector3::from_array(uz)?,
        )
    }
}

impl From<OrientedBox3> for OrientedBoxRecord {
    fn from(cube: OrientedBox3) -> Self {
        Self {
            center: Some(cube.center().to_array()),
            edge: cube.edge(),
            basis: Some(cube.basis().map(Vector3::to_array)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::GeomErrorKind;

    #[test]
    fn test_missing_segment_endpoint_is_null_input() {
        let record = SegmentRecord {
            p0: Some([0.0, 0.0, 0.0]),
            p1: None,
        };
        let err = Segment3::try_from(record).unwrap_err();
        assert_eq!(err.kind(), GeomErrorKind::NullInput);
        assert_eq!(
            err,
            GeomError::NullInput {
                op: "Segment3::try_from",
                param: "p1"
            }
        );
    }

    #[test]
    fn test_non_finite_segment_endpoint_is_invalid() {
        let record = SegmentRecord {
            p0: Some([f64::NAN, 0.0, 0.0]),
            p1: Some([1.0, 0.0, 0.0]),
        };
        assert_eq!(
            Segment3::try_from(record).unwrap_err().kind(),
            GeomErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_segment_record_conversion() {
        let record = SegmentRecord {
            p0: Some([1.0, 2.0, 3.0]),
            p1: Some([4.0, 5.0, 6.0]),
        };
        let segment = Segment3::try_from(record).unwrap();
        assert_eq!(SegmentRecord::from(segment), record);
    }

    #[test]
    fn test_box_record_requires_center_and_basis() {
        let record = OrientedBoxRecord {
            center: None,
            edge: 1.0,
            basis: Some([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        };
        assert_eq!(
            OrientedBox3::try_from(record).unwrap_err().kind(),
            GeomErrorKind::NullInput
        );

        let record = OrientedBoxRecord {
            center: Some([0.0, 0.0, 0.0]),
            edge: 1.0,
            basis: None,
        };
        assert_eq!(
            OrientedBox3::try_from(record).unwrap_err().kind(),
            GeomErrorKind::NullInput
        );
    }

    #[test]
    fn test_box_record_validates_edge_and_repairs_basis() {
        let record = OrientedBoxRecord {
            center: Some([0.0, 0.0, 0.0]),
            edge: -1.0,
            basis: Some([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        };
        assert_eq!(
            OrientedBox3::try_from(record).unwrap_err().kind(),
            GeomErrorKind::InvalidValue
        );

        let record = OrientedBoxRecord {
            center: Some([1.0, 1.0, 1.0]),
            edge: 2.0,
            basis: Some([[3.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]),
        };
        let cube = OrientedBox3::try_from(record).unwrap();
        assert_eq!(cube.basis(), [Vector3::X, Vector3::Y, Vector3::Z]);
    }

    #[test]
    fn test_serde_json_shapes() {
        let cube = OrientedBox3::new(Vector3::new(1.0, 2.0, 3.0).unwrap(), 0.5).unwrap();
        let json = serde_json::to_value(cube).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "center": [1.0, 2.0, 3.0],
                "edge": 0.5,
                "basis": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            })
        );
        let back: OrientedBox3 = serde_json::from_value(json).unwrap();
        assert_eq!(back, cube);

        let v: Vector3 = serde_json::from_str("[1.0, -2.0, 0.5]").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,-2.0,0.5]");
        assert!(serde_json::from_str::<Vector3>("[1.0, 2.0]").is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_box() {
        let json = r#"{"center":[0,0,0],"edge":0,"basis":[[1,0,0],[0,1,0],[0,0,1]]}"#;
        let err = serde_json::from_str::<OrientedBox3>(json).unwrap_err();
        assert!(err.to_string().contains("edge"));
    }
}
