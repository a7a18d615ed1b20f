use proptest::prelude::*;

use ghx_prims::{OrientedBox3, Segment3, Vector3};

fn coord() -> impl Strategy<Value = f64> {
    -1.0e3..1.0e3
}

fn vector() -> impl Strategy<Value = Vector3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vector3::new(x, y, z).unwrap())
}

fn non_zero_vector() -> impl Strategy<Value = Vector3> {
    vector().prop_filter("non-zero", |v| v.magnitude() > 1e-3)
}

fn segment() -> impl Strategy<Value = Segment3> {
    (vector(), vector()).prop_map(|(a, b)| Segment3::new(a, b))
}

/// Two segments whose directions differ by a tiny perturbation.
fn nearly_parallel_pair() -> impl Strategy<Value = (Segment3, Segment3)> {
    let wobble = -1e-5..1e-5_f64;
    (segment(), vector(), (wobble.clone(), wobble.clone(), wobble)).prop_map(
        |(a, offset, (dx, dy, dz))| {
            let q0 = a.p0().add(offset).unwrap();
            let q1 = a.p1().add(offset).unwrap().translate(dx, dy, dz).unwrap();
            (a, Segment3::new(q0, q1))
        },
    )
}

fn endpoint_bound(a: Segment3, b: Segment3) -> f64 {
    [
        a.distance_to_point(b.p0()).unwrap(),
        a.distance_to_point(b.p1()).unwrap(),
        b.distance_to_point(a.p0()).unwrap(),
        b.distance_to_point(a.p1()).unwrap(),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

proptest! {
    #[test]
    fn array_conversion_is_exact(x in any::<f64>(), y in any::<f64>(), z in any::<f64>()) {
        prop_assume!(x.is_finite() && y.is_finite() && z.is_finite());
        let p = Vector3::new(x, y, z).unwrap();
        prop_assert_eq!(p.to_array(), [x, y, z]);
        prop_assert_eq!(Vector3::from_array(p.to_array()).unwrap(), p);
    }

    #[test]
    fn normalize_gives_unit_length(p in non_zero_vector()) {
        prop_assert!((p.normalize().magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_preserves_norm(p in vector(), axis in non_zero_vector(), angle in -10.0..10.0_f64) {
        let r = p.rotate_around_axis(axis, angle).unwrap();
        prop_assert!((r.magnitude() - p.magnitude()).abs() <= 1e-9 * (1.0 + p.magnitude()));
    }

    #[test]
    fn lerp_hits_endpoints(a in vector(), b in vector()) {
        prop_assert_eq!(a.lerp(b, 0.0).unwrap(), a);
        prop_assert!(a.lerp(b, 1.0).unwrap().epsilon_equals(b, 1e-9).unwrap());
        prop_assert_eq!(a.midpoint(b).unwrap(), a.lerp(b, 0.5).unwrap());
    }

    #[test]
    fn point_distance_symmetric_under_swap(a in vector(), b in vector(), p in vector()) {
        let d1 = Segment3::new(a, b).distance_to_point(p).unwrap();
        let d2 = Segment3::new(b, a).distance_to_point(p).unwrap();
        prop_assert!(d1 >= 0.0);
        prop_assert!((d1 - d2).abs() <= 1e-9 * (1.0 + d1));
    }

    #[test]
    fn points_on_segment_have_zero_distance(s in segment(), t in 0.0..=1.0_f64) {
        let p = s.point_at(t).unwrap();
        prop_assert!(s.distance_to_point(p).unwrap() <= 1e-9);
    }

    #[test]
    fn segment_distance_is_symmetric(a in segment(), b in segment()) {
        let ab = a.shortest_distance_segment(b).unwrap();
        let ba = b.shortest_distance_segment(a).unwrap();
        prop_assert!((ab - ba).abs() <= 1e-9 * (1.0 + ab));
    }

    #[test]
    fn closest_points_are_no_worse_than_endpoints(a in segment(), b in segment()) {
        let cp = a.closest_points_on_segments(b).unwrap();
        prop_assert!(cp.distance() <= endpoint_bound(a, b) + 1e-9);
    }

    #[test]
    fn nearly_parallel_closest_points_are_no_worse_than_endpoints(
        (a, b) in nearly_parallel_pair(),
    ) {
        let cp = a.closest_points_on_segments(b).unwrap();
        prop_assert!(cp.distance() <= endpoint_bound(a, b) + 1e-9);
        let back = b.closest_points_on_segments(a).unwrap();
        prop_assert!(back.distance() <= endpoint_bound(a, b) + 1e-9);
    }

    #[test]
    fn closest_points_lie_on_both_segments(a in segment(), b in segment()) {
        let cp = a.closest_points_on_segments(b).unwrap();
        prop_assert!((0.0..=1.0).contains(&cp.s));
        prop_assert!((0.0..=1.0).contains(&cp.t));
        prop_assert!(a.distance_to_point(cp.on_self).unwrap() <= 1e-9);
        prop_assert!(b.distance_to_point(cp.on_other).unwrap() <= 1e-9);
    }

    #[test]
    fn from_basis_is_orthonormal(
        ux in non_zero_vector(),
        uy in vector(),
        uz in vector(),
        edge in 1e-3..1e3_f64,
    ) {
        let cube = OrientedBox3::from_basis(Vector3::ZERO, edge, ux, uy, uz).unwrap();
        let [x, y, z] = cube.basis();
        for axis in [x, y, z] {
            prop_assert!((axis.magnitude() - 1.0).abs() < 1e-9);
        }
        prop_assert!(x.dot(y).abs() < 1e-9);
        prop_assert!(y.dot(z).abs() < 1e-9);
        prop_assert!(x.dot(z).abs() < 1e-9);
        prop_assert!(x.cross(y).unwrap().epsilon_equals(z, 1e-9).unwrap());
    }

    #[test]
    fn translate_then_inverse_restores_center(c in vector(), d in vector()) {
        let cube = OrientedBox3::new(c, 1.0).unwrap();
        let back = cube.translate(d).unwrap().translate(d.neg()).unwrap();
        prop_assert!(back.center().epsilon_equals(c, 1e-9).unwrap());
    }

    #[test]
    fn rotate_around_center_keeps_center(
        c in vector(),
        axis in non_zero_vector(),
        angle in -10.0..10.0_f64,
    ) {
        let cube = OrientedBox3::new(c, 2.0).unwrap();
        let r = cube.rotate_around_center(axis, angle).unwrap();
        prop_assert_eq!(r.center(), c);
    }
}
