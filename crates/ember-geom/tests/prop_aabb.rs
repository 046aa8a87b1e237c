use ember_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

// Well-formed box: min <= max on every axis.
fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (
        bounded_f32(),
        bounded_f32(),
        bounded_f32(),
        bounded_f32(),
        bounded_f32(),
        bounded_f32(),
    )
        .prop_map(|(x0, y0, z0, x1, y1, z1)| {
            Aabb::new(
                Vec3::new(x0.min(x1), y0.min(y1), z0.min(z1)),
                Vec3::new(x0.max(x1), y0.max(y1), z0.max(z1)),
            )
        })
}

// Interpolation factor in [0, 1].
fn unit_f32() -> impl Strategy<Value = f32> {
    (0.0f32..=1.0f32).prop_filter("finite", |v| v.is_finite())
}

proptest! {
    // Corners are inclusive.
    #[test]
    fn aabb_contains_its_corners(bb in arb_aabb()) {
        prop_assert!(bb.contains_point(bb.min));
        prop_assert!(bb.contains_point(bb.max));
    }

    // Any convex combination of min and max lies inside.
    #[test]
    fn aabb_contains_interpolated_points(
        bb in arb_aabb(),
        tx in unit_f32(),
        ty in unit_f32(),
        tz in unit_f32(),
    ) {
        let p = Vec3::new(
            bb.min.x + (bb.max.x - bb.min.x) * tx,
            bb.min.y + (bb.max.y - bb.min.y) * ty,
            bb.min.z + (bb.max.z - bb.min.z) * tz,
        );
        prop_assert!(bb.contains_point(p));
    }

    // The center is the midpoint and is always contained.
    #[test]
    fn aabb_center_is_midpoint(bb in arb_aabb()) {
        let c = bb.center();
        prop_assert!(bb.contains_point(c));
        prop_assert!(c.x >= bb.min.x && c.x <= bb.max.x);
        prop_assert!(c.y >= bb.min.y && c.y <= bb.max.y);
        prop_assert!(c.z >= bb.min.z && c.z <= bb.max.z);
    }

    // Points strictly past max on any axis are rejected.
    #[test]
    fn aabb_rejects_points_past_max(bb in arb_aabb()) {
        let step = 1.0 + (bb.max.x.abs() + bb.max.y.abs() + bb.max.z.abs()) * 1e-3;
        let p = Vec3::new(bb.max.x + step, bb.max.y, bb.max.z);
        prop_assert!(!bb.contains_point(p));
    }
}
