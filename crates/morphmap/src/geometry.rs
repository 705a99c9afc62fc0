//! Cylinder geometry primitives shared by seeding and region growing.
//!
//! Both functions apply the morphology-to-mesh unit scale before any
//! arithmetic, so callers pass morphology samples as-is and mesh-space
//! points unchanged.

use crate::types::{MorphPoint, Point3};

/// Midpoint of the segment `p0 -> p1`, scaled into mesh space.
///
/// This is the representative point used to seed region growing: the
/// cylinder midpoint is the most likely part of a segment to lie inside
/// the meshed volume.
#[must_use]
pub fn segment_center(p0: MorphPoint, p1: MorphPoint, scale: f64) -> Point3 {
    let a = p0.scaled(scale);
    let b = p1.scaled(scale);
    Point3::new(
        f64::midpoint(a.x, b.x),
        f64::midpoint(a.y, b.y),
        f64::midpoint(a.z, b.z),
    )
}

/// Squared perpendicular distance from `point` to the axis `p0 -> p1`,
/// or `None` when `point` projects outside the segment's extent.
///
/// This is the sole admission test deciding whether a tetrahedron can
/// belong to a segment's cylinder: the projection parameter must fall
/// within `[0, 1]` along the scaled axis. Degenerate (zero-length)
/// segments admit nothing. The sample diameter plays no role.
#[must_use]
pub fn cylinder_distance_squared(
    p0: MorphPoint,
    p1: MorphPoint,
    point: Point3,
    scale: f64,
) -> Option<f64> {
    let a = p0.scaled(scale);
    let b = p1.scaled(scale);

    let ab = (b.x - a.x, b.y - a.y, b.z - a.z);
    let ap = (point.x - a.x, point.y - a.y, point.z - a.z);

    let axis_len_sq = ab.0.mul_add(ab.0, ab.1.mul_add(ab.1, ab.2 * ab.2));
    if axis_len_sq <= 0.0 {
        return None;
    }

    let t = ab.0.mul_add(ap.0, ab.1.mul_add(ap.1, ab.2 * ap.2)) / axis_len_sq;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let foot = Point3::new(
        t.mul_add(ab.0, a.x),
        t.mul_add(ab.1, a.y),
        t.mul_add(ab.2, a.z),
    );
    Some(point.distance_squared(foot))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const fn sample(x: f64, y: f64, z: f64) -> MorphPoint {
        MorphPoint::new(x, y, z, 1.0)
    }

    #[test]
    fn center_is_scaled_midpoint() {
        let c = segment_center(sample(0.0, 0.0, 0.0), sample(2.0, 4.0, 6.0), 0.5);
        assert_eq!(c, Point3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn point_on_axis_has_zero_distance() {
        let dsq = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            1.0,
        )
        .unwrap();
        assert!(dsq.abs() < f64::EPSILON);
    }

    #[test]
    fn perpendicular_offset_is_squared() {
        let dsq = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(5.0, 3.0, 4.0),
            1.0,
        )
        .unwrap();
        assert!((dsq - 25.0).abs() < 1e-12);
    }

    #[test]
    fn projection_before_start_is_out_of_range() {
        let dsq = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(-0.1, 1.0, 0.0),
            1.0,
        );
        assert_eq!(dsq, None);
    }

    #[test]
    fn projection_past_end_is_out_of_range() {
        let dsq = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(10.1, 0.0, 0.0),
            1.0,
        );
        assert_eq!(dsq, None);
    }

    #[test]
    fn endpoints_are_in_range() {
        let p0 = sample(0.0, 0.0, 0.0);
        let p1 = sample(10.0, 0.0, 0.0);
        assert!(cylinder_distance_squared(p0, p1, Point3::new(0.0, 2.0, 0.0), 1.0).is_some());
        assert!(cylinder_distance_squared(p0, p1, Point3::new(10.0, 2.0, 0.0), 1.0).is_some());
    }

    #[test]
    fn degenerate_segment_admits_nothing() {
        let p = sample(3.0, 3.0, 3.0);
        let dsq = cylinder_distance_squared(p, p, Point3::new(3.0, 3.0, 3.0), 1.0);
        assert_eq!(dsq, None);
    }

    #[test]
    fn scale_applies_to_axis_and_range() {
        // Axis spans [0, 10] microns = [0, 1e-5] meters. A point at
        // x = 5e-6 m, offset 2e-6 m off-axis, is in range with the
        // squared offset in mesh units.
        let dsq = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(5e-6, 2e-6, 0.0),
            1e-6,
        )
        .unwrap();
        assert!((dsq - 4e-12).abs() < 1e-24);

        // The same point is far out of range when the scale is 1.0.
        let out = cylinder_distance_squared(
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 0.0),
            Point3::new(-5e-6, 2e-6, 0.0),
            1.0,
        );
        assert_eq!(out, None);
    }
}
