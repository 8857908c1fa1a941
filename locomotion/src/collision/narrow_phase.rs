use nalgebra as na;
use rapier3d::parry::{
    query::{self, ShapeCastHit, ShapeCastOptions},
    shape as pshape,
};

use super::types::{Dir, Iso, StaticShape, SurfaceContact, Vec3};

/// Build the parry geometry for a static shape and hand it to `f`.
///
/// Shapes are created on the stack per call; the static list stays plain data.
fn with_static_geometry<R>(
    target: &StaticShape,
    f: impl FnOnce(&Iso, &dyn pshape::Shape) -> R,
) -> R {
    match *target {
        StaticShape::Plane { normal, dist } => {
            // Plane equation in world space: normal ⋅ x = dist.
            // Represent it as a parry HalfSpace positioned at unit_normal * dist.
            let unit_n = na::Unit::new_normalize(normal);
            let plane = pshape::HalfSpace::new(unit_n);
            let at = unit_n.into_inner() * dist;
            let plane_iso = Iso::translation(at.x, at.y, at.z);
            f(&plane_iso, &plane)
        }
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => {
            let cuboid = pshape::Cuboid::new(half_extents);
            f(&transform.iso(), &cuboid)
        }
        StaticShape::Sphere { radius, transform } => {
            // Rotation is irrelevant for a ball.
            let ball = pshape::Ball::new(radius);
            f(&transform.iso(), &ball)
        }
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => {
            let capsule = pshape::Capsule::new_y(half_height, radius);
            f(&transform.iso(), &capsule)
        }
    }
}

/// Convert a parry shape-cast hit into a world-space [`SurfaceContact`].
///
/// The cast must have been made with a unit velocity so that the time of impact
/// is a distance in meters.
pub(crate) fn contact_from_hit(shape_iso: &Iso, dir: &Dir, hit: &ShapeCastHit) -> SurfaceContact {
    let d = dir.into_inner();
    let distance = hit.time_of_impact.max(0.0);

    // witness1 is local to the moving shape at its impact pose.
    let point = shape_iso.transform_point(&hit.witness1) + d * distance;

    // normal1 points out of the moving shape; the surface normal must oppose the motion.
    let mut normal = shape_iso.rotation * hit.normal1.into_inner();
    if normal.dot(&d) > 0.0 {
        normal = -normal;
    }

    SurfaceContact {
        distance,
        point,
        normal,
    }
}

/// Sweep a moving shape against a single static shape and return the contact (if any).
///
/// - `shape_iso`: the moving shape's starting isometry in world space.
/// - `dir`: unit sweep direction.
/// - `max_distance`: sweep length in meters.
///
/// Initial penetration is reported as a contact at distance zero.
pub fn cast_against_static(
    shape_iso: &Iso,
    shape: &dyn pshape::Shape,
    dir: &Dir,
    max_distance: f32,
    target: &StaticShape,
) -> Option<SurfaceContact> {
    with_static_geometry(target, |target_iso, target_shape| {
        let mut opts = ShapeCastOptions::with_max_time_of_impact(max_distance);
        opts.stop_at_penetration = true;

        let Ok(Some(hit)) = query::cast_shapes(
            shape_iso,
            &dir.into_inner(),
            shape,
            target_iso,
            &Vec3::zeros(),
            target_shape,
            opts,
        ) else {
            return None;
        };

        Some(contact_from_hit(shape_iso, dir, &hit))
    })
}

/// Return the nearest contact across `statics`.
///
/// Convenience wrapper that repeatedly calls [`cast_against_static`] and keeps the
/// minimum distance.
pub fn earliest_contact<'a>(
    shape_iso: &Iso,
    shape: &dyn pshape::Shape,
    dir: &Dir,
    max_distance: f32,
    statics: impl IntoIterator<Item = &'a StaticShape>,
) -> Option<SurfaceContact> {
    let mut best: Option<SurfaceContact> = None;
    for s in statics {
        if let Some(hit) = cast_against_static(shape_iso, shape, dir, max_distance, s) {
            if best.is_none_or(|b| hit.distance < b.distance) {
                best = Some(hit);
            }
        }
    }
    best
}

/// True when `shape` placed at `shape_iso` overlaps `target`.
///
/// Unsupported shape pairs count as no overlap.
pub fn intersects_static(shape_iso: &Iso, shape: &dyn pshape::Shape, target: &StaticShape) -> bool {
    with_static_geometry(target, |target_iso, target_shape| {
        query::intersection_test(shape_iso, shape, target_iso, target_shape).unwrap_or(false)
    })
}
