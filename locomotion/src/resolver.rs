/*!
Slide-on-contact collision resolution and the ground check.

Resolution is bounded to two casts per tick:

1. Cast along the desired direction for its full length. No contact: move in full.
2. On contact at distance `d`, advance `d - skin` along the desired direction, project
   the leftover onto the contact's tangent plane, and cast once more along that slide
   direction. Clear: apply the slide. Blocked: stop for this tick.

Corners may leave a sliver of penetration; the next tick re-evaluates contacts anyway.
*/

use crate::{
    collision::{CharacterShape, CollisionQuery, Dir, LayerMask, Point3, SurfaceContact, Vec3},
    constants::{DIST_EPS, MIN_MOVE_SQ},
};

/// What the resolver did with one desired displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Movement along the desired direction (the full move, or up to the contact).
    pub advance: Vec3,
    /// Tangential movement after a contact; zero when none was applied.
    pub slide: Vec3,
    /// The first-pass contact, if any.
    pub contact: Option<SurfaceContact>,
}

impl Resolution {
    #[inline]
    fn unobstructed(desired: Vec3) -> Self {
        Self {
            advance: desired,
            slide: Vec3::zeros(),
            contact: None,
        }
    }

    /// Total displacement to apply.
    #[inline]
    pub fn displacement(&self) -> Vec3 {
        self.advance + self.slide
    }

    #[inline]
    pub fn was_blocked(&self) -> bool {
        self.contact.is_some()
    }
}

/// Tangent-plane slide direction for motion `dir` against surface `normal`.
///
/// `normalize(cross(cross(normal, dir), normal))`; `None` when `dir` is parallel to the
/// normal (head-on hit) and there is nothing to slide along.
pub fn slide_direction(normal: &Vec3, dir: &Vec3) -> Option<Dir> {
    let tangent = normal.cross(dir).cross(normal);
    Dir::try_new(tangent, DIST_EPS)
}

/// Turn `desired` into a displacement that does not pass through geometry.
pub fn resolve<Q: CollisionQuery + ?Sized>(
    query: &Q,
    feet: &Point3,
    shape: &CharacterShape,
    desired: Vec3,
    skin: f32,
    filter: LayerMask,
) -> Resolution {
    if desired.norm_squared() <= MIN_MOVE_SQ {
        return Resolution::unobstructed(desired);
    }

    let (dir, len) = Dir::new_and_get(desired);
    let Some(contact) = query.cast_capsule(feet, shape, &dir, len, filter) else {
        return Resolution::unobstructed(desired);
    };

    let d = contact.distance.min(len);
    let advance = dir.into_inner() * (d - skin);
    let mut resolution = Resolution {
        advance,
        slide: Vec3::zeros(),
        contact: Some(contact),
    };

    let Some(slide_dir) = slide_direction(&contact.normal, &dir) else {
        return resolution;
    };

    let remainder = dir.into_inner() * (len - d);
    let amount = remainder.dot(&slide_dir.into_inner());
    if amount <= DIST_EPS {
        return resolution;
    }

    let slide_from = feet + advance;
    if query
        .cast_capsule(&slide_from, shape, &slide_dir, amount, filter)
        .is_none()
    {
        resolution.slide = slide_dir.into_inner() * amount;
    }

    resolution
}

/// Outcome of the post-move ground check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundCheck {
    /// The probe sphere touched something.
    pub touching: bool,
    /// Touching and not moving upward.
    pub grounded: bool,
}

/// Probe around the lower cap and decide groundedness for vertical speed `vertical_velocity`.
pub fn check_ground<Q: CollisionQuery + ?Sized>(
    query: &Q,
    feet: &Point3,
    shape: &CharacterShape,
    vertical_velocity: f32,
    tolerance: f32,
    filter: LayerMask,
) -> GroundCheck {
    let center = shape.lower_sphere_center(feet);
    let touching = query.probe_ground(&center, shape.radius, tolerance, filter);
    GroundCheck {
        touching,
        grounded: touching && vertical_velocity <= 0.0,
    }
}

/// Height of the nearest surface below the character, within `range` past the capsule's
/// half height.
pub fn probe_ground_height<Q: CollisionQuery + ?Sized>(
    query: &Q,
    feet: &Point3,
    shape: &CharacterShape,
    range: f32,
    filter: LayerMask,
) -> Option<f32> {
    let down = -Vec3::y_axis();
    let reach = shape.height * 0.5 + range;
    query
        .cast_capsule(feet, shape, &down, reach, filter)
        .map(|hit| feet.y - hit.distance)
}
