/*!
Collision root module.

The locomotion core never talks to a physics engine directly. It consumes the
[`CollisionQuery`] contract, which two backends implement:

- [`StaticWorld`]: manual capsule casts against a flat list of static shapes
  using parry3d narrow-phase queries.
- [`RapierQueryWorld`]: a Rapier collider set queried through Rapier's `QueryPipeline`.

Submodules:

- types:         shared data types (math aliases, shapes, layer masks, contacts)
- narrow_phase:  thin wrappers over parry3d queries (shape casts, intersections)
- static_world:  the flat-list backend
- rapier_world:  the Rapier-backed backend
*/

pub mod narrow_phase;
pub mod rapier_world;
pub mod static_world;
pub mod types;

pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use static_world::{
    StaticCollider, StaticWorld, cuboid_from_pose, ground_plane, plane_from_pose,
};
pub use types::{
    CharacterShape, Dir, Iso, LayerMask, Point3, Quat, StaticShape, SurfaceContact, Transform,
    Vec3,
};

/// Read-only collision queries the locomotion core depends on.
///
/// "No contact" is a valid negative answer, never an error. Implementations must not
/// mutate shared state, so any number of characters may query the same world within
/// one tick.
pub trait CollisionQuery {
    /// Sweep the character capsule standing at `feet` along `direction` for up to
    /// `max_distance` meters and return the nearest blocking contact.
    ///
    /// A capsule that already overlaps geometry reports a contact at distance zero.
    fn cast_capsule(
        &self,
        feet: &Point3,
        shape: &CharacterShape,
        direction: &Dir,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<SurfaceContact>;

    /// True if any surface lies within `tolerance` of a sphere of `radius` centred at
    /// `sphere_center` (normally the capsule's lower cap).
    fn probe_ground(
        &self,
        sphere_center: &Point3,
        radius: f32,
        tolerance: f32,
        filter: LayerMask,
    ) -> bool;

    /// Nearest grabbable ledge point within `range` of the capsule, if the backend
    /// knows about ledges at all.
    fn closest_ledge(
        &self,
        _feet: &Point3,
        _shape: &CharacterShape,
        _range: f32,
        _filter: LayerMask,
    ) -> Option<Point3> {
        None
    }
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    #[inline]
    fn cast_capsule(
        &self,
        feet: &Point3,
        shape: &CharacterShape,
        direction: &Dir,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<SurfaceContact> {
        (**self).cast_capsule(feet, shape, direction, max_distance, filter)
    }

    #[inline]
    fn probe_ground(
        &self,
        sphere_center: &Point3,
        radius: f32,
        tolerance: f32,
        filter: LayerMask,
    ) -> bool {
        (**self).probe_ground(sphere_center, radius, tolerance, filter)
    }

    #[inline]
    fn closest_ledge(
        &self,
        feet: &Point3,
        shape: &CharacterShape,
        range: f32,
        filter: LayerMask,
    ) -> Option<Point3> {
        (**self).closest_ledge(feet, shape, range, filter)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_backend<Q: CollisionQuery>(_: &Q) {}

    #[test]
    fn references_forward_to_the_backend() {
        let world = StaticWorld::new().with(ground_plane(0.0));
        let by_ref = &world;
        assert_backend(&by_ref);

        let shape = CharacterShape::new(0.5, 2.0);
        let feet = Point3::new(0.0, 0.5, 0.0);
        let direct = world.cast_capsule(&feet, &shape, &-Vec3::y_axis(), 1.0, LayerMask::ALL);
        let forwarded = by_ref.cast_capsule(&feet, &shape, &-Vec3::y_axis(), 1.0, LayerMask::ALL);
        assert_eq!(direct, forwarded);
    }

    #[test]
    fn default_backend_has_no_ledges() {
        let world = StaticWorld::new().with(ground_plane(0.0));
        let shape = CharacterShape::new(0.5, 2.0);
        assert!(
            world
                .closest_ledge(&Point3::origin(), &shape, 1.0, LayerMask::ALL)
                .is_none()
        );
    }
}
