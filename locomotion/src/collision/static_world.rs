//! Manual capsule-cast backend over a flat list of static shapes.
//!
//! Every query scans the whole list, so this backend suits small scenes, tests, and
//! tools. Larger worlds should use [`RapierQueryWorld`](super::RapierQueryWorld),
//! which prunes through Rapier's broad phase.

use rapier3d::parry::shape as pshape;

use super::{
    CollisionQuery, narrow_phase,
    types::{CharacterShape, Dir, Iso, LayerMask, Point3, Quat, StaticShape, SurfaceContact, Transform, Vec3},
};

/// A static shape tagged with the layers it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    pub shape: StaticShape,
    pub layers: LayerMask,
}

/// Immutable-by-convention collection of static colliders.
#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider on every layer.
    pub fn with(mut self, shape: StaticShape) -> Self {
        self.push(shape, LayerMask::ALL);
        self
    }

    /// Add a collider on the given layers.
    pub fn with_layers(mut self, shape: StaticShape, layers: LayerMask) -> Self {
        self.push(shape, layers);
        self
    }

    pub fn push(&mut self, shape: StaticShape, layers: LayerMask) {
        self.colliders.push(StaticCollider { shape, layers });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn colliders(&self) -> &[StaticCollider] {
        &self.colliders
    }

    fn matching(&self, filter: LayerMask) -> impl Iterator<Item = &StaticShape> {
        self.colliders
            .iter()
            .filter(move |c| c.layers.intersects(filter))
            .map(|c| &c.shape)
    }
}

impl CollisionQuery for StaticWorld {
    fn cast_capsule(
        &self,
        feet: &Point3,
        shape: &CharacterShape,
        direction: &Dir,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<SurfaceContact> {
        if max_distance <= 0.0 {
            return None;
        }

        // Y-aligned capsule (controller axis is +Y).
        let capsule = pshape::Capsule::new_y(shape.half_segment(), shape.radius);
        let c = shape.center(feet);
        let capsule_iso = Iso::translation(c.x, c.y, c.z);

        narrow_phase::earliest_contact(
            &capsule_iso,
            &capsule,
            direction,
            max_distance,
            self.matching(filter),
        )
    }

    fn probe_ground(
        &self,
        sphere_center: &Point3,
        radius: f32,
        tolerance: f32,
        filter: LayerMask,
    ) -> bool {
        let ball = pshape::Ball::new((radius + tolerance).max(0.0));
        let ball_iso = Iso::translation(sphere_center.x, sphere_center.y, sphere_center.z);

        self.matching(filter)
            .any(|s| narrow_phase::intersects_static(&ball_iso, &ball, s))
    }
}

/// Convenience: build a `StaticShape::Plane` from a world-space plane pose:
/// - normal = rotation * +Y
/// - dist = dot(normal, translation) + optional offset
#[inline]
pub fn plane_from_pose(rotation: Quat, translation: Vec3, offset_along_normal: f32) -> StaticShape {
    let normal = rotation * Vec3::y();
    let dist = normal.dot(&translation) + offset_along_normal;
    StaticShape::Plane { normal, dist }
}

/// Convenience: horizontal ground plane at height `y`.
#[inline]
pub fn ground_plane(y: f32) -> StaticShape {
    StaticShape::Plane {
        normal: Vec3::y(),
        dist: y,
    }
}

/// Convenience: build a `StaticShape::Cuboid` with given half extents and pose.
#[inline]
pub fn cuboid_from_pose(half_extents: Vec3, translation: Vec3, rotation: Quat) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform::new(translation, rotation),
    }
}
