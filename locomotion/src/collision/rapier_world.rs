//! Rapier-based query world for immutable/static world geometry.
//!
//! Hosts build an in-memory Rapier scene from a set of static collider definitions
//! once, then hand it to every character as its [`CollisionQuery`] backend.
//!
//! Rows are inserted in `id` order, so equal inputs give identical collider sets.
//! No dynamics are ever stepped, and statics are assumed not to move after the build.

// Re-export Rapier so downstream crates can name Rapier types without depending on
// `rapier3d` directly.
pub use rapier3d;

use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use super::{
    CollisionQuery,
    narrow_phase::contact_from_hit,
    types::{CharacterShape, Dir, Iso, LayerMask, Point3, SurfaceContact},
};
use crate::error::WorldBuildError;

/// One static collider row, as a level file or editor would describe it.
///
/// Units are meters. For planes, the normal is pose-derived: `normal = rotation * +Y`, and the plane
///   passes through `translation + normal * offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Unique per world; also the insertion order.
    pub id: u32,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    /// Layers this collider belongs to.
    pub layers: LayerMask,
}

impl WorldStaticDef {
    /// Definition with identity rotation on every layer.
    pub fn at(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            layers: LayerMask::ALL,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    fn validate(&self) -> Result<(), WorldBuildError> {
        let finite_pose = self.translation.iter().all(|v| v.is_finite())
            && self.rotation.coords.iter().all(|v| v.is_finite());
        if !finite_pose {
            return Err(WorldBuildError::NonFinitePose { id: self.id });
        }
        if !self.shape.has_valid_dimensions() {
            return Err(WorldBuildError::InvalidDimensions { id: self.id });
        }
        Ok(())
    }
}

/// Body-local collider geometry.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space); everything below it is solid.
    Plane {
        /// Shift along the plane's own normal.
        offset_along_normal: f32,
    },

    /// Box, oriented by the row's rotation.
    Cuboid { half_extents: Vector<f32> },

    Sphere { radius: f32 },

    CapsuleY { radius: f32, half_height: f32 },

    CylinderY { radius: f32, half_height: f32 },
}

impl ColliderShapeDef {
    fn has_valid_dimensions(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match self {
            Self::Plane {
                offset_along_normal,
            } => offset_along_normal.is_finite(),
            Self::Cuboid { half_extents } => half_extents.iter().all(|v| positive(*v)),
            Self::Sphere { radius } => positive(*radius),
            Self::CapsuleY {
                radius,
                half_height,
            }
            | Self::CylinderY {
                radius,
                half_height,
            } => positive(*radius) && half_height.is_finite() && *half_height >= 0.0,
        }
    }
}

/// Rapier sets for scene queries over static geometry. Build once, query every tick.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Validate and insert `defs`.
    ///
    /// The input is sorted by `id` before insertion. Rows with non-finite poses,
    /// non-positive dimensions, or repeated ids are rejected.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Result<Self, WorldBuildError> {
        defs.sort_by_key(|d| d.id);

        if let Some(pair) = defs.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(WorldBuildError::DuplicateId(pair[0].id));
        }
        for def in &defs {
            def.validate()?;
        }

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // One fixed body per row carries the pose; the collider hangs off it.
        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(&def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Run collision detection only (no dynamics) so the broad phase is populated.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        log::debug!("built rapier query world with {} static colliders", colliders.len());

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        })
    }

    /// Borrowed query view; pass a filter to restrict which colliders are seen.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl CollisionQuery for RapierQueryWorld {
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

        let capsule = Capsule::new_y(shape.half_segment(), shape.radius);
        let c = shape.center(feet);
        let capsule_iso = Iso::translation(c.x, c.y, c.z);

        let keep = |_: ColliderHandle, co: &Collider| {
            LayerMask::from_user_data(co.user_data).intersects(filter)
        };
        let pipeline = self.query_pipeline(QueryFilter::only_fixed().predicate(&keep));

        let mut opts = ShapeCastOptions::with_max_time_of_impact(max_distance);
        opts.stop_at_penetration = true;

        let (_handle, hit) =
            pipeline.cast_shape(&capsule_iso, &direction.into_inner(), &capsule, opts)?;
        Some(contact_from_hit(&capsule_iso, direction, &hit))
    }

    fn probe_ground(
        &self,
        sphere_center: &Point3,
        radius: f32,
        tolerance: f32,
        filter: LayerMask,
    ) -> bool {
        let ball = Ball::new((radius + tolerance).max(0.0));
        let ball_iso = Iso::translation(sphere_center.x, sphere_center.y, sphere_center.z);

        let keep = |_: ColliderHandle, co: &Collider| {
            LayerMask::from_user_data(co.user_data).intersects(filter)
        };
        let pipeline = self.query_pipeline(QueryFilter::only_fixed().predicate(&keep));

        pipeline.intersect_shape(ball_iso, &ball).next().is_some()
    }
}

/// The pose lives on the parent rigid-body, so colliders are built in body-local space.
/// The layer mask travels in `user_data` for query filtering.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local +Y half-space, shifted along its own normal. The body pose rotates
            // and places it, giving `n ⋅ x = n ⋅ translation + offset` in world space.
            ColliderBuilder::halfspace(Vector::y_axis())
                .translation(Vector::y() * *offset_along_normal)
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };

    builder.user_data(def.layers.to_user_data()).build()
}
