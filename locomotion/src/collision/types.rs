/*!
Plain data exchanged across the collision layer. Used by:
- the backend contract ([`CollisionQuery`](super::CollisionQuery))
- narrow_phase (parry3d time-of-impact and intersection queries)
- the slide resolver and ground check
- the locomotion state machine

Conventions
- World up is +Y and every character capsule is Y-aligned.
- A character's position is its feet point (the capsule base), not the capsule centre.
*/

use nalgebra as na;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;
pub type Dir = na::Unit<Vec3>;

/// World pose of a static shape.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// Static collision shapes supported by [`StaticWorld`](super::StaticWorld).
///
/// Planes are solid on the side opposite their normal.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    Plane {
        normal: Vec3,
        /// `normal ⋅ x = dist` on the surface.
        dist: f32,
    },
    Cuboid {
        half_extents: Vec3,
        transform: Transform,
    },
    Sphere {
        radius: f32,
        /// Rotation is ignored.
        transform: Transform,
    },
    Capsule {
        radius: f32,
        /// Half the cylinder length along local +Y.
        half_height: f32,
        transform: Transform,
    },
}

/// Capsule extents of a character. Configured once, never mutated at runtime.
///
/// `height` is the full height including both caps, so the cylinder section is
/// `height - 2 * radius` long.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterShape {
    pub radius: f32,
    pub height: f32,
}

impl CharacterShape {
    #[inline]
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Half length of the cylinder section, as parry's `Capsule::new_y` expects.
    #[inline]
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Capsule centre for a character standing at `feet`.
    #[inline]
    pub fn center(&self, feet: &Point3) -> Point3 {
        feet + Vec3::y() * (self.height * 0.5)
    }

    /// Centre of the lower cap sphere.
    #[inline]
    pub fn lower_sphere_center(&self, feet: &Point3) -> Point3 {
        feet + Vec3::y() * self.radius
    }

    /// Centre of the upper cap sphere.
    #[inline]
    pub fn upper_sphere_center(&self, feet: &Point3) -> Point3 {
        feet + Vec3::y() * (self.height - self.radius)
    }
}

/// Layer membership / query mask.
///
/// A collider participates in a query when its membership bits intersect the query mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Mask with only `layer` set. Layers above 31 yield an empty mask.
    #[inline]
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Recover a mask stored in a Rapier collider's `user_data`.
    #[inline]
    pub fn from_user_data(user_data: u128) -> Self {
        Self((user_data & u32::MAX as u128) as u32)
    }

    #[inline]
    pub fn to_user_data(self) -> u128 {
        self.0 as u128
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// The nearest blocking surface found by a capsule cast.
///
/// Transient: produced and consumed within a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceContact {
    /// Travel distance along the cast direction until first contact (meters).
    pub distance: f32,
    /// World-space contact point on the blocking surface.
    pub point: Point3,
    /// World-space unit surface normal, facing against the cast direction.
    pub normal: Vec3,
}
