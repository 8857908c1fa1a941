/*!
Locomotion defaults and tolerances.

These constants seed [`LocomotionConfig::default`](crate::config::LocomotionConfig) and the
numeric guards used by the resolver. Keeping them together makes tuning easier.

Notes
- Distances are in meters, time in seconds, angles in radians.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
- Per-character overrides belong in `LocomotionConfig`, not here.
*/

use std::f32::consts::PI;

/// Capsule radius of the default character (meters).
pub const DEFAULT_RADIUS: f32 = 0.3;

/// Total capsule height of the default character, caps included (meters).
pub const DEFAULT_HEIGHT: f32 = 1.8;

/// Walking speed in meters per second.
pub const DEFAULT_WALK_SPEED: f32 = 5.0;

/// Running speed in meters per second.
pub const DEFAULT_RUN_SPEED: f32 = 8.0;

/// Upward speed assigned on a jump (m/s).
pub const DEFAULT_JUMP_IMPULSE: f32 = 5.0;

/// Forced forward speed while rolling (m/s).
pub const DEFAULT_ROLL_SPEED: f32 = 1.0;

/// Time a roll lasts before the character may return to `Grounded` (seconds).
pub const DEFAULT_ROLL_DURATION: f32 = 0.5;

/// Maximum facing turn rate (radians per second). 400 degrees per second.
pub const DEFAULT_TURN_RATE: f32 = 400.0 * PI / 180.0;

/// Vertical velocity held while resting on ground (m/s).
///
/// Slightly negative so the ground probe keeps triggering at exact rest.
pub const RESTING_FLOOR_MPS: f32 = -1.0;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Maximum downward speed reachable through gravity integration (m/s).
pub const TERMINAL_FALL_SPEED_MPS: f32 = 50.0;

/// Separation from surfaces kept when a cast is blocked (meters).
/// Too large creates visible gaps; too small risks re-penetration from float error.
pub const DEFAULT_SKIN: f32 = 0.02;

/// Extra radius added to the lower sphere when probing for ground (meters).
pub const GROUND_TOLERANCE: f32 = 0.04;

/// How far below the capsule centre, past half the height, the ground height probe reaches (meters).
pub const GROUND_HEIGHT_RANGE: f32 = 4.0;

/// Planar input multiplier while airborne.
///
/// - 1.0 = full ground control in air
/// - 0.0 = no air control
pub const DEFAULT_AIR_CONTROL: f32 = 1.0;

/// Search radius for ledge grabs around the capsule (meters).
pub const DEFAULT_LEDGE_RANGE: f32 = 0.5;

/// Rate at which the forward animation parameter eases toward its target (units per second).
pub const ANIM_BLEND_RATE: f32 = 2.0;

/// Minimum squared length for a vector to count as a direction (m^2).
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Angles below this are treated as already aligned (radians).
pub const ANGLE_EPS: f32 = 1.0e-5;
