pub mod animation;
pub mod character;
pub mod collision;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod integrator;
pub mod intent;
pub mod lock;
pub mod orientation;
pub mod resolver;
pub mod state;

pub use animation::{AnimationParams, AnimationSink};
pub use character::{Character, TickOutcome};
pub use collision::{
    CharacterShape, CollisionQuery, LayerMask, Point3, Quat, RapierQueryWorld, StaticWorld,
    SurfaceContact, Vec3,
};
pub use config::LocomotionConfig;
pub use context::TickContext;
pub use error::{ConfigError, WorldBuildError};
pub use intent::{Gait, InputIntent};
pub use lock::{LockState, Permission};
pub use state::{LocomotionMode, MotionState};
