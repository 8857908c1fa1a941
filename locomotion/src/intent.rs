use nalgebra::Vector2;

use crate::collision::{Quat, Vec3};

/// Walk or run speed selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gait {
    #[default]
    Walk,
    Run,
}

/// One tick's worth of player (or AI) requests.
///
/// Intents are consumed by value, so a request never outlives the tick it was issued
/// for. Fields the current mode or lock state does not allow are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputIntent {
    /// View-space move axes: `x` is right, `y` is forward. Magnitudes above 1 are clamped.
    pub axes: Vector2<f32>,
    pub gait: Gait,
    /// World direction to turn toward this tick.
    pub face: Option<Vec3>,
    pub jump: bool,
    pub roll: bool,
    pub climb: bool,
}

impl InputIntent {
    /// No movement and no actions.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn moving(right: f32, forward: f32) -> Self {
        Self {
            axes: Vector2::new(right, forward),
            ..Self::default()
        }
    }

    pub fn with_gait(mut self, gait: Gait) -> Self {
        self.gait = gait;
        self
    }

    pub fn with_face(mut self, direction: Vec3) -> Self {
        self.face = Some(direction);
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_roll(mut self) -> Self {
        self.roll = true;
        self
    }

    pub fn with_climb(mut self) -> Self {
        self.climb = true;
        self
    }

    #[inline]
    pub fn has_move_input(&self) -> bool {
        self.axes.norm_squared() > 0.0
    }
}

/// Map view-space axes to a horizontal world direction.
///
/// The view's forward and right vectors are flattened onto the ground plane, so a
/// camera pitched downward still drives the character horizontally. The result has a
/// magnitude of `min(|axes|, 1)`.
pub fn view_relative_direction(axes: Vector2<f32>, view: &Quat) -> Vec3 {
    let magnitude = axes.norm().min(1.0);
    if magnitude <= 0.0 {
        return Vec3::zeros();
    }

    let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z);
    let forward = flatten(view * Vec3::z());
    let right = flatten(view * Vec3::x());

    let combined = right * axes.x + forward * axes.y;
    match combined.try_normalize(1.0e-6) {
        Some(dir) => dir * magnitude,
        None => Vec3::zeros(),
    }
}
