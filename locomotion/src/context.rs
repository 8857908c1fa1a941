use crate::{
    collision::{Quat, Vec3},
    constants::GRAVITY_MPS2,
};

/// Everything a character reads from its host for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// Seconds elapsed since the previous tick.
    pub dt: f32,
    /// Gravity acceleration (m/s^2). Only the Y component is integrated.
    pub gravity: Vec3,
    /// Active camera/view rotation used to map input axes to world space.
    pub view: Quat,
    /// The roll or climb clip reported completion this tick.
    pub clip_finished: bool,
}

impl TickContext {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            view: Quat::identity(),
            clip_finished: false,
        }
    }

    pub fn with_view(mut self, view: Quat) -> Self {
        self.view = view;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_clip_finished(mut self, finished: bool) -> Self {
        self.clip_finished = finished;
        self
    }

    /// Copy with a usable step: non-finite or negative `dt` becomes 0.
    pub fn sanitized(&self) -> Self {
        let dt = if self.dt.is_finite() { self.dt.max(0.0) } else { 0.0 };
        Self { dt, ..*self }
    }
}
