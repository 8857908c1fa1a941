use crate::collision::{Quat, Vec3};

/// The parameter set pushed to the animation driver once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationParams {
    /// Local forward input, eased over time.
    pub forward_move: f32,
    /// Local lateral input.
    pub right_move: f32,
    pub grounded: bool,
    pub dead: bool,
}

impl AnimationParams {
    /// Next tick's parameters for a world-space input `direction` (magnitude 0..=1) seen
    /// from `orientation`.
    ///
    /// `forward_move` moves toward its target by at most `rate * dt`, and toward zero when
    /// there is no input. `right_move` follows input immediately.
    pub fn advance(
        &self,
        direction: &Vec3,
        orientation: &Quat,
        rate: f32,
        dt: f32,
        grounded: bool,
        dead: bool,
    ) -> Self {
        let local = orientation.inverse_transform_vector(direction);
        let has_input = direction.norm_squared() > 0.0;
        let forward_target = if has_input { local.z } else { 0.0 };

        Self {
            forward_move: move_towards(self.forward_move, forward_target, rate * dt),
            right_move: if has_input { local.x } else { 0.0 },
            grounded,
            dead,
        }
    }
}

/// Receives animation parameters; the core never reads them back.
pub trait AnimationSink {
    fn push(&mut self, params: &AnimationParams);
}

/// Discards everything.
impl AnimationSink for () {
    fn push(&mut self, _: &AnimationParams) {}
}

/// Keeps only the latest push.
impl AnimationSink for Option<AnimationParams> {
    fn push(&mut self, params: &AnimationParams) {
        *self = Some(*params);
    }
}

/// Records every push, oldest first.
impl AnimationSink for Vec<AnimationParams> {
    fn push(&mut self, params: &AnimationParams) {
        Vec::push(self, *params);
    }
}

impl<S: AnimationSink + ?Sized> AnimationSink for &mut S {
    fn push(&mut self, params: &AnimationParams) {
        (**self).push(params);
    }
}

/// Move `current` toward `target` by at most `max_delta`.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn move_towards_clamps_the_step() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(1.0, 0.0, 0.25), 0.75);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
    }

    #[test]
    fn forward_eases_and_right_snaps() {
        let p = AnimationParams::default();
        let dir = Vec3::new(0.6, 0.0, 0.8);
        let next = p.advance(&dir, &Quat::identity(), 2.0, 0.1, true, false);

        assert_relative_eq!(next.forward_move, 0.2, epsilon = 1.0e-6);
        assert_relative_eq!(next.right_move, 0.6, epsilon = 1.0e-6);
        assert!(next.grounded);
    }

    #[test]
    fn forward_decays_without_input() {
        let p = AnimationParams {
            forward_move: 1.0,
            right_move: 0.5,
            ..Default::default()
        };
        let next = p.advance(&Vec3::zeros(), &Quat::identity(), 2.0, 0.1, false, false);
        assert_relative_eq!(next.forward_move, 0.8, epsilon = 1.0e-6);
        assert_eq!(next.right_move, 0.0);
    }

    #[test]
    fn input_is_read_in_local_space() {
        // Facing +X: world +X input is local forward.
        let facing = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let next = AnimationParams::default().advance(&Vec3::x(), &facing, 100.0, 1.0, true, false);
        assert_relative_eq!(next.forward_move, 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(next.right_move, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn sinks_receive_pushes() {
        let params = AnimationParams {
            dead: true,
            ..Default::default()
        };

        let mut log: Vec<AnimationParams> = Vec::new();
        AnimationSink::push(&mut log, &params);
        AnimationSink::push(&mut log, &params);
        assert_eq!(log.len(), 2);

        let mut latest: Option<AnimationParams> = None;
        latest.push(&params);
        assert_eq!(latest, Some(params));

        ().push(&params);
    }
}
