//! Per-tick desired displacement, before collision resolution.

use crate::{
    collision::Vec3,
    config::LocomotionConfig,
    context::TickContext,
    intent::Gait,
    state::MotionState,
};

/// Advance vertical velocity by one tick.
///
/// - Grounded and not ascending: hold at `resting_floor`.
/// - Otherwise: semi-implicit Euler with `ctx.gravity.y`, clamped to the terminal
///   fall speed.
pub fn integrate_gravity(state: &mut MotionState, cfg: &LocomotionConfig, ctx: &TickContext) {
    let vy = state.velocity.y;
    state.velocity.y = if state.grounded && vy <= 0.0 {
        cfg.resting_floor
    } else {
        (vy + ctx.gravity.y * ctx.dt).max(-cfg.terminal_fall_speed)
    };
}

/// Apply a pending jump, clearing the flag.
///
/// Returns `true` when a jump was applied. The flag is cleared whether or not the
/// caller uses the result, so a request is honored at most once.
pub fn consume_jump(pending: &mut bool, state: &mut MotionState, impulse: f32) -> bool {
    if std::mem::take(pending) {
        state.velocity.y = impulse;
        true
    } else {
        false
    }
}

/// Planar speed for a gait.
#[inline]
pub fn gait_speed(cfg: &LocomotionConfig, gait: Gait) -> f32 {
    match gait {
        Gait::Walk => cfg.walk_speed,
        Gait::Run => cfg.run_speed,
    }
}

/// Planar velocity from a world-space input direction (magnitude 0..=1).
pub fn planar_velocity(
    direction: Vec3,
    cfg: &LocomotionConfig,
    gait: Gait,
    airborne: bool,
) -> Vec3 {
    let control = if airborne { cfg.air_control } else { 1.0 };
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    planar * gait_speed(cfg, gait) * control
}

/// Combine vertical velocity, planar velocity, and a state-forced velocity into one
/// displacement for `dt` seconds.
#[inline]
pub fn desired_displacement(
    vertical_velocity: f32,
    planar_velocity: Vec3,
    forced_velocity: Vec3,
    dt: f32,
) -> Vec3 {
    (Vec3::new(0.0, vertical_velocity, 0.0) + planar_velocity + forced_velocity) * dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Point3;
    use approx::assert_relative_eq;

    fn state(grounded: bool, vy: f32) -> MotionState {
        let mut s = MotionState::at(Point3::origin());
        s.grounded = grounded;
        s.velocity.y = vy;
        s
    }

    #[test]
    fn grounded_velocity_is_held_at_resting_floor() {
        let cfg = LocomotionConfig::default();
        let ctx = TickContext::new(0.1);
        let mut s = state(true, -3.0);

        for _ in 0..5 {
            integrate_gravity(&mut s, &cfg, &ctx);
            assert_eq!(s.velocity.y, cfg.resting_floor);
        }
    }

    #[test]
    fn ascending_while_grounded_still_integrates() {
        let cfg = LocomotionConfig::default();
        let ctx = TickContext::new(0.1);
        let mut s = state(true, 4.0);

        integrate_gravity(&mut s, &cfg, &ctx);
        assert_relative_eq!(s.velocity.y, 4.0 - 0.981, epsilon = 1.0e-5);
    }

    #[test]
    fn airborne_falls_until_terminal_speed() {
        let cfg = LocomotionConfig {
            terminal_fall_speed: 2.0,
            ..Default::default()
        };
        let ctx = TickContext::new(0.1);
        let mut s = state(false, 0.0);

        integrate_gravity(&mut s, &cfg, &ctx);
        assert_relative_eq!(s.velocity.y, -0.981, epsilon = 1.0e-5);

        for _ in 0..10 {
            integrate_gravity(&mut s, &cfg, &ctx);
        }
        assert_eq!(s.velocity.y, -2.0);
    }

    #[test]
    fn jump_is_consumed_once() {
        let mut pending = true;
        let mut s = state(true, -1.0);

        assert!(consume_jump(&mut pending, &mut s, 5.0));
        assert_eq!(s.velocity.y, 5.0);
        assert!(!pending);

        s.velocity.y = 2.0;
        assert!(!consume_jump(&mut pending, &mut s, 5.0));
        assert_eq!(s.velocity.y, 2.0);
    }

    #[test]
    fn air_control_scales_planar_speed() {
        let cfg = LocomotionConfig {
            air_control: 0.5,
            ..Default::default()
        };
        let dir = Vec3::new(0.0, 0.7, 1.0);

        let ground = planar_velocity(dir, &cfg, Gait::Run, false);
        let air = planar_velocity(dir, &cfg, Gait::Run, true);
        assert_relative_eq!(ground, Vec3::new(0.0, 0.0, cfg.run_speed), epsilon = 1.0e-6);
        assert_relative_eq!(air, ground * 0.5, epsilon = 1.0e-6);
    }

    #[test]
    fn displacement_sums_all_terms() {
        let d = desired_displacement(-1.0, Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.1);
        assert_relative_eq!(d, Vec3::new(0.5, -0.1, 0.1), epsilon = 1.0e-6);
    }
}
