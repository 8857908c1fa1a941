use crate::{
    collision::{Quat, Vec3},
    constants::{ANGLE_EPS, DIST_EPS},
};

/// Yaw-only rotation whose forward (+Z) faces `direction` with the vertical component
/// projected out.
///
/// Returns `None` if the planar part is too small to define a heading.
#[inline]
pub fn planar_look_rotation(direction: &Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    let forward = planar.try_normalize(DIST_EPS)?;
    Some(Quat::face_towards(&forward, &Vec3::y()))
}

/// Rotate `current` toward `target` along the shortest arc by at most `max_angle` radians.
///
/// Never overshoots: a target within `max_angle` is returned as-is.
pub fn rotate_towards(current: &Quat, target: &Quat, max_angle: f32) -> Quat {
    let angle = current.angle_to(target);
    if angle <= max_angle || angle <= ANGLE_EPS {
        return *target;
    }
    if max_angle <= 0.0 {
        return *current;
    }

    let t = max_angle / angle;
    current
        .try_slerp(target, t, 1.0e-6)
        // Degenerate interpolation: turn about +Y to stay upright.
        .unwrap_or_else(|| Quat::from_axis_angle(&Vec3::y_axis(), max_angle) * current)
}

/// Step `current` toward the planar heading of `direction` by at most `max_angle`.
///
/// A direction without a planar component leaves the facing unchanged.
pub fn turn_towards_direction(current: &Quat, direction: &Vec3, max_angle: f32) -> Quat {
    match planar_look_rotation(direction) {
        Some(target) => rotate_towards(current, &target, max_angle),
        None => *current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn yaw(angle_deg: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), angle_deg.to_radians())
    }

    #[test]
    fn look_rotation_maps_forward_to_direction() {
        let dir = Vec3::new(1.0, 0.0, 1.0);
        let q = planar_look_rotation(&dir).unwrap_or_else(Quat::identity);
        assert_relative_eq!(q * Vec3::z(), dir.normalize(), epsilon = 1.0e-5);
    }

    #[test]
    fn vertical_component_is_projected_out() {
        let q = planar_look_rotation(&Vec3::new(0.0, 5.0, 1.0)).unwrap_or_else(Quat::identity);
        let forward = q * Vec3::z();
        assert_relative_eq!(forward, Vec3::z(), epsilon = 1.0e-5);
        assert_relative_eq!(q * Vec3::y(), Vec3::y(), epsilon = 1.0e-5);
    }

    #[test]
    fn straight_up_has_no_heading() {
        assert!(planar_look_rotation(&Vec3::y()).is_none());
    }

    #[test]
    fn bounded_turn_does_not_overshoot() {
        let current = Quat::identity();
        let target = yaw(170.0);

        // 90 deg/s over a 1 s tick.
        let next = rotate_towards(&current, &target, 90f32.to_radians());

        assert_relative_eq!(current.angle_to(&next), 90f32.to_radians(), epsilon = 1.0e-4);
        assert_relative_eq!(next.angle_to(&target), 80f32.to_radians(), epsilon = 1.0e-4);
    }

    #[test]
    fn close_target_is_reached_exactly() {
        let target = yaw(30.0);
        let next = rotate_towards(&Quat::identity(), &target, 90f32.to_radians());
        assert_eq!(next, target);
    }

    #[test]
    fn zero_rate_keeps_facing() {
        let current = yaw(10.0);
        let next = rotate_towards(&current, &yaw(100.0), 0.0);
        assert_eq!(next, current);
    }

    #[test]
    fn antipodal_target_still_turns_about_up() {
        let next = rotate_towards(&Quat::identity(), &yaw(180.0), 45f32.to_radians());
        assert_relative_eq!(next.angle(), 45f32.to_radians(), epsilon = 1.0e-4);
        assert_relative_eq!(next * Vec3::y(), Vec3::y(), epsilon = 1.0e-5);
    }

    #[test]
    fn repeated_steps_converge() {
        let target = yaw(-120.0);
        let mut q = Quat::identity();
        for _ in 0..10 {
            q = turn_towards_direction(&q, &(target * Vec3::z()), 20f32.to_radians());
        }
        assert_relative_eq!(q.angle_to(&target), 0.0, epsilon = 1.0e-4);
    }
}
