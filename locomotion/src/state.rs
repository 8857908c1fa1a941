use crate::collision::{Point3, Quat, Vec3};

/// Which locomotion rules govern a character this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionMode {
    #[default]
    Grounded,
    Airborne,
    OnLedge,
    ClimbingLedge,
    Rolling,
    Dead,
}

impl LocomotionMode {
    /// True when `self -> next` is one of the defined edges.
    ///
    /// Every live mode may also move to `Dead`. Self-edges are not transitions.
    pub fn can_transition_to(self, next: LocomotionMode) -> bool {
        use LocomotionMode::*;
        match (self, next) {
            (Dead, _) => false,
            (_, Dead) => true,
            (Grounded, Airborne | Rolling) => true,
            (Airborne, Grounded | OnLedge) => true,
            (Rolling, Grounded | Airborne) => true,
            (OnLedge, ClimbingLedge) => true,
            (ClimbingLedge, Grounded) => true,
            _ => false,
        }
    }

    /// Modes where player turning and planar movement are honored.
    #[inline]
    pub fn allows_steering(self) -> bool {
        matches!(self, LocomotionMode::Grounded | LocomotionMode::Airborne)
    }
}

/// Per-character kinematic state, mutated once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    /// Feet point in world space.
    pub position: Point3,
    /// Facing; always a rotation about +Y.
    pub orientation: Quat,
    pub velocity: Vec3,
    pub grounded: bool,
    /// Height of the nearest surface below, `None` when nothing was found in range.
    pub ground_height: Option<f32>,
    /// Displacement actually applied during the last tick.
    pub displacement: Vec3,
}

impl MotionState {
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            orientation: Quat::identity(),
            velocity: Vec3::zeros(),
            grounded: false,
            ground_height: None,
            displacement: Vec3::zeros(),
        }
    }

    /// Unit forward vector (+Z rotated by the facing).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::z()
    }

    /// True when vertical velocity points up.
    #[inline]
    pub fn is_ascending(&self) -> bool {
        self.velocity.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LocomotionMode::*;

    const ALL: [LocomotionMode; 6] = [Grounded, Airborne, OnLedge, ClimbingLedge, Rolling, Dead];

    #[test]
    fn dead_is_terminal() {
        for m in ALL {
            assert!(!Dead.can_transition_to(m));
        }
    }

    #[test]
    fn every_live_mode_can_die() {
        for m in ALL.into_iter().filter(|m| *m != Dead) {
            assert!(m.can_transition_to(Dead), "{m:?} -> Dead");
        }
    }

    #[test]
    fn table_edges() {
        assert!(Grounded.can_transition_to(Airborne));
        assert!(Grounded.can_transition_to(Rolling));
        assert!(Airborne.can_transition_to(Grounded));
        assert!(Rolling.can_transition_to(Grounded));
        assert!(Rolling.can_transition_to(Airborne));
        assert!(OnLedge.can_transition_to(ClimbingLedge));
        assert!(ClimbingLedge.can_transition_to(Grounded));

        assert!(!Airborne.can_transition_to(Rolling));
        assert!(!Grounded.can_transition_to(ClimbingLedge));
        assert!(!Rolling.can_transition_to(OnLedge));
        assert!(!Grounded.can_transition_to(Grounded));
    }

    #[test]
    fn forward_follows_orientation() {
        let mut s = MotionState::at(Point3::origin());
        assert_eq!(s.forward(), Vec3::z());
        s.orientation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI);
        assert!((s.forward() + Vec3::z()).norm() < 1.0e-6);
    }
}
