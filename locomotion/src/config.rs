use crate::{
    collision::{CharacterShape, LayerMask, Vec3},
    constants::*,
    error::ConfigError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Every tunable of a single character.
///
/// The motion core trusts these values; call [`validate`](Self::validate) once when a
/// configuration comes from outside (files, editors, network).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocomotionConfig {
    pub shape: CharacterShape,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub roll_speed: f32,
    pub roll_duration: f32,
    /// Radians per second.
    pub turn_rate: f32,
    /// Vertical velocity held while grounded. Must be negative.
    pub resting_floor: f32,
    /// Positive magnitude of the fastest downward speed.
    pub terminal_fall_speed: f32,
    pub skin: f32,
    pub ground_tolerance: f32,
    pub ground_height_range: f32,
    /// 0..=1 multiplier on planar input while airborne.
    pub air_control: f32,
    pub ledge_range: f32,
    /// Feet offset from a grabbed ledge point, in character-local space.
    pub ledge_grab_offset: Vec3,
    pub anim_blend_rate: f32,
    pub filter: LayerMask,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            shape: CharacterShape::new(DEFAULT_RADIUS, DEFAULT_HEIGHT),
            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            roll_speed: DEFAULT_ROLL_SPEED,
            roll_duration: DEFAULT_ROLL_DURATION,
            turn_rate: DEFAULT_TURN_RATE,
            resting_floor: RESTING_FLOOR_MPS,
            terminal_fall_speed: TERMINAL_FALL_SPEED_MPS,
            skin: DEFAULT_SKIN,
            ground_tolerance: GROUND_TOLERANCE,
            ground_height_range: GROUND_HEIGHT_RANGE,
            air_control: DEFAULT_AIR_CONTROL,
            ledge_range: DEFAULT_LEDGE_RANGE,
            ledge_grab_offset: Vec3::new(0.0, DEFAULT_HEIGHT, -DEFAULT_RADIUS),
            anim_blend_rate: ANIM_BLEND_RATE,
            filter: LayerMask::ALL,
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be > 0",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be >= 0",
        })
    }
}

impl LocomotionConfig {
    /// Check every field, reporting the first one out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("shape.radius", self.shape.radius)?;
        positive("shape.height", self.shape.height)?;
        if self.shape.height < self.shape.radius * 2.0 {
            return Err(ConfigError::CapsuleTooShort {
                radius: self.shape.radius,
                height: self.shape.height,
            });
        }

        non_negative("walk_speed", self.walk_speed)?;
        non_negative("run_speed", self.run_speed)?;
        non_negative("jump_impulse", self.jump_impulse)?;
        non_negative("roll_speed", self.roll_speed)?;
        non_negative("roll_duration", self.roll_duration)?;
        non_negative("turn_rate", self.turn_rate)?;
        positive("terminal_fall_speed", self.terminal_fall_speed)?;
        non_negative("skin", self.skin)?;
        non_negative("ground_tolerance", self.ground_tolerance)?;
        non_negative("ground_height_range", self.ground_height_range)?;
        non_negative("ledge_range", self.ledge_range)?;
        non_negative("anim_blend_rate", self.anim_blend_rate)?;

        if finite("resting_floor", self.resting_floor)? >= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "resting_floor",
                value: self.resting_floor,
                reason: "must be < 0",
            });
        }

        let air = finite("air_control", self.air_control)?;
        if !(0.0..=1.0).contains(&air) {
            return Err(ConfigError::InvalidValue {
                field: "air_control",
                value: air,
                reason: "must be within 0..=1",
            });
        }

        for (field, v) in [
            ("ledge_grab_offset.x", self.ledge_grab_offset.x),
            ("ledge_grab_offset.y", self.ledge_grab_offset.y),
            ("ledge_grab_offset.z", self.ledge_grab_offset.z),
        ] {
            finite(field, v)?;
        }

        Ok(())
    }

    /// Builder-style shape override.
    pub fn with_shape(mut self, shape: CharacterShape) -> Self {
        self.shape = shape;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LocomotionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let cfg = LocomotionConfig {
            walk_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "walk_speed",
                ..
            })
        ));
    }

    #[test]
    fn resting_floor_must_be_negative() {
        let cfg = LocomotionConfig {
            resting_floor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "resting_floor",
                ..
            })
        ));
    }

    #[test]
    fn capsule_shorter_than_its_caps_is_rejected() {
        let cfg = LocomotionConfig::default().with_shape(CharacterShape::new(0.5, 0.8));
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapsuleTooShort {
                radius: 0.5,
                height: 0.8
            })
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let cfg = LocomotionConfig {
            air_control: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = LocomotionConfig {
            air_control: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
