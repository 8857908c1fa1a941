use thiserror::Error;

/// A tunable in [`LocomotionConfig`](crate::config::LocomotionConfig) is out of range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("Capsule height {height} must be at least twice the radius {radius}")]
    CapsuleTooShort { radius: f32, height: f32 },
}

/// A static collider row could not be turned into query geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldBuildError {
    #[error("Static collider {id} has a non-finite pose")]
    NonFinitePose { id: u32 },

    #[error("Static collider {id} has non-positive or non-finite dimensions")]
    InvalidDimensions { id: u32 },

    #[error("Duplicate static collider id {0}")]
    DuplicateId(u32),
}
