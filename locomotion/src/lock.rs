//! Per-character action permissions.
//!
//! A [`LockState`] is external configuration: hosts flip permissions (cutscenes,
//! stuns, menus) and the core only reads them before honoring an
//! [`InputIntent`](crate::intent::InputIntent) field.

use num_traits::{One, PrimInt};

/// Trait implemented by flag enums stored in a [`BitmaskFlags`].
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// The backing integer type is chosen through the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container keyed by a [`FlagBitmask`] enum.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    pub fn has_all<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) == combined
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```
/// locomotion::define_bitmask_flags!(Status, u16, {
///     Stunned,
///     Slowed,
/// });
/// assert_eq!(locomotion::lock::FlagBitmask::mask(&Status::Slowed), 2u16);
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::lock::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(Permission, u8, {
    Move,
    Turn,
    Jump,
    Roll,
});

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::Move,
        Permission::Turn,
        Permission::Jump,
        Permission::Roll,
    ];
}

/// Which actions a character may currently perform. Defaults to everything allowed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LockState {
    allowed: BitmaskFlags<u8>,
}

impl LockState {
    /// Every action permitted.
    pub fn unlocked() -> Self {
        let mut allowed = BitmaskFlags::default();
        allowed.add_many(&Permission::ALL);
        Self { allowed }
    }

    /// Every action forbidden.
    pub fn locked() -> Self {
        Self {
            allowed: BitmaskFlags::default(),
        }
    }

    #[inline]
    pub fn allows(&self, permission: Permission) -> bool {
        self.allowed.has(permission)
    }

    pub fn allow(&mut self, permission: Permission) {
        self.allowed.add(permission);
    }

    pub fn deny(&mut self, permission: Permission) {
        self.allowed.remove(permission);
    }

    pub fn with(mut self, permission: Permission, allowed: bool) -> Self {
        if allowed {
            self.allow(permission);
        } else {
            self.deny(permission);
        }
        self
    }

    pub fn is_fully_unlocked(&self) -> bool {
        self.allowed.has_all(&Permission::ALL)
    }

    #[inline]
    pub fn can_move(&self) -> bool {
        self.allows(Permission::Move)
    }

    #[inline]
    pub fn can_turn(&self) -> bool {
        self.allows(Permission::Turn)
    }

    #[inline]
    pub fn can_jump(&self) -> bool {
        self.allows(Permission::Jump)
    }

    #[inline]
    pub fn can_roll(&self) -> bool {
        self.allows(Permission::Roll)
    }

    /// Forbid everything at once (e.g. on death).
    pub fn revoke_all(&mut self) {
        self.allowed.clear();
    }
}

impl Default for LockState {
    fn default() -> Self {
        Self::unlocked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_masks_are_distinct_bits() {
        let masks: Vec<u8> = Permission::ALL.iter().map(|p| p.mask()).collect();
        assert_eq!(masks, vec![1, 2, 4, 8]);
    }

    #[test]
    fn default_allows_everything() {
        let lock = LockState::default();
        assert!(lock.can_move() && lock.can_turn() && lock.can_jump() && lock.can_roll());
        assert!(lock.is_fully_unlocked());
    }

    #[test]
    fn deny_only_touches_one_permission() {
        let lock = LockState::unlocked().with(Permission::Jump, false);
        assert!(!lock.can_jump());
        assert!(lock.can_move() && lock.can_turn() && lock.can_roll());
        assert!(!lock.is_fully_unlocked());
    }

    #[test]
    fn locked_then_allow_single() {
        let mut lock = LockState::locked();
        lock.allow(Permission::Turn);
        assert!(lock.can_turn());
        assert!(!lock.can_move());

        lock.revoke_all();
        assert!(!lock.can_turn());
    }
}
