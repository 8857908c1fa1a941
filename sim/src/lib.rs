//! Headless tick host for many locomotion characters sharing one collision world.
//!
//! The host owns the world and the characters. Input arrives between ticks through
//! [`Simulation::submit`]; each [`Simulation::tick`] consumes the pending intents so
//! nothing carries over to the next step.

use std::collections::BTreeMap;

use locomotion::{
    AnimationParams, Character, CollisionQuery, ConfigError, InputIntent, LocomotionConfig,
    LocomotionMode, Point3, Quat, TickContext, Vec3, constants::GRAVITY_MPS2,
};
use thiserror::Error;

/// Largest step a single tick may simulate (seconds).
pub const MAX_TICK_DT: f32 = 0.125;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterId(pub u64);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Unknown character {0}")]
    UnknownCharacter(CharacterId),

    #[error("Invalid character configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A mode change observed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub id: CharacterId,
    pub from: LocomotionMode,
    pub to: LocomotionMode,
}

/// What happened during one [`Simulation::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The step actually simulated, after clamping.
    pub dt: f32,
    pub ticked: usize,
    pub mode_changes: Vec<ModeChange>,
}

struct Slot {
    character: Character,
    pending: InputIntent,
    clip_finished: bool,
    last_params: Option<AnimationParams>,
}

pub struct Simulation<Q: CollisionQuery> {
    world: Q,
    characters: BTreeMap<CharacterId, Slot>,
    next_id: u64,
    gravity: Vec3,
    view: Quat,
    max_dt: f32,
}

impl<Q: CollisionQuery> Simulation<Q> {
    pub fn new(world: Q) -> Self {
        Self {
            world,
            characters: BTreeMap::new(),
            next_id: 1,
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            view: Quat::identity(),
            max_dt: MAX_TICK_DT,
        }
    }

    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    #[inline]
    pub fn world(&self) -> &Q {
        &self.world
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.characters.keys().copied()
    }

    /// Validate `config` and place a new character at `feet`.
    pub fn spawn(&mut self, config: LocomotionConfig, feet: Point3) -> Result<CharacterId, SimError> {
        config.validate()?;

        let id = CharacterId(self.next_id);
        self.next_id += 1;
        self.characters.insert(
            id,
            Slot {
                character: Character::new(config, feet),
                pending: InputIntent::neutral(),
                clip_finished: false,
                last_params: None,
            },
        );
        log::info!("Spawned character {id} at {feet:?}");
        Ok(id)
    }

    pub fn despawn(&mut self, id: CharacterId) -> Result<Character, SimError> {
        let slot = self.characters.remove(&id).ok_or_else(|| {
            log::warn!("Despawn of unknown character {id}");
            SimError::UnknownCharacter(id)
        })?;
        log::info!("Despawned character {id}");
        Ok(slot.character)
    }

    fn slot_mut(&mut self, id: CharacterId) -> Result<&mut Slot, SimError> {
        self.characters.get_mut(&id).ok_or_else(|| {
            log::warn!("Unknown character {id}");
            SimError::UnknownCharacter(id)
        })
    }

    /// Queue `intent` for the next tick, replacing anything queued earlier.
    pub fn submit(&mut self, id: CharacterId, intent: InputIntent) -> Result<(), SimError> {
        self.slot_mut(id)?.pending = intent;
        Ok(())
    }

    /// Report that the character's roll or climb clip finished.
    pub fn signal_clip_finished(&mut self, id: CharacterId) -> Result<(), SimError> {
        self.slot_mut(id)?.clip_finished = true;
        Ok(())
    }

    pub fn kill(&mut self, id: CharacterId) -> Result<(), SimError> {
        self.slot_mut(id)?.character.kill();
        Ok(())
    }

    pub fn set_view(&mut self, view: Quat) {
        self.view = view;
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id).map(|s| &s.character)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id).map(|s| &mut s.character)
    }

    /// Animation parameters the character pushed on the last tick.
    pub fn animation(&self, id: CharacterId) -> Option<&AnimationParams> {
        self.characters.get(&id)?.last_params.as_ref()
    }

    /// Advance every character by `dt` seconds (clamped to `max_dt`), in id order.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let clamped = if dt.is_finite() { dt.clamp(0.0, self.max_dt) } else { 0.0 };
        if clamped != dt {
            log::warn!("Tick dt {dt} clamped to {clamped}");
        }

        let base = TickContext::new(clamped)
            .with_gravity(self.gravity)
            .with_view(self.view);

        let mut report = TickReport {
            dt: clamped,
            ..Default::default()
        };

        for (&id, slot) in self.characters.iter_mut() {
            let intent = std::mem::take(&mut slot.pending);
            let ctx = base.with_clip_finished(std::mem::take(&mut slot.clip_finished));

            let outcome = slot
                .character
                .tick(&self.world, intent, &ctx, &mut slot.last_params);

            if outcome.changed_mode() {
                report.mode_changes.push(ModeChange {
                    id,
                    from: outcome.previous,
                    to: outcome.mode,
                });
            }
            report.ticked += 1;
        }

        report
    }
}
