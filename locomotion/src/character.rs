/*!
The per-character locomotion state machine.

A [`Character`] owns its [`MotionState`] and advances it once per [`tick`](Character::tick):

1. Action requests (jump, roll, climb) are gated on the mode the tick *started* in and
   on the [`LockState`]. Disallowed requests are dropped, never queued.
2. The facing turns toward `intent.face` at `turn_rate * dt`.
3. The mode's pipeline runs:
   - Grounded / Airborne: ground height, gravity, jump, input, slide, ground check.
   - Rolling: timer, gravity, forced forward motion, slide, ground check, timer exit.
   - OnLedge: hold still until a climb request.
   - ClimbingLedge: wait for the host's clip-finished signal.
   - Dead: nothing.
4. Animation parameters are pushed to the sink.
*/

use log::{debug, trace, warn};

use crate::{
    animation::{AnimationParams, AnimationSink},
    collision::{CollisionQuery, Point3, Quat, SurfaceContact, Vec3},
    config::LocomotionConfig,
    context::TickContext,
    integrator::{consume_jump, desired_displacement, integrate_gravity, planar_velocity},
    intent::{InputIntent, view_relative_direction},
    lock::LockState,
    orientation::turn_towards_direction,
    resolver::{GroundCheck, check_ground, probe_ground_height, resolve},
    state::{LocomotionMode, MotionState},
};

/// Summary of one tick, for hosts that want to react to mode changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub previous: LocomotionMode,
    pub mode: LocomotionMode,
    /// Displacement applied this tick.
    pub displacement: Vec3,
    /// First blocking contact met by the slide resolver, if any.
    pub contact: Option<SurfaceContact>,
}

impl TickOutcome {
    #[inline]
    pub fn changed_mode(&self) -> bool {
        self.previous != self.mode
    }
}

#[derive(Clone, Debug)]
pub struct Character {
    config: LocomotionConfig,
    lock: LockState,
    mode: LocomotionMode,
    motion: MotionState,
    roll_timer: f32,
    pending_jump: bool,
    animation: AnimationParams,
}

impl Character {
    /// A grounded-mode character standing at `feet`, facing +Z.
    pub fn new(config: LocomotionConfig, feet: Point3) -> Self {
        Self {
            config,
            lock: LockState::default(),
            mode: LocomotionMode::Grounded,
            motion: MotionState::at(feet),
            roll_timer: 0.0,
            pending_jump: false,
            animation: AnimationParams::default(),
        }
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.motion.orientation = orientation;
        self
    }

    pub fn with_lock(mut self, lock: LockState) -> Self {
        self.lock = lock;
        self
    }

    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    #[inline]
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.motion.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.motion.orientation
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.motion.velocity
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.motion.grounded
    }

    #[inline]
    pub fn ground_height(&self) -> Option<f32> {
        self.motion.ground_height
    }

    /// Seconds spent in the current roll.
    #[inline]
    pub fn roll_timer(&self) -> f32 {
        self.roll_timer
    }

    /// Parameters pushed on the last tick.
    #[inline]
    pub fn animation(&self) -> &AnimationParams {
        &self.animation
    }

    #[inline]
    pub fn lock(&self) -> &LockState {
        &self.lock
    }

    pub fn lock_mut(&mut self) -> &mut LockState {
        &mut self.lock
    }

    /// Teleport so the capsule base sits at `feet`.
    pub fn set_feet(&mut self, feet: Point3) {
        self.motion.position = feet;
    }

    /// Enter the terminal `Dead` mode from any live mode.
    pub fn kill(&mut self) {
        if self.transition(LocomotionMode::Dead) {
            self.pending_jump = false;
            self.motion.velocity = Vec3::zeros();
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.mode == LocomotionMode::Dead
    }

    /// Turn toward `direction` by at most `max_angle` radians.
    ///
    /// Ignored unless turning is unlocked and the mode is Grounded or Airborne. Returns
    /// whether the request was honored.
    pub fn rotate_towards(&mut self, direction: &Vec3, max_angle: f32) -> bool {
        self.turn_gated(direction, max_angle, self.mode)
    }

    /// Turn toward `direction` regardless of mode and locks (scripted reorientation).
    pub fn force_rotate_towards(&mut self, direction: &Vec3, max_angle: f32) {
        self.motion.orientation =
            turn_towards_direction(&self.motion.orientation, direction, max_angle);
    }

    fn turn_gated(&mut self, direction: &Vec3, max_angle: f32, mode: LocomotionMode) -> bool {
        if !self.lock.can_turn() || !mode.allows_steering() {
            trace!("turn request dropped in {mode:?}");
            return false;
        }
        self.force_rotate_towards(direction, max_angle);
        true
    }

    /// Move along a defined edge. Invalid edges are logged and ignored.
    fn transition(&mut self, next: LocomotionMode) -> bool {
        if next == self.mode {
            return false;
        }
        if !self.mode.can_transition_to(next) {
            warn!("Rejected locomotion transition {:?} -> {:?}", self.mode, next);
            return false;
        }

        debug!("Locomotion {:?} -> {:?}", self.mode, next);
        if next == LocomotionMode::Rolling {
            self.roll_timer = 0.0;
        }
        self.mode = next;
        true
    }

    /// Advance one simulation step.
    ///
    /// `intent` is consumed: anything not honored this tick is gone.
    pub fn tick<Q, S>(
        &mut self,
        query: &Q,
        intent: InputIntent,
        ctx: &TickContext,
        sink: &mut S,
    ) -> TickOutcome
    where
        Q: CollisionQuery + ?Sized,
        S: AnimationSink + ?Sized,
    {
        let ctx = &ctx.sanitized();
        let dt = ctx.dt;
        let previous = self.mode;
        let start = self.motion.position;

        self.apply_actions(&intent, previous);

        if let Some(face) = intent.face {
            self.turn_gated(&face, self.config.turn_rate * dt, previous);
        }

        let steering = previous.allows_steering() && self.lock.can_move();
        let move_dir = if steering && intent.has_move_input() {
            view_relative_direction(intent.axes, &ctx.view)
        } else {
            Vec3::zeros()
        };

        let contact = match self.mode {
            LocomotionMode::Grounded | LocomotionMode::Airborne => {
                self.tick_free(query, &intent, move_dir, ctx, dt)
            }
            LocomotionMode::Rolling => self.tick_rolling(query, ctx, dt),
            LocomotionMode::ClimbingLedge => {
                if ctx.clip_finished && self.transition(LocomotionMode::Grounded) {
                    self.finish_climb(query);
                }
                None
            }
            LocomotionMode::OnLedge | LocomotionMode::Dead => None,
        };

        self.motion.displacement = self.motion.position - start;

        self.animation = self.animation.advance(
            &move_dir,
            &self.motion.orientation,
            self.config.anim_blend_rate,
            dt,
            self.motion.grounded,
            self.is_dead(),
        );
        sink.push(&self.animation);

        TickOutcome {
            previous,
            mode: self.mode,
            displacement: self.motion.displacement,
            contact,
        }
    }

    /// Honor at most one action request; jump wins over roll.
    fn apply_actions(&mut self, intent: &InputIntent, mode: LocomotionMode) {
        let mut acted = false;

        if intent.jump {
            if mode == LocomotionMode::Grounded && self.lock.can_jump() {
                self.pending_jump = true;
                acted = self.transition(LocomotionMode::Airborne);
            } else {
                trace!("jump request dropped in {mode:?}");
            }
        }

        if intent.roll {
            if !acted && mode == LocomotionMode::Grounded && self.lock.can_roll() {
                acted = self.transition(LocomotionMode::Rolling);
            } else {
                trace!("roll request dropped in {mode:?}");
            }
        }

        if intent.climb {
            if !acted && mode == LocomotionMode::OnLedge {
                self.transition(LocomotionMode::ClimbingLedge);
            } else {
                trace!("climb request dropped in {mode:?}");
            }
        }
    }

    fn tick_free<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        intent: &InputIntent,
        move_dir: Vec3,
        ctx: &TickContext,
        dt: f32,
    ) -> Option<SurfaceContact> {
        let cfg = self.config;

        self.refresh_ground_height(query);
        integrate_gravity(&mut self.motion, &cfg, ctx);
        consume_jump(&mut self.pending_jump, &mut self.motion, cfg.jump_impulse);

        let airborne = self.mode == LocomotionMode::Airborne;
        let planar = planar_velocity(move_dir, &cfg, intent.gait, airborne);
        let contact = self.move_and_probe(query, planar, Vec3::zeros(), dt);

        if self.motion.grounded {
            self.transition(LocomotionMode::Grounded);
        } else {
            self.transition(LocomotionMode::Airborne);
        }

        let has_input = move_dir.norm_squared() > 0.0;
        if self.mode == LocomotionMode::Airborne && has_input && !self.motion.is_ascending() {
            self.try_grab_ledge(query);
        }

        contact
    }

    fn tick_rolling<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        ctx: &TickContext,
        dt: f32,
    ) -> Option<SurfaceContact> {
        let cfg = self.config;
        self.roll_timer += dt;

        self.refresh_ground_height(query);
        integrate_gravity(&mut self.motion, &cfg, ctx);

        let forced = self.motion.forward() * cfg.roll_speed;
        let contact = self.move_and_probe(query, Vec3::zeros(), forced, dt);

        if !self.motion.grounded {
            self.transition(LocomotionMode::Airborne);
        } else if self.roll_timer >= cfg.roll_duration {
            self.transition(LocomotionMode::Grounded);
        }

        contact
    }

    /// Resolve one tick of motion, apply it, and re-probe the ground.
    fn move_and_probe<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        planar: Vec3,
        forced: Vec3,
        dt: f32,
    ) -> Option<SurfaceContact> {
        let cfg = &self.config;
        let horizontal = planar + forced;
        self.motion.velocity.x = horizontal.x;
        self.motion.velocity.z = horizontal.z;

        let desired = desired_displacement(self.motion.velocity.y, planar, forced, dt);
        let resolution = resolve(
            query,
            &self.motion.position,
            &cfg.shape,
            desired,
            cfg.skin,
            cfg.filter,
        );
        self.motion.position += resolution.displacement();

        let ground = check_ground(
            query,
            &self.motion.position,
            &cfg.shape,
            self.motion.velocity.y,
            cfg.ground_tolerance,
            cfg.filter,
        );
        self.apply_ground(ground);

        resolution.contact
    }

    /// Stand on top of the ledge once the climb clip ends.
    fn finish_climb<Q: CollisionQuery + ?Sized>(&mut self, query: &Q) {
        self.refresh_ground_height(query);
        self.motion.grounded = true;
        self.motion.velocity = Vec3::new(0.0, self.config.resting_floor, 0.0);
    }

    fn apply_ground(&mut self, ground: GroundCheck) {
        self.motion.grounded = ground.grounded;
        if ground.grounded {
            self.motion.velocity.y = self.config.resting_floor;
        }
    }

    fn refresh_ground_height<Q: CollisionQuery + ?Sized>(&mut self, query: &Q) {
        self.motion.ground_height = probe_ground_height(
            query,
            &self.motion.position,
            &self.config.shape,
            self.config.ground_height_range,
            self.config.filter,
        );
    }

    fn try_grab_ledge<Q: CollisionQuery + ?Sized>(&mut self, query: &Q) {
        let cfg = &self.config;
        let Some(ledge) =
            query.closest_ledge(&self.motion.position, &cfg.shape, cfg.ledge_range, cfg.filter)
        else {
            return;
        };

        let feet = ledge - self.motion.orientation * cfg.ledge_grab_offset;
        if self.transition(LocomotionMode::OnLedge) {
            self.motion.position = feet;
            self.motion.velocity = Vec3::zeros();
        }
    }
}
