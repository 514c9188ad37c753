//! Per-state motion applied to the character body.
//!
//! `dispatch` is the effect half of the state machine: given the state chosen
//! by [`resolve_input`](super::state::resolve_input) it mutates the body and
//! returns the state the character ends the tick in.

use nalgebra::{UnitQuaternion, Vector3};

use super::body::CharacterBody;
use super::debug;
use super::probe::probe_ladder;
use super::state::LocomotionState;
use crate::config::ControllerConfig;

/// Inputs to a single dispatch.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub config: &'a ControllerConfig,
    /// Movement direction, normalized when it cleared the walk threshold.
    pub movement: Vector3<f32>,
    /// Raw vertical axis, used for climbing.
    pub vertical: f32,
    pub grounded: bool,
    pub dt: f32,
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    pub next: LocomotionState,
    pub impulse: Option<Vector3<f32>>,
    /// Result of the ladder probe, when one ran.
    pub ladder_found: Option<bool>,
    /// New gravity flag, when dispatch changed it.
    pub gravity_enabled: Option<bool>,
}

impl MotionOutcome {
    fn stay(state: LocomotionState) -> Self {
        Self {
            next: state,
            impulse: None,
            ladder_found: None,
            gravity_enabled: None,
        }
    }
}

/// Runs the behavior of `state` against `body`.
pub fn dispatch<B: CharacterBody + ?Sized>(
    state: LocomotionState,
    ctx: &MotionContext<'_>,
    body: &mut B,
) -> MotionOutcome {
    match state {
        LocomotionState::Idle => MotionOutcome::stay(state),
        LocomotionState::Walking => {
            walk(
                body,
                ctx.movement,
                ctx.config.move_speed,
                ctx.config.turn_rate,
                ctx.dt,
            );
            MotionOutcome::stay(state)
        }
        LocomotionState::Jumping => jump(body, ctx.config.jump_force, ctx.grounded),
        LocomotionState::Interacting => interact(body, ctx.config),
        LocomotionState::Climbing => {
            climb(body, ctx.vertical, ctx.config.climb_speed);
            MotionOutcome::stay(state)
        }
    }
}

/// Rotation that looks along `direction` with +Y up. None for a zero or
/// vertical direction.
pub fn facing(direction: &Vector3<f32>) -> Option<UnitQuaternion<f32>> {
    let flat = Vector3::new(direction.x, 0.0, direction.z);
    if flat.norm_squared() <= f32::EPSILON {
        return None;
    }
    Some(UnitQuaternion::face_towards(&flat, &Vector3::y()))
}

/// Turns toward `direction` and translates along it in world space.
pub fn walk<B: CharacterBody + ?Sized>(
    body: &mut B,
    direction: Vector3<f32>,
    move_speed: f32,
    turn_rate: f32,
    dt: f32,
) {
    if let Some(target) = facing(&direction) {
        let t = (dt * turn_rate).clamp(0.0, 1.0);
        let current = body.rotation();
        // try_slerp fails only for opposite rotations; snap in that case.
        let next = current.try_slerp(&target, t, 1.0e-6).unwrap_or(target);
        body.set_rotation(next);
    }
    body.translate(direction * move_speed * dt);
}

/// Applies the jump impulse if grounded. The state only falls back to Idle
/// when the impulse was applied.
pub fn jump<B: CharacterBody + ?Sized>(body: &mut B, jump_force: f32, grounded: bool) -> MotionOutcome {
    if !grounded {
        return MotionOutcome::stay(LocomotionState::Jumping);
    }
    let impulse = Vector3::y() * jump_force;
    body.apply_impulse(impulse);
    MotionOutcome {
        impulse: Some(impulse),
        ..MotionOutcome::stay(LocomotionState::Idle)
    }
}

/// Looks for a ladder; grabs it (gravity off) or gives up to Idle.
pub fn interact<B: CharacterBody + ?Sized>(body: &mut B, config: &ControllerConfig) -> MotionOutcome {
    if probe_ladder(body, config) {
        body.set_gravity_enabled(false);
        MotionOutcome {
            ladder_found: Some(true),
            gravity_enabled: Some(false),
            ..MotionOutcome::stay(LocomotionState::Climbing)
        }
    } else {
        MotionOutcome {
            ladder_found: Some(false),
            ..MotionOutcome::stay(LocomotionState::Idle)
        }
    }
}

/// Drives the body vertically at `vertical * climb_speed`, zeroing horizontal
/// velocity. There is no exit at the top or bottom of the ladder.
pub fn climb<B: CharacterBody + ?Sized>(body: &mut B, vertical: f32, climb_speed: f32) {
    let velocity = Vector3::new(0.0, vertical * climb_speed, 0.0);
    body.set_velocity(velocity);
    debug::log_climbing(velocity.y);
}

/// Direct vertical translation applied while on a ladder, on top of the
/// velocity `climb` sets.
pub fn climb_translate<B: CharacterBody + ?Sized>(body: &mut B, vertical: f32, climb_speed: f32, dt: f32) {
    body.translate(Vector3::y() * vertical * climb_speed * dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::body::fake::FakeBody;
    use crate::game::layers::LayerMask;

    const DT: f32 = 1.0 / 60.0;

    fn ctx(config: &ControllerConfig, movement: Vector3<f32>, grounded: bool) -> MotionContext<'_> {
        MotionContext {
            config,
            movement,
            vertical: movement.z,
            grounded,
            dt: DT,
        }
    }

    #[test]
    fn test_idle_touches_nothing() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::grounded();
        let before = body.clone();
        let out = dispatch(LocomotionState::Idle, &ctx(&config, Vector3::zeros(), true), &mut body);
        assert_eq!(out.next, LocomotionState::Idle);
        assert_eq!(body.position, before.position);
        assert_eq!(body.rotation, before.rotation);
        assert!(body.impulses.is_empty());
    }

    #[test]
    fn test_walk_translates_by_speed_times_dt() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::grounded();
        let out = dispatch(LocomotionState::Walking, &ctx(&config, Vector3::x(), true), &mut body);
        assert_eq!(out.next, LocomotionState::Walking);
        assert!((body.position.x - config.move_speed * DT).abs() < 1e-6);
        assert_eq!(body.position.y, 1.0);
        assert_eq!(body.position.z, 0.0);
    }

    #[test]
    fn test_walk_turns_toward_direction() {
        let mut body = FakeBody::at(Vector3::zeros());
        let forward_before = body.rotation * Vector3::z();
        walk(&mut body, Vector3::x(), 5.0, 10.0, DT);
        let forward_after = body.rotation * Vector3::z();
        assert!(forward_after.x > forward_before.x);

        // Enough ticks converge onto +X.
        for _ in 0..120 {
            walk(&mut body, Vector3::x(), 0.0, 10.0, DT);
        }
        let forward = body.rotation * Vector3::z();
        assert!((forward - Vector3::x()).norm() < 1e-3);
    }

    #[test]
    fn test_walk_reversal_does_not_panic() {
        let mut body = FakeBody::at(Vector3::zeros());
        // Facing +Z, asked to face -Z: opposite rotations.
        walk(&mut body, -Vector3::z(), 5.0, 10.0, DT);
        let forward = body.rotation * Vector3::z();
        assert!(forward.z < 1.0);
    }

    #[test]
    fn test_large_dt_snaps_rotation() {
        let mut body = FakeBody::at(Vector3::zeros());
        walk(&mut body, Vector3::x(), 5.0, 10.0, 0.5);
        let forward = body.rotation * Vector3::z();
        assert!((forward - Vector3::x()).norm() < 1e-4);
    }

    #[test]
    fn test_facing_rejects_zero_direction() {
        assert!(facing(&Vector3::zeros()).is_none());
        assert!(facing(&Vector3::y()).is_none());
        let q = facing(&Vector3::new(0.0, 0.0, -2.0)).unwrap();
        assert!((q * Vector3::z() - (-Vector3::z())).norm() < 1e-5);
    }

    #[test]
    fn test_jump_applies_impulse_and_reverts() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::grounded();
        let out = dispatch(LocomotionState::Jumping, &ctx(&config, Vector3::zeros(), true), &mut body);
        assert_eq!(out.next, LocomotionState::Idle);
        assert_eq!(out.impulse, Some(Vector3::new(0.0, 5.0, 0.0)));
        assert_eq!(body.impulses, vec![Vector3::new(0.0, 5.0, 0.0)]);
    }

    #[test]
    fn test_jump_airborne_stays_jumping() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::at(Vector3::new(0.0, 10.0, 0.0));
        let out = dispatch(LocomotionState::Jumping, &ctx(&config, Vector3::zeros(), false), &mut body);
        assert_eq!(out.next, LocomotionState::Jumping);
        assert!(out.impulse.is_none());
        assert!(body.impulses.is_empty());
    }

    #[test]
    fn test_interact_grabs_nearby_ladder() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::grounded().with_collider(
            Vector3::new(0.5, 1.0, 0.0),
            0.1,
            LayerMask::LADDER,
        );
        let out = dispatch(LocomotionState::Interacting, &ctx(&config, Vector3::zeros(), true), &mut body);
        assert_eq!(out.next, LocomotionState::Climbing);
        assert_eq!(out.ladder_found, Some(true));
        assert_eq!(out.gravity_enabled, Some(false));
        assert!(!body.gravity);
    }

    #[test]
    fn test_interact_without_ladder_returns_idle() {
        let config = ControllerConfig::default();
        let mut body = FakeBody::grounded();
        let out = dispatch(LocomotionState::Interacting, &ctx(&config, Vector3::zeros(), true), &mut body);
        assert_eq!(out.next, LocomotionState::Idle);
        assert_eq!(out.ladder_found, Some(false));
        assert!(out.gravity_enabled.is_none());
        assert!(body.gravity);
    }

    #[test]
    fn test_climb_sets_vertical_velocity_unclamped() {
        let mut body = FakeBody::at(Vector3::new(0.0, 100.0, 0.0));
        body.velocity = Vector3::new(4.0, -2.0, 1.0);
        climb(&mut body, -1.0, 3.0);
        assert_eq!(body.velocity, Vector3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_climb_translate_moves_vertically() {
        let mut body = FakeBody::at(Vector3::zeros());
        climb_translate(&mut body, 0.5, 3.0, 0.1);
        assert!((body.position.y - 0.15).abs() < 1e-6);
        assert_eq!(body.position.x, 0.0);
    }
}
