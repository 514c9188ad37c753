//! Player locomotion controller.
//!
//! This is the main entry point for character locomotion. The host calls
//! [`PlayerController::tick`] once per frame with the sampled input and a
//! borrowed body; the controller probes the ground, resolves the next state
//! from input, then runs that state's motion.

use serde::Serialize;
use tracing::{debug, trace};

use super::body::CharacterBody;
use super::input::{InputFrame, InputSource};
use super::motion::{self, MotionContext};
use super::probe::probe_ground;
use super::state::{is_dismount, resolve_input, LocomotionState};
use crate::config::ControllerConfig;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    /// State at the start of the tick.
    pub entry: LocomotionState,
    /// State chosen by the input rules, before dispatch.
    pub resolved: LocomotionState,
    /// State at the end of the tick.
    pub state: LocomotionState,
    pub grounded: bool,
    /// Jump impulse applied this tick.
    pub impulse: Option<[f32; 3]>,
    /// Ladder probe result, when the Interacting state ran.
    pub ladder_found: Option<bool>,
    /// New gravity flag, when this tick changed it.
    pub gravity_enabled: Option<bool>,
}

/// Per-character locomotion state machine.
///
/// # Example
///
/// ```ignore
/// let mut controller = PlayerController::new(ControllerConfig::default());
///
/// // Each frame:
/// let report = controller.tick(dt, &input, &mut world.character(handle));
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    state: LocomotionState,
}

impl PlayerController {
    /// Create a controller in the Idle state.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: LocomotionState::Idle,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(ControllerConfig::default())
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace tunables. Takes effect on the next tick.
    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    /// Advance one tick.
    ///
    /// Order within the tick:
    /// 1. Ground probe.
    /// 2. Input rules (walk/idle, jump, interact) pick the next state.
    /// 3. While climbing, vertical input translates the body directly.
    /// 4. The chosen state's motion runs and may transition again.
    pub fn tick<B: CharacterBody + ?Sized>(&mut self, dt: f32, input: &InputFrame, body: &mut B) -> TickReport {
        let input = input.clamped();
        let entry = self.state;
        let grounded = probe_ground(body, &self.config);

        let raw = input.movement();
        let movement = if raw.norm() > self.config.walk_threshold {
            raw.normalize()
        } else {
            raw
        };

        let resolved = resolve_input(entry, &input, grounded, self.config.walk_threshold);
        self.state = resolved;

        let mut gravity_enabled = None;
        if is_dismount(entry, resolved) && self.config.restore_gravity_on_dismount {
            body.set_gravity_enabled(true);
            gravity_enabled = Some(true);
        }

        if self.state.is_climbing() && input.vertical.abs() > 0.0 {
            motion::climb_translate(body, input.vertical, self.config.climb_speed, dt);
        }

        let ctx = MotionContext {
            config: &self.config,
            movement,
            vertical: input.vertical,
            grounded,
            dt,
        };
        let outcome = motion::dispatch(self.state, &ctx, body);
        self.state = outcome.next;

        if self.state != entry {
            debug!(from = %entry, to = %self.state, grounded, "locomotion state changed");
        } else {
            trace!(state = %self.state, grounded, "locomotion tick");
        }

        TickReport {
            entry,
            resolved,
            state: self.state,
            grounded,
            impulse: outcome.impulse.map(|v| [v.x, v.y, v.z]),
            ladder_found: outcome.ladder_found,
            gravity_enabled: outcome.gravity_enabled.or(gravity_enabled),
        }
    }

    /// Sample `source` once and tick with it.
    pub fn run<S, B>(&mut self, dt: f32, source: &mut S, body: &mut B) -> TickReport
    where
        S: InputSource + ?Sized,
        B: CharacterBody + ?Sized,
    {
        let input = source.sample();
        self.tick(dt, &input, body)
    }

    /// Return to Idle, re-enabling gravity if the character was on a ladder.
    pub fn reset<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if self.state.is_climbing() {
            body.set_gravity_enabled(true);
        }
        self.state = LocomotionState::Idle;
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::with_default_config()
    }
}
