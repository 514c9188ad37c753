//! Locomotion states and the input-driven transition rules.

use serde::{Deserialize, Serialize};

use super::input::InputFrame;

/// The single active locomotion state of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    /// Transient: applies the jump impulse during dispatch and falls back to Idle.
    Jumping,
    /// Transient: resolves to Climbing or Idle during dispatch.
    Interacting,
    Climbing,
}

impl LocomotionState {
    #[inline]
    pub fn is_climbing(self) -> bool {
        self == LocomotionState::Climbing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocomotionState::Idle => "idle",
            LocomotionState::Walking => "walking",
            LocomotionState::Jumping => "jumping",
            LocomotionState::Interacting => "interacting",
            LocomotionState::Climbing => "climbing",
        }
    }
}

impl std::fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies the per-tick input rules to `current`, in precedence order:
///
/// 1. Walking if movement magnitude exceeds `walk_threshold`, else Idle.
///    Skipped while Climbing.
/// 2. Jumping if jump went down, the character is grounded, and not Climbing.
/// 3. Interact went down: Climbing dismounts to Idle, anything else becomes
///    Interacting.
///
/// Later rules override earlier ones. Pure: no physics access.
pub fn resolve_input(
    current: LocomotionState,
    input: &InputFrame,
    grounded: bool,
    walk_threshold: f32,
) -> LocomotionState {
    let climbing = current.is_climbing();
    let mut next = current;

    if !climbing {
        next = if input.movement().norm() > walk_threshold {
            LocomotionState::Walking
        } else {
            LocomotionState::Idle
        };
    }

    if input.jump && grounded && !climbing {
        next = LocomotionState::Jumping;
    }

    if input.interact {
        next = if climbing {
            LocomotionState::Idle
        } else {
            LocomotionState::Interacting
        };
    }

    next
}

/// True when `resolve_input` took the character off a ladder this tick.
#[inline]
pub fn is_dismount(before: LocomotionState, after: LocomotionState) -> bool {
    before.is_climbing() && !after.is_climbing()
}
