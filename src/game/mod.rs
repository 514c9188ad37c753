//! Player locomotion: input sampling, ground probing, the state machine and
//! the per-state motion it applies to a character body.

pub mod body;
pub mod constants;
pub mod controller;
pub mod debug;
pub mod input;
pub mod layers;
pub mod motion;
pub mod physics;
pub mod probe;
pub mod state;

pub use body::CharacterBody;
pub use controller::{PlayerController, TickReport};
pub use input::{InputFrame, InputSource, ScriptedInput};
pub use layers::LayerMask;
pub use physics::PhysicsWorld;
pub use state::LocomotionState;
