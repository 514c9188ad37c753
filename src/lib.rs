//! Locomotion controller library
//!
//! This module exposes the player state machine, the physics port it drives,
//! and a rapier-backed world so hosts and tests can run it headless.

pub mod config;
pub mod game;
