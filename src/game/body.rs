use nalgebra::{UnitQuaternion, Vector3};

use super::layers::LayerMask;

/// The capability set the controller needs from a physical character body.
///
/// The physics engine owns the body; the controller only borrows it for the
/// duration of a tick and is its sole per-character mutator. Implementations
/// must treat an empty query result as a normal outcome.
pub trait CharacterBody {
    /// World-space position of the body origin.
    fn position(&self) -> Vector3<f32>;

    fn rotation(&self) -> UnitQuaternion<f32>;

    fn velocity(&self) -> Vector3<f32>;

    fn set_rotation(&mut self, rotation: UnitQuaternion<f32>);

    /// Moves the body by `delta` in world space, bypassing the solver.
    fn translate(&mut self, delta: Vector3<f32>);

    fn set_velocity(&mut self, velocity: Vector3<f32>);

    /// Applies an instantaneous change in momentum.
    fn apply_impulse(&mut self, impulse: Vector3<f32>);

    fn set_gravity_enabled(&mut self, enabled: bool);

    fn gravity_enabled(&self) -> bool;

    /// Returns true if any collider on `layers` overlaps the sphere.
    /// The body's own colliders are never reported.
    fn overlaps_sphere(&self, center: Vector3<f32>, radius: f32, layers: LayerMask) -> bool;
}
