//! Spatial probes the controller runs against the body each tick.
//! Both are read-only queries; a miss is a normal result.

use nalgebra::Vector3;

use super::body::CharacterBody;
use crate::config::ControllerConfig;

/// World-space position of the ground-check anchor.
pub fn ground_check_point<B: CharacterBody + ?Sized>(body: &B, config: &ControllerConfig) -> Vector3<f32> {
    body.position() + body.rotation() * config.ground_check_offset()
}

/// Sphere overlap at the ground-check anchor, filtered to ground layers.
pub fn probe_ground<B: CharacterBody + ?Sized>(body: &B, config: &ControllerConfig) -> bool {
    body.overlaps_sphere(
        ground_check_point(body, config),
        config.ground_check_radius,
        config.ground_layers,
    )
}

/// Sphere overlap around the body origin, filtered to ladder layers.
pub fn probe_ladder<B: CharacterBody + ?Sized>(body: &B, config: &ControllerConfig) -> bool {
    body.overlaps_sphere(body.position(), config.ladder_probe_radius, config.ladder_layers)
}
