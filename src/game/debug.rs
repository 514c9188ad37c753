//! Debug-only output: the ground-check gizmo and the climbing log line.
//! Nothing here feeds back into locomotion.

use serde::Serialize;

use super::body::CharacterBody;
use super::probe::ground_check_point;
use crate::config::ControllerConfig;

/// RGBA red used for the ground-check gizmo.
pub const GIZMO_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Wireframe sphere for a host renderer to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WireSphere {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// The ground-check volume as it will be queried this tick.
pub fn ground_check_gizmo<B: CharacterBody + ?Sized>(body: &B, config: &ControllerConfig) -> WireSphere {
    let c = ground_check_point(body, config);
    WireSphere {
        center: [c.x, c.y, c.z],
        radius: config.ground_check_radius,
        color: GIZMO_RED,
    }
}

pub(crate) fn log_climbing(vertical_velocity: f32) {
    tracing::debug!(vertical_velocity, "climbing");
}
