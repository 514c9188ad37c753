//! Controller configuration parsing from TOML files

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::game::constants::controller as defaults;
use crate::game::layers::LayerMask;

/// Tunable parameters for a [`PlayerController`](crate::game::PlayerController).
///
/// Every field is optional in TOML; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Walk speed in units/second
    pub move_speed: f32,
    /// Ladder climb speed in units/second
    pub climb_speed: f32,
    /// Magnitude of the upward jump impulse
    pub jump_force: f32,
    /// Radius of the ground-check sphere
    pub ground_check_radius: f32,
    /// Ground-check anchor in body-local space
    pub ground_check_offset: [f32; 3],
    /// Radius of the sphere searched for ladders when interacting
    pub ladder_probe_radius: f32,
    /// Movement magnitude above which the character walks
    pub walk_threshold: f32,
    /// Turn slerp factor per second
    pub turn_rate: f32,
    /// Layers counted as ground
    pub ground_layers: LayerMask,
    /// Layers counted as ladders
    pub ladder_layers: LayerMask,
    /// Layers holding interactable objects (reserved for hosts; ladders are
    /// resolved through `ladder_layers`)
    pub interactable_layers: LayerMask,
    /// Re-enable gravity when the player dismounts a ladder
    pub restore_gravity_on_dismount: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: defaults::DEFAULT_MOVE_SPEED,
            climb_speed: defaults::DEFAULT_CLIMB_SPEED,
            jump_force: defaults::DEFAULT_JUMP_FORCE,
            ground_check_radius: defaults::DEFAULT_GROUND_CHECK_RADIUS,
            ground_check_offset: defaults::DEFAULT_GROUND_CHECK_OFFSET,
            ladder_probe_radius: defaults::DEFAULT_LADDER_PROBE_RADIUS,
            walk_threshold: defaults::WALK_THRESHOLD,
            turn_rate: defaults::TURN_RATE,
            ground_layers: LayerMask::GROUND,
            ladder_layers: LayerMask::LADDER,
            interactable_layers: LayerMask::INTERACTABLE,
            restore_gravity_on_dismount: true,
        }
    }
}

impl ControllerConfig {
    /// Load and validate controller configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate controller configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the controller cannot integrate sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("move_speed", self.move_speed)?;
        non_negative("climb_speed", self.climb_speed)?;
        non_negative("jump_force", self.jump_force)?;
        non_negative("walk_threshold", self.walk_threshold)?;
        non_negative("turn_rate", self.turn_rate)?;
        positive("ground_check_radius", self.ground_check_radius)?;
        positive("ladder_probe_radius", self.ladder_probe_radius)?;
        if self.ground_check_offset.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "ground_check_offset",
                reason: "components must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn ground_check_offset(&self) -> Vector3<f32> {
        Vector3::from(self.ground_check_offset)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value >= 0, got {}", value),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value > 0, got {}", value),
        })
    }
}

/// Errors that can occur when loading controller configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
    #[error("Invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
