//! Per-tick input sampling.
//!
//! The host delivers one [`InputFrame`] per tick. Axes are the raw two-axis
//! direction; button flags mean "went down this tick", so holding a button
//! across ticks does not repeat it.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input sampled for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Left/right axis in [-1, 1], maps to world X.
    #[serde(default)]
    pub horizontal: f32,
    /// Forward/back axis in [-1, 1], maps to world Z (and to climbing).
    #[serde(default)]
    pub vertical: f32,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub interact: bool,
}

impl InputFrame {
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Default::default()
        }
        .clamped()
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_interact(mut self) -> Self {
        self.interact = true;
        self
    }

    /// Copy with both axes clamped to [-1, 1]. NaN axes become 0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self {
            horizontal: clamp(self.horizontal),
            vertical: clamp(self.vertical),
            ..self
        }
    }

    /// Raw movement vector on the XZ plane.
    pub fn movement(&self) -> Vector3<f32> {
        Vector3::new(self.horizontal, 0.0, self.vertical)
    }
}

/// Source of per-tick input, polled exactly once per tick.
pub trait InputSource {
    fn sample(&mut self) -> InputFrame;
}

impl<F> InputSource for F
where
    F: FnMut() -> InputFrame,
{
    fn sample(&mut self) -> InputFrame {
        self()
    }
}

/// One entry of an input script: a frame held for `ticks` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub horizontal: f32,
    #[serde(default)]
    pub vertical: f32,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub interact: bool,
    #[serde(default = "default_step_ticks")]
    pub ticks: u32,
}

fn default_step_ticks() -> u32 {
    1
}

impl ScriptStep {
    fn frame(&self, first_tick: bool) -> InputFrame {
        InputFrame {
            horizontal: self.horizontal,
            vertical: self.vertical,
            // Buttons fire on the first tick of the step only.
            jump: self.jump && first_tick,
            interact: self.interact && first_tick,
        }
        .clamped()
    }
}

/// On-disk input script.
///
/// ```toml
/// [[step]]
/// horizontal = 1.0
/// ticks = 30
///
/// [[step]]
/// jump = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputScript {
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::Io(path.to_path_buf(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ScriptError> {
        let script: InputScript = toml::from_str(content).map_err(|e| ScriptError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;
        if script.total_ticks() == 0 {
            return Err(ScriptError::Empty(origin.to_string()));
        }
        Ok(script)
    }

    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

/// Errors that can occur when loading an input script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Script {0} has no ticks")]
    Empty(String),
}

/// Replays a script, then yields neutral input forever.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    cursor: usize,
    elapsed_in_step: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            cursor: 0,
            elapsed_in_step: 0,
        }
    }

    pub fn from_script(script: InputScript) -> Self {
        Self::new(script.steps)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputFrame {
        while let Some(step) = self.steps.get(self.cursor) {
            if self.elapsed_in_step < step.ticks {
                let frame = step.frame(self.elapsed_in_step == 0);
                self.elapsed_in_step += 1;
                return frame;
            }
            self.cursor += 1;
            self.elapsed_in_step = 0;
        }
        InputFrame::default()
    }
}
