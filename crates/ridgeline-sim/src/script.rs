use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ridgeline_core::InputSnapshot;

/// A run of identical inputs held for `ticks` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpan {
    pub ticks: u32,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub up: bool,
}

impl InputSpan {
    pub fn input(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
            up: self.up,
        }
    }
}

/// Input timeline played span by span. Ticks past the last span are idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default, rename = "span")]
    pub spans: Vec<InputSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    Read { path: String, message: String },
    Parse(String),
    EmptySpan { index: usize },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read script {path}: {message}"),
            Self::Parse(e) => write!(f, "script parse error: {e}"),
            Self::EmptySpan { index } => write!(f, "span {index} lasts zero ticks"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl InputScript {
    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        let script: Self =
            toml::from_str(content).map_err(|e| ScriptError::Parse(e.to_string()))?;
        if let Some(index) = script.spans.iter().position(|s| s.ticks == 0) {
            return Err(ScriptError::EmptySpan { index });
        }
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Sum of all span lengths.
    pub fn total_ticks(&self) -> u64 {
        self.spans.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// Input for the zero-based `tick`.
    pub fn input_at(&self, tick: u64) -> InputSnapshot {
        let mut start = 0u64;
        for span in &self.spans {
            let end = start + u64::from(span.ticks);
            if tick < end {
                return span.input();
            }
            start = end;
        }
        InputSnapshot::IDLE
    }

    /// Every tick's input in order, for `ticks` ticks.
    pub fn inputs(&self, ticks: u64) -> impl Iterator<Item = InputSnapshot> + '_ {
        let tail = std::iter::repeat(InputSnapshot::IDLE);
        self.spans
            .iter()
            .flat_map(|span| std::iter::repeat_n(span.input(), span.ticks as usize))
            .chain(tail)
            .take(ticks as usize)
    }
}
