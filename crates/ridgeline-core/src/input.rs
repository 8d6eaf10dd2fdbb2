use serde::{Deserialize, Serialize};

/// Directional intents sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl InputSnapshot {
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        up: false,
    };

    /// Whether a horizontal direction is held.
    pub fn is_steering(&self) -> bool {
        self.left || self.right
    }

    /// +1 for right, -1 for left. Right wins when both are held.
    pub fn horizontal_sign(&self) -> f64 {
        if self.right { 1.0 } else { -1.0 }
    }
}
