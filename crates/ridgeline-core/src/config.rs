use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "RIDGELINE_CONFIG";
/// Config file read when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/locomotion.toml";

/// Terminal (most negative) vertical speed.
pub const Y_MIN_SPEED: f64 = -4.7;
/// Collision radius of the character.
pub const CHARACTER_SIZE: f64 = 5.0;
/// Vertical speed of a level-one jump and of every wall-kick.
pub const JUMP_INITIAL_SPEED: f64 = 6.0;
/// Gravity, subtracted from the vertical speed every airborne tick.
pub const Y_DECELERATION: f64 = 0.5;
/// Horizontal acceleration while standing.
pub const X_ACCELERATION: f64 = 0.1;
/// Horizontal acceleration while airborne.
pub const X_ACCELERATION_MID_AIR: f64 = 0.05;
/// Horizontal speed cap.
pub const MAX_WALKING_SPEED: f64 = 2.0;
/// Ticks after touching a wall during which a wall-kick is accepted.
pub const WALLKICK_FRAMES: u32 = 20;
/// Minimum horizontal speed magnitude for a wall-kick.
pub const WALLKICK_NECESSARY_SPEED: f64 = 1.0;
/// Ticks after landing during which a re-jump chains the combo.
pub const REPEATED_JUMP_FRAMES: u32 = 10;
/// Horizontal speed magnitude a level-two re-jump needs to reach level three.
pub const THIRD_LEVEL_JUMP_SPEED_REQUIRED: f64 = 1.5;
/// Jump speed multiplier at combo level two.
pub const JUMP_FACTOR_2: f64 = 1.3;
/// Jump speed multiplier at combo level three.
pub const JUMP_FACTOR_3: f64 = 1.6;

/// Tuning constants for the locomotion state machine, loadable from TOML.
///
/// Speeds are in map units per tick, accelerations in map units per tick
/// squared, windows in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub y_min_speed: f64,
    pub character_size: f64,
    pub jump_initial_speed: f64,
    pub y_deceleration: f64,
    pub x_acceleration: f64,
    pub x_acceleration_mid_air: f64,
    pub max_walking_speed: f64,
    pub wallkick_frames: u32,
    pub wallkick_necessary_speed: f64,
    pub repeated_jump_frames: u32,
    pub third_level_jump_speed_required: f64,
    pub jump_factor_2: f64,
    pub jump_factor_3: f64,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            y_min_speed: Y_MIN_SPEED,
            character_size: CHARACTER_SIZE,
            jump_initial_speed: JUMP_INITIAL_SPEED,
            y_deceleration: Y_DECELERATION,
            x_acceleration: X_ACCELERATION,
            x_acceleration_mid_air: X_ACCELERATION_MID_AIR,
            max_walking_speed: MAX_WALKING_SPEED,
            wallkick_frames: WALLKICK_FRAMES,
            wallkick_necessary_speed: WALLKICK_NECESSARY_SPEED,
            repeated_jump_frames: REPEATED_JUMP_FRAMES,
            third_level_jump_speed_required: THIRD_LEVEL_JUMP_SPEED_REQUIRED,
            jump_factor_2: JUMP_FACTOR_2,
            jump_factor_3: JUMP_FACTOR_3,
        }
    }
}

impl LocomotionConfig {
    /// Load from `RIDGELINE_CONFIG`, or `config/locomotion.toml`.
    ///
    /// Only a missing `config/locomotion.toml` falls back to defaults. A path
    /// named by `RIDGELINE_CONFIG` must exist. A file that does not parse or
    /// validate is an error; partial configs are never accepted.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::env::var(CONFIG_ENV_VAR).ok())
    }

    fn load_with(explicit: Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            tracing::warn!("Config {DEFAULT_CONFIG_PATH} not found, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate. Fields absent from `content` keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constraint and report all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        let floats = [
            ("y_min_speed", self.y_min_speed),
            ("character_size", self.character_size),
            ("jump_initial_speed", self.jump_initial_speed),
            ("y_deceleration", self.y_deceleration),
            ("x_acceleration", self.x_acceleration),
            ("x_acceleration_mid_air", self.x_acceleration_mid_air),
            ("max_walking_speed", self.max_walking_speed),
            ("wallkick_necessary_speed", self.wallkick_necessary_speed),
            (
                "third_level_jump_speed_required",
                self.third_level_jump_speed_required,
            ),
            ("jump_factor_2", self.jump_factor_2),
            ("jump_factor_3", self.jump_factor_3),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                violations.push(format!("{name} must be finite, got {value}"));
            }
        }

        if self.y_min_speed >= 0.0 {
            violations.push(format!(
                "y_min_speed must be negative, got {}",
                self.y_min_speed
            ));
        }

        let positives = [
            ("character_size", self.character_size),
            ("jump_initial_speed", self.jump_initial_speed),
            ("y_deceleration", self.y_deceleration),
            ("x_acceleration", self.x_acceleration),
            ("x_acceleration_mid_air", self.x_acceleration_mid_air),
            ("max_walking_speed", self.max_walking_speed),
            ("wallkick_necessary_speed", self.wallkick_necessary_speed),
            (
                "third_level_jump_speed_required",
                self.third_level_jump_speed_required,
            ),
        ];
        for (name, value) in positives {
            if value <= 0.0 {
                violations.push(format!("{name} must be positive, got {value}"));
            }
        }

        if self.wallkick_frames == 0 {
            violations.push("wallkick_frames must be positive".to_string());
        }
        if self.repeated_jump_frames == 0 {
            violations.push("repeated_jump_frames must be positive".to_string());
        }

        if self.jump_factor_2 <= 1.0 {
            violations.push(format!(
                "jump_factor_2 must exceed 1, got {}",
                self.jump_factor_2
            ));
        }
        if self.jump_factor_3 <= self.jump_factor_2 {
            violations.push(format!(
                "jump_factor_3 ({}) must exceed jump_factor_2 ({})",
                self.jump_factor_3, self.jump_factor_2
            ));
        }
        if self.x_acceleration <= self.x_acceleration_mid_air {
            violations.push(format!(
                "x_acceleration ({}) must exceed x_acceleration_mid_air ({})",
                self.x_acceleration, self.x_acceleration_mid_air
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }
}
