use std::fmt;

/// Failure to load or validate a [`crate::config::LocomotionConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Read { path: String, message: String },
    Parse(String),
    /// Every constraint the config violates, in field order.
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read config {path}: {message}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid(violations) => {
                write!(f, "invalid config: {}", violations.join("; "))
            },
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to load or construct a [`crate::map::Map`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    Read { path: String, message: String },
    Parse(String),
    NonFinite { what: String },
    ZeroFrames { floor: usize, step: usize },
    AnimatedWall { wall: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read map {path}: {message}"),
            Self::Parse(e) => write!(f, "map parse error: {e}"),
            Self::NonFinite { what } => write!(f, "non-finite coordinate in {what}"),
            Self::ZeroFrames { floor, step } => {
                write!(f, "floor {floor}: motion step {step} lasts zero frames")
            },
            Self::AnimatedWall { wall } => {
                write!(f, "wall {wall}: walls cannot carry a motion schedule")
            },
        }
    }
}

impl std::error::Error for MapError {}
