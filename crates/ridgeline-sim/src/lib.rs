pub mod runner;
pub mod script;

use std::fmt;
use std::path::Path;

use ridgeline_core::{ConfigError, Locomotion, LocomotionConfig, Map, MapError};

use crate::script::ScriptError;

/// Demo map shipped with the simulator, relative to the workspace root.
pub const DEFAULT_MAP_PATH: &str = "crates/ridgeline-sim/maps/demo.json";

/// Anything that stops a simulation run before or during playback.
#[derive(Debug)]
pub enum SimError {
    Config(ConfigError),
    Map(MapError),
    Script(ScriptError),
    Output(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Map(e) => write!(f, "{e}"),
            Self::Script(e) => write!(f, "{e}"),
            Self::Output(e) => write!(f, "cannot write trace: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Map(e) => Some(e),
            Self::Script(e) => Some(e),
            Self::Output(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<MapError> for SimError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

impl From<ScriptError> for SimError {
    fn from(e: ScriptError) -> Self {
        Self::Script(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        Self::Output(e)
    }
}

/// Load the config (explicit path, else the environment/default lookup) and
/// the map, and build the state machine.
pub fn load_locomotion(config_path: Option<&Path>, map_path: &Path) -> Result<Locomotion, SimError> {
    let config = match config_path {
        Some(path) => LocomotionConfig::load_from(path)?,
        None => LocomotionConfig::load()?,
    };
    let map = Map::load(map_path)?;
    tracing::info!(
        floors = map.floors().len(),
        walls = map.walls().len(),
        map = %map_path.display(),
        "Map loaded"
    );
    Ok(Locomotion::new(config, map)?)
}
