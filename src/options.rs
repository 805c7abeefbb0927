use crate::sn_error::SnError;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Playback options for an animated instance. Can be written by hand or
/// loaded from YAML. Missing fields take their default values.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct AnimOptions {
    /// Multiplier applied to the time step given to `advance`
    pub speed: f32,
    /// Playback time in seconds when an instance is created or its clip is
    /// changed
    pub start_time: f32,
    /// Log tracks that name bones the skeleton doesn't have at warning
    /// level. When false they are logged at debug level.
    pub warn_missing_bones: bool,
}

impl Default for AnimOptions {
    fn default() -> Self {
        Self {
            speed: 1.0_f32,
            start_time: 0.0_f32,
            warn_missing_bones: true,
        }
    }
}

impl AnimOptions {
    /// Parses options from a YAML string
    ///
    /// # Errors
    /// May return `SnError`
    pub fn from_yaml(yaml: &str) -> Result<Self, SnError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads options from a YAML file
    ///
    /// # Errors
    /// May return `SnError`
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}
