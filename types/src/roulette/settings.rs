use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Spin animation pace (consumed by the rendering collaborator only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Normal => "normal",
            AnimationSpeed::Fast => "fast",
        }
    }
}

/// Player preferences, persisted independently of the game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub animation_speed: AnimationSpeed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            animation_speed: AnimationSpeed::Normal,
        }
    }
}

/// A single preference change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingUpdate {
    SoundEnabled(bool),
    AnimationSpeed(AnimationSpeed),
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum SettingParseError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidValue { key: String, value: String },
}

impl Settings {
    /// Applies an update, returning the previous settings.
    pub fn apply(&mut self, update: SettingUpdate) -> Settings {
        let old = self.clone();
        match update {
            SettingUpdate::SoundEnabled(enabled) => self.sound_enabled = enabled,
            SettingUpdate::AnimationSpeed(speed) => self.animation_speed = speed,
        }
        old
    }
}

impl SettingUpdate {
    /// Parses a `key value` pair such as `("sound", "off")`.
    pub fn parse(key: &str, value: &str) -> Result<Self, SettingParseError> {
        let invalid = || SettingParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key.to_ascii_lowercase().as_str() {
            "sound" | "soundenabled" | "sound_enabled" => {
                match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => Ok(SettingUpdate::SoundEnabled(true)),
                    "off" | "false" | "no" | "0" => Ok(SettingUpdate::SoundEnabled(false)),
                    _ => Err(invalid()),
                }
            }
            "speed" | "animationspeed" | "animation_speed" => value
                .parse()
                .map(SettingUpdate::AnimationSpeed)
                .map_err(|_| invalid()),
            _ => Err(SettingParseError::UnknownKey(key.to_string())),
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationSpeed {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "normal" => Ok(AnimationSpeed::Normal),
            "fast" => Ok(AnimationSpeed::Fast),
            _ => Err(()),
        }
    }
}
