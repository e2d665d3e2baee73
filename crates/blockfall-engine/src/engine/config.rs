use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Smallest accepted board width or height.
pub const MIN_BOARD_SIZE: usize = 4;
/// Largest accepted board width or height.
pub const MAX_BOARD_SIZE: usize = 64;

/// Board dimensions and timing for a game.
///
/// Durations are stored in milliseconds when serialized. Missing fields take
/// their default values, so a partial file only overrides what it names.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "fall_interval_ms": 500 }"#).unwrap();
/// assert_eq!(config.fall_interval, Duration::from_millis(500));
/// assert_eq!(config.board_width, 10);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Time between gravity steps.
    #[serde(rename = "fall_interval_ms", with = "serde_millis")]
    pub fall_interval: Duration,
    /// Time a key must be held before it starts repeating.
    #[serde(rename = "key_initial_delay_ms", with = "serde_millis")]
    pub key_initial_delay: Duration,
    /// Time between repeats of a held key.
    #[serde(rename = "key_repeat_interval_ms", with = "serde_millis")]
    pub key_repeat_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            fall_interval: Duration::from_millis(1000),
            key_initial_delay: Duration::from_millis(200),
            key_repeat_interval: Duration::from_millis(150),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width {_0} must be between 4 and 64")]
    BoardWidth(#[error(not(source))] usize),
    #[display("board height {_0} must be between 4 and 64")]
    BoardHeight(#[error(not(source))] usize),
    #[display("{_0} must be greater than zero")]
    ZeroDuration(#[error(not(source))] &'static str),
}

impl GameConfig {
    /// Checks that the board fits every shape and that no interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = MIN_BOARD_SIZE..=MAX_BOARD_SIZE;
        if !sizes.contains(&self.board_width) {
            return Err(ConfigError::BoardWidth(self.board_width));
        }
        if !sizes.contains(&self.board_height) {
            return Err(ConfigError::BoardHeight(self.board_height));
        }
        for (name, value) in [
            ("fall_interval_ms", self.fall_interval),
            ("key_initial_delay_ms", self.key_initial_delay),
            ("key_repeat_interval_ms", self.key_repeat_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }
}

mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
