use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use blockfall_engine::GameConfig;

/// Configuration file and per-field overrides, accepted before or after the subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// JSON configuration file; missing fields keep their defaults
    #[clap(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Board width in cells
    #[clap(long, global = true)]
    width: Option<usize>,
    /// Board height in cells
    #[clap(long, global = true)]
    height: Option<usize>,
    /// Milliseconds between gravity steps
    #[clap(long, global = true)]
    fall_interval_ms: Option<u64>,
    /// Milliseconds a key must be held before it repeats
    #[clap(long, global = true)]
    initial_delay_ms: Option<u64>,
    /// Milliseconds between repeats of a held key
    #[clap(long, global = true)]
    repeat_interval_ms: Option<u64>,
}

impl ConfigArg {
    /// Reads the configuration file if given, applies the overrides and validates the result.
    pub(crate) fn load(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                eprintln!("Loading configuration from {}", path.display());
                read_config_file(path)?
            }
            None => GameConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        if let Some(ms) = self.fall_interval_ms {
            config.fall_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.initial_delay_ms {
            config.key_initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.repeat_interval_ms {
            config.key_repeat_interval = Duration::from_millis(ms);
        }
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<GameConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open configuration file: {}", path.display()))?;
    let config = serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let config = ConfigArg::default().load().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let arg = ConfigArg {
            width: Some(8),
            fall_interval_ms: Some(250),
            repeat_interval_ms: Some(40),
            ..ConfigArg::default()
        };
        let config = arg.load().unwrap();
        assert_eq!(config.board_width, 8);
        assert_eq!(config.board_height, 20);
        assert_eq!(config.fall_interval, Duration::from_millis(250));
        assert_eq!(config.key_repeat_interval, Duration::from_millis(40));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let arg = ConfigArg {
            height: Some(2),
            ..ConfigArg::default()
        };
        let err = arg.load().unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "board height 2 must be between 4 and 64"
        );
    }

    #[test]
    fn test_file_then_overrides() {
        let path = env::temp_dir().join(format!("blockfall-config-{}.json", process::id()));
        fs::write(&path, r#"{ "board_width": 12, "fall_interval_ms": 600 }"#).unwrap();
        let arg = ConfigArg {
            config: Some(path.clone()),
            fall_interval_ms: Some(300),
            ..ConfigArg::default()
        };
        let config = arg.load();
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.board_width, 12);
        assert_eq!(config.fall_interval, Duration::from_millis(300));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let arg = ConfigArg {
            config: Some(PathBuf::from("/nonexistent/blockfall.json")),
            ..ConfigArg::default()
        };
        let err = arg.load().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blockfall.json"), "{err}");
    }
}
