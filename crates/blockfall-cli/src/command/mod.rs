use std::io::{self, Write as _};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use self::{config::ConfigArg, play::PlayArg};

mod config;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    config: ConfigArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the effective configuration as JSON
    PrintConfig,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let config = args.config.load()?;
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&config, &arg)?,
        Mode::PrintConfig => {
            let json = serde_json::to_string_pretty(&config)?;
            writeln!(io::stdout(), "{json}").context("failed to write configuration")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_config_flags_after_subcommand() {
        let args =
            CommandArgs::try_parse_from(["blockfall", "play", "--width", "12", "--seed", "9"])
                .unwrap();
        let Some(Mode::Play(play)) = &args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(play.seed, Some(9));
        assert_eq!(args.config.load().unwrap().board_width, 12);
    }

    #[test]
    fn test_print_config_mode() {
        let args =
            CommandArgs::try_parse_from(["blockfall", "--height", "30", "print-config"]).unwrap();
        assert!(matches!(args.mode, Some(Mode::PrintConfig)));
        assert_eq!(args.config.load().unwrap().board_height, 30);
    }
}
