use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Interactive in-memory file system shell.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML file with shell settings (prompt, terminator, directory_marker, color)
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Never color the output
    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["filesys"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Warn));
        assert!(cli.config.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "filesys",
            "--log-level",
            "debug",
            "--config",
            "shell.yaml",
            "--no-color",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.config, Some(PathBuf::from("shell.yaml")));
        assert!(cli.no_color);
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["filesys", "-l", "loud"]).is_err());
    }
}
