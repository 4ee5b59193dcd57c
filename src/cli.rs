//! Command-line flags shared by the binaries.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::logging::{LogConfig, LogFormat};

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl LogArgs {
    /// `-v`/`-q` override `RUST_LOG`; without them the environment wins.
    pub fn log_config(&self) -> LogConfig {
        let format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        LogConfig {
            use_env_filter: !self.verbosity.is_present(),
            ..LogConfig::default()
        }
        .with_level(self.verbosity.tracing_level_filter())
        .with_format(format)
        .with_log_file(self.log_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn defaults_to_warn_and_env() {
        let cli = TestCli::parse_from(["ttt"]);
        let config = cli.log.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn verbose_flags_override_env() {
        let cli = TestCli::parse_from(["ttt", "-vv", "--log-format", "json", "--log-file", "x.log"]);
        let config = cli.log.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("x.log")));
    }
}
