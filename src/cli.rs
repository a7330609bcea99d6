//! 命令行界面定义
//!
//! 定义了主程序的命令行参数和选项
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ipfinder")]
#[command(version)]
#[command(
    about = "Discover local network endpoints (IPs, ports, candidate metadata) via WebRTC ICE gathering"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Configuration file path (defaults to searching standard locations)
    #[arg(short, long, default_value = "ipfinder.toml", global = true)]
    pub(crate) config: PathBuf,

    /// Gather window in seconds, clamped to [1, 60]; overrides the config file
    #[arg(short, long, global = true)]
    pub(crate) timeout: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Print all discovered IP tokens
    All,
    /// Print IP tokens containing '.'
    Ipv4,
    /// Print IP tokens containing ':'
    Ipv6,
    /// Print discovered ports
    Ports,
    /// Print other candidate tokens (protocols, types, punctuation)
    Other,
    /// Print the full report of one gather cycle
    Report {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Test configuration file
    Test {
        /// Configuration file path (optional, defaults to ipfinder.toml)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reporter_with_timeout() {
        let cli = Cli::try_parse_from(["ipfinder", "ports", "--timeout", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Ports));
        assert_eq!(cli.timeout, Some(2.0));
        assert_eq!(cli.config, PathBuf::from("ipfinder.toml"));
    }

    #[test]
    fn test_parse_report_json() {
        let cli = Cli::try_parse_from(["ipfinder", "-c", "x.toml", "report", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Report { json: true }));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn test_parse_test_command() {
        let cli = Cli::try_parse_from(["ipfinder", "test", "other.toml"]).unwrap();
        match cli.command {
            Commands::Test { config_file } => {
                assert_eq!(config_file, Some(PathBuf::from("other.toml")))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["ipfinder"]).is_err());
    }
}
