//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taller_types::OutputFormat;

#[derive(Parser)]
#[command(name = "taller")]
#[command(version)]
#[command(about = "Front-office backend for an auto-service shop")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: TALLER_CONFIG or the user config dir)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format (json, table)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prepare the data directory and serve the HTTP API
    Serve {
        /// Listen address (overrides config)
        #[arg(long, short = 'b')]
        bind: Option<String>,

        /// Data directory (overrides config)
        #[arg(long, short = 'd')]
        data_dir: Option<PathBuf>,
    },

    /// Migrate table files and rehash passwords, then exit
    Migrate {
        /// Data directory (overrides config)
        #[arg(long, short = 'd')]
        data_dir: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_globals() {
        let cli = Cli::try_parse_from([
            "taller", "serve", "--bind", "127.0.0.1:8080", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Serve { bind, data_dir } => {
                assert_eq!(bind.as_deref(), Some("127.0.0.1:8080"));
                assert!(data_dir.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_config_flags() {
        let cli = Cli::try_parse_from(["taller", "config", "--init"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { show: false, init: true }));
    }
}
