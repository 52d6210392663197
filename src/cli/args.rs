//! CLI argument definitions using clap
//!
//! Commands:
//! - rowgate serve [--config <path>] [--addr <host:port>] [--service <name>] [--app <name>]
//! - rowgate check-config [same flags]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rowgate - REST gateway over a hierarchical app/database/table/row store
#[derive(Parser, Debug)]
#[command(name = "rowgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the backing app (creating it if missing) and serve HTTP
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Load and validate configuration, print the effective config, exit
    CheckConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Configuration sources. Flags override values from the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to serve on (host:port, e.g. ":8080")
    #[arg(long)]
    pub addr: Option<String>,

    /// Name of the backing service to connect to
    #[arg(long)]
    pub service: Option<String>,

    /// Name of the app to connect to
    #[arg(long)]
    pub app: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "rowgate", "serve", "--addr", ":9000", "--service", "memory", "--app", "notes",
        ])
        .unwrap();
        match cli.command {
            Command::Serve { config } => {
                assert_eq!(config.addr.as_deref(), Some(":9000"));
                assert_eq!(config.service.as_deref(), Some("memory"));
                assert_eq!(config.app.as_deref(), Some("notes"));
                assert!(config.config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["rowgate", "check-config", "--config", "gw.json"]).unwrap();
        assert!(matches!(cli.command, Command::CheckConfig { .. }));
    }
}
