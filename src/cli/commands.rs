//! CLI command implementations
//!
//! Startup sequence for `serve`:
//! 1. Configuration load (file, then flag overrides, then validation)
//! 2. Connect to the backing service
//! 3. Ensure the app exists, creating it if missing
//! 4. Bind the listener and serve

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::http_server::{GatewayConfig, GatewayServer};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{self, App};

use super::args::{Command, ConfigArgs};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Load a config file
pub fn load_config_file(path: &Path) -> CliResult<GatewayConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
}

/// Build the effective configuration: file values (or defaults), then flags
pub fn load_config(args: &ConfigArgs) -> CliResult<GatewayConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(addr) = &args.addr {
        config.set_addr(addr).map_err(CliError::config_error)?;
    }
    if let Some(service) = &args.service {
        config.service = service.clone();
    }
    if let Some(app) = &args.app {
        config.app = app.clone();
    }

    config.validate().map_err(CliError::config_error)?;

    Ok(config)
}

/// Connect to the configured app, creating it when it does not exist yet.
///
/// Exists-then-create is two round-trips; another process creating the
/// same app in between makes the create fail and startup abort.
pub fn connect_app(config: &GatewayConfig) -> CliResult<Arc<dyn App>> {
    let service = store::connect(&config.service).map_err(|e| {
        CliError::boot_failed(format!("Failed to connect to service '{}': {}", config.service, e))
    })?;

    let app = service.app(&config.app);
    let exists = app
        .exists()
        .map_err(|e| CliError::store_failure("app.Exists()", e))?;

    if exists {
        log_event_with_fields(Event::AppConnected, &[("app", app.name())]);
    } else {
        app.create()
            .map_err(|e| CliError::store_failure("app.Create()", e))?;
        log_event_with_fields(Event::AppCreated, &[("app", app.name())]);
    }

    Ok(app)
}

/// Connect and serve until the listener fails
pub fn serve(args: &ConfigArgs) -> CliResult<()> {
    log_event(Event::BootStart);

    let result = boot_and_serve(args);
    if let Err(e) = &result {
        log_event_with_fields(
            Event::BootFailed,
            &[("code", e.code_str()), ("message", e.message())],
        );
    }
    result
}

fn boot_and_serve(args: &ConfigArgs) -> CliResult<()> {
    let config = load_config(args)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("addr", config.socket_addr().as_str()),
            ("app", config.app.as_str()),
            ("service", config.service.as_str()),
        ],
    );

    let app = connect_app(&config)?;
    let server = GatewayServer::new(config, app);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Print the effective configuration as JSON
pub fn check_config(args: &ConfigArgs) -> CliResult<()> {
    let config = load_config(args)?;

    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &config)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(&ConfigArgs::default()).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 7000, "app": "from_file", "service": "memory"}}"#).unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            addr: None,
            service: None,
            app: Some("from_flag".to_string()),
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.app, "from_flag");
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = load_config(&args).unwrap_err();
        assert_eq!(err.code_str(), "ROWGATE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_config_file() {
        let args = ConfigArgs {
            config: Some("/nonexistent/rowgate.json".into()),
            ..Default::default()
        };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_bad_addr_flag() {
        let args = ConfigArgs {
            addr: Some("8080".to_string()),
            ..Default::default()
        };
        let err = load_config(&args).unwrap_err();
        assert_eq!(err.code_str(), "ROWGATE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_connect_creates_missing_app() {
        let config = GatewayConfig::default();
        let app = connect_app(&config).unwrap();
        assert!(app.exists().unwrap());
        assert_eq!(app.name(), "rowgate");
    }

    #[test]
    fn test_connect_unknown_service_fails() {
        let mut config = GatewayConfig::default();
        config.service = "/ns/remote".to_string();
        let err = connect_app(&config).err().unwrap();
        assert_eq!(err.code_str(), "ROWGATE_CLI_BOOT_FAILED");
    }
}
