//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::ClientConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix the service gives downloaded results
const DOWNLOAD_PREFIX: &str = "removed_bg_";

/// Convert CLI arguments to a `ClientConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `ClientConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder().server_url(cli.server.clone());
        if cli.timeout > 0 {
            builder = builder.request_timeout(Duration::from_secs(cli.timeout));
        }
        builder.build().context("Invalid configuration")
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if !cli.interactive && cli.input.is_none() {
            anyhow::bail!("An input image is required unless --interactive is given");
        }

        if let Some(output) = &cli.output {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.is_dir() {
                    anyhow::bail!("Output directory does not exist: {}", parent.display());
                }
            }
        }

        Ok(())
    }
}

/// Where to save a downloaded result
///
/// No path or a directory yields `removed_bg_<output_filename>` inside it.
pub(crate) fn resolve_output_path(requested: Option<&Path>, output_filename: &str) -> PathBuf {
    let default_name = format!("{}{}", DOWNLOAD_PREFIX, output_filename);
    match requested {
        Some(path) if path.is_dir() => path.join(default_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing_config::TracingFormat;
    use tempfile::TempDir;

    fn create_test_cli() -> Cli {
        Cli {
            input: Some(PathBuf::from("test.jpg")),
            output: None,
            interactive: false,
            server: "http://127.0.0.1:5000".to_string(),
            timeout: 0,
            verbose: 0,
            log_format: TracingFormat::Console,
        }
    }

    #[test]
    fn test_cli_config_conversion() {
        let mut cli = create_test_cli();
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert!(config.request_timeout.is_none());

        cli.timeout = 45;
        cli.server = "https://bg.example.com".to_string();
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.server_url, "https://bg.example.com");

        cli.server = "ftp://bg.example.com".to_string();
        assert!(CliConfigBuilder::from_cli(&cli).is_err());
    }

    #[test]
    fn test_log_format_flag() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["bgremove-client", "photo.png"]).unwrap();
        assert_eq!(cli.log_format, TracingFormat::Console);

        let cli =
            Cli::try_parse_from(["bgremove-client", "photo.png", "--log-format", "compact"]).unwrap();
        assert_eq!(cli.log_format, TracingFormat::Compact);

        assert!(Cli::try_parse_from(["bgremove-client", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_validation() {
        let mut cli = create_test_cli();
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());

        cli.input = None;
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.interactive = true;
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());

        cli.output = Some(PathBuf::from("/definitely/not/here/out.png"));
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.output = Some(PathBuf::from("out.png"));
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path(None, "abc_out.png"),
            PathBuf::from("removed_bg_abc_out.png")
        );
        assert_eq!(
            resolve_output_path(Some(Path::new("result.png")), "abc_out.png"),
            PathBuf::from("result.png")
        );

        let dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_output_path(Some(dir.path()), "abc_out.png"),
            dir.path().join("removed_bg_abc_out.png")
        );
    }
}
