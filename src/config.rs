//! Configuration management for the exporter.
//!
//! Configuration is resolved from three layers with the precedence
//! CLI > config file > built-in defaults. Config files may be YAML, JSON or
//! TOML, selected by file extension.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat};

/// Default configuration constants.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 10;

/// Effective exporter configuration. All fields are optional so that the
/// file layer can stay sparse; unset fields fall back to defaults at the
/// point of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub bind: Option<String>,
    pub port: Option<u16>,
    #[serde(alias = "telemetry-path")]
    pub telemetry_path: Option<String>,

    // Upstream Kibana target
    #[serde(alias = "kibana-url")]
    pub kibana_url: Option<String>,
    #[serde(alias = "kibana-username")]
    pub kibana_username: Option<String>,
    #[serde(alias = "kibana-password")]
    pub kibana_password: Option<String>,
    #[serde(alias = "scrape-timeout-secs")]
    pub scrape_timeout_secs: Option<u64>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            telemetry_path: Some(DEFAULT_TELEMETRY_PATH.to_string()),
            kibana_url: None,
            kibana_username: None,
            kibana_password: None,
            scrape_timeout_secs: Some(DEFAULT_SCRAPE_TIMEOUT_SECS),
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    pub fn effective_bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn effective_telemetry_path(&self) -> &str {
        self.telemetry_path
            .as_deref()
            .unwrap_or(DEFAULT_TELEMETRY_PATH)
    }

    pub fn effective_scrape_timeout_secs(&self) -> u64 {
        self.scrape_timeout_secs
            .unwrap_or(DEFAULT_SCRAPE_TIMEOUT_SECS)
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// Precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(port) = args.port {
        config.port = Some(port);
    }
    if let Some(path) = &args.telemetry_path {
        config.telemetry_path = Some(path.clone());
    }
    if let Some(url) = &args.kibana_url {
        config.kibana_url = Some(url.clone());
    }
    if let Some(user) = &args.kibana_username {
        config.kibana_username = Some(user.clone());
    }
    if let Some(pass) = &args.kibana_password {
        config.kibana_password = Some(pass.clone());
    }
    if let Some(timeout) = args.scrape_timeout {
        config.scrape_timeout_secs = Some(timeout);
    }

    Ok(config)
}

/// Validate effective config (used by --check-config and at startup).
///
/// A missing Kibana URL is the only fatal startup condition for the scrape
/// cycle itself; the remaining checks reject configurations the HTTP server
/// cannot serve.
pub fn validate_effective_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match config.kibana_url.as_deref() {
        None | Some("") => {
            return Err("kibana_url is not set; provide --kibana-url or set it in the config file"
                .into());
        }
        Some(_) => {}
    }

    let path = config.effective_telemetry_path();
    if !path.starts_with('/') {
        return Err(format!("telemetry_path '{}' must start with '/'", path).into());
    }
    if path == "/" {
        return Err("telemetry_path must not be '/', the root page is reserved".into());
    }

    if config.effective_scrape_timeout_secs() == 0 {
        return Err("scrape_timeout_secs must be at least 1".into());
    }

    Ok(())
}

/// Configuration loading with multiple format support.
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/kibana-status-exporter/config.yaml",
            "/etc/kibana-status-exporter/config.yml",
            "/etc/kibana-status-exporter/config.json",
            "./kibana-status-exporter.yaml",
            "./kibana-status-exporter.yml",
            "./kibana-status-exporter.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if path.to_string_lossy().is_empty() || !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders the config in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn defaults_are_complete_for_serving() {
        let config = Config::default();
        assert_eq!(config.effective_bind(), "0.0.0.0");
        assert_eq!(config.effective_port(), 8080);
        assert_eq!(config.effective_telemetry_path(), "/metrics");
        assert_eq!(config.effective_scrape_timeout_secs(), 10);
        assert!(config.kibana_url.is_none());
    }

    #[test]
    fn missing_kibana_url_is_rejected() {
        let config = Config::default();
        assert!(validate_effective_config(&config).is_err());

        let config = Config {
            kibana_url: Some(String::new()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());

        let config = Config {
            kibana_url: Some("http://kibana:5601".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_ok());
    }

    #[test]
    fn telemetry_path_must_be_absolute_and_not_root() {
        let mut config = Config {
            kibana_url: Some("http://kibana:5601".into()),
            ..Config::default()
        };

        config.telemetry_path = Some("metrics".into());
        assert!(validate_effective_config(&config).is_err());

        config.telemetry_path = Some("/".into());
        assert!(validate_effective_config(&config).is_err());

        config.telemetry_path = Some("/metrics".into());
        assert!(validate_effective_config(&config).is_ok());
    }

    #[test]
    fn cli_overrides_config_file_values() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "port: 9200\nkibana_url: http://from-file:5601").unwrap();

        let args = Args::parse_from([
            "kibana-status-exporter",
            "-c",
            file.path().to_str().unwrap(),
            "--kibana-url",
            "http://from-cli:5601",
        ]);
        let config = resolve_config(&args).unwrap();

        // File wins over default, CLI wins over file.
        assert_eq!(config.port, Some(9200));
        assert_eq!(config.kibana_url.as_deref(), Some("http://from-cli:5601"));
    }

    #[test]
    fn no_config_flag_skips_file_loading() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "port: 9200").unwrap();

        let args = Args::parse_from([
            "kibana-status-exporter",
            "-c",
            file.path().to_str().unwrap(),
            "--no-config",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.port, Some(DEFAULT_PORT));
    }

    #[test]
    fn loads_toml_and_json_by_extension() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "kibana_url = \"http://toml:5601\"").unwrap();
        let config = load_config(toml_file.path().to_str()).unwrap();
        assert_eq!(config.kibana_url.as_deref(), Some("http://toml:5601"));

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json_file, "{{\"kibana_url\": \"http://json:5601\"}}").unwrap();
        let config = load_config(json_file.path().to_str()).unwrap();
        assert_eq!(config.kibana_url.as_deref(), Some("http://json:5601"));
    }

    #[test]
    fn kebab_case_aliases_are_accepted() {
        let config: Config =
            serde_yaml::from_str("kibana-url: http://kibana:5601\ntelemetry-path: /prom\n")
                .unwrap();
        assert_eq!(config.kibana_url.as_deref(), Some("http://kibana:5601"));
        assert_eq!(config.telemetry_path.as_deref(), Some("/prom"));
    }

    #[test]
    fn render_round_trips_through_yaml() {
        let config = Config {
            kibana_url: Some("http://kibana:5601".into()),
            ..Config::default()
        };
        let rendered = render_config(&config, &ConfigFormat::Yaml).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.kibana_url, config.kibana_url);
        assert_eq!(parsed.port, config.port);
    }
}
