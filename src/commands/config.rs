//! Config generation command implementation.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates a configuration file with default values.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat, commented: bool) -> Result<()> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("kibana-status-exporter.yaml"),
    };

    let mut content = render_config(&config, &format)
        .map_err(|e| anyhow::anyhow!("failed to render config: {}", e))?;
    if commented {
        if let ConfigFormat::Yaml = format {
            content = add_config_comments(content);
        }
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Kibana Status Exporter Configuration
# ====================================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 8080                   # HTTP port
# telemetry_path: "/metrics"   # Path under which to expose metrics
#
# Upstream Kibana Target
# ----------------------
# kibana_url: null             # Base URL of the Kibana instance (required)
# kibana_username: null        # Username for basic authentication
# kibana_password: null        # Password for basic authentication
# scrape_timeout_secs: 10      # Upstream request timeout in seconds
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
