use axum::{routing::get, Router};
use clap::Parser;
use prometheus::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, Level};

use kibana_status_exporter::cli::{Args, Commands, LogLevel};
use kibana_status_exporter::commands::{command_config, command_test};
use kibana_status_exporter::config::{render_config, resolve_config, validate_effective_config};
use kibana_status_exporter::handlers::{health_handler, home_handler, metrics_handler};
use kibana_status_exporter::state::AppState;
use kibana_status_exporter::{Exporter, KibanaClient};

/// Initializes tracing logging subsystem with configured log level
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR, // Off not fully supported, use ERROR as minimal
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("Configuration is valid");
            return Ok(());
        }

        println!("{}", render_config(&config, &args.config_format)?);
        return Ok(());
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => {
                command_config(output.clone(), format.clone(), *commented)?;
                Ok(())
            }
            Commands::Test { verbose } => {
                let config = resolve_config(&args)?;
                if let Err(e) = validate_effective_config(&config) {
                    eprintln!("Configuration invalid: {}", e);
                    std::process::exit(1);
                }
                command_test(&config, *verbose).await?;
                Ok(())
            }
        };
    }

    // Load configuration for server mode
    let config = resolve_config(&args)?;

    // A missing Kibana URL is fatal before serving begins.
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&args);

    info!("Starting kibana-status-exporter");
    info!(
        "using Kibana URL: {}",
        config.kibana_url.as_deref().unwrap_or_default()
    );

    // Initialize Prometheus metrics registry and register the collector.
    // Collection is purely request-driven: each gather performs one scrape.
    let registry = Registry::new();
    debug!("Prometheus registry initialized");

    // The blocking HTTP client must be constructed off the async workers.
    let client_config = config.clone();
    let client = tokio::task::spawn_blocking(move || KibanaClient::new(&client_config)).await??;
    let exporter = Exporter::new(client)?;
    registry.register(Box::new(exporter))?;
    debug!("Kibana status collector registered");

    // Create shared application state
    let state = Arc::new(AppState {
        registry,
        config: Arc::new(config.clone()),
    });

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    // Configure HTTP server routes and start listening
    let addr: SocketAddr = format!("{}:{}", config.effective_bind(), config.effective_port())
        .parse()?;
    let telemetry_path = config.effective_telemetry_path().to_string();

    let app = Router::new()
        .route("/", get(home_handler))
        .route(&telemetry_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!(
        "kibana-status-exporter listening on http://{}, metrics at {}",
        addr, telemetry_path
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("kibana-status-exporter stopped gracefully");
    Ok(())
}
