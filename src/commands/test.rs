//! Test command implementation: one-shot scrape with human-readable output.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::exporter::Exporter;
use crate::kibana::KibanaClient;

/// Performs a single scrape against the configured Kibana target and prints
/// the values the exporter would publish.
pub async fn command_test(config: &Config, verbose: bool) -> Result<()> {
    // The blocking HTTP client is built and used off the async runtime.
    let scrape_config = config.clone();
    let (url, snapshot, exporter) = tokio::task::spawn_blocking(move || -> Result<_> {
        let client = KibanaClient::new(&scrape_config).context("failed to build Kibana client")?;
        let url = client.status_url();
        let snapshot = client.scrape()?;
        let exporter = Exporter::new(client).context("failed to build exporter")?;
        Ok((url, snapshot, exporter))
    })
    .await
    .context("scrape task failed")??;

    println!("Scraped {}", url);

    if verbose {
        println!("\nDecoded snapshot:\n{:#?}", snapshot);
    }

    exporter.apply(&snapshot);

    println!("\nInstrument values:");
    for family in exporter.families() {
        let value = family.get_metric()[0].get_gauge().value();
        println!("{:40} {}", family.get_name(), value);
    }

    Ok(())
}
