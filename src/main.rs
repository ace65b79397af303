//! Vinted-RS: runs one catalog search and prints the items as JSON

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vinted_rs::{config, TranslateOptions, VintedClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(url) = std::env::args().nth(1) else {
        print_usage();
        return Ok(());
    };

    info!("Starting Vinted-RS v{}", vinted_rs::VERSION);

    let settings = config::load()?;
    let client = VintedClient::new(&settings)?;

    let items = client.search(&url, &TranslateOptions::new()).await?;
    info!("Found {} items", items.len());

    println!("{}", serde_json::to_string_pretty(&items)?);

    Ok(())
}

/// Print usage information
fn print_usage() {
    eprintln!(
        r#"
Vinted-RS v{}
Session-managed client for the Vinted catalog search API

USAGE:
    vinted-rs <CATALOG_URL>

ENVIRONMENT VARIABLES:
    VINTED_SETTINGS_PATH      Path to settings.yml
    VINTED_API_HTTPS_PROXY    HTTPS proxy for every request
    VINTED_API_<DOMAIN>_COOKIE
                              Pre-provisioned session token (e.g. VINTED_API_FR_COOKIE)
    RUST_LOG                  Log filter (default: info)
"#,
        vinted_rs::VERSION
    );
}
