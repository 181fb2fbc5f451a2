use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use country_sync::{
    api::{self, AppState},
    config::AppConfig,
    db::migrate,
    providers::build_providers,
    refresh::RefreshPipeline,
    report::ReportCache,
    store::CountryStore,
};

const DEFAULT_LOG_FILTER: &str = "country_sync=info,tower_http=info";

#[derive(Parser)]
#[command(version, about = "Country Sync CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Serve the HTTP API.
    Serve {
        /// Overrides BIND_ADDR.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Run one refresh and print the summary.
    Refresh,
    /// Apply pending migrations.
    Migrate,
    /// Print row count and last refresh time.
    Status,
}

fn pipeline(config: &AppConfig, store: CountryStore) -> Result<RefreshPipeline> {
    let providers = build_providers(config).context("building source clients")?;
    Ok(RefreshPipeline::new(
        providers.countries,
        providers.rates,
        store,
        ReportCache::new(&config.cache_dir),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.cmd {
        Cmd::Serve { bind } => {
            let store = CountryStore::open(config.database_url.clone())?;
            let state = AppState::new(pipeline(&config, store)?);
            let addr = bind.unwrap_or(config.bind_addr);

            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(%addr, "listening");
            axum::serve(listener, api::router(state)).await?;
        }
        Cmd::Refresh => {
            let store = CountryStore::open(config.database_url.clone())?;
            let summary = pipeline(&config, store)?.refresh().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Cmd::Migrate => {
            let url = config.database_url.clone();
            let applied = tokio::task::spawn_blocking(move || migrate::run_all(&url)).await??;
            println!("applied {applied} migration(s)");
        }
        Cmd::Status => {
            let store = CountryStore::open(config.database_url.clone())?;
            let status = tokio::task::spawn_blocking(move || store.count_and_last_refresh()).await??;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
