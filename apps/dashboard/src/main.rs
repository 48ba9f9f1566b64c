mod app;
mod config;
mod dashboard;
mod data_fetcher;
mod events;
mod print;
mod render;
mod terminal;
mod view;

use anyhow::Context;
use clap::Parser;
use config::{Args, DashboardConfig};
use dashboard::Dashboard;
use data_fetcher::{CoingeckoSource, MarketSource};
use dotenv::dotenv;
use print::PrintTarget;
use std::fs::File;
use std::sync::Mutex;
use terminal::TerminalTarget;
use tickerglass_coingecko::CoingeckoClient;
use tickerglass_engine::schedule::RenderGate;
use tickerglass_engine::simulation::Simulator;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    // The table owns the terminal, so interactive runs log to a file.
    let writer = if args.once {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        let file = File::create(&args.log_file)
            .with_context(|| format!("Failed to open log file {}", args.log_file.display()))?;
        BoxMakeWriter::new(Mutex::new(file))
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(writer)
        .with_ansi(args.once)
        .init();

    let config = DashboardConfig::from_args(&args)?;
    let client = CoingeckoClient::new(
        &config.api_url,
        config.api_key.as_deref(),
        config.request_timeout,
    )
    .context("Failed to build CoinGecko client")?;
    let source = CoingeckoSource::new(client, config.page_size);
    let simulator = Simulator::from_entropy();
    let gate = RenderGate::new(config.render_interval, config.scroll_idle);

    if config.once {
        let mut dashboard = Dashboard::new(
            PrintTarget::new(config.page_size as usize),
            simulator,
            gate,
        );
        dashboard.apply_refresh(source.fetch_markets().await, Instant::now());
        info!("Drew {} coins", dashboard.state().filtered.len());
        return Ok(());
    }

    let terminal = terminal::setup().context("Failed to set up terminal")?;
    let mut dashboard = Dashboard::new(
        TerminalTarget::new(terminal, config.viewport_rows),
        simulator,
        gate,
    );

    let (tx, rx) = mpsc::channel(100);
    events::spawn_input(tx.clone());
    events::spawn_shutdown_signal(tx);

    app::run(&source, &mut dashboard, rx, &config).await;

    terminal::restore().context("Failed to restore terminal")?;
    Ok(())
}
