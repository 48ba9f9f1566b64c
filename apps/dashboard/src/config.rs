use anyhow::ensure;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tickerglass_coingecko::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use tickerglass_engine::schedule;

pub const PAGE_SIZE: u32 = 20;
pub const VIEWPORT_ROWS: usize = 12;
/// CoinGecko refuses pages larger than this.
const MAX_PAGE_SIZE: u32 = 250;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CoinGecko API base URL (falls back to $COINGECKO_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Number of top coins to load
    #[arg(long, default_value_t = PAGE_SIZE)]
    pub page_size: u32,

    /// Price simulation cadence in milliseconds
    #[arg(long, default_value_t = schedule::SIMULATION_INTERVAL.as_millis() as u64)]
    pub simulation_ms: u64,

    /// Minimum time between redraws in milliseconds
    #[arg(long, default_value_t = schedule::RENDER_INTERVAL.as_millis() as u64)]
    pub render_ms: u64,

    /// Redraws are held back this long after a scroll
    #[arg(long, default_value_t = schedule::SCROLL_IDLE.as_millis() as u64)]
    pub scroll_idle_ms: u64,

    /// Quiet period after search input before filtering
    #[arg(long, default_value_t = schedule::SEARCH_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Network refresh cadence in milliseconds
    #[arg(long, default_value_t = schedule::REFRESH_INTERVAL.as_millis() as u64)]
    pub refresh_ms: u64,

    /// Give up on a market request after this many milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub request_timeout_ms: u64,

    /// Table rows visible at once
    #[arg(long, default_value_t = VIEWPORT_ROWS)]
    pub viewport_rows: usize,

    /// Fetch and draw a single snapshot, then exit
    #[arg(long)]
    pub once: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Where logs go while the table owns the terminal
    #[arg(long, default_value = "tickerglass.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub simulation_interval: Duration,
    pub render_interval: Duration,
    pub scroll_idle: Duration,
    pub search_debounce: Duration,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub viewport_rows: usize,
    pub once: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            page_size: PAGE_SIZE,
            simulation_interval: schedule::SIMULATION_INTERVAL,
            render_interval: schedule::RENDER_INTERVAL,
            scroll_idle: schedule::SCROLL_IDLE,
            search_debounce: schedule::SEARCH_DEBOUNCE,
            refresh_interval: schedule::REFRESH_INTERVAL,
            request_timeout: DEFAULT_TIMEOUT,
            viewport_rows: VIEWPORT_ROWS,
            once: false,
        }
    }
}

impl DashboardConfig {
    /// Merges CLI flags with `COINGECKO_API_URL` and `COINGECKO_API_KEY`.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&args.page_size),
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
            args.page_size
        );
        ensure!(args.simulation_ms > 0, "simulation interval must be positive");
        ensure!(args.refresh_ms > 0, "refresh interval must be positive");
        ensure!(args.request_timeout_ms > 0, "request timeout must be positive");

        let api_url = args
            .api_url
            .clone()
            .or_else(|| env::var("COINGECKO_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_url,
            api_key: env::var("COINGECKO_API_KEY").ok().filter(|key| !key.is_empty()),
            page_size: args.page_size,
            simulation_interval: Duration::from_millis(args.simulation_ms),
            render_interval: Duration::from_millis(args.render_ms),
            scroll_idle: Duration::from_millis(args.scroll_idle_ms),
            search_debounce: Duration::from_millis(args.debounce_ms),
            refresh_interval: Duration::from_millis(args.refresh_ms),
            request_timeout: Duration::from_millis(args.request_timeout_ms),
            viewport_rows: args.viewport_rows,
            once: args.once,
        })
    }
}
