use rand::rngs::StdRng;
use rand::Rng;
use tickerglass_engine::filter::filter_records;
use tickerglass_engine::schedule::RenderGate;
use tickerglass_engine::simulation::Simulator;
use tickerglass_models::{CoinRecord, GlobalSnapshot, PreviousPriceIndex};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::render::{render_records, RenderTarget, TableBody};

#[derive(Debug, Default)]
pub struct AppState {
    pub records: Vec<CoinRecord>,
    pub filtered: Vec<CoinRecord>,
    pub previous_prices: PreviousPriceIndex,
    pub snapshot: GlobalSnapshot,
    pub search_text: String,
    pub ticks: u64,
}

/// Owns the market state and decides when it reaches the render target.
/// Fetching happens elsewhere; results come in through `apply_refresh`.
pub struct Dashboard<T, R: Rng = StdRng> {
    target: T,
    simulator: Simulator<R>,
    gate: RenderGate,
    state: AppState,
    simulation_started: bool,
}

impl<T: RenderTarget, R: Rng> Dashboard<T, R> {
    pub fn new(target: T, simulator: Simulator<R>, gate: RenderGate) -> Self {
        Self {
            target,
            simulator,
            gate,
            state: AppState::default(),
            simulation_started: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Set by the first successful refresh and never cleared.
    pub fn simulation_started(&self) -> bool {
        self.simulation_started
    }

    /// Replaces the base snapshot. On failure the current records stay and
    /// the table shows the load error.
    pub fn apply_refresh(&mut self, result: anyhow::Result<Vec<CoinRecord>>, now: Instant) {
        let records = match result {
            Ok(records) => records,
            Err(e) => {
                error!("Error fetching crypto data: {:#}", e);
                self.target.replace_rows(TableBody::load_error());
                self.target.present();
                return;
            }
        };

        info!("Loaded {} coins", records.len());
        self.state.snapshot = GlobalSnapshot::from_records(&records);
        self.state.filtered = records.clone();
        self.state.records = records;
        self.state.previous_prices.clear();
        self.redraw(now);

        if !self.simulation_started {
            self.simulation_started = true;
            info!("Starting price simulation");
        }
    }

    /// One simulation step. Always advances the data; redraws only when the
    /// gate allows it.
    pub fn tick(&mut self, now: Instant) {
        self.simulator.tick(
            &mut self.state.records,
            &mut self.state.previous_prices,
            &mut self.state.snapshot,
        );
        self.state.ticks += 1;
        debug!("Tick {}", self.state.ticks);
        self.state.filtered = filter_records(&self.state.records, &self.state.search_text);

        if self.gate.may_render(now) {
            self.redraw(now);
        } else {
            debug!("Render skipped");
        }
    }

    pub fn apply_search(&mut self, query: String, now: Instant) {
        debug!("Searching for {:?}", query);
        self.state.search_text = query;
        self.state.filtered = filter_records(&self.state.records, &self.state.search_text);
        self.redraw(now);
    }

    pub fn on_scroll(&mut self, rows: isize, now: Instant) {
        self.gate.record_scroll(now);

        let offset = self.target.scroll_offset().saturating_add_signed(rows);
        self.target.set_scroll_offset(offset);
        self.target.present();
    }

    fn redraw(&mut self, now: Instant) {
        if self.gate.is_scrolling(now) {
            return;
        }

        let offset = self.target.scroll_offset();
        render_records(
            &mut self.target,
            &self.state.filtered,
            &self.state.previous_prices,
            &self.state.snapshot,
        );
        self.target.set_scroll_offset(offset);
        self.target.present();
    }
}
