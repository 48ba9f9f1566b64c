//! The event loop: refresh cadence, simulation cadence, debounced search and
//! user input, all on one task.

use rand::Rng;
use std::future::{pending, Future};
use std::pin::Pin;
use tickerglass_engine::schedule::Debouncer;
use tickerglass_models::CoinRecord;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data_fetcher::MarketSource;
use crate::events::Event;
use crate::render::RenderTarget;

type PendingFetch<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Vec<CoinRecord>>> + 'a>>;

/// Runs until a shutdown event arrives or every sender is gone.
///
/// A refresh is polled next to the other branches rather than awaited inline,
/// so a slow API never holds up ticks or input. While one is outstanding,
/// further refresh ticks are skipped.
pub async fn run<S, T, R>(
    source: &S,
    dashboard: &mut Dashboard<T, R>,
    mut rx: mpsc::Receiver<Event>,
    config: &DashboardConfig,
) where
    S: MarketSource,
    T: RenderTarget,
    R: Rng,
{
    let mut refresh = time::interval(config.refresh_interval);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight: Option<PendingFetch<'_>> = None;
    let mut simulation: Option<Interval> = None;
    let mut search = Debouncer::new(config.search_debounce);

    info!(
        "Refreshing every {:?}, simulating every {:?}",
        config.refresh_interval, config.simulation_interval
    );

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                if in_flight.is_some() {
                    debug!("Previous refresh still in flight, skipping");
                } else {
                    let fetch: PendingFetch<'_> = Box::pin(source.fetch_markets());
                    in_flight = Some(fetch);
                }
            }
            result = fetch_finished(&mut in_flight) => {
                in_flight = None;
                dashboard.apply_refresh(result, Instant::now());
                if simulation.is_none() && dashboard.simulation_started() {
                    simulation = Some(simulation_interval(config.simulation_interval));
                }
            }
            _ = next_tick(&mut simulation) => dashboard.tick(Instant::now()),
            _ = debounce_elapsed(search.deadline()) => {
                if let Some(query) = search.take_ready(Instant::now()) {
                    dashboard.apply_search(query, Instant::now());
                }
            }
            event = rx.recv() => match event {
                Some(Event::Search(text)) => search.push(text, Instant::now()),
                Some(Event::Scroll(rows)) => dashboard.on_scroll(rows, Instant::now()),
                Some(Event::Shutdown) | None => {
                    info!("Shutting down");
                    break;
                }
            },
        }
    }
}

fn simulation_interval(period: Duration) -> Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Pends forever while nothing is being fetched.
async fn fetch_finished(
    fetch: &mut Option<PendingFetch<'_>>,
) -> anyhow::Result<Vec<CoinRecord>> {
    match fetch {
        Some(fetch) => fetch.as_mut().await,
        None => pending().await,
    }
}

/// Pends forever until the simulation has been started.
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{market, RecordingTarget};
    use crate::render::TableBody;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use tickerglass_engine::schedule::RenderGate;
    use tickerglass_engine::simulation::Simulator;

    enum Reply {
        Ready(anyhow::Result<Vec<CoinRecord>>),
        Hang,
    }

    struct ScriptedSource {
        replies: RefCell<VecDeque<Reply>>,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl MarketSource for ScriptedSource {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<CoinRecord>> {
            self.calls.set(self.calls.get() + 1);
            let reply = self.replies.borrow_mut().pop_front();
            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Hang) => pending().await,
                None => Err(anyhow::anyhow!("no more replies")),
            }
        }
    }

    fn dashboard() -> Dashboard<RecordingTarget, StdRng> {
        Dashboard::new(
            RecordingTarget::default(),
            Simulator::new(StdRng::seed_from_u64(7)),
            RenderGate::default(),
        )
    }

    /// Sends each event once its offset from now has passed.
    fn send_at(events: Vec<(u64, Event)>) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(16);
        let start = Instant::now();
        tokio::spawn(async move {
            for (at_ms, event) in events {
                time::sleep_until(start + Duration::from_millis(at_ms)).await;
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        });
        rx
    }

    fn offline() -> Reply {
        Reply::Ready(Err(anyhow::anyhow!("offline")))
    }

    #[tokio::test(start_paused = true)]
    async fn failed_first_refresh_keeps_simulation_off() {
        let source = ScriptedSource::new(vec![offline()]);
        let mut dashboard = dashboard();
        let rx = send_at(vec![(30_000, Event::Shutdown)]);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        assert!(!dashboard.simulation_started());
        assert_eq!(dashboard.state().ticks, 0);
        assert_eq!(dashboard.target().body, Some(TableBody::load_error()));
    }

    #[tokio::test(start_paused = true)]
    async fn simulation_starts_with_the_first_successful_refresh() {
        let source = ScriptedSource::new(vec![offline(), Reply::Ready(Ok(market()))]);
        let mut dashboard = dashboard();
        let rx = send_at(vec![(65_000, Event::Shutdown)]);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        assert!(dashboard.simulation_started());
        assert_eq!(source.calls.get(), 2);
        // Ticks at 60s, 62s and 64s.
        assert_eq!(dashboard.state().ticks, 3);
        assert_eq!(dashboard.state().records.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_quiet_period() {
        let source = ScriptedSource::new(vec![Reply::Ready(Ok(market()))]);
        let mut dashboard = dashboard();
        let rx = send_at(vec![
            (1_000, Event::Search("b".to_string())),
            (1_100, Event::Search("bitc".to_string())),
            (1_200, Event::Search("eth".to_string())),
            (1_400, Event::Shutdown),
        ]);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        assert_eq!(dashboard.state().search_text, "");
        assert_eq!(dashboard.state().filtered.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_search_in_a_burst_is_applied() {
        let source = ScriptedSource::new(vec![Reply::Ready(Ok(market()))]);
        let mut dashboard = dashboard();
        let rx = send_at(vec![
            (1_000, Event::Search("b".to_string())),
            (1_100, Event::Search("bitc".to_string())),
            (1_200, Event::Search("eth".to_string())),
            (1_600, Event::Shutdown),
        ]);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        assert_eq!(dashboard.state().search_text, "eth");
        assert_eq!(dashboard.state().filtered.len(), 1);
        // Refresh, the first tick, then one search redraw.
        assert_eq!(dashboard.target().replacements, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_refresh_does_not_stall_ticks_or_input() {
        let source = ScriptedSource::new(vec![Reply::Ready(Ok(market())), Reply::Hang]);
        let mut dashboard = dashboard();
        let rx = send_at(vec![
            (62_000, Event::Search("eth".to_string())),
            (63_000, Event::Scroll(1)),
            (71_000, Event::Shutdown),
        ]);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        // Second refresh started at 60s and never came back.
        assert_eq!(source.calls.get(), 2);
        // One tick every 2s from 0s through 70s.
        assert_eq!(dashboard.state().ticks, 36);
        assert_eq!(dashboard.state().search_text, "eth");
        assert_eq!(dashboard.state().filtered.len(), 1);
        assert_eq!(dashboard.target().offset, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_ends_the_loop() {
        let source = ScriptedSource::new(vec![Reply::Ready(Ok(market()))]);
        let mut dashboard = dashboard();
        let (tx, rx) = mpsc::channel(1);
        drop(tx);

        run(&source, &mut dashboard, rx, &DashboardConfig::default()).await;

        assert!(source.calls.get() <= 1);
    }
}
