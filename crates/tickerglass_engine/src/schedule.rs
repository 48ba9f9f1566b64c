//! Render gating and search debouncing.
//!
//! Simulation keeps advancing the data every tick; the gate only decides
//! whether a tick is also allowed to redraw.

use tokio::time::{Duration, Instant};

pub const SIMULATION_INTERVAL: Duration = Duration::from_millis(2000);
pub const RENDER_INTERVAL: Duration = Duration::from_millis(2000);
pub const SCROLL_IDLE: Duration = Duration::from_millis(500);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(60_000);

#[derive(Debug, Clone)]
pub struct RenderGate {
    render_interval: Duration,
    scroll_idle: Duration,
    last_render: Option<Instant>,
    last_scroll: Option<Instant>,
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new(RENDER_INTERVAL, SCROLL_IDLE)
    }
}

impl RenderGate {
    pub fn new(render_interval: Duration, scroll_idle: Duration) -> Self {
        Self {
            render_interval,
            scroll_idle,
            last_render: None,
            last_scroll: None,
        }
    }

    pub fn record_scroll(&mut self, now: Instant) {
        self.last_scroll = Some(now);
    }

    pub fn is_scrolling(&self, now: Instant) -> bool {
        self.last_scroll
            .is_some_and(|at| now.saturating_duration_since(at) < self.scroll_idle)
    }

    /// True at most once per render interval; claims the slot when it answers yes.
    pub fn due_for_render(&mut self, now: Instant) -> bool {
        let due = match self.last_render {
            Some(at) => now.saturating_duration_since(at) >= self.render_interval,
            None => true,
        };

        if due {
            self.last_render = Some(now);
        }
        due
    }

    /// Scroll check first: a tick suppressed by scrolling must not use up the
    /// render slot.
    pub fn may_render(&mut self, now: Instant) -> bool {
        !self.is_scrolling(now) && self.due_for_render(now)
    }
}

/// Keeps only the most recent value and releases it once `window` has passed
/// without another push.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}
