use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickerglass_models::{CoinRecord, GlobalSnapshot, PreviousPriceIndex};

/// Relative price move per tick, drawn from `±PRICE_DRIFT`.
pub const PRICE_DRIFT: f64 = 0.02;
/// Absolute step added to each percentage-change field per tick.
pub const CHANGE_DRIFT: f64 = 1.0;
/// Relative volume move per tick.
pub const VOLUME_DRIFT: f64 = 0.05;

/// Random-walk simulation that makes prices move between network refreshes.
///
/// Percentage-change fields accumulate their steps without clamping, so they
/// can wander outside realistic bounds on a long-running session.
pub struct Simulator<R: Rng> {
    rng: R,
}

impl Simulator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Simulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Perturbs every record in place, remembers pre-tick prices in `previous`
    /// and recomputes `snapshot` from scratch. An empty list is left alone.
    pub fn tick(
        &mut self,
        records: &mut [CoinRecord],
        previous: &mut PreviousPriceIndex,
        snapshot: &mut GlobalSnapshot,
    ) {
        if records.is_empty() {
            return;
        }

        for coin in records.iter_mut() {
            previous.insert(coin.id.clone(), coin.current_price);
            self.perturb(coin);
        }

        *snapshot = GlobalSnapshot::from_records(records);
    }

    fn perturb(&mut self, coin: &mut CoinRecord) {
        coin.current_price *= 1.0 + self.uniform(PRICE_DRIFT);
        coin.price_change_percentage_1h += self.uniform(CHANGE_DRIFT);
        coin.price_change_percentage_24h += self.uniform(CHANGE_DRIFT);
        coin.price_change_percentage_7d += self.uniform(CHANGE_DRIFT);
        coin.total_volume *= 1.0 + self.uniform(VOLUME_DRIFT);
        coin.recompute_market_cap();
        coin.push_sparkline_sample(coin.current_price);
    }

    fn uniform(&mut self, bound: f64) -> f64 {
        self.rng.gen_range(-bound..bound)
    }
}
