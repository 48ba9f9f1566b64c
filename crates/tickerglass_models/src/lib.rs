use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One market entry as held in memory by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub current_price: f64,
    pub price_change_percentage_1h: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: f64,
    pub total_volume: f64,
    pub market_cap: f64,
    pub market_cap_rank: Option<u32>,
    pub circulating_supply: f64,
    pub max_supply: Option<f64>,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub sparkline: Vec<f64>,
}

impl CoinRecord {
    /// Market cap is always derived from price and circulating supply.
    pub fn recompute_market_cap(&mut self) {
        self.market_cap = self.current_price * self.circulating_supply;
    }

    /// Slides the sparkline window by one sample. Empty sparklines stay empty.
    pub fn push_sparkline_sample(&mut self, price: f64) {
        if self.sparkline.is_empty() {
            return;
        }
        self.sparkline.remove(0);
        self.sparkline.push(price);
    }

    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    pub fn chart_element_id(&self) -> String {
        format!("chart-{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSnapshot {
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub dominance: f64,
}

impl GlobalSnapshot {
    /// Full recomputation over `records`; the first record is the dominance leader.
    pub fn from_records(records: &[CoinRecord]) -> Self {
        let total_market_cap: f64 = records.iter().map(|r| r.market_cap).sum();
        let total_volume: f64 = records.iter().map(|r| r.total_volume).sum();

        let dominance = match records.first() {
            Some(leader) if total_market_cap > 0.0 => leader.market_cap / total_market_cap * 100.0,
            _ => 0.0,
        };

        Self {
            total_market_cap,
            total_volume,
            dominance,
        }
    }
}

/// Coin id to the price it had before the latest tick.
pub type PreviousPriceIndex = HashMap<String, f64>;
