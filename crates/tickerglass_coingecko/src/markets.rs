use bon::Builder;
use serde::{Deserialize, Serialize};
use tickerglass_models::CoinRecord;

use crate::method::Method;

#[derive(Serialize, Deserialize, Debug, Builder)]
#[builder(on(String, into))]
pub struct MarketsParams {
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub sparkline: bool,
    pub price_change_percentage: String,
}

impl Default for MarketsParams {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            order: "market_cap_desc".to_string(),
            per_page: 20,
            page: 1,
            sparkline: true,
            price_change_percentage: "1h,24h,7d".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sparkline {
    pub price: Vec<f64>,
}

impl From<CoinMarket> for CoinRecord {
    fn from(coin: CoinMarket) -> Self {
        let current_price = coin.current_price.unwrap_or(0.0);

        CoinRecord {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            image: coin.image.unwrap_or_default(),
            current_price,
            price_change_percentage_1h: coin.price_change_percentage_1h_in_currency.unwrap_or(0.0),
            price_change_percentage_24h: coin.price_change_percentage_24h.unwrap_or(0.0),
            price_change_percentage_7d: coin.price_change_percentage_7d_in_currency.unwrap_or(0.0),
            total_volume: coin.total_volume.unwrap_or(0.0),
            market_cap: coin.market_cap.unwrap_or(0.0),
            market_cap_rank: coin.market_cap_rank,
            circulating_supply: coin.circulating_supply.unwrap_or(0.0),
            max_supply: coin.max_supply,
            ath: coin.ath.unwrap_or(0.0),
            ath_change_percentage: coin.ath_change_percentage.unwrap_or(0.0),
            sparkline: coin.sparkline_in_7d.map(|s| s.price).unwrap_or_default(),
        }
    }
}

pub struct Markets;

impl Method for Markets {
    const PATH: &'static str = "/coins/markets";

    type Response = Vec<CoinMarket>;
    type Params = MarketsParams;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
      {
        "id": "bitcoin",
        "symbol": "btc",
        "name": "Bitcoin",
        "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
        "current_price": 67000.5,
        "market_cap": 1320000000000,
        "market_cap_rank": 1,
        "fully_diluted_valuation": 1400000000000,
        "total_volume": 25000000000,
        "high_24h": 68000,
        "low_24h": 66000,
        "price_change_percentage_24h": -1.25,
        "circulating_supply": 19700000,
        "total_supply": 21000000,
        "max_supply": 21000000,
        "ath": 73738,
        "ath_change_percentage": -9.1,
        "roi": null,
        "last_updated": "2024-05-01T10:00:00.000Z",
        "sparkline_in_7d": { "price": [65000.0, 66000.0, 67000.5] },
        "price_change_percentage_1h_in_currency": 0.3,
        "price_change_percentage_24h_in_currency": -1.25,
        "price_change_percentage_7d_in_currency": 2.5
      },
      {
        "id": "tether",
        "symbol": "usdt",
        "name": "Tether",
        "image": null,
        "current_price": 1.0,
        "market_cap": 110000000000,
        "market_cap_rank": 3,
        "total_volume": 50000000000,
        "price_change_percentage_24h": null,
        "circulating_supply": 110000000000,
        "total_supply": 110000000000,
        "max_supply": null,
        "ath": 1.32,
        "ath_change_percentage": -24.4
      }
    ]"#;

    #[test]
    fn decodes_markets_payload() {
        let coins: Vec<CoinMarket> = serde_json::from_str(SAMPLE).expect("decode");
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].sparkline_in_7d.as_ref().map(|s| s.price.len()), Some(3));
        assert!(coins[1].sparkline_in_7d.is_none());
    }

    #[test]
    fn converts_nulls_to_zero_and_keeps_optional_max_supply() {
        let coins: Vec<CoinMarket> = serde_json::from_str(SAMPLE).expect("decode");
        let records: Vec<CoinRecord> = coins.into_iter().map(CoinRecord::from).collect();

        let btc = &records[0];
        assert_eq!(btc.price_change_percentage_1h, 0.3);
        assert_eq!(btc.price_change_percentage_7d, 2.5);
        assert_eq!(btc.max_supply, Some(21_000_000.0));

        let usdt = &records[1];
        assert_eq!(usdt.price_change_percentage_24h, 0.0);
        assert_eq!(usdt.max_supply, None);
        assert!(usdt.image.is_empty());
        assert!(usdt.sparkline.is_empty());
    }

    #[test]
    fn default_params_request_top_twenty_with_sparklines() {
        let params = MarketsParams::default();
        assert_eq!(params.vs_currency, "usd");
        assert_eq!(params.order, "market_cap_desc");
        assert_eq!(params.per_page, 20);
        assert_eq!(params.page, 1);
        assert!(params.sparkline);
        assert_eq!(params.price_change_percentage, "1h,24h,7d");
    }

    #[test]
    fn builder_overrides_page_size() {
        let params = MarketsParams::builder()
            .vs_currency("usd")
            .order("market_cap_desc")
            .per_page(5)
            .page(1)
            .sparkline(true)
            .price_change_percentage("1h,24h,7d")
            .build();

        assert_eq!(params.per_page, 5);
    }
}
