use std::future::Future;
use tickerglass_coingecko::markets::{Markets, MarketsParams};
use tickerglass_coingecko::CoingeckoClient;
use tickerglass_models::CoinRecord;

/// Source of the base market snapshot.
pub trait MarketSource {
    fn fetch_markets(&self) -> impl Future<Output = anyhow::Result<Vec<CoinRecord>>>;
}

pub struct CoingeckoSource {
    client: CoingeckoClient,
    page_size: u32,
}

impl CoingeckoSource {
    pub fn new(client: CoingeckoClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    fn params(&self) -> MarketsParams {
        MarketsParams {
            per_page: self.page_size,
            ..MarketsParams::default()
        }
    }
}

impl MarketSource for CoingeckoSource {
    async fn fetch_markets(&self) -> anyhow::Result<Vec<CoinRecord>> {
        let coins = self.client.call::<Markets>(self.params()).await?;
        Ok(coins.into_iter().map(CoinRecord::from).collect())
    }
}
