pub mod markets;
pub mod method;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum CoingeckoError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API key header: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, CoingeckoError>;

pub struct CoingeckoClient {
    base_url: String,
    reqwest: Client,
}

impl CoingeckoClient {
    /// Builds a client against `base_url`. A demo API key, when present, is
    /// sent on every request. `timeout` bounds each request from connect to
    /// the end of the body.
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            headers.insert("x-cg-demo-api-key", HeaderValue::from_str(key)?);
        }

        let reqwest = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            reqwest,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &P,
    ) -> Result<T> {
        let body = self
            .reqwest
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> Result<M::Response> {
        self.get(M::PATH, &params).await
    }
}
