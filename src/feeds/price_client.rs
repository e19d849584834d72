use reqwest::{Client, Url};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::ApiMarkPrice;

pub const DEFAULT_PRICE_URL: &str = "https://fapi.binance.com/fapi/v1/premiumIndex";

/// Quote asset appended to every tracked symbol.
const QUOTE_ASSET: &str = "USDT";

#[derive(Debug, Error)]
pub enum PriceClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Mark price lookups against a futures premium-index endpoint.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: Client,
    base_url: String,
}

impl PriceClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn price_url(&self, asset: &str) -> Result<Url, PriceClientError> {
        let pair = format!("{}{}", asset.to_uppercase(), QUOTE_ASSET);
        Url::parse_with_params(&self.base_url, &[("symbol", pair)])
            .map_err(|e| PriceClientError::Unexpected(format!("bad price url: {e}")))
    }

    /// Current mark price of `asset` against USDT, rounded to cents.
    pub async fn get_mark_price(&self, asset: &str) -> Result<Decimal, PriceClientError> {
        let url = self.price_url(asset)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let price: ApiMarkPrice = resp.json().await?;
        if price.mark_price.is_sign_negative() {
            return Err(PriceClientError::Unexpected(format!(
                "negative mark price for {asset}: {}",
                price.mark_price
            )));
        }
        Ok(price.mark_price.round_dp(2))
    }

    /// Sample every asset in order, one request each. The first failure aborts
    /// the whole sample.
    pub async fn sample(&self, assets: &[String]) -> Result<Vec<Decimal>, PriceClientError> {
        let mut prices = Vec::with_capacity(assets.len());
        for asset in assets {
            prices.push(self.get_mark_price(asset).await?);
        }
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_url_appends_quote_asset() {
        let client = PriceClient::new(Client::new(), DEFAULT_PRICE_URL);
        let url = client.price_url("bnb").unwrap();
        assert_eq!(
            url.as_str(),
            "https://fapi.binance.com/fapi/v1/premiumIndex?symbol=BNBUSDT"
        );
    }
}
