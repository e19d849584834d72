use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};

use crate::feeds::price_client::DEFAULT_PRICE_URL;
use crate::feeds::transaction_client::DEFAULT_TRANSACTIONS_URL;
use crate::services::sample_log::DEFAULT_SAMPLE_LOG_PATH;
use crate::watch::WatchRules;

/// About a year of ticks at one tick per second.
pub const MAX_LOOKAHEAD_TICKS: u64 = 31_536_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Transaction feed
    pub whale_alert_api_key: String,
    pub whale_alert_url: String,
    pub min_usd_value: u64,
    pub lookback_minutes: i64,
    pub poll_interval_secs: u64,

    // Filtering
    pub symbol_check_list: Vec<String>,
    pub exchange_check_list: Vec<String>,
    pub primary_exchange: String,

    // Price sampling
    pub price_api_url: String,
    pub price_symbols: Vec<String>,
    pub sample_lookahead_ticks: u64,
    pub sample_log_path: String,
    pub open_price_snapshot: bool,

    // Notifications (optional: without a token alerts are only logged)
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,

    pub utc_offset_hours: i32,
    pub http_timeout_secs: u64,
    pub metrics_addr: Option<SocketAddr>,
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let poll_interval_secs: u64 =
            parse_or(get("POLL_INTERVAL_SECS"), 10, "POLL_INTERVAL_SECS")?;
        if poll_interval_secs == 0 {
            anyhow::bail!("POLL_INTERVAL_SECS must be greater than zero");
        }

        let price_symbols = match get("PRICE_SYMBOLS") {
            Some(raw) => parse_list(&raw),
            None => vec!["BTC".into(), "BNB".into()],
        };
        if price_symbols.is_empty() {
            anyhow::bail!("PRICE_SYMBOLS must name at least one asset");
        }

        let utc_offset_hours: i32 = parse_or(get("UTC_OFFSET_HOURS"), 0, "UTC_OFFSET_HOURS")?;
        if !(-23..=23).contains(&utc_offset_hours) {
            anyhow::bail!("UTC_OFFSET_HOURS must be within -23..=23");
        }

        let sample_lookahead_ticks: u64 = parse_or(
            get("SAMPLE_LOOKAHEAD_TICKS"),
            default_lookahead_ticks(poll_interval_secs),
            "SAMPLE_LOOKAHEAD_TICKS",
        )?;
        if sample_lookahead_ticks > MAX_LOOKAHEAD_TICKS {
            anyhow::bail!("SAMPLE_LOOKAHEAD_TICKS must be at most {MAX_LOOKAHEAD_TICKS}");
        }

        let webhook_url = get("WEBHOOK_URL");
        let webhook_token = get("WEBHOOK_TOKEN");
        if webhook_token.is_some() && webhook_url.is_none() {
            anyhow::bail!("WEBHOOK_URL must be set when WEBHOOK_TOKEN is set");
        }

        let metrics_addr = get("METRICS_ADDR")
            .map(|v| v.parse::<SocketAddr>())
            .transpose()
            .context("METRICS_ADDR must be a socket address")?;

        Ok(Self {
            whale_alert_api_key: get("WHALE_ALERT_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("WHALE_ALERT_API_KEY must be set"))?,
            whale_alert_url: get("WHALE_ALERT_URL")
                .unwrap_or_else(|| DEFAULT_TRANSACTIONS_URL.into()),
            min_usd_value: parse_or(get("MIN_USD_VALUE"), 500_000, "MIN_USD_VALUE")?,
            lookback_minutes: parse_or(get("LOOKBACK_MINUTES"), 5, "LOOKBACK_MINUTES")?,
            poll_interval_secs,

            symbol_check_list: get("SYMBOL_CHECK_LIST").map(|v| parse_list(&v)).unwrap_or_default(),
            exchange_check_list: get("EXCHANGE_CHECK_LIST")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            primary_exchange: get("PRIMARY_EXCHANGE")
                .map(|v| v.trim().to_uppercase())
                .unwrap_or_else(|| "BINANCE".into()),

            price_api_url: get("PRICE_API_URL").unwrap_or_else(|| DEFAULT_PRICE_URL.into()),
            price_symbols,
            sample_lookahead_ticks,
            sample_log_path: get("SAMPLE_LOG_PATH")
                .unwrap_or_else(|| DEFAULT_SAMPLE_LOG_PATH.into()),
            open_price_snapshot: parse_or(
                get("OPEN_PRICE_SNAPSHOT"),
                false,
                "OPEN_PRICE_SNAPSHOT",
            )?,

            webhook_url,
            webhook_token,

            utc_offset_hours,
            http_timeout_secs: parse_or(get("HTTP_TIMEOUT_SECS"), 10, "HTTP_TIMEOUT_SECS")?,
            metrics_addr,
            log_json: parse_or(get("LOG_JSON"), false, "LOG_JSON")?,
        })
    }

    pub fn utc_offset(&self) -> FixedOffset {
        // Range checked in from_lookup.
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    pub fn watch_rules(&self) -> WatchRules {
        WatchRules {
            symbols: self.symbol_check_list.clone(),
            exchanges: self.exchange_check_list.clone(),
            primary_exchange: self.primary_exchange.clone(),
            lookahead_ticks: self.sample_lookahead_ticks,
            price_assets: self.price_symbols.clone(),
            utc_offset: self.utc_offset(),
        }
    }
}

/// Ten minutes worth of ticks at the given interval, at least one tick per minute.
pub fn default_lookahead_ticks(poll_interval_secs: u64) -> u64 {
    (60 / poll_interval_secs).max(1) * 10
}

/// Split a comma-separated list, trimming, upper-casing and dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid ({v:?}): {e}")),
        None => Ok(default),
    }
}
