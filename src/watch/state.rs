use rust_decimal::Decimal;

use crate::errors::WatchError;
use crate::feeds::ApiTransactionsResponse;
use crate::models::{AlertRecord, PriceChange, SamplingWindow};

use super::price_cache::PriceCache;
use super::rules::WatchRules;

/// Result of folding one feed batch into the state.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// Alert-worthy transfers, in feed order. Each opened one window.
    pub alerts: Vec<AlertRecord>,
    /// New transfers on an allow-listed symbol, alerting or not.
    pub matched: usize,
    pub watermark_before: i64,
    pub watermark_after: i64,
}

/// All mutable watcher state. Owned by a single tick loop.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    tick: u64,
    watermark: i64,
    windows: Vec<SamplingWindow>,
    prices: PriceCache,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the next tick and return its number. The first tick is 1.
    pub fn begin_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    pub fn windows(&self) -> &[SamplingWindow] {
        &self.windows
    }

    pub fn has_open_windows(&self) -> bool {
        !self.windows.is_empty()
    }

    pub fn price_cache(&self) -> &PriceCache {
        &self.prices
    }

    /// Fold a feed batch into the state.
    ///
    /// A rejected batch (`result != "success"`) leaves everything untouched.
    /// Otherwise every new transfer on an allow-listed symbol is logged,
    /// alert-worthy ones open a window, and the watermark moves to the batch's
    /// max timestamp, including transfers that were filtered out.
    pub fn ingest(
        &mut self,
        resp: &ApiTransactionsResponse,
        rules: &WatchRules,
    ) -> Result<IngestOutcome, WatchError> {
        if !resp.is_success() {
            let reason = resp
                .message
                .clone()
                .or_else(|| resp.result.clone())
                .unwrap_or_else(|| "missing result".into());
            return Err(WatchError::FeedRejected(reason));
        }

        let cutoff = self.watermark;
        let mut outcome = IngestOutcome {
            watermark_before: cutoff,
            ..Default::default()
        };

        for tx in &resp.transactions {
            if !rules.tracks_symbol(&tx.symbol) || tx.timestamp <= cutoff {
                continue;
            }
            outcome.matched += 1;

            let from = tx.from.label();
            let to = tx.to.label();
            tracing::info!(
                symbol = %tx.symbol.to_uppercase(),
                amount = %tx.amount.trunc(),
                amount_usd = %tx.amount_usd.trunc(),
                from = %from,
                to = %to,
                timestamp = tx.timestamp,
                "Transfer detected"
            );

            if !rules.is_alert_worthy(tx) {
                continue;
            }

            let alert = AlertRecord::from_transaction(tx, rules.utc_offset);
            self.windows.push(SamplingWindow::open(
                alert.clone(),
                self.tick,
                rules.lookahead_ticks,
                rules.price_assets.len(),
            ));
            outcome.alerts.push(alert);
        }

        if let Some(max_ts) = resp.max_timestamp() {
            self.watermark = self.watermark.max(max_ts);
        }
        outcome.watermark_after = self.watermark;

        Ok(outcome)
    }

    /// Feed one price sample to the open windows. Windows still within their
    /// deadline take the sample; expired ones are removed and returned, most
    /// recently opened first.
    pub fn advance_windows(&mut self, prices: &[Decimal]) -> Vec<SamplingWindow> {
        let tick = self.tick;
        let mut flushed = Vec::new();

        for i in (0..self.windows.len()).rev() {
            if self.windows[i].is_expired(tick) {
                flushed.push(self.windows.remove(i));
            } else if self.windows[i].accepts(tick) {
                self.windows[i].push_sample(prices);
            }
        }

        flushed
    }

    /// Price snapshot against the last reported prices; caches the new ones.
    pub fn price_snapshot(&mut self, assets: &[String], prices: &[Decimal]) -> Vec<PriceChange> {
        self.prices.snapshot(assets, prices)
    }
}
