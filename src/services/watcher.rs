use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge};
use tokio::time::sleep;

use crate::errors::WatchError;
use crate::feeds::{PriceClient, TransactionClient};
use crate::services::notifier::{format_alert, format_price_snapshot, Notifier};
use crate::services::sample_log::SampleLog;
use crate::watch::{WatchRules, WatchState};

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub rules: WatchRules,
    /// Passed to the feed as `min_value`.
    pub min_usd_value: u64,
    /// Send a price snapshot as soon as a window opens.
    pub open_price_snapshot: bool,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub alerts: usize,
    pub flushed: usize,
    pub feed_ok: bool,
}

/// Single-task tick loop: sample open windows, poll the feed, alert.
pub struct Watcher {
    feed: TransactionClient,
    prices: PriceClient,
    notifier: Option<Notifier>,
    sample_log: SampleLog,
    config: WatcherConfig,
    state: WatchState,
}

impl Watcher {
    pub fn new(
        feed: TransactionClient,
        prices: PriceClient,
        notifier: Option<Notifier>,
        sample_log: SampleLog,
        config: WatcherConfig,
    ) -> Self {
        Self {
            feed,
            prices,
            notifier,
            sample_log,
            config,
            state: WatchState::new(),
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Tick forever. Each tick completes before the next sleep starts; the
    /// feed query covers the last `lookback_minutes` before each tick.
    pub async fn run(mut self, poll_interval: Duration, lookback_minutes: i64) {
        tracing::info!(
            interval_secs = poll_interval.as_secs(),
            lookback_minutes,
            symbols = ?self.config.rules.symbols,
            exchanges = ?self.config.rules.exchanges,
            "Whale watcher started"
        );

        loop {
            let start_ts = Utc::now().timestamp() - lookback_minutes * 60;

            match self.run_tick(start_ts).await {
                Ok(report) if report.alerts > 0 || report.flushed > 0 => {
                    tracing::info!(
                        tick = report.tick,
                        alerts = report.alerts,
                        flushed = report.flushed,
                        open_windows = self.state.windows().len(),
                        "Tick complete"
                    );
                }
                Ok(report) => {
                    tracing::debug!(tick = report.tick, feed_ok = report.feed_ok, "Tick complete");
                }
                Err(e) => {
                    tracing::error!(error = %e, tick = self.state.tick(), "Tick aborted");
                }
            }

            sleep(poll_interval).await;
        }
    }

    /// Run one tick against feed transfers since `start_ts`.
    ///
    /// A failed price sample aborts the tick before the feed is polled. Feed
    /// failures only abandon the transfer half; the state stays untouched.
    pub async fn run_tick(&mut self, start_ts: i64) -> Result<TickReport, WatchError> {
        let tick = self.state.begin_tick();
        let flushed = self.sample_windows().await?;

        let (alerts, feed_ok) = match self.poll(start_ts).await {
            Ok(alerts) => (alerts, true),
            Err(e) if e.is_feed_error() => {
                counter!("feed_errors_total").increment(1);
                tracing::error!(
                    error = %e,
                    tick,
                    "Feed poll failed — skipping transfers this tick"
                );
                (0, false)
            }
            Err(e) => return Err(e),
        };

        gauge!("open_windows").set(self.state.windows().len() as f64);

        Ok(TickReport {
            tick,
            alerts,
            flushed,
            feed_ok,
        })
    }

    async fn notify(&self, message: &str) {
        match &self.notifier {
            Some(notifier) => notifier.send(message).await,
            None => tracing::info!(text = %message, "Notification (delivery disabled)"),
        }
    }

    /// Price-sample step. No-op while no window is open.
    async fn sample_windows(&mut self) -> Result<usize, WatchError> {
        if !self.state.has_open_windows() {
            return Ok(0);
        }

        let assets = self.config.rules.price_assets.clone();
        let prices = match self.prices.sample(&assets).await {
            Ok(p) => p,
            Err(e) => {
                counter!("price_sample_errors_total").increment(1);
                return Err(e.into());
            }
        };

        let flushed = self.state.advance_windows(&prices);

        for window in &flushed {
            let line = window.to_log_line();
            if let Err(e) = self.sample_log.append(&line).await {
                tracing::error!(
                    error = %e,
                    path = %self.sample_log.path().display(),
                    line = %line,
                    "Failed to append window to sample log"
                );
            }

            tracing::info!(
                symbol = %window.alert.symbol,
                from = %window.alert.from,
                to = %window.alert.to,
                samples = window.sample_count(),
                "Sampling window flushed"
            );

            let snapshot = self.state.price_snapshot(&assets, &prices);
            self.notify(&format_price_snapshot(&snapshot)).await;
        }

        counter!("windows_flushed_total").increment(flushed.len() as u64);
        Ok(flushed.len())
    }

    /// Poll/filter step.
    async fn poll(&mut self, start_ts: i64) -> Result<usize, WatchError> {
        counter!("feed_polls_total").increment(1);

        let resp = self
            .feed
            .get_transactions(start_ts, self.config.min_usd_value)
            .await?;
        counter!("transactions_seen_total").increment(resp.transactions.len() as u64);

        let outcome = self.state.ingest(&resp, &self.config.rules)?;
        gauge!("watermark_timestamp").set(outcome.watermark_after as f64);

        if outcome.watermark_after != outcome.watermark_before {
            tracing::debug!(
                from = outcome.watermark_before,
                to = outcome.watermark_after,
                matched = outcome.matched,
                "Watermark advanced"
            );
        }

        for alert in &outcome.alerts {
            tracing::info!(%alert, "Whale alert — sampling window opened");
            self.notify(&format_alert(alert)).await;
        }
        counter!("alerts_total").increment(outcome.alerts.len() as u64);
        counter!("windows_opened_total").increment(outcome.alerts.len() as u64);

        if self.config.open_price_snapshot && !outcome.alerts.is_empty() {
            self.send_opening_snapshot().await;
        }

        Ok(outcome.alerts.len())
    }

    /// Snapshot at window open; seeds the cache the flush snapshot compares to.
    async fn send_opening_snapshot(&mut self) {
        let assets = self.config.rules.price_assets.clone();
        match self.prices.sample(&assets).await {
            Ok(prices) => {
                let snapshot = self.state.price_snapshot(&assets, &prices);
                self.notify(&format_price_snapshot(&snapshot)).await;
            }
            Err(e) => {
                counter!("price_sample_errors_total").increment(1);
                tracing::warn!(error = %e, "Opening price snapshot failed");
            }
        }
    }
}
