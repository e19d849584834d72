use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AlertRecord;

/// Mark price samples collected after one alert, until its deadline tick.
///
/// The window is sampled on every tick in `start_tick..=end_tick` and flushed
/// on the first tick past `end_tick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingWindow {
    pub alert: AlertRecord,
    pub start_tick: u64,
    pub end_tick: u64,
    /// One sequence per tracked asset, in configured asset order.
    pub samples: Vec<Vec<Decimal>>,
}

impl SamplingWindow {
    /// Open a window for an alert detected during `opened_at`. Sampling starts
    /// on the following tick; the deadline is `opened_at + lookahead + 1`.
    /// Saturates rather than wrapping on huge lookaheads.
    pub fn open(
        alert: AlertRecord,
        opened_at: u64,
        lookahead_ticks: u64,
        asset_count: usize,
    ) -> Self {
        Self {
            alert,
            start_tick: opened_at.saturating_add(1),
            end_tick: opened_at.saturating_add(lookahead_ticks).saturating_add(1),
            samples: vec![Vec::new(); asset_count],
        }
    }

    pub fn accepts(&self, tick: u64) -> bool {
        self.start_tick <= tick && tick <= self.end_tick
    }

    pub fn is_expired(&self, tick: u64) -> bool {
        tick > self.end_tick
    }

    pub fn push_sample(&mut self, prices: &[Decimal]) {
        for (series, price) in self.samples.iter_mut().zip(prices) {
            series.push(*price);
        }
    }

    /// Number of ticks sampled so far.
    pub fn sample_count(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// `symbol,from to,amount,amount_usd,datetime,<asset 1 samples>,<asset 2 samples>...`
    pub fn to_log_line(&self) -> String {
        let a = &self.alert;
        let mut fields = vec![
            a.symbol.clone(),
            format!("{} {}", a.from, a.to),
            a.amount.trunc().to_string(),
            a.amount_usd.trunc().to_string(),
            a.datetime.clone(),
        ];
        for series in &self.samples {
            fields.extend(series.iter().map(|p| format!("{:.2}", p)));
        }
        fields.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> AlertRecord {
        AlertRecord {
            symbol: "BTC".into(),
            from: "Unknown".into(),
            to: "BINANCE".into(),
            amount: Decimal::from(10),
            amount_usd: Decimal::from(600_000),
            timestamp: 100,
            datetime: "01-01-1970 00:01:40".into(),
        }
    }

    #[test]
    fn test_window_bounds() {
        let w = SamplingWindow::open(alert(), 5, 3, 2);
        assert_eq!(w.start_tick, 6);
        assert_eq!(w.end_tick, 9);
        assert!(!w.accepts(5));
        assert!(w.accepts(6));
        assert!(w.accepts(9));
        assert!(!w.is_expired(9));
        assert!(w.is_expired(10));
    }

    #[test]
    fn test_huge_lookahead_saturates() {
        let w = SamplingWindow::open(alert(), 7, u64::MAX, 2);
        assert_eq!(w.start_tick, 8);
        assert_eq!(w.end_tick, u64::MAX);
        assert!(w.accepts(8));
        assert!(!w.is_expired(1_000_000));
    }

    #[test]
    fn test_log_line_groups_samples_per_asset() {
        let mut w = SamplingWindow::open(alert(), 1, 1, 2);
        w.push_sample(&[Decimal::new(6500012, 2), Decimal::new(61230, 2)]);
        w.push_sample(&[Decimal::new(6510000, 2), Decimal::new(61345, 2)]);
        assert_eq!(w.sample_count(), 2);
        assert_eq!(
            w.to_log_line(),
            "BTC,Unknown BINANCE,10,600000,01-01-1970 00:01:40,65000.12,65100.00,612.30,613.45"
        );
    }

    #[test]
    fn test_log_line_without_samples() {
        let w = SamplingWindow::open(alert(), 1, 0, 2);
        assert_eq!(w.sample_count(), 0);
        assert_eq!(w.to_log_line(), "BTC,Unknown BINANCE,10,600000,01-01-1970 00:01:40");
    }
}
