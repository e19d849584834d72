use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::PriceChange;

/// Last reported price per reference asset.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    last: HashMap<String, Decimal>,
}

impl PriceCache {
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.last.get(asset).copied()
    }

    /// Build a snapshot against the cached prices, then cache the new ones.
    pub fn snapshot(&mut self, assets: &[String], prices: &[Decimal]) -> Vec<PriceChange> {
        assets
            .iter()
            .zip(prices)
            .map(|(asset, price)| {
                let change_pct = self
                    .last
                    .insert(asset.clone(), *price)
                    .and_then(|prev| percent_change(prev, *price));
                PriceChange {
                    asset: asset.clone(),
                    price: *price,
                    change_pct,
                }
            })
            .collect()
    }
}

/// Percent change from `prev` to `now`, two decimals. `None` when `prev` is zero.
pub fn percent_change(prev: Decimal, now: Decimal) -> Option<Decimal> {
    if prev.is_zero() {
        return None;
    }
    Some(((now - prev) / prev * Decimal::ONE_HUNDRED).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(Decimal::from(200), Decimal::from(210)),
            Some(Decimal::new(500, 2))
        );
        assert_eq!(
            percent_change(Decimal::from(300), Decimal::from(299)),
            Some(Decimal::new(-33, 2))
        );
        assert_eq!(percent_change(Decimal::ZERO, Decimal::ONE), None);
    }

    #[test]
    fn test_first_snapshot_has_no_change_then_updates() {
        let mut cache = PriceCache::default();
        let assets = vec!["BTC".to_string(), "BNB".to_string()];

        let first = cache.snapshot(&assets, &[Decimal::from(100), Decimal::from(50)]);
        assert!(first.iter().all(|c| c.change_pct.is_none()));
        assert_eq!(cache.get("BTC"), Some(Decimal::from(100)));

        let second = cache.snapshot(&assets, &[Decimal::from(110), Decimal::from(50)]);
        assert_eq!(second[0].change_pct, Some(Decimal::from(10)));
        assert_eq!(second[1].change_pct, Some(Decimal::ZERO));
        assert_eq!(cache.get("BTC"), Some(Decimal::from(110)));
    }
}
