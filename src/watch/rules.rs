use chrono::FixedOffset;

use crate::feeds::{ApiTransaction, Owner};

/// Filtering and windowing rules applied to every feed batch.
#[derive(Debug, Clone)]
pub struct WatchRules {
    /// Upper-cased symbol allow-list. Empty matches nothing.
    pub symbols: Vec<String>,
    /// Upper-cased exchange allow-list. Empty matches nothing.
    pub exchanges: Vec<String>,
    /// Label a transfer's destination must carry to alert, e.g. `BINANCE`.
    pub primary_exchange: String,
    pub lookahead_ticks: u64,
    /// Reference assets sampled for every open window.
    pub price_assets: Vec<String>,
    pub utc_offset: FixedOffset,
}

impl WatchRules {
    pub fn tracks_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        self.symbols.iter().any(|s| *s == symbol)
    }

    fn in_exchange_list(&self, owner: &str) -> bool {
        !owner.is_empty() && self.exchanges.iter().any(|e| e == owner)
    }

    /// Unknown wallet sending into the primary exchange, with either side on
    /// the exchange allow-list. Internal moves (same raw owner on both sides)
    /// never alert.
    pub fn is_alert_worthy(&self, tx: &ApiTransaction) -> bool {
        tx.from.owner() == Owner::Unknown
            && tx.to.label() == self.primary_exchange
            && (self.in_exchange_list(&tx.to.owner_upper())
                || self.in_exchange_list(&tx.from.owner_upper()))
            && tx.to.owner != tx.from.owner
    }
}
