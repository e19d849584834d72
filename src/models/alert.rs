use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::feeds::ApiTransaction;

pub const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A qualifying transfer, normalized for display and sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub symbol: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub amount_usd: Decimal,
    pub timestamp: i64,
    pub datetime: String,
}

impl AlertRecord {
    pub fn from_transaction(tx: &ApiTransaction, offset: FixedOffset) -> Self {
        Self {
            symbol: tx.symbol.to_uppercase(),
            from: tx.from.label(),
            to: tx.to.label(),
            amount: tx.amount.trunc(),
            amount_usd: tx.amount_usd.trunc(),
            timestamp: tx.timestamp,
            datetime: format_timestamp(tx.timestamp, offset),
        }
    }
}

/// Render epoch seconds as `dd-mm-YYYY HH:MM:SS` in the given offset.
/// Out-of-range timestamps fall back to the raw number.
pub fn format_timestamp(timestamp: i64, offset: FixedOffset) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.with_timezone(&offset).format(DATETIME_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} USD) {} -> {} at {}",
            self.amount, self.symbol, self.amount_usd, self.from, self.to, self.datetime,
        )
    }
}
