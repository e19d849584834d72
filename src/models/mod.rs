pub mod alert;
pub mod window;

pub use alert::{format_timestamp, AlertRecord};
pub use window::SamplingWindow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceChange: one line of a price snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub asset: String,
    pub price: Decimal,
    /// Percent change vs the previously reported price, when there is one.
    pub change_pct: Option<Decimal>,
}
