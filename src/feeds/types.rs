use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transaction feed (Whale Alert REST)
// ---------------------------------------------------------------------------

/// Response envelope of the transactions endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiTransactionsResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub transactions: Vec<ApiTransaction>,
}

impl ApiTransactionsResponse {
    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some("success")
    }

    /// Largest timestamp in the batch, `None` for an empty batch.
    pub fn max_timestamp(&self) -> Option<i64> {
        self.transactions.iter().map(|t| t.timestamp).max()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiTransaction {
    #[serde(default)]
    pub blockchain: Option<String>,
    pub symbol: String,
    #[serde(default)]
    pub hash: Option<String>,
    pub timestamp: i64,
    pub amount: Decimal,
    pub amount_usd: Decimal,
    pub from: ApiParty,
    pub to: ApiParty,
}

/// One side of a transfer as reported by the feed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiParty {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub owner_type: OwnerType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    #[default]
    Unknown,
    Exchange,
    #[serde(other)]
    Other,
}

/// Attribution of a party after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Unknown,
    Known(String),
}

pub const UNKNOWN_LABEL: &str = "Unknown";

impl ApiParty {
    pub fn owner(&self) -> Owner {
        match (self.owner_type, self.owner.as_deref().map(str::trim)) {
            (OwnerType::Unknown, _) | (_, None) | (_, Some("")) => Owner::Unknown,
            (_, Some(name)) => Owner::Known(name.to_uppercase()),
        }
    }

    /// Display label: `Unknown` or the upper-cased owner name.
    pub fn label(&self) -> String {
        match self.owner() {
            Owner::Unknown => UNKNOWN_LABEL.to_string(),
            Owner::Known(name) => name,
        }
    }

    /// Upper-cased raw owner name regardless of owner type, used for
    /// allow-list matching.
    pub fn owner_upper(&self) -> String {
        self.owner.as_deref().unwrap_or_default().trim().to_uppercase()
    }
}

// ---------------------------------------------------------------------------
// Reference price feed (Binance futures premium index)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiMarkPrice {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(rename = "markPrice")]
    pub mark_price: Decimal,
}
