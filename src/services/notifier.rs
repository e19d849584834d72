use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::{AlertRecord, PriceChange};

/// Webhook notification sink: `POST` of a JSON `{"message": ..}` body with a
/// bearer token. Failures are logged but never block the tick.
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    webhook_url: String,
    token: String,
}

impl Notifier {
    pub fn new(http: reqwest::Client, webhook_url: String, token: String) -> Self {
        Self {
            http,
            webhook_url,
            token,
        }
    }

    /// Post a message to the webhook. Failures are logged as warnings.
    pub async fn send(&self, message: &str) {
        let body = json!({ "message": message });

        match self
            .http
            .post(&self.webhook_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => {
                if !resp.status().is_success() {
                    tracing::warn!(
                        status = %resp.status(),
                        "Webhook returned non-2xx"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send webhook notification");
            }
        }
    }
}

const TIER_1: i64 = 1_000_000;
const TIER_2: i64 = 5_000_000;
const TIER_3: i64 = 10_000_000;
const MAX_SIRENS: i64 = 10;

/// Severity glyphs for a USD value. Above $10M one siren per full $10M, up to
/// `MAX_SIRENS`; past that the count is written out.
pub fn severity_glyphs(amount_usd: Decimal) -> String {
    let usd = amount_usd.trunc().to_i64().unwrap_or(i64::MAX);
    if usd < TIER_1 {
        "🦐".to_string()
    } else if usd < TIER_2 {
        "🐙🐙".to_string()
    } else if usd < TIER_3 {
        "🐳🐳🐳".to_string()
    } else {
        let sirens = usd / TIER_3;
        if sirens <= MAX_SIRENS {
            "🚨".repeat(sirens as usize)
        } else {
            format!("{} x{}", "🚨".repeat(MAX_SIRENS as usize), sirens)
        }
    }
}

/// Integer part with `,` thousands separators.
pub fn group_thousands(value: Decimal) -> String {
    let digits = value.trunc().abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value.trunc().is_sign_negative() && !value.trunc().is_zero() {
        out.insert(0, '-');
    }
    out
}

/// Format the immediate alert for a qualifying transfer.
pub fn format_alert(alert: &AlertRecord) -> String {
    format!(
        " {}\n-----\n{}\n{} {}\n[{} USD]\n-----\ntransferred from\n#{} → #{}",
        alert.datetime,
        severity_glyphs(alert.amount_usd),
        group_thousands(alert.amount),
        alert.symbol,
        group_thousands(alert.amount_usd),
        alert.from,
        alert.to,
    )
}

fn direction_glyph(change: Decimal) -> &'static str {
    if change.is_sign_positive() && !change.is_zero() {
        "🟢"
    } else if change.is_sign_negative() && !change.is_zero() {
        "🔴"
    } else {
        "⚪"
    }
}

/// Format a mark price snapshot, one asset per line.
pub fn format_price_snapshot(changes: &[PriceChange]) -> String {
    let mut lines = vec!["Mark Price".to_string()];
    for c in changes {
        let line = match c.change_pct {
            Some(pct) => format!(
                "{}: {:.2} {} {}{:.2}%",
                c.asset,
                c.price,
                direction_glyph(pct),
                if pct.is_sign_negative() && !pct.is_zero() { "" } else { "+" },
                pct,
            ),
            None => format!("{}: {:.2}", c.asset, c.price),
        };
        lines.push(line);
    }
    lines.join("\n")
}
