use std::time::Duration;

use whalewatch::config::AppConfig;
use whalewatch::feeds::{PriceClient, TransactionClient};
use whalewatch::metrics::init_metrics;
use whalewatch::services::notifier::Notifier;
use whalewatch::services::sample_log::SampleLog;
use whalewatch::services::watcher::{Watcher, WatcherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);
    init_metrics(config.metrics_addr)?;

    if config.symbol_check_list.is_empty() {
        tracing::warn!("SYMBOL_CHECK_LIST is empty — no transfer will ever match");
    }
    if config.exchange_check_list.is_empty() {
        tracing::warn!("EXCHANGE_CHECK_LIST is empty — no transfer will ever alert");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let notifier = match (&config.webhook_url, &config.webhook_token) {
        (Some(url), Some(token)) => Some(Notifier::new(
            http.clone(),
            url.clone(),
            token.clone(),
        )),
        _ => {
            tracing::warn!("No WEBHOOK_TOKEN — notifications will only be logged");
            None
        }
    };

    let watcher = Watcher::new(
        TransactionClient::new(
            http.clone(),
            config.whale_alert_url.clone(),
            config.whale_alert_api_key.clone(),
        ),
        PriceClient::new(http, config.price_api_url.clone()),
        notifier,
        SampleLog::new(&config.sample_log_path),
        WatcherConfig {
            rules: config.watch_rules(),
            min_usd_value: config.min_usd_value,
            open_price_snapshot: config.open_price_snapshot,
        },
    );

    tracing::info!(
        price_assets = ?config.price_symbols,
        lookahead_ticks = config.sample_lookahead_ticks,
        sample_log = %config.sample_log_path,
        "Watcher configured"
    );

    watcher
        .run(
            Duration::from_secs(config.poll_interval_secs),
            config.lookback_minutes,
        )
        .await;

    Ok(())
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
