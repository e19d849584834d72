use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr` and register all watcher metrics.
/// Without an address the `metrics` macros stay no-ops.
pub fn init_metrics(addr: Option<SocketAddr>) -> anyhow::Result<()> {
    let Some(addr) = addr else {
        tracing::debug!("METRICS_ADDR unset — Prometheus exporter disabled");
        return Ok(());
    };

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(%addr, "Prometheus exporter listening");

    // Pre-register counters so they appear even before the first increment.
    counter!("feed_polls_total").absolute(0);
    counter!("feed_errors_total").absolute(0);
    counter!("transactions_seen_total").absolute(0);
    counter!("alerts_total").absolute(0);
    counter!("windows_opened_total").absolute(0);
    counter!("windows_flushed_total").absolute(0);
    counter!("price_sample_errors_total").absolute(0);

    gauge!("open_windows").set(0.0);
    gauge!("watermark_timestamp").set(0.0);

    Ok(())
}
