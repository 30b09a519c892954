use anyhow::Result;

/// Install the metrics exporters selected at build time.
pub fn init_exporter() -> Result<()> {
    #[cfg(feature = "prometheus-exporter")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        PrometheusBuilder::new().install()?;
    }

    #[cfg(feature = "datadog-exporter")]
    {
        use metrics_exporter_dogstatsd::DogStatsDBuilder;
        DogStatsDBuilder::default().install()?;
    }

    Ok(())
}

/// Count one unified call against `exchange`.
pub fn record_request(exchange: &'static str, method: &'static str) {
    if crate::config::metrics_enabled() {
        ::metrics::counter!("unify_requests_total", "exchange" => exchange, "method" => method)
            .increment(1);
    }
}

/// Count one classified failure.
pub fn record_error(exchange: &'static str, kind: crate::ErrorKind) {
    if crate::config::metrics_enabled() {
        ::metrics::counter!("unify_errors_total", "exchange" => exchange, "kind" => kind.as_str())
            .increment(1);
    }
}

pub fn record_market_reload(exchange: &'static str) {
    if crate::config::metrics_enabled() {
        ::metrics::counter!("unify_market_reloads_total", "exchange" => exchange).increment(1);
    }
}
