use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Shared settings for every provider client. Installs the ring crypto
/// provider first if nothing else has, so library users and tests do not
/// depend on `main` having run.
pub fn build_provider_client_with_timeout(timeout_secs: u64) -> Client {
    let _ = rustls::crypto::ring::default_provider().install_default();

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!("Falling back to default HTTP client: {error}");
            Client::new()
        })
}
