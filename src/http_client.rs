use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use once_cell::sync::Lazy;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared pooled client used by the convenience entry points
pub static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    create_probe_client(DEFAULT_USER_AGENT, 16).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default reqwest client");
        Client::new()
    })
});

/// Create the client shared by all probes of a run.
///
/// No connect or total timeout is set here. The prober's per-request timeout
/// bounds connect and response together, so one client can serve runs with
/// different timeouts.
pub fn create_probe_client(user_agent: &str, max_idle_per_host: usize) -> reqwest::Result<Client> {
    ClientBuilder::new()
        // Connection pooling - probes to the same host reuse connections
        .pool_max_idle_per_host(max_idle_per_host)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)

        .gzip(true)
        .brotli(true)

        .use_rustls_tls()

        // Profile pages often bounce through locale or login redirects
        .redirect(reqwest::redirect::Policy::limited(10))

        .user_agent(user_agent)
        .build()
}

/// Client for single API lookups such as the breach check
pub fn create_api_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .use_rustls_tls()
        .user_agent(user_agent)
        .build()
}
