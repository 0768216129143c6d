#![allow(dead_code)]

use std::time::Duration;

use osint_probe::SiteRegistry;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers HEAD requests on `url_path` with `status`.
pub async fn mount_site(server: &MockServer, url_path: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Same as `mount_site` but holds the response for `delay`.
pub async fn mount_slow_site(server: &MockServer, url_path: &str, status: u16, delay: Duration) {
    Mock::given(method("HEAD"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(status).set_delay(delay))
        .mount(server)
        .await;
}

/// Template pointing at `/<slug>/{}` on the mock server.
pub fn template(server: &MockServer, slug: &str) -> String {
    format!("{}/{}/{{}}", server.uri(), slug)
}

/// Registry whose sites all live on one mock server, one path prefix per site.
pub fn registry_on(server: &MockServer, sites: &[(&str, &str)]) -> SiteRegistry {
    SiteRegistry::from_pairs(sites.iter().map(|(name, slug)| (name.to_string(), template(server, slug))))
        .expect("valid test registry")
}

/// Address nothing is listening on.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Listener that completes the TCP handshake but never reads or answers.
///
/// Keep the returned listener alive for as long as the stall is needed.
pub fn silent_listener() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    (listener, format!("http://127.0.0.1:{}", port))
}

/// Prober with its own client; a pooled client must not outlive the test runtime.
pub fn prober(options: osint_probe::ProbeOptions) -> osint_probe::Prober {
    let client = osint_probe::http_client::create_probe_client("osint-probe-tests", 4).expect("client");
    osint_probe::Prober::new(client, options)
}

pub fn options_with_timeout(timeout: Duration) -> osint_probe::ProbeOptions {
    osint_probe::ProbeOptions { timeout, ..Default::default() }
}
