use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;

use crate::error::ProbeError;
use crate::probe::result::{classify, ProbeFailure, ProbeResult};
use crate::registry::SiteRegistryEntry;

/// A site paired with the identifier, resolved to the url that gets probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub site: SiteRegistryEntry,
    pub identifier: String,
    pub url: String,
}

impl ProbeRequest {
    pub fn new(site: &SiteRegistryEntry, identifier: &str) -> Result<Self, ProbeError> {
        let url = site.resolve(identifier)?;
        Ok(Self {
            site: site.clone(),
            identifier: identifier.to_string(),
            url,
        })
    }
}

/// Issue one HEAD request and classify what comes back.
///
/// Never fails: transport errors become `Outcome::Error` in the returned row.
pub async fn probe_one(client: &Client, request: &ProbeRequest, timeout: Duration) -> ProbeResult {
    let start = Instant::now();

    let response = client
        .head(&request.url)
        .timeout(timeout)
        .send()
        .await
        .map(|r| r.status().as_u16())
        .map_err(|e| ProbeFailure::from(&e));

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let (outcome, status, failure) = classify(request.site.found_status, response);

    match &failure {
        Some(f) => tracing::debug!(site = %request.site.name, kind = ?f.kind, elapsed_ms, "probe failed: {}", f.detail),
        None => tracing::debug!(site = %request.site.name, status = ?status, outcome = outcome.label(), elapsed_ms, "probe finished"),
    }

    ProbeResult {
        site: request.site.name.clone(),
        url: request.url.clone(),
        outcome,
        status,
        error_kind: failure.as_ref().map(|f| f.kind),
        error_detail: failure.map(|f| f.detail),
        elapsed_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_resolves_url_from_template() {
        let site = SiteRegistryEntry::new("TikTok", "https://www.tiktok.com/@{}");
        let req = ProbeRequest::new(&site, "jdoe").unwrap();
        assert_eq!(req.url, "https://www.tiktok.com/@jdoe");
        assert_eq!(req.identifier, "jdoe");
    }

    #[test]
    fn request_propagates_structural_errors() {
        let site = SiteRegistryEntry::new("NoSlot", "https://example.com/");
        assert!(matches!(ProbeRequest::new(&site, "jdoe"), Err(ProbeError::MissingPlaceholder { .. })));
    }
}
