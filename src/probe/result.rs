use serde::{Deserialize, Serialize};

/// Classified result of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    NotFound,
    Error,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found => "found",
            Outcome::NotFound => "not_found",
            Outcome::Error => "error",
        }
    }
}

/// Why a probe ended without an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The per-probe timeout elapsed.
    Timeout,
    /// DNS, refused connection, TLS handshake.
    Connect,
    /// Redirect loop or too many hops.
    Redirect,
    /// Any other transport or protocol failure.
    Request,
    /// The run-wide deadline passed before the probe finished.
    Deadline,
    /// The probe task itself died.
    Task,
}

/// Transport-level failure, reduced to what the report keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ProbeFailure {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }
}

impl From<&reqwest::Error> for ProbeFailure {
    fn from(e: &reqwest::Error) -> Self {
        // Timeout is checked first: a connect that times out sets both flags
        let kind = if e.is_timeout() {
            ErrorKind::Timeout
        } else if e.is_connect() {
            ErrorKind::Connect
        } else if e.is_redirect() {
            ErrorKind::Redirect
        } else {
            ErrorKind::Request
        };
        let mut detail = e.to_string();
        let mut source = std::error::Error::source(e);
        while let Some(inner) = source {
            detail.push_str(": ");
            detail.push_str(&inner.to_string());
            source = inner.source();
        }
        Self { kind, detail }
    }
}

/// One row of a probe report. Exactly one exists per registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub site: String,
    pub url: String,
    pub outcome: Outcome,
    pub status: Option<u16>,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
    pub elapsed_ms: u64,
}

impl ProbeResult {
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }

    /// Result for a probe that never produced a response.
    pub fn failed(site: impl Into<String>, url: impl Into<String>, failure: ProbeFailure, elapsed_ms: u64) -> Self {
        Self {
            site: site.into(),
            url: url.into(),
            outcome: Outcome::Error,
            status: None,
            error_kind: Some(failure.kind),
            error_detail: Some(failure.detail),
            elapsed_ms,
        }
    }
}

/// Map a response status or transport failure to an outcome.
///
/// Pure: the same input always gives the same classification.
pub fn classify(found_status: u16, response: Result<u16, ProbeFailure>) -> (Outcome, Option<u16>, Option<ProbeFailure>) {
    match response {
        Ok(status) if status == found_status => (Outcome::Found, Some(status), None),
        Ok(status) => (Outcome::NotFound, Some(status), None),
        Err(failure) => (Outcome::Error, None, Some(failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_found_status() {
        let (outcome, status, failure) = classify(200, Ok(200));
        assert_eq!(outcome, Outcome::Found);
        assert_eq!(status, Some(200));
        assert!(failure.is_none());
    }

    #[test]
    fn classify_other_status_is_not_found() {
        for code in [404, 301, 403, 429, 500, 204] {
            assert_eq!(classify(200, Ok(code)).0, Outcome::NotFound, "status {code}");
        }
    }

    #[test]
    fn classify_custom_found_status() {
        assert_eq!(classify(204, Ok(204)).0, Outcome::Found);
        assert_eq!(classify(204, Ok(200)).0, Outcome::NotFound);
    }

    #[test]
    fn classify_failure_keeps_kind() {
        let (outcome, status, failure) = classify(200, Err(ProbeFailure::new(ErrorKind::Timeout, "timed out")));
        assert_eq!(outcome, Outcome::Error);
        assert_eq!(status, None);
        assert_eq!(failure.unwrap().kind, ErrorKind::Timeout);
    }

    #[test]
    fn outcome_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Outcome::NotFound).unwrap(), "\"not_found\"");
        assert_eq!(serde_json::to_string(&ErrorKind::Deadline).unwrap(), "\"deadline\"");
    }
}
