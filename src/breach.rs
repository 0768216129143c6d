//! Have I Been Pwned lookup for a single email address.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::http_client::create_api_client;

pub const HIBP_BASE_URL: &str = "https://haveibeenpwned.com";
pub const HIBP_USER_AGENT: &str = "OSINT-Probe";
const PLACEHOLDER_KEY: &str = "YOUR_API_KEY_HERE";

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum BreachError {
    #[error("HIBP API key is not configured (set HIBP_API_KEY or pass --hibp-key)")]
    MissingApiKey,

    #[error("'{0}' is not an email address")]
    InvalidEmail(String),

    #[error("HIBP answered with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HIBP request failed")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breach {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub breach_date: Option<String>,
    #[serde(default)]
    pub pwn_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreachStatus {
    Breached(Vec<Breach>),
    Clean,
}

pub struct BreachClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BreachClient {
    pub fn new(api_key: Option<&str>) -> Result<Self, BreachError> {
        Self::with_base_url(api_key, HIBP_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Result<Self, BreachError> {
        let api_key = match api_key.map(str::trim) {
            Some(k) if !k.is_empty() && k != PLACEHOLDER_KEY => k.to_string(),
            _ => return Err(BreachError::MissingApiKey),
        };
        let client = create_api_client(HIBP_USER_AGENT, Duration::from_secs(15))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub async fn check(&self, email: &str) -> Result<BreachStatus, BreachError> {
        let email = email.trim();
        if !EMAIL_SHAPE.is_match(email) {
            return Err(BreachError::InvalidEmail(email.to_string()));
        }

        let url = format!(
            "{}/api/v3/breachedaccount/{}?truncateResponse=false",
            self.base_url,
            urlencoding::encode(email)
        );
        tracing::debug!(%url, "querying HIBP");

        let resp = self
            .client
            .get(&url)
            .header("hibp-api-key", &self.api_key)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {
                let breaches: Vec<Breach> = resp.json().await?;
                tracing::info!(count = breaches.len(), "email found in breaches");
                Ok(BreachStatus::Breached(breaches))
            }
            StatusCode::NOT_FOUND => Ok(BreachStatus::Clean),
            status => {
                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "unexpected HIBP response");
                Err(BreachError::UnexpectedStatus { status: status.as_u16(), body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_counts_as_missing() {
        assert!(matches!(BreachClient::new(None), Err(BreachError::MissingApiKey)));
        assert!(matches!(BreachClient::new(Some("  ")), Err(BreachError::MissingApiKey)));
        assert!(matches!(BreachClient::new(Some("YOUR_API_KEY_HERE")), Err(BreachError::MissingApiKey)));
        assert!(BreachClient::new(Some("abc123")).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(EMAIL_SHAPE.is_match("jdoe@example.com"));
        assert!(!EMAIL_SHAPE.is_match("jdoe"));
        assert!(!EMAIL_SHAPE.is_match("jdoe@localhost"));
        assert!(!EMAIL_SHAPE.is_match("j doe@example.com"));
    }

    #[test]
    fn breach_parses_hibp_field_names() {
        let b: Breach = serde_json::from_str(r#"{"Name":"Adobe","BreachDate":"2013-10-04","PwnCount":152445165}"#).unwrap();
        assert_eq!(b.name, "Adobe");
        assert_eq!(b.breach_date.as_deref(), Some("2013-10-04"));
        assert_eq!(b.pwn_count, Some(152445165));
        assert!(b.title.is_none());
    }
}
