use std::time::Duration;

use crate::http_client::DEFAULT_USER_AGENT;
use crate::probe::ProbeOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub timeout_secs: u64,
    pub concurrency: Option<usize>,
    pub deadline_secs: Option<u64>,
    pub user_agent: String,
    pub hibp_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            concurrency: None,
            deadline_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            hibp_api_key: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `OSINT_PROBE_*` and `HIBP_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(secs) = lookup("OSINT_PROBE_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            cfg.timeout_secs = secs;
        }
        if let Some(n) = lookup("OSINT_PROBE_CONCURRENCY").and_then(|v| v.trim().parse().ok()) {
            cfg.concurrency = Some(n);
        }
        if let Some(ua) = lookup("OSINT_PROBE_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            cfg.user_agent = ua;
        }
        cfg.hibp_api_key = lookup("HIBP_API_KEY").filter(|v| !v.trim().is_empty());
        cfg
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            max_concurrency: self.concurrency.filter(|n| *n > 0),
            deadline: self.deadline_secs.map(Duration::from_secs),
        }
    }
}
