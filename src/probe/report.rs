use serde::{Deserialize, Serialize};

use crate::probe::result::{Outcome, ProbeResult};

/// Results of one run, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub identifier: String,
    pub results: Vec<ProbeResult>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProbeSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
}

impl ProbeReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, site: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.site == site)
    }

    pub fn found(&self) -> impl Iterator<Item = &ProbeResult> {
        self.with_outcome(Outcome::Found)
    }

    /// Everything that did not confirm presence, unreachable sites included.
    pub fn missing(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| !r.is_found())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ProbeResult> {
        self.with_outcome(Outcome::Error)
    }

    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(move |r| r.outcome == outcome)
    }

    pub fn outcomes(&self) -> Vec<(&str, Outcome)> {
        self.results.iter().map(|r| (r.site.as_str(), r.outcome)).collect()
    }

    pub fn summary(&self) -> ProbeSummary {
        let mut s = ProbeSummary { total: self.results.len(), ..Default::default() };
        for r in &self.results {
            match r.outcome {
                Outcome::Found => s.found += 1,
                Outcome::NotFound => s.not_found += 1,
                Outcome::Error => s.errors += 1,
            }
        }
        s
    }
}
