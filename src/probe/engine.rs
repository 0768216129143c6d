use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::Instant;

use crate::error::ProbeError;
use crate::http_client::SHARED_CLIENT;
use crate::probe::http_probe::{probe_one, ProbeRequest};
use crate::probe::report::ProbeReport;
use crate::probe::result::{ErrorKind, ProbeFailure, ProbeResult};
use crate::registry::SiteRegistry;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Bound on each individual probe.
    pub timeout: Duration,
    /// Cap on probes in flight. `None` launches every probe at once.
    pub max_concurrency: Option<usize>,
    /// Bound on the whole run. Probes still running when it passes become errors.
    pub deadline: Option<Duration>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrency: None,
            deadline: None,
        }
    }
}

/// Concurrent existence checker.
///
/// One task per site is spawned up front and all of them are joined before
/// `probe_all` returns; results come back in registry order.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    options: ProbeOptions,
}

impl Prober {
    pub fn new(client: Client, options: ProbeOptions) -> Self {
        Self { client, options }
    }

    /// Prober backed by the process-wide pooled client.
    pub fn with_options(options: ProbeOptions) -> Self {
        Self::new(SHARED_CLIENT.clone(), options)
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    pub async fn probe_all(&self, identifier: &str, registry: &SiteRegistry) -> Result<ProbeReport, ProbeError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ProbeError::EmptyIdentifier);
        }

        // Resolve everything first so a bad template fails the run before any request leaves.
        registry.validate()?;
        let requests = registry
            .iter()
            .map(|site| ProbeRequest::new(site, identifier))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(identifier, sites = requests.len(), timeout_ms = self.options.timeout.as_millis() as u64, "probing sites");

        let start = Instant::now();
        let limiter = self.options.max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
        let deadline = self.options.deadline.map(|d| Instant::now() + d);

        // Fan out. Dropping the set aborts whatever is still running, so a
        // cancelled run stops sending requests.
        let mut tasks = JoinSet::new();
        let mut pending = Vec::with_capacity(requests.len());
        let mut by_task = HashMap::with_capacity(requests.len());
        for (index, request) in requests.into_iter().enumerate() {
            let entry = PendingProbe {
                index,
                site: request.site.name.clone(),
                url: request.url.clone(),
                started: Instant::now(),
            };
            let probe = run_probe(self.client.clone(), request, self.options.timeout, limiter.clone(), deadline);
            let handle = tasks.spawn(async move { (index, probe.await) });
            by_task.insert(handle.id(), index);
            pending.push(entry);
        }

        // Fan in, then restore registry order
        let mut slots: Vec<Option<ProbeResult>> = vec![None; pending.len()];
        while let Some(joined) = tasks.join_next().await {
            if let Some((index, result)) = collect_joined(joined, &by_task, &pending) {
                slots[index] = Some(result);
            }
        }
        let results = slots
            .into_iter()
            .zip(&pending)
            .map(|(slot, entry)| slot.unwrap_or_else(|| entry.task_failure("probe task vanished")))
            .collect();

        let report = ProbeReport {
            identifier: identifier.to_string(),
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        let summary = report.summary();
        tracing::info!(
            identifier,
            found = summary.found,
            not_found = summary.not_found,
            errors = summary.errors,
            duration_ms = report.duration_ms,
            "probe run complete"
        );
        Ok(report)
    }
}

/// Bookkeeping for one spawned probe, kept so a dead task still yields a row.
#[derive(Debug, Clone)]
struct PendingProbe {
    index: usize,
    site: String,
    url: String,
    started: Instant,
}

impl PendingProbe {
    fn task_failure(&self, detail: impl Into<String>) -> ProbeResult {
        ProbeResult::failed(
            self.site.clone(),
            self.url.clone(),
            ProbeFailure::new(ErrorKind::Task, detail),
            self.started.elapsed().as_millis() as u64,
        )
    }
}

/// Turn one joined task into its slot index and row.
///
/// A panicked or aborted task is mapped back to its site through the task id
/// and reported as `Error/Task`.
fn collect_joined(
    joined: Result<(usize, ProbeResult), JoinError>,
    by_task: &HashMap<Id, usize>,
    pending: &[PendingProbe],
) -> Option<(usize, ProbeResult)> {
    match joined {
        Ok(done) => Some(done),
        Err(e) => {
            let entry = by_task.get(&e.id()).and_then(|i| pending.get(*i))?;
            tracing::warn!(site = %entry.site, error = %e, "probe task failed");
            Some((entry.index, entry.task_failure(e.to_string())))
        }
    }
}

async fn run_probe(
    client: Client,
    request: ProbeRequest,
    timeout: Duration,
    limiter: Option<Arc<Semaphore>>,
    deadline: Option<Instant>,
) -> ProbeResult {
    let start = Instant::now();
    let probe = async {
        // The semaphore is never closed, so a failed acquire only means "run unbounded"
        let _permit = match &limiter {
            Some(sem) => sem.clone().acquire_owned().await.ok(),
            None => None,
        };
        probe_one(&client, &request, timeout).await
    };

    match deadline {
        Some(at) => match tokio::time::timeout_at(at, probe).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(site = %request.site.name, "overall deadline reached");
                ProbeResult::failed(
                    request.site.name.clone(),
                    request.url.clone(),
                    ProbeFailure::new(ErrorKind::Deadline, "overall deadline exceeded"),
                    start.elapsed().as_millis() as u64,
                )
            }
        },
        None => probe.await,
    }
}

/// Probe every site in `registry` for `identifier` using the shared client.
pub async fn probe_all(identifier: &str, registry: &SiteRegistry, timeout_per_probe: Duration) -> Result<ProbeReport, ProbeError> {
    Prober::with_options(ProbeOptions {
        timeout: timeout_per_probe,
        ..ProbeOptions::default()
    })
    .probe_all(identifier, registry)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_identifier_fails_fast() {
        let prober = Prober::with_options(ProbeOptions::default());
        let err = prober.probe_all("   ", &SiteRegistry::builtin()).await.unwrap_err();
        assert!(matches!(err, ProbeError::EmptyIdentifier));
    }

    #[tokio::test]
    async fn empty_registry_yields_empty_report() {
        let report = probe_all("jdoe", &SiteRegistry::default(), DEFAULT_PROBE_TIMEOUT).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.identifier, "jdoe");
    }

    #[test]
    fn default_options_match_reference_behaviour() {
        let opts = ProbeOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert!(opts.max_concurrency.is_none());
        assert!(opts.deadline.is_none());
    }

    fn pending(index: usize, site: &str) -> PendingProbe {
        PendingProbe {
            index,
            site: site.to_string(),
            url: format!("https://{}.test/jdoe", site.to_lowercase()),
            started: Instant::now(),
        }
    }

    fn explode() -> (usize, ProbeResult) {
        panic!("probe task exploded")
    }

    #[tokio::test]
    async fn panicked_task_becomes_task_error_for_its_site() {
        let pending = vec![pending(0, "Alpha"), pending(1, "Beta")];
        let mut tasks = JoinSet::new();
        let handle = tasks.spawn(async { explode() });
        let by_task = HashMap::from([(handle.id(), 1usize)]);

        let joined = tasks.join_next().await.unwrap();
        assert!(joined.as_ref().unwrap_err().is_panic());
        let (index, row) = collect_joined(joined, &by_task, &pending).unwrap();

        assert_eq!(index, 1);
        assert_eq!(row.site, "Beta");
        assert_eq!(row.outcome, crate::probe::Outcome::Error);
        assert_eq!(row.error_kind, Some(ErrorKind::Task));
        assert!(row.error_detail.unwrap().contains("panic"));
    }

    #[tokio::test]
    async fn aborted_task_keeps_its_elapsed_time() {
        let pending = vec![pending(0, "Alpha")];
        let mut tasks: JoinSet<(usize, ProbeResult)> = JoinSet::new();
        let handle = tasks.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            explode()
        });
        let by_task = HashMap::from([(handle.id(), 0usize)]);

        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.abort();
        let joined = tasks.join_next().await.unwrap();
        assert!(joined.as_ref().unwrap_err().is_cancelled());
        let (index, row) = collect_joined(joined, &by_task, &pending).unwrap();

        assert_eq!(index, 0);
        assert_eq!(row.error_kind, Some(ErrorKind::Task));
        assert!(row.elapsed_ms >= 40, "elapsed {}", row.elapsed_ms);
    }

    #[tokio::test]
    async fn finished_task_passes_through() {
        let pending = vec![pending(0, "Alpha")];
        let row = pending[0].task_failure("unused");
        let mut tasks = JoinSet::new();
        let expected = row.clone();
        tasks.spawn(async move { (0usize, row) });

        let joined = tasks.join_next().await.unwrap();
        assert_eq!(collect_joined(joined, &HashMap::new(), &pending), Some((0, expected)));
    }
}
