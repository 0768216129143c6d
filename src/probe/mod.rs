pub mod engine;
pub mod http_probe;
pub mod report;
pub mod result;

pub use engine::{probe_all, ProbeOptions, Prober, DEFAULT_PROBE_TIMEOUT};
pub use http_probe::{probe_one, ProbeRequest};
pub use report::{ProbeReport, ProbeSummary};
pub use result::{classify, ErrorKind, Outcome, ProbeFailure, ProbeResult};
