pub mod breach;
pub mod config;
pub mod error;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod registry;
pub mod utils;

pub use crate::error::ProbeError;
pub use crate::probe::{probe_all, Outcome, ProbeOptions, ProbeReport, ProbeResult, Prober};
pub use crate::registry::{SiteRegistry, SiteRegistryEntry};
