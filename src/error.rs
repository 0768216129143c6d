use std::path::PathBuf;

/// Errors that stop a probe run before any request goes out.
///
/// Per-site network failures are never reported through this type; they end
/// up as `Outcome::Error` inside the report.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("site entry has an empty name")]
    EmptySiteName,

    #[error("site '{site}' is registered more than once")]
    DuplicateSite { site: String },

    #[error("url template for '{site}' has no '{{}}' placeholder")]
    MissingPlaceholder { site: String },

    #[error("url template for '{site}' has more than one '{{}}' placeholder")]
    MultiplePlaceholders { site: String },

    #[error("site '{site}' resolves to an invalid url '{url}': {reason}")]
    InvalidUrl { site: String, url: String, reason: String },

    #[error("failed to read site registry {path}")]
    RegistryLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site registry {path}")]
    RegistryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ProbeError {
    /// True for errors caused by a malformed registry rather than by the caller's input.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ProbeError::EmptyIdentifier)
    }
}
