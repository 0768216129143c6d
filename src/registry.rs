use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProbeError;

/// Placeholder replaced by the identifier in every url template.
pub const PLACEHOLDER: &str = "{}";

fn default_found_status() -> u16 {
    200
}

/// One site the prober knows how to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRegistryEntry {
    pub name: String,
    pub url_template: String,
    /// Status the site answers with when the profile exists.
    #[serde(default = "default_found_status")]
    pub found_status: u16,
}

impl SiteRegistryEntry {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            found_status: default_found_status(),
        }
    }

    pub fn with_found_status(mut self, status: u16) -> Self {
        self.found_status = status;
        self
    }

    /// Check the template shape without touching the network.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.name.trim().is_empty() {
            return Err(ProbeError::EmptySiteName);
        }
        match self.url_template.matches(PLACEHOLDER).count() {
            0 => Err(ProbeError::MissingPlaceholder { site: self.name.clone() }),
            1 => Ok(()),
            _ => Err(ProbeError::MultiplePlaceholders { site: self.name.clone() }),
        }
    }

    /// Substitute the identifier into the template.
    ///
    /// The identifier is percent-encoded so characters like `/`, `?` or `#`
    /// stay inside the path segment they were meant for.
    pub fn resolve(&self, identifier: &str) -> Result<String, ProbeError> {
        self.validate()?;
        let resolved = self
            .url_template
            .replacen(PLACEHOLDER, &urlencoding::encode(identifier), 1);

        let parsed = Url::parse(&resolved).map_err(|e| ProbeError::InvalidUrl {
            site: self.name.clone(),
            url: resolved.clone(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ProbeError::InvalidUrl {
                site: self.name.clone(),
                url: resolved,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(resolved)
    }
}

/// Ordered, immutable set of sites to probe.
///
/// Iteration order is definition order and the prober reports in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteRegistry {
    entries: Vec<SiteRegistryEntry>,
}

impl SiteRegistry {
    pub fn new(entries: Vec<SiteRegistryEntry>) -> Result<Self, ProbeError> {
        let registry = Self { entries };
        registry.validate()?;
        Ok(registry)
    }

    /// Registry built from `(name, template)` pairs, handy for tests and small setups.
    pub fn from_pairs<I, N, T>(pairs: I) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, template)| SiteRegistryEntry::new(name, template))
                .collect(),
        )
    }

    /// The sites checked when no registry file is given.
    pub fn builtin() -> Self {
        let entries = [
            ("Instagram", "https://www.instagram.com/{}"),
            ("Twitter", "https://www.twitter.com/{}"),
            ("GitHub", "https://www.github.com/{}"),
            ("Reddit", "https://www.reddit.com/user/{}"),
            ("TikTok", "https://www.tiktok.com/@{}"),
        ]
        .into_iter()
        .map(|(name, template)| SiteRegistryEntry::new(name, template))
        .collect();
        Self { entries }
    }

    /// Load a JSON array of entries from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, ProbeError> {
        let data = std::fs::read_to_string(path).map_err(|source| ProbeError::RegistryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<SiteRegistryEntry> =
            serde_json::from_str(&data).map_err(|source| ProbeError::RegistryParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), sites = entries.len(), "loaded site registry");
        Self::new(entries)
    }

    /// Every entry has a valid template and names are unique.
    pub fn validate(&self) -> Result<(), ProbeError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert(entry.name.as_str()) {
                return Err(ProbeError::DuplicateSite { site: entry.name.clone() });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[SiteRegistryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SiteRegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keeps_definition_order() {
        let reg = SiteRegistry::builtin();
        let names: Vec<_> = reg.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Instagram", "Twitter", "GitHub", "Reddit", "TikTok"]);
        assert!(reg.validate().is_ok());
    }

    #[test]
    fn resolve_substitutes_identifier() {
        let e = SiteRegistryEntry::new("Reddit", "https://www.reddit.com/user/{}");
        assert_eq!(e.resolve("jdoe").unwrap(), "https://www.reddit.com/user/jdoe");
    }

    #[test]
    fn resolve_encodes_reserved_characters() {
        let e = SiteRegistryEntry::new("GitHub", "https://www.github.com/{}");
        assert_eq!(e.resolve("a/b?c").unwrap(), "https://www.github.com/a%2Fb%3Fc");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let e = SiteRegistryEntry::new("Broken", "https://example.com/user");
        assert!(matches!(e.validate(), Err(ProbeError::MissingPlaceholder { .. })));
    }

    #[test]
    fn template_with_two_placeholders_is_rejected() {
        let e = SiteRegistryEntry::new("Twice", "https://example.com/{}/{}");
        assert!(matches!(e.validate(), Err(ProbeError::MultiplePlaceholders { .. })));
    }

    #[test]
    fn non_http_template_is_rejected() {
        let e = SiteRegistryEntry::new("Ftp", "ftp://example.com/{}");
        assert!(matches!(e.resolve("x"), Err(ProbeError::InvalidUrl { .. })));
        let e = SiteRegistryEntry::new("Relative", "/profiles/{}");
        assert!(matches!(e.resolve("x"), Err(ProbeError::InvalidUrl { .. })));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let res = SiteRegistry::from_pairs([
            ("Alpha", "https://alpha.test/{}"),
            ("Alpha", "https://other.test/{}"),
        ]);
        assert!(matches!(res, Err(ProbeError::DuplicateSite { site }) if site == "Alpha"));
    }

    #[test]
    fn found_status_defaults_when_missing_from_json() {
        let entries: Vec<SiteRegistryEntry> = serde_json::from_str(
            r#"[{"name":"A","url_template":"https://a.test/{}"},
                {"name":"B","url_template":"https://b.test/{}","found_status":204}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].found_status, 200);
        assert_eq!(entries[1].found_status, 204);
    }
}
