//! Source catalog
//!
//! Declarative lookup from a known title to its ordered fallback sources.
//! Titles are matched case-insensitively after trimming.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalog {
    /// Title → ordered candidate sources
    #[serde(default)]
    entries: BTreeMap<String, Vec<String>>,

    /// Appended after every title's own sources
    #[serde(default)]
    fallbacks: Vec<String>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON
    ///
    /// ```json
    /// { "entries": { "Anish": ["/assets/videos/anish.mov"] },
    ///   "fallbacks": ["/assets/videos/sample-video.mp4"] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: SourceCatalog = serde_json::from_str(json)?;
        // Normalize keys so lookups are case-insensitive
        let mut catalog = SourceCatalog::new().with_fallbacks(parsed.fallbacks);
        for (title, sources) in parsed.entries {
            catalog.insert(&title, sources);
        }
        Ok(catalog)
    }

    /// Load a JSON catalog from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            titles = catalog.len(),
            "Loaded source catalog from {}",
            path.display()
        );
        Ok(catalog)
    }

    pub fn with_fallbacks(mut self, fallbacks: Vec<String>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Register (or replace) a title's sources
    pub fn insert(&mut self, title: &str, sources: Vec<String>) {
        self.entries.insert(normalize(title), sources);
    }

    /// Sources registered for a title
    pub fn get(&self, title: &str) -> Option<&[String]> {
        self.entries.get(&normalize(title)).map(Vec::as_slice)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(&normalize(title))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate list for a player
    ///
    /// Order: caller's primary source, the title's own sources, then the
    /// catalog-wide fallbacks. Duplicates keep their first position.
    pub fn resolve(&self, title: &str, primary: Option<&str>) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();
        let own = self.get(title).unwrap_or_default();

        let candidates = primary
            .into_iter()
            .chain(own.iter().map(String::as_str))
            .chain(self.fallbacks.iter().map(String::as_str));

        for candidate in candidates {
            if !candidate.is_empty() && !resolved.iter().any(|s| s == candidate) {
                resolved.push(candidate.to_string());
            }
        }

        if resolved.is_empty() {
            tracing::warn!("No sources known for title {:?}", title);
        }

        resolved
    }
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SourceCatalog {
        let mut catalog = SourceCatalog::new()
            .with_fallbacks(vec!["/assets/videos/sample-video.mp4".to_string()]);
        catalog.insert("ANISH", vec!["/assets/videos/anish.mov".to_string()]);
        catalog.insert(
            "Trailer 2014",
            vec![
                "/assets/videos/gs1-vd.mp4".to_string(),
                "/assets/videos/trailer-1.mp4".to_string(),
            ],
        );
        catalog
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = catalog();
        assert!(catalog.contains("anish"));
        assert!(catalog.contains("  Anish "));
        assert_eq!(catalog.get("trailer 2014").unwrap().len(), 2);
    }

    #[test]
    fn resolve_orders_primary_own_fallbacks() {
        let sources = catalog().resolve("Anish", Some("https://cdn.example.com/anish.mp4"));
        assert_eq!(
            sources,
            vec![
                "https://cdn.example.com/anish.mp4",
                "/assets/videos/anish.mov",
                "/assets/videos/sample-video.mp4",
            ]
        );
    }

    #[test]
    fn resolve_deduplicates() {
        let sources = catalog().resolve("Anish", Some("/assets/videos/anish.mov"));
        assert_eq!(
            sources,
            vec!["/assets/videos/anish.mov", "/assets/videos/sample-video.mp4"]
        );
    }

    #[test]
    fn unknown_title_gets_fallbacks_only() {
        let sources = catalog().resolve("Unknown", None);
        assert_eq!(sources, vec!["/assets/videos/sample-video.mp4"]);

        assert!(SourceCatalog::new().resolve("Unknown", None).is_empty());
    }

    #[test]
    fn parses_json_catalog() {
        let catalog = SourceCatalog::from_json(
            r#"{
                "entries": { "Sunil": ["/assets/videos/sunil.mov"] },
                "fallbacks": ["/assets/videos/sample-video.mp4"]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.resolve("SUNIL", None),
            vec!["/assets/videos/sunil.mov", "/assets/videos/sample-video.mp4"]
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(SourceCatalog::from_json("{ not json").is_err());
    }
}
